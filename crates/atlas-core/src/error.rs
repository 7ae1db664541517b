//! Error types for graph construction and search configuration.
//!
//! Build errors indicate a defect in the generation rules themselves and are
//! fatal: a correctly-defined Atlas or root system can never produce one.
//! Search errors cover rejected configurations (bad pins, bad unity indices);
//! a search that simply finds nothing returns an empty collection, never an
//! error.

use thiserror::Error;

/// Fatal invariant violations detected while constructing the static graphs.
///
/// Any of these halts the pipeline: they mean the generation rules are wrong,
/// not that the runtime hit a recoverable condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// The label enumeration did not produce the expected vertex count.
    #[error("atlas vertex count mismatch: expected {expected}, got {actual}")]
    VertexCount {
        /// The expected number of vertices.
        expected: usize,
        /// The number actually generated.
        actual: usize,
    },

    /// A vertex degree fell outside the admissible range.
    #[error("atlas vertex {vertex} has degree {degree}, outside {{5, 6}}")]
    DegreeOutOfRange {
        /// The offending vertex.
        vertex: usize,
        /// Its computed degree.
        degree: usize,
    },

    /// The mirror involution fixed a vertex.
    #[error("mirror involution has a fixed point at vertex {vertex}")]
    MirrorFixedPoint {
        /// The fixed vertex.
        vertex: usize,
    },

    /// The mirror involution is not its own inverse.
    #[error("mirror involution is not an involution at vertex {vertex}")]
    MirrorNotInvolution {
        /// The vertex where `tau(tau(v)) != v`.
        vertex: usize,
    },

    /// A mirror pair coincides with a graph edge.
    #[error("mirror pair ({vertex}, {mirror}) coincides with a graph edge")]
    MirrorPairIsEdge {
        /// One endpoint of the pair.
        vertex: usize,
        /// Its mirror image.
        mirror: usize,
    },

    /// The root enumeration did not produce the expected count.
    #[error("root count mismatch: expected {expected}, got {actual}")]
    RootCount {
        /// The expected number of roots.
        expected: usize,
        /// The number actually generated.
        actual: usize,
    },

    /// A root's squared norm is not exactly 2.
    #[error("root {index} has squared norm {norm}, expected exactly 2")]
    RootNorm {
        /// The offending root index.
        index: usize,
        /// The exact squared norm, rendered as a fraction.
        norm: String,
    },

    /// The additive inverse of a root is missing from the generated set.
    #[error("no negation partner found for root {index}")]
    NegationMissing {
        /// The root with no partner.
        index: usize,
    },

    /// The negation table is not a fixed-point-free involution.
    #[error("negation table broken at root {index}")]
    NegationBroken {
        /// The root where the involution law fails.
        index: usize,
    },
}

/// Rejected search configurations.
///
/// These are caller errors reported before the search starts. An exhausted
/// search with zero solutions is not an error and returns an empty list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchError {
    /// A pinned vertex index is out of range.
    #[error("pin vertex {vertex} out of range 0..{limit}")]
    PinVertexOutOfRange {
        /// The out-of-range vertex.
        vertex: usize,
        /// The exclusive upper bound.
        limit: usize,
    },

    /// A pinned root index is out of range.
    #[error("pin root {root} out of range 0..{limit}")]
    PinRootOutOfRange {
        /// The out-of-range root.
        root: usize,
        /// The exclusive upper bound.
        limit: usize,
    },

    /// Two pins (directly or through the mirror law) disagree on a vertex.
    #[error("conflicting pins for vertex {vertex}")]
    ConflictingPin {
        /// The doubly-pinned vertex.
        vertex: usize,
    },

    /// Pins assign the same root (or its negation) to more than one vertex.
    #[error("pins assign root {root} to more than one vertex")]
    DuplicatePinnedRoot {
        /// The doubly-used root.
        root: usize,
    },

    /// A unity index is out of range.
    #[error("unity index {vertex} out of range 0..{limit}")]
    UnityIndexOutOfRange {
        /// The out-of-range vertex.
        vertex: usize,
        /// The exclusive upper bound.
        limit: usize,
    },
}
