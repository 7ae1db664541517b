//! Categorized verification failures.
//!
//! Verification failures are structured values, not panics: every failure
//! names the first invariant category that broke and carries enough context
//! to debug it. The categories mirror the ordered verification steps;
//! verification short-circuits on the first failure.

use thiserror::Error;

/// The invariant category a verification failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FailureCategory {
    /// Schema, field-presence, count or syntax problems, including a
    /// content-digest mismatch. The certificate is malformed.
    Structure,
    /// The mirror involution or negation table could not be rebuilt from
    /// the embedded data (duplicate labels, missing negation partner, wrong
    /// norm).
    Rebuild,
    /// The mapping assigns one root to two vertices.
    Injectivity,
    /// The mirror-pairing law fails at some vertex.
    MirrorPairing,
    /// An Atlas edge maps to a non-adjacent root pair.
    EdgePreservation,
    /// The unity-set images do not sum to the zero vector.
    UnitySum,
    /// The recomputed sign-class count disagrees with the declared one.
    SignClassCount,
}

impl FailureCategory {
    /// Canonical lowercase name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Rebuild => "rebuild",
            Self::Injectivity => "injectivity",
            Self::MirrorPairing => "mirror-pairing",
            Self::EdgePreservation => "edge-preservation",
            Self::UnitySum => "unity-sum",
            Self::SignClassCount => "sign-class-count",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single categorized verification failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VerifyError {
    /// The certificate is structurally malformed.
    #[error("structural validation failed: {reason}")]
    Structure {
        /// What is malformed.
        reason: String,
    },

    /// An invariant table could not be rebuilt from the embedded data.
    #[error("invariant rebuild failed: {reason}")]
    Rebuild {
        /// What could not be rebuilt.
        reason: String,
    },

    /// Two vertices share an image root.
    #[error("mapping is not injective: root {root} is the image of vertices {first} and {second}")]
    Injectivity {
        /// The doubly-used root index.
        root: usize,
        /// The first vertex mapped to it.
        first: usize,
        /// The second vertex mapped to it.
        second: usize,
    },

    /// The mirror-pairing law fails.
    #[error(
        "mirror-pairing law violated at vertex {vertex}: expected root {expected}, found {actual}"
    )]
    MirrorPairing {
        /// The vertex where the law fails.
        vertex: usize,
        /// The negation of the vertex's own image.
        expected: usize,
        /// The mirror vertex's actual image.
        actual: usize,
    },

    /// An Atlas edge maps to a non-adjacent root pair.
    #[error("edge ({u}, {v}) maps to non-adjacent roots {root_u} and {root_v}")]
    EdgePreservation {
        /// First edge endpoint.
        u: usize,
        /// Second edge endpoint.
        v: usize,
        /// Image of `u`.
        root_u: usize,
        /// Image of `v`.
        root_v: usize,
    },

    /// The unity sum has a nonzero component.
    #[error("unity sum is not zero: component {component} is {value}")]
    UnitySum {
        /// Index of the first nonzero component.
        component: usize,
        /// Its exact value as a fraction.
        value: String,
    },

    /// The declared sign-class count is wrong.
    #[error("sign-class count mismatch: certificate declares {declared}, recomputed {actual}")]
    SignClassCount {
        /// The count declared in the certificate.
        declared: usize,
        /// The count recomputed from the embedded data.
        actual: usize,
    },
}

impl VerifyError {
    /// The category this failure belongs to.
    #[must_use]
    pub const fn category(&self) -> FailureCategory {
        match self {
            Self::Structure { .. } => FailureCategory::Structure,
            Self::Rebuild { .. } => FailureCategory::Rebuild,
            Self::Injectivity { .. } => FailureCategory::Injectivity,
            Self::MirrorPairing { .. } => FailureCategory::MirrorPairing,
            Self::EdgePreservation { .. } => FailureCategory::EdgePreservation,
            Self::UnitySum { .. } => FailureCategory::UnitySum,
            Self::SignClassCount { .. } => FailureCategory::SignClassCount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_reports_its_category() {
        let cases: Vec<(VerifyError, FailureCategory)> = vec![
            (
                VerifyError::Structure {
                    reason: "x".into(),
                },
                FailureCategory::Structure,
            ),
            (
                VerifyError::Rebuild {
                    reason: "x".into(),
                },
                FailureCategory::Rebuild,
            ),
            (
                VerifyError::Injectivity {
                    root: 1,
                    first: 0,
                    second: 2,
                },
                FailureCategory::Injectivity,
            ),
            (
                VerifyError::MirrorPairing {
                    vertex: 0,
                    expected: 1,
                    actual: 2,
                },
                FailureCategory::MirrorPairing,
            ),
            (
                VerifyError::EdgePreservation {
                    u: 0,
                    v: 1,
                    root_u: 2,
                    root_v: 3,
                },
                FailureCategory::EdgePreservation,
            ),
            (
                VerifyError::UnitySum {
                    component: 0,
                    value: "1/2".into(),
                },
                FailureCategory::UnitySum,
            ),
            (
                VerifyError::SignClassCount {
                    declared: 48,
                    actual: 47,
                },
                FailureCategory::SignClassCount,
            ),
        ];
        for (error, category) in cases {
            assert_eq!(error.category(), category);
        }
    }
}
