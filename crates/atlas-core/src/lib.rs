//! # atlas-core
//!
//! Builders, search, canonicalization and certificate generation for the
//! Atlas-to-E8 embedding problem.
//!
//! The crate finds a structure-preserving, invertible-up-to-sign map from
//! the fixed 96-vertex Atlas graph into the 240-root E8 root system:
//!
//! - [`Atlas`]: the 96 labeled vertices, flip adjacency, and the mirror
//!   involution τ.
//! - [`RootSystem`]: the 240 exact-rational roots, dot-product-1 adjacency,
//!   and the negation table.
//! - [`SearchEngine`]: depth-first backtracking over τ-pairs, with pins, a
//!   unity (zero-sum) constraint and a sign-class target.
//! - [`Symmetries`]: the order-24 label symmetry group, orbit keys, and
//!   deterministic canonical selection among solutions.
//! - [`CertificateGenerator`]: versioned, self-contained certificates with
//!   exact `"num/den"` coordinates and a Blake3 content digest.
//!
//! Certificate *verification* deliberately lives in the separate
//! `atlas-verifier` crate, which re-derives every invariant from the
//! certificate's own embedded data and does not link against this crate.
//!
//! ## Example
//!
//! ```no_run
//! use atlas_core::{
//!     Atlas, CertificateGenerator, GenerateOptions, RootSystem, SearchConfig, SearchEngine,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let atlas = Atlas::build()?;
//!     let roots = RootSystem::build()?;
//!
//!     let config = SearchConfig {
//!         unity_indices: vec![0, atlas.tau(0)],
//!         target_sign_classes: Some(48),
//!         ..SearchConfig::default()
//!     };
//!     let solutions = SearchEngine::new(&atlas, &roots).run(&config)?;
//!     let mapping = solutions.first().ok_or("no embedding found")?;
//!
//!     let certificate = CertificateGenerator::new(&atlas, &roots).generate(
//!         mapping,
//!         &config.unity_indices,
//!         GenerateOptions::default(),
//!     )?;
//!     println!("{}", certificate.to_canonical_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Determinism
//!
//! Everything here is single-threaded, clock-free and allocation-order
//! independent: two runs with the same configuration produce bit-identical
//! mappings and certificates.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atlas;
pub mod certificate;
pub mod error;
pub mod label;
pub mod roots;
pub mod search;
pub mod symmetry;

pub use atlas::Atlas;
pub use certificate::{
    Certificate, CertificateError, CertificateGenerator, GenerateOptions, CERTIFICATE_VERSION,
};
pub use error::{BuildError, SearchError};
pub use label::{Label, LabelParseError, NUM_LABELS};
pub use roots::{Root, RootSystem, RootType, NUM_INTEGER_ROOTS, NUM_ROOTS};
pub use search::{sign_class_count, Mapping, SearchConfig, SearchEngine};
pub use symmetry::{
    group_elements, FlipPermutation, Symmetries, GROUP_DESCRIPTION, GROUP_ORDER,
};
