//! # atlas-verifier
//!
//! Independent verifier for Atlas-to-E8 embedding certificates.
//!
//! This crate is the public trust boundary of the pipeline: it accepts a
//! serialized certificate and decides, from the certificate's own embedded
//! data alone, whether the claimed embedding satisfies every invariant. It
//! does not link against the generator or the search engine: the schema is
//! re-declared here, labels and exact root coordinates are re-parsed, and
//! the mirror involution, negation table, adjacency, norms and sums are all
//! re-derived from scratch. Summary fields stored in the certificate are
//! recomputed, never trusted.
//!
//! Verification runs a fixed sequence of checks and short-circuits on the
//! first failure, reporting its [`FailureCategory`]:
//! structure → rebuild → injectivity → mirror pairing → edge preservation →
//! unity sum → sign-class count.
//!
//! ## Example
//!
//! ```no_run
//! let json = std::fs::read_to_string("certificate.json")?;
//! match atlas_verifier::verify_str(&json) {
//!     Ok(summary) => println!("valid, {} sign classes", summary.sign_classes),
//!     Err(error) => println!("invalid ({}): {error}", error.category()),
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod rebuild;
pub mod schema;
pub mod verify;

pub use error::{FailureCategory, VerifyError};
pub use schema::{CertificateDoc, SUPPORTED_VERSION};
pub use verify::{verdict, verify_str, verify_value, VerificationSummary, Verdict};
