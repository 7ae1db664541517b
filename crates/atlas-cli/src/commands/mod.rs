//! Subcommand implementations.
//!
//! The three user-visible failure modes carry distinct exit codes and are
//! never collapsed into a generic failure: an exhausted search, a mapping
//! that fails verification, and a malformed certificate are different
//! outcomes.

pub mod pipeline;
pub mod selftest;
pub mod verify;

/// Exit code when the search exhausts without finding an embedding.
pub const EXIT_NO_EMBEDDING: u8 = 2;

/// Exit code when an embedding was found but its certificate fails
/// verification.
pub const EXIT_VERIFICATION_FAILED: u8 = 3;

/// Exit code when a certificate is structurally malformed.
pub const EXIT_MALFORMED_CERTIFICATE: u8 = 4;
