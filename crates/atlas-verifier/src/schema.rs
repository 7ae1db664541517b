//! The verifier's own view of the certificate schema.
//!
//! This is a deliberate re-declaration: the verifier must not share schema
//! types with the generator, so the crate boundary stays a trust boundary.
//! Fields are deserialized permissively (unknown fields ignored, optional
//! fields optional); every semantic constraint is enforced by the
//! verification steps, not by serde.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::VerifyError;

/// The certificate version this verifier understands.
pub const SUPPORTED_VERSION: &str = "A2";

/// Expected number of Atlas vertices.
pub const NUM_VERTICES: usize = 96;

/// Expected number of roots.
pub const NUM_ROOTS: usize = 240;

/// Dimension of root vectors.
pub const DIM: usize = 8;

/// A parsed-but-unchecked certificate document.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateDoc {
    /// Format version tag.
    pub version: String,
    /// Label strings in vertex order.
    pub atlas_labels: Vec<String>,
    /// Vertices whose images must sum to zero.
    pub unity_indices: Vec<usize>,
    /// Root coordinates keyed by stringified index.
    pub roots: BTreeMap<String, Vec<String>>,
    /// Mapping entries, vertex key to root-index value.
    pub mapping: BTreeMap<String, String>,
    /// Declared integer-root count (stored, re-derived, never trusted).
    pub integer_roots_used: usize,
    /// Declared sign-class count (checked against a recomputation).
    pub sign_classes_used: usize,
    /// Declared automorphism group description (informational).
    pub automorphism_group: String,
    /// Hex Blake3 digest of the canonical payload, when present.
    #[serde(default)]
    pub content_digest: Option<String>,
    /// Declared canonical key (informational).
    #[serde(default)]
    pub canonical_key: Option<Vec<usize>>,
    /// Creation timestamp (informational).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Free-form metadata (informational).
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl CertificateDoc {
    /// Parses a JSON value into a document.
    ///
    /// # Errors
    ///
    /// Returns a structural [`VerifyError`] when required fields are absent
    /// or of the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, VerifyError> {
        serde_json::from_value(value.clone()).map_err(|e| VerifyError::Structure {
            reason: format!("certificate does not match the schema: {e}"),
        })
    }
}

/// Recomputes the hex Blake3 digest of a certificate's canonical payload:
/// the parsed JSON value with the `content_digest` field removed,
/// re-serialized with sorted keys and compact separators.
#[must_use]
pub fn payload_digest(value: &serde_json::Value) -> String {
    let mut payload = value.clone();
    if let Some(object) = payload.as_object_mut() {
        object.remove("content_digest");
    }
    let bytes = payload.to_string();
    hex::encode(blake3::hash(bytes.as_bytes()).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_document_missing_required_fields() {
        let value: serde_json::Value = serde_json::json!({ "version": "A2" });
        let result = CertificateDoc::from_value(&value);
        assert!(matches!(result, Err(VerifyError::Structure { .. })));
    }

    #[test]
    fn digest_ignores_the_digest_field_itself() {
        let with: serde_json::Value =
            serde_json::json!({ "a": 1, "content_digest": "deadbeef" });
        let without: serde_json::Value = serde_json::json!({ "a": 1 });
        assert_eq!(payload_digest(&with), payload_digest(&without));
    }

    #[test]
    fn digest_is_sensitive_to_payload_changes() {
        let one: serde_json::Value = serde_json::json!({ "a": 1 });
        let two: serde_json::Value = serde_json::json!({ "a": 2 });
        assert_ne!(payload_digest(&one), payload_digest(&two));
    }
}
