//! Certificate generation: a versioned, self-contained serialization of an
//! accepted embedding.
//!
//! The certificate embeds everything an independent verifier needs (labels,
//! exact root coordinates, the mapping, the unity set) with no external
//! references. Summary statistics are computed once here and stored, but a
//! verifier re-derives them rather than trusting them. The canonical byte
//! form (sorted keys, compact separators) backs a Blake3 content digest;
//! the digest is likewise derived data, never a substitute for
//! re-verification.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::atlas::Atlas;
use crate::roots::{RootSystem, RootType};
use crate::search::{sign_class_count, Mapping};
use crate::symmetry::GROUP_DESCRIPTION;

/// The certificate format version tag.
pub const CERTIFICATE_VERSION: &str = "A2";

/// Errors raised while generating or emitting a certificate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertificateError {
    /// The mapping does not cover every vertex exactly once.
    #[error("mapping has {actual} entries, expected {expected}")]
    MappingLength {
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        actual: usize,
    },

    /// A mapping entry points outside the root array.
    #[error("mapping entry {vertex} -> {root} is out of range")]
    RootIndexOutOfRange {
        /// The vertex with the bad entry.
        vertex: usize,
        /// The out-of-range root index.
        root: usize,
    },

    /// JSON serialization failed.
    #[error("certificate serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing the certificate file failed.
    #[error("failed to write certificate file: {0}")]
    Io(#[from] std::io::Error),
}

/// A self-contained embedding certificate.
///
/// Immutable snapshot: created once per accepted solution, read-only
/// thereafter. Map fields use `BTreeMap` so the serialized form has sorted
/// keys; [`Certificate::to_canonical_json`] is byte-reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    /// Format version tag.
    pub version: String,
    /// All 96 labels in vertex order, in the stable textual form.
    pub atlas_labels: Vec<String>,
    /// Vertices whose images must sum to the zero vector.
    pub unity_indices: Vec<usize>,
    /// All 240 roots, keyed by index, each as 8 exact `"num/den"` strings.
    pub roots: BTreeMap<String, [String; 8]>,
    /// The completed mapping, vertex key to root-index value.
    pub mapping: BTreeMap<String, String>,
    /// Count of integer-type roots in the image (stored, not trusted).
    pub integer_roots_used: usize,
    /// Count of distinct sign classes in the image (stored, not trusted).
    pub sign_classes_used: usize,
    /// Human-readable description of the canonicalization group.
    pub automorphism_group: String,
    /// Hex Blake3 digest of the canonical payload (all fields but this one).
    pub content_digest: String,
    /// Orbit-minimized equivalence key of the mapping, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_key: Option<Vec<usize>>,
    /// Caller-supplied creation timestamp, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Free-form caller metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Optional fields attached at generation time.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Orbit-minimized equivalence key to embed.
    pub canonical_key: Option<Vec<usize>>,
    /// Opaque timestamp string; the core never reads a clock itself.
    pub timestamp: Option<String>,
    /// Free-form metadata object.
    pub metadata: Option<serde_json::Value>,
}

/// Serializes accepted mappings against a pair of built graphs.
#[derive(Debug, Clone, Copy)]
pub struct CertificateGenerator<'a> {
    atlas: &'a Atlas,
    roots: &'a RootSystem,
}

impl<'a> CertificateGenerator<'a> {
    /// Creates a generator over the two immutable graphs.
    #[must_use]
    pub fn new(atlas: &'a Atlas, roots: &'a RootSystem) -> Self {
        Self { atlas, roots }
    }

    /// Serializes a validated mapping into a certificate.
    ///
    /// The mapping is expected to have been accepted by the search; only
    /// shape is re-checked here.
    ///
    /// # Errors
    ///
    /// Returns a [`CertificateError`] if the mapping has the wrong length or
    /// an out-of-range entry, or if serialization fails while computing the
    /// content digest.
    pub fn generate(
        &self,
        mapping: &Mapping,
        unity_indices: &[usize],
        options: GenerateOptions,
    ) -> Result<Certificate, CertificateError> {
        if mapping.len() != self.atlas.num_vertices() {
            return Err(CertificateError::MappingLength {
                expected: self.atlas.num_vertices(),
                actual: mapping.len(),
            });
        }
        for (vertex, &root) in mapping.iter().enumerate() {
            if root >= self.roots.num_roots() {
                return Err(CertificateError::RootIndexOutOfRange { vertex, root });
            }
        }

        let atlas_labels = self
            .atlas
            .labels()
            .iter()
            .map(|l| l.to_compact_string())
            .collect();
        let roots_field: BTreeMap<String, [String; 8]> = self
            .roots
            .roots()
            .iter()
            .enumerate()
            .map(|(i, r)| (i.to_string(), r.coord_strings()))
            .collect();
        let mapping_field: BTreeMap<String, String> = mapping
            .iter()
            .enumerate()
            .map(|(v, &r)| (v.to_string(), r.to_string()))
            .collect();
        let integer_roots_used = mapping
            .iter()
            .filter(|&&r| self.roots.root(r).root_type() == RootType::Integer)
            .count();

        let mut certificate = Certificate {
            version: CERTIFICATE_VERSION.to_string(),
            atlas_labels,
            unity_indices: unity_indices.to_vec(),
            roots: roots_field,
            mapping: mapping_field,
            integer_roots_used,
            sign_classes_used: sign_class_count(self.roots, mapping),
            automorphism_group: GROUP_DESCRIPTION.to_string(),
            content_digest: String::new(),
            canonical_key: options.canonical_key,
            timestamp: options.timestamp,
            metadata: options.metadata,
        };
        certificate.content_digest = certificate.compute_digest()?;
        tracing::debug!(
            sign_classes = certificate.sign_classes_used,
            integer_roots = certificate.integer_roots_used,
            "certificate generated"
        );
        Ok(certificate)
    }
}

impl Certificate {
    /// The canonical JSON byte form: sorted keys at every level, compact
    /// separators.
    ///
    /// # Errors
    ///
    /// Returns a [`CertificateError`] if serialization fails.
    pub fn to_canonical_json(&self) -> Result<String, CertificateError> {
        let value = serde_json::to_value(self)?;
        Ok(value.to_string())
    }

    /// Hex Blake3 digest over the canonical payload: the certificate with
    /// the `content_digest` field removed.
    ///
    /// # Errors
    ///
    /// Returns a [`CertificateError`] if serialization fails.
    pub fn compute_digest(&self) -> Result<String, CertificateError> {
        let mut value = serde_json::to_value(self)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("content_digest");
        }
        let payload = serde_json::to_string(&value)?;
        Ok(hex::encode(blake3::hash(payload.as_bytes()).as_bytes()))
    }

    /// Writes the canonical JSON form to `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CertificateError`] on serialization or I/O failure.
    pub fn write_to_file(&self, path: &Path) -> Result<(), CertificateError> {
        let json = self.to_canonical_json()?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "certificate written");
        Ok(())
    }
}
