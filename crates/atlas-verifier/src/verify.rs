//! The ordered verification steps.
//!
//! Verification consumes nothing but the certificate's own bytes. Steps run
//! in a fixed order and short-circuit on the first failure, so every
//! reported failure names the earliest broken invariant category:
//!
//! 1. structural/schema validation (counts, syntax, digest),
//! 2. rebuild of τ and the negation table from embedded data,
//! 3. injectivity,
//! 4. mirror pairing,
//! 5. edge preservation,
//! 6. unity sum,
//! 7. declared sign-class count.

use std::collections::{BTreeSet, HashMap};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{FailureCategory, VerifyError};
use crate::rebuild::{fraction_string, parse_mapping, Rebuilt};
use crate::schema::{
    payload_digest, CertificateDoc, DIM, NUM_ROOTS, NUM_VERTICES, SUPPORTED_VERSION,
};

/// Statistics recomputed from the embedded data by a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSummary {
    /// Distinct sign classes in the mapping's image.
    pub sign_classes: usize,
    /// Integer-type roots in the image.
    pub integer_roots: usize,
    /// Half-integer-type roots in the image.
    pub half_integer_roots: usize,
    /// Atlas edges whose preservation was checked.
    pub edges_checked: usize,
}

/// A pass/fail outcome with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the certificate verified.
    pub passed: bool,
    /// The failing category, when it did not.
    pub category: Option<FailureCategory>,
    /// Human-readable explanation.
    pub reason: String,
}

/// Verifies a serialized certificate.
///
/// # Errors
///
/// Returns the first failing [`VerifyError`]; its
/// [`category`](VerifyError::category) names the invariant class that broke.
pub fn verify_str(json: &str) -> Result<VerificationSummary, VerifyError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| VerifyError::Structure {
            reason: format!("certificate is not valid JSON: {e}"),
        })?;
    verify_value(&value)
}

/// Verifies a certificate already parsed into a JSON value.
///
/// # Errors
///
/// Returns the first failing [`VerifyError`].
pub fn verify_value(value: &serde_json::Value) -> Result<VerificationSummary, VerifyError> {
    let doc = CertificateDoc::from_value(value)?;
    check_structure(&doc, value)?;
    let rebuilt = Rebuilt::from_doc(&doc)?;
    let mapping = parse_mapping(&doc)?;
    check_injectivity(&mapping)?;
    check_mirror_pairing(&rebuilt, &mapping)?;
    let edges_checked = check_edge_preservation(&rebuilt, &mapping)?;
    check_unity_sum(&rebuilt, &doc.unity_indices, &mapping)?;
    let sign_classes = check_sign_class_count(&rebuilt, doc.sign_classes_used, &mapping)?;

    let integer_roots = mapping
        .iter()
        .filter(|&&r| rebuilt.is_integer_root(r))
        .count();
    Ok(VerificationSummary {
        sign_classes,
        integer_roots,
        half_integer_roots: mapping.len() - integer_roots,
        edges_checked,
    })
}

/// Convenience wrapper turning the result into a pass/fail verdict.
#[must_use]
pub fn verdict(json: &str) -> Verdict {
    match verify_str(json) {
        Ok(summary) => Verdict {
            passed: true,
            category: None,
            reason: format!(
                "certificate verified: {} sign classes, {} integer roots, {} edges checked",
                summary.sign_classes, summary.integer_roots, summary.edges_checked
            ),
        },
        Err(error) => Verdict {
            passed: false,
            category: Some(error.category()),
            reason: error.to_string(),
        },
    }
}

fn check_structure(doc: &CertificateDoc, value: &serde_json::Value) -> Result<(), VerifyError> {
    if doc.version != SUPPORTED_VERSION {
        return Err(VerifyError::Structure {
            reason: format!(
                "unsupported version {:?}, expected {SUPPORTED_VERSION:?}",
                doc.version
            ),
        });
    }
    if doc.atlas_labels.len() != NUM_VERTICES {
        return Err(VerifyError::Structure {
            reason: format!(
                "expected {NUM_VERTICES} labels, found {}",
                doc.atlas_labels.len()
            ),
        });
    }
    if doc.roots.len() != NUM_ROOTS {
        return Err(VerifyError::Structure {
            reason: format!("expected {NUM_ROOTS} roots, found {}", doc.roots.len()),
        });
    }
    if doc.mapping.len() != NUM_VERTICES {
        return Err(VerifyError::Structure {
            reason: format!(
                "expected {NUM_VERTICES} mapping entries, found {}",
                doc.mapping.len()
            ),
        });
    }
    for &vertex in &doc.unity_indices {
        if vertex >= NUM_VERTICES {
            return Err(VerifyError::Structure {
                reason: format!("unity index {vertex} out of range 0..{NUM_VERTICES}"),
            });
        }
    }
    if let Some(declared) = &doc.content_digest {
        let recomputed = payload_digest(value);
        if *declared != recomputed {
            return Err(VerifyError::Structure {
                reason: format!(
                    "content digest mismatch: declared {declared}, recomputed {recomputed}"
                ),
            });
        }
    }
    Ok(())
}

fn check_injectivity(mapping: &[usize]) -> Result<(), VerifyError> {
    let mut owner: HashMap<usize, usize> = HashMap::with_capacity(mapping.len());
    for (vertex, &root) in mapping.iter().enumerate() {
        if let Some(&first) = owner.get(&root) {
            return Err(VerifyError::Injectivity {
                root,
                first,
                second: vertex,
            });
        }
        owner.insert(root, vertex);
    }
    Ok(())
}

fn check_mirror_pairing(rebuilt: &Rebuilt, mapping: &[usize]) -> Result<(), VerifyError> {
    for (vertex, &root) in mapping.iter().enumerate() {
        let expected = rebuilt.negation[root];
        let actual = mapping[rebuilt.tau[vertex]];
        if expected != actual {
            return Err(VerifyError::MirrorPairing {
                vertex,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

fn check_edge_preservation(rebuilt: &Rebuilt, mapping: &[usize]) -> Result<usize, VerifyError> {
    let one = BigRational::from_integer(BigInt::from(1));
    let mut edges_checked = 0usize;
    for u in 0..rebuilt.labels.len() {
        for v in (u + 1)..rebuilt.labels.len() {
            if !rebuilt.labels[u].adjacent(&rebuilt.labels[v]) {
                continue;
            }
            edges_checked += 1;
            if rebuilt.dot(mapping[u], mapping[v]) != one {
                return Err(VerifyError::EdgePreservation {
                    u,
                    v,
                    root_u: mapping[u],
                    root_v: mapping[v],
                });
            }
        }
    }
    Ok(edges_checked)
}

fn check_unity_sum(
    rebuilt: &Rebuilt,
    unity_indices: &[usize],
    mapping: &[usize],
) -> Result<(), VerifyError> {
    let mut sum: [BigRational; DIM] = std::array::from_fn(|_| BigRational::zero());
    for &vertex in unity_indices {
        let coords = &rebuilt.roots[mapping[vertex]];
        for (acc, c) in sum.iter_mut().zip(coords.iter()) {
            *acc += c;
        }
    }
    for (component, value) in sum.iter().enumerate() {
        if !value.is_zero() {
            return Err(VerifyError::UnitySum {
                component,
                value: fraction_string(value),
            });
        }
    }
    Ok(())
}

fn check_sign_class_count(
    rebuilt: &Rebuilt,
    declared: usize,
    mapping: &[usize],
) -> Result<usize, VerifyError> {
    let actual = mapping
        .iter()
        .map(|&r| r.min(rebuilt.negation[r]))
        .collect::<BTreeSet<usize>>()
        .len();
    if actual != declared {
        return Err(VerifyError::SignClassCount { declared, actual });
    }
    Ok(actual)
}
