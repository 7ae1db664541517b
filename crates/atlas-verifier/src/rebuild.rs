//! From-scratch reconstruction of every invariant table.
//!
//! Nothing here consults the generator or the search: labels are re-parsed,
//! the mirror involution and adjacency are re-derived from the label
//! semantics, root coordinates are re-parsed as exact fractions, norms are
//! re-checked and the negation table is rebuilt by exact vector lookup.

use std::collections::HashMap;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::VerifyError;
use crate::schema::{CertificateDoc, DIM, NUM_ROOTS, NUM_VERTICES};

/// A re-parsed label: the six components as small integers, in field order
/// `(e1, e2, e3, d45, e6, e7)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelBits([i8; 6]);

/// Positions of the four designated flip fields within the component array.
const FLIP_POSITIONS: [usize; 4] = [0, 1, 2, 4];

/// Position of the ternary field.
const TERNARY_POSITION: usize = 3;

/// Position of the mirror field.
const MIRROR_POSITION: usize = 5;

impl LabelBits {
    /// Parses the textual form `"e1,e2,e3,d45,e6,e7"`.
    ///
    /// # Errors
    ///
    /// Returns a structural [`VerifyError`] on malformed input.
    pub fn parse(text: &str) -> Result<Self, VerifyError> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() != 6 {
            return Err(VerifyError::Structure {
                reason: format!("label {text:?} does not have 6 components"),
            });
        }
        let mut components = [0i8; 6];
        for (i, part) in parts.iter().enumerate() {
            let value: i8 = part.parse().map_err(|_| VerifyError::Structure {
                reason: format!("label component {part:?} is not an integer"),
            })?;
            let valid = if i == TERNARY_POSITION {
                (-1..=1).contains(&value)
            } else {
                (0..=1).contains(&value)
            };
            if !valid {
                return Err(VerifyError::Structure {
                    reason: format!("label component {i} out of range in {text:?}"),
                });
            }
            components[i] = value;
        }
        Ok(Self(components))
    }

    /// The label with the mirror field flipped.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut components = self.0;
        components[MIRROR_POSITION] = 1 - components[MIRROR_POSITION];
        Self(components)
    }

    /// Atlas adjacency, re-derived from the label semantics: one designated
    /// flip with everything else equal, or a single ternary step with all
    /// binary fields equal. The mirror field never participates.
    #[must_use]
    pub fn adjacent(&self, other: &Self) -> bool {
        if self.0[MIRROR_POSITION] != other.0[MIRROR_POSITION] {
            return false;
        }
        let flips = FLIP_POSITIONS
            .iter()
            .filter(|&&p| self.0[p] != other.0[p])
            .count();
        let step = (self.0[TERNARY_POSITION] - other.0[TERNARY_POSITION]).abs();
        match step {
            0 => flips == 1,
            1 => flips == 0,
            _ => false,
        }
    }
}

/// Everything rebuilt from the embedded data.
#[derive(Debug)]
pub struct Rebuilt {
    /// Re-parsed labels in vertex order.
    pub labels: Vec<LabelBits>,
    /// Re-derived mirror involution.
    pub tau: Vec<usize>,
    /// Re-parsed exact root vectors in index order.
    pub roots: Vec<[BigRational; 8]>,
    /// Rebuilt negation table.
    pub negation: Vec<usize>,
}

impl Rebuilt {
    /// Rebuilds labels, τ, roots and the negation table from a document.
    ///
    /// # Errors
    ///
    /// Syntax problems surface as structural errors; semantic problems
    /// (duplicate labels, a missing mirror partner, a wrong norm, a broken
    /// negation table) surface as rebuild errors.
    pub fn from_doc(doc: &CertificateDoc) -> Result<Self, VerifyError> {
        let labels = doc
            .atlas_labels
            .iter()
            .map(|text| LabelBits::parse(text))
            .collect::<Result<Vec<_>, _>>()?;

        let mut position: HashMap<LabelBits, usize> = HashMap::with_capacity(labels.len());
        for (v, label) in labels.iter().enumerate() {
            if position.insert(*label, v).is_some() {
                return Err(VerifyError::Rebuild {
                    reason: format!("label {} appears more than once", doc.atlas_labels[v]),
                });
            }
        }

        let tau = labels
            .iter()
            .enumerate()
            .map(|(v, label)| {
                position
                    .get(&label.mirrored())
                    .copied()
                    .ok_or_else(|| VerifyError::Rebuild {
                        reason: format!("vertex {v} has no mirror partner in the label set"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (v, &t) in tau.iter().enumerate() {
            if t == v || tau[t] != v {
                return Err(VerifyError::Rebuild {
                    reason: format!("rebuilt mirror involution is broken at vertex {v}"),
                });
            }
        }

        let roots = parse_roots(doc)?;
        let two = BigRational::from_integer(BigInt::from(2));
        for (index, root) in roots.iter().enumerate() {
            let norm = dot(root, root);
            if norm != two {
                return Err(VerifyError::Rebuild {
                    reason: format!(
                        "root {index} has squared norm {}, expected 2",
                        fraction_string(&norm)
                    ),
                });
            }
        }

        let mut root_position: HashMap<[BigRational; 8], usize> =
            HashMap::with_capacity(roots.len());
        for (i, root) in roots.iter().enumerate() {
            root_position.insert(root.clone(), i);
        }
        let negation = roots
            .iter()
            .enumerate()
            .map(|(index, root)| {
                let negated: [BigRational; 8] = std::array::from_fn(|k| -&root[k]);
                root_position
                    .get(&negated)
                    .copied()
                    .ok_or_else(|| VerifyError::Rebuild {
                        reason: format!("root {index} has no negation partner in the root set"),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (index, &partner) in negation.iter().enumerate() {
            if partner == index || negation[partner] != index {
                return Err(VerifyError::Rebuild {
                    reason: format!("rebuilt negation table is broken at root {index}"),
                });
            }
        }

        Ok(Self {
            labels,
            tau,
            roots,
            negation,
        })
    }

    /// Exact dot product of two rebuilt roots.
    #[must_use]
    pub fn dot(&self, i: usize, j: usize) -> BigRational {
        dot(&self.roots[i], &self.roots[j])
    }

    /// Whether a rebuilt root has only integer coordinates.
    #[must_use]
    pub fn is_integer_root(&self, index: usize) -> bool {
        self.roots[index].iter().all(|c| c.denom().is_one())
    }
}

fn parse_roots(doc: &CertificateDoc) -> Result<Vec<[BigRational; 8]>, VerifyError> {
    let mut roots = Vec::with_capacity(NUM_ROOTS);
    for index in 0..NUM_ROOTS {
        let key = index.to_string();
        let coords = doc.roots.get(&key).ok_or_else(|| VerifyError::Structure {
            reason: format!("root {index} is missing"),
        })?;
        if coords.len() != DIM {
            return Err(VerifyError::Structure {
                reason: format!("root {index} has {} coordinates, expected {DIM}", coords.len()),
            });
        }
        let mut vector: Vec<BigRational> = Vec::with_capacity(DIM);
        for text in coords {
            vector.push(parse_fraction(text)?);
        }
        let array: [BigRational; 8] = vector
            .try_into()
            .map_err(|_| VerifyError::Structure {
                reason: format!("root {index} has the wrong coordinate count"),
            })?;
        roots.push(array);
    }
    Ok(roots)
}

/// Parses an exact `"num/den"` fraction.
///
/// # Errors
///
/// Returns a structural [`VerifyError`] on malformed input, including a
/// zero or negative denominator.
pub fn parse_fraction(text: &str) -> Result<BigRational, VerifyError> {
    let (num_text, den_text) = text.split_once('/').ok_or_else(|| VerifyError::Structure {
        reason: format!("coordinate {text:?} is not a num/den fraction"),
    })?;
    let numer = BigInt::from_str(num_text.trim()).map_err(|_| VerifyError::Structure {
        reason: format!("coordinate numerator {num_text:?} is not an integer"),
    })?;
    let denom = BigInt::from_str(den_text.trim()).map_err(|_| VerifyError::Structure {
        reason: format!("coordinate denominator {den_text:?} is not an integer"),
    })?;
    if denom.is_zero() || denom.is_negative() {
        return Err(VerifyError::Structure {
            reason: format!("coordinate {text:?} has a non-positive denominator"),
        });
    }
    Ok(BigRational::new(numer, denom))
}

/// Renders an exact fraction as `"num/den"`.
#[must_use]
pub fn fraction_string(value: &BigRational) -> String {
    format!("{}/{}", value.numer(), value.denom())
}

fn dot(a: &[BigRational; 8], b: &[BigRational; 8]) -> BigRational {
    a.iter()
        .zip(b.iter())
        .fold(BigRational::zero(), |acc, (x, y)| acc + x * y)
}

/// Parses and range-checks the mapping into a dense vertex-indexed array.
///
/// # Errors
///
/// Returns a structural [`VerifyError`] when an entry is missing, is not an
/// integer, or is out of range.
pub fn parse_mapping(doc: &CertificateDoc) -> Result<Vec<usize>, VerifyError> {
    let mut mapping = Vec::with_capacity(NUM_VERTICES);
    for vertex in 0..NUM_VERTICES {
        let key = vertex.to_string();
        let text = doc.mapping.get(&key).ok_or_else(|| VerifyError::Structure {
            reason: format!("mapping entry for vertex {vertex} is missing"),
        })?;
        let root: usize = text.parse().map_err(|_| VerifyError::Structure {
            reason: format!("mapping entry for vertex {vertex} is not an integer: {text:?}"),
        })?;
        if root >= NUM_ROOTS {
            return Err(VerifyError::Structure {
                reason: format!("mapping entry for vertex {vertex} is out of range: {root}"),
            });
        }
        mapping.push(root);
    }
    Ok(mapping)
}
