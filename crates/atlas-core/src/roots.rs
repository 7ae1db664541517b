//! The E8 root system: 240 exact-rational vectors, adjacency, negation.
//!
//! All arithmetic is exact (`BigRational`); adjacency is dot product equal
//! to 1, compared exactly, never within a tolerance. Construction validates
//! every root's squared norm and the negation involution before handing the
//! value out.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::BuildError;

/// Number of roots.
pub const NUM_ROOTS: usize = 240;

/// Number of integer-type roots (two nonzero ±1 coordinates).
pub const NUM_INTEGER_ROOTS: usize = 112;

/// Number of half-integer-type roots (all coordinates ±1/2).
pub const NUM_HALF_INTEGER_ROOTS: usize = 128;

/// Dimension of the ambient space.
pub const DIM: usize = 8;

/// Shape classification of a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootType {
    /// Two nonzero coordinates, each ±1.
    Integer,
    /// All eight coordinates ±1/2, an even number negative.
    HalfInteger,
}

/// A single root vector with exact rational coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Root {
    coords: [BigRational; 8],
}

impl Root {
    fn integer(i: usize, j: usize, si: i64, sj: i64) -> Self {
        let coords = std::array::from_fn(|k| {
            if k == i {
                rational(si, 1)
            } else if k == j {
                rational(sj, 1)
            } else {
                BigRational::zero()
            }
        });
        Self { coords }
    }

    fn half_integer(sign_mask: u32) -> Self {
        let coords = std::array::from_fn(|k| {
            if sign_mask & (1 << k) == 0 {
                rational(1, 2)
            } else {
                rational(-1, 2)
            }
        });
        Self { coords }
    }

    /// The eight exact coordinates.
    #[must_use]
    pub fn coords(&self) -> &[BigRational; 8] {
        &self.coords
    }

    /// Exact dot product with another root.
    #[must_use]
    pub fn dot(&self, other: &Self) -> BigRational {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(BigRational::zero(), |acc, (a, b)| acc + a * b)
    }

    /// Exact squared norm.
    #[must_use]
    pub fn norm_squared(&self) -> BigRational {
        self.dot(self)
    }

    /// The additive inverse as a fresh vector.
    #[must_use]
    pub fn negated(&self) -> Self {
        let coords = std::array::from_fn(|k| -&self.coords[k]);
        Self { coords }
    }

    /// Shape classification: integer iff every coordinate has denominator 1.
    #[must_use]
    pub fn root_type(&self) -> RootType {
        let one = BigInt::from(1);
        if self.coords.iter().all(|c| *c.denom() == one) {
            RootType::Integer
        } else {
            RootType::HalfInteger
        }
    }

    /// Coordinates in the exact `"num/den"` textual form used by the
    /// certificate (e.g. `"1/1"`, `"-1/2"`, `"0/1"`).
    #[must_use]
    pub fn coord_strings(&self) -> [String; 8] {
        std::array::from_fn(|k| {
            let c = &self.coords[k];
            format!("{}/{}", c.numer(), c.denom())
        })
    }
}

/// The full 240-root system with adjacency and negation tables.
///
/// Immutable after construction. Root indices are stable: integer roots
/// first (axis pairs ascending, sign order `++`, `+-`, `-+`, `--`), then
/// half-integer roots by ascending sign mask.
#[derive(Debug, Clone)]
pub struct RootSystem {
    roots: Vec<Root>,
    negation: Vec<usize>,
    adjacent: Vec<bool>,
    degrees: Vec<usize>,
}

impl RootSystem {
    /// Builds the root system and checks its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the count, a squared norm, or the
    /// negation involution is wrong. These are fatal configuration errors.
    pub fn build() -> Result<Self, BuildError> {
        let mut roots = Vec::with_capacity(NUM_ROOTS);
        for i in 0..DIM {
            for j in (i + 1)..DIM {
                for (si, sj) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
                    roots.push(Root::integer(i, j, si, sj));
                }
            }
        }
        for mask in 0u32..256 {
            if mask.count_ones() % 2 == 0 {
                roots.push(Root::half_integer(mask));
            }
        }
        if roots.len() != NUM_ROOTS {
            return Err(BuildError::RootCount {
                expected: NUM_ROOTS,
                actual: roots.len(),
            });
        }

        let two = rational(2, 1);
        for (index, root) in roots.iter().enumerate() {
            let norm = root.norm_squared();
            if norm != two {
                return Err(BuildError::RootNorm {
                    index,
                    norm: format!("{}/{}", norm.numer(), norm.denom()),
                });
            }
        }

        let position: HashMap<Root, usize> = roots
            .iter()
            .enumerate()
            .map(|(i, r)| (r.clone(), i))
            .collect();
        let mut negation = Vec::with_capacity(NUM_ROOTS);
        for (index, root) in roots.iter().enumerate() {
            let partner = position
                .get(&root.negated())
                .copied()
                .ok_or(BuildError::NegationMissing { index })?;
            negation.push(partner);
        }
        for (index, &partner) in negation.iter().enumerate() {
            if partner == index || negation[partner] != index {
                return Err(BuildError::NegationBroken { index });
            }
        }

        let one = rational(1, 1);
        let mut adjacent = vec![false; NUM_ROOTS * NUM_ROOTS];
        for i in 0..NUM_ROOTS {
            for j in (i + 1)..NUM_ROOTS {
                if roots[i].dot(&roots[j]) == one {
                    adjacent[i * NUM_ROOTS + j] = true;
                    adjacent[j * NUM_ROOTS + i] = true;
                }
            }
        }
        let degrees = (0..NUM_ROOTS)
            .map(|i| {
                adjacent[i * NUM_ROOTS..(i + 1) * NUM_ROOTS]
                    .iter()
                    .filter(|&&a| a)
                    .count()
            })
            .collect();

        tracing::debug!(roots = roots.len(), "root system built");
        Ok(Self {
            roots,
            negation,
            adjacent,
            degrees,
        })
    }

    /// Number of roots (always 240).
    #[must_use]
    pub fn num_roots(&self) -> usize {
        self.roots.len()
    }

    /// The root at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn root(&self, index: usize) -> &Root {
        &self.roots[index]
    }

    /// All roots in index order.
    #[must_use]
    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Index of the additive inverse of root `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn negate(&self, index: usize) -> usize {
        self.negation[index]
    }

    /// Whether roots `i` and `j` have dot product exactly 1.
    #[must_use]
    pub fn is_adjacent(&self, i: usize, j: usize) -> bool {
        self.adjacent[i * NUM_ROOTS + j]
    }

    /// Degree of root `index` in the dot-product-1 graph.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn degree(&self, index: usize) -> usize {
        self.degrees[index]
    }

    /// The canonical sign-class representative of root `index`:
    /// the smaller of the root and its negation.
    #[must_use]
    pub fn sign_class(&self, index: usize) -> usize {
        index.min(self.negation[index])
    }
}

/// Exact rational from a numerator/denominator pair.
fn rational(num: i64, den: i64) -> BigRational {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_240_roots_in_both_shapes() {
        let system = RootSystem::build().unwrap();
        assert_eq!(system.num_roots(), NUM_ROOTS);
        let integer = system
            .roots()
            .iter()
            .filter(|r| r.root_type() == RootType::Integer)
            .count();
        assert_eq!(integer, NUM_INTEGER_ROOTS);
        assert_eq!(NUM_ROOTS - integer, NUM_HALF_INTEGER_ROOTS);
        // Integer roots occupy the leading indices.
        for i in 0..NUM_INTEGER_ROOTS {
            assert_eq!(system.root(i).root_type(), RootType::Integer);
        }
    }

    #[test]
    fn every_root_has_squared_norm_exactly_two() {
        let system = RootSystem::build().unwrap();
        let two = rational(2, 1);
        for root in system.roots() {
            assert_eq!(root.norm_squared(), two);
        }
    }

    #[test]
    fn negation_is_a_fixed_point_free_involution() {
        let system = RootSystem::build().unwrap();
        for i in 0..NUM_ROOTS {
            let n = system.negate(i);
            assert_ne!(n, i);
            assert_eq!(system.negate(n), i);
            assert_eq!(&system.root(i).negated(), system.root(n));
        }
    }

    #[test]
    fn every_root_has_56_neighbors() {
        let system = RootSystem::build().unwrap();
        for i in 0..NUM_ROOTS {
            assert_eq!(system.degree(i), 56);
        }
    }

    #[test]
    fn adjacency_is_exact_and_symmetric() {
        let system = RootSystem::build().unwrap();
        let one = rational(1, 1);
        for i in (0..NUM_ROOTS).step_by(17) {
            for j in (0..NUM_ROOTS).step_by(13) {
                let expected = i != j && system.root(i).dot(system.root(j)) == one;
                assert_eq!(system.is_adjacent(i, j), expected);
                assert_eq!(system.is_adjacent(j, i), expected);
            }
        }
    }

    #[test]
    fn coordinate_strings_are_exact_fractions() {
        let system = RootSystem::build().unwrap();
        // Root 0 is the (+1, +1) pair on the first two axes.
        assert_eq!(
            system.root(0).coord_strings(),
            ["1/1", "1/1", "0/1", "0/1", "0/1", "0/1", "0/1", "0/1"]
        );
        // The all-positive half-integer root sits right after the 112
        // integer roots.
        assert_eq!(
            system.root(NUM_INTEGER_ROOTS).coord_strings(),
            ["1/2", "1/2", "1/2", "1/2", "1/2", "1/2", "1/2", "1/2"]
        );
    }

    #[test]
    fn sign_class_representative_is_the_smaller_index() {
        let system = RootSystem::build().unwrap();
        for i in 0..NUM_ROOTS {
            let rep = system.sign_class(i);
            assert_eq!(rep, system.sign_class(system.negate(i)));
            assert!(rep <= i);
        }
    }
}
