//! The Atlas graph: 96 labeled vertices, flip adjacency, mirror involution.
//!
//! Construction is deterministic and input-free. Every structural invariant
//! is checked before the value is handed out; a violation means the
//! generation rules themselves are wrong and aborts the build.

use std::collections::HashMap;

use crate::error::BuildError;
use crate::label::{Label, NUM_LABELS};

/// The fixed 96-vertex labeled graph together with its mirror involution.
///
/// Immutable after construction. Vertices are indices into the label array
/// in enumeration order, so `tau(v)` is always `v ^ 1` for the fixed order,
/// though callers should go through [`Atlas::tau`] rather than rely on that.
#[derive(Debug, Clone)]
pub struct Atlas {
    labels: Vec<Label>,
    neighbors: Vec<Vec<usize>>,
    tau: Vec<usize>,
    index_of: HashMap<Label, usize>,
}

impl Atlas {
    /// Number of vertices.
    pub const NUM_VERTICES: usize = NUM_LABELS;

    /// Builds the Atlas graph and checks its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the enumeration count, degree range,
    /// mirror involution, or mirror-pair/edge separation invariants are
    /// violated. These are fatal configuration errors.
    pub fn build() -> Result<Self, BuildError> {
        let labels = Label::enumerate();
        if labels.len() != Self::NUM_VERTICES {
            return Err(BuildError::VertexCount {
                expected: Self::NUM_VERTICES,
                actual: labels.len(),
            });
        }

        let index_of: HashMap<Label, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, i))
            .collect();

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); labels.len()];
        for (u, a) in labels.iter().enumerate() {
            for (v, b) in labels.iter().enumerate() {
                if u < v && a.is_adjacent(b) {
                    neighbors[u].push(v);
                    neighbors[v].push(u);
                }
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        let mut tau = Vec::with_capacity(labels.len());
        for label in &labels {
            let mirror = label.mirror();
            let partner = index_of
                .get(&mirror)
                .copied()
                .expect("mirror of an enumerated label is itself enumerated");
            tau.push(partner);
        }

        let atlas = Self {
            labels,
            neighbors,
            tau,
            index_of,
        };
        atlas.check_invariants()?;
        tracing::debug!(
            vertices = atlas.num_vertices(),
            edges = atlas.edge_count(),
            "atlas graph built"
        );
        Ok(atlas)
    }

    fn check_invariants(&self) -> Result<(), BuildError> {
        for v in 0..self.num_vertices() {
            let degree = self.degree(v);
            if degree != 5 && degree != 6 {
                return Err(BuildError::DegreeOutOfRange { vertex: v, degree });
            }
            let t = self.tau(v);
            if t == v {
                return Err(BuildError::MirrorFixedPoint { vertex: v });
            }
            if self.tau(t) != v {
                return Err(BuildError::MirrorNotInvolution { vertex: v });
            }
            if self.is_edge(v, t) {
                return Err(BuildError::MirrorPairIsEdge {
                    vertex: v,
                    mirror: t,
                });
            }
        }
        Ok(())
    }

    /// Number of vertices (always 96).
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    /// The label of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[must_use]
    pub fn get_label(&self, v: usize) -> &Label {
        &self.labels[v]
    }

    /// All labels in vertex order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The vertex carrying `label`, if any.
    #[must_use]
    pub fn vertex_of(&self, label: &Label) -> Option<usize> {
        self.index_of.get(label).copied()
    }

    /// Sorted neighbor list of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[must_use]
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.neighbors[v]
    }

    /// Degree of vertex `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[must_use]
    pub fn degree(&self, v: usize) -> usize {
        self.neighbors[v].len()
    }

    /// The mirror image of vertex `v` under the involution.
    ///
    /// # Panics
    ///
    /// Panics if `v` is out of range.
    #[must_use]
    pub fn tau(&self, v: usize) -> usize {
        self.tau[v]
    }

    /// Whether `u` and `v` are joined by an edge.
    #[must_use]
    pub fn is_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors[u].binary_search(&v).is_ok()
    }

    /// All edges as `(u, v)` pairs with `u < v`, in lexicographic order.
    #[must_use]
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.edge_count());
        for (u, list) in self.neighbors.iter().enumerate() {
            for &v in list {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_expected_shape() {
        let atlas = Atlas::build().unwrap();
        assert_eq!(atlas.num_vertices(), 96);
        assert_eq!(atlas.edge_count(), 256);
    }

    #[test]
    fn degree_distribution_is_64_fives_and_32_sixes() {
        let atlas = Atlas::build().unwrap();
        let fives = (0..96).filter(|&v| atlas.degree(v) == 5).count();
        let sixes = (0..96).filter(|&v| atlas.degree(v) == 6).count();
        assert_eq!(fives, 64);
        assert_eq!(sixes, 32);
        // Degree 6 exactly when the ternary field sits at 0.
        for v in 0..96 {
            assert_eq!(atlas.degree(v) == 6, atlas.get_label(v).d45() == 0);
        }
    }

    #[test]
    fn tau_is_a_fixed_point_free_involution_and_never_an_edge() {
        let atlas = Atlas::build().unwrap();
        for v in 0..96 {
            let t = atlas.tau(v);
            assert_ne!(t, v);
            assert_eq!(atlas.tau(t), v);
            assert!(!atlas.is_edge(v, t));
        }
    }

    #[test]
    fn tau_pairs_consecutive_indices_in_enumeration_order() {
        let atlas = Atlas::build().unwrap();
        for v in 0..96 {
            assert_eq!(atlas.tau(v), v ^ 1);
        }
    }

    #[test]
    fn neighbor_lists_are_symmetric() {
        let atlas = Atlas::build().unwrap();
        for u in 0..96 {
            for &v in atlas.neighbors(u) {
                assert!(atlas.neighbors(v).contains(&u));
            }
        }
    }

    #[test]
    fn label_lookup_inverts_get_label() {
        let atlas = Atlas::build().unwrap();
        for v in 0..96 {
            assert_eq!(atlas.vertex_of(atlas.get_label(v)), Some(v));
        }
    }
}
