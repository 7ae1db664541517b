//! Label symmetries and canonical selection among solutions.
//!
//! The symmetry group is S4 acting on the four designated flip coordinates
//! (`e1`, `e2`, `e3`, `e6`); the ternary field and the mirror field are
//! fixed by every element, so the action commutes with both adjacency and
//! the mirror involution. Canonical selection is a total order over
//! mappings, making the chosen representative independent of the order in
//! which solutions were found.

use crate::atlas::Atlas;
use crate::label::Label;
use crate::roots::{RootSystem, RootType};
use crate::search::Mapping;

/// Order of the label symmetry group.
pub const GROUP_ORDER: usize = 24;

/// Human-readable description of the group, stored in certificates.
pub const GROUP_DESCRIPTION: &str = "S4 on flip coordinates e1,e2,e3,e6 (order 24)";

/// One group element: a permutation of the four flip coordinates.
///
/// `perm[i]` names the source slot feeding flip coordinate `i`, with slots
/// ordered `(e1, e2, e3, e6)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipPermutation {
    perm: [usize; 4],
}

impl FlipPermutation {
    /// The identity element.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            perm: [0, 1, 2, 3],
        }
    }

    /// Applies the permutation to a label; `d45` and `e7` are untouched.
    #[must_use]
    pub fn apply(&self, label: &Label) -> Label {
        let slots = [label.e1(), label.e2(), label.e3(), label.e6()];
        Label::new(
            slots[self.perm[0]],
            slots[self.perm[1]],
            slots[self.perm[2]],
            label.d45(),
            slots[self.perm[3]],
            label.e7(),
        )
    }
}

/// All 24 group elements in lexicographic order of their permutation arrays.
#[must_use]
pub fn group_elements() -> Vec<FlipPermutation> {
    let mut elements = Vec::with_capacity(GROUP_ORDER);
    let mut slots = [0usize, 1, 2, 3];
    permute(&mut slots, 0, &mut elements);
    elements.sort_by_key(|e| e.perm);
    elements
}

fn permute(slots: &mut [usize; 4], depth: usize, out: &mut Vec<FlipPermutation>) {
    if depth == slots.len() {
        out.push(FlipPermutation { perm: *slots });
        return;
    }
    for i in depth..slots.len() {
        slots.swap(depth, i);
        permute(slots, depth + 1, out);
        slots.swap(depth, i);
    }
}

/// The symmetry group realized as vertex permutations of a built Atlas.
#[derive(Debug, Clone)]
pub struct Symmetries<'a> {
    atlas: &'a Atlas,
    roots: &'a RootSystem,
    vertex_perms: Vec<Vec<usize>>,
}

impl<'a> Symmetries<'a> {
    /// Precomputes the 24 vertex permutations induced by the group.
    #[must_use]
    pub fn new(atlas: &'a Atlas, roots: &'a RootSystem) -> Self {
        let vertex_perms = group_elements()
            .iter()
            .map(|element| {
                (0..atlas.num_vertices())
                    .map(|v| {
                        let image = element.apply(atlas.get_label(v));
                        atlas
                            .vertex_of(&image)
                            .expect("permuted label stays within the label set")
                    })
                    .collect()
            })
            .collect();
        Self {
            atlas,
            roots,
            vertex_perms,
        }
    }

    /// Number of group elements.
    #[must_use]
    pub fn order(&self) -> usize {
        self.vertex_perms.len()
    }

    /// The mapping obtained by relabeling `mapping` with group element
    /// `element` and re-deriving the root assignment.
    ///
    /// # Panics
    ///
    /// Panics if `element >= 24` or the mapping is not 96 entries long.
    #[must_use]
    pub fn transform_mapping(&self, element: usize, mapping: &Mapping) -> Mapping {
        let sigma = &self.vertex_perms[element];
        let mut out = vec![0usize; mapping.len()];
        for (v, &root) in mapping.iter().enumerate() {
            out[sigma[v]] = root;
        }
        out
    }

    /// The τ-pair equivalence key: each mirror pair collapsed to the smaller
    /// of its two image indices, the 48 values sorted ascending.
    ///
    /// Two mappings related by relabeling-plus-mirror symmetry share a key.
    #[must_use]
    pub fn equivalence_key(&self, mapping: &Mapping) -> Vec<usize> {
        let mut key: Vec<usize> = (0..mapping.len())
            .filter(|&v| v < self.atlas.tau(v))
            .map(|v| mapping[v].min(mapping[self.atlas.tau(v)]))
            .collect();
        key.sort_unstable();
        key
    }

    /// The equivalence key minimized over the mapping's whole orbit.
    #[must_use]
    pub fn orbit_key(&self, mapping: &Mapping) -> Vec<usize> {
        (0..self.order())
            .map(|g| self.equivalence_key(&self.transform_mapping(g, mapping)))
            .min()
            .expect("group has at least the identity element")
    }

    /// Number of distinct mappings in the orbit.
    #[must_use]
    pub fn orbit_size(&self, mapping: &Mapping) -> usize {
        let mut images: Vec<Mapping> = (0..self.order())
            .map(|g| self.transform_mapping(g, mapping))
            .collect();
        images.sort_unstable();
        images.dedup();
        images.len()
    }

    /// Number of group elements fixing the mapping exactly.
    #[must_use]
    pub fn stabilizer_size(&self, mapping: &Mapping) -> usize {
        (0..self.order())
            .filter(|&g| self.transform_mapping(g, mapping) == *mapping)
            .count()
    }

    /// Count of integer-type roots in the mapping's image.
    #[must_use]
    pub fn integer_root_count(&self, mapping: &Mapping) -> usize {
        mapping
            .iter()
            .filter(|&&r| self.roots.root(r).root_type() == RootType::Integer)
            .count()
    }

    /// Selects the canonical mapping among candidates.
    ///
    /// Ordering: lexicographically smallest orbit-minimized key, then the
    /// larger integer-root count, then the lexicographically smallest raw
    /// mapping tuple. The order is total, so the choice is deterministic and
    /// independent of candidate order. Returns `None` for an empty slice.
    #[must_use]
    pub fn canonical_choice<'m>(&self, candidates: &'m [Mapping]) -> Option<&'m Mapping> {
        candidates.iter().min_by(|a, b| {
            self.orbit_key(a)
                .cmp(&self.orbit_key(b))
                .then_with(|| self.integer_root_count(b).cmp(&self.integer_root_count(a)))
                .then_with(|| a.cmp(b))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::atlas::Atlas;
    use crate::roots::RootSystem;

    #[test]
    fn group_has_24_distinct_elements_including_identity() {
        let elements = group_elements();
        assert_eq!(elements.len(), GROUP_ORDER);
        let distinct: HashSet<[usize; 4]> = elements.iter().map(|e| e.perm).collect();
        assert_eq!(distinct.len(), GROUP_ORDER);
        assert_eq!(elements[0], FlipPermutation::identity());
    }

    #[test]
    fn every_element_permutes_the_label_set() {
        let labels = Label::enumerate();
        let all: HashSet<Label> = labels.iter().copied().collect();
        for element in group_elements() {
            let image: HashSet<Label> = labels.iter().map(|l| element.apply(l)).collect();
            assert_eq!(image, all);
        }
    }

    #[test]
    fn action_preserves_adjacency_and_mirror() {
        let labels = Label::enumerate();
        for element in group_elements().into_iter().take(6) {
            for a in labels.iter().take(24) {
                assert_eq!(element.apply(&a.mirror()), element.apply(a).mirror());
                for b in &labels {
                    assert_eq!(
                        a.is_adjacent(b),
                        element.apply(a).is_adjacent(&element.apply(b))
                    );
                }
            }
        }
    }

    #[test]
    fn identity_transform_is_a_no_op() {
        let atlas = Atlas::build().unwrap();
        let roots = RootSystem::build().unwrap();
        let symmetries = Symmetries::new(&atlas, &roots);
        let mapping: Mapping = (0..96).collect();
        assert_eq!(symmetries.transform_mapping(0, &mapping), mapping);
    }

    #[test]
    fn equivalence_key_is_invariant_under_the_mirror_swap() {
        let atlas = Atlas::build().unwrap();
        let roots = RootSystem::build().unwrap();
        let symmetries = Symmetries::new(&atlas, &roots);
        // A synthetic mapping; keys only read τ-pair structure, not edge
        // validity.
        let mapping: Mapping = (0..96).collect();
        let mut swapped = mapping.clone();
        for v in 0..96 {
            swapped[v] = mapping[atlas.tau(v)];
        }
        assert_eq!(
            symmetries.equivalence_key(&mapping),
            symmetries.equivalence_key(&swapped)
        );
    }

    #[test]
    fn canonical_choice_of_empty_slice_is_none() {
        let atlas = Atlas::build().unwrap();
        let roots = RootSystem::build().unwrap();
        let symmetries = Symmetries::new(&atlas, &roots);
        assert!(symmetries.canonical_choice(&[]).is_none());
    }
}
