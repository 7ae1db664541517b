//! Backtracking constraint search for Atlas-to-E8 embeddings.
//!
//! The search walks vertex positions 0..95 in a fixed order. Assigning a
//! vertex to a root simultaneously assigns its mirror vertex to the negated
//! root, so one step consumes a whole τ-pair; an explicit undo log makes
//! every step exactly reversible on backtrack. The only outputs are complete
//! mappings satisfying every invariant; an exhausted search returns an empty
//! list.

use std::collections::BTreeSet;

use num_rational::BigRational;
use num_traits::Zero;

use crate::atlas::Atlas;
use crate::error::SearchError;
use crate::roots::{RootSystem, DIM, NUM_ROOTS};

/// A completed vertex-to-root assignment, indexed by vertex.
pub type Mapping = Vec<usize>;

/// Configuration for one search invocation.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Vertices whose images must sum to the zero vector.
    pub unity_indices: Vec<usize>,
    /// Required count of distinct sign classes in the image, if any.
    pub target_sign_classes: Option<usize>,
    /// Pre-pinned `(vertex, root)` assignments applied before the search.
    pub pins: Vec<(usize, usize)>,
    /// Stop after this many solutions.
    pub max_solutions: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unity_indices: Vec::new(),
            target_sign_classes: None,
            pins: Vec::new(),
            max_solutions: 1,
        }
    }
}

/// The search driver over a pair of built graphs.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    atlas: &'a Atlas,
    roots: &'a RootSystem,
}

impl<'a> SearchEngine<'a> {
    /// Creates an engine over the two immutable graphs.
    #[must_use]
    pub fn new(atlas: &'a Atlas, roots: &'a RootSystem) -> Self {
        Self { atlas, roots }
    }

    /// Runs the search and returns every solution found, up to the cap.
    ///
    /// Zero solutions is an expected outcome and returns `Ok` with an empty
    /// list; only a rejected configuration (bad pins or unity indices) is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns a [`SearchError`] when a pin or unity index is out of range,
    /// or when pins conflict with each other (directly or through the
    /// mirror-pairing law).
    pub fn run(&self, config: &SearchConfig) -> Result<Vec<Mapping>, SearchError> {
        self.validate(config)?;
        let mut ctx = SearchContext::new(self.atlas, self.roots, config);
        if !ctx.apply_pins(&config.pins)? {
            tracing::debug!("pins are edge-inconsistent, search space empty");
            return Ok(Vec::new());
        }
        tracing::debug!(
            pins = config.pins.len(),
            unity = config.unity_indices.len(),
            max_solutions = config.max_solutions,
            "search started"
        );
        ctx.search(0);
        tracing::debug!(solutions = ctx.solutions.len(), "search finished");
        Ok(ctx.solutions)
    }

    fn validate(&self, config: &SearchConfig) -> Result<(), SearchError> {
        let vertices = self.atlas.num_vertices();
        for &v in &config.unity_indices {
            if v >= vertices {
                return Err(SearchError::UnityIndexOutOfRange {
                    vertex: v,
                    limit: vertices,
                });
            }
        }
        for &(v, r) in &config.pins {
            if v >= vertices {
                return Err(SearchError::PinVertexOutOfRange {
                    vertex: v,
                    limit: vertices,
                });
            }
            if r >= self.roots.num_roots() {
                return Err(SearchError::PinRootOutOfRange {
                    root: r,
                    limit: self.roots.num_roots(),
                });
            }
        }
        Ok(())
    }
}

/// One reversible step of the undo log.
struct Frame {
    first: (usize, usize),
    second: Option<(usize, usize)>,
}

/// Mutable search state, exclusively owned by one `run` invocation.
struct SearchContext<'a> {
    atlas: &'a Atlas,
    roots: &'a RootSystem,
    assignment: Vec<Option<usize>>,
    used: Vec<bool>,
    unity_mask: Vec<bool>,
    unity_sum: [BigRational; DIM],
    undo_log: Vec<Frame>,
    solutions: Vec<Mapping>,
    max_solutions: usize,
    target_sign_classes: Option<usize>,
}

impl<'a> SearchContext<'a> {
    fn new(atlas: &'a Atlas, roots: &'a RootSystem, config: &SearchConfig) -> Self {
        let mut unity_mask = vec![false; atlas.num_vertices()];
        for &v in &config.unity_indices {
            unity_mask[v] = true;
        }
        Self {
            atlas,
            roots,
            assignment: vec![None; atlas.num_vertices()],
            used: vec![false; roots.num_roots()],
            unity_mask,
            unity_sum: std::array::from_fn(|_| BigRational::zero()),
            undo_log: Vec::with_capacity(atlas.num_vertices() / 2),
            solutions: Vec::new(),
            max_solutions: config.max_solutions,
            target_sign_classes: config.target_sign_classes,
        }
    }

    /// Applies pins as paired assignments. Returns `Ok(false)` when the pins
    /// are mutually edge-inconsistent (an empty search space, not an error).
    fn apply_pins(&mut self, pins: &[(usize, usize)]) -> Result<bool, SearchError> {
        for &(v, r) in pins {
            match self.assignment[v] {
                Some(existing) if existing == r => continue,
                Some(_) => return Err(SearchError::ConflictingPin { vertex: v }),
                None => {}
            }
            if self.used[r] || self.used[self.roots.negate(r)] {
                return Err(SearchError::DuplicatePinnedRoot { root: r });
            }
            if !self.admissible_pair(v, r) {
                return Ok(false);
            }
            self.assign_pair(v, r);
        }
        Ok(true)
    }

    fn search(&mut self, pos: usize) {
        if self.solutions.len() >= self.max_solutions {
            return;
        }
        if pos == self.atlas.num_vertices() {
            self.accept();
            return;
        }
        if self.assignment[pos].is_some() {
            self.search(pos + 1);
            return;
        }

        let mirror = self.atlas.tau(pos);
        if let Some(mirror_root) = self.assignment[mirror] {
            // Mirror-pairing leaves a single legal value.
            let forced = self.roots.negate(mirror_root);
            if !self.used[forced] && self.admissible_single(pos, forced) {
                self.assign_single(pos, forced);
                self.search(pos + 1);
                self.undo();
            }
            return;
        }

        for r in 0..NUM_ROOTS {
            if self.used[r] || self.used[self.roots.negate(r)] {
                continue;
            }
            if !self.admissible_pair(pos, r) {
                continue;
            }
            self.assign_pair(pos, r);
            self.search(pos + 1);
            self.undo();
            if self.solutions.len() >= self.max_solutions {
                return;
            }
        }
    }

    /// Whether assigning `v -> r` and `tau(v) -> negate(r)` respects degrees
    /// and every edge into the already-assigned region.
    fn admissible_pair(&self, v: usize, r: usize) -> bool {
        let mirror = self.atlas.tau(v);
        let negated = self.roots.negate(r);
        self.admissible_single(v, r) && self.admissible_single(mirror, negated)
    }

    fn admissible_single(&self, v: usize, r: usize) -> bool {
        if self.roots.degree(r) < self.atlas.degree(v) {
            return false;
        }
        self.atlas
            .neighbors(v)
            .iter()
            .all(|&w| match self.assignment[w] {
                Some(s) => self.roots.is_adjacent(r, s),
                None => true,
            })
    }

    fn assign_pair(&mut self, v: usize, r: usize) {
        let mirror = self.atlas.tau(v);
        let negated = self.roots.negate(r);
        self.place(v, r);
        self.place(mirror, negated);
        self.undo_log.push(Frame {
            first: (v, r),
            second: Some((mirror, negated)),
        });
    }

    fn assign_single(&mut self, v: usize, r: usize) {
        self.place(v, r);
        self.undo_log.push(Frame {
            first: (v, r),
            second: None,
        });
    }

    fn place(&mut self, v: usize, r: usize) {
        self.assignment[v] = Some(r);
        self.used[r] = true;
        if self.unity_mask[v] {
            let coords = self.roots.root(r).coords();
            for (acc, c) in self.unity_sum.iter_mut().zip(coords.iter()) {
                *acc += c;
            }
        }
    }

    fn undo(&mut self) {
        let frame = self
            .undo_log
            .pop()
            .expect("undo called with an empty undo log");
        if let Some((v, r)) = frame.second {
            self.unplace(v, r);
        }
        let (v, r) = frame.first;
        self.unplace(v, r);
    }

    fn unplace(&mut self, v: usize, r: usize) {
        self.assignment[v] = None;
        self.used[r] = false;
        if self.unity_mask[v] {
            let coords = self.roots.root(r).coords();
            for (acc, c) in self.unity_sum.iter_mut().zip(coords.iter()) {
                *acc -= c;
            }
        }
    }

    fn accept(&mut self) {
        if !self.unity_sum.iter().all(Zero::is_zero) {
            return;
        }
        let mapping: Mapping = self
            .assignment
            .iter()
            .map(|a| a.expect("assignment is total at the final position"))
            .collect();
        if let Some(target) = self.target_sign_classes {
            if sign_class_count(self.roots, &mapping) != target {
                return;
            }
        }
        tracing::debug!(solution = self.solutions.len() + 1, "solution recorded");
        self.solutions.push(mapping);
    }
}

/// Number of distinct sign classes appearing in a mapping's image.
#[must_use]
pub fn sign_class_count(roots: &RootSystem, mapping: &Mapping) -> usize {
    mapping
        .iter()
        .map(|&r| roots.sign_class(r))
        .collect::<BTreeSet<usize>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Atlas;
    use crate::roots::RootSystem;

    fn graphs() -> (Atlas, RootSystem) {
        (Atlas::build().unwrap(), RootSystem::build().unwrap())
    }

    #[test]
    fn rejects_out_of_range_pins() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        let config = SearchConfig {
            pins: vec![(96, 0)],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::PinVertexOutOfRange { vertex: 96, .. })
        ));
        let config = SearchConfig {
            pins: vec![(0, 240)],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::PinRootOutOfRange { root: 240, .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_unity_indices() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        let config = SearchConfig {
            unity_indices: vec![7, 120],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::UnityIndexOutOfRange { vertex: 120, .. })
        ));
    }

    #[test]
    fn rejects_conflicting_pins() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        // Vertex 0 pinned twice with different roots.
        let config = SearchConfig {
            pins: vec![(0, 0), (0, 5)],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::ConflictingPin { vertex: 0 })
        ));
        // Mirror pinned to something other than the negated root.
        let tau0 = atlas.tau(0);
        let wrong = {
            let negated = roots.negate(0);
            (0..roots.num_roots())
                .find(|&r| r != 0 && r != negated)
                .unwrap()
        };
        let config = SearchConfig {
            pins: vec![(0, 0), (tau0, wrong)],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::ConflictingPin { .. }) | Err(SearchError::DuplicatePinnedRoot { .. })
        ));
    }

    #[test]
    fn mirror_consistent_pin_pair_is_accepted_as_given() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        // Pinning both halves of a mirror pair consistently is redundant but
        // legal.
        let config = SearchConfig {
            pins: vec![(0, 0), (atlas.tau(0), roots.negate(0))],
            max_solutions: 0,
            ..SearchConfig::default()
        };
        assert_eq!(engine.run(&config).unwrap(), Vec::<Mapping>::new());
    }

    #[test]
    fn duplicate_pinned_root_is_rejected() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        let config = SearchConfig {
            pins: vec![(0, 0), (4, 0)],
            ..SearchConfig::default()
        };
        assert!(matches!(
            engine.run(&config),
            Err(SearchError::DuplicatePinnedRoot { root: 0 })
        ));
    }

    #[test]
    fn zero_solution_cap_returns_empty() {
        let (atlas, roots) = graphs();
        let engine = SearchEngine::new(&atlas, &roots);
        let config = SearchConfig {
            max_solutions: 0,
            ..SearchConfig::default()
        };
        assert!(engine.run(&config).unwrap().is_empty());
    }
}
