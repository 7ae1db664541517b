//! End-to-end search scenarios over the full graphs.

use std::sync::OnceLock;

use atlas_core::{sign_class_count, Atlas, RootSystem, SearchConfig, SearchEngine};

fn graphs() -> &'static (Atlas, RootSystem) {
    static GRAPHS: OnceLock<(Atlas, RootSystem)> = OnceLock::new();
    GRAPHS.get_or_init(|| (Atlas::build().unwrap(), RootSystem::build().unwrap()))
}

/// Checks every invariant an accepted mapping must satisfy.
fn assert_valid_embedding(atlas: &Atlas, roots: &RootSystem, mapping: &[usize]) {
    assert_eq!(mapping.len(), atlas.num_vertices());

    let mut seen = vec![false; roots.num_roots()];
    for &r in mapping {
        assert!(!seen[r], "mapping is not injective at root {r}");
        seen[r] = true;
    }

    for v in 0..atlas.num_vertices() {
        assert_eq!(
            roots.negate(mapping[v]),
            mapping[atlas.tau(v)],
            "mirror-pairing law fails at vertex {v}"
        );
    }

    for (u, v) in atlas.edges() {
        assert!(
            roots.is_adjacent(mapping[u], mapping[v]),
            "edge ({u}, {v}) maps to non-adjacent roots"
        );
    }
}

#[test]
fn unconstrained_search_finds_a_48_sign_class_embedding() {
    let (atlas, roots) = graphs();
    let unity = vec![0, atlas.tau(0)];
    let config = SearchConfig {
        unity_indices: unity,
        target_sign_classes: Some(48),
        ..SearchConfig::default()
    };
    let solutions = SearchEngine::new(&atlas, &roots).run(&config).unwrap();
    assert_eq!(solutions.len(), 1);

    let mapping = &solutions[0];
    assert_valid_embedding(&atlas, &roots, mapping);
    assert_eq!(sign_class_count(&roots, mapping), 48);
}

#[test]
fn pinned_search_is_bit_identical_across_runs() {
    let (atlas, roots) = graphs();
    let engine = SearchEngine::new(&atlas, &roots);
    let config = SearchConfig {
        unity_indices: vec![0, atlas.tau(0)],
        target_sign_classes: Some(48),
        pins: vec![(0, 0)],
        max_solutions: 1,
    };
    let first = engine.run(&config).unwrap();
    let second = engine.run(&config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pinned_search_honors_the_pin() {
    let (atlas, roots) = graphs();
    let config = SearchConfig {
        unity_indices: vec![0, atlas.tau(0)],
        target_sign_classes: Some(48),
        pins: vec![(0, 0)],
        max_solutions: 1,
    };
    let solutions = SearchEngine::new(&atlas, &roots).run(&config).unwrap();
    for mapping in &solutions {
        assert_eq!(mapping[0], 0);
        assert_eq!(mapping[atlas.tau(0)], roots.negate(0));
        assert_valid_embedding(&atlas, &roots, mapping);
    }
}

#[test]
fn unity_over_a_mirror_pair_holds_by_pairing() {
    let (atlas, roots) = graphs();
    // Any mirror pair works as a unity set: images are a root and its
    // negation.
    let pair = vec![10, atlas.tau(10)];
    let config = SearchConfig {
        unity_indices: pair,
        target_sign_classes: Some(48),
        ..SearchConfig::default()
    };
    let solutions = SearchEngine::new(&atlas, &roots).run(&config).unwrap();
    assert_eq!(solutions.len(), 1);
}
