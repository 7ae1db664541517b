//! Generate-then-verify round trip and corruption sensitivity.
//!
//! The verifier here is the independent `atlas-verifier` crate; nothing in
//! these tests hands it anything but certificate bytes.

use std::sync::OnceLock;

use atlas_core::{
    Atlas, CertificateGenerator, GenerateOptions, RootSystem, SearchConfig, SearchEngine,
    Symmetries,
};
use atlas_verifier::{verify_str, FailureCategory};
use serde_json::Value;

/// Builds the graphs, finds one embedding, and certifies it. The search is
/// deterministic, so sharing one result across tests loses nothing.
fn certified() -> &'static (Atlas, RootSystem, Vec<usize>, String) {
    static CERTIFIED: OnceLock<(Atlas, RootSystem, Vec<usize>, String)> = OnceLock::new();
    CERTIFIED.get_or_init(build_certified)
}

fn build_certified() -> (Atlas, RootSystem, Vec<usize>, String) {
    let atlas = Atlas::build().unwrap();
    let roots = RootSystem::build().unwrap();
    let unity = vec![0, atlas.tau(0)];
    let config = SearchConfig {
        unity_indices: unity.clone(),
        target_sign_classes: Some(48),
        ..SearchConfig::default()
    };
    let solutions = SearchEngine::new(&atlas, &roots).run(&config).unwrap();
    let mapping = solutions.into_iter().next().expect("an embedding exists");

    let symmetries = Symmetries::new(&atlas, &roots);
    let certificate = CertificateGenerator::new(&atlas, &roots)
        .generate(
            &mapping,
            &unity,
            GenerateOptions {
                canonical_key: Some(symmetries.orbit_key(&mapping)),
                timestamp: Some("2025-06-01T00:00:00Z".to_string()),
                metadata: None,
            },
        )
        .unwrap();
    let json = certificate.to_canonical_json().unwrap();
    (atlas, roots, mapping, json)
}

/// Parses certificate bytes and strips the content digest so corruption
/// tests hit the targeted invariant instead of the digest check.
fn undigested(json: &str) -> Value {
    let mut value: Value = serde_json::from_str(json).unwrap();
    value.as_object_mut().unwrap().remove("content_digest");
    value
}

#[test]
fn round_trip_certificate_verifies() {
    let (_, _, _, json) = certified();
    let summary = verify_str(json).unwrap();
    assert_eq!(summary.sign_classes, 48);
    assert_eq!(summary.edges_checked, 256);
    assert_eq!(summary.integer_roots + summary.half_integer_roots, 96);
}

#[test]
fn reformatted_certificate_still_verifies() {
    // Pretty-printing must not break digest verification: the canonical
    // byte form is re-derived from the parsed value.
    let (_, _, _, json) = certified();
    let value: Value = serde_json::from_str(json).unwrap();
    let pretty = serde_json::to_string_pretty(&value).unwrap();
    assert!(verify_str(&pretty).is_ok());
}

#[test]
fn duplicate_mapping_entry_fails_with_injectivity() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    let duplicate = value["mapping"]["4"].clone();
    value["mapping"]["5"] = duplicate;
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::Injectivity);
}

#[test]
fn swapped_non_mirror_images_fail_with_mirror_pairing() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    // Vertices 4 and 6 are not a mirror pair; swapping their images keeps
    // injectivity but breaks the pairing law.
    let a = value["mapping"]["4"].clone();
    let b = value["mapping"]["6"].clone();
    value["mapping"]["4"] = b;
    value["mapping"]["6"] = a;
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::MirrorPairing);
}

#[test]
fn swapped_pair_images_fail_with_edge_preservation() {
    let (atlas, roots, mapping, json) = certified();

    // Find two mirror pairs whose image swap provably breaks an edge, so
    // the corruption passes injectivity and mirror pairing and fails
    // exactly at edge preservation.
    let mut chosen = None;
    'outer: for a in (0..96).step_by(2) {
        for b in ((a + 2)..96).step_by(2) {
            let mut corrupted = mapping.clone();
            corrupted.swap(a, b);
            corrupted.swap(atlas.tau(a), atlas.tau(b));
            let broken = atlas
                .edges()
                .iter()
                .any(|&(u, v)| !roots.is_adjacent(corrupted[u], corrupted[v]));
            if broken {
                chosen = Some((a, b));
                break 'outer;
            }
        }
    }
    let (a, b) = chosen.expect("some pair swap breaks an edge");

    let mut value = undigested(json);
    for (u, v) in [(a, b), (atlas.tau(a), atlas.tau(b))] {
        let first = value["mapping"][u.to_string()].clone();
        let second = value["mapping"][v.to_string()].clone();
        value["mapping"][u.to_string()] = second;
        value["mapping"][v.to_string()] = first;
    }
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::EdgePreservation);
}

#[test]
fn non_mirror_unity_set_fails_with_unity_sum() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    // Vertices 0 and 2 are not a mirror pair, so their images cannot cancel.
    value["unity_indices"] = serde_json::json!([0, 2]);
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::UnitySum);
}

#[test]
fn wrong_declared_sign_count_fails_with_sign_class_count() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    value["sign_classes_used"] = serde_json::json!(47);
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::SignClassCount);
}

#[test]
fn tampered_digest_fails_structurally() {
    let (_, _, _, json) = certified();
    let mut value: Value = serde_json::from_str(json).unwrap();
    value["content_digest"] = serde_json::json!(
        "0000000000000000000000000000000000000000000000000000000000000000"
    );
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::Structure);
}

#[test]
fn corrupted_root_coordinate_fails_in_rebuild() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    // A wrong value with valid syntax breaks the norm re-check.
    value["roots"]["0"][0] = serde_json::json!("3/1");
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::Rebuild);

    // Broken syntax is a structural failure instead.
    let mut value = undigested(json);
    value["roots"]["0"][0] = serde_json::json!("one half");
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::Structure);
}

#[test]
fn missing_mapping_entry_fails_structurally() {
    let (_, _, _, json) = certified();
    let mut value = undigested(json);
    value["mapping"].as_object_mut().unwrap().remove("42");
    let error = verify_str(&value.to_string()).unwrap_err();
    assert_eq!(error.category(), FailureCategory::Structure);
}
