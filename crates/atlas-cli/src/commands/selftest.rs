//! Builder structural self-tests.

use std::process::ExitCode;

use anyhow::{Context, Result};
use atlas_core::{Atlas, RootSystem};

/// Builds both graphs, letting their internal invariant checks act as the
/// structural self-test.
pub fn build_graphs() -> Result<(Atlas, RootSystem)> {
    let atlas = Atlas::build().context("atlas builder self-test failed")?;
    let roots = RootSystem::build().context("root system builder self-test failed")?;
    Ok((atlas, roots))
}

/// Runs the self-tests and reports the graph shapes.
pub fn run() -> Result<ExitCode> {
    let (atlas, roots) = build_graphs()?;
    println!(
        "atlas: {} vertices, {} edges, mirror pairs {}",
        atlas.num_vertices(),
        atlas.edge_count(),
        atlas.num_vertices() / 2
    );
    println!(
        "roots: {} vectors, adjacency degree {}",
        roots.num_roots(),
        roots.degree(0)
    );
    println!("builder self-tests passed");
    Ok(ExitCode::SUCCESS)
}
