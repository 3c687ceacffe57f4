//! Vertex-overlap similarity between two paths.
//!
//! Points are compared as exact values, so two providers only share a vertex
//! when both decode it to the same rounded coordinate. Order and duplicates
//! are ignored: this measures shared vertices, not shape.

use std::collections::HashSet;

use crate::geometry::{Coordinate, Path};

/// Jaccard index of the two paths' vertex sets, as a percentage in `[0, 100]`.
///
/// Symmetric in its arguments. Both paths are non-degenerate by construction,
/// so the union is never empty.
pub fn similarity(a: &Path, b: &Path) -> f64 {
    let set_a = vertex_set(a);
    let set_b = vertex_set(b);

    let shared = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - shared;
    shared as f64 / union as f64 * 100.0
}

/// [`similarity`] over possibly-missing paths; missing on either side gives `None`.
pub fn similarity_opt(a: Option<&Path>, b: Option<&Path>) -> Option<f64> {
    Some(similarity(a?, b?))
}

fn vertex_set(path: &Path) -> HashSet<(u64, u64)> {
    path.points().iter().map(vertex_key).collect()
}

// Adding 0.0 folds -0.0 into 0.0 so both hash alike.
fn vertex_key(c: &Coordinate) -> (u64, u64) {
    ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
}
