//! Decode-project-compare pipeline over provider answers.

use rayon::prelude::*;

use crate::error::CodecError;
use crate::geometry::Path;
use crate::projection::{CoordinateTransform, project};
use crate::similarity::similarity_opt;
use crate::traits::RouteSummary;

/// Similarity of two provider answers, optionally after reprojection.
///
/// `Ok(None)` when either answer is missing or decodes to a degenerate path.
/// A corrupt encoded path is an error.
pub fn compare_routes(
    a: Option<&RouteSummary>,
    b: Option<&RouteSummary>,
    transform: Option<&(dyn CoordinateTransform + Sync)>,
) -> Result<Option<f64>, CodecError> {
    let path_a = decode_summary(a)?;
    let path_b = decode_summary(b)?;

    let (path_a, path_b) = match transform {
        Some(transform) => (
            project(path_a.as_ref(), transform),
            project(path_b.as_ref(), transform),
        ),
        None => (path_a, path_b),
    };
    Ok(similarity_opt(path_a.as_ref(), path_b.as_ref()))
}

/// [`compare_routes`] over many pairs in parallel; results keep input order.
pub fn compare_batch(
    pairs: &[(Option<RouteSummary>, Option<RouteSummary>)],
    transform: Option<&(dyn CoordinateTransform + Sync)>,
) -> Vec<Result<Option<f64>, CodecError>> {
    pairs
        .par_iter()
        .map(|(a, b)| compare_routes(a.as_ref(), b.as_ref(), transform))
        .collect()
}

fn decode_summary(summary: Option<&RouteSummary>) -> Result<Option<Path>, CodecError> {
    match summary {
        Some(summary) => summary.decode(),
        None => Ok(None),
    }
}
