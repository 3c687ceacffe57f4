//! Fan-out of route queries from one origin.

use rayon::prelude::*;
use tracing::info;

use crate::error::QueryError;
use crate::geometry::Coordinate;
use crate::traits::{RouteProvider, RouteSummary};

/// Routes `origin` to every destination in parallel; results keep input order.
///
/// A failed query yields `Ok(None)` in its slot and never aborts the batch.
pub fn route_many<P>(
    provider: &P,
    origin: Coordinate,
    destinations: &[Coordinate],
    mode: P::Mode,
) -> Vec<Result<Option<RouteSummary>, QueryError>>
where
    P: RouteProvider + Sync,
{
    let results: Vec<_> = destinations
        .par_iter()
        .map(|&destination| provider.route(origin, destination, mode))
        .collect();

    let found = results
        .iter()
        .filter(|result| matches!(result, Ok(Some(_))))
        .count();
    info!(requested = destinations.len(), found, "batch routing finished");
    results
}
