//! Route provider seam.
//!
//! Each routing backend answers a point-to-point query with a travel time and
//! an encoded path, or with nothing at all. Only bad arguments are errors.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, QueryError};
use crate::geometry::{Coordinate, Path};
use crate::polyline::{self, Precision};

/// A provider's answer, normalized: seconds plus the path as the provider encoded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub duration: f64,
    pub encoded_path: String,
    pub precision: Precision,
}

impl RouteSummary {
    pub fn decode(&self) -> Result<Option<Path>, CodecError> {
        polyline::decode(Some(self.encoded_path.as_str()), self.precision)
    }
}

/// A routing backend.
pub trait RouteProvider {
    /// Travel modes this provider recognizes.
    type Mode: Copy + Send + Sync;

    /// Routes from `start` to `end`, both (lon, lat).
    ///
    /// `Ok(None)` covers every upstream failure: transport errors, non-2xx
    /// statuses, unexpected payloads and "no route" answers.
    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: Self::Mode,
    ) -> Result<Option<RouteSummary>, QueryError>;
}

pub(crate) fn check_endpoints(start: Coordinate, end: Coordinate) -> Result<(), QueryError> {
    for point in [start, end] {
        if !point.is_valid_lon_lat() {
            return Err(QueryError::InvalidCoordinate {
                x: point.x,
                y: point.y,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_decode() {
        let summary = RouteSummary {
            duration: 61.0,
            encoded_path: "_p~iF~ps|U_ulLnnqC".to_string(),
            precision: Precision::Five,
        };
        let path = summary.decode().unwrap().unwrap();
        assert_eq!(path.points()[1], Coordinate::new(-120.95, 40.7));
    }

    #[test]
    fn test_check_endpoints() {
        let ok = Coordinate::new(-0.1278, 51.5074);
        assert!(check_endpoints(ok, ok).is_ok());
        assert!(matches!(
            check_endpoints(ok, Coordinate::new(51.5074, -120.0)),
            Err(QueryError::InvalidCoordinate { .. })
        ));
    }
}
