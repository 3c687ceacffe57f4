//! OSRM HTTP adapter for point-to-point routes.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::geometry::Coordinate;
use crate::http;
use crate::polyline::Precision;
use crate::traits::{RouteProvider, RouteSummary, check_endpoints};

/// Legacy OSRM "no route found" status, sent with a 200 response.
const STATUS_NO_ROUTE: i64 = 207;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// `Six` requests `polyline6` geometry, `Five` plain `polyline`.
    pub precision: Precision,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            precision: Precision::Six,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsrmProfile {
    Foot,
    Car,
    Bicycle,
}

impl OsrmProfile {
    pub const ALLOWED: &'static str = "foot, car, bicycle";

    pub fn as_str(self) -> &'static str {
        match self {
            OsrmProfile::Foot => "foot",
            OsrmProfile::Car => "car",
            OsrmProfile::Bicycle => "bicycle",
        }
    }
}

impl FromStr for OsrmProfile {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foot" => Ok(OsrmProfile::Foot),
            "car" => Ok(OsrmProfile::Car),
            "bicycle" => Ok(OsrmProfile::Bicycle),
            other => Err(QueryError::UnknownMode {
                mode: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl fmt::Display for OsrmProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, QueryError> {
        let client = http::client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    pub fn route_url(&self, start: Coordinate, end: Coordinate, profile: OsrmProfile) -> String {
        let geometries = match self.config.precision {
            Precision::Five => "polyline",
            Precision::Six => "polyline6",
        };
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries={}",
            self.config.base_url,
            profile,
            start.lon(),
            start.lat(),
            end.lon(),
            end.lat(),
            geometries
        )
    }
}

impl RouteProvider for OsrmClient {
    type Mode = OsrmProfile;

    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: OsrmProfile,
    ) -> Result<Option<RouteSummary>, QueryError> {
        check_endpoints(start, end)?;

        let url = self.route_url(start, end, mode);
        debug!(%url, "osrm route");

        let body = http::fetch_json::<OsrmRouteResponse>(self.client.get(url), "osrm");
        Ok(body.and_then(|body| summary_from_response(body, self.config.precision)))
    }
}

/// OSRM v1 `route` payload; Valhalla's `out_format=osrm` answers in the same shape.
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: Option<String>,
    status: Option<i64>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    geometry: String,
}

pub(crate) fn summary_from_response(
    body: OsrmRouteResponse,
    precision: Precision,
) -> Option<RouteSummary> {
    if body.status == Some(STATUS_NO_ROUTE) {
        warn!("osrm reported no route");
        return None;
    }
    if let Some(code) = body.code.as_deref().filter(|code| *code != "Ok") {
        warn!(code, "osrm route not ok");
        return None;
    }

    let route = body.routes.into_iter().next()?;
    Some(RouteSummary {
        duration: route.duration,
        encoded_path: route.geometry,
        precision,
    })
}
