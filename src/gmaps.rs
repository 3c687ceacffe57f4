//! Google Maps Directions and Elevation adapters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::geometry::Coordinate;
use crate::http;
use crate::polyline::Precision;
use crate::traits::{RouteProvider, RouteSummary, check_endpoints};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GmapsMode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl GmapsMode {
    pub const ALLOWED: &'static str = "driving, walking, bicycling, transit";

    pub fn as_str(self) -> &'static str {
        match self {
            GmapsMode::Driving => "driving",
            GmapsMode::Walking => "walking",
            GmapsMode::Bicycling => "bicycling",
            GmapsMode::Transit => "transit",
        }
    }
}

impl FromStr for GmapsMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driving" => Ok(GmapsMode::Driving),
            "walking" => Ok(GmapsMode::Walking),
            "bicycling" => Ok(GmapsMode::Bicycling),
            "transit" => Ok(GmapsMode::Transit),
            other => Err(QueryError::UnknownMode {
                mode: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl fmt::Display for GmapsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GmapsConfig {
    pub base_url: String,
    pub api_key: String,
    /// ccTLD region bias, e.g. "uk".
    pub region: String,
    pub units: Units,
    pub precision: Precision,
    pub timeout_secs: u64,
}

impl Default for GmapsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            region: "uk".to_string(),
            units: Units::Metric,
            precision: Precision::Five,
            timeout_secs: 10,
        }
    }
}

/// One sample from the Elevation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub elevation: f64,
    pub location: LatLng,
    pub resolution: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone)]
pub struct GmapsClient {
    config: GmapsConfig,
    client: reqwest::blocking::Client,
}

impl GmapsClient {
    pub fn new(config: GmapsConfig) -> Result<Self, QueryError> {
        let client = http::client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Elevations along an encoded path, or `None` if the query fails.
    pub fn elevation(&self, encoded_path: &str) -> Option<Vec<ElevationSample>> {
        let url = format!("{}/elevation/json", self.config.base_url);
        debug!(%url, chars = encoded_path.len(), "gmaps elevation");

        let request = self.client.get(url).query(&[
            ("locations", format!("enc:{}", encoded_path)),
            ("key", self.config.api_key.clone()),
        ]);
        http::fetch_json::<ElevationResponse>(request, "gmaps").map(|body| body.results)
    }
}

impl RouteProvider for GmapsClient {
    type Mode = GmapsMode;

    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: GmapsMode,
    ) -> Result<Option<RouteSummary>, QueryError> {
        check_endpoints(start, end)?;

        let url = format!("{}/directions/json", self.config.base_url);
        debug!(%url, %mode, "gmaps directions");

        let request = self.client.get(url).query(&[
            ("origin", format!("{}, {}", start.lat(), start.lon())),
            ("destination", format!("{}, {}", end.lat(), end.lon())),
            ("mode", mode.to_string()),
            ("units", self.config.units.as_str().to_string()),
            ("region", self.config.region.clone()),
            ("key", self.config.api_key.clone()),
        ]);

        let body = http::fetch_json::<DirectionsResponse>(request, "gmaps");
        Ok(body.and_then(|body| summary_from_directions(body, self.config.precision)))
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: OverviewPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    results: Vec<ElevationSample>,
}

// Single route, single leg: the duration is the sum of that leg's steps.
fn summary_from_directions(body: DirectionsResponse, precision: Precision) -> Option<RouteSummary> {
    let Some(route) = body.routes.into_iter().next() else {
        warn!("gmaps returned no routes");
        return None;
    };
    let leg = route.legs.first()?;
    let duration = leg.steps.iter().map(|step| step.duration.value).sum();

    Some(RouteSummary {
        duration,
        encoded_path: route.overview_polyline.points,
        precision,
    })
}
