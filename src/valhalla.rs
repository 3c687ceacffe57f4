//! Valhalla HTTP adapter.
//!
//! Requests go out as a single `json` query parameter holding the route
//! request. Only the options modelled in [`ValhallaConfig`] are sent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::geometry::Coordinate;
use crate::http;
use crate::osrm::{self, OsrmRouteResponse};
use crate::polyline::Precision;
use crate::traits::{RouteProvider, RouteSummary, check_endpoints};

/// Trip status Valhalla uses for "no route found" on a 200 response.
const STATUS_NO_ROUTE: i64 = 207;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValhallaCosting {
    Pedestrian,
    Bicycle,
    Bus,
    Auto,
    AutoShorter,
}

impl ValhallaCosting {
    pub const ALLOWED: &'static str = "pedestrian, bicycle, bus, auto, auto_shorter";

    pub fn as_str(self) -> &'static str {
        match self {
            ValhallaCosting::Pedestrian => "pedestrian",
            ValhallaCosting::Bicycle => "bicycle",
            ValhallaCosting::Bus => "bus",
            ValhallaCosting::Auto => "auto",
            ValhallaCosting::AutoShorter => "auto_shorter",
        }
    }
}

impl FromStr for ValhallaCosting {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pedestrian" => Ok(ValhallaCosting::Pedestrian),
            "bicycle" => Ok(ValhallaCosting::Bicycle),
            "bus" => Ok(ValhallaCosting::Bus),
            "auto" => Ok(ValhallaCosting::Auto),
            "auto_shorter" => Ok(ValhallaCosting::AutoShorter),
            other => Err(QueryError::UnknownMode {
                mode: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl fmt::Display for ValhallaCosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutFormat {
    #[default]
    Json,
    /// OSRM-compatible payload; the path is read from `routes[0].geometry`.
    Osrm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnits {
    Kilometers,
    Miles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DirectionsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<DistanceUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BicycleType {
    Road,
    Hybrid,
    City,
    Cross,
    Mountain,
}

/// Costing knobs, sent under `costing_options.<costing>`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostingOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bicycle_type: Option<BicycleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycling_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walking_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_roads: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_hills: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_highways: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tolls: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub language: String,
    pub out_format: OutFormat,
    pub directions: Option<DirectionsOptions>,
    pub costing_options: Option<CostingOptions>,
    /// Digits used to decode `shape`; set `Six` for servers emitting polyline6.
    pub precision: Precision,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://valhalla.mapzen.com".to_string(),
            api_key: None,
            language: "en_US".to_string(),
            out_format: OutFormat::Json,
            directions: None,
            costing_options: None,
            precision: Precision::Five,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> Result<Self, QueryError> {
        let client = http::client(config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// The route request as sent in the `json` parameter.
    pub fn request_json(&self, start: Coordinate, end: Coordinate, costing: ValhallaCosting) -> String {
        let costing_options = self
            .config
            .costing_options
            .as_ref()
            .map(|options| BTreeMap::from([(costing.as_str(), options)]));

        let request = RouteRequest {
            locations: [Location::from(start), Location::from(end)],
            costing,
            language: &self.config.language,
            out_format: self.config.out_format,
            directions_options: self.config.directions.as_ref(),
            costing_options,
        };
        // Plain structs of strings and numbers always serialize.
        serde_json::to_string(&request).unwrap_or_default()
    }
}

impl RouteProvider for ValhallaClient {
    type Mode = ValhallaCosting;

    fn route(
        &self,
        start: Coordinate,
        end: Coordinate,
        mode: ValhallaCosting,
    ) -> Result<Option<RouteSummary>, QueryError> {
        check_endpoints(start, end)?;

        let json = self.request_json(start, end, mode);
        debug!(request = %json, "valhalla route");

        let mut query = vec![("json", json)];
        if let Some(key) = &self.config.api_key {
            query.push(("api_key", key.clone()));
        }
        let request = self
            .client
            .get(format!("{}/route", self.config.base_url))
            .query(&query);

        let precision = self.config.precision;
        let summary = match self.config.out_format {
            OutFormat::Json => http::fetch_json::<TripResponse>(request, "valhalla")
                .and_then(|body| summary_from_trip(body, precision)),
            OutFormat::Osrm => http::fetch_json::<OsrmRouteResponse>(request, "valhalla")
                .and_then(|body| osrm::summary_from_response(body, precision)),
        };
        Ok(summary)
    }
}

#[derive(Debug, Serialize)]
struct RouteRequest<'a> {
    locations: [Location; 2],
    costing: ValhallaCosting,
    language: &'a str,
    out_format: OutFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    directions_options: Option<&'a DirectionsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    costing_options: Option<BTreeMap<&'static str, &'a CostingOptions>>,
}

#[derive(Debug, Serialize)]
struct Location {
    lat: f64,
    lon: f64,
}

impl From<Coordinate> for Location {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.lat(),
            lon: c.lon(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TripResponse {
    trip: Trip,
}

#[derive(Debug, Deserialize)]
struct Trip {
    status: Option<i64>,
    summary: Option<TripSummary>,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct TripSummary {
    time: f64,
}

#[derive(Debug, Deserialize)]
struct Leg {
    shape: String,
}

fn summary_from_trip(body: TripResponse, precision: Precision) -> Option<RouteSummary> {
    let trip = body.trip;
    if trip.status == Some(STATUS_NO_ROUTE) {
        warn!("valhalla reported no route");
        return None;
    }

    let duration = trip.summary?.time;
    let leg = trip.legs.into_iter().next()?;
    Some(RouteSummary {
        duration,
        encoded_path: leg.shape,
        precision,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn start() -> Coordinate {
        Coordinate::new(-0.1278, 51.5074)
    }

    fn end() -> Coordinate {
        Coordinate::new(-0.0754, 51.5055)
    }

    #[test]
    fn test_costing_parsing() {
        assert_eq!(
            "auto_shorter".parse::<ValhallaCosting>().unwrap(),
            ValhallaCosting::AutoShorter
        );
        assert!(matches!(
            "hovercraft".parse::<ValhallaCosting>(),
            Err(QueryError::UnknownMode { .. })
        ));
    }

    #[test]
    fn test_minimal_request() {
        let client = ValhallaClient::new(ValhallaConfig::default()).unwrap();
        let request: Value =
            serde_json::from_str(&client.request_json(start(), end(), ValhallaCosting::Bicycle)).unwrap();

        assert_eq!(request["locations"][0]["lat"], 51.5074);
        assert_eq!(request["locations"][0]["lon"], -0.1278);
        assert_eq!(request["costing"], "bicycle");
        assert_eq!(request["language"], "en_US");
        assert_eq!(request["out_format"], "json");
        assert!(request.get("directions_options").is_none());
        assert!(request.get("costing_options").is_none());
    }

    #[test]
    fn test_request_with_options() {
        let config = ValhallaConfig {
            out_format: OutFormat::Osrm,
            directions: Some(DirectionsOptions {
                units: Some(DistanceUnits::Miles),
                narrative: Some(false),
            }),
            costing_options: Some(CostingOptions {
                bicycle_type: Some(BicycleType::Road),
                use_roads: Some(0.25),
                ..CostingOptions::default()
            }),
            ..ValhallaConfig::default()
        };
        let client = ValhallaClient::new(config).unwrap();
        let request: Value =
            serde_json::from_str(&client.request_json(start(), end(), ValhallaCosting::Bicycle)).unwrap();

        assert_eq!(request["out_format"], "osrm");
        assert_eq!(request["directions_options"]["units"], "miles");
        assert_eq!(request["directions_options"]["narrative"], false);
        assert_eq!(request["costing_options"]["bicycle"]["bicycle_type"], "Road");
        assert_eq!(request["costing_options"]["bicycle"]["use_roads"], 0.25);
        assert!(request["costing_options"]["bicycle"].get("use_hills").is_none());
    }

    #[test]
    fn test_trip_response() {
        let body: TripResponse = serde_json::from_str(
            r#"{"trip":{"status":0,"summary":{"time":905},"legs":[{"shape":"first"},{"shape":"second"}]}}"#,
        )
        .unwrap();
        let summary = summary_from_trip(body, Precision::Five).unwrap();
        assert_eq!(summary.duration, 905.0);
        assert_eq!(summary.encoded_path, "first");
    }

    #[test]
    fn test_no_route_status_is_missing() {
        let body: TripResponse = serde_json::from_str(
            r#"{"trip":{"status":207,"summary":{"time":1},"legs":[{"shape":"x"}]}}"#,
        )
        .unwrap();
        assert!(summary_from_trip(body, Precision::Five).is_none());
    }

    #[test]
    fn test_trip_without_legs_is_missing() {
        let body: TripResponse =
            serde_json::from_str(r#"{"trip":{"status":0,"summary":{"time":1}}}"#).unwrap();
        assert!(summary_from_trip(body, Precision::Five).is_none());
    }
}
