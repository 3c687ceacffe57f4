//! Coordinate and path value types.
//!
//! A [`Path`] always holds at least two finite points. Anything shorter is
//! degenerate and is represented by `None` at the call site, the same way
//! a route that a provider could not produce is.

use geojson::{Feature, FeatureCollection, Geometry};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A 2-D coordinate: (longitude, latitude) when geographic, (x, y) once projected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn lon(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    /// True for a finite lon/lat pair inside the geographic bounds.
    pub fn is_valid_lon_lat(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && (-180.0..=180.0).contains(&self.x)
            && (-90.0..=90.0).contains(&self.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.x, c.y)
    }
}

/// An ordered, non-degenerate sequence of finite coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    points: Vec<Coordinate>,
}

// Deserialization goes through `Path::try_new`.
#[derive(Deserialize)]
struct RawPath {
    points: Vec<Coordinate>,
}

impl TryFrom<RawPath> for Path {
    type Error = GeometryError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        Path::try_new(raw.points)
    }
}

impl Path {
    /// Builds a path, or `None` when it would be degenerate or hold a
    /// non-finite point.
    pub fn new(points: Vec<Coordinate>) -> Option<Self> {
        Self::try_new(points).ok()
    }

    /// Like [`Path::new`], saying why the points were refused.
    pub fn try_new(points: Vec<Coordinate>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        if let Some(index) = points
            .iter()
            .position(|c| !(c.x.is_finite() && c.y.is_finite()))
        {
            return Err(GeometryError::NonFinite { index });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed path.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// GeoJSON `Feature` with a `LineString` geometry, for map viewers.
    pub fn to_geojson_feature(&self, name: &str) -> Feature {
        let line = self.points.iter().map(|c| vec![c.x, c.y]).collect();
        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::LineString(line))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("name", name);
        feature
    }
}

/// Wraps features produced by [`Path::to_geojson_feature`].
pub fn feature_collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
