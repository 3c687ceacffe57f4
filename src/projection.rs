//! Reprojection of decoded paths into another 2-D coordinate system.

use std::f64::consts::FRAC_PI_4;

use crate::geometry::{Coordinate, Path};

/// A point-wise coordinate transform, e.g. geographic to planar.
pub trait CoordinateTransform {
    fn transform(&self, coordinate: Coordinate) -> Coordinate;
}

impl<F> CoordinateTransform for F
where
    F: Fn(Coordinate) -> Coordinate,
{
    fn transform(&self, coordinate: Coordinate) -> Coordinate {
        self(coordinate)
    }
}

/// Spherical Web Mercator (EPSG:3857), output in metres.
#[derive(Debug, Clone, Copy)]
pub struct WebMercator {
    pub radius_m: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            radius_m: 6_378_137.0,
        }
    }
}

impl CoordinateTransform for WebMercator {
    fn transform(&self, coordinate: Coordinate) -> Coordinate {
        let x = self.radius_m * coordinate.lon().to_radians();
        let y = self.radius_m * (FRAC_PI_4 + coordinate.lat().to_radians() / 2.0).tan().ln();
        Coordinate::new(x, y)
    }
}

/// Applies `transform` to every point, keeping order and count.
///
/// A missing path stays missing, and so does one the transform sends to
/// non-finite values.
pub fn project<T>(path: Option<&Path>, transform: &T) -> Option<Path>
where
    T: CoordinateTransform + ?Sized,
{
    let path = path?;
    let points = path
        .points()
        .iter()
        .map(|&c| transform.transform(c))
        .collect();
    Path::new(points)
}
