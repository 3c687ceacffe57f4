//! route-compare
//!
//! Fetches candidate routes from several routing providers, decodes their
//! encoded path geometry and measures how much two paths overlap.

pub mod error;
pub mod geometry;
pub mod polyline;
pub mod projection;
pub mod segment;
pub mod similarity;
pub mod compare;
pub mod traits;
pub mod batch;
pub mod osrm;
pub mod valhalla;
pub mod gmaps;
mod http;
