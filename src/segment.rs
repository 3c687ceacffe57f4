//! Decomposition of a path into two-point edges.

use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinate, Path};

/// One elementary segment of a path, holding its endpoints by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Coordinate,
    pub end: Coordinate,
}

impl Edge {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        Self { start, end }
    }

    /// Planar length; only meaningful for projected coordinates.
    pub fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// The `N - 1` consecutive edges of a path, in path order.
pub fn segment(path: &Path) -> Vec<Edge> {
    edges(path.points())
}

/// Edges over a raw point slice. Fewer than two points yields no edges.
pub fn edges(points: &[Coordinate]) -> Vec<Edge> {
    points
        .windows(2)
        .map(|pair| Edge::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_and_order() {
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(3.0, 4.0),
            Coordinate::new(3.0, 10.0),
        ];
        let path = Path::new(points.clone()).unwrap();
        let result = segment(&path);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0], Edge::new(points[0], points[1]));
        assert_eq!(result[1], Edge::new(points[1], points[2]));
        assert_eq!(result[0].length(), 5.0);
    }

    #[test]
    fn test_short_input_has_no_edges() {
        assert!(edges(&[]).is_empty());
        assert!(edges(&[Coordinate::new(1.0, 1.0)]).is_empty());
    }
}
