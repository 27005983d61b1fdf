//! Geographic calculations
//!
//! Latitude/longitude are treated as planar Cartesian coordinates: no geodesic
//! correction, no road network.

use crate::types::{Coordinates, Leg, Stop};

/// Fraction of the larger extent added around the diagram bounds
const BOUNDS_PADDING_RATIO: f64 = 0.08;

/// Padding used when all points share one coordinate
const MIN_BOUNDS_PADDING: f64 = 0.01;

/// Euclidean distance between two points, in coordinate degrees
pub fn distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = to.lat - from.lat;
    let d_lng = to.lng - from.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

/// Squared Euclidean distance (used where only ordering matters)
pub fn squared_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let d_lat = to.lat - from.lat;
    let d_lng = to.lng - from.lng;
    d_lat * d_lat + d_lng * d_lng
}

/// Legs of a route: depot → first stop, then stop → stop in order.
/// Returns one leg per stop; no return leg to the depot.
pub fn route_legs(depot: &Coordinates, stops: &[Stop]) -> Vec<Leg> {
    let mut legs = Vec::with_capacity(stops.len());
    let mut from = *depot;

    for stop in stops {
        let to = stop.coordinates;
        legs.push(Leg {
            from,
            to,
            length: distance(&from, &to),
        });
        from = to;
    }

    legs
}

/// Arithmetic mean of the points, `None` when empty
pub fn centroid(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(Coordinates::new(lat / n, lng / n))
}

/// Axis-aligned bounding box, padded for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Padded box around all points. `None` for an empty slice.
    pub fn around(points: &[Coordinates]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };

        for p in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.min_lng = bounds.min_lng.min(p.lng);
            bounds.max_lng = bounds.max_lng.max(p.lng);
        }

        let extent = (bounds.max_lat - bounds.min_lat).max(bounds.max_lng - bounds.min_lng);
        let pad = (extent * BOUNDS_PADDING_RATIO).max(MIN_BOUNDS_PADDING);
        bounds.min_lat -= pad;
        bounds.max_lat += pad;
        bounds.min_lng -= pad;
        bounds.max_lng += pad;

        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_pythagorean() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(3.0, 4.0);
        assert!((distance(&a, &b) - 5.0).abs() < 1e-12);
        assert!((squared_distance(&a, &b) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_same_point() {
        let point = Coordinates::new(43.65, -79.38);
        assert!((distance(&point, &point) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinates::new(43.6532, -79.3832);
        let b = Coordinates::new(43.7001, -79.4163);
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_route_legs() {
        let depot = Coordinates::new(0.0, 0.0);
        let stops = vec![Stop::retailer("A", 0.0, 1.0), Stop::retailer("B", 10.0, 10.0)];

        let legs = route_legs(&depot, &stops);

        assert_eq!(legs.len(), 2);
        assert!((legs[0].length - 1.0).abs() < 1e-12);
        assert_eq!(legs[0].from, depot);
        assert_eq!(legs[1].from, stops[0].coordinates);
        assert!((legs[1].length - (100.0f64 + 81.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_route_legs_empty() {
        assert!(route_legs(&Coordinates::new(1.0, 1.0), &[]).is_empty());
    }

    #[test]
    fn test_centroid() {
        let points = [Coordinates::new(0.0, 0.0), Coordinates::new(2.0, 4.0)];
        assert_eq!(centroid(&points), Some(Coordinates::new(1.0, 2.0)));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_bounds_padding() {
        let points = [Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 2.0)];
        let bounds = Bounds::around(&points).unwrap();

        assert!(bounds.min_lat < 0.0 && bounds.max_lat > 1.0);
        assert!(bounds.min_lng < 0.0 && bounds.max_lng > 2.0);
    }

    #[test]
    fn test_bounds_single_point_not_degenerate() {
        let bounds = Bounds::around(&[Coordinates::new(5.0, 5.0)]).unwrap();
        assert!(bounds.max_lat > bounds.min_lat);
        assert!(bounds.max_lng > bounds.min_lng);
        assert!(Bounds::around(&[]).is_none());
    }
}
