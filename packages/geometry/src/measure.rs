//! Geodesic measurements on the WGS84 ellipsoid.
//!
//! Both measurements return `0.0` instead of failing for degenerate input
//! (collinear rings, rings of one repeated position), so callers can always
//! attach a value when one was requested.

use geo::orient::{Direction, Orient as _};
use geo::{Closest, ClosestPoint as _, Distance as _, Geodesic, GeodesicArea as _, Intersects as _};

use crate::{Polygon, ReferencePoint};

/// Area of the polygon in square meters, whatever the ring's winding.
///
/// Never negative, and `0.0` (not `-0.0`) for degenerate rings.
#[must_use]
pub fn area_sq_m(polygon: &Polygon) -> f64 {
    let area = polygon
        .to_geo()
        .orient(Direction::Default)
        .geodesic_area_signed();

    finite_or_zero(area).abs()
}

/// Geodesic distance in meters from the polygon to a point.
///
/// Zero when the point lies inside or on the boundary. Otherwise the
/// closest point on each edge is located in lon/lat space and the shortest
/// geodesic distance to one of those points is returned, which is accurate
/// for building-sized edges.
#[must_use]
pub fn distance_m(polygon: &Polygon, point: ReferencePoint) -> f64 {
    let target = point.to_geo();
    let shape = polygon.to_geo();

    if shape.intersects(&target) {
        return 0.0;
    }

    let nearest = shape
        .exterior()
        .lines()
        .filter_map(|line| {
            let closest = if line.start == line.end {
                geo::Point(line.start)
            } else {
                match line.closest_point(&target) {
                    Closest::Intersection(p) | Closest::SinglePoint(p) => p,
                    Closest::Indeterminate => return None,
                }
            };
            Some(Geodesic.distance(target, closest))
        })
        .filter(|d| d.is_finite())
        .reduce(f64::min);

    let nearest = nearest.or_else(|| {
        polygon
            .ring()
            .first()
            .map(|&[lon, lat]| Geodesic.distance(target, geo::Point::new(lon, lat)))
    });

    nearest.map_or(0.0, finite_or_zero)
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
