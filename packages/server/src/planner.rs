//! Turns list/retrieve query parameters into a [`SpatialPlan`].
//!
//! Parameter handling is lenient: anything that does not parse as a finite
//! number is treated as absent, and an incomplete or out-of-range reference
//! point is dropped along with the distance bound that depends on it.
//!
//! | parameter                  | effect                                   |
//! |----------------------------|------------------------------------------|
//! | `area`                     | area annotation                          |
//! | `min_area` / `max_area`    | area annotation + `min < area < max`     |
//! | `longitude` + `latitude`   | distance annotation                      |
//! | `max_distance`             | `distance < max` (needs reference point) |

use footprints_database_models::{Annotation, Predicate, SpatialPlan};
use footprints_geometry::ReferencePoint;
use footprints_server_models::BuildingQueryParams;

/// Builds the annotations and predicates for a request.
///
/// Predicates are ordered area bounds first, then the distance bound.
#[must_use]
pub fn plan(params: &BuildingQueryParams) -> SpatialPlan {
    let reference = reference_point(params);
    let min_area = parse_number(params.min_area.as_deref());
    let max_area = parse_number(params.max_area.as_deref());
    let max_distance = parse_number(params.max_distance.as_deref());

    let mut annotations = Vec::new();
    let mut predicates = Vec::new();

    if params.area.is_some() || min_area.is_some() || max_area.is_some() {
        annotations.push(Annotation::Area);
    }
    if let Some(point) = reference {
        annotations.push(Annotation::Distance(point));
    }

    if let Some(min) = min_area {
        predicates.push(Predicate::AreaAbove(min));
    }
    if let Some(max) = max_area {
        predicates.push(Predicate::AreaBelow(max));
    }

    match (reference, max_distance) {
        (Some(_), Some(max)) => predicates.push(Predicate::DistanceBelow(max)),
        (None, Some(max)) => {
            log::debug!("Ignoring max_distance={max}: no complete reference point");
        }
        (_, None) => {}
    }

    SpatialPlan {
        annotations,
        predicates,
    }
}

/// The reference point, if both `longitude` and `latitude` parse and lie
/// within the coordinate bounds.
#[must_use]
pub fn reference_point(params: &BuildingQueryParams) -> Option<ReferencePoint> {
    let lon = parse_number(params.longitude.as_deref());
    let lat = parse_number(params.latitude.as_deref());

    match (lon, lat) {
        (Some(lon), Some(lat)) => ReferencePoint::new(lon, lat),
        _ => None,
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
