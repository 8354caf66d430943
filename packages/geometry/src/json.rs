//! `GeoJSON` polygon geometry parsing.
//!
//! Input is walked as raw [`serde_json::Value`] rather than deserialized
//! into `geojson` types so that each structural problem maps to a specific
//! [`ValidationError`] and `type` can be matched case-insensitively.

use serde_json::Value;

use crate::{Polygon, ValidationError};

/// Parses and validates a `GeoJSON` geometry object of type `Polygon`.
///
/// Expects `{"type": "Polygon", "coordinates": [[[lon, lat], ...]]}` with
/// exactly one ring.
///
/// # Errors
///
/// Returns the first structural, numeric, arity, closure or range failure
/// as a [`ValidationError`].
pub fn parse_geojson_geometry(geometry: &Value) -> Result<Polygon, ValidationError> {
    let object = geometry.as_object().ok_or(ValidationError::NotAnObject {
        field: "geometry",
    })?;

    let kind = object.get("type").ok_or(ValidationError::MissingField {
        field: "geometry.type",
    })?;
    if !kind
        .as_str()
        .is_some_and(|kind| kind.eq_ignore_ascii_case("polygon"))
    {
        return Err(ValidationError::WrongGeometryType {
            found: kind.as_str().map_or_else(|| kind.to_string(), str::to_string),
        });
    }

    let coordinates = object
        .get("coordinates")
        .ok_or(ValidationError::MissingField {
            field: "geometry.coordinates",
        })?;

    let rings = coordinates
        .as_array()
        .filter(|rings| rings.iter().all(Value::is_array))
        .ok_or(ValidationError::MalformedCoordinates)?;

    let ring = match rings.as_slice() {
        [] => return Err(ValidationError::MalformedCoordinates),
        [ring] => ring,
        _ => return Err(ValidationError::UnsupportedInteriorRings),
    };

    let positions = ring
        .as_array()
        .ok_or(ValidationError::MalformedCoordinates)?;
    if positions.is_empty() {
        return Err(ValidationError::EmptyRing);
    }

    let positions = positions
        .iter()
        .map(|position| {
            position
                .as_array()
                .ok_or(ValidationError::MalformedCoordinates)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let positions = positions
        .into_iter()
        .map(|components| {
            components
                .iter()
                .map(|component| {
                    component
                        .as_f64()
                        .ok_or_else(|| ValidationError::NonNumericCoordinate {
                            token: component.to_string(),
                        })
                })
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Polygon::from_positions(positions)
}
