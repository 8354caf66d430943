#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Polygon validation and geodesic measurements for building footprints.
//!
//! Every polygon that enters the system, whether from a request body
//! ([`wkt::parse_wkt`], [`json::parse_geojson_geometry`]) or from a stored
//! row, passes through [`Polygon::from_positions`]. A [`Polygon`] value is
//! therefore always a closed ring of in-range `(longitude, latitude)` pairs
//! and downstream code never re-validates it.
//!
//! Measurements ([`measure`]) use the `geo` crate's geodesic algorithms on
//! the WGS84 ellipsoid and return meters / square meters.

pub mod json;
pub mod measure;
pub mod wkt;

pub use json::parse_geojson_geometry;
pub use wkt::parse_wkt;

/// Largest accepted absolute longitude, in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Largest accepted absolute latitude, in degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Whether `±MAX_LONGITUDE` / `±MAX_LATITUDE` themselves are legal values.
pub const INCLUSIVE_COORDINATE_BOUNDS: bool = true;

/// Fewest positions a closed ring may hold, closing position included.
pub const MIN_RING_POSITIONS: usize = 4;

/// A `[longitude, latitude]` pair in WGS84 degrees.
pub type Position = [f64; 2];

/// Reasons a geometry input is rejected.
///
/// Checks run in a fixed order (structure, numeric parse, arity, closure,
/// ring size, range) and stop at the first failure, so a single input always maps to
/// a single variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required key is absent.
    #[error("{field} is required")]
    MissingField {
        /// Dotted path of the missing key.
        field: &'static str,
    },

    /// A key is present but is not a JSON object.
    #[error("{field} must be an object")]
    NotAnObject {
        /// Dotted path of the offending key.
        field: &'static str,
    },

    /// `geometry.type` is not `polygon` (case-insensitive).
    #[error("geometry type must be polygon, got {found}")]
    WrongGeometryType {
        /// The type that was supplied.
        found: String,
    },

    /// The coordinates are not shaped as a list of rings of positions.
    #[error("polygon coordinates must be a list of rings of [longitude, latitude] positions")]
    MalformedCoordinates,

    /// More than one ring was supplied.
    #[error("polygons with interior rings are not supported")]
    UnsupportedInteriorRings,

    /// The ring holds no positions.
    #[error("polygon ring must contain at least one coordinate")]
    EmptyRing,

    /// The WKT text does not match `POLYGON ((x1 y1, x2 y2, ...))`.
    #[error("geometry must match POLYGON ((x1 y1, x2 y2, ...))")]
    MalformedWkt,

    /// A coordinate component is not a number.
    #[error("coordinates must be float, got {token}")]
    NonNumericCoordinate {
        /// The offending token as written in the input.
        token: String,
    },

    /// A position does not have exactly two components.
    #[error("not complete coord: position {index} has {found} components, expected 2")]
    InvalidCoordinateArity {
        /// Zero-based index of the position within the ring.
        index: usize,
        /// Number of components found.
        found: usize,
    },

    /// First and last positions differ.
    #[error("polygon not closed")]
    UnclosedPolygon,

    /// The closed ring has fewer than [`MIN_RING_POSITIONS`] positions.
    #[error("polygon ring must have at least {MIN_RING_POSITIONS} positions, got {found}")]
    TooFewPositions {
        /// Number of positions supplied.
        found: usize,
    },

    /// A longitude or latitude lies outside the WGS84 bounds.
    #[error("position {index} ({lon}, {lat}) is out of range")]
    CoordinateOutOfRange {
        /// Zero-based index of the position within the ring.
        index: usize,
        /// Longitude as supplied.
        lon: f64,
        /// Latitude as supplied.
        lat: f64,
    },
}

/// A validated simple polygon: one closed ring of WGS84 positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Position>,
}

impl Polygon {
    /// Validates numeric positions into a polygon.
    ///
    /// Runs the arity, closure, ring size and range checks, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRing`],
    /// [`ValidationError::InvalidCoordinateArity`],
    /// [`ValidationError::UnclosedPolygon`],
    /// [`ValidationError::TooFewPositions`] or
    /// [`ValidationError::CoordinateOutOfRange`].
    pub fn from_positions(positions: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        if positions.is_empty() {
            return Err(ValidationError::EmptyRing);
        }

        let mut ring = Vec::with_capacity(positions.len());
        for (index, position) in positions.into_iter().enumerate() {
            match position.as_slice() {
                &[lon, lat] => ring.push([lon, lat]),
                other => {
                    return Err(ValidationError::InvalidCoordinateArity {
                        index,
                        found: other.len(),
                    });
                }
            }
        }

        if !is_closed(&ring) {
            return Err(ValidationError::UnclosedPolygon);
        }

        if ring.len() < MIN_RING_POSITIONS {
            return Err(ValidationError::TooFewPositions { found: ring.len() });
        }

        if let Some((index, &[lon, lat])) = ring
            .iter()
            .enumerate()
            .find(|(_, [lon, lat])| !within_bounds(*lon, *lat))
        {
            return Err(ValidationError::CoordinateOutOfRange { index, lon, lat });
        }

        Ok(Self { ring })
    }

    /// The closed ring, in input order.
    #[must_use]
    pub fn ring(&self) -> &[Position] {
        &self.ring
    }

    /// Converts to a [`geo::Polygon`] with no interior rings.
    #[must_use]
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        let exterior: Vec<geo::Coord<f64>> = self
            .ring
            .iter()
            .map(|&[x, y]| geo::Coord { x, y })
            .collect();
        geo::Polygon::new(geo::LineString::from(exterior), vec![])
    }

    /// Converts to a `GeoJSON` `Polygon` geometry.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Geometry {
        let ring: Vec<geojson::Position> = self.ring.iter().map(|p| p.to_vec()).collect();
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }
}

/// A caller-supplied point that distances are measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl ReferencePoint {
    /// Builds a reference point, or `None` if either component is
    /// non-finite or out of range.
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Option<Self> {
        within_bounds(lon, lat).then_some(Self { lon, lat })
    }

    /// Converts to a [`geo::Point`].
    #[must_use]
    pub const fn to_geo(self) -> geo::Point<f64> {
        geo::Point(geo::Coord {
            x: self.lon,
            y: self.lat,
        })
    }
}

#[allow(clippy::float_cmp)]
fn is_closed(ring: &[Position]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

/// Checks a pair against the coordinate bounds. NaN never passes.
fn within_bounds(lon: f64, lat: f64) -> bool {
    within_limit(lon, MAX_LONGITUDE) && within_limit(lat, MAX_LATITUDE)
}

fn within_limit(value: f64, limit: f64) -> bool {
    if INCLUSIVE_COORDINATE_BOUNDS {
        value.abs() <= limit
    } else {
        value.abs() < limit
    }
}
