//! Conversion between request/response bodies and building records.
//!
//! Write direction: a raw JSON body is dispatched once into a [`Payload`]
//! and then validated into a [`BuildingDraft`]. Read direction: annotated
//! rows become `GeoJSON` features, with the derived properties chosen by a
//! [`FieldSet`].

use footprints_database_models::{AnnotatedBuilding, BuildingDraft};
use footprints_geometry::{Polygon, ValidationError, parse_geojson_geometry, parse_wkt};
use geojson::{Feature, FeatureCollection, JsonObject, feature::Id};
use serde_json::Value;

/// Longest accepted address, in characters.
pub const MAX_ADDRESS_LENGTH: usize = 255;

/// Derived properties to surface in a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldSet {
    /// Emit `properties.area`.
    pub include_area: bool,
    /// Emit `properties.distance`.
    pub include_distance: bool,
}

/// Whether a payload creates a building or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `POST`: address optional.
    Create,
    /// `PUT`: address required and non-empty.
    Update,
}

/// Reasons a create/update body is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    /// Neither a WKT string, a flat object, nor a `GeoJSON` Feature.
    #[error("wrong format: expected a WKT string, an object with address and geometry, or a GeoJSON Feature")]
    UnrecognizedPayloadShape,

    /// `address` is missing or empty on update.
    #[error("address is required")]
    AddressRequired,

    /// `address` is longer than [`MAX_ADDRESS_LENGTH`].
    #[error("address must be at most {MAX_ADDRESS_LENGTH} characters")]
    AddressTooLong,

    /// `address` is present but not a string.
    #[error("address must be a string")]
    AddressNotText,

    /// The geometry failed validation.
    #[error(transparent)]
    Geometry(#[from] ValidationError),
}

/// Geometry as found in a flat payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryInput {
    /// `POLYGON ((...))` text.
    Wkt(String),
    /// A `GeoJSON` geometry object (or anything else that is not a string).
    GeoJson(Value),
}

impl GeometryInput {
    fn validate(&self) -> Result<Polygon, ValidationError> {
        match self {
            Self::Wkt(text) => parse_wkt(text),
            Self::GeoJson(value) => parse_geojson_geometry(value),
        }
    }
}

/// A `GeoJSON` Feature body.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInput {
    /// `geometry` member, if present.
    pub geometry: Option<Value>,
    /// `properties.address`, if present.
    pub address: Option<Value>,
}

/// The accepted body shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A bare WKT string; carries no address.
    Wkt(String),
    /// `{"type": "Feature", "geometry": {...}, "properties": {"address": ...}}`
    Feature(FeatureInput),
    /// `{"address": ..., "geometry": ...}`; `geom` is accepted for `geometry`.
    Flat {
        /// Raw `address` value.
        address: Option<Value>,
        /// Geometry, if present.
        geometry: Option<GeometryInput>,
    },
}

impl Payload {
    /// Decides the shape of a raw body.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::UnrecognizedPayloadShape`] if the body matches
    /// none of the accepted shapes, or a structural [`ValidationError`] if a
    /// Feature's `properties` is missing or is neither an object nor `null`.
    pub fn dispatch(raw: &Value) -> Result<Self, PayloadError> {
        let object = match raw {
            Value::String(text) => return Ok(Self::Wkt(text.clone())),
            Value::Object(object) => object,
            _ => return Err(PayloadError::UnrecognizedPayloadShape),
        };

        if object.get("type").and_then(Value::as_str) == Some("Feature") {
            let address = match object.get("properties") {
                None => {
                    return Err(ValidationError::MissingField {
                        field: "properties",
                    }
                    .into());
                }
                Some(Value::Null) => None,
                Some(Value::Object(properties)) => properties.get("address").cloned(),
                Some(_) => {
                    return Err(ValidationError::NotAnObject {
                        field: "properties",
                    }
                    .into());
                }
            };
            return Ok(Self::Feature(FeatureInput {
                geometry: non_null(object.get("geometry")),
                address,
            }));
        }

        let address = non_null(object.get("address"));
        let geometry = non_null(object.get("geometry")).or_else(|| non_null(object.get("geom")));

        if address.is_none() && geometry.is_none() {
            return Err(PayloadError::UnrecognizedPayloadShape);
        }

        Ok(Self::Flat {
            address,
            geometry: geometry.map(|value| match value {
                Value::String(text) => GeometryInput::Wkt(text),
                other => GeometryInput::GeoJson(other),
            }),
        })
    }
}

/// Validates a create/update body into a draft.
///
/// Geometry is validated before the address.
///
/// # Errors
///
/// Returns a [`PayloadError`] describing the first problem found.
pub fn parse(raw: &Value, mode: WriteMode) -> Result<BuildingDraft, PayloadError> {
    let (address, geometry) = match Payload::dispatch(raw)? {
        Payload::Wkt(text) => (None, parse_wkt(&text)?),
        Payload::Feature(feature) => {
            let geometry = feature.geometry.ok_or(ValidationError::MissingField {
                field: "geometry",
            })?;
            (feature.address, parse_geojson_geometry(&geometry)?)
        }
        Payload::Flat { address, geometry } => {
            let geometry = geometry.ok_or(ValidationError::MissingField {
                field: "geometry",
            })?;
            (address, geometry.validate()?)
        }
    };

    Ok(BuildingDraft {
        address: check_address(address, mode)?,
        geometry,
    })
}

fn check_address(address: Option<Value>, mode: WriteMode) -> Result<String, PayloadError> {
    let address = match address {
        None => String::new(),
        Some(Value::String(text)) => text,
        Some(_) => return Err(PayloadError::AddressNotText),
    };

    if mode == WriteMode::Update && address.is_empty() {
        return Err(PayloadError::AddressRequired);
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(PayloadError::AddressTooLong);
    }

    Ok(address)
}

fn non_null(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Renders one building as a `GeoJSON` Feature.
///
/// A derived value that was not computed is omitted even when `fields`
/// asks for it.
#[must_use]
pub fn represent_one(building: &AnnotatedBuilding, fields: FieldSet) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert(
        "address".to_string(),
        Value::from(building.building.address.clone()),
    );

    if fields.include_area
        && let Some(area) = building.area
    {
        properties.insert("area".to_string(), Value::from(area));
    }
    if fields.include_distance
        && let Some(distance) = building.distance
    {
        properties.insert("distance".to_string(), Value::from(distance));
    }

    Feature {
        bbox: None,
        geometry: Some(building.building.geometry.to_geojson()),
        id: Some(Id::Number(building.building.id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Renders a result set as a `GeoJSON` `FeatureCollection`, in order.
#[must_use]
pub fn represent_many(buildings: &[AnnotatedBuilding], fields: FieldSet) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: buildings
            .iter()
            .map(|building| represent_one(building, fields))
            .collect(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use footprints_database_models::BuildingRow;
    use serde_json::json;

    use super::*;
    use crate::fixtures::TRIANGLE_WKT;

    fn triangle_coordinates() -> Value {
        json!([[
            [19.298_488_064_150_035, 43.510_902_041_818_866],
            [19.528_309_386_031_935, 43.246_868_662_227_09],
            [20.179_459_092_915_266, 42.825_727_835_371_85],
            [19.298_488_064_150_035, 43.510_902_041_818_866]
        ]])
    }

    fn feature_body(coordinates: &Value, address: &str) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": coordinates },
            "properties": { "address": address }
        })
    }

    fn annotated(area: Option<f64>, distance: Option<f64>) -> AnnotatedBuilding {
        AnnotatedBuilding {
            building: BuildingRow {
                id: 7,
                address: "1 Main St".to_string(),
                geometry: parse_wkt(TRIANGLE_WKT).unwrap(),
            },
            area,
            distance,
        }
    }

    #[test]
    fn dispatches_each_shape() {
        assert_eq!(
            Payload::dispatch(&json!(TRIANGLE_WKT)).unwrap(),
            Payload::Wkt(TRIANGLE_WKT.to_string())
        );
        assert!(matches!(
            Payload::dispatch(&feature_body(&triangle_coordinates(), "x")).unwrap(),
            Payload::Feature(_)
        ));
        assert_eq!(
            Payload::dispatch(&json!({ "address": "a", "geom": TRIANGLE_WKT })).unwrap(),
            Payload::Flat {
                address: Some(json!("a")),
                geometry: Some(GeometryInput::Wkt(TRIANGLE_WKT.to_string())),
            }
        );
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        for raw in [
            json!({}),
            json!({ "type": "FeatureCollection", "features": [] }),
            json!([1, 2, 3]),
            json!(42),
            json!(null),
        ] {
            assert_eq!(
                Payload::dispatch(&raw),
                Err(PayloadError::UnrecognizedPayloadShape),
                "{raw}"
            );
        }
    }

    #[test]
    fn parses_flat_wkt_on_create() {
        let draft = parse(
            &json!({ "address": "test", "geometry": TRIANGLE_WKT }),
            WriteMode::Create,
        )
        .unwrap();
        assert_eq!(draft.address, "test");
        assert_eq!(draft.geometry.ring().len(), 4);
    }

    #[test]
    fn parses_flat_geojson_geometry() {
        let draft = parse(
            &json!({
                "address": "test",
                "geometry": { "type": "Polygon", "coordinates": triangle_coordinates() }
            }),
            WriteMode::Create,
        )
        .unwrap();
        assert_eq!(draft.geometry, parse_wkt(TRIANGLE_WKT).unwrap());
    }

    #[test]
    fn address_is_optional_on_create() {
        let draft = parse(&json!({ "geometry": TRIANGLE_WKT }), WriteMode::Create).unwrap();
        assert_eq!(draft.address, "");

        let draft = parse(&json!(TRIANGLE_WKT), WriteMode::Create).unwrap();
        assert_eq!(draft.address, "");
    }

    #[test]
    fn address_is_required_on_update() {
        for raw in [
            json!({ "geometry": TRIANGLE_WKT }),
            json!({ "address": "", "geometry": TRIANGLE_WKT }),
            json!(TRIANGLE_WKT),
            feature_body(&triangle_coordinates(), ""),
        ] {
            assert_eq!(
                parse(&raw, WriteMode::Update),
                Err(PayloadError::AddressRequired),
                "{raw}"
            );
        }
    }

    #[test]
    fn address_length_is_limited() {
        let long = "a".repeat(MAX_ADDRESS_LENGTH + 1);
        assert_eq!(
            parse(&json!({ "address": long, "geometry": TRIANGLE_WKT }), WriteMode::Create),
            Err(PayloadError::AddressTooLong)
        );

        let limit = "é".repeat(MAX_ADDRESS_LENGTH);
        assert!(
            parse(&json!({ "address": limit, "geometry": TRIANGLE_WKT }), WriteMode::Create)
                .is_ok()
        );
    }

    #[test]
    fn non_string_address_is_rejected() {
        assert_eq!(
            parse(&json!({ "address": 12, "geometry": TRIANGLE_WKT }), WriteMode::Create),
            Err(PayloadError::AddressNotText)
        );
    }

    #[test]
    fn flat_payload_without_geometry_is_rejected() {
        assert_eq!(
            parse(&json!({ "address": "test" }), WriteMode::Create),
            Err(PayloadError::Geometry(ValidationError::MissingField {
                field: "geometry"
            }))
        );
    }

    #[test]
    fn unclosed_feature_is_rejected() {
        let coordinates = json!([[[19.29, 43.51], [19.52, 43.24], [20.17, 42.82]]]);
        assert_eq!(
            parse(&feature_body(&coordinates, "test"), WriteMode::Create),
            Err(PayloadError::Geometry(ValidationError::UnclosedPolygon))
        );
    }

    #[test]
    fn feature_with_point_geometry_is_rejected() {
        let raw = json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0, 0] },
            "properties": {}
        });
        assert!(matches!(
            parse(&raw, WriteMode::Create),
            Err(PayloadError::Geometry(ValidationError::WrongGeometryType { .. }))
        ));
    }

    #[test]
    fn feature_properties_must_be_an_object() {
        let raw = json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": triangle_coordinates() },
            "properties": "test"
        });
        assert_eq!(
            parse(&raw, WriteMode::Create),
            Err(PayloadError::Geometry(ValidationError::NotAnObject {
                field: "properties"
            }))
        );
    }

    #[test]
    fn feature_without_properties_key_is_rejected() {
        let raw = json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": triangle_coordinates() }
        });
        assert_eq!(
            parse(&raw, WriteMode::Create),
            Err(PayloadError::Geometry(ValidationError::MissingField {
                field: "properties"
            }))
        );
    }

    #[test]
    fn feature_with_null_properties_is_accepted_on_create() {
        let raw = json!({
            "type": "Feature",
            "geometry": { "type": "Polygon", "coordinates": triangle_coordinates() },
            "properties": null
        });
        assert_eq!(parse(&raw, WriteMode::Create).unwrap().address, "");
    }

    #[test]
    fn representation_always_has_id_address_and_geometry() {
        let feature = serde_json::to_value(represent_one(
            &annotated(Some(1.0), Some(2.0)),
            FieldSet::default(),
        ))
        .unwrap();

        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["id"], 7);
        assert_eq!(feature["geometry"]["type"], "Polygon");
        assert_eq!(feature["geometry"]["coordinates"], triangle_coordinates());
        assert_eq!(
            feature["properties"],
            json!({ "address": "1 Main St" })
        );
    }

    #[test]
    fn derived_fields_follow_the_field_set() {
        let fields = FieldSet {
            include_area: true,
            include_distance: true,
        };
        let feature = serde_json::to_value(represent_one(&annotated(Some(1.5), Some(0.0)), fields))
            .unwrap();
        assert_eq!(feature["properties"]["area"], 1.5);
        assert_eq!(feature["properties"]["distance"], 0.0);

        let fields = FieldSet {
            include_area: true,
            include_distance: false,
        };
        let feature = serde_json::to_value(represent_one(&annotated(Some(1.5), Some(3.0)), fields))
            .unwrap();
        assert!(feature["properties"].get("distance").is_none());
    }

    #[test]
    fn missing_computed_value_is_omitted_not_an_error() {
        let fields = FieldSet {
            include_area: true,
            include_distance: true,
        };
        let feature = serde_json::to_value(represent_one(&annotated(None, None), fields)).unwrap();
        assert_eq!(feature["properties"], json!({ "address": "1 Main St" }));
    }

    #[test]
    fn collection_keeps_order() {
        let mut second = annotated(None, None);
        second.building.id = 8;
        let collection = serde_json::to_value(represent_many(
            &[annotated(None, None), second],
            FieldSet::default(),
        ))
        .unwrap();

        assert_eq!(collection["type"], "FeatureCollection");
        assert_eq!(collection["features"][0]["id"], 7);
        assert_eq!(collection["features"][1]["id"], 8);

        let empty = serde_json::to_value(represent_many(&[], FieldSet::default())).unwrap();
        assert_eq!(empty["features"], json!([]));
    }
}
