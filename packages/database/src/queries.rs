//! Building CRUD queries and spatial plan evaluation.
//!
//! Writes go through raw SQL with `?` placeholders. Reads decode every
//! stored geometry through the geometry validator, then
//! [`query_buildings`] attaches the plan's derived fields in a single pass
//! and keeps the rows that satisfy every predicate.

use footprints_database_models::{
    AnnotatedBuilding, Annotation, BuildingDraft, BuildingRow, Predicate, SpatialPlan,
};
use footprints_geometry::{Polygon, measure, parse_geojson_geometry};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Inserts a new building and returns the stored row.
///
/// # Errors
///
/// Returns [`DbError`] if the insert fails or the new id cannot be read.
pub async fn insert_building(
    db: &dyn Database,
    draft: &BuildingDraft,
) -> Result<BuildingRow, DbError> {
    let rows = db
        .query_raw_params(
            "INSERT INTO buildings (address, geometry)
             VALUES (?, ?)
             RETURNING id",
            &[
                DatabaseValue::String(draft.address.clone()),
                DatabaseValue::String(encode_geometry(&draft.geometry)?),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| DbError::Conversion {
        message: "Failed to get building id from insert".to_string(),
    })?;

    let id: i64 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse building id: {e}"),
    })?;

    Ok(BuildingRow {
        id,
        address: draft.address.clone(),
        geometry: draft.geometry.clone(),
    })
}

/// Replaces the address and geometry of an existing building.
///
/// Returns `None` if no building has the given id.
///
/// # Errors
///
/// Returns [`DbError`] if the update fails.
pub async fn update_building(
    db: &dyn Database,
    id: i64,
    draft: &BuildingDraft,
) -> Result<Option<BuildingRow>, DbError> {
    let updated = db
        .exec_raw_params(
            "UPDATE buildings SET address = ?, geometry = ? WHERE id = ?",
            &[
                DatabaseValue::String(draft.address.clone()),
                DatabaseValue::String(encode_geometry(&draft.geometry)?),
                DatabaseValue::Int64(id),
            ],
        )
        .await?;

    Ok((updated > 0).then(|| BuildingRow {
        id,
        address: draft.address.clone(),
        geometry: draft.geometry.clone(),
    }))
}

/// Deletes a building. Returns `false` if no building has the given id.
///
/// # Errors
///
/// Returns [`DbError`] if the delete fails.
pub async fn delete_building(db: &dyn Database, id: i64) -> Result<bool, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM buildings WHERE id = ?",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(deleted > 0)
}

/// Loads a single building by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the stored row is invalid.
pub async fn get_building(db: &dyn Database, id: i64) -> Result<Option<BuildingRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, address, geometry FROM buildings WHERE id = ?",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    rows.first().map(decode_row).transpose()
}

/// Loads every building, ordered by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored row is invalid.
pub async fn list_buildings(db: &dyn Database) -> Result<Vec<BuildingRow>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id, address, geometry FROM buildings ORDER BY id",
            &[],
        )
        .await?;

    rows.iter().map(decode_row).collect()
}

/// Evaluates a plan against the whole table.
///
/// # Errors
///
/// Returns [`DbError`] if loading the rows fails.
pub async fn query_buildings(
    db: &dyn Database,
    plan: &SpatialPlan,
) -> Result<Vec<AnnotatedBuilding>, DbError> {
    let rows = list_buildings(db).await?;
    let total = rows.len();

    let matches: Vec<AnnotatedBuilding> = rows
        .into_iter()
        .map(|row| annotate(row, plan))
        .filter(|building| satisfies_all(building, &plan.predicates))
        .collect();

    log::debug!(
        "Spatial plan kept {} of {total} buildings ({} annotations, {} predicates)",
        matches.len(),
        plan.annotations.len(),
        plan.predicates.len()
    );

    Ok(matches)
}

/// Evaluates a plan against a single building.
///
/// Returns `None` if the building does not exist or fails a predicate.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn find_building(
    db: &dyn Database,
    id: i64,
    plan: &SpatialPlan,
) -> Result<Option<AnnotatedBuilding>, DbError> {
    Ok(get_building(db, id)
        .await?
        .map(|row| annotate(row, plan))
        .filter(|building| satisfies_all(building, &plan.predicates)))
}

/// Attaches the plan's derived fields to a row.
#[must_use]
pub fn annotate(building: BuildingRow, plan: &SpatialPlan) -> AnnotatedBuilding {
    let mut area = None;
    let mut distance = None;

    for annotation in &plan.annotations {
        match annotation {
            Annotation::Area => area = Some(measure::area_sq_m(&building.geometry)),
            Annotation::Distance(point) => {
                distance = Some(measure::distance_m(&building.geometry, *point));
            }
        }
    }

    AnnotatedBuilding {
        building,
        area,
        distance,
    }
}

/// Whether an annotated building passes a predicate. A missing derived
/// value never passes.
#[must_use]
pub fn satisfies(building: &AnnotatedBuilding, predicate: &Predicate) -> bool {
    match *predicate {
        Predicate::AreaAbove(min) => building.area.is_some_and(|area| min < area),
        Predicate::AreaBelow(max) => building.area.is_some_and(|area| area < max),
        Predicate::DistanceBelow(max) => building.distance.is_some_and(|distance| distance < max),
    }
}

fn satisfies_all(building: &AnnotatedBuilding, predicates: &[Predicate]) -> bool {
    predicates
        .iter()
        .all(|predicate| satisfies(building, predicate))
}

fn decode_row(row: &switchy_database::Row) -> Result<BuildingRow, DbError> {
    let id: i64 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse building id: {e}"),
    })?;
    let address: String = row.to_value("address").map_err(|e| DbError::Conversion {
        message: format!("Failed to read address of building {id}: {e}"),
    })?;
    let geometry: String = row.to_value("geometry").map_err(|e| DbError::Conversion {
        message: format!("Failed to read geometry of building {id}: {e}"),
    })?;

    Ok(BuildingRow {
        id,
        address,
        geometry: decode_geometry(id, &geometry)?,
    })
}

fn decode_geometry(id: i64, text: &str) -> Result<Polygon, DbError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DbError::Conversion {
            message: format!("Stored geometry of building {id} is not JSON: {e}"),
        })?;

    parse_geojson_geometry(&value).map_err(|e| DbError::Conversion {
        message: format!("Stored geometry of building {id} is invalid: {e}"),
    })
}

fn encode_geometry(polygon: &Polygon) -> Result<String, DbError> {
    serde_json::to_string(&polygon.to_geojson()).map_err(|e| DbError::Conversion {
        message: format!("Failed to encode geometry: {e}"),
    })
}
