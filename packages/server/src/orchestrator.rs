//! Per-request coordination of planner, serializer, and storage.
//!
//! Handlers stay thin: they extract the request parts and hand them to one
//! of the operations here, which return response bodies or an [`ApiError`].

use footprints_database::queries;
use footprints_database_models::{Annotation, SpatialPlan};
use footprints_server_models::BuildingQueryParams;
use geojson::{Feature, FeatureCollection};
use serde_json::Value;
use switchy_database::Database;

use crate::error::ApiError;
use crate::planner;
use crate::serializer::{self, FieldSet, WriteMode};

/// The five building operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Retrieve,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Whether this operation only reads.
    #[must_use]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::List | Self::Retrieve)
    }
}

/// The plan and visible fields for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub operation: Operation,
    pub plan: SpatialPlan,
    pub fields: FieldSet,
}

impl RequestContext {
    /// Derives the plan and field set for `operation` from the query string.
    ///
    /// Retrieve keeps the annotations but drops every predicate. Writes only
    /// ever compute area, and only when the `area` flag is present.
    #[must_use]
    pub fn new(operation: Operation, params: &BuildingQueryParams) -> Self {
        let full = planner::plan(params);

        let plan = match operation {
            Operation::List => full,
            Operation::Retrieve => full.without_predicates(),
            Operation::Create | Operation::Update | Operation::Delete => SpatialPlan {
                annotations: if params.area.is_some() {
                    vec![Annotation::Area]
                } else {
                    Vec::new()
                },
                predicates: Vec::new(),
            },
        };

        let fields = FieldSet {
            include_area: params.area.is_some(),
            include_distance: operation.is_read() && plan.reference_point().is_some(),
        };

        Self {
            operation,
            plan,
            fields,
        }
    }
}

/// `GET /buildings`
///
/// # Errors
///
/// Returns [`ApiError::Database`] if storage fails.
pub async fn list(
    db: &dyn Database,
    params: &BuildingQueryParams,
) -> Result<FeatureCollection, ApiError> {
    let ctx = RequestContext::new(Operation::List, params);
    let buildings = queries::query_buildings(db, &ctx.plan).await?;

    Ok(serializer::represent_many(&buildings, ctx.fields))
}

/// `GET /buildings/{id}`
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn retrieve(
    db: &dyn Database,
    id: &str,
    params: &BuildingQueryParams,
) -> Result<Feature, ApiError> {
    let id = parse_id(id)?;
    let ctx = RequestContext::new(Operation::Retrieve, params);
    let building = queries::find_building(db, id, &ctx.plan)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(serializer::represent_one(&building, ctx.fields))
}

/// `POST /buildings`
///
/// # Errors
///
/// Returns [`ApiError::BadRequest`] if the body is invalid.
pub async fn create(
    db: &dyn Database,
    body: &Value,
    params: &BuildingQueryParams,
) -> Result<Feature, ApiError> {
    let ctx = RequestContext::new(Operation::Create, params);
    let draft = serializer::parse(body, WriteMode::Create)?;
    let row = queries::insert_building(db, &draft).await?;

    log::info!("Created building {}", row.id);
    Ok(serializer::represent_one(
        &queries::annotate(row, &ctx.plan),
        ctx.fields,
    ))
}

/// `PUT /buildings/{id}`
///
/// An unknown id is reported before the body is validated.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id and
/// [`ApiError::BadRequest`] if the body is invalid.
pub async fn update(
    db: &dyn Database,
    id: &str,
    body: &Value,
    params: &BuildingQueryParams,
) -> Result<Feature, ApiError> {
    let id = parse_id(id)?;
    let ctx = RequestContext::new(Operation::Update, params);

    if queries::get_building(db, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let draft = serializer::parse(body, WriteMode::Update)?;
    let row = queries::update_building(db, id, &draft)
        .await?
        .ok_or(ApiError::NotFound)?;

    log::info!("Updated building {id}");
    Ok(serializer::represent_one(
        &queries::annotate(row, &ctx.plan),
        ctx.fields,
    ))
}

/// `DELETE /buildings/{id}`
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] for an unknown id.
pub async fn delete(db: &dyn Database, id: &str) -> Result<(), ApiError> {
    let id = parse_id(id)?;

    if !queries::delete_building(db, id).await? {
        return Err(ApiError::NotFound);
    }

    log::info!("Deleted building {id}");
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| {
        log::debug!("Non-integer building id {raw:?}");
        ApiError::NotFound
    })
}

#[cfg(test)]
mod tests {
    use footprints_geometry::ReferencePoint;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BuildingQueryParams {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        actix_web::web::Query::<BuildingQueryParams>::from_query(&query)
            .unwrap()
            .into_inner()
    }

    fn full_params() -> BuildingQueryParams {
        params(&[
            ("area", ""),
            ("min_area", "1"),
            ("longitude", "39.67013"),
            ("latitude", "47.21086"),
            ("max_distance", "10"),
        ])
    }

    #[test]
    fn list_uses_the_full_plan() {
        let ctx = RequestContext::new(Operation::List, &full_params());
        assert_eq!(ctx.plan, planner::plan(&full_params()));
        assert!(ctx.fields.include_area && ctx.fields.include_distance);
    }

    #[test]
    fn retrieve_never_filters() {
        let ctx = RequestContext::new(Operation::Retrieve, &full_params());
        assert!(ctx.plan.predicates.is_empty());
        assert_eq!(
            ctx.plan.reference_point(),
            ReferencePoint::new(39.670_13, 47.210_86)
        );
        assert!(ctx.fields.include_distance);
    }

    #[test]
    fn writes_never_show_distance() {
        for operation in [Operation::Create, Operation::Update] {
            let ctx = RequestContext::new(operation, &full_params());
            assert_eq!(ctx.plan.annotations, vec![Annotation::Area]);
            assert!(ctx.plan.predicates.is_empty());
            assert!(ctx.fields.include_area);
            assert!(!ctx.fields.include_distance);
        }
    }

    #[test]
    fn area_bound_alone_does_not_show_area() {
        let ctx = RequestContext::new(Operation::List, &params(&[("min_area", "1")]));
        assert!(ctx.plan.annotates_area());
        assert!(!ctx.fields.include_area);
    }

    #[test]
    fn lone_longitude_shows_no_distance() {
        let ctx = RequestContext::new(Operation::List, &params(&[("longitude", "39.67")]));
        assert_eq!(ctx.fields, FieldSet::default());
        assert_eq!(ctx.plan, SpatialPlan::default());
    }

    #[test]
    fn non_integer_ids_are_not_found() {
        for raw in ["abc", "1.5", "", "99999999999999999999"] {
            assert!(matches!(parse_id(raw), Err(ApiError::NotFound)), "{raw}");
        }
        assert!(matches!(parse_id("42"), Ok(42)));
    }
}
