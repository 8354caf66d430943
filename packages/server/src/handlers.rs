//! HTTP handler functions for the buildings API.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, web};
use footprints_server_models::{ApiHealth, BuildingQueryParams};
use serde_json::Value;

use crate::AppState;
use crate::error::ApiError;
use crate::orchestrator;

/// Query string extraction that never fails the request.
type QueryParams = Result<web::Query<BuildingQueryParams>, actix_web::Error>;

/// A JSON body, or a form-encoded flat body.
type Body = Result<
    web::Either<web::Json<Value>, web::Form<BTreeMap<String, String>>>,
    actix_web::Error,
>;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/buildings`
///
/// Lists buildings, annotated and filtered by the query parameters.
pub async fn list_buildings(
    state: web::Data<AppState>,
    params: QueryParams,
) -> Result<HttpResponse, ApiError> {
    let collection = orchestrator::list(state.db.as_ref(), &query_params(params)).await?;

    Ok(HttpResponse::Ok().json(collection))
}

/// `GET /api/buildings/{id}`
pub async fn retrieve_building(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: QueryParams,
) -> Result<HttpResponse, ApiError> {
    let feature =
        orchestrator::retrieve(state.db.as_ref(), &path.into_inner(), &query_params(params))
            .await?;

    Ok(HttpResponse::Ok().json(feature))
}

/// `POST /api/buildings`
pub async fn create_building(
    state: web::Data<AppState>,
    body: Body,
    params: QueryParams,
) -> Result<HttpResponse, ApiError> {
    let body = request_body(body)?;
    let feature = orchestrator::create(state.db.as_ref(), &body, &query_params(params)).await?;

    Ok(HttpResponse::Created().json(feature))
}

/// `PUT /api/buildings/{id}`
///
/// Full replacement; `address` is required.
pub async fn update_building(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Body,
    params: QueryParams,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let params = query_params(params);

    // An unknown id wins over an unreadable body.
    let body = match request_body(body) {
        Ok(body) => body,
        Err(e) => {
            orchestrator::retrieve(state.db.as_ref(), &id, &BuildingQueryParams::default())
                .await?;
            return Err(e);
        }
    };

    let feature = orchestrator::update(state.db.as_ref(), &id, &body, &params).await?;

    Ok(HttpResponse::Ok().json(feature))
}

/// `DELETE /api/buildings/{id}`
pub async fn delete_building(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    orchestrator::delete(state.db.as_ref(), &path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn query_params(params: QueryParams) -> BuildingQueryParams {
    params.map_or_else(
        |e| {
            log::debug!("Ignoring unreadable query string: {e}");
            BuildingQueryParams::default()
        },
        web::Query::into_inner,
    )
}

fn request_body(body: Body) -> Result<Value, ApiError> {
    match body {
        Ok(web::Either::Left(json)) => Ok(json.into_inner()),
        Ok(web::Either::Right(form)) => Ok(Value::Object(
            form.into_inner()
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect(),
        )),
        Err(e) => {
            log::debug!("Unreadable request body: {e}");
            Err(ApiError::BadRequest(vec![format!(
                "could not read request body as JSON or form data: {e}"
            )]))
        }
    }
}
