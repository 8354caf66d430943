#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for building footprints.
//!
//! Serves a `GeoJSON` REST API under `/api/buildings` for creating,
//! replacing, deleting, and querying building footprints, with optional
//! area and distance annotations and filters. Footprints are stored in a
//! `SQLite` database at `data/buildings.db` by default.

pub mod config;
pub mod error;
mod handlers;
pub mod orchestrator;
pub mod planner;
pub mod serializer;

#[cfg(test)]
mod fixtures;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use footprints_database::db;
use switchy_database::Database;

use crate::config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Buildings database connection.
    pub db: Arc<dyn Database>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .service(
                web::resource("/buildings")
                    .route(web::get().to(handlers::list_buildings))
                    .route(web::post().to(handlers::create_building)),
            )
            .service(
                web::resource("/buildings/{id}")
                    .route(web::get().to(handlers::retrieve_building))
                    .route(web::put().to(handlers::update_building))
                    .route(web::delete().to(handlers::delete_building)),
            ),
    );
}

/// Opens the database and serves the API until shutdown.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the address
/// cannot be bound.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Opening database at {}...", config.db_path.display());
    let db_conn = db::open(&config.db_path)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
