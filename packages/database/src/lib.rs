#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `SQLite` storage for building footprints.
//!
//! Uses `switchy_database` with the `rusqlite` backend. Footprints are
//! stored as `GeoJSON` geometry text and decoded through the geometry
//! validator on the way out. Derived fields (area, distance) are computed
//! here while evaluating a [`SpatialPlan`](footprints_database_models::SpatialPlan),
//! since `SQLite` has no geodesic functions of its own.

pub mod db;
pub mod queries;

use switchy_database::Database;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// The database could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// An I/O operation failed (e.g., creating the data directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Creates the `buildings` table if it doesn't already exist.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn ensure_schema(db: &dyn Database) -> Result<(), DbError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS buildings (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            address   TEXT NOT NULL CHECK (length(address) <= 255),
            geometry  TEXT NOT NULL
        )",
    )
    .await?;

    log::debug!("Buildings schema is ready");
    Ok(())
}
