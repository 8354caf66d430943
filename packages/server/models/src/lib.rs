#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the building footprints server.
//!
//! Feature and `FeatureCollection` bodies are built with the `geojson`
//! crate by the server itself; this crate only holds the small envelopes
//! around them.

use serde::{Deserialize, Serialize};

/// Query parameters accepted by the list and retrieve endpoints.
///
/// Every field is kept as raw text so that a malformed number degrades to
/// "parameter absent" in the planner instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildingQueryParams {
    /// Presence flag: attach `area` to every returned feature.
    pub area: Option<String>,
    /// Exclusive lower bound on area, in square meters.
    pub min_area: Option<String>,
    /// Exclusive upper bound on area, in square meters.
    pub max_area: Option<String>,
    /// Reference point longitude.
    pub longitude: Option<String>,
    /// Reference point latitude.
    pub latitude: Option<String>,
    /// Exclusive upper bound on distance to the reference point, in meters.
    pub max_distance: Option<String>,
}

/// Error response body: `{"detail": ["..."]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable messages, most specific first.
    pub detail: Vec<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
