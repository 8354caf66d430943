//! Shared test data.

use std::path::PathBuf;
use std::sync::Arc;

use footprints_database::{db, queries};
use footprints_database_models::BuildingDraft;
use footprints_geometry::parse_wkt;

use crate::AppState;

/// Triangle in Serbia with a closed ring.
pub const TRIANGLE_WKT: &str = "POLYGON ((19.298488064150035 43.510902041818866, \
    19.528309386031935 43.24686866222709, 20.179459092915266 42.82572783537185, \
    19.298488064150035 43.510902041818866))";

/// Reference longitude used by the distance fixtures.
pub const REFERENCE_LON: &str = "39.67013";
/// Reference latitude used by the distance fixtures.
pub const REFERENCE_LAT: &str = "47.21086";

/// `(address, wkt)` rectangles at increasing distance from the reference
/// point: contains it (~400 m²), ~100 m (~900 m²), ~500 m (~1600 m²),
/// ~1500 m (~3600 m²).
pub const DISTANCE_FIXTURES: [(&str, &str); 4] = [
    (
        "a",
        "POLYGON ((39.669998 47.21077, 39.670262 47.21077, \
         39.670262 47.21095, 39.669998 47.21095, 39.669998 47.21077))",
    ),
    (
        "b",
        "POLYGON ((39.67013 47.21176, 39.670527 47.21176, \
         39.670527 47.21203, 39.67013 47.21203, 39.67013 47.21176))",
    ),
    (
        "c",
        "POLYGON ((39.67013 47.21536, 39.670659 47.21536, \
         39.670659 47.21572, 39.67013 47.21572, 39.67013 47.21536))",
    ),
    (
        "d",
        "POLYGON ((39.67013 47.22436, 39.670923 47.22436, \
         39.670923 47.2249, 39.67013 47.2249, 39.67013 47.22436))",
    ),
];

/// Fixture "b" traced clockwise (~900 m², ~100 m from the reference point).
pub const CLOCKWISE_WKT: &str = "POLYGON ((39.67013 47.21176, 39.67013 47.21203, \
    39.670527 47.21203, 39.670527 47.21176, 39.67013 47.21176))";

pub fn temp_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("footprints-server-{}.db", uuid::Uuid::new_v4()))
}

/// Fresh state backed by an empty temporary database.
pub async fn empty_state() -> AppState {
    let db = db::open(&temp_db_path())
        .await
        .expect("Failed to open test database");

    AppState { db: Arc::from(db) }
}

/// Fresh state seeded with [`DISTANCE_FIXTURES`], inserted in order.
pub async fn seeded_state() -> AppState {
    let state = empty_state().await;

    for (address, wkt) in DISTANCE_FIXTURES {
        let draft = BuildingDraft {
            address: address.to_string(),
            geometry: parse_wkt(wkt).expect("Invalid fixture geometry"),
        };
        queries::insert_building(state.db.as_ref(), &draft)
            .await
            .expect("Failed to seed building");
    }

    state
}
