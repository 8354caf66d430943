#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Building row types and spatial query plan definitions.
//!
//! These types describe data as stored in and retrieved from the buildings
//! database, plus the [`SpatialPlan`] that tells the storage layer which
//! derived fields to compute and which predicates to filter by. They are
//! distinct from the `GeoJSON` response shapes built by the server.

use footprints_geometry::{Polygon, ReferencePoint};

/// A building as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingRow {
    /// Primary key, assigned by storage.
    pub id: i64,
    /// Free-text address; empty when none was given on create.
    pub address: String,
    /// Validated footprint.
    pub geometry: Polygon,
}

/// A validated create/update payload, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingDraft {
    /// Address to store.
    pub address: String,
    /// Footprint to store.
    pub geometry: Polygon,
}

/// A stored building with the derived fields computed for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBuilding {
    /// The stored row.
    pub building: BuildingRow,
    /// Area in square meters, if requested.
    pub area: Option<f64>,
    /// Distance in meters to the reference point, if one was given.
    pub distance: Option<f64>,
}

/// A derived field to compute for every candidate row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    /// Footprint area.
    Area,
    /// Distance from the footprint to a point.
    Distance(ReferencePoint),
}

/// A strict numeric comparison on a derived field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// `min < area`
    AreaAbove(f64),
    /// `area < max`
    AreaBelow(f64),
    /// `distance < max`
    DistanceBelow(f64),
}

/// Annotations and predicates to evaluate against the buildings table.
///
/// Predicates are ANDed. Every predicate's field has a matching annotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialPlan {
    /// Derived fields to compute.
    pub annotations: Vec<Annotation>,
    /// Filters applied to the annotated rows, in order.
    pub predicates: Vec<Predicate>,
}

impl SpatialPlan {
    /// Whether area is computed by this plan.
    #[must_use]
    pub fn annotates_area(&self) -> bool {
        self.annotations.contains(&Annotation::Area)
    }

    /// The reference point distances are measured against, if any.
    #[must_use]
    pub fn reference_point(&self) -> Option<ReferencePoint> {
        self.annotations.iter().find_map(|annotation| match annotation {
            Annotation::Distance(point) => Some(*point),
            Annotation::Area => None,
        })
    }

    /// The same annotations with every predicate removed.
    #[must_use]
    pub fn without_predicates(&self) -> Self {
        Self {
            annotations: self.annotations.clone(),
            predicates: Vec::new(),
        }
    }
}
