// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted records and the storage collaborators the handlers consume.
//!
//! Implementations own their interior mutability; every method takes
//! `&self`. A caller that needs atomicity across several writes wraps the
//! calls in its own transaction.

use std::collections::BTreeMap;

use floorplan_lite_classification::{AreaType, Classifications};
use floorplan_lite_layout::{Annotation, GeoReference};
use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A persisted area row.
///
/// `coord_x`/`coord_y` hold the area's representative point in the editor
/// frame; `scaled_polygon` is the footprint as WKT in the metric frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub id: i64,
    pub plan_id: i64,
    pub coord_x: f64,
    pub coord_y: f64,
    pub area_type: AreaType,
    #[serde(default)]
    pub scaled_polygon: String,
}

/// An area row that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAreaRecord {
    pub plan_id: i64,
    pub coord_x: f64,
    pub coord_y: f64,
    pub area_type: AreaType,
    #[serde(default)]
    pub scaled_polygon: String,
}

impl NewAreaRecord {
    pub fn with_id(self, id: i64) -> AreaRecord {
        AreaRecord {
            id,
            plan_id: self.plan_id,
            coord_x: self.coord_x,
            coord_y: self.coord_y,
            area_type: self.area_type,
            scaled_polygon: self.scaled_polygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: i64,
    pub site_id: i64,
    /// Site-frame anchor of the plan, in metres.
    #[serde(default)]
    pub georef_x: f64,
    #[serde(default)]
    pub georef_y: f64,
    /// Counter-clockwise rotation in degrees.
    #[serde(default)]
    pub georef_rot_angle: f64,
    /// Rotation pivot in the plan's metric frame.
    #[serde(default)]
    pub georef_rot_x: f64,
    #[serde(default)]
    pub georef_rot_y: f64,
}

impl PlanRecord {
    pub fn georeference(&self) -> GeoReference {
        GeoReference {
            rotation_deg: self.georef_rot_angle,
            pivot: Coord {
                x: self.georef_rot_x,
                y: self.georef_rot_y,
            },
            anchor: Coord {
                x: self.georef_x,
                y: self.georef_y,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: i64,
    #[serde(default)]
    pub classification_scheme: Classifications,
}

/// Updatable columns of an area row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaField {
    CoordX,
    CoordY,
    AreaType,
    ScaledPolygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    AreaType(AreaType),
    Text(String),
}

/// Batched updates: column to `{row id: new value}`.
pub type AreaUpdates = BTreeMap<AreaField, BTreeMap<i64, FieldValue>>;

pub trait PlanStore {
    fn get_plan(&self, plan_id: i64) -> Result<PlanRecord>;
}

pub trait SiteStore {
    fn get_site(&self, site_id: i64) -> Result<SiteRecord>;
}

pub trait AnnotationStore {
    /// The plan's editor annotation; `Error::NotFound` when none is stored.
    fn get_annotation(&self, plan_id: i64) -> Result<Annotation>;
}

pub trait AreaStore {
    fn find_by_plan(&self, plan_id: i64) -> Result<Vec<AreaRecord>>;

    /// `Error::NotFound` when the row does not exist.
    fn get_by_id(&self, id: i64) -> Result<AreaRecord>;

    /// Inserts rows in order and returns their ids in the same order.
    fn bulk_insert(&self, rows: Vec<NewAreaRecord>) -> Result<Vec<i64>>;

    fn bulk_update(&self, updates: &AreaUpdates) -> Result<()>;

    /// Deletes the given rows and returns how many existed.
    fn delete_in(&self, ids: &[i64]) -> Result<usize>;
}

/// Everything the handlers need from storage.
pub trait Repository: PlanStore + SiteStore + AnnotationStore + AreaStore {}

impl<T: PlanStore + SiteStore + AnnotationStore + AreaStore> Repository for T {}
