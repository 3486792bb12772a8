// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of a plan's persisted area rows with its annotation.

use floorplan_lite_layout::{polygon_wkt, representative_point, to_storage_frame, LayoutConfig};
use geo::Coord;
use serde::Serialize;

use crate::error::Result;
use crate::plan_layout_handler::{LayoutOptions, PlanLayoutHandler};
use crate::reconcile::map_existing_areas;
use crate::store::{AreaField, AreaRecord, AreaUpdates, FieldValue, NewAreaRecord, Repository};

/// Stored coordinates closer than this are considered unchanged.
const COORD_EPSILON: f64 = 1e-9;

/// What a reconciliation pass wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub plan_id: i64,
    /// Rows matched to an area of the fresh layout.
    pub recovered: Vec<i64>,
    /// Ids of inserted rows, in insertion order.
    pub inserted: Vec<i64>,
    /// Rows with at least one changed column.
    pub updated: Vec<i64>,
    pub deleted: Vec<i64>,
}

pub struct AreaHandler<'a> {
    repo: &'a dyn Repository,
    config: LayoutConfig,
}

impl<'a> AreaHandler<'a> {
    pub fn new(repo: &'a dyn Repository, config: LayoutConfig) -> Self {
        Self { repo, config }
    }

    /// Brings the plan's area rows in line with its current annotation.
    ///
    /// Rows matched to a fresh area keep their id and type and get refreshed
    /// coordinates and polygon. Fresh areas without a match are inserted with
    /// the type the layout inferred. Rows matched by no area are deleted.
    /// Afterwards the plan has exactly one row per area.
    ///
    /// The store calls are not atomic; wrap them in a transaction when the
    /// store supports one.
    pub fn recover_and_upsert_areas(&self, plan_id: i64) -> Result<ReconciliationReport> {
        let handler = PlanLayoutHandler::new(plan_id, self.repo, self.config.clone());
        let layout = handler.get_layout(LayoutOptions::scaled().classified(false))?;
        let scale = handler.scale()?;

        let stored: Vec<AreaRecord> = self.repo.find_by_plan(plan_id)?;
        let db_areas = handler.rows_in_layout_frame(stored.clone())?;
        let matches = map_existing_areas(&layout, &db_areas, false)?;

        let mut report = ReconciliationReport {
            plan_id,
            ..Default::default()
        };
        let mut updates = AreaUpdates::new();
        let mut new_rows: Vec<NewAreaRecord> = Vec::new();

        for m in &matches {
            let area = layout.require_area(m.area)?;
            let point = representative_point(&area.footprint)?;
            let coord = to_storage_frame(Coord { x: point.x(), y: point.y() }, scale);
            let polygon = polygon_wkt(&area.footprint);

            let Some(db_area) = &m.db_area else {
                new_rows.push(NewAreaRecord {
                    plan_id,
                    coord_x: coord.x,
                    coord_y: coord.y,
                    area_type: area.area_type,
                    scaled_polygon: polygon,
                });
                continue;
            };

            report.recovered.push(db_area.id);
            let Some(current) = stored.iter().find(|r| r.id == db_area.id) else {
                continue;
            };
            let mut changed = false;
            if (current.coord_x - coord.x).abs() > COORD_EPSILON {
                set(&mut updates, AreaField::CoordX, current.id, FieldValue::Float(coord.x));
                changed = true;
            }
            if (current.coord_y - coord.y).abs() > COORD_EPSILON {
                set(&mut updates, AreaField::CoordY, current.id, FieldValue::Float(coord.y));
                changed = true;
            }
            if current.scaled_polygon != polygon {
                set(&mut updates, AreaField::ScaledPolygon, current.id, FieldValue::Text(polygon));
                changed = true;
            }
            if changed {
                report.updated.push(current.id);
            }
        }

        report.deleted = stored
            .iter()
            .map(|r| r.id)
            .filter(|id| !report.recovered.contains(id))
            .collect();

        new_rows.sort_by(|a, b| {
            a.coord_x
                .total_cmp(&b.coord_x)
                .then_with(|| a.coord_y.total_cmp(&b.coord_y))
        });

        if !report.deleted.is_empty() {
            self.repo.delete_in(&report.deleted)?;
        }
        if !new_rows.is_empty() {
            report.inserted = self.repo.bulk_insert(new_rows)?;
        }
        if !updates.is_empty() {
            self.repo.bulk_update(&updates)?;
        }

        tracing::info!(
            plan_id,
            recovered = report.recovered.len(),
            inserted = report.inserted.len(),
            updated = report.updated.len(),
            deleted = report.deleted.len(),
            "reconciled plan areas"
        );
        Ok(report)
    }
}

fn set(updates: &mut AreaUpdates, field: AreaField, id: i64, value: FieldValue) {
    updates.entry(field).or_default().insert(id, value);
}
