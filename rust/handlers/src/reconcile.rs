// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Matching of freshly parsed areas against persisted area rows.
//!
//! Each persisted row is represented by its stored point. A layout area
//! matches a row when that point lies strictly inside the area's footprint.
//! An area containing several points is ambiguous and is treated like an
//! area with none. A row matches at most one area: when overlapping areas
//! both contain its point, the first area in layout order keeps it.
//!
//! Matching runs `|areas| × |rows|` point-in-polygon tests.

use floorplan_lite_layout::{polygon_wkt, AreaKey, PlanLayout};
use geo::{Contains, EuclideanDistance, Point};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::store::AreaRecord;

/// Outcome of matching one layout area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaMatch {
    pub area: AreaKey,
    /// The unique row whose point lies inside the area.
    pub db_area: Option<AreaRecord>,
}

/// Matches every area of `layout` against `db_areas`.
///
/// `db_areas` must already be in the layout's frame. Results follow the
/// layout's area order. With `raise_on_inconsistency`, an area without a
/// unique match fails with [`Error::AreaMismatch`], as does an area whose
/// only row was already taken by an earlier area, and a row count that
/// differs from the area count once every area matched.
pub fn map_existing_areas(
    layout: &PlanLayout,
    db_areas: &[AreaRecord],
    raise_on_inconsistency: bool,
) -> Result<Vec<AreaMatch>> {
    let points: Vec<Point<f64>> = db_areas
        .iter()
        .map(|a| Point::new(a.coord_x, a.coord_y))
        .collect();

    let mut claimed: FxHashSet<usize> = FxHashSet::default();
    let mut matches = Vec::with_capacity(layout.area_count());
    for (key, area) in layout.areas() {
        let inside: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| area.footprint.contains(*p))
            .map(|(i, _)| i)
            .collect();

        let db_area = match inside.as_slice() {
            [only] if claimed.insert(*only) => Some(db_areas[*only].clone()),
            [taken] if raise_on_inconsistency => {
                let wkt = polygon_wkt(&area.footprint);
                let row = &db_areas[*taken];
                return Err(Error::AreaMismatch(format!(
                    "Area {wkt} matches existing area {} which already belongs to another area",
                    row.id
                )));
            }
            [taken] => {
                tracing::debug!(db_area_id = db_areas[*taken].id, "existing area already matched");
                None
            }
            _ if raise_on_inconsistency => {
                let wkt = polygon_wkt(&area.footprint);
                let closest = closest_db_areas(&area.footprint, db_areas, &points, 2);
                return Err(Error::AreaMismatch(format!(
                    "Area {wkt} matches {} existing areas. Closest existing areas: {closest}",
                    inside.len()
                )));
            }
            _ => {
                tracing::debug!(candidates = inside.len(), "area has no unique match");
                None
            }
        };
        matches.push(AreaMatch { area: key, db_area });
    }

    if raise_on_inconsistency && db_areas.len() != layout.area_count() {
        return Err(Error::AreaMismatch(format!(
            "{} existing areas but {} areas in the annotation",
            db_areas.len(),
            layout.area_count()
        )));
    }

    Ok(matches)
}

fn closest_db_areas(
    footprint: &geo::Polygon<f64>,
    db_areas: &[AreaRecord],
    points: &[Point<f64>],
    n: usize,
) -> String {
    let mut by_distance: Vec<(f64, &AreaRecord)> = points
        .iter()
        .zip(db_areas)
        .map(|(p, a)| (p.euclidean_distance(footprint), a))
        .collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));

    let described: Vec<String> = by_distance
        .iter()
        .take(n)
        .map(|(d, a)| {
            format!(
                "[id {} {} at ({}, {}), distance {d:.3}]",
                a.id, a.area_type, a.coord_x, a.coord_y
            )
        })
        .collect();
    if described.is_empty() {
        "none".to_string()
    } else {
        described.join(", ")
    }
}

/// Copies type and id of matched rows onto the layout's areas.
pub fn apply_matches(layout: &mut PlanLayout, matches: &[AreaMatch]) -> Result<()> {
    for m in matches {
        let Some(db_area) = &m.db_area else {
            continue;
        };
        let area = layout
            .area_mut(m.area)
            .ok_or(floorplan_lite_layout::Error::AreaNotFound(m.area))?;
        area.area_type = db_area.area_type;
        area.db_area_id = Some(db_area.id);
    }
    Ok(())
}
