// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The geometric model of a single floor plan.
//!
//! A [`PlanLayout`] owns its areas, spaces and features in slot maps, plus
//! plain vectors of openings and separators. An area refers to its persisted
//! row only through `db_area_id`, a lookup key that carries no ownership, so
//! the layout stays cloneable and serializable across reconciliation passes.

use floorplan_lite_classification::{AreaType, ClassificationScheme, FeatureType};
use geo::{Area as _, BooleanOps, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::geometry::representative_point;
use crate::keys::{AreaKey, FeatureKey, SpaceKey};
use crate::validation::LayoutViolation;

/// A polygonal room or space.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub footprint: Polygon<f64>,
    pub area_type: AreaType,
    /// Id of the persisted area row, set by reconciliation.
    pub db_area_id: Option<i64>,
    pub space: Option<SpaceKey>,
    /// Id of the annotation element this area was parsed from.
    pub annotation_id: Option<String>,
}

impl Area {
    pub fn new(footprint: Polygon<f64>, area_type: AreaType) -> Self {
        Self {
            footprint,
            area_type,
            db_area_id: None,
            space: None,
            annotation_id: None,
        }
    }

    /// Surface of the footprint in the layout's frame.
    pub fn size(&self) -> f64 {
        self.footprint.unsigned_area()
    }

    pub fn representative_point(&self) -> Result<Point<f64>> {
        representative_point(&self.footprint)
    }
}

/// A topologically connected group of areas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Space {
    pub areas: Vec<AreaKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub feature_type: FeatureType,
    pub footprint: Polygon<f64>,
    /// Area containing the feature, if any.
    pub area: Option<AreaKey>,
    pub annotation_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningType {
    Door,
    EntranceDoor,
    Window,
}

impl OpeningType {
    pub fn is_door(&self) -> bool {
        matches!(self, OpeningType::Door | OpeningType::EntranceDoor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    pub opening_type: OpeningType,
    pub footprint: Polygon<f64>,
    pub annotation_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorType {
    Wall,
    Railing,
    Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Separator {
    pub separator_type: SeparatorType,
    pub footprint: Polygon<f64>,
    pub annotation_id: Option<String>,
}

/// Geometric model of one floor plan.
#[derive(Debug, Clone, Default)]
pub struct PlanLayout {
    pub(crate) areas: SlotMap<AreaKey, Area>,
    pub(crate) spaces: SlotMap<SpaceKey, Space>,
    pub(crate) features: SlotMap<FeatureKey, Feature>,
    pub openings: Vec<Opening>,
    pub separators: Vec<Separator>,
    /// Validation results. Empty unless the layout was validated.
    pub violations: Vec<LayoutViolation>,
}

impl PlanLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_area(&mut self, area: Area) -> AreaKey {
        self.areas.insert(area)
    }

    /// Removes an area, detaching its features and dropping it from its space.
    pub fn remove_area(&mut self, key: AreaKey) -> Option<Area> {
        let area = self.areas.remove(key)?;
        for feature in self.features.values_mut() {
            if feature.area == Some(key) {
                feature.area = None;
            }
        }
        if let Some(space) = area.space.and_then(|s| self.spaces.get_mut(s)) {
            space.areas.retain(|k| *k != key);
        }
        Some(area)
    }

    pub fn area(&self, key: AreaKey) -> Option<&Area> {
        self.areas.get(key)
    }

    pub fn area_mut(&mut self, key: AreaKey) -> Option<&mut Area> {
        self.areas.get_mut(key)
    }

    /// Like [`PlanLayout::area`], failing with [`Error::AreaNotFound`].
    pub fn require_area(&self, key: AreaKey) -> Result<&Area> {
        self.areas.get(key).ok_or(Error::AreaNotFound(key))
    }

    pub fn areas(&self) -> impl Iterator<Item = (AreaKey, &Area)> {
        self.areas.iter()
    }

    pub fn area_keys(&self) -> Vec<AreaKey> {
        self.areas.keys().collect()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn add_feature(&mut self, feature: Feature) -> FeatureKey {
        self.features.insert(feature)
    }

    pub fn feature(&self, key: FeatureKey) -> Option<&Feature> {
        self.features.get(key)
    }

    pub fn features(&self) -> impl Iterator<Item = (FeatureKey, &Feature)> {
        self.features.iter()
    }

    /// Features placed inside the given area.
    pub fn features_in(&self, area: AreaKey) -> impl Iterator<Item = &Feature> {
        self.features.values().filter(move |f| f.area == Some(area))
    }

    pub fn space(&self, key: SpaceKey) -> Option<&Space> {
        self.spaces.get(key)
    }

    pub fn spaces(&self) -> impl Iterator<Item = (SpaceKey, &Space)> {
        self.spaces.iter()
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    /// Union of all area footprints.
    pub fn footprint(&self) -> MultiPolygon<f64> {
        self.areas.values().fold(MultiPolygon::new(vec![]), |acc, area| {
            acc.union(&MultiPolygon::new(vec![area.footprint.clone()]))
        })
    }

    /// Areas whose type has water supply under `scheme`.
    pub fn area_keys_with_water_supply(&self, scheme: &dyn ClassificationScheme) -> Vec<AreaKey> {
        self.areas
            .iter()
            .filter(|(_, area)| scheme.has_water_supply(area.area_type))
            .map(|(key, _)| key)
            .collect()
    }

    /// Net area of the layout under `scheme`, in the layout's square unit.
    pub fn net_area(&self, scheme: &dyn ClassificationScheme) -> f64 {
        scheme.total_net_area(&mut self.areas.values().map(|a| (a.area_type, a.size())))
    }

    pub fn room_count(&self, scheme: &dyn ClassificationScheme) -> f64 {
        scheme.total_room_count(&mut self.areas.values().map(|a| a.area_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use floorplan_lite_classification::Classifications;
    use geo::polygon;

    fn room(x0: f64, size: f64, area_type: AreaType) -> Area {
        Area::new(
            polygon![
                (x: x0, y: 0.0),
                (x: x0 + size, y: 0.0),
                (x: x0 + size, y: size),
                (x: x0, y: size),
            ],
            area_type,
        )
    }

    #[test]
    fn remove_area_detaches_features() {
        let mut layout = PlanLayout::new();
        let key = layout.add_area(room(0.0, 4.0, AreaType::Bathroom));
        let feature = layout.add_feature(Feature {
            feature_type: FeatureType::Toilet,
            footprint: polygon![(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)],
            area: Some(key),
            annotation_id: None,
        });
        assert_eq!(layout.features_in(key).count(), 1);

        assert!(layout.remove_area(key).is_some());
        assert!(layout.feature(feature).unwrap().area.is_none());
        assert!(matches!(layout.require_area(key), Err(Error::AreaNotFound(_))));
    }

    #[test]
    fn aggregates_follow_scheme() {
        let scheme = Classifications::Unified.scheme();
        let mut layout = PlanLayout::new();
        layout.add_area(room(0.0, 4.0, AreaType::Bedroom));
        layout.add_area(room(10.0, 5.0, AreaType::KitchenDining));
        layout.add_area(room(20.0, 2.0, AreaType::Balcony));
        layout.add_area(room(30.0, 3.0, AreaType::Void));

        assert_relative_eq!(layout.net_area(scheme), 16.0 + 25.0);
        assert_relative_eq!(layout.room_count(scheme), 2.5);
        assert_eq!(layout.area_keys_with_water_supply(scheme).len(), 1);
    }

    #[test]
    fn footprint_unions_touching_areas() {
        let mut layout = PlanLayout::new();
        layout.add_area(room(0.0, 4.0, AreaType::Room));
        layout.add_area(room(4.0, 4.0, AreaType::Room));
        let footprint = layout.footprint();
        assert_relative_eq!(footprint.unsigned_area(), 32.0, epsilon = 1e-9);
    }
}
