// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for layouts.
//!
//! Slot map keys are replaced by positional indices, so a snapshot is
//! portable between processes. Each area also carries its WKT for readers
//! that only want to look at the geometry.

use floorplan_lite_classification::{AreaType, FeatureType};
use geo::{Coord, LineString, Polygon};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::polygon_wkt;
use crate::keys::{AreaKey, SpaceKey};
use crate::model::{Area, Feature, Opening, OpeningType, PlanLayout, Separator, SeparatorType, Space};
use crate::validation::LayoutViolation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSnapshot {
    pub exterior: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interiors: Vec<Vec<[f64; 2]>>,
}

impl From<&Polygon<f64>> for PolygonSnapshot {
    fn from(polygon: &Polygon<f64>) -> Self {
        let ring = |ls: &LineString<f64>| -> Vec<[f64; 2]> { ls.0.iter().map(|c| [c.x, c.y]).collect() };
        Self {
            exterior: ring(polygon.exterior()),
            interiors: polygon.interiors().iter().map(ring).collect(),
        }
    }
}

impl From<&PolygonSnapshot> for Polygon<f64> {
    fn from(snap: &PolygonSnapshot) -> Self {
        let ring = |pts: &Vec<[f64; 2]>| {
            LineString::from(pts.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect::<Vec<_>>())
        };
        Polygon::new(ring(&snap.exterior), snap.interiors.iter().map(ring).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub id: usize,
    pub area_type: AreaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_area_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<String>,
    pub footprint: PolygonSnapshot,
    #[serde(default)]
    pub wkt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub feature_type: FeatureType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<usize>,
    pub footprint: PolygonSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSnapshot {
    pub opening_type: OpeningType,
    pub footprint: PolygonSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorSnapshot {
    pub separator_type: SeparatorType,
    pub footprint: PolygonSnapshot,
}

/// Serializable representation of a [`PlanLayout`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub areas: Vec<AreaSnapshot>,
    pub spaces: Vec<Vec<usize>>,
    pub features: Vec<FeatureSnapshot>,
    pub openings: Vec<OpeningSnapshot>,
    pub separators: Vec<SeparatorSnapshot>,
    pub violations: Vec<LayoutViolation>,
}

impl PlanLayout {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot()).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: LayoutSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Creates a serializable snapshot with sequential ids.
    pub fn to_snapshot(&self) -> LayoutSnapshot {
        let mut area_ids: FxHashMap<AreaKey, usize> = FxHashMap::default();
        let mut space_ids: FxHashMap<SpaceKey, usize> = FxHashMap::default();

        let mut spaces: Vec<Vec<usize>> = self
            .spaces
            .iter()
            .enumerate()
            .map(|(i, (k, _))| {
                space_ids.insert(k, i);
                Vec::new()
            })
            .collect();

        let areas: Vec<AreaSnapshot> = self
            .areas
            .iter()
            .enumerate()
            .map(|(i, (k, a))| {
                area_ids.insert(k, i);
                let space = a.space.and_then(|s| space_ids.get(&s).copied());
                if let Some(s) = space {
                    spaces[s].push(i);
                }
                AreaSnapshot {
                    id: i,
                    area_type: a.area_type,
                    db_area_id: a.db_area_id,
                    space,
                    annotation_id: a.annotation_id.clone(),
                    footprint: (&a.footprint).into(),
                    wkt: polygon_wkt(&a.footprint),
                }
            })
            .collect();

        let features = self
            .features
            .values()
            .map(|f| FeatureSnapshot {
                feature_type: f.feature_type,
                area: f.area.and_then(|k| area_ids.get(&k).copied()),
                footprint: (&f.footprint).into(),
            })
            .collect();

        LayoutSnapshot {
            areas,
            spaces,
            features,
            openings: self
                .openings
                .iter()
                .map(|o| OpeningSnapshot {
                    opening_type: o.opening_type,
                    footprint: (&o.footprint).into(),
                })
                .collect(),
            separators: self
                .separators
                .iter()
                .map(|s| SeparatorSnapshot {
                    separator_type: s.separator_type,
                    footprint: (&s.footprint).into(),
                })
                .collect(),
            violations: self.violations.clone(),
        }
    }

    /// Reconstructs a layout from a snapshot.
    pub fn from_snapshot(snap: &LayoutSnapshot) -> Result<Self> {
        let mut layout = PlanLayout::new();

        let space_keys: Vec<SpaceKey> = snap
            .spaces
            .iter()
            .map(|_| layout.spaces.insert(Space::default()))
            .collect();

        let mut area_keys: Vec<AreaKey> = Vec::with_capacity(snap.areas.len());
        for a in &snap.areas {
            let space = a
                .space
                .map(|i| {
                    space_keys.get(i).copied().ok_or_else(|| {
                        Error::Serialization(format!("area {} refers to unknown space {i}", a.id))
                    })
                })
                .transpose()?;
            let key = layout.add_area(Area {
                footprint: (&a.footprint).into(),
                area_type: a.area_type,
                db_area_id: a.db_area_id,
                space,
                annotation_id: a.annotation_id.clone(),
            });
            if let Some(s) = space {
                layout.spaces[s].areas.push(key);
            }
            area_keys.push(key);
        }

        for f in &snap.features {
            let area = f
                .area
                .map(|i| {
                    area_keys
                        .get(i)
                        .copied()
                        .ok_or_else(|| Error::Serialization(format!("feature refers to unknown area {i}")))
                })
                .transpose()?;
            layout.add_feature(Feature {
                feature_type: f.feature_type,
                footprint: (&f.footprint).into(),
                area,
                annotation_id: None,
            });
        }

        layout.openings = snap
            .openings
            .iter()
            .map(|o| Opening {
                opening_type: o.opening_type,
                footprint: (&o.footprint).into(),
                annotation_id: None,
            })
            .collect();
        layout.separators = snap
            .separators
            .iter()
            .map(|s| Separator {
                separator_type: s.separator_type,
                footprint: (&s.footprint).into(),
                annotation_id: None,
            })
            .collect();
        layout.violations = snap.violations.clone();

        Ok(layout)
    }
}
