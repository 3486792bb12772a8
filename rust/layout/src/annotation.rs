// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editor annotation documents and their conversion into a [`PlanLayout`].
//!
//! An annotation is a set of id-keyed maps: vertices, lines referring to two
//! vertices, holes (doors and windows) sitting on a line, areas given as
//! vertex rings, and items (sanitary fixtures, kitchens, shafts, ...). All
//! coordinates are editor pixels; `scale` gives metres per pixel.
//!
//! Maps are `BTreeMap`s so a document always parses into the same layout with
//! the same insertion order.

use std::collections::BTreeMap;

use floorplan_lite_classification::{AreaType, FeatureType};
use geo::{Contains, Coord, LineString, Point, Polygon};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::geometry::{rotated_rectangle, segment_rectangle};
use crate::keys::AreaKey;
use crate::model::{Area, Feature, Opening, OpeningType, PlanLayout, Separator, SeparatorType};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationVertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Wall,
    Railing,
    Column,
    /// Virtual line splitting one room into two areas. Has no geometry.
    AreaSplitter,
}

impl LineType {
    fn separator_type(&self) -> Option<SeparatorType> {
        match self {
            LineType::Wall => Some(SeparatorType::Wall),
            LineType::Railing => Some(SeparatorType::Railing),
            LineType::Column => Some(SeparatorType::Column),
            LineType::AreaSplitter => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub vertices: [String; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationHole {
    #[serde(rename = "type")]
    pub hole_type: OpeningType,
    /// Host line id.
    pub line: String,
    /// Position of the hole center along the host line, from 0 to 1.
    pub offset: f64,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationArea {
    pub vertices: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub holes: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
    /// Counter-clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
}

/// An editor annotation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Metres per pixel.
    pub scale: f64,
    #[serde(default)]
    pub vertices: BTreeMap<String, AnnotationVertex>,
    #[serde(default)]
    pub lines: BTreeMap<String, AnnotationLine>,
    #[serde(default)]
    pub holes: BTreeMap<String, AnnotationHole>,
    #[serde(default)]
    pub areas: BTreeMap<String, AnnotationArea>,
    #[serde(default)]
    pub items: BTreeMap<String, AnnotationItem>,
}

impl Annotation {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn vertex(&self, id: &str, owner: &str) -> Result<Coord<f64>> {
        self.vertices
            .get(id)
            .map(|v| Coord { x: v.x, y: v.y })
            .ok_or_else(|| Error::InvalidAnnotation(format!("{owner} refers to unknown vertex {id}")))
    }

    fn ring(&self, ids: &[String], owner: &str) -> Result<Vec<Coord<f64>>> {
        let mut ring: Vec<Coord<f64>> = Vec::with_capacity(ids.len());
        for id in ids {
            let c = self.vertex(id, owner)?;
            if ring.last() != Some(&c) {
                ring.push(c);
            }
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        Ok(ring)
    }
}

struct ResolvedLine {
    line_type: LineType,
    start: Coord<f64>,
    end: Coord<f64>,
    width: f64,
}

/// Builds an unscaled layout (editor pixels) from an annotation.
pub fn parse_annotation(annotation: &Annotation, config: &LayoutConfig) -> Result<PlanLayout> {
    let scale = annotation.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidAnnotation(format!(
            "scale must be positive, got {scale}"
        )));
    }

    let mut layout = PlanLayout::new();
    parse_areas(annotation, &mut layout)?;

    let lines = resolve_lines(annotation, config)?;
    for (id, line) in &lines {
        let Some(separator_type) = line.line_type.separator_type() else {
            continue;
        };
        match segment_rectangle(line.start, line.end, line.width) {
            Some(footprint) => layout.separators.push(Separator {
                separator_type,
                footprint,
                annotation_id: Some(id.to_string()),
            }),
            None => tracing::warn!(line = %id, "skipping degenerate line"),
        }
    }

    parse_holes(annotation, &lines, &mut layout)?;
    parse_items(annotation, &mut layout)?;

    layout.rebuild_spaces(
        config.boundary_tolerance_m / scale,
        config.min_shared_boundary_m / scale,
    );

    tracing::debug!(
        areas = layout.area_count(),
        spaces = layout.space_count(),
        separators = layout.separators.len(),
        openings = layout.openings.len(),
        "parsed annotation"
    );
    Ok(layout)
}

fn parse_areas(annotation: &Annotation, layout: &mut PlanLayout) -> Result<()> {
    for (id, area) in &annotation.areas {
        let owner = format!("area {id}");
        let exterior = annotation.ring(&area.vertices, &owner)?;
        if exterior.len() < 3 {
            tracing::warn!(area = %id, vertices = exterior.len(), "skipping area with fewer than 3 vertices");
            continue;
        }
        let mut interiors = Vec::with_capacity(area.holes.len());
        for hole in &area.holes {
            let ring = annotation.ring(hole, &owner)?;
            if ring.len() >= 3 {
                interiors.push(LineString::from(ring));
            }
        }
        let mut parsed = Area::new(
            Polygon::new(LineString::from(exterior), interiors),
            AreaType::NotDefined,
        );
        parsed.annotation_id = Some(id.clone());
        layout.add_area(parsed);
    }
    Ok(())
}

fn resolve_lines<'a>(
    annotation: &'a Annotation,
    config: &LayoutConfig,
) -> Result<BTreeMap<&'a str, ResolvedLine>> {
    annotation
        .lines
        .iter()
        .map(|(id, line)| {
            let owner = format!("line {id}");
            let resolved = ResolvedLine {
                line_type: line.line_type,
                start: annotation.vertex(&line.vertices[0], &owner)?,
                end: annotation.vertex(&line.vertices[1], &owner)?,
                width: line.width.unwrap_or(config.default_wall_width_px),
            };
            Ok((id.as_str(), resolved))
        })
        .collect()
}

fn parse_holes(
    annotation: &Annotation,
    lines: &BTreeMap<&str, ResolvedLine>,
    layout: &mut PlanLayout,
) -> Result<()> {
    for (id, hole) in &annotation.holes {
        let host = lines.get(hole.line.as_str()).ok_or_else(|| {
            Error::InvalidAnnotation(format!("hole {id} refers to unknown line {}", hole.line))
        })?;
        let start = Vector2::new(host.start.x, host.start.y);
        let dir = Vector2::new(host.end.x, host.end.y) - start;
        let len = dir.norm();
        if len <= f64::EPSILON {
            tracing::warn!(hole = %id, "skipping hole on degenerate line");
            continue;
        }
        let unit = dir / len;
        let center = start + dir * hole.offset.clamp(0.0, 1.0);
        let half = unit * (hole.length / 2.0);
        let (a, b) = (center - half, center + half);

        match segment_rectangle(Coord { x: a.x, y: a.y }, Coord { x: b.x, y: b.y }, host.width) {
            Some(footprint) => layout.openings.push(Opening {
                opening_type: hole.hole_type,
                footprint,
                annotation_id: Some(id.clone()),
            }),
            None => tracing::warn!(hole = %id, "skipping hole with no extent"),
        }
    }
    Ok(())
}

fn parse_items(annotation: &Annotation, layout: &mut PlanLayout) -> Result<()> {
    for (id, item) in &annotation.items {
        let feature_type: FeatureType = item
            .item_type
            .parse()
            .map_err(|e| Error::InvalidAnnotation(format!("item {id}: {e}")))?;
        let center = Coord { x: item.x, y: item.y };
        let footprint = rotated_rectangle(center, item.width, item.length, item.rotation);
        let container = containing_area(layout, Point::from(center));

        if feature_type == FeatureType::Shaft && container.is_none() {
            let mut shaft = Area::new(footprint, AreaType::Shaft);
            shaft.annotation_id = Some(id.clone());
            layout.add_area(shaft);
            continue;
        }
        layout.add_feature(Feature {
            feature_type,
            footprint,
            area: container,
            annotation_id: Some(id.clone()),
        });
    }
    Ok(())
}

fn containing_area(layout: &PlanLayout, point: Point<f64>) -> Option<AreaKey> {
    layout
        .areas()
        .find(|(_, area)| area.footprint.contains(&point))
        .map(|(key, _)| key)
}
