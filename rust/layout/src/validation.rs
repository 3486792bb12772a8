// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural and classification checks on a layout.
//!
//! Checks never fail: every problem becomes a [`LayoutViolation`] so that all
//! issues of a plan can be reported together.

use floorplan_lite_classification::{AreaType, ClassificationScheme, FeatureType};
use geo::{Area as _, BooleanOps, BoundingRect, Centroid, Intersects, Point};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::geometry::{is_self_intersecting, marker_position};
use crate::keys::AreaKey;
use crate::model::PlanLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    AreaSelfIntersecting,
    AreaTooSmall,
    AreasOverlapping,
    SpaceNotAccessible,
    FeatureOutsideArea,
    OpeningNotInSeparator,
    AreaNotDefined,
    FeatureNotAllowedInArea,
    ShaftInWrongArea,
}

impl ViolationType {
    /// Blocking violations prevent a plan from being marked as finished.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ViolationType::AreaSelfIntersecting
                | ViolationType::AreasOverlapping
                | ViolationType::AreaNotDefined
        )
    }
}

/// A problem found in a layout, pinned to a position in the layout's frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutViolation {
    pub violation_type: ViolationType,
    pub x: f64,
    pub y: f64,
    pub is_blocking: bool,
    pub text: String,
}

impl LayoutViolation {
    pub fn new(violation_type: ViolationType, position: Point<f64>, text: impl Into<String>) -> Self {
        Self {
            violation_type,
            x: position.x(),
            y: position.y(),
            is_blocking: violation_type.is_blocking(),
            text: text.into(),
        }
    }
}

/// Geometric checks. Expects a metric layout; tolerances are taken from
/// `config` as is.
pub fn validate_layout(layout: &PlanLayout, config: &LayoutConfig) -> Vec<LayoutViolation> {
    let mut violations = Vec::new();
    let mut valid: Vec<AreaKey> = Vec::new();

    for (key, area) in layout.areas() {
        if is_self_intersecting(&area.footprint) {
            violations.push(LayoutViolation::new(
                ViolationType::AreaSelfIntersecting,
                marker_position(&area.footprint),
                "Area polygon intersects itself",
            ));
            continue;
        }
        valid.push(key);
        let size = area.size();
        if size < config.min_area_m2 {
            violations.push(LayoutViolation::new(
                ViolationType::AreaTooSmall,
                marker_position(&area.footprint),
                format!(
                    "Area of {size:.2} m2 is smaller than the minimum of {} m2",
                    config.min_area_m2
                ),
            ));
        }
    }

    check_overlaps(layout, &valid, config, &mut violations);
    check_accessibility(layout, &mut violations);

    for (_, feature) in layout.features() {
        if feature.area.is_none() {
            let position = feature
                .footprint
                .centroid()
                .unwrap_or_else(|| marker_position(&feature.footprint));
            violations.push(LayoutViolation::new(
                ViolationType::FeatureOutsideArea,
                position,
                format!("Feature {} is not inside any area", feature.feature_type),
            ));
        }
    }

    for opening in &layout.openings {
        let hosted = layout
            .separators
            .iter()
            .any(|s| s.footprint.intersects(&opening.footprint));
        if !hosted {
            violations.push(LayoutViolation::new(
                ViolationType::OpeningNotInSeparator,
                marker_position(&opening.footprint),
                "Opening is not placed in a wall, railing or column",
            ));
        }
    }

    tracing::debug!(violations = violations.len(), "validated layout geometry");
    violations
}

fn check_overlaps(
    layout: &PlanLayout,
    valid: &[AreaKey],
    config: &LayoutConfig,
    violations: &mut Vec<LayoutViolation>,
) {
    for (i, a) in valid.iter().enumerate() {
        let pa = &layout.areas[*a].footprint;
        let Some(ra) = pa.bounding_rect() else {
            continue;
        };
        for b in &valid[i + 1..] {
            let pb = &layout.areas[*b].footprint;
            match pb.bounding_rect() {
                Some(rb) if ra.intersects(&rb) => {}
                _ => continue,
            }
            let overlap = pa.intersection(pb);
            let size = overlap.unsigned_area();
            if size > config.overlap_tolerance_m2 {
                let position = overlap
                    .0
                    .first()
                    .map(marker_position)
                    .unwrap_or_else(|| marker_position(pa));
                violations.push(LayoutViolation::new(
                    ViolationType::AreasOverlapping,
                    position,
                    format!("Areas overlap by {size:.2} m2"),
                ));
            }
        }
    }
}

fn check_accessibility(layout: &PlanLayout, violations: &mut Vec<LayoutViolation>) {
    let doors: Vec<_> = layout
        .openings
        .iter()
        .filter(|o| o.opening_type.is_door())
        .collect();

    for (_, space) in layout.spaces() {
        let areas: Vec<_> = space
            .areas
            .iter()
            .filter_map(|k| layout.area(*k))
            .collect();
        let Some(first) = areas.first() else {
            continue;
        };
        let needs_access = areas
            .iter()
            .any(|a| a.area_type != AreaType::Shaft && !a.area_type.is_void());
        if !needs_access {
            continue;
        }
        let accessible = areas
            .iter()
            .any(|a| doors.iter().any(|d| d.footprint.intersects(&a.footprint)));
        if !accessible {
            violations.push(LayoutViolation::new(
                ViolationType::SpaceNotAccessible,
                marker_position(&first.footprint),
                "Space has no door",
            ));
        }
    }
}

/// Checks that depend on area types. Meant for classified layouts.
pub fn validate_classification(
    layout: &PlanLayout,
    scheme: &dyn ClassificationScheme,
) -> Vec<LayoutViolation> {
    let mut violations = Vec::new();

    for (_, area) in layout.areas() {
        if area.area_type == AreaType::NotDefined {
            violations.push(LayoutViolation::new(
                ViolationType::AreaNotDefined,
                marker_position(&area.footprint),
                "Area type is not defined",
            ));
        }
    }

    for (_, feature) in layout.features() {
        let Some(area) = feature.area.and_then(|k| layout.area(k)) else {
            continue;
        };
        let position = marker_position(&feature.footprint);
        if feature.feature_type == FeatureType::Shaft {
            if !scheme.accepts_shafts(area.area_type) {
                violations.push(LayoutViolation::new(
                    ViolationType::ShaftInWrongArea,
                    position,
                    format!("Shaft is not allowed in {}", area.area_type),
                ));
            }
        } else if !scheme.feature_allowed_in(feature.feature_type, area.area_type) {
            violations.push(LayoutViolation::new(
                ViolationType::FeatureNotAllowedInArea,
                position,
                format!(
                    "Feature {} is not allowed in {}",
                    feature.feature_type, area.area_type
                ),
            ));
        }
    }

    violations
}
