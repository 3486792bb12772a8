// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use floorplan_lite_classification::{AreaType, Classifications};
use floorplan_lite_handlers::{InMemoryRepository, NewAreaRecord, PlanRecord, SiteRecord};
use floorplan_lite_layout::annotation::{AnnotationArea, AnnotationVertex};
use floorplan_lite_layout::{Annotation, LayoutConfig};

pub const PLAN_ID: i64 = 1;

pub fn config() -> LayoutConfig {
    LayoutConfig {
        min_area_m2: 0.5,
        boundary_tolerance_m: 0.01,
        min_shared_boundary_m: 0.05,
        overlap_tolerance_m2: 0.01,
        default_wall_width_px: 20.0,
    }
}

/// Annotation made of axis-aligned boxes `(x0, y0, x1, y1)` in pixels.
pub fn boxes(scale: f64, boxes: &[(f64, f64, f64, f64)]) -> Annotation {
    let mut annotation = Annotation {
        scale,
        ..Default::default()
    };
    for (i, (x0, y0, x1, y1)) in boxes.iter().enumerate() {
        let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
        let mut ids = Vec::new();
        for (j, (x, y)) in corners.iter().enumerate() {
            let id = format!("v{i}_{j}");
            annotation
                .vertices
                .insert(id.clone(), AnnotationVertex { x: **x, y: **y });
            ids.push(id);
        }
        annotation.areas.insert(
            format!("area{i}"),
            AnnotationArea {
                vertices: ids,
                holes: vec![],
            },
        );
    }
    annotation
}

/// Repository holding plan [`PLAN_ID`] on site 1 with `annotation`.
pub fn repository(annotation: Annotation) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.insert_site(SiteRecord {
        id: 1,
        classification_scheme: Classifications::Unified,
    });
    repo.insert_plan(PlanRecord {
        id: PLAN_ID,
        site_id: 1,
        georef_x: 2_600_000.0,
        georef_y: 1_200_000.0,
        georef_rot_angle: 90.0,
        georef_rot_x: 0.0,
        georef_rot_y: 0.0,
    });
    repo.insert_annotation(PLAN_ID, annotation);
    repo
}

/// Seeds a row whose point is `(x, y)` in editor pixels.
pub fn seed(repo: &InMemoryRepository, x: f64, y: f64, area_type: AreaType) -> i64 {
    repo.seed_area(NewAreaRecord {
        plan_id: PLAN_ID,
        coord_x: x,
        coord_y: y,
        area_type,
        scaled_polygon: String::new(),
    })
}
