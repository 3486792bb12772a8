// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate frame conversions and whole-layout transforms.

use approx::assert_relative_eq;
use floorplan_lite_layout::{
    parse_annotation, to_layout_frame, to_storage_frame, validate_layout, Annotation, GeoReference,
    LayoutConfig, PlanLayout,
};
use geo::{Area as _, Coord};

const SCALES: [f64; 6] = [1e-4, 0.0125, 0.02, 0.5, 1.0, 37.5];

fn config() -> LayoutConfig {
    LayoutConfig {
        min_area_m2: 0.5,
        boundary_tolerance_m: 0.01,
        min_shared_boundary_m: 0.05,
        overlap_tolerance_m2: 0.01,
        default_wall_width_px: 20.0,
    }
}

#[test]
fn storage_frame_round_trip() {
    let points = [
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: -1.0 },
        Coord { x: 1234.5, y: 987.25 },
        Coord { x: -0.001, y: 1e6 },
    ];
    for scale in SCALES {
        for p in points {
            let back = to_storage_frame(to_layout_frame(p, scale), scale);
            assert_relative_eq!(back.x, p.x, max_relative = 1e-12, epsilon = 1e-12);
            assert_relative_eq!(back.y, p.y, max_relative = 1e-12, epsilon = 1e-12);
        }
    }
}

fn office() -> Annotation {
    Annotation::from_json(
        r#"{
        "scale": 0.02,
        "vertices": {
            "a": {"x": 0, "y": 0}, "b": {"x": 250, "y": 0},
            "c": {"x": 250, "y": 200}, "d": {"x": 0, "y": 200}
        },
        "lines": {"w": {"type": "wall", "vertices": ["b", "c"], "width": 10}},
        "holes": {"door": {"type": "entrance_door", "line": "w", "offset": 0.5, "length": 45}},
        "areas": {"office": {"vertices": ["a", "b", "c", "d"]}}
    }"#,
    )
    .unwrap()
}

fn scaled(annotation: &Annotation) -> PlanLayout {
    let mut layout = parse_annotation(annotation, &config()).unwrap();
    layout.apply_scaling(annotation.scale);
    layout
}

#[test]
fn scaling_converts_pixels_to_square_metres() {
    let annotation = office();
    let layout = scaled(&annotation);
    let (_, area) = layout.areas().next().unwrap();
    assert_relative_eq!(area.size(), 5.0 * 4.0, epsilon = 1e-9);
    assert!(validate_layout(&layout, &config()).is_empty());
}

#[test]
fn inverse_scaling_restores_pixels() {
    let annotation = office();
    let raw = parse_annotation(&annotation, &config()).unwrap();
    let mut layout = scaled(&annotation);
    layout.apply_scaling(1.0 / annotation.scale);

    let (_, a) = raw.areas().next().unwrap();
    let (_, b) = layout.areas().next().unwrap();
    for (p, q) in a.footprint.exterior().0.iter().zip(&b.footprint.exterior().0) {
        assert_relative_eq!(p.x, q.x, epsilon = 1e-9);
        assert_relative_eq!(p.y, q.y, epsilon = 1e-9);
    }
}

#[test]
fn georeference_preserves_areas() {
    let mut layout = scaled(&office());
    let before: f64 = layout.areas().map(|(_, a)| a.size()).sum();
    GeoReference {
        rotation_deg: 123.0,
        pivot: Coord { x: 2.5, y: 2.0 },
        anchor: Coord { x: 2_600_000.0, y: 1_200_000.0 },
    }
    .apply(&mut layout);

    let after: f64 = layout.areas().map(|(_, a)| a.footprint.unsigned_area()).sum();
    assert_relative_eq!(before, after, max_relative = 1e-6);
    let opening = &layout.openings[0];
    assert!(opening.footprint.exterior().0[0].x > 2_599_000.0);
}
