// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Matching and reconciliation of persisted area rows.

mod common;

use common::{boxes, config, repository, seed, PLAN_ID};
use floorplan_lite_classification::AreaType;
use floorplan_lite_handlers::{
    apply_matches, map_existing_areas, AreaHandler, AreaStore, AreaWrite, Error, LayoutOptions,
    PlanLayoutHandler,
};
use floorplan_lite_layout::annotation::AnnotationItem;

#[test]
fn unique_match_carries_type_and_id() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]));
    let id = seed(&repo, 5.0, 5.0, AreaType::Room);
    let handler = PlanLayoutHandler::new(PLAN_ID, &repo, config());

    let mut layout = handler.get_layout(LayoutOptions::scaled()).unwrap();
    let db_areas = handler.db_areas_in_layout_frame().unwrap();
    let matches = map_existing_areas(&layout, &db_areas, true).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].db_area.as_ref().map(|a| a.id), Some(id));

    apply_matches(&mut layout, &matches).unwrap();
    let (_, area) = layout.areas().next().unwrap();
    assert_eq!(area.area_type, AreaType::Room);
    assert_eq!(area.db_area_id, Some(id));
}

#[test]
fn db_points_are_scaled_before_matching() {
    // 0.5 m per pixel: the 20 px box is 10 m wide, the row's point at
    // (10, 10) px lies at (5, 5) m.
    let repo = repository(boxes(0.5, &[(0.0, 0.0, 20.0, 20.0)]));
    let id = seed(&repo, 10.0, 10.0, AreaType::Kitchen);
    let handler = PlanLayoutHandler::new(PLAN_ID, &repo, config());

    let layout = handler
        .get_layout(LayoutOptions::scaled().classified(true).raise_on_inconsistency(true))
        .unwrap();
    let (_, area) = layout.areas().next().unwrap();
    assert_eq!(area.area_type, AreaType::Kitchen);
    assert_eq!(area.db_area_id, Some(id));
}

#[test]
fn matching_is_idempotent() {
    let repo = repository(boxes(
        1.0,
        &[(0.0, 0.0, 10.0, 10.0), (10.0, 0.0, 20.0, 10.0), (30.0, 0.0, 40.0, 10.0)],
    ));
    seed(&repo, 5.0, 5.0, AreaType::Bedroom);
    seed(&repo, 15.0, 5.0, AreaType::Bathroom);
    let handler = PlanLayoutHandler::new(PLAN_ID, &repo, config());
    let layout = handler.get_layout(LayoutOptions::scaled()).unwrap();
    let db_areas = handler.db_areas_in_layout_frame().unwrap();

    let first = map_existing_areas(&layout, &db_areas, false).unwrap();
    let second = map_existing_areas(&layout, &db_areas, false).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.iter().filter(|m| m.db_area.is_some()).count(), 2);
}

#[test]
fn two_points_in_one_area_are_ambiguous() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]));
    seed(&repo, 3.0, 3.0, AreaType::Room);
    seed(&repo, 7.0, 7.0, AreaType::Kitchen);
    let handler = PlanLayoutHandler::new(PLAN_ID, &repo, config());
    let layout = handler.get_layout(LayoutOptions::scaled()).unwrap();
    let db_areas = handler.db_areas_in_layout_frame().unwrap();

    let lenient = map_existing_areas(&layout, &db_areas, false).unwrap();
    assert_eq!(lenient.len(), 1);
    assert!(lenient[0].db_area.is_none());

    assert!(matches!(
        map_existing_areas(&layout, &db_areas, true),
        Err(Error::AreaMismatch(_))
    ));

    let err = handler
        .get_layout(LayoutOptions::scaled().classified(true).raise_on_inconsistency(true))
        .unwrap_err();
    match err {
        Error::AreaMismatch(message) => {
            assert!(message.starts_with("Plan 1 has invalid areas. "));
            assert!(message.contains("POLYGON"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Without raising, the ambiguous area stays unclassified.
    let layout = handler
        .get_layout(LayoutOptions::scaled().classified(true))
        .unwrap();
    let (_, area) = layout.areas().next().unwrap();
    assert_eq!(area.area_type, AreaType::NotDefined);
    assert_eq!(area.db_area_id, None);
}

#[test]
fn new_area_is_inserted_as_not_defined() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]));
    let report = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();

    assert_eq!(report.inserted.len(), 1);
    assert!(report.recovered.is_empty());
    assert!(report.deleted.is_empty());

    let rows = repo.find_by_plan(PLAN_ID).unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id, report.inserted[0]);
    assert_eq!(row.area_type, AreaType::NotDefined);
    assert!(row.coord_x > 0.0 && row.coord_x < 10.0);
    assert!(row.coord_y > 0.0 && row.coord_y < 10.0);
    assert_eq!(row.scaled_polygon, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
}

#[test]
fn stale_rows_are_deleted() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]));
    let kept = seed(&repo, 5.0, 5.0, AreaType::Room);
    let stale = seed(&repo, 25.0, 5.0, AreaType::Bedroom);

    let report = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();

    assert_eq!(report.recovered, vec![kept]);
    assert_eq!(report.deleted, vec![stale]);
    assert!(repo.area_writes().contains(&AreaWrite::Delete(vec![stale])));

    let rows = repo.find_by_plan(PLAN_ID).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, kept);
    assert_eq!(rows[0].area_type, AreaType::Room);
}

#[test]
fn row_count_matches_area_count() {
    let repo = repository(boxes(
        0.02,
        &[
            (0.0, 0.0, 300.0, 300.0),
            (300.0, 0.0, 600.0, 300.0),
            (0.0, 300.0, 600.0, 500.0),
            (900.0, 0.0, 1000.0, 100.0),
        ],
    ));
    // Two recoverable rows, two stale rows.
    seed(&repo, 150.0, 150.0, AreaType::Bedroom);
    seed(&repo, 450.0, 150.0, AreaType::Kitchen);
    seed(&repo, 2000.0, 2000.0, AreaType::Room);
    seed(&repo, 3000.0, 2000.0, AreaType::Room);
    let existing = repo.find_by_plan(PLAN_ID).unwrap().len();

    let handler = AreaHandler::new(&repo, config());
    let report = handler.recover_and_upsert_areas(PLAN_ID).unwrap();

    let areas = 4;
    assert_eq!(report.inserted.len() + report.recovered.len(), areas);
    assert_eq!(report.deleted.len(), existing - report.recovered.len());
    assert_eq!(repo.find_by_plan(PLAN_ID).unwrap().len(), areas);

    // New rows are inserted in (coord_x, coord_y) order.
    let inserted: Vec<_> = report
        .inserted
        .iter()
        .map(|id| repo.get_by_id(*id).unwrap())
        .collect();
    assert!(inserted
        .windows(2)
        .all(|w| (w[0].coord_x, w[0].coord_y) <= (w[1].coord_x, w[1].coord_y)));

    // A second pass finds every row again and writes nothing.
    repo.clear_area_writes();
    let again = handler.recover_and_upsert_areas(PLAN_ID).unwrap();
    assert_eq!(again.recovered.len(), areas);
    assert!(again.inserted.is_empty());
    assert!(again.updated.is_empty());
    assert!(again.deleted.is_empty());
    assert!(repo.area_writes().is_empty());
}

#[test]
fn recovered_rows_get_refreshed_geometry() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]));
    let id = seed(&repo, 1.0, 1.0, AreaType::Office);

    let report = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();
    assert_eq!(report.updated, vec![id]);

    let row = repo.get_by_id(id).unwrap();
    assert_eq!(row.area_type, AreaType::Office);
    assert_eq!(row.scaled_polygon, "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
    assert!((row.coord_x - 1.0).abs() > 1e-9 || (row.coord_y - 1.0).abs() > 1e-9);
}

#[test]
fn missing_annotation_is_not_a_mismatch() {
    let repo = repository(boxes(1.0, &[]));
    let err = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID + 1)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn overlapping_areas_claim_a_row_once() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0), (8.0, 0.0, 20.0, 10.0)]));
    let shared = seed(&repo, 9.0, 5.0, AreaType::Room);
    let orphan = seed(&repo, 50.0, 50.0, AreaType::Kitchen);
    let handler = PlanLayoutHandler::new(PLAN_ID, &repo, config());

    let err = handler
        .get_layout(LayoutOptions::scaled().classified(true).raise_on_inconsistency(true))
        .unwrap_err();
    assert!(matches!(err, Error::AreaMismatch(_)));

    let layout = handler
        .get_layout(LayoutOptions::scaled().classified(true))
        .unwrap();
    let ids: Vec<_> = layout.areas().map(|(_, a)| a.db_area_id).collect();
    assert_eq!(ids, vec![Some(shared), None]);

    let report = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();
    assert_eq!(report.recovered, vec![shared]);
    assert_eq!(report.inserted.len(), 1);
    assert_eq!(report.deleted, vec![orphan]);
    assert_eq!(repo.find_by_plan(PLAN_ID).unwrap().len(), 2);
}

#[test]
fn free_standing_shaft_is_inserted_as_shaft() {
    let mut annotation = boxes(1.0, &[(0.0, 0.0, 10.0, 10.0)]);
    annotation.items.insert(
        "riser".to_string(),
        AnnotationItem {
            item_type: "shaft".to_string(),
            x: 30.0,
            y: 5.0,
            width: 4.0,
            length: 4.0,
            rotation: 0.0,
        },
    );
    let repo = repository(annotation);

    let report = AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();
    assert_eq!(report.inserted.len(), 2);

    let rows = repo.find_by_plan(PLAN_ID).unwrap();
    let shaft: Vec<_> = rows
        .iter()
        .filter(|r| r.area_type == AreaType::Shaft)
        .collect();
    assert_eq!(shaft.len(), 1);
    assert!((shaft[0].coord_x - 30.0).abs() < 2.0);
    assert!((shaft[0].coord_y - 5.0).abs() < 2.0);
    assert!(rows
        .iter()
        .any(|r| r.area_type == AreaType::NotDefined && r.coord_x < 10.0));
}

#[test]
fn area_rows_are_read_once_per_pass() {
    let repo = repository(boxes(1.0, &[(0.0, 0.0, 10.0, 10.0), (10.0, 0.0, 20.0, 10.0)]));
    seed(&repo, 5.0, 5.0, AreaType::Room);
    assert_eq!(repo.area_reads(), 0);

    AreaHandler::new(&repo, config())
        .recover_and_upsert_areas(PLAN_ID)
        .unwrap();
    assert_eq!(repo.area_reads(), 1);
}
