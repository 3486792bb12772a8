// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process repository backed by `RefCell`ed maps.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use floorplan_lite_layout::Annotation;

use crate::error::{Error, Result};
use crate::store::{
    AnnotationStore, AreaField, AreaRecord, AreaStore, AreaUpdates, FieldValue, NewAreaRecord,
    PlanRecord, PlanStore, SiteRecord, SiteStore,
};

/// A write issued against the area table.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaWrite {
    Insert(Vec<i64>),
    Update(AreaUpdates),
    Delete(Vec<i64>),
}

/// Single-threaded repository for tests and command-line runs.
///
/// Area ids are handed out sequentially starting at 1. Every area write is
/// recorded and can be inspected with [`InMemoryRepository::area_writes`];
/// plan-wide area reads are counted by [`InMemoryRepository::area_reads`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    plans: RefCell<BTreeMap<i64, PlanRecord>>,
    sites: RefCell<BTreeMap<i64, SiteRecord>>,
    annotations: RefCell<BTreeMap<i64, Annotation>>,
    areas: RefCell<BTreeMap<i64, AreaRecord>>,
    last_area_id: Cell<i64>,
    writes: RefCell<Vec<AreaWrite>>,
    reads: Cell<usize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plan(&self, plan: PlanRecord) {
        self.plans.borrow_mut().insert(plan.id, plan);
    }

    pub fn insert_site(&self, site: SiteRecord) {
        self.sites.borrow_mut().insert(site.id, site);
    }

    pub fn insert_annotation(&self, plan_id: i64, annotation: Annotation) {
        self.annotations.borrow_mut().insert(plan_id, annotation);
    }

    /// Inserts a row without recording it as a write.
    pub fn seed_area(&self, row: NewAreaRecord) -> i64 {
        let id = self.next_area_id();
        self.areas.borrow_mut().insert(id, row.with_id(id));
        id
    }

    pub fn area_writes(&self) -> Vec<AreaWrite> {
        self.writes.borrow().clone()
    }

    pub fn clear_area_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    /// Number of `find_by_plan` calls so far.
    pub fn area_reads(&self) -> usize {
        self.reads.get()
    }

    fn next_area_id(&self) -> i64 {
        let id = self.last_area_id.get() + 1;
        self.last_area_id.set(id);
        id
    }
}

impl PlanStore for InMemoryRepository {
    fn get_plan(&self, plan_id: i64) -> Result<PlanRecord> {
        self.plans
            .borrow()
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("plan {plan_id}")))
    }
}

impl SiteStore for InMemoryRepository {
    fn get_site(&self, site_id: i64) -> Result<SiteRecord> {
        self.sites
            .borrow()
            .get(&site_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("site {site_id}")))
    }
}

impl AnnotationStore for InMemoryRepository {
    fn get_annotation(&self, plan_id: i64) -> Result<Annotation> {
        self.annotations
            .borrow()
            .get(&plan_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("annotation of plan {plan_id}")))
    }
}

impl AreaStore for InMemoryRepository {
    fn find_by_plan(&self, plan_id: i64) -> Result<Vec<AreaRecord>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self
            .areas
            .borrow()
            .values()
            .filter(|a| a.plan_id == plan_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, id: i64) -> Result<AreaRecord> {
        self.areas
            .borrow()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("area {id}")))
    }

    fn bulk_insert(&self, rows: Vec<NewAreaRecord>) -> Result<Vec<i64>> {
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let id = self.next_area_id();
            self.areas.borrow_mut().insert(id, row.with_id(id));
            ids.push(id);
        }
        self.writes.borrow_mut().push(AreaWrite::Insert(ids.clone()));
        Ok(ids)
    }

    fn bulk_update(&self, updates: &AreaUpdates) -> Result<()> {
        let mut areas = self.areas.borrow_mut();
        // Check first so a failed batch leaves the table untouched.
        for (field, values) in updates {
            for (id, value) in values {
                let row = areas
                    .get(id)
                    .ok_or_else(|| Error::NotFound(format!("area {id}")))?;
                let mut probe = row.clone();
                set_field(&mut probe, *field, value)?;
            }
        }
        for (field, values) in updates {
            for (id, value) in values {
                if let Some(row) = areas.get_mut(id) {
                    set_field(row, *field, value)?;
                }
            }
        }
        self.writes.borrow_mut().push(AreaWrite::Update(updates.clone()));
        Ok(())
    }

    fn delete_in(&self, ids: &[i64]) -> Result<usize> {
        let mut areas = self.areas.borrow_mut();
        let removed = ids.iter().filter(|id| areas.remove(*id).is_some()).count();
        self.writes.borrow_mut().push(AreaWrite::Delete(ids.to_vec()));
        Ok(removed)
    }
}

fn set_field(row: &mut AreaRecord, field: AreaField, value: &FieldValue) -> Result<()> {
    match (field, value) {
        (AreaField::CoordX, FieldValue::Float(v)) => row.coord_x = *v,
        (AreaField::CoordY, FieldValue::Float(v)) => row.coord_y = *v,
        (AreaField::AreaType, FieldValue::AreaType(t)) => row.area_type = *t,
        (AreaField::ScaledPolygon, FieldValue::Text(s)) => row.scaled_polygon = s.clone(),
        (field, value) => {
            return Err(Error::Store(format!(
                "value {value:?} does not fit column {field:?}"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_lite_classification::AreaType;

    fn row(plan_id: i64) -> NewAreaRecord {
        NewAreaRecord {
            plan_id,
            coord_x: 1.0,
            coord_y: 2.0,
            area_type: AreaType::Room,
            scaled_polygon: String::new(),
        }
    }

    #[test]
    fn ids_are_sequential() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.seed_area(row(1)), 1);
        assert_eq!(repo.bulk_insert(vec![row(1), row(2)]).unwrap(), vec![2, 3]);
        assert_eq!(repo.find_by_plan(1).unwrap().len(), 2);
        assert_eq!(repo.area_writes(), vec![AreaWrite::Insert(vec![2, 3])]);
    }

    #[test]
    fn mistyped_update_changes_nothing() {
        let repo = InMemoryRepository::new();
        let id = repo.seed_area(row(1));
        let mut updates = AreaUpdates::new();
        updates
            .entry(AreaField::CoordX)
            .or_default()
            .insert(id, FieldValue::Float(9.0));
        updates
            .entry(AreaField::CoordY)
            .or_default()
            .insert(id, FieldValue::Text("oops".into()));

        assert!(matches!(repo.bulk_update(&updates), Err(Error::Store(_))));
        assert_eq!(repo.get_by_id(id).unwrap().coord_x, 1.0);
        assert!(repo.area_writes().is_empty());
    }

    #[test]
    fn missing_rows_are_not_found() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_by_id(7).unwrap_err().is_not_found());
        assert!(repo.get_annotation(7).unwrap_err().is_not_found());
        assert_eq!(repo.delete_in(&[7]).unwrap(), 0);
    }
}
