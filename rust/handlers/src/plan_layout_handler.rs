// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout construction for one plan.
//!
//! [`PlanLayoutHandler::get_layout`] runs a fixed pipeline on a copy of the
//! plan's raw layout:
//!
//! 1. validate (violations are attached, never raised),
//! 2. classify by matching persisted area rows,
//! 3. georeference: rotation about the plan's pivot, then translation,
//! 4. scale back into editor pixels if an unscaled result was requested.
//!
//! The raw layout is parsed from the annotation and scaled into metres once
//! per `postprocessed` flag. Finished layouts are memoized per full
//! [`LayoutOptions`] value. Both caches live in the handler instance and
//! hand out clones, so no caller can alter what another caller sees.

use std::cell::{OnceCell, RefCell};

use floorplan_lite_classification::ClassificationScheme;
use floorplan_lite_layout::{
    parse_annotation, postprocess, to_layout_frame, validate_classification, validate_layout,
    Annotation, LayoutConfig, PlanLayout,
};
use geo::Coord;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::reconcile::{apply_matches, map_existing_areas};
use crate::store::{AreaRecord, PlanRecord, Repository};

/// Which products of the pipeline to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LayoutOptions {
    /// Metric output. Unscaled output is in editor pixels.
    pub scaled: bool,
    /// Assign area types and ids from persisted rows.
    pub classified: bool,
    pub georeferenced: bool,
    /// Drop tiny areas and regroup spaces before anything else.
    pub postprocessed: bool,
    pub validate: bool,
    /// Fail with `Error::AreaMismatch` when classification is ambiguous.
    pub raise_on_inconsistency: bool,
}

impl LayoutOptions {
    /// Metric layout with nothing else applied.
    pub fn scaled() -> Self {
        Self {
            scaled: true,
            ..Self::default()
        }
    }

    pub fn classified(mut self, on: bool) -> Self {
        self.classified = on;
        self
    }

    pub fn georeferenced(mut self, on: bool) -> Self {
        self.georeferenced = on;
        self
    }

    pub fn postprocessed(mut self, on: bool) -> Self {
        self.postprocessed = on;
        self
    }

    pub fn validated(mut self, on: bool) -> Self {
        self.validate = on;
        self
    }

    pub fn raise_on_inconsistency(mut self, on: bool) -> Self {
        self.raise_on_inconsistency = on;
        self
    }
}

pub struct PlanLayoutHandler<'a> {
    plan_id: i64,
    repo: &'a dyn Repository,
    config: LayoutConfig,
    plan: OnceCell<PlanRecord>,
    annotation: OnceCell<Annotation>,
    raw_layouts: RefCell<FxHashMap<bool, PlanLayout>>,
    layouts: RefCell<FxHashMap<LayoutOptions, PlanLayout>>,
}

impl<'a> PlanLayoutHandler<'a> {
    pub fn new(plan_id: i64, repo: &'a dyn Repository, config: LayoutConfig) -> Self {
        Self {
            plan_id,
            repo,
            config,
            plan: OnceCell::new(),
            annotation: OnceCell::new(),
            raw_layouts: RefCell::new(FxHashMap::default()),
            layouts: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn plan_id(&self) -> i64 {
        self.plan_id
    }

    pub fn plan(&self) -> Result<&PlanRecord> {
        if let Some(plan) = self.plan.get() {
            return Ok(plan);
        }
        let plan = self.repo.get_plan(self.plan_id)?;
        Ok(self.plan.get_or_init(|| plan))
    }

    pub fn annotation(&self) -> Result<&Annotation> {
        if let Some(annotation) = self.annotation.get() {
            return Ok(annotation);
        }
        let annotation = self.repo.get_annotation(self.plan_id)?;
        Ok(self.annotation.get_or_init(|| annotation))
    }

    /// Metres per editor pixel.
    pub fn scale(&self) -> Result<f64> {
        Ok(self.annotation()?.scale)
    }

    /// Classification scheme of the plan's site.
    pub fn scheme(&self) -> Result<&'static dyn ClassificationScheme> {
        let site = self.repo.get_site(self.plan()?.site_id)?;
        Ok(site.classification_scheme.scheme())
    }

    /// Persisted area rows of the plan with their points in the metric frame.
    pub fn db_areas_in_layout_frame(&self) -> Result<Vec<AreaRecord>> {
        self.rows_in_layout_frame(self.repo.find_by_plan(self.plan_id)?)
    }

    /// Moves already loaded rows of this plan into the layout frame.
    pub fn rows_in_layout_frame(&self, mut rows: Vec<AreaRecord>) -> Result<Vec<AreaRecord>> {
        let scale = self.scale()?;
        for row in &mut rows {
            let c = to_layout_frame(
                Coord {
                    x: row.coord_x,
                    y: row.coord_y,
                },
                scale,
            );
            row.coord_x = c.x;
            row.coord_y = c.y;
        }
        Ok(rows)
    }

    /// Builds, or returns a cached copy of, the layout for `options`.
    pub fn get_layout(&self, options: LayoutOptions) -> Result<PlanLayout> {
        {
            let cache = self.layouts.borrow();
            if let Some(layout) = cache.get(&options) {
                return Ok(layout.clone());
            }
        }

        let layout = self.build_layout(options)?;
        {
            let mut cache = self.layouts.borrow_mut();
            cache.insert(options, layout.clone());
        }
        Ok(layout)
    }

    fn build_layout(&self, options: LayoutOptions) -> Result<PlanLayout> {
        let mut layout = self.raw_layout(options.postprocessed)?;

        if options.validate {
            let violations = validate_layout(&layout, &self.config);
            layout.violations.extend(violations);
        }

        if options.classified {
            let db_areas = self.db_areas_in_layout_frame()?;
            let matches = map_existing_areas(&layout, &db_areas, options.raise_on_inconsistency)
                .map_err(|e| match e {
                    Error::AreaMismatch(msg) => Error::AreaMismatch(format!(
                        "Plan {} has invalid areas. {msg}",
                        self.plan_id
                    )),
                    other => other,
                })?;
            apply_matches(&mut layout, &matches)?;

            if options.validate {
                let violations = validate_classification(&layout, self.scheme()?);
                layout.violations.extend(violations);
            }
        }

        if options.georeferenced {
            self.plan()?.georeference().apply(&mut layout);
        }

        if !options.scaled {
            layout.apply_scaling(1.0 / self.scale()?);
        }

        tracing::debug!(
            plan_id = self.plan_id,
            areas = layout.area_count(),
            violations = layout.violations.len(),
            ?options,
            "built layout"
        );
        Ok(layout)
    }

    /// Copy of the metric layout parsed from the annotation.
    fn raw_layout(&self, postprocessed: bool) -> Result<PlanLayout> {
        {
            let cache = self.raw_layouts.borrow();
            if let Some(layout) = cache.get(&postprocessed) {
                return Ok(layout.clone());
            }
        }

        let annotation = self.annotation()?;
        let mut layout = parse_annotation(annotation, &self.config)?;
        layout.apply_scaling(annotation.scale);
        if postprocessed {
            postprocess(&mut layout, &self.config);
        }

        {
            let mut cache = self.raw_layouts.borrow_mut();
            cache.insert(postprocessed, layout.clone());
        }
        Ok(layout)
    }
}

/// Handlers for many plans sharing one repository, keyed by plan id.
///
/// Not synchronized; callers sharing one cache across threads need their
/// own lock.
pub struct PlanLayoutHandlerIdCache<'a> {
    repo: &'a dyn Repository,
    config: LayoutConfig,
    handlers: FxHashMap<i64, PlanLayoutHandler<'a>>,
}

impl<'a> PlanLayoutHandlerIdCache<'a> {
    pub fn new(repo: &'a dyn Repository, config: LayoutConfig) -> Self {
        Self {
            repo,
            config,
            handlers: FxHashMap::default(),
        }
    }

    pub fn handler(&mut self, plan_id: i64) -> &PlanLayoutHandler<'a> {
        let (repo, config) = (self.repo, &self.config);
        self.handlers
            .entry(plan_id)
            .or_insert_with(|| PlanLayoutHandler::new(plan_id, repo, config.clone()))
    }

    /// Layouts of `plan_ids` in the given order.
    pub fn get_layouts(&mut self, plan_ids: &[i64], options: LayoutOptions) -> Result<Vec<PlanLayout>> {
        plan_ids
            .iter()
            .map(|id| self.handler(*id).get_layout(options))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
