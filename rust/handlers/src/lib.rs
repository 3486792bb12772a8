// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan-Lite Handlers
//!
//! Plan-level operations on top of the layout model:
//!
//! - [`PlanLayoutHandler`] builds a plan's layout from its annotation, with
//!   optional validation, classification, georeferencing and scaling, and
//!   memoizes every product.
//! - [`AreaHandler`] reconciles persisted area rows with a freshly parsed
//!   layout, deciding which rows are recovered, inserted or deleted.
//!
//! Storage is reached only through the traits in [`store`];
//! [`InMemoryRepository`] implements all of them for tests and local runs.
//! Everything here is single-threaded and request scoped.

pub mod area_handler;
pub mod error;
pub mod memory;
pub mod plan_layout_handler;
pub mod reconcile;
pub mod store;

pub use area_handler::{AreaHandler, ReconciliationReport};
pub use error::{Error, Result};
pub use memory::{AreaWrite, InMemoryRepository};
pub use plan_layout_handler::{LayoutOptions, PlanLayoutHandler, PlanLayoutHandlerIdCache};
pub use reconcile::{apply_matches, map_existing_areas, AreaMatch};
pub use store::{
    AnnotationStore, AreaField, AreaRecord, AreaStore, AreaUpdates, FieldValue, NewAreaRecord,
    PlanRecord, PlanStore, Repository, SiteRecord, SiteStore,
};
