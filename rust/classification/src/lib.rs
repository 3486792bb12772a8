// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan-Lite Classification
//!
//! Area-type taxonomy for floor plans following the SIA 416 building-area
//! standard. Every assignable [`AreaType`] belongs to exactly one
//! [`SiaCategory`]; the void pseudo types (VOID, LIGHTWELL, OUTDOOR_VOID)
//! exist in every scheme and belong to none.
//!
//! A [`ClassificationScheme`] exposes the [`Taxonomy`] and rule tables that
//! downstream code consults:
//!
//! - net-area multipliers and room-count weights,
//! - which area types may absorb a shaft,
//! - which area types have water supply,
//! - which area types a feature (toilet, kitchen, ...) may be placed in.
//!
//! ```rust
//! use floorplan_lite_classification::{AreaType, Classifications, ClassificationScheme};
//!
//! let scheme = Classifications::Unified.scheme();
//! assert_eq!(scheme.net_area_contribution(AreaType::Void), 0.0);
//! assert_eq!(scheme.room_count(AreaType::KitchenDining), 1.5);
//! ```

pub mod error;
pub mod registry;
pub mod scheme;
pub mod taxonomy;
pub mod types;
pub mod unified;

pub use error::{Error, Result};
pub use registry::Classifications;
pub use scheme::ClassificationScheme;
pub use taxonomy::{AreaTree, AreaTypeLevel, NodeRecord, Taxonomy, TaxonomyNode};
pub use types::{AreaType, FeatureType, SiaCategory};
pub use unified::UnifiedClassificationScheme;
