// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan-Lite Layout
//!
//! Geometric model of a floor plan: polygonal areas grouped into spaces,
//! features placed in areas, and the openings and separators between them.
//!
//! A layout is usually built from an editor [`Annotation`] with
//! [`parse_annotation`], which produces geometry in editor pixels. From there
//! the layout can be scaled into metres, cleaned up with [`postprocess`],
//! checked with [`validate_layout`] and placed on its site with a
//! [`GeoReference`].
//!
//! ```rust
//! use floorplan_lite_layout::{to_layout_frame, to_storage_frame};
//! use geo::Coord;
//!
//! let pixel = Coord { x: 250.0, y: 120.0 };
//! let metric = to_layout_frame(pixel, 0.25);
//! assert_eq!(to_storage_frame(metric, 0.25), pixel);
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod model;
pub mod postprocess;
pub mod serialization;
pub mod spaces;
pub mod transform;
pub mod validation;

pub use annotation::{parse_annotation, Annotation};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use geometry::{polygon_wkt, representative_point};
pub use keys::{AreaKey, FeatureKey, SpaceKey};
pub use model::{
    Area, Feature, Opening, OpeningType, PlanLayout, Separator, SeparatorType, Space,
};
pub use postprocess::postprocess;
pub use serialization::LayoutSnapshot;
pub use transform::{to_layout_frame, to_storage_frame, GeoReference};
pub use validation::{validate_classification, validate_layout, LayoutViolation, ViolationType};
