// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layout tolerances loaded from environment variables.

/// Tolerances used by parsing, validation and postprocessing.
///
/// Metric values apply to scaled layouts; parsing converts them to pixels
/// with the annotation's scale.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Areas below this size are flagged by validation and dropped by
    /// postprocessing.
    pub min_area_m2: f64,
    /// Maximum distance between two edges still treated as collinear.
    pub boundary_tolerance_m: f64,
    /// Minimum shared edge length for two areas to form one space.
    pub min_shared_boundary_m: f64,
    /// Overlap above which two areas are reported as overlapping.
    pub overlap_tolerance_m2: f64,
    /// Width for annotation lines that carry none.
    pub default_wall_width_px: f64,
}

impl LayoutConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            min_area_m2: std::env::var("FLOORPLAN_MIN_AREA_M2")
                .unwrap_or_else(|_| "0.5".into())
                .parse()
                .unwrap_or(0.5),
            boundary_tolerance_m: std::env::var("FLOORPLAN_BOUNDARY_TOLERANCE_M")
                .unwrap_or_else(|_| "0.01".into())
                .parse()
                .unwrap_or(0.01),
            min_shared_boundary_m: std::env::var("FLOORPLAN_MIN_SHARED_BOUNDARY_M")
                .unwrap_or_else(|_| "0.05".into())
                .parse()
                .unwrap_or(0.05),
            overlap_tolerance_m2: std::env::var("FLOORPLAN_OVERLAP_TOLERANCE_M2")
                .unwrap_or_else(|_| "0.01".into())
                .parse()
                .unwrap_or(0.01),
            default_wall_width_px: std::env::var("FLOORPLAN_DEFAULT_WALL_WIDTH_PX")
                .unwrap_or_else(|_| "20".into())
                .parse()
                .unwrap_or(20.0),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
