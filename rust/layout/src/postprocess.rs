// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::LayoutConfig;
use crate::keys::AreaKey;
use crate::model::PlanLayout;

/// Cleans up a metric layout: drops areas smaller than
/// [`LayoutConfig::min_area_m2`], detaches their features and regroups the
/// remaining areas into spaces. Returns the number of dropped areas.
pub fn postprocess(layout: &mut PlanLayout, config: &LayoutConfig) -> usize {
    let tiny: Vec<AreaKey> = layout
        .areas()
        .filter(|(_, area)| area.size() < config.min_area_m2)
        .map(|(key, _)| key)
        .collect();

    for key in &tiny {
        layout.remove_area(*key);
    }
    layout.rebuild_spaces(config.boundary_tolerance_m, config.min_shared_boundary_m);

    if !tiny.is_empty() {
        tracing::debug!(dropped = tiny.len(), "postprocessing removed small areas");
    }
    tiny.len()
}
