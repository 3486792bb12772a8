// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for layout entities.
//!
//! Keys are generational indices handed out by `slotmap::SlotMap`. A cloned
//! layout keeps the same keys, so matches computed on one copy can be applied
//! to another.

use slotmap::new_key_type;

new_key_type! {
    /// Key for an area (single room or space polygon).
    pub struct AreaKey;

    /// Key for a space (connected group of areas).
    pub struct SpaceKey;

    /// Key for a feature (fixture or equipment item).
    pub struct FeatureKey;
}
