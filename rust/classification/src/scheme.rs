// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The classification scheme contract.
//!
//! A scheme supplies its taxonomy and the rule tables derived from it.
//! Required methods expose the scheme's own data; provided methods implement
//! the invariants every scheme shares (void types never contribute net area,
//! missing table entries default to zero) so that an implementation cannot
//! break them through its tables.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::taxonomy::{AreaTree, AreaTypeLevel, Taxonomy, TaxonomyNode};
use crate::types::{AreaType, FeatureType, SiaCategory};

pub trait ClassificationScheme: Send + Sync {
    /// Registry name of the scheme.
    fn name(&self) -> &'static str;

    fn taxonomy(&self) -> &Taxonomy;

    /// Area types into which a shaft may be merged instead of becoming a
    /// SHAFT area of its own.
    fn area_types_accepting_shafts(&self) -> &FxHashSet<AreaType>;

    fn area_types_with_water_supply(&self) -> &FxHashSet<AreaType>;

    /// The scheme's own net-area multipliers. Read through
    /// [`ClassificationScheme::net_area_contribution`].
    fn net_area_contribution_table(&self) -> &FxHashMap<AreaType, f64>;

    /// Room-count weight per area type.
    fn room_count_table(&self) -> &FxHashMap<AreaType, f64>;

    /// Area types each feature type may be placed in.
    fn area_types_feature_mapping(&self) -> &FxHashMap<FeatureType, FxHashSet<AreaType>>;

    fn area_tree(&self) -> &AreaTree {
        self.taxonomy().tree()
    }

    /// All descendants of a SIA category or area type.
    fn get_children(&self, parent: TaxonomyNode) -> &BTreeSet<AreaType> {
        self.taxonomy().children(parent)
    }

    fn area_types_per_level(&self, level: AreaTypeLevel) -> BTreeSet<TaxonomyNode> {
        self.taxonomy().nodes_at_level(level)
    }

    /// Every assignable area type. A fresh sequence on every call.
    fn leaf_area_types(&self) -> Vec<AreaType> {
        self.taxonomy().leaf_area_types()
    }

    fn sia_category(&self, area_type: AreaType) -> Option<SiaCategory> {
        self.taxonomy().sia_category(area_type)
    }

    fn net_area_contribution(&self, area_type: AreaType) -> f64 {
        if area_type.is_void() {
            return 0.0;
        }
        self.net_area_contribution_table()
            .get(&area_type)
            .copied()
            .unwrap_or(0.0)
    }

    /// Net-area multipliers for every area type in the tree.
    fn net_area_contributions(&self) -> FxHashMap<AreaType, f64> {
        self.area_tree()
            .keys()
            .filter_map(|node| match node {
                TaxonomyNode::Area(t) => Some((*t, self.net_area_contribution(*t))),
                TaxonomyNode::Sia(_) => None,
            })
            .collect()
    }

    fn room_count(&self, area_type: AreaType) -> f64 {
        self.room_count_table().get(&area_type).copied().unwrap_or(0.0)
    }

    fn room_counts(&self) -> FxHashMap<AreaType, f64> {
        self.room_count_table().clone()
    }

    fn accepts_shafts(&self, area_type: AreaType) -> bool {
        self.area_types_accepting_shafts().contains(&area_type)
    }

    fn has_water_supply(&self, area_type: AreaType) -> bool {
        self.area_types_with_water_supply().contains(&area_type)
    }

    /// Whether a feature of `feature_type` may sit inside an area of
    /// `area_type`. Feature types the scheme does not map are unrestricted.
    fn feature_allowed_in(&self, feature_type: FeatureType, area_type: AreaType) -> bool {
        self.area_types_feature_mapping()
            .get(&feature_type)
            .map_or(true, |allowed| allowed.contains(&area_type))
    }

    /// Sum of room-count weights, e.g. 3.5 for an apartment.
    fn total_room_count(&self, area_types: &mut dyn Iterator<Item = AreaType>) -> f64 {
        area_types.map(|t| self.room_count(t)).sum()
    }

    /// Net area of `(type, gross m²)` pairs.
    fn total_net_area(&self, areas: &mut dyn Iterator<Item = (AreaType, f64)>) -> f64 {
        areas.map(|(t, m2)| self.net_area_contribution(t) * m2).sum()
    }
}
