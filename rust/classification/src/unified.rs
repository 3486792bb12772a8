// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The unified classification scheme, the default for every site.

use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::scheme::ClassificationScheme;
use crate::taxonomy::{AreaTree, AreaTypeLevel, NodeRecord, Taxonomy};
use crate::types::{AreaType, FeatureType, SiaCategory};

use AreaType::*;

/// (area type, owning SIA category, color, sort order)
const AREA_TYPES: &[(AreaType, SiaCategory, &str, u32)] = &[
    (NotDefined, SiaCategory::Hnf, "#D9D9D9", 100),
    (Room, SiaCategory::Hnf, "#F4A582", 101),
    (Bedroom, SiaCategory::Hnf, "#F7C6A3", 102),
    (LivingRoom, SiaCategory::Hnf, "#FDDBC7", 103),
    (LivingDining, SiaCategory::Hnf, "#FBB4AE", 104),
    (Dining, SiaCategory::Hnf, "#FED9A6", 105),
    (Kitchen, SiaCategory::Hnf, "#FFED6F", 106),
    (KitchenDining, SiaCategory::Hnf, "#FFFFB3", 107),
    (Office, SiaCategory::Hnf, "#E5D8BD", 108),
    (Bathroom, SiaCategory::Nnf, "#92C5DE", 200),
    (SanitaryRooms, SiaCategory::Nnf, "#A6CEE3", 201),
    (Storeroom, SiaCategory::Nnf, "#B2DF8A", 202),
    (Cellar, SiaCategory::Nnf, "#CCEBC5", 203),
    (WashAndDryRoom, SiaCategory::Nnf, "#80B1D3", 204),
    (BikeStorage, SiaCategory::Nnf, "#B3DE69", 205),
    (Garage, SiaCategory::Nnf, "#8DD3C7", 206),
    (Corridor, SiaCategory::Vf, "#BEBADA", 300),
    (Lobby, SiaCategory::Vf, "#CAB2D6", 301),
    (Staircase, SiaCategory::Vf, "#BC80BD", 302),
    (Elevator, SiaCategory::Vf, "#9E9AC8", 303),
    (Ramp, SiaCategory::Vf, "#DADAEB", 304),
    (Shaft, SiaCategory::Ff, "#969696", 400),
    (TechnicalArea, SiaCategory::Ff, "#BDBDBD", 401),
    (Heating, SiaCategory::Ff, "#FB8072", 402),
    (ElectricalSupply, SiaCategory::Ff, "#FCCDE5", 403),
    (WaterSupply, SiaCategory::Ff, "#6BAED6", 404),
    (Balcony, SiaCategory::Anf, "#C7E9C0", 500),
    (Loggia, SiaCategory::Anf, "#A1D99B", 501),
    (Terrace, SiaCategory::Anf, "#74C476", 502),
    (Wintergarten, SiaCategory::Anf, "#E5F5E0", 503),
    (Arcade, SiaCategory::Anf, "#D9F0A3", 504),
    (Patio, SiaCategory::Anf, "#ADDD8E", 505),
];

const SIA_CATEGORIES: &[(SiaCategory, &str, u32)] = &[
    (SiaCategory::Hnf, "#E41A1C", 1),
    (SiaCategory::Nnf, "#377EB8", 2),
    (SiaCategory::Vf, "#984EA3", 3),
    (SiaCategory::Ff, "#4D4D4D", 4),
    (SiaCategory::Anf, "#4DAF4A", 5),
];

const NET_AREA_CONTRIBUTIONS: &[(AreaType, f64)] = &[
    (NotDefined, 1.0),
    (Room, 1.0),
    (Bedroom, 1.0),
    (LivingRoom, 1.0),
    (LivingDining, 1.0),
    (Dining, 1.0),
    (Kitchen, 1.0),
    (KitchenDining, 1.0),
    (Office, 1.0),
    (Bathroom, 1.0),
    (SanitaryRooms, 1.0),
    (Storeroom, 1.0),
    (Cellar, 1.0),
    (WashAndDryRoom, 1.0),
    (BikeStorage, 1.0),
    (Garage, 1.0),
    (Corridor, 1.0),
    (Lobby, 1.0),
    (Staircase, 1.0),
    (Elevator, 1.0),
    (Ramp, 1.0),
    (Shaft, 1.0),
    (TechnicalArea, 1.0),
    (Heating, 1.0),
    (ElectricalSupply, 1.0),
    (WaterSupply, 1.0),
    (Wintergarten, 1.0),
    (Balcony, 0.0),
    (Loggia, 0.0),
    (Terrace, 0.0),
    (Arcade, 0.0),
    (Patio, 0.0),
];

const ROOM_COUNTS: &[(AreaType, f64)] = &[
    (Room, 1.0),
    (Bedroom, 1.0),
    (LivingRoom, 1.0),
    (LivingDining, 1.5),
    (Dining, 1.0),
    (KitchenDining, 1.5),
    (Office, 1.0),
    (Wintergarten, 0.5),
    (Loggia, 0.5),
];

const ACCEPTING_SHAFTS: &[AreaType] = &[
    NotDefined,
    Kitchen,
    KitchenDining,
    Bathroom,
    SanitaryRooms,
    Storeroom,
    Cellar,
    WashAndDryRoom,
    Corridor,
    Lobby,
    TechnicalArea,
    Heating,
    ElectricalSupply,
    WaterSupply,
];

const WITH_WATER_SUPPLY: &[AreaType] = &[
    Kitchen,
    KitchenDining,
    Bathroom,
    SanitaryRooms,
    WashAndDryRoom,
    WaterSupply,
];

const FEATURE_MAPPING: &[(FeatureType, &[AreaType])] = &[
    (FeatureType::Toilet, &[NotDefined, Bathroom, SanitaryRooms]),
    (FeatureType::Shower, &[NotDefined, Bathroom, SanitaryRooms]),
    (FeatureType::Bathtub, &[NotDefined, Bathroom]),
    (
        FeatureType::Sink,
        &[NotDefined, Bathroom, SanitaryRooms, Kitchen, KitchenDining, WashAndDryRoom],
    ),
    (
        FeatureType::Kitchen,
        &[NotDefined, Kitchen, KitchenDining, LivingDining, LivingRoom, Dining, Room],
    ),
    (
        FeatureType::WashingMachine,
        &[NotDefined, WashAndDryRoom, Bathroom, SanitaryRooms, Storeroom, Cellar],
    ),
    (FeatureType::Stairs, &[NotDefined, Staircase, Corridor, Lobby, LivingRoom, Room]),
    (FeatureType::Elevator, &[NotDefined, Elevator]),
    (FeatureType::Shaft, ACCEPTING_SHAFTS),
    (FeatureType::Ramp, &[NotDefined, Ramp, Garage, Corridor]),
    (FeatureType::BikeParking, &[NotDefined, BikeStorage, Garage]),
    (FeatureType::CarParking, &[NotDefined, Garage]),
    (FeatureType::OfficeDesk, &[NotDefined, Office, Room]),
];

/// Default scheme grouping every area type under one SIA 416 category.
#[derive(Debug)]
pub struct UnifiedClassificationScheme {
    taxonomy: Taxonomy,
    accepting_shafts: FxHashSet<AreaType>,
    with_water_supply: FxHashSet<AreaType>,
    net_area_contributions: FxHashMap<AreaType, f64>,
    room_counts: FxHashMap<AreaType, f64>,
    feature_mapping: FxHashMap<FeatureType, FxHashSet<AreaType>>,
}

impl UnifiedClassificationScheme {
    pub const NAME: &'static str = "UNIFIED";

    /// Builds the scheme, validating its taxonomy.
    pub fn try_new() -> Result<Self> {
        let mut tree = AreaTree::default();
        for (category, color, sort_order) in SIA_CATEGORIES {
            let children = AREA_TYPES
                .iter()
                .filter(|(_, owner, _, _)| owner == category)
                .map(|(t, _, _, _)| *t);
            tree.insert(
                (*category).into(),
                NodeRecord::new(AreaTypeLevel::SiaCategory, *color, *sort_order).with_children(children),
            );
        }
        for (area_type, _, color, sort_order) in AREA_TYPES {
            tree.insert(
                (*area_type).into(),
                NodeRecord::new(AreaTypeLevel::BaseAreaType, *color, *sort_order),
            );
        }

        Ok(Self {
            taxonomy: Taxonomy::new(Self::NAME, tree)?,
            accepting_shafts: ACCEPTING_SHAFTS.iter().copied().collect(),
            with_water_supply: WITH_WATER_SUPPLY.iter().copied().collect(),
            net_area_contributions: NET_AREA_CONTRIBUTIONS.iter().copied().collect(),
            room_counts: ROOM_COUNTS.iter().copied().collect(),
            feature_mapping: FEATURE_MAPPING
                .iter()
                .map(|(feature, allowed)| (*feature, allowed.iter().copied().collect()))
                .collect(),
        })
    }

    /// The process-wide instance.
    ///
    /// # Panics
    ///
    /// Panics if the built-in taxonomy is malformed, which is a configuration
    /// error that must surface at startup.
    pub fn shared() -> &'static Self {
        static INSTANCE: OnceLock<UnifiedClassificationScheme> = OnceLock::new();
        INSTANCE.get_or_init(|| Self::try_new().expect("unified classification taxonomy is malformed"))
    }
}

impl ClassificationScheme for UnifiedClassificationScheme {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    fn area_types_accepting_shafts(&self) -> &FxHashSet<AreaType> {
        &self.accepting_shafts
    }

    fn area_types_with_water_supply(&self) -> &FxHashSet<AreaType> {
        &self.with_water_supply
    }

    fn net_area_contribution_table(&self) -> &FxHashMap<AreaType, f64> {
        &self.net_area_contributions
    }

    fn room_count_table(&self) -> &FxHashMap<AreaType, f64> {
        &self.room_counts
    }

    fn area_types_feature_mapping(&self) -> &FxHashMap<FeatureType, FxHashSet<AreaType>> {
        &self.feature_mapping
    }
}
