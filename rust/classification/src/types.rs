// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed enumerations used throughout the floor plan model.
//!
//! Names are stored in SCREAMING_SNAKE_CASE, which is also the persisted form
//! of the `area_type` column. Parsing is case-insensitive so that editor
//! documents using `snake_case` item types resolve to the same values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
        unknown = $unknown:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the persisted name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| Error::$unknown(s.to_string()))
            }
        }
    };
}

named_enum! {
    /// Top-level area grouping per SIA 416.
    pub enum SiaCategory {
        /// Aussengeschossfläche: balconies, loggias, terraces.
        Anf => "ANF",
        /// Hauptnutzfläche: primary usable area.
        Hnf => "HNF",
        /// Nebennutzfläche: secondary usable area.
        Nnf => "NNF",
        /// Funktionsfläche: building services.
        Ff => "FF",
        /// Verkehrsfläche: circulation.
        Vf => "VF",
    }
    unknown = UnknownSiaCategory;
}

named_enum! {
    /// Concrete room or space category that can be assigned to an area.
    pub enum AreaType {
        NotDefined => "NOT_DEFINED",
        Room => "ROOM",
        Bedroom => "BEDROOM",
        LivingRoom => "LIVING_ROOM",
        LivingDining => "LIVING_DINING",
        Dining => "DINING",
        Kitchen => "KITCHEN",
        KitchenDining => "KITCHEN_DINING",
        Office => "OFFICE",
        Bathroom => "BATHROOM",
        SanitaryRooms => "SANITARY_ROOMS",
        Storeroom => "STOREROOM",
        Cellar => "CELLAR",
        WashAndDryRoom => "WASH_AND_DRY_ROOM",
        BikeStorage => "BIKE_STORAGE",
        Garage => "GARAGE",
        Corridor => "CORRIDOR",
        Lobby => "LOBBY",
        Staircase => "STAIRCASE",
        Elevator => "ELEVATOR",
        Ramp => "RAMP",
        Shaft => "SHAFT",
        TechnicalArea => "TECHNICAL_AREA",
        Heating => "HEATING",
        ElectricalSupply => "ELECTRICAL_SUPPLY",
        WaterSupply => "WATER_SUPPLY",
        Balcony => "BALCONY",
        Loggia => "LOGGIA",
        Terrace => "TERRACE",
        Wintergarten => "WINTERGARTEN",
        Arcade => "ARCADE",
        Patio => "PATIO",
        Void => "VOID",
        Lightwell => "LIGHTWELL",
        OutdoorVoid => "OUTDOOR_VOID",
    }
    unknown = UnknownAreaType;
}

named_enum! {
    /// Type of an annotated feature (fixture or equipment item).
    pub enum FeatureType {
        Toilet => "TOILET",
        Sink => "SINK",
        Shower => "SHOWER",
        Bathtub => "BATHTUB",
        Kitchen => "KITCHEN",
        WashingMachine => "WASHING_MACHINE",
        Stairs => "STAIRS",
        Elevator => "ELEVATOR",
        Shaft => "SHAFT",
        Ramp => "RAMP",
        BikeParking => "BIKE_PARKING",
        CarParking => "CAR_PARKING",
        BuiltInFurniture => "BUILT_IN_FURNITURE",
        OfficeDesk => "OFFICE_DESK",
    }
    unknown = UnknownFeatureType;
}

impl AreaType {
    /// Structural "no material" pseudo types present in every scheme.
    pub const VOID_TYPES: [AreaType; 3] = [AreaType::Void, AreaType::Lightwell, AreaType::OutdoorVoid];

    /// Returns `true` for VOID, LIGHTWELL and OUTDOOR_VOID.
    #[inline]
    pub fn is_void(&self) -> bool {
        Self::VOID_TYPES.contains(self)
    }
}

impl Default for AreaType {
    fn default() -> Self {
        AreaType::NotDefined
    }
}
