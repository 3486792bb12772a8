// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted scheme selector (the site's `classification_scheme` column).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::scheme::ClassificationScheme;
use crate::unified::UnifiedClassificationScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classifications {
    #[default]
    #[serde(rename = "UNIFIED")]
    Unified,
}

impl Classifications {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classifications::Unified => UnifiedClassificationScheme::NAME,
        }
    }

    /// Resolves the selector to its scheme instance.
    pub fn scheme(&self) -> &'static dyn ClassificationScheme {
        match self {
            Classifications::Unified => UnifiedClassificationScheme::shared(),
        }
    }
}

impl fmt::Display for Classifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classifications {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNIFIED" => Ok(Classifications::Unified),
            _ => Err(Error::UnknownScheme(s.to_string())),
        }
    }
}
