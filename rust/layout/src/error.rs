// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout construction and geometry queries.

use crate::keys::AreaKey;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a layout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the interior point nor the centroid of a polygon lies inside
    /// it. Indicates corrupt annotation geometry.
    #[error("invalid shape: no representative point inside {wkt}")]
    InvalidShape { wkt: String },

    /// The annotation document cannot be turned into a layout.
    #[error("invalid annotation: {0}")]
    InvalidAnnotation(String),

    #[error("area not found: {0:?}")]
    AreaNotFound(AreaKey),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
