// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for classification lookups and taxonomy construction.

/// Result type alias for classification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a classification scheme.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The taxonomy of a scheme violates a structural rule. This is a
    /// configuration error and is not recoverable at runtime.
    #[error("classification scheme '{scheme}' is incomplete: {reason}")]
    IncompleteScheme { scheme: String, reason: String },

    #[error("unknown classification scheme: {0}")]
    UnknownScheme(String),

    #[error("unknown area type: {0}")]
    UnknownAreaType(String),

    #[error("unknown SIA category: {0}")]
    UnknownSiaCategory(String),

    #[error("unknown feature type: {0}")]
    UnknownFeatureType(String),
}
