// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout handling and area reconciliation.

/// Result type alias for handler operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Annotation geometry and persisted areas diverged beyond automatic
    /// repair. Needs a human to re-validate the plan.
    #[error("{0}")]
    AreaMismatch(String),

    /// A plan, site, annotation or area row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A storage collaborator failed.
    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Layout(#[from] floorplan_lite_layout::Error),

    #[error(transparent)]
    Classification(#[from] floorplan_lite_classification::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
