// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for scene ingestion.

/// Result type alias for scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a [`crate::Scene`].
///
/// Lookups made while rendering never fail; only ingestion does.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Two surfaces share the same OpenStudio handle.
    #[error("duplicate surface handle: {0}")]
    DuplicateHandle(String),

    /// A variable references data the scene does not carry.
    #[error("invalid variable {name}: {reason}")]
    InvalidVariable { name: String, reason: String },

    /// Surface geometry could not be built.
    #[error("geometry error: {0}")]
    Geometry(#[from] bemview_geometry::Error),

    /// The scene document is not valid JSON or has the wrong shape.
    #[error("scene document error: {0}")]
    Json(#[from] serde_json::Error),
}
