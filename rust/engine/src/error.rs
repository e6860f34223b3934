// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::mode::RenderMode;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the viewer.
///
/// Appearance and partner lookups never error; they degrade to defaults.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Scene error: {0}")]
    Scene(#[from] bemview_scene::Error),

    #[error("Render mode {0} is not available for this scene")]
    ModeUnavailable(RenderMode),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Legend export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
