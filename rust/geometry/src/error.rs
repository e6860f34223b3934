// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building geometry
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Position buffer length {0} is not a multiple of 3")]
    RaggedPositions(usize),

    #[error("Index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),

    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Polygon needs at least 3 points, got {0}")]
    DegeneratePolygon(usize),
}
