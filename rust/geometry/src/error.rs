// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the math kernel
#[derive(Error, Debug)]
pub enum Error {
    /// Two input vertices are effectively the same point, so no plane or
    /// normal can be derived from the loop.
    #[error("degenerate polygon: vertices {0} and {1} are coincident")]
    Degenerate(usize, usize),

    /// The vertex loop has fewer than 3 vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}
