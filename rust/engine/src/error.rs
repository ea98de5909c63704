// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal pipeline errors.
///
/// These terminate the setup phase immediately. Everything recoverable goes
/// through the accumulating diagnostics channel instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A surface names a construction the registry does not know.
    #[error("surface '{surface}' references unknown construction '{construction}'")]
    ConstructionMissing { surface: String, construction: String },

    /// A non-degenerate subsurface names a base surface that does not exist.
    #[error("subsurface '{subsurface}' references unknown base surface '{base}'")]
    BaseSurfaceMissing { subsurface: String, base: String },

    /// A surface names a zone that does not exist.
    #[error("surface '{surface}' references unknown zone '{zone}'")]
    ZoneMissing { surface: String, zone: String },

    /// A subsurface reached vertex processing before its base surface's
    /// local frame existed. Programming invariant, not a user input error.
    #[error("subsurface '{subsurface}' processed before base surface '{base}'")]
    SubsurfaceBeforeBase { subsurface: String, base: String },

    /// Math kernel failure on input that should have been screened earlier.
    #[error("geometry kernel: {0}")]
    Geometry(#[from] zonegeom_geometry::Error),
}
