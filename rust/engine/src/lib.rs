// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ZoneGeom Engine
//!
//! Turns raw per-object surface definitions into a reconciled, oriented,
//! area/normal/centroid-annotated model of a building, and computes zone
//! volumes by exact polyhedral decomposition with geometric fallbacks.
//!
//! The pipeline runs in a fixed order: collection → vertex processing →
//! reconciliation (reordering, interzone matching, range computation) →
//! zone volume/enclosure work. Expected input problems accumulate in the
//! [`Diagnostics`] collector; only contract violations surface as [`Error`].
//!
//! [`Diagnostics`]: zonegeom_model::Diagnostics

pub mod error;
pub mod grouper;
pub mod input;
pub mod pipeline;
pub mod processor;
pub mod reconcile;
pub mod transform;
pub mod volume;

pub use error::{Error, Result};
pub use input::{
    BoundaryDef, FinDef, FinSideDef, FrameDividerDef, GeometryDef, GeometryInput,
    InternalMassDef, OverhangDef, ShadingDef, SubsurfaceDef, SurfaceDef, ZoneDef,
};
pub use pipeline::{process_surfaces, ProcessOutput};
