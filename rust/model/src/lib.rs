// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ZoneGeom Model
//!
//! The in-memory building model produced by geometry processing: an
//! arena of [`Surface`] entities with stable dense indices, [`Zone`] records
//! with contiguous per-category surface ranges, radiant/solar [`Enclosure`]
//! groupings, the immutable per-run [`GeometryContext`], and the structured
//! [`Diagnostics`] collector that carries the warning/severe/fatal taxonomy.
//!
//! Surfaces are never destroyed or relocated once finalized; everything
//! downstream refers to them through [`SurfaceId`].

pub mod arena;
pub mod construction;
pub mod context;
pub mod diagnostics;
pub mod enclosure;
pub mod ids;
pub mod surface;
pub mod zone;

pub use arena::{SurfaceArena, SurfaceModel};
pub use construction::{Construction, ConstructionRegistry};
pub use context::{GeometryContext, SolarDistribution, StartingCorner, Winding};
pub use diagnostics::{Code, Diagnostic, Diagnostics, Severity};
pub use enclosure::{Enclosure, EnclosureKind};
pub use ids::{ConstructionId, EnclosureId, SurfaceId, ZoneId};
pub use surface::{BoundaryCondition, LocalFrame, Surface, SurfaceClass, SurfaceShape};
pub use zone::{SurfaceRange, Zone};
