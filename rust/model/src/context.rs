// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The immutable per-run geometry configuration.
//!
//! All of this used to be ambient global state in legacy engines; here it is
//! one value passed into every stage that needs it, so tests can inject a
//! synthetic context.

/// Which corner the input vertex lists start at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StartingCorner {
    #[default]
    UpperLeft,
    LowerLeft,
    LowerRight,
    UpperRight,
}

/// Traversal direction of input vertex lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winding {
    Clockwise,
    #[default]
    Counterclockwise,
}

/// Solar distribution mode. Only its geometric consequences matter here:
/// `MinimalShadowing` skips detached shading surfaces entirely, and convexity
/// warnings are only interesting when solar calculations will run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolarDistribution {
    MinimalShadowing,
    #[default]
    FullExterior,
    FullInteriorAndExterior,
    FullExteriorWithReflections,
    FullInteriorAndExteriorWithReflections,
}

impl SolarDistribution {
    /// Detached shading objects are only processed in the non-minimal modes.
    pub fn processes_detached_shading(self) -> bool {
        !matches!(self, Self::MinimalShadowing)
    }

    /// Interior solar modes care about non-convex interior surfaces.
    pub fn is_full_interior(self) -> bool {
        matches!(
            self,
            Self::FullInteriorAndExterior | Self::FullInteriorAndExteriorWithReflections
        )
    }
}

/// Immutable per-run configuration consumed by the pipeline.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeometryContext {
    pub starting_corner: StartingCorner,
    pub winding: Winding,
    /// Vertices are already in world coordinates; zone north/origin are
    /// ignored (and warned about when non-zero).
    pub world_coordinates: bool,
    /// Building north axis, degrees clockwise from true north.
    pub building_north_deg: f64,
    /// Additional energy-code ("appendix") rotation applied even in world
    /// coordinate mode.
    pub appendix_rotation_deg: f64,
    /// Generate reversed mirror copies of detached/attached shading.
    pub mirror_shading: bool,
    pub solar_distribution: SolarDistribution,
    /// Print every occurrence of throttleable warnings instead of the first
    /// occurrence plus a summary count.
    pub display_extra_warnings: bool,
}

impl Default for GeometryContext {
    fn default() -> Self {
        Self {
            starting_corner: StartingCorner::UpperLeft,
            winding: Winding::Counterclockwise,
            world_coordinates: false,
            building_north_deg: 0.0,
            appendix_rotation_deg: 0.0,
            mirror_shading: false,
            solar_distribution: SolarDistribution::FullExterior,
            display_extra_warnings: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_shadowing_skips_detached_shading() {
        assert!(!SolarDistribution::MinimalShadowing.processes_detached_shading());
        assert!(SolarDistribution::FullExterior.processes_detached_shading());
    }
}
