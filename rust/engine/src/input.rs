// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw surface definitions as handed over by the input-parsing collaborator.
//!
//! Field values arrive already resolved to flat data; name references to
//! zones, constructions, and other surfaces are resolved here during
//! collection. Vertex coordinates are in the configured input convention
//! (zone-relative or world), not yet normalized.

use nalgebra::Point3;
use zonegeom_model::SurfaceClass;

/// A zone as enumerated by the zone-list collaborator.
#[derive(Debug, Clone)]
pub struct ZoneDef {
    pub name: String,
    /// Zone north rotation relative to building north, degrees clockwise.
    pub relative_north_deg: f64,
    /// Zone origin offset in building coordinates.
    pub origin: Point3<f64>,
    pub multiplier: u32,
    pub volume: Option<f64>,
    pub floor_area: Option<f64>,
    pub ceiling_height: Option<f64>,
}

impl ZoneDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relative_north_deg: 0.0,
            origin: Point3::origin(),
            multiplier: 1,
            volume: None,
            floor_area: None,
            ceiling_height: None,
        }
    }
}

/// Geometry of a surface definition: either an explicit vertex list or a
/// parameterized rectangle.
#[derive(Debug, Clone)]
pub enum GeometryDef {
    /// Ordered vertex list in the configured starting-corner/winding
    /// convention. Zone-relative or world per the context flag; for
    /// subsurfaces, the same frame as their base surface.
    Detailed(Vec<Point3<f64>>),
    /// Azimuth/tilt/lower-left-origin/length/height shorthand. For
    /// subsurfaces the origin is in the base surface's local frame and
    /// azimuth/tilt are inherited from the base.
    Rectangular {
        azimuth_deg: f64,
        tilt_deg: f64,
        /// Lower-left corner.
        origin: Point3<f64>,
        length: f64,
        height: f64,
    },
}

/// Exterior boundary condition as entered.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryDef {
    Outdoors,
    Ground,
    GroundFcFactor,
    OtherSideCoefNoCalc(u32),
    OtherSideCoefCalc(u32),
    OtherSideConditionsModel(u32),
    KivaFoundation(u32),
    /// Explicit paired surface by name; the surface's own name means
    /// adiabatic.
    Surface(String),
    /// The "Zone" shorthand: only the adjacent zone is named and the
    /// opposite surface gets synthesized.
    Zone(String),
    /// Left blank; defaults to self-adiabatic with a warning.
    Blank,
}

/// A base heat-transfer surface (wall, floor, or roof/ceiling).
#[derive(Debug, Clone)]
pub struct SurfaceDef {
    pub name: String,
    /// One of Wall / Floor / Roof.
    pub class: SurfaceClass,
    pub construction: String,
    pub zone: String,
    pub boundary: BoundaryDef,
    pub sun_exposed: bool,
    pub wind_exposed: bool,
    pub geometry: GeometryDef,
}

/// Frame-and-divider attachment for a window-like subsurface.
#[derive(Debug, Clone, Copy)]
pub struct FrameDividerDef {
    /// Frame width around the opening, meters.
    pub frame_width: f64,
    pub divider_width: f64,
    pub horizontal_dividers: u32,
    pub vertical_dividers: u32,
}

/// A window, glass door, door, or TDD component on a base surface.
#[derive(Debug, Clone)]
pub struct SubsurfaceDef {
    pub name: String,
    pub class: SurfaceClass,
    pub construction: String,
    pub base_surface: String,
    /// Explicit interzone pairing; otherwise the boundary is inherited
    /// from the base surface.
    pub boundary_surface: Option<String>,
    pub multiplier: u32,
    pub geometry: GeometryDef,
    pub frame_divider: Option<FrameDividerDef>,
}

/// Detached (site/building) or zone-attached shading geometry.
#[derive(Debug, Clone)]
pub struct ShadingDef {
    pub name: String,
    /// DetachedShadingFixed, DetachedShadingBuilding, or AttachedShading.
    pub class: SurfaceClass,
    /// Base surface for attached shading.
    pub base_surface: Option<String>,
    pub geometry: GeometryDef,
}

/// Parameterized overhang above a window or door.
#[derive(Debug, Clone)]
pub struct OverhangDef {
    pub name: String,
    /// The window or door being shaded.
    pub window: String,
    pub height_above_window: f64,
    pub tilt_from_window_deg: f64,
    pub left_extension: f64,
    pub right_extension: f64,
    pub depth: f64,
}

/// Parameterized left/right fins beside a window or door. Each present
/// side produces one shading surface.
#[derive(Debug, Clone)]
pub struct FinDef {
    pub name: String,
    pub window: String,
    pub left: Option<FinSideDef>,
    pub right: Option<FinSideDef>,
}

/// One side of a fin definition.
#[derive(Debug, Clone, Copy)]
pub struct FinSideDef {
    /// Distance from the window edge, meters.
    pub extension: f64,
    pub distance_above: f64,
    pub distance_below: f64,
    pub depth: f64,
}

/// Internal mass: thermally participating area with no fixed geometry.
#[derive(Debug, Clone)]
pub struct InternalMassDef {
    pub name: String,
    pub construction: String,
    pub zone: String,
    pub area: f64,
}

/// Everything the collection pass consumes, in input order.
#[derive(Debug, Clone, Default)]
pub struct GeometryInput {
    pub zones: Vec<ZoneDef>,
    pub surfaces: Vec<SurfaceDef>,
    pub subsurfaces: Vec<SubsurfaceDef>,
    pub shading: Vec<ShadingDef>,
    pub overhangs: Vec<OverhangDef>,
    pub fins: Vec<FinDef>,
    pub internal_mass: Vec<InternalMassDef>,
}

impl GeometryInput {
    pub fn new() -> Self {
        Self::default()
    }
}
