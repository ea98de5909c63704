// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The central [`Surface`] entity and its closed classification sets.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::ids::{ConstructionId, SurfaceId, ZoneId};

/// Vertex loop storage. Most surfaces are rectangular paths of 4 vertices.
pub type VertexLoop = SmallVec<[Point3<f64>; 4]>;

/// Classification of a surface. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceClass {
    Wall,
    Floor,
    Roof,
    Window,
    GlassDoor,
    Door,
    InternalMass,
    TddDome,
    TddDiffuser,
    /// Site shading, fixed relative to true north.
    DetachedShadingFixed,
    /// Building shading, rotates with the building north axis.
    DetachedShadingBuilding,
    /// Shading attached to a zone surface.
    AttachedShading,
    Overhang,
    Fin,
}

impl SurfaceClass {
    /// Window/door/TDD family: legal classes for a subsurface.
    pub fn is_subsurface(self) -> bool {
        matches!(
            self,
            Self::Window | Self::GlassDoor | Self::Door | Self::TddDome | Self::TddDiffuser
        )
    }

    /// Windows and glass doors: the classes whose base-surface area
    /// subtraction is divided by the subsurface multiplier. Opaque doors and
    /// TDD components subtract their full area.
    pub fn is_window_like(self) -> bool {
        matches!(self, Self::Window | Self::GlassDoor)
    }

    /// Any of the shading classes (not heat-transfer surfaces).
    pub fn is_shading(self) -> bool {
        matches!(
            self,
            Self::DetachedShadingFixed
                | Self::DetachedShadingBuilding
                | Self::AttachedShading
                | Self::Overhang
                | Self::Fin
        )
    }

    /// Wall/floor/roof: the base heat-transfer classes.
    pub fn is_base_heat_transfer(self) -> bool {
        matches!(self, Self::Wall | Self::Floor | Self::Roof)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Floor => "Floor",
            Self::Roof => "Roof",
            Self::Window => "Window",
            Self::GlassDoor => "GlassDoor",
            Self::Door => "Door",
            Self::InternalMass => "InternalMass",
            Self::TddDome => "TDD:Dome",
            Self::TddDiffuser => "TDD:Diffuser",
            Self::DetachedShadingFixed => "Shading:Site",
            Self::DetachedShadingBuilding => "Shading:Building",
            Self::AttachedShading => "Shading:Zone",
            Self::Overhang => "Overhang",
            Self::Fin => "Fin",
        }
    }
}

impl std::fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometric shape assigned by the vertex processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceShape {
    /// Not yet classified.
    None,
    Triangle,
    Rectangle,
    Quadrilateral,
    Polygonal,
    RectangularDoorWindow,
    TriangularWindow,
    TriangularDoor,
    RectangularOverhang,
    RectangularLeftFin,
    RectangularRightFin,
}

/// Exterior boundary condition of a surface.
///
/// The two `Unresolved*` variants exist only while reconciliation runs and
/// must not survive on any finalized surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryCondition {
    ExteriorEnvironment,
    Ground,
    GroundFcFactor,
    /// Other-side coefficients without surface-temperature calculation.
    OtherSideCoefNoCalc(u32),
    /// Other-side coefficients with surface-temperature calculation.
    OtherSideCoefCalc(u32),
    OtherSideConditionsModel(u32),
    KivaFoundation(u32),
    /// Interzone or adiabatic pairing; self-reference means adiabatic.
    Adjacent(SurfaceId),
    /// Transient: names a paired surface that has not been matched yet.
    UnresolvedSurface(String),
    /// Transient: the "Zone" shorthand, naming only the adjacent zone. A
    /// mirror surface gets synthesized in that zone.
    UnenteredAdjacentZone(String),
}

impl BoundaryCondition {
    /// Transient states are cleared by reconciliation.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedSurface(_) | Self::UnenteredAdjacentZone(_)
        )
    }

    /// Faces the outdoors (relevant to sun/wind exposure and obstruction
    /// eligibility).
    pub fn is_exterior(&self) -> bool {
        matches!(self, Self::ExteriorEnvironment)
    }
}

/// Per-base-surface local coordinate frame used to place subsurfaces.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalFrame {
    /// Lower-left corner anchor in world coordinates.
    pub origin: Point3<f64>,
    pub axis_x: Vector3<f64>,
    pub axis_y: Vector3<f64>,
    pub axis_z: Vector3<f64>,
    /// Offset of the base surface's own vertices in its local frame.
    pub x_shift: f64,
    pub y_shift: f64,
}

/// A building surface in its finalized, world-coordinate form.
///
/// Created by the reconciliation engine (first as a temporary record, then
/// copied into the canonical arena) and mutated in place by the vertex
/// processor. Never destroyed during a run.
#[derive(Debug, Clone)]
pub struct Surface {
    pub name: String,
    pub class: SurfaceClass,
    pub shape: SurfaceShape,
    /// Final ordered vertex loop, world coordinates.
    pub vertices: VertexLoop,

    /// Owning zone; `None` for detached shading.
    pub zone: Option<ZoneId>,
    /// Self for base surfaces and internal mass; the parent for subsurfaces.
    pub base_surface: SurfaceId,
    pub boundary: BoundaryCondition,
    pub construction: Option<ConstructionId>,

    // Derived geometry
    pub gross_area: f64,
    /// Gross area minus subsurface/frame subtractions.
    pub net_area: f64,
    pub perimeter: f64,
    pub azimuth_deg: f64,
    pub tilt_deg: f64,
    pub sin_azimuth: f64,
    pub cos_azimuth: f64,
    pub sin_tilt: f64,
    pub cos_tilt: f64,
    pub outward_normal: Vector3<f64>,
    pub centroid: Point3<f64>,
    pub width: f64,
    pub height: f64,
    pub view_factor_sky: f64,
    pub view_factor_ground: f64,

    // Subsurface extras
    /// Signed perpendicular distance from the subsurface to its base plane,
    /// snapped to exactly zero when negligible.
    pub reveal: f64,
    /// Lossy equivalent-rectangle dimensions for non-rectangular openings.
    /// Sized for convective flow paths only; never use for area.
    pub eff_width: f64,
    pub eff_height: f64,
    /// Glazed area after divider subtraction (windows with dividers).
    pub glazed_area: f64,
    /// Projected frame-area fraction relative to the opening.
    pub frame_projection: f64,
    /// Projected divider-area fraction relative to the opening.
    pub divider_projection: f64,
    pub multiplier: u32,
    /// Count of subsurfaces attached to this base surface.
    pub subsurface_count: u32,

    // Flags
    pub heat_transfer: bool,
    pub sun_exposed: bool,
    pub wind_exposed: bool,
    pub shadowing_obstruction: bool,
    pub is_air_boundary: bool,
    /// Set on auto-generated reversed shading copies.
    pub mirrored_of: Option<SurfaceId>,
    pub is_degenerate: bool,

    /// Guards the subsurface-before-base ordering invariant.
    pub vertices_processed: bool,
    /// Local frame of a base surface, available once processed.
    pub local_frame: Option<LocalFrame>,
}

impl Surface {
    /// A blank surface record with the given identity; geometry fields start
    /// zeroed and flags conservative.
    pub fn new(name: impl Into<String>, class: SurfaceClass) -> Self {
        Self {
            name: name.into(),
            class,
            shape: SurfaceShape::None,
            vertices: VertexLoop::new(),
            zone: None,
            base_surface: SurfaceId::new(0),
            boundary: BoundaryCondition::ExteriorEnvironment,
            construction: None,
            gross_area: 0.0,
            net_area: 0.0,
            perimeter: 0.0,
            azimuth_deg: 0.0,
            tilt_deg: 0.0,
            sin_azimuth: 0.0,
            cos_azimuth: 1.0,
            sin_tilt: 0.0,
            cos_tilt: 1.0,
            outward_normal: Vector3::zeros(),
            centroid: Point3::origin(),
            width: 0.0,
            height: 0.0,
            view_factor_sky: 0.5,
            view_factor_ground: 0.5,
            reveal: 0.0,
            eff_width: 0.0,
            eff_height: 0.0,
            glazed_area: 0.0,
            frame_projection: 0.0,
            divider_projection: 0.0,
            multiplier: 1,
            subsurface_count: 0,
            heat_transfer: !class.is_shading(),
            sun_exposed: false,
            wind_exposed: false,
            shadowing_obstruction: false,
            is_air_boundary: false,
            mirrored_of: None,
            is_degenerate: false,
            vertices_processed: false,
            local_frame: None,
        }
    }

    /// `true` when this record is its own base surface.
    pub fn is_base(&self, own_id: SurfaceId) -> bool {
        self.base_surface == own_id
    }
}
