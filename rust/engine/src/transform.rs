// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate transformation between zone-relative, building, and world
//! frames, plus the per-base-surface local frame used to place subsurfaces.

use nalgebra::{Point3, Vector3};
use zonegeom_geometry::angles::SurfaceAngles;
use zonegeom_model::{GeometryContext, LocalFrame, Surface, Zone};

use crate::error::{Error, Result};

/// Rotates a point about the +Z axis by `deg` degrees clockwise (matching
/// the clockwise-from-north azimuth convention).
fn rotate_clockwise(p: &Point3<f64>, deg: f64) -> Point3<f64> {
    let theta = -deg.to_radians();
    let (s, c) = theta.sin_cos();
    Point3::new(p.x * c - p.y * s, p.x * s + p.y * c, p.z)
}

/// Converts a raw input vertex to world coordinates.
///
/// In relative mode the vertex rotates by the combined building north and
/// zone relative north, translates by the zone origin, then takes the
/// energy-code appendix rotation. In world-coordinate mode only the appendix
/// rotation applies; zone north/origin are ignored for geometry (collection
/// warns once per zone when they are non-zero, since that usually means the
/// user mixed conventions).
pub fn to_world(ctx: &GeometryContext, zone: Option<&Zone>, p: &Point3<f64>) -> Point3<f64> {
    let mut out = *p;
    if !ctx.world_coordinates {
        let rel_north = zone.map(|z| z.relative_north_deg).unwrap_or(0.0);
        out = rotate_clockwise(&out, ctx.building_north_deg + rel_north);
        if let Some(z) = zone {
            out += z.origin.coords;
        }
    }
    if ctx.appendix_rotation_deg != 0.0 {
        out = rotate_clockwise(&out, ctx.appendix_rotation_deg);
    }
    out
}

/// Converts a site-fixed vertex (detached shading anchored to true north)
/// to world coordinates. Building north never applies; the appendix
/// rotation still does.
pub fn to_world_site(ctx: &GeometryContext, p: &Point3<f64>) -> Point3<f64> {
    if ctx.appendix_rotation_deg != 0.0 {
        rotate_clockwise(p, ctx.appendix_rotation_deg)
    } else {
        *p
    }
}

/// Builds the local frame of a base surface from its finalized world
/// vertices and angles.
///
/// With the canonical upper-left-corner counterclockwise layout, vertex 1 is
/// the lower-left corner; it anchors the frame. The stored shifts express
/// the base surface's own anchor in its local axes, so subsurface vertices
/// given relative to the base can be shifted into the shared world frame.
pub fn base_local_frame(vertices: &[Point3<f64>], angles: &SurfaceAngles) -> LocalFrame {
    let origin = if vertices.len() >= 2 {
        vertices[1]
    } else {
        Point3::origin()
    };
    let axis_x = angles.lcs_x;
    let axis_z = angles.lcs_z;
    let axis_y = axis_z.cross(&axis_x);
    LocalFrame {
        origin,
        axis_x,
        axis_y,
        axis_z,
        x_shift: axis_x.dot(&origin.coords),
        y_shift: axis_y.dot(&origin.coords),
    }
}

/// Places a point expressed in a base surface's local (x right, y up,
/// z out-of-plane) frame into world coordinates.
pub fn from_base_frame(frame: &LocalFrame, local: &Point3<f64>) -> Point3<f64> {
    frame.origin + frame.axis_x * local.x + frame.axis_y * local.y + frame.axis_z * local.z
}

/// Fetches the local frame of a processed base surface.
///
/// A subsurface reaching this point before its base surface was processed
/// is a pipeline-ordering bug, not a user input problem, and fails fatally.
pub fn require_frame(base: &Surface, subsurface_name: &str) -> Result<LocalFrame> {
    if !base.vertices_processed {
        return Err(Error::SubsurfaceBeforeBase {
            subsurface: subsurface_name.to_string(),
            base: base.name.clone(),
        });
    }
    base.local_frame.ok_or_else(|| Error::SubsurfaceBeforeBase {
        subsurface: subsurface_name.to_string(),
        base: base.name.clone(),
    })
}

/// Builds the four vertices of a parameterized rectangle in the canonical
/// upper-left counterclockwise order, in the same (pre-world) frame as the
/// origin parameter.
///
/// `azimuth_deg` is the direction the outward normal faces; `tilt_deg`
/// follows the 0-up/90-vertical/180-down convention. The origin is the
/// lower-left corner.
pub fn rectangle_vertices(
    azimuth_deg: f64,
    tilt_deg: f64,
    origin: &Point3<f64>,
    length: f64,
    height: f64,
) -> Vec<Point3<f64>> {
    let az = azimuth_deg.to_radians();
    let tilt = tilt_deg.to_radians();

    // Outward normal for the given azimuth/tilt
    let normal = Vector3::new(az.sin() * tilt.sin(), az.cos() * tilt.sin(), tilt.cos());
    // Bottom edge runs left-to-right seen from outside; horizontal for
    // walls, and for roofs/floors it follows the azimuth reference.
    let axis_x = Vector3::new(-az.cos(), az.sin(), 0.0);
    let axis_y = normal.cross(&axis_x);

    let ll = *origin;
    let lr = ll + axis_x * length;
    let ul = ll + axis_y * height;
    let ur = lr + axis_y * height;
    vec![ul, ll, lr, ur]
}
