// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Azimuth/tilt extraction and the per-surface local coordinate frame.
//!
//! Conventions: azimuth is measured clockwise from north (+Y) in the
//! horizontal plane; tilt is measured from horizontal, 0 degrees facing
//! straight up and 180 degrees facing straight down.

use nalgebra::{Point3, Vector3};

use crate::tolerances::NORMAL_SNAP_TOL;

/// Orientation of a surface plus its local right-handed axes.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceAngles {
    /// Degrees clockwise from north, in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Degrees from horizontal: 0 facing up, 90 vertical, 180 facing down.
    pub tilt_deg: f64,
    /// Local x axis, along the canonical bottom edge of the loop.
    pub lcs_x: Vector3<f64>,
    /// Local y axis, `lcs_z x lcs_x`.
    pub lcs_y: Vector3<f64>,
    /// Local z axis, the outward unit normal.
    pub lcs_z: Vector3<f64>,
}

/// Derives azimuth, tilt, and local axes from an ordered vertex loop and its
/// outward normal.
///
/// With the canonical upper-left-corner/counterclockwise layout, vertex 1 is
/// the lower-left corner and vertex 2 the lower-right, so `v[2] - v[1]` runs
/// along the bottom edge and becomes the local x axis. When that edge is
/// degenerate the frame falls back to an axis orthogonalized against the
/// normal.
///
/// A zero-length normal (degenerate loop) yields azimuth 0 and tilt 0 rather
/// than dividing by zero.
pub fn azimuth_and_tilt(vertices: &[Point3<f64>], normal: &Vector3<f64>) -> SurfaceAngles {
    let len = normal.norm();
    if len < 1e-15 {
        return SurfaceAngles {
            azimuth_deg: 0.0,
            tilt_deg: 0.0,
            lcs_x: Vector3::x(),
            lcs_y: Vector3::y(),
            lcs_z: Vector3::z(),
        };
    }
    let lcs_z = normal / len;

    let tilt_deg = lcs_z.z.clamp(-1.0, 1.0).acos().to_degrees();

    let horiz = (lcs_z.x * lcs_z.x + lcs_z.y * lcs_z.y).sqrt();
    let azimuth_deg = if horiz < 1e-12 {
        0.0
    } else {
        let mut az = lcs_z.x.atan2(lcs_z.y).to_degrees();
        if az < 0.0 {
            az += 360.0;
        }
        // atan2 can return exactly -0.0 -> 360.0 after the wrap
        if az >= 360.0 {
            az -= 360.0;
        }
        az
    };

    let lcs_x = local_x_axis(vertices, &lcs_z);
    let lcs_y = lcs_z.cross(&lcs_x);

    SurfaceAngles {
        azimuth_deg,
        tilt_deg,
        lcs_x,
        lcs_y,
        lcs_z,
    }
}

/// Local x axis along the canonical bottom edge, orthogonalized against the
/// normal. Falls back to a fixed perpendicular when the edge degenerates.
fn local_x_axis(vertices: &[Point3<f64>], lcs_z: &Vector3<f64>) -> Vector3<f64> {
    let edge = if vertices.len() >= 3 {
        vertices[2] - vertices[1]
    } else {
        Vector3::zeros()
    };
    let projected = edge - lcs_z * edge.dot(lcs_z);
    if projected.norm() > 1e-9 {
        return projected.normalize();
    }
    // Degenerate bottom edge: pick any axis perpendicular to the normal
    if lcs_z.z.abs() < 0.9 {
        Vector3::z().cross(lcs_z).normalize()
    } else {
        Vector3::x().cross(lcs_z).normalize()
    }
}

/// Snaps near-unit and near-zero components to exactly -1, 0, or +1.
///
/// Later passes compare normal components with exact equality (horizontal
/// floor, vertical wall tests); this keeps floating noise out of those
/// comparisons.
pub fn snap_unit_components(v: &Vector3<f64>) -> Vector3<f64> {
    let snap = |c: f64| {
        if (c - 1.0).abs() < NORMAL_SNAP_TOL {
            1.0
        } else if (c + 1.0).abs() < NORMAL_SNAP_TOL {
            -1.0
        } else if c.abs() < NORMAL_SNAP_TOL {
            0.0
        } else {
            c
        }
    };
    Vector3::new(snap(v.x), snap(v.y), snap(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn south_wall_azimuth_180() {
        // Wall facing -Y (south in the building convention where +Y is north)
        let verts = vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 3.0),
        ];
        let n = Vector3::new(0.0, -1.0, 0.0);
        let a = azimuth_and_tilt(&verts, &n);
        assert_relative_eq!(a.azimuth_deg, 180.0, epsilon = 1e-9);
        assert_relative_eq!(a.tilt_deg, 90.0, epsilon = 1e-9);
        assert_relative_eq!(a.lcs_x.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn roof_tilt_zero() {
        let verts = vec![
            Point3::new(0.0, 1.0, 3.0),
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(1.0, 0.0, 3.0),
            Point3::new(1.0, 1.0, 3.0),
        ];
        let a = azimuth_and_tilt(&verts, &Vector3::z());
        assert_relative_eq!(a.tilt_deg, 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.azimuth_deg, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn floor_tilt_180() {
        let verts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let a = azimuth_and_tilt(&verts, &(-Vector3::z()));
        assert_relative_eq!(a.tilt_deg, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn west_wall_azimuth_270() {
        let n = Vector3::new(-1.0, 0.0, 0.0);
        let verts = vec![
            Point3::new(0.0, 1.0, 3.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 3.0),
        ];
        let a = azimuth_and_tilt(&verts, &n);
        assert_relative_eq!(a.azimuth_deg, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_normal_yields_zeros() {
        let a = azimuth_and_tilt(&[], &Vector3::zeros());
        assert_eq!(a.azimuth_deg, 0.0);
        assert_eq!(a.tilt_deg, 0.0);
    }

    #[test]
    fn snap_cleans_noise() {
        let v = Vector3::new(1.0 - 1e-9, 1e-9, -1.0 + 1e-8);
        let s = snap_unit_components(&v);
        assert_eq!(s, Vector3::new(1.0, 0.0, -1.0));
        // Values outside the snap band pass through untouched
        let w = snap_unit_components(&Vector3::new(0.5, -0.5, 0.7071));
        assert_eq!(w.x, 0.5);
    }
}
