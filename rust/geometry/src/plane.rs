// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plane equations fitted from vertex loops.

use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::polygon::{centroid, newell_normal};

/// A plane in Hessian normal form: `normal . p + offset == 0`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub offset: f64,
}

impl Plane {
    /// Fits a plane through a vertex loop.
    ///
    /// The normal comes from Newell's method and the offset anchors the plane
    /// at the loop centroid. Fails with [`Error::Degenerate`] when two
    /// vertices are closer than `same_point_tol` (a duplicate-point loop
    /// would otherwise produce a zero normal and NaNs downstream).
    pub fn from_points(vertices: &[Point3<f64>], same_point_tol: f64) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::TooFewVertices(vertices.len()));
        }
        let n = vertices.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if (vertices[j] - vertices[i]).norm() < same_point_tol {
                return Err(Error::Degenerate(i, j));
            }
        }
        let normal = newell_normal(vertices).ok_or(Error::Degenerate(0, 0))?;
        let offset = -normal.dot(&centroid(vertices).coords);
        Ok(Self { normal, offset })
    }

    /// Signed perpendicular distance from `p` to the plane.
    ///
    /// Positive on the side the normal points into.
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn plane_through_horizontal_square() {
        let pts = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        ];
        let plane = Plane::from_points(&pts, 0.0127).unwrap();
        assert_relative_eq!(plane.normal.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.signed_distance(&Point3::new(0.5, 0.5, 3.0)), 1.0, epsilon = 1e-12);
        assert_relative_eq!(plane.signed_distance(&Point3::new(9.0, -4.0, 2.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn duplicate_vertices_are_degenerate_not_nan() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.001),
            Point3::new(1.0, 1.0, 0.0),
        ];
        match Plane::from_points(&pts, 0.0127) {
            Err(Error::Degenerate(0, 1)) => {}
            other => panic!("expected Degenerate(0, 1), got {other:?}"),
        }
    }

    #[test]
    fn too_few_vertices() {
        let pts = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            Plane::from_points(&pts, 0.0127),
            Err(Error::TooFewVertices(2))
        ));
    }
}
