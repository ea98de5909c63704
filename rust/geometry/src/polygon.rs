// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Newell-method polygon math and point predicates.
//!
//! Newell's method computes a polygon's area vector directly from the ordered
//! vertex loop, without picking a projection plane first, which keeps it
//! robust for loops that are only planar within tolerance.

use nalgebra::{Point3, Vector3};

use crate::tolerances::ON_SEGMENT_TOL;

/// Computes the Newell area vector of a vertex loop.
///
/// The magnitude equals the true polygon area; the direction is the outward
/// normal implied by the winding order (right-hand rule).
pub fn newell_area_vector(vertices: &[Point3<f64>]) -> Vector3<f64> {
    let n = vertices.len();
    let mut v = Vector3::zeros();
    if n < 3 {
        return v;
    }
    for i in 0..n {
        let curr = &vertices[i];
        let next = &vertices[(i + 1) % n];
        v.x += (curr.y - next.y) * (curr.z + next.z);
        v.y += (curr.z - next.z) * (curr.x + next.x);
        v.z += (curr.x - next.x) * (curr.y + next.y);
    }
    v * 0.5
}

/// Computes the unit outward normal of a vertex loop via Newell's method.
///
/// Returns `None` for degenerate loops (zero-length area vector).
pub fn newell_normal(vertices: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let v = newell_area_vector(vertices);
    let len = v.norm();
    if len < 1e-15 {
        return None;
    }
    Some(v / len)
}

/// Sums consecutive vertex-to-vertex distances, wrapping around the loop.
pub fn perimeter(vertices: &[Point3<f64>]) -> f64 {
    let n = vertices.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (vertices[(i + 1) % n] - vertices[i]).norm())
        .sum()
}

/// Arithmetic mean of the vertex loop.
pub fn centroid(vertices: &[Point3<f64>]) -> Point3<f64> {
    let mut sum = Vector3::zeros();
    for p in vertices {
        sum += p.coords;
    }
    Point3::from(sum / vertices.len().max(1) as f64)
}

/// Outcome of a best-plane planarity check.
#[derive(Debug, Clone, Copy)]
pub struct Coplanarity {
    /// `true` when no vertex deviates from the best-fit plane by more than
    /// the caller's tolerance.
    pub is_coplanar: bool,
    /// Worst perpendicular distance from the best-fit plane, meters.
    pub max_deviation: f64,
    /// Index of the worst-deviating vertex.
    pub worst_index: usize,
}

/// Fits a best plane (Newell normal through the centroid) and reports the
/// worst perpendicular vertex deviation.
///
/// Non-planarity is a quality finding, never a hard failure: many legitimate
/// inputs carry tiny floating-point out-of-plane noise. Callers decide
/// between a warning and a severe report based on `max_deviation`.
pub fn coplanarity(vertices: &[Point3<f64>], tol: f64) -> Coplanarity {
    let Some(normal) = newell_normal(vertices) else {
        return Coplanarity {
            is_coplanar: true,
            max_deviation: 0.0,
            worst_index: 0,
        };
    };
    let c = centroid(vertices);
    let mut max_deviation = 0.0_f64;
    let mut worst_index = 0;
    for (i, p) in vertices.iter().enumerate() {
        let d = (p - c).dot(&normal).abs();
        if d > max_deviation {
            max_deviation = d;
            worst_index = i;
        }
    }
    Coplanarity {
        is_coplanar: max_deviation <= tol,
        max_deviation,
        worst_index,
    }
}

/// Tests whether `p` lies on the segment `a..b`, endpoints included.
///
/// Uses the distance-sum criterion: |a-p| + |p-b| == |a-b| within `tol`.
pub fn point_on_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>, tol: f64) -> bool {
    let ab = (b - a).norm();
    if ab < ON_SEGMENT_TOL {
        return same_point(p, a, tol);
    }
    let ap = (p - a).norm();
    let pb = (b - p).norm();
    (ap + pb - ab).abs() <= tol
}

/// Tests whether two points coincide within `tol`.
pub fn same_point(a: &Point3<f64>, b: &Point3<f64>, tol: f64) -> bool {
    (b - a).norm() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn newell_area_of_unit_square() {
        let v = newell_area_vector(&unit_square());
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn newell_normal_follows_winding() {
        let mut sq = unit_square();
        let up = newell_normal(&sq).unwrap();
        assert_relative_eq!(up.z, 1.0, epsilon = 1e-12);

        sq.reverse();
        let down = newell_normal(&sq).unwrap();
        assert_relative_eq!(down.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn newell_handles_nonconvex_loop() {
        // L-shaped polygon, area 3
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        assert_relative_eq!(newell_area_vector(&pts).norm(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn area_vectors_of_closed_box_sum_to_zero() {
        // Outward-wound faces of a 2 x 3 x 4 box. The divergence theorem
        // requires the area vectors of any closed surface to cancel.
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let faces = [
            vec![p(0.0, 0.0, 0.0), p(0.0, 3.0, 0.0), p(2.0, 3.0, 0.0), p(2.0, 0.0, 0.0)],
            vec![p(0.0, 0.0, 4.0), p(2.0, 0.0, 4.0), p(2.0, 3.0, 4.0), p(0.0, 3.0, 4.0)],
            vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(2.0, 0.0, 4.0), p(0.0, 0.0, 4.0)],
            vec![p(0.0, 3.0, 0.0), p(0.0, 3.0, 4.0), p(2.0, 3.0, 4.0), p(2.0, 3.0, 0.0)],
            vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 4.0), p(0.0, 3.0, 4.0), p(0.0, 3.0, 0.0)],
            vec![p(2.0, 0.0, 0.0), p(2.0, 3.0, 0.0), p(2.0, 3.0, 4.0), p(2.0, 0.0, 4.0)],
        ];
        let total: Vector3<f64> = faces.iter().map(|f| newell_area_vector(f)).sum();
        assert_relative_eq!(total.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_loop_has_no_normal() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert!(newell_normal(&pts).is_none());
    }

    #[test]
    fn perimeter_wraps() {
        assert_relative_eq!(perimeter(&unit_square()), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn coplanarity_flags_worst_vertex() {
        let mut pts = unit_square();
        pts.push(Point3::new(0.5, -0.5, 0.2));
        let c = coplanarity(&pts, 0.01);
        assert!(!c.is_coplanar);
        assert_eq!(c.worst_index, 4);
        assert!(c.max_deviation > 0.05);
    }

    #[test]
    fn coplanarity_accepts_planar_loop() {
        let c = coplanarity(&unit_square(), 1e-9);
        assert!(c.is_coplanar);
        assert_relative_eq!(c.max_deviation, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn point_on_segment_interior_and_endpoints() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        assert!(point_on_segment(&Point3::new(1.0, 0.0, 0.0), &a, &b, 1e-6));
        assert!(point_on_segment(&a, &a, &b, 1e-6));
        assert!(!point_on_segment(&Point3::new(1.0, 0.1, 0.0), &a, &b, 1e-6));
        assert!(!point_on_segment(&Point3::new(3.0, 0.0, 0.0), &a, &b, 1e-6));
    }
}
