// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convexity testing with collinear-vertex pruning.
//!
//! The loop is projected onto whichever coordinate plane receives the largest
//! projected area, which avoids degenerate projections for vertical or
//! steeply tilted surfaces. Edge turns are then walked in 2D.

use nalgebra::Point3;
use smallvec::SmallVec;

use crate::polygon::newell_area_vector;
use crate::tolerances::COLLINEAR_TURN_TOL;

/// Result of [`prune_collinear_and_test_convexity`].
#[derive(Debug, Clone)]
pub struct ConvexityCheck {
    /// `true` when all edge turns share one sign after pruning.
    pub is_convex: bool,
    /// The vertex loop with collinear vertices removed.
    pub vertices: Vec<Point3<f64>>,
    /// How many collinear vertices were dropped.
    pub removed: usize,
    /// Pruning would have left fewer than 3 vertices; the loop is returned
    /// unpruned and cannot form a usable polygon.
    pub is_degenerate: bool,
}

/// Walks consecutive edge turns, dropping vertices whose turn angle is within
/// [`COLLINEAR_TURN_TOL`] of zero and reporting whether the remaining turns
/// all wind the same way.
///
/// Convexity failures are informational; they matter only to solar
/// distribution consumers and are never fatal.
pub fn prune_collinear_and_test_convexity(vertices: &[Point3<f64>]) -> ConvexityCheck {
    let n = vertices.len();
    if n < 3 {
        return ConvexityCheck {
            is_convex: false,
            vertices: vertices.to_vec(),
            removed: 0,
            is_degenerate: true,
        };
    }

    let projected = project_dominant(vertices);

    let mut drop: SmallVec<[bool; 8]> = SmallVec::from_elem(false, n);
    let mut seen_pos = false;
    let mut seen_neg = false;

    for i in 0..n {
        let prev = projected[(i + n - 1) % n];
        let curr = projected[i];
        let next = projected[(i + 1) % n];

        let e0 = (curr.0 - prev.0, curr.1 - prev.1);
        let e1 = (next.0 - curr.0, next.1 - curr.1);

        let cross = e0.0 * e1.1 - e0.1 * e1.0;
        let dot = e0.0 * e1.0 + e0.1 * e1.1;
        let turn = cross.atan2(dot);

        if turn.abs() <= COLLINEAR_TURN_TOL {
            drop[i] = true;
        } else if turn > 0.0 {
            seen_pos = true;
        } else {
            seen_neg = true;
        }
    }

    let removed = drop.iter().filter(|&&d| d).count();
    if n - removed < 3 {
        return ConvexityCheck {
            is_convex: !(seen_pos && seen_neg),
            vertices: vertices.to_vec(),
            removed: 0,
            is_degenerate: true,
        };
    }

    let kept: Vec<Point3<f64>> = vertices
        .iter()
        .zip(drop.iter())
        .filter(|(_, &d)| !d)
        .map(|(p, _)| *p)
        .collect();

    ConvexityCheck {
        is_convex: !(seen_pos && seen_neg),
        vertices: kept,
        removed,
        is_degenerate: false,
    }
}

/// Projects the loop onto the coordinate plane with the largest projected
/// area, returning 2D coordinates.
fn project_dominant(vertices: &[Point3<f64>]) -> Vec<(f64, f64)> {
    let area = newell_area_vector(vertices);
    let (ax, ay, az) = (area.x.abs(), area.y.abs(), area.z.abs());
    if az >= ax && az >= ay {
        vertices.iter().map(|p| (p.x, p.y)).collect()
    } else if ay >= ax {
        vertices.iter().map(|p| (p.z, p.x)).collect()
    } else {
        vertices.iter().map(|p| (p.y, p.z)).collect()
    }
}
