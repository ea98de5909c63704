// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric tolerances shared across the pipeline.
//!
//! These values are part of the contract: edge pairing in the volume engine,
//! vertex de-duplication, and the rectangle/convexity classifiers all key off
//! them, and regression fixtures assume the exact values below.

/// Two points closer than this are the same point in space (half an inch).
pub const SAME_POINT_TOL: f64 = 0.0127;

/// Consecutive vertices closer than this are dropped during vertex
/// processing (1 cm).
pub const COINCIDENT_VERTEX_TOL: f64 = 0.01;

/// An edge turn within this many radians of zero marks the middle vertex
/// as collinear.
pub const COLLINEAR_TURN_TOL: f64 = 1e-6;

/// Maximum out-of-plane deviation that is only warned about; larger
/// deviations are reported as severe input errors.
pub const PLANARITY_WARN_TOL: f64 = 0.01;

/// Outward-normal components within this distance of -1, 0, or +1 are
/// snapped to the exact value.
pub const NORMAL_SNAP_TOL: f64 = 1e-6;

/// Tolerance on the distance-sum test in [`point_on_segment`].
///
/// [`point_on_segment`]: crate::polygon::point_on_segment
pub const ON_SEGMENT_TOL: f64 = 1e-6;

/// Rectangles must have adjacent edges within 89..91 degrees.
pub const RECTANGLE_ANGLE_TOL_DEG: f64 = 1.0;

/// Relative disagreement between polygon area and width*height beyond which
/// square-equivalent dimensions are derived instead.
pub const AREA_EXTENT_TOL: f64 = 0.001;
