// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ZoneGeom Geometry Kernel
//!
//! Pure polygon and plane math for building surface processing: Newell area
//! vectors and normals, azimuth/tilt extraction, coplanarity and convexity
//! testing with collinear-vertex pruning, and the point/segment predicates
//! used by the zone-volume repair heuristic.
//!
//! All functions here are side-effect free. Tolerances live in
//! [`tolerances`] and are part of the numeric contract — downstream
//! round-trip behavior depends on their exact values.

pub mod angles;
pub mod convexity;
pub mod error;
pub mod plane;
pub mod polygon;
pub mod tolerances;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use angles::{azimuth_and_tilt, snap_unit_components, SurfaceAngles};
pub use convexity::{prune_collinear_and_test_convexity, ConvexityCheck};
pub use error::{Error, Result};
pub use plane::Plane;
pub use polygon::{
    centroid, coplanarity, newell_area_vector, newell_normal, perimeter, point_on_segment,
    same_point, Coplanarity,
};
