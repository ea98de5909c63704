// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-surface vertex processing.
//!
//! Takes a surface whose raw world-coordinate vertices were just copied from
//! input and leaves it finalized: de-duplicated, convexity-checked, winding
//! corrected, with area/normal/tilt/azimuth/width/height/perimeter and view
//! factors populated. Base surfaces additionally get their local frame for
//! subsurface placement.

use nalgebra::Point3;
use zonegeom_geometry::tolerances::{
    AREA_EXTENT_TOL, COINCIDENT_VERTEX_TOL, PLANARITY_WARN_TOL, RECTANGLE_ANGLE_TOL_DEG,
    SAME_POINT_TOL,
};
use zonegeom_geometry::{
    azimuth_and_tilt, centroid, coplanarity, newell_area_vector, perimeter,
    prune_collinear_and_test_convexity, same_point, snap_unit_components, Plane,
};
use zonegeom_model::{
    Code, Diagnostics, GeometryContext, Surface, SurfaceClass, SurfaceShape,
};

use crate::input::FrameDividerDef;
use crate::transform::base_local_frame;

/// Planarity deviations below this are floating noise and not worth a
/// warning.
const PLANARITY_NOISE_TOL: f64 = 1e-4;

/// Reveal depths smaller than this snap to exactly zero.
const REVEAL_SNAP_TOL: f64 = 1e-4;

/// Post-winding-fix plausibility bounds: a corrected roof steeper than this
/// tilt, or a corrected floor shallower than its bound, likely means a real
/// input error rather than a winding mistake.
const ROOF_TILT_WARN_DEG: f64 = 80.0;
const FLOOR_TILT_WARN_DEG: f64 = 158.2;

/// Finalizes a base surface (walls, floors, roofs, shading, and the
/// synthesized mirrors of all of these).
pub fn process_base_surface(surf: &mut Surface, ctx: &GeometryContext, diag: &mut Diagnostics) {
    if !compute_loop_geometry(surf, ctx, diag) {
        surf.vertices_processed = true;
        return;
    }

    fix_upside_down(surf, diag);
    classify_base_shape(surf);

    surf.net_area = surf.gross_area;
    let angles = azimuth_and_tilt(&surf.vertices, &surf.outward_normal);
    surf.local_frame = Some(base_local_frame(&surf.vertices, &angles));
    surf.vertices_processed = true;
}

/// Finalizes a subsurface against its already-processed base surface.
///
/// The caller guarantees `base.vertices_processed`; the coordinate
/// transformer enforces that ordering fatally.
pub fn process_subsurface(
    sub: &mut Surface,
    base: &Surface,
    ctx: &GeometryContext,
    diag: &mut Diagnostics,
) {
    if !compute_loop_geometry(sub, ctx, diag) {
        sub.vertices_processed = true;
        return;
    }

    classify_subsurface_shape(sub, base);
    compute_reveal(sub, base);

    // Non-rectangular 4-sided openings get lossy equivalent dimensions for
    // convective flow paths; area and shadowing keep the true polygon.
    sub.eff_width = sub.width;
    sub.eff_height = sub.height;
    if sub.vertices.len() == 4
        && !is_rectangle(&sub.vertices)
        && matches!(
            sub.class,
            SurfaceClass::Window | SurfaceClass::GlassDoor | SurfaceClass::Door
        )
    {
        make_equivalent_rectangle(sub, base);
    }

    sub.net_area = sub.gross_area;
    sub.glazed_area = sub.gross_area;
    sub.vertices_processed = true;
}

/// Shared loop finalization: de-duplication, Newell geometry, pruning,
/// planarity. Returns `false` when the loop is degenerate and no further
/// geometry can be derived.
fn compute_loop_geometry(surf: &mut Surface, ctx: &GeometryContext, diag: &mut Diagnostics) -> bool {
    remove_coincident_vertices(surf, diag);
    if surf.vertices.len() < 3 {
        surf.is_degenerate = true;
        diag.warn(
            Code::DegenerateSurface,
            Some(surf.name.clone()),
            format!("fewer than 3 distinct vertices remain ({})", surf.vertices.len()),
        );
        return false;
    }

    let check = prune_collinear_and_test_convexity(&surf.vertices);
    if check.is_degenerate {
        surf.is_degenerate = true;
        diag.warn(
            Code::DegenerateSurface,
            Some(surf.name.clone()),
            "collinear pruning would leave fewer than 3 vertices",
        );
        return false;
    }
    if check.removed > 0 {
        diag.warn(
            Code::CollinearVerticesRemoved,
            Some(surf.name.clone()),
            format!("{} collinear vertices removed", check.removed),
        );
        surf.vertices = check.vertices.into_iter().collect();
    }
    if !check.is_convex && ctx.solar_distribution.is_full_interior() {
        diag.warn(
            Code::NonConvexSurface,
            Some(surf.name.clone()),
            "surface is non-convex; interior solar distribution assumes convex surfaces",
        );
    }

    let area_vec = newell_area_vector(&surf.vertices);
    surf.gross_area = area_vec.norm();
    if surf.gross_area <= 1e-9 {
        surf.is_degenerate = true;
        if surf.heat_transfer {
            diag.severe(
                Code::NegativeOrZeroArea,
                Some(surf.name.clone()),
                "surface has zero area",
            );
        }
        return false;
    }

    surf.outward_normal = snap_unit_components(&(area_vec / surf.gross_area));

    let angles = azimuth_and_tilt(&surf.vertices, &area_vec);
    apply_angles(surf, angles.azimuth_deg, angles.tilt_deg);

    if surf.vertices.len() > 3 {
        let cop = coplanarity(&surf.vertices, PLANARITY_WARN_TOL);
        if cop.max_deviation > PLANARITY_WARN_TOL {
            diag.severe(
                Code::NonPlanarSurface,
                Some(surf.name.clone()),
                format!(
                    "vertex {} is {:.4} m out of plane",
                    cop.worst_index, cop.max_deviation
                ),
            );
        } else if cop.max_deviation > PLANARITY_NOISE_TOL {
            diag.warn(
                Code::NonPlanarSurface,
                Some(surf.name.clone()),
                format!(
                    "vertex {} is {:.5} m out of plane",
                    cop.worst_index, cop.max_deviation
                ),
            );
        }
    }

    surf.perimeter = perimeter(&surf.vertices);
    surf.centroid = centroid(&surf.vertices);
    true
}

/// Drops consecutive vertices closer than 1 cm, wrapping around the loop.
fn remove_coincident_vertices(surf: &mut Surface, diag: &mut Diagnostics) {
    let mut removed = 0usize;
    let mut kept: Vec<Point3<f64>> = Vec::with_capacity(surf.vertices.len());
    for p in surf.vertices.iter() {
        if kept
            .last()
            .is_some_and(|last| same_point(last, p, COINCIDENT_VERTEX_TOL))
        {
            removed += 1;
            continue;
        }
        kept.push(*p);
    }
    // Closing edge: last vs first
    while kept.len() > 1 && same_point(&kept[0], kept.last().unwrap(), COINCIDENT_VERTEX_TOL) {
        kept.pop();
        removed += 1;
    }
    if removed > 0 {
        diag.warn(
            Code::CoincidentVerticesRemoved,
            Some(surf.name.clone()),
            format!("{removed} coincident vertices removed"),
        );
        surf.vertices = kept.into_iter().collect();
    }
}

fn apply_angles(surf: &mut Surface, azimuth_deg: f64, tilt_deg: f64) {
    surf.azimuth_deg = azimuth_deg;
    surf.tilt_deg = tilt_deg;
    surf.sin_azimuth = azimuth_deg.to_radians().sin();
    surf.cos_azimuth = azimuth_deg.to_radians().cos();
    surf.sin_tilt = tilt_deg.to_radians().sin();
    surf.cos_tilt = tilt_deg.to_radians().cos();
    surf.view_factor_sky = 0.5 * (1.0 + surf.cos_tilt);
    surf.view_factor_ground = 0.5 * (1.0 - surf.cos_tilt);
}

/// Detects an upside-down roof (should face up) or floor (should face
/// down) by the sign of the normal's vertical component, reverses the
/// winding, and recomputes. Warns when the corrected tilt is still far from
/// expectation, which usually means a genuine input error.
fn fix_upside_down(surf: &mut Surface, diag: &mut Diagnostics) {
    let flipped = match surf.class {
        SurfaceClass::Roof => surf.outward_normal.z < 0.0,
        SurfaceClass::Floor => surf.outward_normal.z > 0.0,
        _ => false,
    };
    if flipped {
        surf.vertices.reverse();

        let area_vec = newell_area_vector(&surf.vertices);
        surf.gross_area = area_vec.norm();
        surf.outward_normal = snap_unit_components(&(area_vec / surf.gross_area));
        let angles = azimuth_and_tilt(&surf.vertices, &area_vec);
        apply_angles(surf, angles.azimuth_deg, angles.tilt_deg);
        diag.warn(
            Code::UpsideDownSurfaceFixed,
            Some(surf.name.clone()),
            "vertex winding reversed to orient the outward normal",
        );
    }

    match surf.class {
        SurfaceClass::Roof if surf.tilt_deg > ROOF_TILT_WARN_DEG => diag.warn(
            Code::ImplausibleTiltAfterFix,
            Some(surf.name.clone()),
            format!(
                "roof tilt {:.1} deg exceeds {ROOF_TILT_WARN_DEG} deg ({:.0}% slope)",
                surf.tilt_deg,
                percent_slope(surf.tilt_deg),
            ),
        ),
        SurfaceClass::Floor if surf.tilt_deg < FLOOR_TILT_WARN_DEG => diag.warn(
            Code::ImplausibleTiltAfterFix,
            Some(surf.name.clone()),
            format!(
                "floor tilt {:.1} deg is below {FLOOR_TILT_WARN_DEG} deg ({:.0}% slope)",
                surf.tilt_deg,
                percent_slope(180.0 - surf.tilt_deg),
            ),
        ),
        _ => {}
    }
}

/// Rise-over-run percent for a tilt measured from horizontal, capped so a
/// near-vertical plane reports a large finite number.
fn percent_slope(from_horizontal_deg: f64) -> f64 {
    (from_horizontal_deg.to_radians().tan() * 100.0)
        .abs()
        .min(9999.0)
}

/// Rectangle test: equal diagonals plus near-perpendicular adjacent edges.
fn is_rectangle(vertices: &[Point3<f64>]) -> bool {
    if vertices.len() != 4 {
        return false;
    }
    let d1 = (vertices[2] - vertices[0]).norm();
    let d2 = (vertices[3] - vertices[1]).norm();
    if (d1 - d2).abs() > SAME_POINT_TOL {
        return false;
    }
    let e0 = vertices[0] - vertices[1];
    let e1 = vertices[2] - vertices[1];
    let denom = e0.norm() * e1.norm();
    if denom < 1e-12 {
        return false;
    }
    let angle = (e0.dot(&e1) / denom).clamp(-1.0, 1.0).acos().to_degrees();
    (angle - 90.0).abs() <= RECTANGLE_ANGLE_TOL_DEG
}

fn classify_base_shape(surf: &mut Surface) {
    match surf.vertices.len() {
        3 => {
            surf.shape = SurfaceShape::Triangle;
            set_extent_dimensions(surf);
        }
        4 => {
            if is_rectangle(&surf.vertices) {
                surf.shape = SurfaceShape::Rectangle;
                surf.width = (surf.vertices[2] - surf.vertices[1]).norm();
                surf.height = (surf.vertices[0] - surf.vertices[1]).norm();
            } else {
                surf.shape = SurfaceShape::Quadrilateral;
                set_extent_dimensions(surf);
            }
        }
        _ => {
            surf.shape = SurfaceShape::Polygonal;
            set_extent_dimensions(surf);
            // Bounding extents overstate irregular polygons; fall back to
            // square-equivalent dimensions when they disagree with the area.
            let extent_area = surf.width * surf.height;
            if extent_area > 0.0
                && ((surf.gross_area - extent_area) / surf.gross_area).abs() > AREA_EXTENT_TOL
            {
                let aspect = surf.width / surf.height;
                surf.width = (surf.gross_area * aspect).sqrt();
                surf.height = (surf.gross_area / aspect).sqrt();
            }
        }
    }
}

/// Width/height as maximum extents along the local x/y axes.
fn set_extent_dimensions(surf: &mut Surface) {
    let angles = azimuth_and_tilt(&surf.vertices, &surf.outward_normal);
    let mut min_x = f64::MAX;
    let mut max_x = f64::MIN;
    let mut min_y = f64::MAX;
    let mut max_y = f64::MIN;
    for p in surf.vertices.iter() {
        let x = angles.lcs_x.dot(&p.coords);
        let y = angles.lcs_y.dot(&p.coords);
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    surf.width = max_x - min_x;
    surf.height = max_y - min_y;
}

fn classify_subsurface_shape(sub: &mut Surface, base: &Surface) {
    match sub.class {
        SurfaceClass::Overhang | SurfaceClass::Fin | SurfaceClass::AttachedShading => {
            // A device sharing the base's tilt stands like a fin; a
            // different tilt means it projects over the opening.
            let fin = (sub.tilt_deg - base.tilt_deg).abs() <= 1.0;
            sub.shape = if fin {
                // A left fin's normal is rotated +90 deg from the base
                // azimuth, a right fin's -90 deg
                let d = (sub.azimuth_deg - base.azimuth_deg).rem_euclid(360.0);
                if d < 180.0 {
                    SurfaceShape::RectangularLeftFin
                } else {
                    SurfaceShape::RectangularRightFin
                }
            } else {
                SurfaceShape::RectangularOverhang
            };
            set_extent_dimensions(sub);
        }
        SurfaceClass::Door if sub.vertices.len() == 3 => {
            sub.shape = SurfaceShape::TriangularDoor;
            set_extent_dimensions(sub);
        }
        _ if sub.vertices.len() == 3 => {
            sub.shape = SurfaceShape::TriangularWindow;
            set_extent_dimensions(sub);
        }
        _ => {
            sub.shape = SurfaceShape::RectangularDoorWindow;
            if is_rectangle(&sub.vertices) {
                sub.width = (sub.vertices[2] - sub.vertices[1]).norm();
                sub.height = (sub.vertices[0] - sub.vertices[1]).norm();
            } else {
                set_extent_dimensions(sub);
            }
        }
    }
}

/// Signed perpendicular distance from the subsurface's second vertex to the
/// base surface's plane, snapped to exactly zero when negligible.
fn compute_reveal(sub: &mut Surface, base: &Surface) {
    if sub.vertices.len() < 2 || base.vertices.is_empty() {
        return;
    }
    let plane = Plane {
        normal: base.outward_normal,
        offset: -base.outward_normal.dot(&base.vertices[0].coords),
    };
    let mut reveal = plane.signed_distance(&sub.vertices[1]);
    if reveal.abs() < REVEAL_SNAP_TOL {
        reveal = 0.0;
    }
    sub.reveal = reveal;
}

/// Equivalent-rectangle transform for 4-sided non-rectangular openings.
///
/// Preserves the true area while deriving an aspect ratio from the maximum
/// projected extents in the base surface's local frame. The resulting
/// dimensions size convective flow paths only and must never be used for
/// area or shadowing.
fn make_equivalent_rectangle(sub: &mut Surface, base: &Surface) {
    let Some(frame) = base.local_frame else {
        return;
    };
    let mut max_w = 0.0_f64;
    let mut max_h = 0.0_f64;
    let n = sub.vertices.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let d = sub.vertices[j] - sub.vertices[i];
            max_w = max_w.max(frame.axis_x.dot(&d).abs());
            max_h = max_h.max(frame.axis_y.dot(&d).abs());
        }
    }
    if max_w <= 0.0 || max_h <= 0.0 {
        return;
    }
    let aspect = max_w / max_h;
    sub.eff_width = (sub.gross_area * aspect).sqrt();
    sub.eff_height = (sub.gross_area / aspect).sqrt();
}

/// Subtracts frame area from the base surface and divider area from the
/// glazing, deriving the projected correction fractions consumed by
/// convection calculations.
pub fn apply_frame_divider(
    sub: &mut Surface,
    base: &mut Surface,
    fd: &FrameDividerDef,
    diag: &mut Diagnostics,
) {
    let w = sub.eff_width.max(sub.width);
    let h = sub.eff_height.max(sub.height);
    if w <= 0.0 || h <= 0.0 {
        return;
    }

    if fd.frame_width > 0.0 {
        let frame_area = (w + 2.0 * fd.frame_width) * (h + 2.0 * fd.frame_width) - w * h;
        base.net_area -= frame_area;
        if base.net_area <= 0.0 {
            diag.severe(
                Code::FrameAreaExceedsBase,
                Some(sub.name.clone()),
                format!(
                    "frame area {:.3} m2 leaves base surface '{}' with non-positive area",
                    frame_area, base.name
                ),
            );
        }
        sub.frame_projection = frame_area / (w * h);
    }

    if fd.divider_width > 0.0 {
        let nh = fd.horizontal_dividers as f64;
        let nv = fd.vertical_dividers as f64;
        let divider_area =
            fd.divider_width * (nh * w + nv * h) - nh * nv * fd.divider_width * fd.divider_width;
        sub.glazed_area = sub.gross_area - divider_area;
        if sub.glazed_area <= 0.0 {
            diag.severe(
                Code::DividerAreaExceedsGlazing,
                Some(sub.name.clone()),
                format!("divider area {divider_area:.3} m2 leaves no glazed area"),
            );
        }
        sub.divider_projection = divider_area / (w * h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use zonegeom_model::SurfaceId;

    fn ctx() -> GeometryContext {
        GeometryContext::default()
    }

    fn south_wall(name: &str) -> Surface {
        let mut s = Surface::new(name, SurfaceClass::Wall);
        s.vertices = [
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 3.0),
        ]
        .into_iter()
        .collect();
        s
    }

    #[test]
    fn wall_geometry_is_finalized() {
        let mut s = south_wall("wall-s");
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);

        assert!(s.vertices_processed);
        assert_eq!(s.shape, SurfaceShape::Rectangle);
        assert_relative_eq!(s.gross_area, 30.0, epsilon = 1e-9);
        assert_relative_eq!(s.azimuth_deg, 180.0, epsilon = 1e-9);
        assert_relative_eq!(s.tilt_deg, 90.0, epsilon = 1e-9);
        assert_relative_eq!(s.width, 10.0, epsilon = 1e-9);
        assert_relative_eq!(s.height, 3.0, epsilon = 1e-9);
        assert_relative_eq!(s.perimeter, 26.0, epsilon = 1e-9);
        assert_relative_eq!(s.view_factor_sky, 0.5, epsilon = 1e-9);
        assert!(s.local_frame.is_some());
        assert!(!d.should_halt());
    }

    #[test]
    fn upside_down_floor_is_reversed() {
        let mut s = Surface::new("floor", SurfaceClass::Floor);
        // Wound so the normal faces up, wrong for a floor
        s.vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
        .into_iter()
        .collect();
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);

        assert_relative_eq!(s.outward_normal.z, -1.0, epsilon = 1e-9);
        assert_relative_eq!(s.tilt_deg, 180.0, epsilon = 1e-9);
        assert_eq!(d.count(Code::UpsideDownSurfaceFixed), 1);
        // Tilt is now exactly as expected, no plausibility warning
        assert_eq!(d.count(Code::ImplausibleTiltAfterFix), 0);
    }

    #[test]
    fn coincident_vertices_are_dropped() {
        let mut s = south_wall("wall-dup");
        s.vertices.insert(2, Point3::new(0.0, 0.0, 0.005));
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);

        assert_eq!(s.vertices.len(), 4);
        assert_eq!(d.count(Code::CoincidentVerticesRemoved), 1);
        assert_relative_eq!(s.gross_area, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn collinear_vertices_counted_separately() {
        let mut s = south_wall("wall-mid");
        // Mid-edge point on the sill, collinear but nowhere near coincident
        s.vertices.insert(2, Point3::new(5.0, 0.0, 0.0));
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);

        assert_eq!(s.vertices.len(), 4);
        assert_eq!(d.count(Code::CollinearVerticesRemoved), 1);
        assert_eq!(d.count(Code::CoincidentVerticesRemoved), 0);
        assert_relative_eq!(s.gross_area, 30.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_loop_is_counted_not_fatal() {
        let mut s = Surface::new("sliver", SurfaceClass::Wall);
        s.vertices = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.001, 0.0, 0.0),
            Point3::new(0.002, 0.0, 0.0),
        ]
        .into_iter()
        .collect();
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);
        assert!(s.is_degenerate);
        assert!(d.count(Code::DegenerateSurface) > 0);
    }

    #[test]
    fn nonplanar_quad_warns_within_tolerance() {
        let mut s = south_wall("warped");
        s.vertices[3].y += 0.008; // within the 1 cm warning band
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);
        assert_eq!(d.count(Code::NonPlanarSurface), 1);
        assert!(!d.should_halt());
    }

    #[test]
    fn nonplanar_quad_is_severe_beyond_tolerance() {
        let mut s = south_wall("badly-warped");
        s.vertices[3].y += 0.5;
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx(), &mut d);
        assert!(d.should_halt());
    }

    #[test]
    fn window_reveal_and_equivalent_rectangle() {
        let mut base = south_wall("wall");
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut base, &ctx(), &mut d);

        // Non-rectangular 4-sided window, inset 0.1 m into the wall
        let mut win = Surface::new("win", SurfaceClass::Window);
        win.base_surface = SurfaceId::new(0);
        win.vertices = [
            Point3::new(2.0, 0.1, 2.0),
            Point3::new(2.2, 0.1, 1.0),
            Point3::new(4.0, 0.1, 1.0),
            Point3::new(4.0, 0.1, 2.0),
        ]
        .into_iter()
        .collect();
        process_subsurface(&mut win, &base, &ctx(), &mut d);

        assert_eq!(win.shape, SurfaceShape::RectangularDoorWindow);
        // Base normal is -Y; a window at y=0.1 sits 0.1 m behind the plane
        assert_relative_eq!(win.reveal, -0.1, epsilon = 1e-9);
        // Equivalent rectangle preserves the true area
        assert_relative_eq!(
            win.eff_width * win.eff_height,
            win.gross_area,
            max_relative = 1e-6
        );
        // Aspect matches the projected extents (2.0 wide, 1.0 tall)
        assert_relative_eq!(win.eff_width / win.eff_height, 2.0, max_relative = 0.01);
    }

    #[test]
    fn frame_subtracts_from_base_and_divider_from_glazing() {
        let mut base = south_wall("wall");
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut base, &ctx(), &mut d);

        let mut win = Surface::new("win", SurfaceClass::Window);
        win.vertices = [
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 2.0),
        ]
        .into_iter()
        .collect();
        process_subsurface(&mut win, &base, &ctx(), &mut d);
        let before_net = base.net_area;

        let fd = FrameDividerDef {
            frame_width: 0.05,
            divider_width: 0.02,
            horizontal_dividers: 1,
            vertical_dividers: 1,
        };
        apply_frame_divider(&mut win, &mut base, &fd, &mut d);

        assert!(base.net_area < before_net);
        assert!(win.glazed_area < win.gross_area);
        assert!(win.frame_projection > 0.0);
        assert!(win.divider_projection > 0.0);
        assert!(!d.should_halt());
    }

    #[test]
    fn oversized_frame_is_severe() {
        let mut base = south_wall("wall");
        let mut d = Diagnostics::new(false);
        process_base_surface(&mut base, &ctx(), &mut d);
        base.net_area = 0.1;

        let mut win = Surface::new("win", SurfaceClass::Window);
        win.vertices = [
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 1.0),
            Point3::new(4.0, 0.0, 2.0),
        ]
        .into_iter()
        .collect();
        process_subsurface(&mut win, &base, &ctx(), &mut d);

        let fd = FrameDividerDef {
            frame_width: 0.2,
            divider_width: 0.0,
            horizontal_dividers: 0,
            vertical_dividers: 0,
        };
        apply_frame_divider(&mut win, &mut base, &fd, &mut d);
        assert!(d.should_halt());
    }
}
