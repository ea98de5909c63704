// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone volume and derived zone geometry.
//!
//! Each zone's base heat-transfer surfaces form a candidate polyhedron.
//! When the polyhedron is watertight (every undirected edge shared by
//! exactly two faces, after a collinear-vertex repair pass), the volume is
//! the exact signed tetrahedral decomposition. Otherwise a ladder of
//! geometric fallbacks approximates it, ending at a hard 10 m3 safety
//! default so no zone ever carries a zero or negative volume.
//!
//! Zones are independent; the per-zone work runs in parallel and the
//! resulting findings are applied to the diagnostics collector in zone
//! order afterwards.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use zonegeom_geometry::tolerances::{ON_SEGMENT_TOL, SAME_POINT_TOL};
use zonegeom_geometry::{point_on_segment, same_point};
use zonegeom_model::{
    Code, Diagnostics, Severity, Surface, SurfaceArena, SurfaceClass, Zone,
};

/// Volume assigned when every calculation path fails.
const DEFAULT_VOLUME: f64 = 10.0;

/// Relative disagreement between user-entered and calculated zone values
/// beyond this fraction draws a warning. The user value always wins.
const USER_VALUE_TOL: f64 = 0.05;

/// Tilt bands for the extrusion fallbacks, degrees.
const HORIZONTAL_TILT_TOL_DEG: f64 = 1.0;
const VERTICAL_TILT_TOL_DEG: f64 = 1.0;

/// Relative area tolerance for matched floor/ceiling and opposite-wall
/// fallbacks.
const FALLBACK_AREA_TOL: f64 = 0.02;

/// Computes volume, floor/ceiling areas, ceiling height, bounding box,
/// centroid, and enclosure status for every zone.
pub fn compute_zone_geometry(arena: &SurfaceArena, zones: &mut [Zone], diag: &mut Diagnostics) {
    let metrics: Vec<ZoneMetrics> = zones
        .par_iter()
        .map(|zone| compute_zone(arena, zone))
        .collect();

    for (zone, m) in zones.iter_mut().zip(metrics) {
        zone.volume = m.volume;
        zone.floor_area = m.floor_area;
        zone.ceiling_area = m.ceiling_area;
        zone.ceiling_height = m.ceiling_height;
        zone.is_enclosed = m.is_enclosed;
        zone.min = m.min;
        zone.max = m.max;
        zone.centroid = m.centroid;
        for f in m.findings {
            match f.severity {
                Severity::Warning => diag.warn(f.code, Some(zone.name.clone()), f.message),
                Severity::Severe => diag.severe(f.code, Some(zone.name.clone()), f.message),
                Severity::Fatal => diag.fatal(f.code, Some(zone.name.clone()), f.message),
            }
        }
    }
}

struct Finding {
    severity: Severity,
    code: Code,
    message: String,
}

struct ZoneMetrics {
    volume: f64,
    floor_area: f64,
    ceiling_area: f64,
    ceiling_height: f64,
    is_enclosed: bool,
    min: Point3<f64>,
    max: Point3<f64>,
    centroid: Point3<f64>,
    findings: Vec<Finding>,
}

fn compute_zone(arena: &SurfaceArena, zone: &Zone) -> ZoneMetrics {
    let mut findings = Vec::new();

    let faces: Vec<&Surface> = zone
        .all_surfaces
        .iter()
        .map(|id| arena.get(id))
        .filter(|s| s.class.is_base_heat_transfer() && !s.is_degenerate && s.vertices.len() >= 3)
        .collect();

    let floors: Vec<&Surface> = faces
        .iter()
        .copied()
        .filter(|s| s.class == SurfaceClass::Floor)
        .collect();
    let ceilings: Vec<&Surface> = faces
        .iter()
        .copied()
        .filter(|s| s.class == SurfaceClass::Roof)
        .collect();
    let walls: Vec<&Surface> = faces
        .iter()
        .copied()
        .filter(|s| s.class == SurfaceClass::Wall)
        .collect();

    let floor_area: f64 = floors.iter().map(|s| s.gross_area).sum();
    let ceiling_area: f64 = ceilings.iter().map(|s| s.gross_area).sum();

    let (min, max, centroid) = bounds_and_centroid(&faces);

    let poly = Polyhedron::build(&faces);
    let mut is_enclosed = poly.is_watertight();
    let mut volume = 0.0;
    if is_enclosed {
        volume = poly.volume().abs();
    } else if !poly.faces.is_empty() {
        // Mismatched edges are often an artifact of one face carrying a
        // vertex mid-edge of its neighbor; inserting collinear pool points
        // into every face heals that case exactly.
        let before = poly.failing_edges();
        let patched = poly.patched();
        if patched.is_watertight() {
            is_enclosed = true;
            volume = patched.volume().abs();
        } else {
            let after = patched.failing_edges();
            let still: Vec<_> = before.iter().filter(|e| after.contains(e)).collect();
            findings.push(Finding {
                severity: Severity::Warning,
                code: Code::ZoneNotEnclosed,
                message: format!(
                    "zone polyhedron is not watertight: {} mismatched edges ({} before repair); \
                     volume falls back to an approximation",
                    still.len(),
                    before.len()
                ),
            });
        }
    }

    if !is_enclosed || volume <= 0.0 {
        volume = fallback_volume(
            zone,
            &floors,
            &ceilings,
            &walls,
            floor_area,
            ceiling_area,
            &mut findings,
        );
    }

    // User-entered values always win; a noticeable disagreement with the
    // calculation is still worth reporting.
    if let Some(user) = zone.volume_user {
        if user > 0.0 {
            if volume > 0.0 && (user - volume).abs() / volume > USER_VALUE_TOL {
                findings.push(Finding {
                    severity: Severity::Warning,
                    code: Code::ZoneVolumeMismatch,
                    message: format!(
                        "entered volume {user:.2} m3 differs from calculated {volume:.2} m3"
                    ),
                });
            }
            volume = user;
        }
    }

    let mut floor_area = floor_area;
    if let Some(user) = zone.floor_area_user {
        if user > 0.0 {
            if floor_area > 0.0 && (user - floor_area).abs() / floor_area > USER_VALUE_TOL {
                findings.push(Finding {
                    severity: Severity::Warning,
                    code: Code::ZoneFloorAreaMismatch,
                    message: format!(
                        "entered floor area {user:.2} m2 differs from calculated {floor_area:.2} m2"
                    ),
                });
            }
            floor_area = user;
        }
    }

    let mut ceiling_height = wall_height(&walls);
    if ceiling_height <= 0.0 && floor_area > 0.0 {
        ceiling_height = volume / floor_area;
    }
    if let Some(user) = zone.ceiling_height_user {
        if user > 0.0 {
            if ceiling_height > 0.0 && (user - ceiling_height).abs() / ceiling_height > USER_VALUE_TOL
            {
                findings.push(Finding {
                    severity: Severity::Warning,
                    code: Code::ZoneCeilingHeightMismatch,
                    message: format!(
                        "entered ceiling height {user:.2} m differs from calculated {ceiling_height:.2} m"
                    ),
                });
            }
            ceiling_height = user;
        }
    }

    ZoneMetrics {
        volume,
        floor_area,
        ceiling_area,
        ceiling_height,
        is_enclosed,
        min,
        max,
        centroid,
        findings,
    }
}

/// Bounding box over the face vertices and the area-weighted centroid of
/// the face set.
fn bounds_and_centroid(faces: &[&Surface]) -> (Point3<f64>, Point3<f64>, Point3<f64>) {
    let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
    let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
    let mut weighted = Vector3::zeros();
    let mut total_area = 0.0;
    for s in faces {
        for p in s.vertices.iter() {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        weighted += s.centroid.coords * s.gross_area;
        total_area += s.gross_area;
    }
    let centroid = if total_area > 0.0 {
        Point3::from(weighted / total_area)
    } else {
        Point3::origin()
    };
    if faces.is_empty() {
        min = Point3::origin();
        max = Point3::origin();
    }
    (min, max, centroid)
}

/// Area-weighted average vertical extent of the zone's walls.
fn wall_height(walls: &[&Surface]) -> f64 {
    let mut weighted = 0.0;
    let mut total = 0.0;
    for w in walls {
        let extent = vertical_extent(w);
        weighted += extent * w.gross_area;
        total += w.gross_area;
    }
    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

fn vertical_extent(s: &Surface) -> f64 {
    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for p in s.vertices.iter() {
        lo = lo.min(p.z);
        hi = hi.max(p.z);
    }
    if hi > lo {
        hi - lo
    } else {
        0.0
    }
}

/// The approximation ladder for non-watertight zones, tried in fixed
/// priority order.
fn fallback_volume(
    zone: &Zone,
    floors: &[&Surface],
    ceilings: &[&Surface],
    walls: &[&Surface],
    floor_area: f64,
    ceiling_area: f64,
    findings: &mut Vec<Finding>,
) -> f64 {
    if let Some(v) = congruent_footprint_volume(floors, ceilings, floor_area) {
        return v;
    }
    if let Some(v) = extrusion_volume(floors, walls, floor_area, 180.0) {
        return v;
    }
    if let Some(v) = extrusion_volume(ceilings, walls, ceiling_area, 0.0) {
        return v;
    }
    if let Some(v) = opposite_wall_volume(walls) {
        return v;
    }
    if let Some(user) = zone.volume_user {
        if user > 0.0 {
            return user;
        }
    }
    findings.push(Finding {
        severity: Severity::Warning,
        code: Code::ZoneVolumeDefaulted,
        message: format!("volume could not be calculated; defaulting to {DEFAULT_VOLUME} m3"),
    });
    DEFAULT_VOLUME
}

/// Floor and ceiling with matching XY footprints: footprint area times the
/// height between their mean elevations.
fn congruent_footprint_volume(
    floors: &[&Surface],
    ceilings: &[&Surface],
    floor_area: f64,
) -> Option<f64> {
    if floors.is_empty() || ceilings.is_empty() || floor_area <= 0.0 {
        return None;
    }
    let ceiling_area: f64 = ceilings.iter().map(|s| s.gross_area).sum();
    if (floor_area - ceiling_area).abs() / floor_area.max(ceiling_area) > FALLBACK_AREA_TOL {
        return None;
    }

    let floor_pts: Vec<Point3<f64>> = floors
        .iter()
        .flat_map(|s| s.vertices.iter().copied())
        .collect();
    let ceil_pts: Vec<Point3<f64>> = ceilings
        .iter()
        .flat_map(|s| s.vertices.iter().copied())
        .collect();
    let xy_match = |a: &[Point3<f64>], b: &[Point3<f64>]| {
        a.iter().all(|p| {
            b.iter().any(|q| {
                same_point(
                    &Point3::new(p.x, p.y, 0.0),
                    &Point3::new(q.x, q.y, 0.0),
                    SAME_POINT_TOL,
                )
            })
        })
    };
    if !xy_match(&floor_pts, &ceil_pts) || !xy_match(&ceil_pts, &floor_pts) {
        return None;
    }

    let mean_z = |pts: &[Point3<f64>]| pts.iter().map(|p| p.z).sum::<f64>() / pts.len() as f64;
    let height = mean_z(&ceil_pts) - mean_z(&floor_pts);
    (height > 0.0).then(|| floor_area * height)
}

/// Horizontal floor (or ceiling) extruded along vertical walls of a single
/// shared height.
fn extrusion_volume(
    horizontals: &[&Surface],
    walls: &[&Surface],
    area: f64,
    expected_tilt_deg: f64,
) -> Option<f64> {
    if horizontals.is_empty() || walls.is_empty() || area <= 0.0 {
        return None;
    }
    if !horizontals
        .iter()
        .all(|s| (s.tilt_deg - expected_tilt_deg).abs() <= HORIZONTAL_TILT_TOL_DEG)
    {
        return None;
    }
    if !walls
        .iter()
        .all(|s| (s.tilt_deg - 90.0).abs() <= VERTICAL_TILT_TOL_DEG)
    {
        return None;
    }
    let h0 = vertical_extent(walls[0]);
    if h0 <= 0.0 {
        return None;
    }
    if !walls
        .iter()
        .all(|s| (vertical_extent(s) - h0).abs() <= SAME_POINT_TOL)
    {
        return None;
    }
    Some(area * h0)
}

/// Two opposite walls of matching area whose corners pair up exactly under
/// reversed winding: wall area times the distance between them.
fn opposite_wall_volume(walls: &[&Surface]) -> Option<f64> {
    for (i, a) in walls.iter().enumerate() {
        for b in walls.iter().skip(i + 1) {
            let az_diff = (a.azimuth_deg - b.azimuth_deg).abs();
            let opposite = (az_diff - 180.0).abs() <= 1.0;
            if !opposite {
                continue;
            }
            let max_area = a.gross_area.max(b.gross_area);
            if max_area <= 0.0
                || (a.gross_area - b.gross_area).abs() / max_area > FALLBACK_AREA_TOL
            {
                continue;
            }
            if let Some(d) = paired_wall_distance(a, b) {
                if d > 0.0 {
                    return Some(0.5 * (a.gross_area + b.gross_area) * d);
                }
            }
        }
    }
    None
}

/// The common corner-to-corner distance between two walls whose vertex
/// loops correspond under reversed winding; `None` for unequal vertex
/// counts or skewed/offset pairs.
fn paired_wall_distance(a: &Surface, b: &Surface) -> Option<f64> {
    let n = a.vertices.len();
    if n != b.vertices.len() {
        return None;
    }
    let rev: Vec<Point3<f64>> = b.vertices.iter().rev().copied().collect();
    for off in 0..n {
        let d0 = (rev[off] - a.vertices[0]).norm();
        if (0..n).all(|k| {
            ((rev[(off + k) % n] - a.vertices[k]).norm() - d0).abs() <= SAME_POINT_TOL
        }) {
            return Some(d0);
        }
    }
    None
}

/// Deduplicated vertex pool plus index faces for one zone.
struct Polyhedron {
    points: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
}

impl Polyhedron {
    fn build(surfaces: &[&Surface]) -> Self {
        let mut points: Vec<Point3<f64>> = Vec::new();
        let mut faces = Vec::with_capacity(surfaces.len());
        for s in surfaces {
            let mut face = Vec::with_capacity(s.vertices.len());
            for p in s.vertices.iter() {
                let idx = points
                    .iter()
                    .position(|q| same_point(q, p, SAME_POINT_TOL))
                    .unwrap_or_else(|| {
                        points.push(*p);
                        points.len() - 1
                    });
                // Pool collapse can merge consecutive vertices
                if face.last() != Some(&idx) {
                    face.push(idx);
                }
            }
            if face.len() > 2 && face.first() == face.last() {
                face.pop();
            }
            if face.len() >= 3 {
                faces.push(face);
            }
        }
        Self { points, faces }
    }

    fn edge_census(&self) -> FxHashMap<(usize, usize), u32> {
        let mut census = FxHashMap::default();
        for face in &self.faces {
            for (k, &a) in face.iter().enumerate() {
                let b = face[(k + 1) % face.len()];
                let key = (a.min(b), a.max(b));
                *census.entry(key).or_insert(0) += 1;
            }
        }
        census
    }

    /// Every undirected edge must be shared by exactly two faces.
    fn is_watertight(&self) -> bool {
        !self.faces.is_empty() && self.edge_census().values().all(|&n| n == 2)
    }

    fn failing_edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .edge_census()
            .into_iter()
            .filter(|&(_, n)| n != 2)
            .map(|(e, _)| e)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Inserts pool points that lie mid-edge on a face's boundary, ordered
    /// along the edge, so T-junction faces pair up edge-for-edge.
    fn patched(&self) -> Self {
        let faces = self
            .faces
            .iter()
            .map(|face| {
                let mut out = Vec::with_capacity(face.len());
                for (k, &ia) in face.iter().enumerate() {
                    let ib = face[(k + 1) % face.len()];
                    out.push(ia);
                    let a = self.points[ia];
                    let b = self.points[ib];
                    let mut inserts: Vec<(f64, usize)> = self
                        .points
                        .iter()
                        .enumerate()
                        .filter(|(ip, p)| {
                            *ip != ia
                                && *ip != ib
                                && !face.contains(ip)
                                && point_on_segment(p, &a, &b, ON_SEGMENT_TOL)
                        })
                        .map(|(ip, p)| ((p - a).norm(), ip))
                        .collect();
                    inserts.sort_by(|x, y| x.0.total_cmp(&y.0));
                    out.extend(inserts.into_iter().map(|(_, ip)| ip));
                }
                out
            })
            .collect();
        Self {
            points: self.points.clone(),
            faces,
        }
    }

    /// Signed tetrahedral decomposition: each face fans into triangles with
    /// the origin as the shared apex. Outward-wound faces sum to the true
    /// volume.
    fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for face in &self.faces {
            let p0 = self.points[face[0]].coords;
            for k in 1..face.len() - 1 {
                let p1 = self.points[face[k]].coords;
                let p2 = self.points[face[k + 1]].coords;
                six_v += p0.dot(&p1.cross(&p2));
            }
        }
        six_v / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use zonegeom_model::{Diagnostics, GeometryContext, SurfaceId, ZoneId};

    use crate::processor::process_base_surface;

    fn face(name: &str, class: SurfaceClass, verts: Vec<Point3<f64>>) -> Surface {
        let mut s = Surface::new(name, class);
        s.vertices = verts.into_iter().collect();
        let ctx = GeometryContext::default();
        let mut diag = Diagnostics::new(false);
        process_base_surface(&mut s, &ctx, &mut diag);
        s
    }

    /// 10 x 8 x 3 box, outward-wound.
    fn box_faces() -> Vec<Surface> {
        vec![
            face(
                "wall-s",
                SurfaceClass::Wall,
                vec![
                    Point3::new(0.0, 0.0, 3.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 3.0),
                ],
            ),
            face(
                "wall-e",
                SurfaceClass::Wall,
                vec![
                    Point3::new(10.0, 0.0, 3.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(10.0, 8.0, 3.0),
                ],
            ),
            face(
                "wall-n",
                SurfaceClass::Wall,
                vec![
                    Point3::new(10.0, 8.0, 3.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(0.0, 8.0, 3.0),
                ],
            ),
            face(
                "wall-w",
                SurfaceClass::Wall,
                vec![
                    Point3::new(0.0, 8.0, 3.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, 3.0),
                ],
            ),
            face(
                "floor",
                SurfaceClass::Floor,
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                ],
            ),
            face(
                "roof",
                SurfaceClass::Roof,
                vec![
                    Point3::new(0.0, 0.0, 3.0),
                    Point3::new(10.0, 0.0, 3.0),
                    Point3::new(10.0, 8.0, 3.0),
                    Point3::new(0.0, 8.0, 3.0),
                ],
            ),
        ]
    }

    fn zone_with(faces: Vec<Surface>) -> (SurfaceArena, Vec<Zone>) {
        let mut arena = SurfaceArena::new();
        let mut zone = Zone::new("main", ZoneId::new(0));
        for (i, mut s) in faces.into_iter().enumerate() {
            s.zone = Some(zone.id);
            arena.push(s);
            zone.all_surfaces.push(SurfaceId::new(i));
            zone.heat_transfer_surfaces.push(SurfaceId::new(i));
        }
        (arena, vec![zone])
    }

    #[test]
    fn box_volume_is_exact() {
        let (arena, mut zones) = zone_with(box_faces());
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        let z = &zones[0];
        assert!(z.is_enclosed);
        assert_relative_eq!(z.volume, 240.0, epsilon = 1e-9);
        assert_relative_eq!(z.floor_area, 80.0, epsilon = 1e-9);
        assert_relative_eq!(z.ceiling_area, 80.0, epsilon = 1e-9);
        assert_relative_eq!(z.ceiling_height, 3.0, epsilon = 1e-9);
        assert_relative_eq!(z.centroid.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(z.centroid.y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(z.centroid.z, 1.5, epsilon = 1e-9);
        assert_eq!(z.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(z.max, Point3::new(10.0, 8.0, 3.0));
        assert!(!diag.should_halt());
        assert_eq!(diag.count(Code::ZoneNotEnclosed), 0);
    }

    #[test]
    fn missing_wall_falls_back_to_footprint() {
        let mut faces = box_faces();
        faces.remove(1); // drop the east wall
        let (arena, mut zones) = zone_with(faces);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        let z = &zones[0];
        assert!(!z.is_enclosed);
        assert_eq!(diag.count(Code::ZoneNotEnclosed), 1);
        // Matching floor/ceiling footprints still give the true volume
        assert_relative_eq!(z.volume, 240.0, epsilon = 1e-9);
        assert!(!diag.should_halt());
    }

    #[test]
    fn split_wall_is_healed_by_collinear_insertion() {
        let mut faces = box_faces();
        faces.remove(0);
        // South wall entered as two 5 m halves; the floor and roof edges
        // span the full 10 m, leaving T-junctions until repair
        faces.push(face(
            "wall-s1",
            SurfaceClass::Wall,
            vec![
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(5.0, 0.0, 3.0),
            ],
        ));
        faces.push(face(
            "wall-s2",
            SurfaceClass::Wall,
            vec![
                Point3::new(5.0, 0.0, 3.0),
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 3.0),
            ],
        ));
        let (arena, mut zones) = zone_with(faces);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        let z = &zones[0];
        assert!(z.is_enclosed);
        assert_relative_eq!(z.volume, 240.0, epsilon = 1e-9);
        assert_eq!(diag.count(Code::ZoneNotEnclosed), 0);
    }

    #[test]
    fn user_volume_wins_with_mismatch_warning() {
        let (arena, mut zones) = zone_with(box_faces());
        zones[0].volume_user = Some(300.0);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        assert_relative_eq!(zones[0].volume, 300.0, epsilon = 1e-12);
        assert_eq!(diag.count(Code::ZoneVolumeMismatch), 1);
        assert!(!diag.should_halt());
    }

    #[test]
    fn close_user_volume_is_accepted_silently() {
        let (arena, mut zones) = zone_with(box_faces());
        zones[0].volume_user = Some(242.0); // within 5% of 240
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        assert_relative_eq!(zones[0].volume, 242.0, epsilon = 1e-12);
        assert_eq!(diag.count(Code::ZoneVolumeMismatch), 0);
    }

    #[test]
    fn surfaceless_zone_gets_safety_default() {
        let (arena, mut zones) = zone_with(vec![]);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        assert_relative_eq!(zones[0].volume, DEFAULT_VOLUME, epsilon = 1e-12);
        assert_eq!(diag.count(Code::ZoneVolumeDefaulted), 1);
        assert!(!zones[0].is_enclosed);
    }

    #[test]
    fn aligned_opposite_walls_give_prism_volume() {
        // Only the south and north walls: no footprint or extrusion data,
        // but the corners correspond under reversed winding, 8 m apart
        let b = box_faces();
        let (arena, mut zones) = zone_with(vec![b[0].clone(), b[2].clone()]);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        let z = &zones[0];
        assert!(!z.is_enclosed);
        assert_relative_eq!(z.volume, 0.5 * (30.0 + 30.0) * 8.0, epsilon = 1e-9);
        assert_eq!(diag.count(Code::ZoneVolumeDefaulted), 0);
    }

    #[test]
    fn offset_opposite_walls_fall_back_to_default() {
        // Same areas and facing azimuths, but shifted 2 m sideways: the
        // corners no longer pair up at a common distance
        let faces = vec![
            face(
                "wall-s",
                SurfaceClass::Wall,
                vec![
                    Point3::new(0.0, 0.0, 3.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 3.0),
                ],
            ),
            face(
                "wall-n",
                SurfaceClass::Wall,
                vec![
                    Point3::new(12.0, 8.0, 3.0),
                    Point3::new(12.0, 8.0, 0.0),
                    Point3::new(2.0, 8.0, 0.0),
                    Point3::new(2.0, 8.0, 3.0),
                ],
            ),
        ];
        let (arena, mut zones) = zone_with(faces);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        assert_relative_eq!(zones[0].volume, DEFAULT_VOLUME, epsilon = 1e-12);
        assert_eq!(diag.count(Code::ZoneVolumeDefaulted), 1);
    }

    #[test]
    fn paired_distance_requires_matching_corner_counts() {
        let mut a = Surface::new("a", SurfaceClass::Wall);
        a.vertices = [
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 3.0),
        ]
        .into_iter()
        .collect();
        let mut b = Surface::new("b", SurfaceClass::Wall);
        b.vertices = [
            Point3::new(10.0, 8.0, 3.0),
            Point3::new(10.0, 8.0, 0.0),
            Point3::new(5.0, 8.0, -0.5),
            Point3::new(0.0, 8.0, 0.0),
            Point3::new(0.0, 8.0, 3.0),
        ]
        .into_iter()
        .collect();
        assert!(paired_wall_distance(&a, &b).is_none());

        b.vertices = [
            Point3::new(10.0, 8.0, 3.0),
            Point3::new(10.0, 8.0, 0.0),
            Point3::new(0.0, 8.0, 0.0),
            Point3::new(0.0, 8.0, 3.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(paired_wall_distance(&a, &b), Some(8.0));
    }

    #[test]
    fn unsealed_top_keeps_its_failing_edges_through_repair() {
        // Box without its roof: the four rim edges each belong to one wall,
        // and no collinear insertion can close the opening
        let faces = box_faces();
        let open: Vec<&Surface> = faces.iter().take(5).collect();
        let poly = Polyhedron::build(&open);
        assert!(!poly.is_watertight());

        let before = poly.failing_edges();
        assert_eq!(before.len(), 4);

        let patched = poly.patched();
        assert!(!patched.is_watertight());
        let after = patched.failing_edges();
        let still: Vec<_> = before.iter().filter(|e| after.contains(e)).collect();
        assert_eq!(still.len(), 4);
    }

    #[test]
    fn sloped_roof_volume_is_exact() {
        // Wedge: 10 x 8 footprint, roof rising from z=3 at y=0 to z=5 at y=8
        let faces = vec![
            face(
                "wall-s",
                SurfaceClass::Wall,
                vec![
                    Point3::new(0.0, 0.0, 3.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 0.0, 3.0),
                ],
            ),
            face(
                "wall-e",
                SurfaceClass::Wall,
                vec![
                    Point3::new(10.0, 0.0, 3.0),
                    Point3::new(10.0, 0.0, 0.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(10.0, 8.0, 5.0),
                ],
            ),
            face(
                "wall-n",
                SurfaceClass::Wall,
                vec![
                    Point3::new(10.0, 8.0, 5.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(0.0, 8.0, 5.0),
                ],
            ),
            face(
                "wall-w",
                SurfaceClass::Wall,
                vec![
                    Point3::new(0.0, 8.0, 5.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, 3.0),
                ],
            ),
            face(
                "floor",
                SurfaceClass::Floor,
                vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 8.0, 0.0),
                    Point3::new(10.0, 8.0, 0.0),
                    Point3::new(10.0, 0.0, 0.0),
                ],
            ),
            face(
                "roof",
                SurfaceClass::Roof,
                vec![
                    Point3::new(0.0, 0.0, 3.0),
                    Point3::new(10.0, 0.0, 3.0),
                    Point3::new(10.0, 8.0, 5.0),
                    Point3::new(0.0, 8.0, 5.0),
                ],
            ),
        ];
        let (arena, mut zones) = zone_with(faces);
        let mut diag = Diagnostics::new(false);
        compute_zone_geometry(&arena, &mut zones, &mut diag);

        let z = &zones[0];
        assert!(z.is_enclosed);
        // Prism: 80 m2 footprint, average height 4 m
        assert_relative_eq!(z.volume, 320.0, epsilon = 1e-9);
    }
}
