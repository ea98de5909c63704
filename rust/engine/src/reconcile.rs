// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface collection and reconciliation.
//!
//! Collects raw definitions into an input-order arena (normalizing vertex
//! conventions and processing each surface as it lands), synthesizes the
//! missing half of zone-shorthand interzone pairs, resolves and validates
//! all pairings, and finally rebuilds the arena in the canonical order that
//! makes per-zone surface ranges contiguous.
//!
//! Surfaces are processed strictly base-before-subsurface; the coordinate
//! transformer turns any violation into a fatal error rather than a bad
//! local frame.

use nalgebra::Point3;
use rustc_hash::{FxHashMap, FxHashSet};
use zonegeom_model::{
    BoundaryCondition, Code, ConstructionId, ConstructionRegistry, Diagnostics, GeometryContext,
    LocalFrame, StartingCorner, Surface, SurfaceArena, SurfaceClass, SurfaceId, Winding, Zone,
    ZoneId,
};

use crate::error::{Error, Result};
use crate::input::{BoundaryDef, FinSideDef, GeometryDef, GeometryInput, OverhangDef};
use crate::processor::{apply_frame_divider, process_base_surface, process_subsurface};
use crate::transform::{
    from_base_frame, rectangle_vertices, require_frame, to_world, to_world_site,
};

/// Relative interzone area mismatch beyond this fraction draws a warning.
const INTERZONE_AREA_TOL: f64 = 0.02;

/// Interzone tilts must sum to 180 degrees within this band.
const INTERZONE_TILT_TOL_DEG: f64 = 1.0;

/// Nominal-U disagreement beyond this marks an interzone construction
/// mismatch as materially significant (severe instead of a warning).
const NOMINAL_U_TOL: f64 = 0.001;

/// Reconciled surfaces, zones with populated ranges, and the legacy
/// report order.
#[derive(Debug)]
pub struct ReconcileOutput {
    pub surfaces: SurfaceArena,
    pub zones: Vec<Zone>,
    pub report_order: Vec<SurfaceId>,
}

/// Runs the full collection/reconciliation sequence over one input set.
pub fn reconcile(
    ctx: &GeometryContext,
    input: &GeometryInput,
    constructions: &ConstructionRegistry,
    diag: &mut Diagnostics,
) -> Result<ReconcileOutput> {
    let (mut zones, zone_ids) = build_zones(ctx, input, diag);

    let cap = input.surfaces.len() * 2
        + input.subsurfaces.len() * 2
        + (input.shading.len() + input.overhangs.len() + input.fins.len() * 2) * 2
        + input.internal_mass.len();
    let mut arena = SurfaceArena::with_capacity(cap);

    collect_detached_shading(ctx, input, &mut arena, diag);
    collect_base_surfaces(ctx, input, constructions, &zones, &zone_ids, &mut arena, diag)?;
    collect_subsurfaces(ctx, input, constructions, &zones, &mut arena, diag)?;
    collect_attached_shading(ctx, input, &zones, &mut arena, diag)?;
    collect_overhangs_and_fins(ctx, input, &mut arena, diag)?;
    collect_internal_mass(input, constructions, &zone_ids, &mut arena)?;

    synthesize_interzone(ctx, &zone_ids, &mut arena, diag)?;
    resolve_pairings(&mut arena, diag);
    validate_interzone(&arena, &zones, constructions, diag);
    clear_interior_exposures(&mut arena, diag);
    validate_air_boundaries(&arena, diag);

    let order = canonical_order(&arena, &zones);
    if order.len() != arena.len() {
        diag.severe(
            Code::SurfaceCountMismatch,
            None,
            format!(
                "canonical ordering covered {} of {} surfaces",
                order.len(),
                arena.len()
            ),
        );
    }
    let mut map = vec![0u32; arena.len()];
    for (new_index, old) in order.iter().enumerate() {
        map[old.index()] = new_index as u32;
    }
    let report_order = report_order(&arena, &map);
    let mut arena = apply_order(arena, &order, &map);

    compute_ranges(&arena, &mut zones, diag);
    mark_obstructions(&mut arena);

    debug_assert!(
        arena.iter().all(|(_, s)| !s.boundary.is_transient()),
        "transient boundary conditions survived reconciliation"
    );

    Ok(ReconcileOutput {
        surfaces: arena,
        zones,
        report_order,
    })
}

fn build_zones(
    ctx: &GeometryContext,
    input: &GeometryInput,
    diag: &mut Diagnostics,
) -> (Vec<Zone>, FxHashMap<String, ZoneId>) {
    let mut zones = Vec::with_capacity(input.zones.len());
    let mut ids = FxHashMap::default();
    for (i, def) in input.zones.iter().enumerate() {
        let id = ZoneId::new(i);
        let mut zone = Zone::new(&def.name, id);
        zone.relative_north_deg = def.relative_north_deg;
        zone.origin = def.origin;
        zone.multiplier = def.multiplier.max(1);
        zone.volume_user = def.volume;
        zone.floor_area_user = def.floor_area;
        zone.ceiling_height_user = def.ceiling_height;

        if ctx.world_coordinates
            && (def.relative_north_deg != 0.0 || def.origin != Point3::origin())
        {
            diag.warn(
                Code::IgnoredZoneTransforms,
                Some(def.name.clone()),
                "zone origin/north are ignored in world-coordinate input mode",
            );
        }

        ids.insert(def.name.clone(), id);
        zones.push(zone);
    }
    (zones, ids)
}

/// Reorders an input vertex loop into the canonical upper-left-start
/// counterclockwise convention.
fn normalize_loop(ctx: &GeometryContext, mut v: Vec<Point3<f64>>) -> Vec<Point3<f64>> {
    if v.len() < 3 {
        return v;
    }
    if ctx.winding == Winding::Clockwise {
        v[1..].reverse();
    }
    let shift = match ctx.starting_corner {
        StartingCorner::UpperLeft => 0,
        StartingCorner::LowerLeft => 1,
        StartingCorner::LowerRight => 2,
        StartingCorner::UpperRight => 3,
    };
    let shift = shift % v.len();
    if shift > 0 {
        v.rotate_right(shift);
    }
    v
}

fn resolve_construction(
    registry: &ConstructionRegistry,
    name: &str,
    surface: &str,
) -> Result<ConstructionId> {
    registry.find(name).ok_or_else(|| Error::ConstructionMissing {
        surface: surface.to_string(),
        construction: name.to_string(),
    })
}

fn collect_detached_shading(
    ctx: &GeometryContext,
    input: &GeometryInput,
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) {
    if !ctx.solar_distribution.processes_detached_shading() {
        return;
    }
    for def in &input.shading {
        let site_fixed = match def.class {
            SurfaceClass::DetachedShadingFixed => true,
            SurfaceClass::DetachedShadingBuilding => false,
            _ => continue,
        };
        let mut s = Surface::new(&def.name, def.class);
        let raw = match &def.geometry {
            GeometryDef::Detailed(v) => normalize_loop(ctx, v.clone()),
            GeometryDef::Rectangular {
                azimuth_deg,
                tilt_deg,
                origin,
                length,
                height,
            } => rectangle_vertices(*azimuth_deg, *tilt_deg, origin, *length, *height),
        };
        s.vertices = raw
            .iter()
            .map(|p| {
                if site_fixed {
                    to_world_site(ctx, p)
                } else {
                    to_world(ctx, None, p)
                }
            })
            .collect();
        let id = arena.push(s);
        process_base_surface(arena.get_mut(id), ctx, diag);
        maybe_mirror(ctx, arena, id, diag);
    }
}

fn collect_base_surfaces(
    ctx: &GeometryContext,
    input: &GeometryInput,
    constructions: &ConstructionRegistry,
    zones: &[Zone],
    zone_ids: &FxHashMap<String, ZoneId>,
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) -> Result<()> {
    for def in &input.surfaces {
        let zone_id = *zone_ids.get(&def.zone).ok_or_else(|| Error::ZoneMissing {
            surface: def.name.clone(),
            zone: def.zone.clone(),
        })?;
        let construction = resolve_construction(constructions, &def.construction, &def.name)?;

        let mut s = Surface::new(&def.name, def.class);
        s.zone = Some(zone_id);
        s.construction = Some(construction);
        s.is_air_boundary = constructions.get(construction).is_air_boundary;
        s.sun_exposed = def.sun_exposed;
        s.wind_exposed = def.wind_exposed;
        s.boundary = match &def.boundary {
            BoundaryDef::Outdoors => BoundaryCondition::ExteriorEnvironment,
            BoundaryDef::Ground => BoundaryCondition::Ground,
            BoundaryDef::GroundFcFactor => BoundaryCondition::GroundFcFactor,
            BoundaryDef::OtherSideCoefNoCalc(i) => BoundaryCondition::OtherSideCoefNoCalc(*i),
            BoundaryDef::OtherSideCoefCalc(i) => BoundaryCondition::OtherSideCoefCalc(*i),
            BoundaryDef::OtherSideConditionsModel(i) => {
                BoundaryCondition::OtherSideConditionsModel(*i)
            }
            BoundaryDef::KivaFoundation(i) => BoundaryCondition::KivaFoundation(*i),
            BoundaryDef::Surface(n) => BoundaryCondition::UnresolvedSurface(n.clone()),
            BoundaryDef::Zone(z) => BoundaryCondition::UnenteredAdjacentZone(z.clone()),
            BoundaryDef::Blank => {
                diag.warn(
                    Code::BlankBoundaryDefaulted,
                    Some(def.name.clone()),
                    "blank exterior boundary condition; defaulting to adiabatic",
                );
                BoundaryCondition::UnresolvedSurface(def.name.clone())
            }
        };

        let zone = &zones[zone_id.index()];
        let raw = match &def.geometry {
            GeometryDef::Detailed(v) => normalize_loop(ctx, v.clone()),
            GeometryDef::Rectangular {
                azimuth_deg,
                tilt_deg,
                origin,
                length,
                height,
            } => rectangle_vertices(*azimuth_deg, *tilt_deg, origin, *length, *height),
        };
        s.vertices = raw.iter().map(|p| to_world(ctx, Some(zone), p)).collect();

        let id = arena.push(s);
        process_base_surface(arena.get_mut(id), ctx, diag);
    }
    Ok(())
}

fn collect_subsurfaces(
    ctx: &GeometryContext,
    input: &GeometryInput,
    constructions: &ConstructionRegistry,
    zones: &[Zone],
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) -> Result<()> {
    for def in &input.subsurfaces {
        if !def.class.is_subsurface() {
            diag.severe(
                Code::SubsurfaceClassIllegal,
                Some(def.name.clone()),
                format!("class {} is not a legal subsurface class", def.class),
            );
            continue;
        }
        let base_id = arena
            .find(&def.base_surface)
            .ok_or_else(|| Error::BaseSurfaceMissing {
                subsurface: def.name.clone(),
                base: def.base_surface.clone(),
            })?;
        let construction = resolve_construction(constructions, &def.construction, &def.name)?;

        let (zone_id, inherited_boundary, frame) = {
            let base = arena.get(base_id);
            (
                base.zone,
                base.boundary.clone(),
                require_frame(base, &def.name)?,
            )
        };

        let mut s = Surface::new(&def.name, def.class);
        s.zone = zone_id;
        s.construction = Some(construction);
        s.multiplier = def.multiplier.max(1);
        s.boundary = match &def.boundary_surface {
            Some(n) => BoundaryCondition::UnresolvedSurface(n.clone()),
            None => inherited_boundary,
        };
        s.vertices = match &def.geometry {
            GeometryDef::Detailed(v) => {
                let zone = zone_id.map(|z| &zones[z.index()]);
                normalize_loop(ctx, v.clone())
                    .iter()
                    .map(|p| to_world(ctx, zone, p))
                    .collect()
            }
            GeometryDef::Rectangular {
                origin,
                length,
                height,
                ..
            } => opening_rectangle(&frame, origin, *length, *height),
        };

        let id = arena.push_with_base(s, base_id);
        let (sub, base) = arena.get_pair_mut(id, base_id);
        process_subsurface(sub, base, ctx, diag);
        base.subsurface_count += 1;
        if !sub.is_degenerate {
            base.net_area -= base_area_deduction(sub);
            if base.net_area <= 0.0 {
                diag.severe(
                    Code::NegativeOrZeroArea,
                    Some(base.name.clone()),
                    format!("subsurface '{}' leaves base with non-positive net area", sub.name),
                );
            }
        }
        if let Some(fd) = &def.frame_divider {
            let (sub, base) = arena.get_pair_mut(id, base_id);
            apply_frame_divider(sub, base, fd, diag);
        }
    }
    Ok(())
}

/// What a subsurface takes out of its base surface's net area: windows and
/// glass doors subtract their per-instance share (area over multiplier);
/// opaque doors and TDD components subtract their full area.
fn base_area_deduction(sub: &Surface) -> f64 {
    if sub.class.is_window_like() {
        sub.gross_area / f64::from(sub.multiplier.max(1))
    } else {
        sub.gross_area
    }
}

/// A parameterized opening in its base surface's frame, lower-left origin,
/// emitted in the canonical vertex order.
fn opening_rectangle(
    frame: &LocalFrame,
    origin: &Point3<f64>,
    length: f64,
    height: f64,
) -> zonegeom_model::surface::VertexLoop {
    let ul = Point3::new(origin.x, origin.y + height, 0.0);
    let ll = Point3::new(origin.x, origin.y, 0.0);
    let lr = Point3::new(origin.x + length, origin.y, 0.0);
    let ur = Point3::new(origin.x + length, origin.y + height, 0.0);
    [ul, ll, lr, ur]
        .iter()
        .map(|p| from_base_frame(frame, p))
        .collect()
}

fn collect_attached_shading(
    ctx: &GeometryContext,
    input: &GeometryInput,
    zones: &[Zone],
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) -> Result<()> {
    for def in &input.shading {
        if def.class != SurfaceClass::AttachedShading {
            continue;
        }
        let base_name = def.base_surface.as_deref().unwrap_or_default();
        let base_id = arena.find(base_name).ok_or_else(|| Error::BaseSurfaceMissing {
            subsurface: def.name.clone(),
            base: base_name.to_string(),
        })?;
        let zone_id = arena.get(base_id).zone;
        let zone = zone_id.map(|z| &zones[z.index()]);

        let mut s = Surface::new(&def.name, def.class);
        s.zone = zone_id;
        let raw = match &def.geometry {
            GeometryDef::Detailed(v) => normalize_loop(ctx, v.clone()),
            GeometryDef::Rectangular {
                azimuth_deg,
                tilt_deg,
                origin,
                length,
                height,
            } => rectangle_vertices(*azimuth_deg, *tilt_deg, origin, *length, *height),
        };
        s.vertices = raw.iter().map(|p| to_world(ctx, zone, p)).collect();

        let id = arena.push_with_base(s, base_id);
        let (sub, base) = arena.get_pair_mut(id, base_id);
        process_subsurface(sub, base, ctx, diag);
        maybe_mirror(ctx, arena, id, diag);
    }
    Ok(())
}

fn collect_overhangs_and_fins(
    ctx: &GeometryContext,
    input: &GeometryInput,
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) -> Result<()> {
    for def in &input.overhangs {
        let (base_id, frame, extent) = window_frame(arena, &def.name, &def.window)?;
        let verts = overhang_vertices(def, &frame, extent);
        push_device(ctx, arena, diag, &def.name, SurfaceClass::Overhang, base_id, verts);
    }
    for def in &input.fins {
        let (base_id, frame, extent) = window_frame(arena, &def.name, &def.window)?;
        if let Some(side) = &def.left {
            let verts = fin_vertices(side, &frame, extent, true);
            let name = format!("{} Left Fin", def.name);
            push_device(ctx, arena, diag, &name, SurfaceClass::Fin, base_id, verts);
        }
        if let Some(side) = &def.right {
            let verts = fin_vertices(side, &frame, extent, false);
            let name = format!("{} Right Fin", def.name);
            push_device(ctx, arena, diag, &name, SurfaceClass::Fin, base_id, verts);
        }
    }
    Ok(())
}

/// Window extent in its base surface's local frame: (min_x, max_x, min_y,
/// max_y).
type Extent = (f64, f64, f64, f64);

fn window_frame(
    arena: &SurfaceArena,
    device: &str,
    window: &str,
) -> Result<(SurfaceId, LocalFrame, Extent)> {
    let win_id = arena.find(window).ok_or_else(|| Error::BaseSurfaceMissing {
        subsurface: device.to_string(),
        base: window.to_string(),
    })?;
    let win = arena.get(win_id);
    let base_id = win.base_surface;
    let frame = require_frame(arena.get(base_id), device)?;

    let mut extent = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for p in win.vertices.iter() {
        let d = *p - frame.origin;
        let x = frame.axis_x.dot(&d);
        let y = frame.axis_y.dot(&d);
        extent.0 = extent.0.min(x);
        extent.1 = extent.1.max(x);
        extent.2 = extent.2.min(y);
        extent.3 = extent.3.max(y);
    }
    Ok((base_id, frame, extent))
}

fn overhang_vertices(def: &OverhangDef, frame: &LocalFrame, extent: Extent) -> Vec<Point3<f64>> {
    let (min_x, max_x, _, max_y) = extent;
    let t = def.tilt_from_window_deg.to_radians();
    let dir = frame.axis_y * t.cos() + frame.axis_z * t.sin();
    let y = max_y + def.height_above_window;
    let near_l = from_base_frame(frame, &Point3::new(min_x - def.left_extension, y, 0.0));
    let near_r = from_base_frame(frame, &Point3::new(max_x + def.right_extension, y, 0.0));
    let far_l = near_l + dir * def.depth;
    let far_r = near_r + dir * def.depth;
    // Wound so the outward normal faces downward toward the opening
    vec![near_l, near_r, far_r, far_l]
}

fn fin_vertices(
    side: &FinSideDef,
    frame: &LocalFrame,
    extent: Extent,
    left: bool,
) -> Vec<Point3<f64>> {
    let (min_x, max_x, min_y, max_y) = extent;
    let x = if left {
        min_x - side.extension
    } else {
        max_x + side.extension
    };
    let y_top = max_y + side.distance_above;
    let y_bot = min_y - side.distance_below;
    let corners = if left {
        [
            Point3::new(x, y_top, 0.0),
            Point3::new(x, y_bot, 0.0),
            Point3::new(x, y_bot, side.depth),
            Point3::new(x, y_top, side.depth),
        ]
    } else {
        [
            Point3::new(x, y_top, side.depth),
            Point3::new(x, y_bot, side.depth),
            Point3::new(x, y_bot, 0.0),
            Point3::new(x, y_top, 0.0),
        ]
    };
    corners.iter().map(|p| from_base_frame(frame, p)).collect()
}

fn push_device(
    ctx: &GeometryContext,
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
    name: &str,
    class: SurfaceClass,
    base_id: SurfaceId,
    verts: Vec<Point3<f64>>,
) {
    let mut s = Surface::new(name, class);
    s.zone = arena.get(base_id).zone;
    s.vertices = verts.into_iter().collect();
    let id = arena.push_with_base(s, base_id);
    let (sub, base) = arena.get_pair_mut(id, base_id);
    process_subsurface(sub, base, ctx, diag);
    maybe_mirror(ctx, arena, id, diag);
}

fn collect_internal_mass(
    input: &GeometryInput,
    constructions: &ConstructionRegistry,
    zone_ids: &FxHashMap<String, ZoneId>,
    arena: &mut SurfaceArena,
) -> Result<()> {
    for def in &input.internal_mass {
        let zone_id = *zone_ids.get(&def.zone).ok_or_else(|| Error::ZoneMissing {
            surface: def.name.clone(),
            zone: def.zone.clone(),
        })?;
        let construction = resolve_construction(constructions, &def.construction, &def.name)?;

        let mut s = Surface::new(&def.name, SurfaceClass::InternalMass);
        s.zone = Some(zone_id);
        s.construction = Some(construction);
        s.gross_area = def.area;
        s.net_area = def.area;
        s.vertices_processed = true;
        let id = arena.push(s);
        arena.get_mut(id).boundary = BoundaryCondition::Adjacent(id);
    }
    Ok(())
}

/// Adds a reversed mirror copy of a shading surface when the run asks for
/// two-sided shading.
fn maybe_mirror(
    ctx: &GeometryContext,
    arena: &mut SurfaceArena,
    id: SurfaceId,
    diag: &mut Diagnostics,
) {
    if !ctx.mirror_shading {
        return;
    }
    let orig = arena.get(id);
    if !orig.class.is_shading() {
        return;
    }
    let mut m = orig.clone();
    m.name = format!("Mir-{}", orig.name);
    m.vertices.reverse();
    m.mirrored_of = Some(id);
    m.vertices_processed = false;
    m.local_frame = None;
    let base = m.base_surface;
    let mid = arena.push_with_base(m, base);
    process_base_surface(arena.get_mut(mid), ctx, diag);
}

/// Flip for the synthesized side of a zone-shorthand pair: the mirror of a
/// floor is the ceiling of the zone below, and vice versa.
fn flip_class(class: SurfaceClass) -> SurfaceClass {
    match class {
        SurfaceClass::Floor => SurfaceClass::Roof,
        SurfaceClass::Roof => SurfaceClass::Floor,
        other => other,
    }
}

/// Creates the missing half of every zone-shorthand interzone pair: a
/// reversed-winding copy in the named zone, linked both ways, with mirrored
/// copies of any subsurfaces.
fn synthesize_interzone(
    ctx: &GeometryContext,
    zone_ids: &FxHashMap<String, ZoneId>,
    arena: &mut SurfaceArena,
    diag: &mut Diagnostics,
) -> Result<()> {
    let pending: Vec<(SurfaceId, String)> = arena
        .iter()
        .filter_map(|(id, s)| match &s.boundary {
            BoundaryCondition::UnenteredAdjacentZone(z) if s.is_base(id) => {
                Some((id, z.clone()))
            }
            _ => None,
        })
        .collect();

    for (base_id, zone_name) in pending {
        let zone_id = *zone_ids.get(&zone_name).ok_or_else(|| Error::ZoneMissing {
            surface: arena.get(base_id).name.clone(),
            zone: zone_name.clone(),
        })?;
        let children: Vec<SurfaceId> = arena
            .iter()
            .filter(|(cid, c)| c.base_surface == base_id && *cid != base_id)
            .map(|(cid, _)| cid)
            .collect();

        let src = arena.get(base_id);
        let mut m = Surface::new(format!("iz-{}", src.name), flip_class(src.class));
        m.zone = Some(zone_id);
        m.construction = src.construction;
        m.is_air_boundary = src.is_air_boundary;
        m.multiplier = src.multiplier;
        m.boundary = BoundaryCondition::Adjacent(base_id);
        m.vertices = src.vertices.iter().rev().copied().collect();
        let mid = arena.push(m);
        process_base_surface(arena.get_mut(mid), ctx, diag);
        arena.get_mut(base_id).boundary = BoundaryCondition::Adjacent(mid);

        for cid in children {
            let csrc = arena.get(cid);
            let mut cm = Surface::new(format!("iz-{}", csrc.name), csrc.class);
            cm.zone = Some(zone_id);
            cm.construction = csrc.construction;
            cm.multiplier = csrc.multiplier;
            cm.boundary = BoundaryCondition::Adjacent(cid);
            cm.vertices = csrc.vertices.iter().rev().copied().collect();
            let cmid = arena.push_with_base(cm, mid);
            let (sub, base) = arena.get_pair_mut(cmid, mid);
            process_subsurface(sub, base, ctx, diag);
            base.subsurface_count += 1;
            if !sub.is_degenerate {
                base.net_area -= base_area_deduction(sub);
                if base.net_area <= 0.0 {
                    diag.severe(
                        Code::NegativeOrZeroArea,
                        Some(base.name.clone()),
                        format!(
                            "mirrored subsurface '{}' leaves base with non-positive net area",
                            sub.name
                        ),
                    );
                }
            }
            arena.get_mut(cid).boundary = BoundaryCondition::Adjacent(cmid);
        }
    }
    Ok(())
}

/// Turns every remaining by-name pairing into an id link. A surface naming
/// itself is adiabatic; a dangling name degrades to adiabatic with a severe
/// finding so the transient state never survives.
fn resolve_pairings(arena: &mut SurfaceArena, diag: &mut Diagnostics) {
    for id in arena.ids().collect::<Vec<_>>() {
        let name = match &arena.get(id).boundary {
            BoundaryCondition::UnresolvedSurface(n) => n.clone(),
            _ => continue,
        };
        let target = if name == arena.get(id).name {
            Some(id)
        } else {
            arena.find(&name)
        };
        match target {
            Some(t) => arena.get_mut(id).boundary = BoundaryCondition::Adjacent(t),
            None => {
                diag.severe(
                    Code::BaseSurfaceMissing,
                    Some(arena.get(id).name.clone()),
                    format!("paired surface '{name}' not found; treating as adiabatic"),
                );
                arena.get_mut(id).boundary = BoundaryCondition::Adjacent(id);
            }
        }
    }
}

fn classes_pair(a: SurfaceClass, b: SurfaceClass) -> bool {
    use SurfaceClass::*;
    matches!(
        (a, b),
        (Wall, Wall)
            | (Floor, Roof)
            | (Roof, Floor)
            | (Window, Window)
            | (GlassDoor, GlassDoor)
            | (Door, Door)
            | (TddDiffuser, TddDiffuser)
            | (TddDome, TddDome)
    )
}

/// Cross-checks both sides of every resolved interzone pair: reciprocity,
/// zone distinctness, construction reversal, area, tilt, and class pairing.
fn validate_interzone(
    arena: &SurfaceArena,
    zones: &[Zone],
    constructions: &ConstructionRegistry,
    diag: &mut Diagnostics,
) {
    let mut warned_pairs: FxHashSet<(usize, usize)> = FxHashSet::default();

    for (id, a) in arena.iter() {
        let other = match a.boundary {
            BoundaryCondition::Adjacent(o) if o != id => o,
            _ => continue,
        };
        let b = arena.get(other);

        // Subsurfaces with an inherited boundary legitimately point at the
        // partner base surface; cross-checks only apply between peers.
        if a.class.is_subsurface() != b.class.is_subsurface() {
            continue;
        }

        // Reciprocity runs from both sides, so a one-sided pairing is
        // caught no matter which side carries the higher index.
        if b.boundary != BoundaryCondition::Adjacent(id) {
            diag.severe(
                Code::InterzoneNotReciprocal,
                Some(a.name.clone()),
                format!("paired surface '{}' does not point back", b.name),
            );
            continue;
        }

        // The symmetric pair checks below run once per pair.
        if other < id {
            continue;
        }

        if a.zone.is_some() && a.zone == b.zone {
            diag.warn(
                Code::InterzoneSameZone,
                Some(a.name.clone()),
                format!("interzone pair with '{}' connects a zone to itself", b.name),
            );
        }

        if let (Some(ca), Some(cb)) = (a.construction, b.construction) {
            let (_, reversed) = constructions.compare_reversed(ca, cb);
            if !reversed {
                let du = (constructions.get(ca).nominal_u - constructions.get(cb).nominal_u).abs();
                if du > NOMINAL_U_TOL {
                    // Materially different constructions on the two sides
                    diag.severe(
                        Code::InterzoneConstructionMismatch,
                        Some(a.name.clone()),
                        format!(
                            "constructions '{}' and '{}' do not mirror and nominal U differs by {du:.4} W/m2-K",
                            constructions.get(ca).name,
                            constructions.get(cb).name
                        ),
                    );
                } else {
                    let key = (ca.index().min(cb.index()), ca.index().max(cb.index()));
                    if warned_pairs.insert(key) {
                        diag.warn(
                            Code::InterzoneConstructionNotReversed,
                            Some(a.name.clone()),
                            format!(
                                "construction '{}' is not the layer reversal of '{}'",
                                constructions.get(cb).name,
                                constructions.get(ca).name
                            ),
                        );
                    }
                }
            }
        }

        let mult = |s: &Surface| {
            s.zone
                .map(|z| f64::from(zones[z.index()].multiplier))
                .unwrap_or(1.0)
        };
        let area_a = a.gross_area * mult(a);
        let area_b = b.gross_area * mult(b);
        let max_area = area_a.max(area_b);
        if max_area > 0.0 && (area_a - area_b).abs() / max_area > INTERZONE_AREA_TOL {
            diag.warn(
                Code::InterzoneAreaMismatch,
                Some(a.name.clone()),
                format!(
                    "multiplied areas differ: {area_a:.3} m2 vs {area_b:.3} m2 on '{}'",
                    b.name
                ),
            );
        }

        if ((a.tilt_deg + b.tilt_deg) - 180.0).abs() > INTERZONE_TILT_TOL_DEG {
            diag.warn(
                Code::InterzoneTiltMismatch,
                Some(a.name.clone()),
                format!(
                    "tilts {:.1} and {:.1} deg do not face each other",
                    a.tilt_deg, b.tilt_deg
                ),
            );
        }

        if !classes_pair(a.class, b.class) {
            diag.warn(
                Code::InterzoneClassMismatch,
                Some(a.name.clone()),
                format!("{} paired with {} on '{}'", a.class, b.class, b.name),
            );
        }
    }
}

/// Sun/wind exposure is meaningless on surfaces that do not face the
/// outdoors; clear it rather than let downstream solar code consume it.
fn clear_interior_exposures(arena: &mut SurfaceArena, diag: &mut Diagnostics) {
    for id in arena.ids().collect::<Vec<_>>() {
        let s = arena.get_mut(id);
        if s.class.is_shading() || s.boundary.is_exterior() {
            continue;
        }
        if s.sun_exposed || s.wind_exposed {
            s.sun_exposed = false;
            s.wind_exposed = false;
            diag.warn(
                Code::ExposureCleared,
                Some(s.name.clone()),
                "sun/wind exposure cleared on non-exterior surface",
            );
        }
    }
}

fn validate_air_boundaries(arena: &SurfaceArena, diag: &mut Diagnostics) {
    for (id, s) in arena.iter() {
        if !s.is_air_boundary {
            continue;
        }
        match s.boundary {
            BoundaryCondition::Adjacent(o) if o != id => {}
            _ => diag.severe(
                Code::AirBoundaryNotInterzone,
                Some(s.name.clone()),
                "air-boundary construction requires an interzone pairing",
            ),
        }
    }
}

/// The canonical surface order: all shading first, grouped site-fixed,
/// then building, then attached (mirrors stay adjacent to their originals
/// since they share a class and arena order is stable); then per zone: air
/// boundaries, walls, floors, roofs, internal mass, doors, exterior then
/// interior windows/glass doors, TDD diffusers, TDD domes.
fn canonical_order(arena: &SurfaceArena, zones: &[Zone]) -> Vec<SurfaceId> {
    let mut order = Vec::with_capacity(arena.len());
    let mut shading: [Vec<SurfaceId>; 3] = Default::default();
    for (id, s) in arena.iter() {
        match s.class {
            SurfaceClass::DetachedShadingFixed => shading[0].push(id),
            SurfaceClass::DetachedShadingBuilding => shading[1].push(id),
            c if c.is_shading() => shading[2].push(id),
            _ => {}
        }
    }
    for group in shading {
        order.extend(group);
    }
    for zone in zones {
        let mut buckets: [Vec<SurfaceId>; 10] = Default::default();
        for (id, s) in arena.iter() {
            if s.class.is_shading() || s.zone != Some(zone.id) {
                continue;
            }
            let interior = matches!(s.boundary, BoundaryCondition::Adjacent(o) if o != id);
            let k = match s.class {
                SurfaceClass::Wall | SurfaceClass::Floor | SurfaceClass::Roof
                    if s.is_air_boundary =>
                {
                    0
                }
                SurfaceClass::Wall => 1,
                SurfaceClass::Floor => 2,
                SurfaceClass::Roof => 3,
                SurfaceClass::InternalMass => 4,
                SurfaceClass::Door => 5,
                SurfaceClass::Window | SurfaceClass::GlassDoor => {
                    if interior {
                        7
                    } else {
                        6
                    }
                }
                SurfaceClass::TddDiffuser => 8,
                SurfaceClass::TddDome => 9,
                _ => continue,
            };
            buckets[k].push(id);
        }
        for bucket in buckets {
            order.extend(bucket);
        }
    }
    order
}

/// Input order with each base surface immediately followed by its
/// subsurfaces, expressed in new (canonical) ids.
fn report_order(arena: &SurfaceArena, map: &[u32]) -> Vec<SurfaceId> {
    let mut children: FxHashMap<SurfaceId, Vec<SurfaceId>> = FxHashMap::default();
    for (id, s) in arena.iter() {
        if s.base_surface != id {
            children.entry(s.base_surface).or_default().push(id);
        }
    }
    let mut out = Vec::with_capacity(arena.len());
    for (id, s) in arena.iter() {
        if s.base_surface != id {
            continue;
        }
        out.push(SurfaceId::new(map[id.index()] as usize));
        if let Some(kids) = children.get(&id) {
            out.extend(kids.iter().map(|k| SurfaceId::new(map[k.index()] as usize)));
        }
    }
    out
}

/// Rebuilds the arena through the canonical permutation, remapping every
/// id-valued field. The input-order arena is consumed; ids in the result
/// are final.
fn apply_order(arena: SurfaceArena, order: &[SurfaceId], map: &[u32]) -> SurfaceArena {
    let mut out = SurfaceArena::with_capacity(order.len());
    for old in order {
        let mut s = arena.get(*old).clone();
        let base = SurfaceId::new(map[s.base_surface.index()] as usize);
        if let BoundaryCondition::Adjacent(o) = s.boundary {
            s.boundary = BoundaryCondition::Adjacent(SurfaceId::new(map[o.index()] as usize));
        }
        if let Some(mo) = s.mirrored_of {
            s.mirrored_of = Some(SurfaceId::new(map[mo.index()] as usize));
        }
        out.push_with_base(s, base);
    }
    out
}

/// Populates the contiguous per-zone ranges over the canonical order.
///
/// Air boundaries sit in the all-surfaces range but not the heat-transfer
/// range; internal mass alone does not make a zone viable.
fn compute_ranges(arena: &SurfaceArena, zones: &mut [Zone], diag: &mut Diagnostics) {
    let mut has_real_surface = vec![false; zones.len()];
    for (id, s) in arena.iter() {
        if s.class.is_shading() {
            continue;
        }
        let Some(z) = s.zone else { continue };
        let zone = &mut zones[z.index()];
        zone.all_surfaces.push(id);
        if s.heat_transfer && !s.is_air_boundary {
            zone.heat_transfer_surfaces.push(id);
        }
        if s.class != SurfaceClass::InternalMass {
            has_real_surface[z.index()] = true;
        }
        match s.class {
            SurfaceClass::Wall
            | SurfaceClass::Floor
            | SurfaceClass::Roof
            | SurfaceClass::InternalMass
            | SurfaceClass::Door => zone.opaque_surfaces.push(id),
            SurfaceClass::Window | SurfaceClass::GlassDoor | SurfaceClass::TddDiffuser => {
                zone.window_surfaces.push(id)
            }
            SurfaceClass::TddDome => zone.tdd_domes.push(id),
            _ => {}
        }
    }
    for (zone, has) in zones.iter().zip(has_real_surface) {
        if !has {
            diag.severe(
                Code::ZoneHasNoHeatTransferSurfaces,
                Some(zone.name.clone()),
                "zone has no surfaces other than internal mass",
            );
        }
    }
}

/// Flags the surfaces eligible to obstruct sun. Mirror copies are skipped
/// (the original already casts the shadow), as are air boundaries,
/// windows/doors (only the parent wall counts), and non-exterior surfaces
/// other than those facing an other-side-conditions model.
fn mark_obstructions(arena: &mut SurfaceArena) {
    for id in arena.ids().collect::<Vec<_>>() {
        let s = arena.get_mut(id);
        s.shadowing_obstruction = !s.is_degenerate
            && !s.is_air_boundary
            && s.mirrored_of.is_none()
            && (s.class.is_shading()
                || (s.class.is_base_heat_transfer()
                    && matches!(
                        s.boundary,
                        BoundaryCondition::ExteriorEnvironment
                            | BoundaryCondition::OtherSideConditionsModel(_)
                    )));
    }
}
