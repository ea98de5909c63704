// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Radiant and solar enclosure grouping.
//!
//! Zones joined by air-boundary surfaces exchange longwave radiation and
//! daylight as a single volume. A union-find over the interzone air
//! boundaries partitions the zones; every partition becomes one enclosure,
//! and zones untouched by any air boundary each form a singleton.

use zonegeom_model::{
    BoundaryCondition, Enclosure, EnclosureId, EnclosureKind, SurfaceArena, SurfaceClass, Zone,
};

/// Union-find with path compression over zone indices.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut walk = i;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // Lower index wins so enclosure numbering follows zone order
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Builds the radiant and solar enclosure lists and stamps each zone with
/// its enclosure ids.
///
/// Both passes share the same membership: an air boundary merges its two
/// zones for radiant exchange and for solar/daylight distribution alike.
/// Only the accumulated areas differ between the two kinds.
pub fn build_enclosures(
    arena: &SurfaceArena,
    zones: &mut [Zone],
) -> (Vec<Enclosure>, Vec<Enclosure>) {
    let mut sets = DisjointSets::new(zones.len());
    for (id, s) in arena.iter() {
        if !s.is_air_boundary {
            continue;
        }
        let BoundaryCondition::Adjacent(other) = s.boundary else {
            continue;
        };
        if other == id {
            continue;
        }
        if let (Some(za), Some(zb)) = (s.zone, arena.get(other).zone) {
            sets.union(za.index(), zb.index());
        }
    }

    // Compact roots into dense enclosure ids, in zone order
    let mut root_to_enclosure: Vec<Option<EnclosureId>> = vec![None; zones.len()];
    let mut radiant: Vec<Enclosure> = Vec::new();
    let mut solar: Vec<Enclosure> = Vec::new();
    for i in 0..zones.len() {
        let root = sets.find(i);
        let eid = match root_to_enclosure[root] {
            Some(eid) => eid,
            None => {
                let eid = EnclosureId::new(radiant.len());
                let name = format!("Enclosure {}", radiant.len() + 1);
                radiant.push(Enclosure::new(name.clone(), EnclosureKind::Radiant));
                solar.push(Enclosure::new(name, EnclosureKind::Solar));
                root_to_enclosure[root] = Some(eid);
                eid
            }
        };
        zones[i].radiant_enclosure = Some(eid);
        zones[i].solar_enclosure = Some(eid);
        radiant[eid.index()].zones.push(zones[i].id);
        solar[eid.index()].zones.push(zones[i].id);
        radiant[eid.index()].floor_area += zones[i].floor_area;
        solar[eid.index()].floor_area += zones[i].floor_area;
    }

    // Solar enclosures also track exterior window area and total surface
    // area for distribution fractions
    for (_, s) in arena.iter() {
        if s.class.is_shading() {
            continue;
        }
        let Some(z) = s.zone else { continue };
        let Some(eid) = zones[z.index()].solar_enclosure else {
            continue;
        };
        let enc = &mut solar[eid.index()];
        enc.total_surface_area += s.gross_area;
        if s.boundary.is_exterior()
            && matches!(s.class, SurfaceClass::Window | SurfaceClass::GlassDoor)
        {
            enc.ext_window_area += s.gross_area;
        }
    }

    // Single-zone enclosures keep the zone's own name for readability
    for enc in radiant.iter_mut().chain(solar.iter_mut()) {
        if enc.zones.len() == 1 {
            enc.name = zones[enc.zones[0].index()].name.clone();
        }
    }

    (radiant, solar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use zonegeom_model::{Surface, SurfaceId, ZoneId};

    fn zone(name: &str, i: usize, floor_area: f64) -> Zone {
        let mut z = Zone::new(name, ZoneId::new(i));
        z.floor_area = floor_area;
        z
    }

    fn ht_surface(name: &str, zone: usize, class: SurfaceClass, area: f64) -> Surface {
        let mut s = Surface::new(name, class);
        s.zone = Some(ZoneId::new(zone));
        s.gross_area = area;
        s
    }

    #[test]
    fn air_boundary_merges_two_zones() {
        let mut zones = vec![zone("a", 0, 20.0), zone("b", 1, 30.0), zone("c", 2, 10.0)];
        let mut arena = SurfaceArena::new();
        // Air boundary pair between zones a and b
        let mut ab1 = ht_surface("ab-1", 0, SurfaceClass::Wall, 12.0);
        ab1.is_air_boundary = true;
        ab1.boundary = BoundaryCondition::Adjacent(SurfaceId::new(1));
        let mut ab2 = ht_surface("ab-2", 1, SurfaceClass::Wall, 12.0);
        ab2.is_air_boundary = true;
        ab2.boundary = BoundaryCondition::Adjacent(SurfaceId::new(0));
        arena.push(ab1);
        arena.push(ab2);
        arena.push(ht_surface("c-wall", 2, SurfaceClass::Wall, 15.0));

        let (radiant, solar) = build_enclosures(&arena, &mut zones);

        assert_eq!(radiant.len(), 2);
        assert_eq!(solar.len(), 2);
        assert_eq!(radiant[0].zones, vec![ZoneId::new(0), ZoneId::new(1)]);
        assert_eq!(radiant[1].zones, vec![ZoneId::new(2)]);
        assert_relative_eq!(radiant[0].floor_area, 50.0, epsilon = 1e-12);

        assert_eq!(zones[0].radiant_enclosure, zones[1].radiant_enclosure);
        assert_ne!(zones[0].radiant_enclosure, zones[2].radiant_enclosure);
        assert_eq!(zones[0].solar_enclosure, zones[0].radiant_enclosure);

        // Singleton keeps its zone name; merged group gets a generated one
        assert_eq!(radiant[1].name, "c");
        assert_eq!(radiant[0].name, "Enclosure 1");
    }

    #[test]
    fn solar_enclosure_accumulates_window_and_total_areas() {
        let mut zones = vec![zone("a", 0, 20.0)];
        let mut arena = SurfaceArena::new();
        arena.push(ht_surface("wall", 0, SurfaceClass::Wall, 30.0));
        let mut win = ht_surface("win", 0, SurfaceClass::Window, 4.0);
        win.boundary = BoundaryCondition::ExteriorEnvironment;
        arena.push(win);
        let mut shade = Surface::new("panel", SurfaceClass::AttachedShading);
        shade.zone = Some(ZoneId::new(0));
        shade.gross_area = 99.0;
        arena.push(shade);

        let (_, solar) = build_enclosures(&arena, &mut zones);
        assert_eq!(solar.len(), 1);
        assert_relative_eq!(solar[0].total_surface_area, 34.0, epsilon = 1e-12);
        assert_relative_eq!(solar[0].ext_window_area, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn chained_air_boundaries_form_one_enclosure() {
        let mut zones = vec![zone("a", 0, 1.0), zone("b", 1, 1.0), zone("c", 2, 1.0)];
        let mut arena = SurfaceArena::new();
        for (i, (za, zb)) in [(0usize, 1usize), (1, 2)].iter().enumerate() {
            let base = i * 2;
            let mut s1 = ht_surface(&format!("ab-{za}-{zb}"), *za, SurfaceClass::Wall, 5.0);
            s1.is_air_boundary = true;
            s1.boundary = BoundaryCondition::Adjacent(SurfaceId::new(base + 1));
            let mut s2 = ht_surface(&format!("ab-{zb}-{za}"), *zb, SurfaceClass::Wall, 5.0);
            s2.is_air_boundary = true;
            s2.boundary = BoundaryCondition::Adjacent(SurfaceId::new(base));
            arena.push(s1);
            arena.push(s2);
        }

        let (radiant, _) = build_enclosures(&arena, &mut zones);
        assert_eq!(radiant.len(), 1);
        assert_eq!(radiant[0].zones.len(), 3);
    }
}
