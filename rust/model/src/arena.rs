// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push-only surface arena and the finished model bundle.

use nalgebra::Point3;
use rustc_hash::FxHashMap;

use crate::enclosure::Enclosure;
use crate::ids::SurfaceId;
use crate::surface::Surface;
use crate::zone::Zone;

/// Owns all surfaces. Indices are dense, stable, and never relocated once
/// assigned; reordering builds a fresh arena through a permutation instead
/// of moving entries.
#[derive(Debug, Default)]
pub struct SurfaceArena {
    surfaces: Vec<Surface>,
    by_name: FxHashMap<String, SurfaceId>,
}

impl SurfaceArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            surfaces: Vec::with_capacity(n),
            by_name: FxHashMap::default(),
        }
    }

    /// Appends a base surface, returning its permanent id. The record is
    /// always its own base; attached records go through
    /// [`push_with_base`](Self::push_with_base).
    pub fn push(&mut self, mut surface: Surface) -> SurfaceId {
        let id = SurfaceId::new(self.surfaces.len());
        surface.base_surface = id;
        self.by_name.insert(surface.name.clone(), id);
        self.surfaces.push(surface);
        id
    }

    /// Appends a subsurface or attached device, wiring its base link in the
    /// same operation so no record ever carries a dangling base id.
    pub fn push_with_base(&mut self, mut surface: Surface, base: SurfaceId) -> SurfaceId {
        let id = SurfaceId::new(self.surfaces.len());
        surface.base_surface = base;
        self.by_name.insert(surface.name.clone(), id);
        self.surfaces.push(surface);
        id
    }

    pub fn get(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.index()]
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> &mut Surface {
        &mut self.surfaces[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<SurfaceId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> {
        (0..self.surfaces.len()).map(SurfaceId::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(i, s)| (SurfaceId::new(i), s))
    }

    /// Mutable access to two distinct surfaces at once (interzone pairing
    /// touches both sides).
    pub fn get_pair_mut(&mut self, a: SurfaceId, b: SurfaceId) -> (&mut Surface, &mut Surface) {
        assert_ne!(a, b, "pair access requires distinct surfaces");
        let (ia, ib) = (a.index(), b.index());
        if ia < ib {
            let (lo, hi) = self.surfaces.split_at_mut(ib);
            (&mut lo[ia], &mut hi[0])
        } else {
            let (lo, hi) = self.surfaces.split_at_mut(ia);
            (&mut hi[0], &mut lo[ib])
        }
    }
}

/// The finished geometric model handed to thermal/solar/daylighting
/// collaborators.
#[derive(Debug)]
pub struct SurfaceModel {
    /// Surfaces in canonical order (shading first, then per-zone hierarchy).
    pub surfaces: SurfaceArena,
    pub zones: Vec<Zone>,
    /// Legacy report order: original input order with subsurfaces
    /// immediately following their base surface. Output formatting only.
    pub report_order: Vec<SurfaceId>,
    pub radiant_enclosures: Vec<Enclosure>,
    pub solar_enclosures: Vec<Enclosure>,
}

impl SurfaceModel {
    /// Axis-aligned bounding box of every vertex in the model, shading
    /// surfaces included (zone bounds cover only zone-owned surfaces).
    /// `None` when no surface carries vertices.
    pub fn extent(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut bounds: Option<(Point3<f64>, Point3<f64>)> = None;
        for (_, s) in self.surfaces.iter() {
            for p in &s.vertices {
                let (min, max) = bounds.get_or_insert((*p, *p));
                for k in 0..3 {
                    min[k] = min[k].min(p[k]);
                    max[k] = max[k].max(p[k]);
                }
            }
        }
        bounds
    }
}
