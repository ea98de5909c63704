// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction interface records.
//!
//! The material/construction database is an external collaborator; this is
//! the thin slice of it that geometry reconciliation consults: layer names
//! for interzone reversal checks, nominal U for material significance, and
//! the air-boundary/window markers.

use rustc_hash::FxHashMap;

use crate::ids::ConstructionId;

/// The geometry-relevant view of a construction.
#[derive(Debug, Clone)]
pub struct Construction {
    pub name: String,
    /// Material layer names, outside to inside.
    pub layers: Vec<String>,
    /// Nominal U-value, W/m2-K.
    pub nominal_u: f64,
    /// Marks member surfaces as massless radiatively-transparent partitions.
    pub is_air_boundary: bool,
    /// Glazing construction, legal for windows/glass doors/TDDs.
    pub is_window: bool,
}

/// Name-indexed construction storage with dense ids.
#[derive(Debug, Default)]
pub struct ConstructionRegistry {
    items: Vec<Construction>,
    by_name: FxHashMap<String, ConstructionId>,
}

impl ConstructionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, construction: Construction) -> ConstructionId {
        let id = ConstructionId::new(self.items.len());
        self.by_name.insert(construction.name.clone(), id);
        self.items.push(construction);
        id
    }

    pub fn get(&self, id: ConstructionId) -> &Construction {
        &self.items[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<ConstructionId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Layer-count equality plus exact reversed layer match between two
    /// constructions, for interzone pairing checks.
    ///
    /// Returns `(same_layer_count, exactly_reversed)`.
    pub fn compare_reversed(&self, a: ConstructionId, b: ConstructionId) -> (bool, bool) {
        let ca = self.get(a);
        let cb = self.get(b);
        if ca.layers.len() != cb.layers.len() {
            return (false, false);
        }
        let reversed = ca
            .layers
            .iter()
            .zip(cb.layers.iter().rev())
            .all(|(x, y)| x == y);
        (true, reversed)
    }
}
