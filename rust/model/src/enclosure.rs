// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Radiant and solar enclosures: zones merged across air boundaries.

use crate::ids::ZoneId;

/// Which solution pass an enclosure belongs to. The membership logic is the
/// same fact consumed twice; only the accumulated areas differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnclosureKind {
    Radiant,
    Solar,
}

/// A set of zones that exchange radiation (or daylight) as one volume.
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub name: String,
    pub kind: EnclosureKind,
    pub zones: Vec<ZoneId>,
    pub floor_area: f64,
    /// Exterior window area; accumulated for solar enclosures only.
    pub ext_window_area: f64,
    /// Total surface area; accumulated for solar enclosures only.
    pub total_surface_area: f64,
}

impl Enclosure {
    pub fn new(name: impl Into<String>, kind: EnclosureKind) -> Self {
        Self {
            name: name.into(),
            kind,
            zones: Vec::new(),
            floor_area: 0.0,
            ext_window_area: 0.0,
            total_surface_area: 0.0,
        }
    }
}
