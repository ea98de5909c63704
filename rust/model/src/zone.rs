// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone records and contiguous surface index ranges.

use nalgebra::Point3;

use crate::ids::{EnclosureId, SurfaceId, ZoneId};

/// An inclusive, contiguous span of surface indices, or empty.
///
/// Ranges over the canonical surface order are an invariant of the
/// reordering pass; iterating an empty range yields nothing, so loops need
/// no sentinel checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRange(Option<(u32, u32)>);

impl SurfaceRange {
    pub const EMPTY: Self = Self(None);

    pub fn new(first: SurfaceId, last: SurfaceId) -> Self {
        debug_assert!(first <= last);
        Self(Some((first.0, last.0)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn first(&self) -> Option<SurfaceId> {
        self.0.map(|(f, _)| SurfaceId(f))
    }

    pub fn last(&self) -> Option<SurfaceId> {
        self.0.map(|(_, l)| SurfaceId(l))
    }

    /// Number of surfaces in the span.
    pub fn len(&self) -> usize {
        match self.0 {
            Some((f, l)) => (l - f + 1) as usize,
            None => 0,
        }
    }

    /// Grows the span to include `id`; the id must extend it contiguously
    /// upward or start it.
    pub fn push(&mut self, id: SurfaceId) {
        match &mut self.0 {
            Some((_, l)) => {
                debug_assert_eq!(*l + 1, id.0, "range must stay contiguous");
                *l = id.0;
            }
            None => self.0 = Some((id.0, id.0)),
        }
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        matches!(self.0, Some((f, l)) if f <= id.0 && id.0 <= l)
    }

    pub fn iter(&self) -> impl Iterator<Item = SurfaceId> {
        let (f, l) = match self.0 {
            Some((f, l)) => (f, l + 1),
            None => (0, 0),
        };
        (f..l).map(SurfaceId)
    }
}

/// A thermal zone with its derived geometry and surface ranges.
///
/// Zones are enumerated by an external collaborator before surface
/// processing; everything else here is populated by the pipeline.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub id: ZoneId,

    /// Zone-relative north rotation, degrees (ignored in world-coordinate
    /// input mode).
    pub relative_north_deg: f64,
    /// Zone origin offset (ignored in world-coordinate input mode).
    pub origin: Point3<f64>,
    /// Zone list multiplier applied to interzone area checks.
    pub multiplier: u32,

    // User-entered values; the calculated counterparts live below.
    pub volume_user: Option<f64>,
    pub floor_area_user: Option<f64>,
    pub ceiling_height_user: Option<f64>,

    // Derived geometry
    pub min: Point3<f64>,
    pub max: Point3<f64>,
    pub centroid: Point3<f64>,
    pub volume: f64,
    pub floor_area: f64,
    pub ceiling_area: f64,
    pub ceiling_height: f64,
    /// The zone polyhedron passed the watertightness test.
    pub is_enclosed: bool,

    // Contiguous index ranges over the canonical surface order
    pub all_surfaces: SurfaceRange,
    pub heat_transfer_surfaces: SurfaceRange,
    pub opaque_surfaces: SurfaceRange,
    pub window_surfaces: SurfaceRange,
    pub tdd_domes: SurfaceRange,

    pub radiant_enclosure: Option<EnclosureId>,
    pub solar_enclosure: Option<EnclosureId>,
}

impl Zone {
    pub fn new(name: impl Into<String>, id: ZoneId) -> Self {
        Self {
            name: name.into(),
            id,
            relative_north_deg: 0.0,
            origin: Point3::origin(),
            multiplier: 1,
            volume_user: None,
            floor_area_user: None,
            ceiling_height_user: None,
            min: Point3::new(f64::MAX, f64::MAX, f64::MAX),
            max: Point3::new(f64::MIN, f64::MIN, f64::MIN),
            centroid: Point3::origin(),
            volume: 0.0,
            floor_area: 0.0,
            ceiling_area: 0.0,
            ceiling_height: 0.0,
            is_enclosed: false,
            all_surfaces: SurfaceRange::EMPTY,
            heat_transfer_surfaces: SurfaceRange::EMPTY,
            opaque_surfaces: SurfaceRange::EMPTY,
            window_surfaces: SurfaceRange::EMPTY,
            tdd_domes: SurfaceRange::EMPTY,
            radiant_enclosure: None,
            solar_enclosure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_iterates_nothing() {
        let r = SurfaceRange::EMPTY;
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn push_extends_contiguously() {
        let mut r = SurfaceRange::EMPTY;
        r.push(SurfaceId::new(4));
        r.push(SurfaceId::new(5));
        r.push(SurfaceId::new(6));
        assert_eq!(r.len(), 3);
        assert_eq!(r.first(), Some(SurfaceId::new(4)));
        assert_eq!(r.last(), Some(SurfaceId::new(6)));
        assert!(r.contains(SurfaceId::new(5)));
        assert!(!r.contains(SurfaceId::new(7)));
        let ids: Vec<_> = r.iter().map(|s| s.index()).collect();
        assert_eq!(ids, vec![4, 5, 6]);
    }
}
