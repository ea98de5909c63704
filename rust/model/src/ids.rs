// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dense typed index newtypes.
//!
//! Per-zone surface ranges are contiguous spans over the canonical surface
//! order, so identities are dense array indices rather than generational
//! keys. Indices are assigned once and never relocated.

macro_rules! dense_id {
    ($(#[$doc:meta] $name:ident),+ $(,)?) => {
        $(
            #[$doc]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            pub struct $name(pub(crate) u32);

            impl $name {
                /// Wraps a raw index.
                pub fn new(index: usize) -> Self {
                    Self(index as u32)
                }

                /// The raw array index.
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "#{}", self.0)
                }
            }
        )+
    };
}

dense_id! {
    /// Index of a surface in the canonical surface arena.
    SurfaceId,
    /// Index of a zone in the zone list.
    ZoneId,
    /// Index of a construction in the registry (opaque collaborator data).
    ConstructionId,
    /// Index of a radiant or solar enclosure.
    EnclosureId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_and_ordering() {
        let a = SurfaceId::new(3);
        let b = SurfaceId::new(7);
        assert_eq!(a.index(), 3);
        assert!(a < b);
        assert_eq!(a.to_string(), "#3");
    }
}
