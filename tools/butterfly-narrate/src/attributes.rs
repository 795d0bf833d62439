//! Per-edge attribute vocabulary shared by tiles, profiles, trip legs and narratives

use serde::{Deserialize, Serialize};

use crate::formats::tagged_names::{TaggedName, TaggedNameKind};

/// Road classification, ordered from most to least important.
///
/// The discriminant is the on-disk byte in tile directed-edge records.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway = 0,
    Trunk = 1,
    Primary = 2,
    Secondary = 3,
    Tertiary = 4,
    Unclassified = 5,
    Residential = 6,
    ServiceOther = 7,
}

impl RoadClass {
    pub const ALL: [RoadClass; 8] = [
        RoadClass::Motorway,
        RoadClass::Trunk,
        RoadClass::Primary,
        RoadClass::Secondary,
        RoadClass::Tertiary,
        RoadClass::Unclassified,
        RoadClass::Residential,
        RoadClass::ServiceOther,
    ];

    /// Label used in OSRM intersection `classes`
    pub const fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway => "motorway",
            RoadClass::Trunk => "trunk",
            RoadClass::Primary => "primary",
            RoadClass::Secondary => "secondary",
            RoadClass::Tertiary => "tertiary",
            RoadClass::Unclassified => "unclassified",
            RoadClass::Residential => "residential",
            RoadClass::ServiceOther => "service_other",
        }
    }

    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(RoadClass::Motorway),
            1 => Some(RoadClass::Trunk),
            2 => Some(RoadClass::Primary),
            3 => Some(RoadClass::Secondary),
            4 => Some(RoadClass::Tertiary),
            5 => Some(RoadClass::Unclassified),
            6 => Some(RoadClass::Residential),
            7 => Some(RoadClass::ServiceOther),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flag bits of a directed-edge record
pub mod edge_flags {
    pub const TUNNEL: u16 = 1 << 0;
    pub const BRIDGE: u16 = 1 << 1;
    /// Edge runs along the way's node order
    pub const FORWARD: u16 = 1 << 2;
}

/// Owned snapshot of everything a directed edge says about itself.
///
/// Each edge carries its own copy; edges of the same physical tunnel are not linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectedEdgeAttributes {
    pub is_tunnel: bool,
    pub is_bridge: bool,
    pub road_class: RoadClass,
    pub names: Vec<String>,
    pub tagged_names: Vec<TaggedName>,
}

impl DirectedEdgeAttributes {
    /// First tagged name of `kind`, in stored order
    pub fn first_tagged(&self, kind: TaggedNameKind) -> Option<&str> {
        first_tagged(&self.tagged_names, kind)
    }
}

pub(crate) fn first_tagged(names: &[TaggedName], kind: TaggedNameKind) -> Option<&str> {
    names
        .iter()
        .find(|n| n.kind == kind)
        .map(|n| n.value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_road_class_byte_roundtrip() {
        for class in RoadClass::ALL {
            assert_eq!(RoadClass::from_u8(class as u8), Some(class));
        }
        assert_eq!(RoadClass::from_u8(8), None);
    }

    #[test]
    fn test_first_tagged_respects_order() {
        let attrs = DirectedEdgeAttributes {
            is_tunnel: true,
            is_bridge: false,
            road_class: RoadClass::Motorway,
            names: vec![],
            tagged_names: vec![
                TaggedName::new(TaggedNameKind::Pronunciation, "a"),
                TaggedName::new(TaggedNameKind::Tunnel, "first"),
                TaggedName::new(TaggedNameKind::Tunnel, "second"),
            ],
        };
        assert_eq!(attrs.first_tagged(TaggedNameKind::Tunnel), Some("first"));
        assert_eq!(attrs.first_tagged(TaggedNameKind::Bridge), None);
    }
}
