//! Read-only attribute accessors over a tile-resident directed edge

use std::cell::OnceCell;

use crate::attributes::{edge_flags, DirectedEdgeAttributes, RoadClass};
use crate::formats::edge_info::{self, EdgeInfoRecord};
use crate::formats::tagged_names::{self, TaggedName};
use crate::formats::{EdgeRecord, Tile};

use super::GraphId;

/// Flags and names are read when the view is created; the tagged-name blob is
/// decoded on first access and cached for the lifetime of the view.
#[derive(Debug)]
pub struct DirectedEdgeView<'a> {
    id: GraphId,
    record: EdgeRecord,
    info: EdgeInfoRecord<'a>,
    tagged: OnceCell<Vec<TaggedName>>,
}

impl<'a> DirectedEdgeView<'a> {
    pub(crate) fn new(id: GraphId, tile: &'a Tile, record: EdgeRecord) -> Self {
        let info = edge_info::decode_record(tile.edge_info_area(), record.edge_info_offset as usize);
        Self {
            id,
            record,
            info,
            tagged: OnceCell::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn end_node(&self) -> GraphId {
        GraphId::new(self.record.end_tile, self.record.end_node)
    }

    pub fn way_id(&self) -> i64 {
        self.info.way_id
    }

    pub fn has_tunnel(&self) -> bool {
        self.record.flags & edge_flags::TUNNEL != 0
    }

    /// Same as [`has_tunnel`](Self::has_tunnel)
    pub fn tunnel(&self) -> bool {
        self.has_tunnel()
    }

    pub fn bridge(&self) -> bool {
        self.record.flags & edge_flags::BRIDGE != 0
    }

    /// Whether the edge follows the source way's node order
    pub fn forward(&self) -> bool {
        self.record.flags & edge_flags::FORWARD != 0
    }

    pub fn road_class(&self) -> RoadClass {
        RoadClass::from_u8(self.record.road_class).unwrap_or_else(|| {
            tracing::warn!(
                edge = %self.id,
                value = self.record.road_class,
                "unknown road class byte, treating as service_other"
            );
            RoadClass::ServiceOther
        })
    }

    pub fn length_m(&self) -> f64 {
        self.record.length_mm as f64 / 1000.0
    }

    pub fn speed_kmh(&self) -> u16 {
        self.record.speed_kmh
    }

    /// Traversal time in seconds; zero-speed edges are treated as impassable
    pub fn duration_s(&self) -> Option<f64> {
        (self.record.speed_kmh > 0).then(|| self.length_m() / (self.record.speed_kmh as f64 / 3.6))
    }

    pub fn names(&self) -> &[String] {
        &self.info.names
    }

    /// Tagged names in stored order, unfiltered
    pub fn tagged_names(&self) -> &[TaggedName] {
        self.tagged
            .get_or_init(|| tagged_names::decode_names(self.info.tagged_blob))
    }

    /// Owned snapshot of this edge's attributes
    pub fn attributes(&self) -> DirectedEdgeAttributes {
        DirectedEdgeAttributes {
            is_tunnel: self.has_tunnel(),
            is_bridge: self.bridge(),
            road_class: self.road_class(),
            names: self.names().to_vec(),
            tagged_names: self.tagged_names().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::edge_info::encode_record;
    use crate::formats::tagged_names::TaggedNameKind;
    use crate::formats::TileWriter;
    use crate::graph::TileSet;

    fn tunnel_tile(extra_blob: &[u8]) -> TileSet {
        let mut w = TileWriter::new(0);
        let a = w.add_node(0.0, 0.0);
        let b = w.add_node(0.0, 0.001);

        let mut info = encode_record(
            99,
            &["Harbor Tunnel Thruway".to_string()],
            &[TaggedName::new(TaggedNameKind::Tunnel, "Fort McHenry Tunnel")],
        )
        .unwrap();
        if !extra_blob.is_empty() {
            // grow tagged_len to cover the appended bytes
            let tagged_len_at = info.len() - 3 - "Fort McHenry Tunnel".len() - 2;
            let len = u16::from_le_bytes([info[tagged_len_at], info[tagged_len_at + 1]])
                + extra_blob.len() as u16;
            info[tagged_len_at..tagged_len_at + 2].copy_from_slice(&len.to_le_bytes());
            info.extend_from_slice(extra_blob);
        }
        let offset = w.add_edge_info(&info).unwrap();

        w.add_edge(
            a,
            EdgeRecord {
                end_tile: 0,
                end_node: b,
                edge_info_offset: offset,
                length_mm: 111_000,
                speed_kmh: 100,
                flags: edge_flags::TUNNEL | edge_flags::FORWARD,
                road_class: RoadClass::Motorway as u8,
            },
        );
        w.add_edge(
            b,
            EdgeRecord {
                end_tile: 0,
                end_node: a,
                edge_info_offset: offset,
                length_mm: 111_000,
                speed_kmh: 0,
                flags: edge_flags::BRIDGE,
                road_class: 42,
            },
        );
        TileSet::from_tiles([w.finish().unwrap()])
    }

    #[test]
    fn test_flags_and_names() {
        let set = tunnel_tile(&[]);
        let edge = set.edge(GraphId::new(0, 0)).unwrap();
        assert!(edge.has_tunnel());
        assert_eq!(edge.tunnel(), edge.has_tunnel());
        assert!(!edge.bridge());
        assert!(edge.forward());
        assert_eq!(edge.road_class(), RoadClass::Motorway);
        assert_eq!(edge.way_id(), 99);
        assert_eq!(edge.names(), ["Harbor Tunnel Thruway".to_string()]);
        assert_eq!(edge.end_node(), GraphId::new(0, 1));
        assert!((edge.length_m() - 111.0).abs() < 1e-9);
        assert!((edge.duration_s().unwrap() - 3.996).abs() < 1e-9);
    }

    #[test]
    fn test_debug_shows_cached_names() {
        let set = tunnel_tile(&[]);
        let edge = set.edge(GraphId::new(0, 0)).unwrap();
        edge.tagged_names();
        let debug = format!("{edge:?}");
        assert!(debug.starts_with("DirectedEdgeView"), "{debug}");
        assert!(debug.contains("Fort McHenry Tunnel"), "{debug}");
    }

    #[test]
    fn test_tagged_names_idempotent() {
        let set = tunnel_tile(&[]);
        let edge = set.edge(GraphId::new(0, 0)).unwrap();
        let first = edge.tagged_names().to_vec();
        let second = edge.tagged_names();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![TaggedName::new(TaggedNameKind::Tunnel, "Fort McHenry Tunnel")]
        );
        assert_eq!(edge.attributes(), set.edge(GraphId::new(0, 0)).unwrap().attributes());
    }

    #[test]
    fn test_unknown_entries_degrade() {
        let set = tunnel_tile(&[0x7E, 1, 0, b'?', 0x02, 9, 0]);
        let edge = set.edge(GraphId::new(0, 0)).unwrap();
        assert_eq!(
            edge.tagged_names(),
            [TaggedName::new(TaggedNameKind::Tunnel, "Fort McHenry Tunnel")]
        );
    }

    #[test]
    fn test_bad_road_class_and_zero_speed() {
        let set = tunnel_tile(&[]);
        let edge = set.edge(GraphId::new(0, 1)).unwrap();
        assert_eq!(edge.road_class(), RoadClass::ServiceOther);
        assert!(edge.bridge());
        assert!(!edge.tunnel());
        assert_eq!(edge.duration_s(), None);
    }
}
