//! Resident tiles and graph-id resolution
//!
//! A [`TileSet`] is immutable once built and can be shared read-only across
//! request threads; every lookup is a pure function of (tile, index).

pub mod view;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rstar::{primitives::GeomWithData, RTree};
use thiserror::Error;

use crate::formats::{NodeRecord, Tile};
use crate::geo::LonLat;

pub use view::DirectedEdgeView;

/// Node or directed-edge address: tile id + index within the tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct GraphId {
    pub tile: u32,
    pub index: u32,
}

impl GraphId {
    pub const fn new(tile: u32, index: u32) -> Self {
        Self { tile, index }
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tile, self.index)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("tile {0} is not loaded")]
    TileNotLoaded(u32),
    #[error("node {0} does not exist")]
    NodeOutOfRange(GraphId),
    #[error("edge {0} does not exist")]
    EdgeOutOfRange(GraphId),
}

type NodePoint = GeomWithData<[f64; 2], GraphId>;

#[derive(Default)]
pub struct TileSet {
    tiles: HashMap<u32, Arc<Tile>>,
    spatial: RTree<NodePoint>,
}

impl fmt::Debug for TileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.tiles.keys().collect();
        ids.sort();
        f.debug_struct("TileSet").field("tiles", &ids).finish()
    }
}

impl TileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `tile` resident, replacing any tile with the same id
    pub fn insert(&mut self, tile: Tile) {
        let tile_id = tile.tile_id();
        if self.tiles.contains_key(&tile_id) {
            let stale: Vec<NodePoint> = self
                .spatial
                .iter()
                .filter(|p| p.data.tile == tile_id)
                .cloned()
                .collect();
            for p in &stale {
                self.spatial.remove(p);
            }
        }
        for index in 0..tile.node_count() {
            if let Some(node) = tile.node(index) {
                self.spatial.insert(GeomWithData::new(
                    [node.lon(), node.lat()],
                    GraphId::new(tile_id, index),
                ));
            }
        }
        self.tiles.insert(tile_id, Arc::new(tile));
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut set = Self::new();
        for tile in tiles {
            set.insert(tile);
        }
        set
    }

    pub fn tile(&self, tile_id: u32) -> Result<&Tile, GraphError> {
        self.tiles
            .get(&tile_id)
            .map(Arc::as_ref)
            .ok_or(GraphError::TileNotLoaded(tile_id))
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.tiles.keys().copied()
    }

    pub fn node(&self, id: GraphId) -> Result<NodeRecord, GraphError> {
        self.tile(id.tile)?
            .node(id.index)
            .ok_or(GraphError::NodeOutOfRange(id))
    }

    pub fn location(&self, id: GraphId) -> Result<LonLat, GraphError> {
        let node = self.node(id)?;
        Ok([node.lon(), node.lat()])
    }

    pub fn edge(&self, id: GraphId) -> Result<DirectedEdgeView<'_>, GraphError> {
        let tile = self.tile(id.tile)?;
        let record = tile.edge(id.index).ok_or(GraphError::EdgeOutOfRange(id))?;
        Ok(DirectedEdgeView::new(id, tile, record))
    }

    /// Node the edge leaves from
    pub fn edge_start_node(&self, id: GraphId) -> Result<GraphId, GraphError> {
        let tile = self.tile(id.tile)?;
        tile.edge_start_node(id.index)
            .map(|index| GraphId::new(id.tile, index))
            .ok_or(GraphError::EdgeOutOfRange(id))
    }

    /// Outgoing directed edges of `node`
    pub fn outgoing(&self, node: GraphId) -> Result<impl Iterator<Item = GraphId>, GraphError> {
        let record = self.node(node)?;
        let tile = node.tile;
        Ok((record.first_edge..record.first_edge + record.edge_count)
            .map(move |index| GraphId::new(tile, index)))
    }

    /// Closest resident node to `[lon, lat]`
    pub fn nearest_node(&self, location: LonLat) -> Option<GraphId> {
        self.spatial.nearest_neighbor(&location).map(|p| p.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{EdgeRecord, TileWriter};

    fn tile(tile_id: u32, lon0: f64) -> Tile {
        let mut w = TileWriter::new(tile_id);
        let a = w.add_node(0.0, lon0);
        let b = w.add_node(0.0, lon0 + 0.001);
        w.add_edge(
            a,
            EdgeRecord {
                end_tile: tile_id,
                end_node: b,
                edge_info_offset: 0,
                length_mm: 111_000,
                speed_kmh: 50,
                flags: 0,
                road_class: 2,
            },
        );
        w.finish().unwrap()
    }

    #[test]
    fn test_resolution_errors() {
        let set = TileSet::from_tiles([tile(1, 0.0)]);
        assert!(set.edge(GraphId::new(1, 0)).is_ok());
        assert_eq!(
            set.edge(GraphId::new(1, 5)).unwrap_err(),
            GraphError::EdgeOutOfRange(GraphId::new(1, 5))
        );
        assert_eq!(
            set.node(GraphId::new(2, 0)).unwrap_err(),
            GraphError::TileNotLoaded(2)
        );
        assert_eq!(
            set.edge_start_node(GraphId::new(1, 0)).unwrap(),
            GraphId::new(1, 0)
        );
    }

    #[test]
    fn test_outgoing() {
        let set = TileSet::from_tiles([tile(1, 0.0)]);
        let out: Vec<_> = set.outgoing(GraphId::new(1, 0)).unwrap().collect();
        assert_eq!(out, vec![GraphId::new(1, 0)]);
        assert_eq!(set.outgoing(GraphId::new(1, 1)).unwrap().count(), 0);
    }

    #[test]
    fn test_nearest_node_across_tiles() {
        let mut set = TileSet::from_tiles([tile(1, 0.0), tile(2, 1.0)]);
        assert_eq!(set.nearest_node([1.0011, 0.0]), Some(GraphId::new(2, 1)));
        assert_eq!(set.nearest_node([-0.5, 0.0]), Some(GraphId::new(1, 0)));

        // replacing a tile drops its old nodes from the index
        set.insert(tile(2, 5.0));
        assert_eq!(set.nearest_node([1.0011, 0.0]), Some(GraphId::new(1, 1)));
    }
}
