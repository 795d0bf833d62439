//! tile.bin format - nodes, directed edges and edge-info records for one graph tile
//!
//! Format (little-endian, random access over the resident bytes):
//!
//! Header (32 bytes):
//!   magic:          u32 = 0x4E525254  // "TRRN"
//!   version:        u16 = 1
//!   reserved:       u16
//!   tile_id:        u32
//!   node_count:     u32
//!   edge_count:     u32
//!   edge_info_len:  u32
//!   reserved:       [8]u8
//!
//! Nodes (node_count x 16 bytes):
//!   lat_fxp:     i32   // 1e-7 degrees
//!   lon_fxp:     i32
//!   first_edge:  u32   // outgoing edges are contiguous
//!   edge_count:  u32
//!
//! Directed edges (edge_count x 24 bytes):
//!   end_tile:          u32
//!   end_node:          u32
//!   edge_info_offset:  u32
//!   length_mm:         u32
//!   speed_kmh:         u16
//!   flags:             u16   // attributes::edge_flags
//!   road_class:        u8
//!   reserved:          [3]u8
//!
//! Edge-info area (edge_info_len bytes, see edge_info.rs)
//!
//! Footer (16 bytes):
//!   body_crc64:  u64   // everything after the header
//!   file_crc64:  u64   // header + body

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::crc;

pub const MAGIC: u32 = 0x4E525254; // "TRRN"
pub const VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 32;
pub const NODE_RECORD_SIZE: usize = 16;
pub const EDGE_RECORD_SIZE: usize = 24;

#[derive(Debug, Error)]
pub enum TileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("tile is {len} bytes, shorter than header and footer")]
    TooShort { len: usize },
    #[error("invalid tile magic 0x{found:08x}")]
    BadMagic { found: u32 },
    #[error("unsupported tile version {0}")]
    UnsupportedVersion(u16),
    #[error("size mismatch: header describes {expected} bytes, tile has {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("CRC64 mismatch in {section}: computed 0x{computed:016X}, stored 0x{stored:016X}")]
    CrcMismatch {
        section: &'static str,
        computed: u64,
        stored: u64,
    },
    #[error("node {node}: outgoing edges {first_edge}+{count} fall outside the tile's {edge_count} edges")]
    BadEdgeRange {
        node: u32,
        first_edge: u32,
        count: u32,
        edge_count: u32,
    },
    #[error("node {node}: first_edge {first_edge} is below the previous node's {previous}")]
    UnorderedEdges {
        node: u32,
        first_edge: u32,
        previous: u32,
    },
    #[error("tile {tile_id} is full: {what} exceeds u32 range")]
    Overflow { tile_id: u32, what: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRecord {
    pub lat_fxp: i32,
    pub lon_fxp: i32,
    pub first_edge: u32,
    pub edge_count: u32,
}

impl NodeRecord {
    pub fn lat(&self) -> f64 {
        self.lat_fxp as f64 / 1e7
    }

    pub fn lon(&self) -> f64 {
        self.lon_fxp as f64 / 1e7
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub end_tile: u32,
    pub end_node: u32,
    pub edge_info_offset: u32,
    pub length_mm: u32,
    pub speed_kmh: u16,
    pub flags: u16,
    pub road_class: u8,
}

impl EdgeRecord {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.end_tile.to_le_bytes());
        out.extend_from_slice(&self.end_node.to_le_bytes());
        out.extend_from_slice(&self.edge_info_offset.to_le_bytes());
        out.extend_from_slice(&self.length_mm.to_le_bytes());
        out.extend_from_slice(&self.speed_kmh.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.push(self.road_class);
        out.extend_from_slice(&[0u8; 3]);
    }

    fn decode(r: &[u8]) -> Self {
        EdgeRecord {
            end_tile: u32::from_le_bytes([r[0], r[1], r[2], r[3]]),
            end_node: u32::from_le_bytes([r[4], r[5], r[6], r[7]]),
            edge_info_offset: u32::from_le_bytes([r[8], r[9], r[10], r[11]]),
            length_mm: u32::from_le_bytes([r[12], r[13], r[14], r[15]]),
            speed_kmh: u16::from_le_bytes([r[16], r[17]]),
            flags: u16::from_le_bytes([r[18], r[19]]),
            road_class: r[20],
        }
    }
}

/// A validated, resident tile. Records are decoded on access.
#[derive(Debug, Clone)]
pub struct Tile {
    bytes: Vec<u8>,
    tile_id: u32,
    node_count: u32,
    edge_count: u32,
    edge_info_len: u32,
}

fn read_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

impl Tile {
    /// Validate magic, version, layout and checksums
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, TileError> {
        if bytes.len() < HEADER_SIZE + crc::FOOTER_SIZE {
            return Err(TileError::TooShort { len: bytes.len() });
        }

        let magic = read_u32(&bytes, 0);
        if magic != MAGIC {
            return Err(TileError::BadMagic { found: magic });
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(TileError::UnsupportedVersion(version));
        }

        let tile_id = read_u32(&bytes, 8);
        let node_count = read_u32(&bytes, 12);
        let edge_count = read_u32(&bytes, 16);
        let edge_info_len = read_u32(&bytes, 20);

        let expected = HEADER_SIZE
            + node_count as usize * NODE_RECORD_SIZE
            + edge_count as usize * EDGE_RECORD_SIZE
            + edge_info_len as usize
            + crc::FOOTER_SIZE;
        if expected != bytes.len() {
            return Err(TileError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let (content, stored_body, stored_file) =
            crc::split_footer(&bytes).ok_or(TileError::TooShort { len: bytes.len() })?;
        let computed_body = crc::checksum(&content[HEADER_SIZE..]);
        if computed_body != stored_body {
            return Err(TileError::CrcMismatch {
                section: "body",
                computed: computed_body,
                stored: stored_body,
            });
        }
        let computed_file = crc::checksum(content);
        if computed_file != stored_file {
            return Err(TileError::CrcMismatch {
                section: "file",
                computed: computed_file,
                stored: stored_file,
            });
        }

        let tile = Tile {
            bytes,
            tile_id,
            node_count,
            edge_count,
            edge_info_len,
        };
        tile.check_edge_ranges()?;
        Ok(tile)
    }

    /// Every node's outgoing range lies inside the edge table and ranges start in node order
    fn check_edge_ranges(&self) -> Result<(), TileError> {
        let mut previous = 0u32;
        for index in 0..self.node_count {
            let Some(node) = self.node(index) else {
                break;
            };
            let in_range = node
                .first_edge
                .checked_add(node.edge_count)
                .is_some_and(|end| end <= self.edge_count);
            if !in_range {
                return Err(TileError::BadEdgeRange {
                    node: index,
                    first_edge: node.first_edge,
                    count: node.edge_count,
                    edge_count: self.edge_count,
                });
            }
            if node.first_edge < previous {
                return Err(TileError::UnorderedEdges {
                    node: index,
                    first_edge: node.first_edge,
                    previous,
                });
            }
            previous = node.first_edge;
        }
        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, TileError> {
        let bytes = fs::read(path.as_ref()).map_err(|source| TileError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        fs::write(path.as_ref(), &self.bytes).map_err(|source| TileError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn tile_id(&self) -> u32 {
        self.tile_id
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }

    fn edges_start(&self) -> usize {
        HEADER_SIZE + self.node_count as usize * NODE_RECORD_SIZE
    }

    fn edge_info_start(&self) -> usize {
        self.edges_start() + self.edge_count as usize * EDGE_RECORD_SIZE
    }

    pub fn node(&self, index: u32) -> Option<NodeRecord> {
        if index >= self.node_count {
            return None;
        }
        let at = HEADER_SIZE + index as usize * NODE_RECORD_SIZE;
        let r = &self.bytes[at..at + NODE_RECORD_SIZE];
        Some(NodeRecord {
            lat_fxp: read_u32(r, 0) as i32,
            lon_fxp: read_u32(r, 4) as i32,
            first_edge: read_u32(r, 8),
            edge_count: read_u32(r, 12),
        })
    }

    pub fn edge(&self, index: u32) -> Option<EdgeRecord> {
        if index >= self.edge_count {
            return None;
        }
        let at = self.edges_start() + index as usize * EDGE_RECORD_SIZE;
        Some(EdgeRecord::decode(&self.bytes[at..at + EDGE_RECORD_SIZE]))
    }

    /// Node whose outgoing range contains edge `index`
    pub fn edge_start_node(&self, index: u32) -> Option<u32> {
        if index >= self.edge_count {
            return None;
        }
        // first_edge is non-decreasing; take the last node starting at or before `index`.
        let mut lo = 0u32;
        let mut hi = self.node_count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let node = self.node(mid)?;
            if node.first_edge <= index {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let candidate = lo.checked_sub(1)?;
        let node = self.node(candidate)?;
        (index < node.first_edge + node.edge_count).then_some(candidate)
    }

    pub fn edge_info_area(&self) -> &[u8] {
        let start = self.edge_info_start();
        &self.bytes[start..start + self.edge_info_len as usize]
    }
}

/// Accumulates records and produces a checksummed [`Tile`]
#[derive(Debug)]
pub struct TileWriter {
    tile_id: u32,
    nodes: Vec<(i32, i32)>,
    edges: Vec<(u32, EdgeRecord)>,
    edge_info: Vec<u8>,
}

impl TileWriter {
    pub fn new(tile_id: u32) -> Self {
        Self {
            tile_id,
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_info: Vec::new(),
        }
    }

    pub fn add_node(&mut self, lat: f64, lon: f64) -> u32 {
        self.nodes
            .push(((lat * 1e7).round() as i32, (lon * 1e7).round() as i32));
        (self.nodes.len() - 1) as u32
    }

    /// Append an encoded edge-info record, returning its offset
    pub fn add_edge_info(&mut self, record: &[u8]) -> Result<u32, TileError> {
        let offset = u32::try_from(self.edge_info.len()).map_err(|_| TileError::Overflow {
            tile_id: self.tile_id,
            what: "edge-info area",
        })?;
        self.edge_info.extend_from_slice(record);
        Ok(offset)
    }

    pub fn add_edge(&mut self, from_node: u32, edge: EdgeRecord) {
        self.edges.push((from_node, edge));
    }

    /// Group edges by start node (insertion order kept within a node) and seal the tile
    pub fn finish(mut self) -> Result<Tile, TileError> {
        self.edges.sort_by_key(|(from, _)| *from);

        let overflow = |what| TileError::Overflow {
            tile_id: self.tile_id,
            what,
        };
        let node_count = u32::try_from(self.nodes.len()).map_err(|_| overflow("node count"))?;
        let edge_count = u32::try_from(self.edges.len()).map_err(|_| overflow("edge count"))?;
        let edge_info_len =
            u32::try_from(self.edge_info.len()).map_err(|_| overflow("edge-info area"))?;

        let mut bytes = Vec::with_capacity(
            HEADER_SIZE
                + self.nodes.len() * NODE_RECORD_SIZE
                + self.edges.len() * EDGE_RECORD_SIZE
                + self.edge_info.len()
                + crc::FOOTER_SIZE,
        );
        bytes.extend_from_slice(&MAGIC.to_le_bytes());
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&self.tile_id.to_le_bytes());
        bytes.extend_from_slice(&node_count.to_le_bytes());
        bytes.extend_from_slice(&edge_count.to_le_bytes());
        bytes.extend_from_slice(&edge_info_len.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 8]);
        debug_assert_eq!(bytes.len(), HEADER_SIZE);

        let mut cursor = 0usize;
        for (node_idx, (lat_fxp, lon_fxp)) in self.nodes.iter().enumerate() {
            let first_edge = cursor as u32;
            while cursor < self.edges.len() && self.edges[cursor].0 as usize == node_idx {
                cursor += 1;
            }
            let count = cursor as u32 - first_edge;
            bytes.extend_from_slice(&lat_fxp.to_le_bytes());
            bytes.extend_from_slice(&lon_fxp.to_le_bytes());
            bytes.extend_from_slice(&first_edge.to_le_bytes());
            bytes.extend_from_slice(&count.to_le_bytes());
        }

        for (_, edge) in &self.edges {
            edge.encode(&mut bytes);
        }
        bytes.extend_from_slice(&self.edge_info);

        crc::append_footer(&mut bytes, HEADER_SIZE);
        Tile::from_bytes(bytes)
    }
}
