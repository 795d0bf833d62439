//! Binary tile formats

pub mod crc;
pub mod edge_info;
pub mod tagged_names;
pub mod tile;

pub use edge_info::{EdgeInfoError, EdgeInfoRecord};
pub use tagged_names::{DecodeIssue, TaggedName, TaggedNameKind};
pub use tile::{EdgeRecord, NodeRecord, Tile, TileError, TileWriter};
