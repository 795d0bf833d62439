//! Small-scale graph ingestion: ASCII-drawn scenes to tiles
//!
//! Used by the CLI `build` command and the end-to-end tests.

pub mod ascii_map;
pub mod builder;
pub mod scene;

use std::path::PathBuf;

use thiserror::Error;

use crate::formats::{EdgeInfoError, TileError};

pub use ascii_map::AsciiMap;
pub use builder::{BuiltScene, TileBuilder};
pub use scene::{Scene, WaySpec};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read scene {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scene: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("grid size must be a positive number of metres, got {0}")]
    InvalidGridSize(f64),
    #[error("map has no nodes")]
    EmptyMap,
    #[error("node '{0}' appears more than once in the map")]
    DuplicateNode(char),
    #[error("way '{way}' needs at least two nodes")]
    WayTooShort { way: String },
    #[error("way '{way}' references node '{node}' which is not on the map")]
    UnknownNode { way: String, node: char },
    #[error("way '{way}': {source}")]
    EdgeInfo {
        way: String,
        #[source]
        source: EdgeInfoError,
    },
    #[error(transparent)]
    Tile(#[from] TileError),
}
