//! butterfly-narrate - tagged edge names from tile bytes to route narratives
//!
//! Pipeline:
//! - formats: tile file, edge-info records, tagged-name codec
//! - graph: resident tiles and per-edge attribute views
//! - search: path search producing ordered directed edges
//! - trip: leg assembly, one trip edge per path edge
//! - narrative: step segmentation, intersection classes, OSRM JSON
//!
//! `ingest` and `profiles` turn small ASCII-map scenes into tiles.

pub mod attributes;
pub mod cli;
pub mod config;
pub mod formats;
pub mod geo;
pub mod graph;
pub mod ingest;
pub mod logging;
pub mod narrative;
pub mod profiles;
pub mod search;
pub mod trip;

pub use attributes::{DirectedEdgeAttributes, RoadClass};
pub use formats::{TaggedName, TaggedNameKind, Tile};
pub use graph::{DirectedEdgeView, GraphId, TileSet};
pub use narrative::{NarrativeOptions, OsrmResponse, SegmentPolicy};
pub use search::{DijkstraSearch, PathSearch};
pub use trip::{assemble_leg, TripEdge, TripLeg, TripNode};
