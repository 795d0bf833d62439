//! Structured trip legs
//!
//! A [`TripLeg`] is built once per route by [`assemble_leg`] and is read-only
//! afterwards. Node `i` holds the edge leaving it; the last node has none.

pub mod assembler;

use serde::Serialize;
use thiserror::Error;

use crate::attributes::{self, RoadClass};
use crate::formats::tagged_names::{TaggedName, TaggedNameKind};
use crate::geo::LonLat;
use crate::graph::{GraphError, GraphId};

pub use assembler::assemble_leg;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TripError {
    #[error("cannot build a trip leg from an empty path")]
    EmptyPath,
    #[error("path edge {index} starts at {found}, expected {expected}")]
    Discontinuous {
        index: usize,
        expected: GraphId,
        found: GraphId,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Per-edge record of a trip leg; a verbatim copy of the tile attributes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripEdge {
    pub id: GraphId,
    pub tunnel: bool,
    pub bridge: bool,
    pub road_class: RoadClass,
    pub names: Vec<String>,
    pub tagged_name: Vec<TaggedName>,
    pub length_m: f64,
    pub speed_kmh: u16,
    pub begin_heading: u16,
    pub end_heading: u16,
    pub end_location: LonLat,
}

impl TripEdge {
    pub fn has_tunnel(&self) -> bool {
        self.tunnel
    }

    /// Seconds to traverse; zero for an edge with no speed
    pub fn duration_s(&self) -> f64 {
        if self.speed_kmh == 0 {
            0.0
        } else {
            self.length_m / (self.speed_kmh as f64 / 3.6)
        }
    }

    pub fn first_tagged(&self, kind: TaggedNameKind) -> Option<&str> {
        attributes::first_tagged(&self.tagged_name, kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripNode {
    pub location: LonLat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<TripEdge>,
}

impl TripNode {
    pub fn edge(&self) -> Option<&TripEdge> {
        self.edge.as_ref()
    }

    /// False for the arrival node
    pub fn has_tunnel(&self) -> bool {
        self.edge.as_ref().is_some_and(TripEdge::has_tunnel)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripLeg {
    nodes: Vec<TripNode>,
}

impl TripLeg {
    pub(crate) fn new(nodes: Vec<TripNode>) -> Self {
        debug_assert!(nodes.len() >= 2, "a leg has at least one edge");
        debug_assert!(nodes.last().is_some_and(|n| n.edge.is_none()));
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TripNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&TripNode> {
        self.nodes.get(index)
    }

    /// Edges in traversal order
    pub fn edges(&self) -> impl Iterator<Item = &TripEdge> + '_ {
        self.nodes.iter().filter_map(TripNode::edge)
    }

    pub fn edge(&self, index: usize) -> Option<&TripEdge> {
        self.nodes.get(index).and_then(TripNode::edge)
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn origin(&self) -> LonLat {
        self.nodes[0].location
    }

    pub fn destination(&self) -> LonLat {
        self.nodes[self.nodes.len() - 1].location
    }

    pub fn length_m(&self) -> f64 {
        self.edges().map(|e| e.length_m).sum()
    }

    pub fn duration_s(&self) -> f64 {
        self.edges().map(TripEdge::duration_s).sum()
    }
}
