//! Path search over resident tiles
//!
//! The narrative pipeline only needs an ordered list of directed edges; any
//! [`PathSearch`] implementation can supply it.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use thiserror::Error;

use crate::graph::{GraphError, GraphId, TileSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("origin and destination are the same node ({0})")]
    SameNode(GraphId),
    #[error("no route from {from} to {to}")]
    NoRoute { from: GraphId, to: GraphId },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub trait PathSearch {
    /// Ordered directed edges from `from` to `to`
    fn find_path(&self, tiles: &TileSet, from: GraphId, to: GraphId)
        -> Result<Vec<GraphId>, SearchError>;
}

#[derive(Clone, Debug)]
struct DijkstraState {
    node: GraphId,
    cost: f64,
}

impl PartialEq for DijkstraState {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for DijkstraState {}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: reverse ordering
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

/// Fastest path by edge travel time; edges with zero speed are never taken
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraSearch;

impl PathSearch for DijkstraSearch {
    fn find_path(
        &self,
        tiles: &TileSet,
        from: GraphId,
        to: GraphId,
    ) -> Result<Vec<GraphId>, SearchError> {
        if from == to {
            return Err(SearchError::SameNode(from));
        }
        // fail early on ids that do not resolve
        tiles.node(from)?;
        tiles.node(to)?;

        let mut heap = BinaryHeap::new();
        let mut best: HashMap<GraphId, f64> = HashMap::new();
        // node -> (predecessor node, edge taken)
        let mut came_from: HashMap<GraphId, (GraphId, GraphId)> = HashMap::new();
        let mut settled = 0usize;

        best.insert(from, 0.0);
        heap.push(DijkstraState { node: from, cost: 0.0 });

        while let Some(DijkstraState { node, cost }) = heap.pop() {
            if best.get(&node).is_some_and(|&c| cost > c) {
                continue;
            }
            settled += 1;
            if node == to {
                break;
            }

            for edge_id in tiles.outgoing(node)? {
                let edge = tiles.edge(edge_id)?;
                let Some(duration) = edge.duration_s() else {
                    continue;
                };
                let next = edge.end_node();
                let next_cost = cost + duration;
                if best.get(&next).map_or(true, |&c| next_cost < c) {
                    best.insert(next, next_cost);
                    came_from.insert(next, (node, edge_id));
                    heap.push(DijkstraState {
                        node: next,
                        cost: next_cost,
                    });
                }
            }
        }

        if !came_from.contains_key(&to) {
            return Err(SearchError::NoRoute { from, to });
        }

        let mut path = Vec::new();
        let mut at = to;
        while let Some(&(prev, edge)) = came_from.get(&at) {
            path.push(edge);
            at = prev;
        }
        path.reverse();

        tracing::debug!(
            %from,
            %to,
            edges = path.len(),
            settled,
            duration_s = best.get(&to).copied().unwrap_or_default(),
            "path found"
        );
        Ok(path)
    }
}

/// Snap a coordinate to the closest resident node
pub fn nearest_node(tiles: &TileSet, lat: f64, lon: f64) -> Option<GraphId> {
    tiles.nearest_node([lon, lat])
}
