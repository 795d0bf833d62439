//! Path -> trip leg
//!
//! Each path edge becomes exactly one trip edge carrying that edge's own
//! attributes. Neighbouring edges are never merged, even when they describe
//! the same physical tunnel.

use super::{TripEdge, TripError, TripLeg, TripNode};
use crate::geo::bearing;
use crate::graph::{GraphId, TileSet};

pub fn assemble_leg(tiles: &TileSet, path: &[GraphId]) -> Result<TripLeg, TripError> {
    let Some(&first) = path.first() else {
        return Err(TripError::EmptyPath);
    };

    let mut nodes = Vec::with_capacity(path.len() + 1);
    let mut at = tiles.edge_start_node(first)?;

    for (index, &id) in path.iter().enumerate() {
        let start = tiles.edge_start_node(id)?;
        if start != at {
            return Err(TripError::Discontinuous {
                index,
                expected: at,
                found: start,
            });
        }

        let edge = tiles.edge(id)?;
        let begin = tiles.location(start)?;
        let end_node = edge.end_node();
        let end = tiles.location(end_node)?;
        // edges are straight segments, so both headings are the same
        let heading = bearing(begin, end);

        nodes.push(TripNode {
            location: begin,
            edge: Some(TripEdge {
                id,
                tunnel: edge.tunnel(),
                bridge: edge.bridge(),
                road_class: edge.road_class(),
                names: edge.names().to_vec(),
                tagged_name: edge.tagged_names().to_vec(),
                length_m: edge.length_m(),
                speed_kmh: edge.speed_kmh(),
                begin_heading: heading,
                end_heading: heading,
                end_location: end,
            }),
        });
        at = end_node;
    }

    nodes.push(TripNode {
        location: tiles.location(at)?,
        edge: None,
    });

    let leg = TripLeg::new(nodes);
    tracing::debug!(
        edges = leg.edge_count(),
        tunnel_edges = leg.edges().filter(|e| e.tunnel).count(),
        length_m = leg.length_m(),
        "assembled trip leg"
    );
    Ok(leg)
}
