//! Synthetic trip legs for narrative unit tests
//!
//! Edges run due east, 100 m each at 72 km/h (5 s per edge).

use crate::attributes::RoadClass;
use crate::formats::tagged_names::{TaggedName, TaggedNameKind};
use crate::geo::haversine_distance;
use crate::graph::GraphId;
use crate::trip::{TripEdge, TripLeg, TripNode};

const EDGE_DEGREES: f64 = 100.0 / (6_371_008.8 * std::f64::consts::PI / 180.0);

pub(crate) struct EdgeSpec {
    road_class: RoadClass,
    tunnel: bool,
    names: Vec<String>,
    tagged: Vec<TaggedName>,
}

impl EdgeSpec {
    pub(crate) fn road(road_class: RoadClass) -> Self {
        Self {
            road_class,
            tunnel: false,
            names: Vec::new(),
            tagged: Vec::new(),
        }
    }

    pub(crate) fn tunnel(road_class: RoadClass, name: &str) -> Self {
        Self::tunnel_unnamed(road_class).with_tunnel_name(name)
    }

    pub(crate) fn tunnel_unnamed(road_class: RoadClass) -> Self {
        Self {
            tunnel: true,
            ..Self::road(road_class)
        }
    }

    pub(crate) fn named(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub(crate) fn with_tunnel_name(mut self, name: &str) -> Self {
        self.tagged.push(TaggedName::new(TaggedNameKind::Tunnel, name));
        self
    }

    pub(crate) fn pronounced(mut self, value: &str) -> Self {
        self.tagged
            .push(TaggedName::new(TaggedNameKind::Pronunciation, value));
        self
    }
}

pub(crate) fn leg(specs: &[EdgeSpec]) -> TripLeg {
    let location = |i: usize| [i as f64 * EDGE_DEGREES, 0.0];
    let mut nodes: Vec<TripNode> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| TripNode {
            location: location(i),
            edge: Some(TripEdge {
                id: GraphId::new(0, i as u32),
                tunnel: spec.tunnel,
                bridge: false,
                road_class: spec.road_class,
                names: spec.names.clone(),
                tagged_name: spec.tagged.clone(),
                length_m: haversine_distance(location(i), location(i + 1)),
                speed_kmh: 72,
                begin_heading: 90,
                end_heading: 90,
                end_location: location(i + 1),
            }),
        })
        .collect();
    nodes.push(TripNode {
        location: location(specs.len()),
        edge: None,
    });
    TripLeg::new(nodes)
}
