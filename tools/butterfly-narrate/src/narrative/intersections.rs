//! Intersection classification
//!
//! One intersection per edge a step traverses, located at the node the edge
//! leaves from, plus a single arrival intersection at the destination.

use serde::Serialize;

use crate::formats::tagged_names::TaggedNameKind;
use crate::geo::{reverse_bearing, LonLat};
use crate::trip::{TripEdge, TripLeg};

pub const TUNNEL_CLASS: &str = "tunnel";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Intersection {
    pub location: LonLat,
    /// Ascending, degrees clockwise from north
    pub bearings: Vec<u16>,
    pub entry: Vec<bool>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_index: Option<usize>,
    #[serde(rename = "out", skip_serializing_if = "Option::is_none")]
    pub out_index: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tunnel_name: Option<String>,
}

/// `"tunnel"` first for tunnel edges, then the road class
pub fn classes(edge: &TripEdge) -> Vec<String> {
    let mut classes = Vec::with_capacity(2);
    if edge.tunnel {
        classes.push(TUNNEL_CLASS.to_string());
    }
    classes.push(edge.road_class.as_str().to_string());
    classes
}

/// First non-empty tunnel tagged name, only on tunnel edges
pub fn tunnel_name(edge: &TripEdge) -> Option<String> {
    if !edge.tunnel {
        return None;
    }
    edge.tagged_name
        .iter()
        .find(|t| t.kind == TaggedNameKind::Tunnel && !t.value.is_empty())
        .map(|t| t.value.clone())
}

/// Intersection where leg edge `index` begins; `None` past the last edge
pub fn departure(leg: &TripLeg, index: usize) -> Option<Intersection> {
    let edge = leg.edge(index)?;
    let location = leg.node(index)?.location;
    let out = edge.begin_heading;

    let incoming = index
        .checked_sub(1)
        .and_then(|prev| leg.edge(prev))
        .map(|prev| reverse_bearing(prev.end_heading));

    let (bearings, entry, in_index, out_index) = match incoming {
        None => (vec![out], vec![true], None, Some(0)),
        // u-turn: arrive and leave along the same bearing
        Some(inb) if inb == out => (vec![out], vec![true], Some(0), Some(0)),
        Some(inb) if inb < out => (vec![inb, out], vec![false, true], Some(0), Some(1)),
        Some(inb) => (vec![out, inb], vec![true, false], Some(1), Some(0)),
    };

    Some(Intersection {
        location,
        bearings,
        entry,
        in_index,
        out_index,
        classes: classes(edge),
        tunnel_name: tunnel_name(edge),
    })
}

/// Destination intersection: no way out, no classes, no tunnel name
pub fn arrival(leg: &TripLeg) -> Intersection {
    let (bearings, entry, in_index) = match leg.edges().last() {
        Some(last) => (vec![reverse_bearing(last.end_heading)], vec![true], Some(0)),
        None => (Vec::new(), Vec::new(), None),
    };
    Intersection {
        location: leg.destination(),
        bearings,
        entry,
        in_index,
        out_index: None,
        classes: Vec::new(),
        tunnel_name: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::RoadClass;
    use crate::narrative::test_support::{leg, EdgeSpec};

    #[test]
    fn test_classes_are_tunnel_first() {
        let leg = leg(&[
            EdgeSpec::road(RoadClass::Motorway),
            EdgeSpec::tunnel(RoadClass::Motorway, "Fort McHenry Tunnel"),
        ]);
        assert_eq!(classes(leg.edge(0).unwrap()), vec!["motorway"]);
        assert_eq!(classes(leg.edge(1).unwrap()), vec!["tunnel", "motorway"]);
    }

    #[test]
    fn test_tunnel_name_presence() {
        let leg = leg(&[
            EdgeSpec::tunnel(RoadClass::Primary, "Liberty Tunnel"),
            EdgeSpec::tunnel_unnamed(RoadClass::Primary),
            // tunnel name on an edge that is not a tunnel
            EdgeSpec::road(RoadClass::Primary).with_tunnel_name("Liberty Tunnel"),
            EdgeSpec::tunnel(RoadClass::Primary, ""),
        ]);
        assert_eq!(tunnel_name(leg.edge(0).unwrap()), Some("Liberty Tunnel".to_string()));
        assert_eq!(tunnel_name(leg.edge(1).unwrap()), None);
        assert_eq!(tunnel_name(leg.edge(2).unwrap()), None);
        assert_eq!(tunnel_name(leg.edge(3).unwrap()), None);
    }

    #[test]
    fn test_empty_tunnel_name_does_not_hide_later_one() {
        let leg = leg(&[
            EdgeSpec::tunnel(RoadClass::Motorway, "").with_tunnel_name("Fort McHenry Tunnel"),
            EdgeSpec::road(RoadClass::Motorway),
        ]);
        assert_eq!(
            tunnel_name(leg.edge(0).unwrap()),
            Some("Fort McHenry Tunnel".to_string())
        );
    }

    #[test]
    fn test_bearings() {
        let leg = leg(&[
            EdgeSpec::road(RoadClass::Trunk),
            EdgeSpec::road(RoadClass::Trunk),
        ]);

        let first = departure(&leg, 0).unwrap();
        assert_eq!(first.bearings, vec![90]);
        assert_eq!(first.in_index, None);
        assert_eq!(first.out_index, Some(0));

        // straight on: came in from the west (270), leaving east (90)
        let second = departure(&leg, 1).unwrap();
        assert_eq!(second.bearings, vec![90, 270]);
        assert_eq!(second.entry, vec![true, false]);
        assert_eq!(second.in_index, Some(1));
        assert_eq!(second.out_index, Some(0));
        assert_eq!(second.location, leg.node(1).unwrap().location);

        assert!(departure(&leg, 2).is_none());
    }

    #[test]
    fn test_arrival() {
        let leg = leg(&[EdgeSpec::tunnel(RoadClass::Motorway, "Fort McHenry Tunnel")]);
        let arrival = arrival(&leg);
        assert_eq!(arrival.location, leg.destination());
        assert_eq!(arrival.bearings, vec![270]);
        assert!(arrival.classes.is_empty());
        assert!(arrival.tunnel_name.is_none());

        let json = serde_json::to_value(&arrival).unwrap();
        assert!(json.get("classes").is_none());
        assert!(json.get("tunnel_name").is_none());
        assert!(json.get("out").is_none());
        assert_eq!(json["in"], 0);
    }
}
