//! OSRM-compatible route responses
//!
//! Shape: `{code, routes: [{distance, duration, weight, weight_name, legs:
//! [{distance, duration, weight, summary, steps: [...]}]}], waypoints}`.
//! Distances are metres and durations seconds, both rounded to 0.1.

use serde::Serialize;
use thiserror::Error;

use super::intersections::Intersection;
use super::segmenter::{BoundaryCauses, Step, StepKind};
use crate::formats::tagged_names::TaggedNameKind;
use crate::geo::LonLat;
use crate::trip::{TripEdge, TripLeg};

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("cannot serialize a route without steps")]
    EmptySerialization,
    #[error("failed to encode route JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeOptions {
    /// Emit `pronunciation` on steps whose first edge has one
    pub pronunciation: bool,
}

impl Default for NarrativeOptions {
    fn default() -> Self {
        Self {
            pronunciation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmResponse {
    pub code: String,
    pub routes: Vec<OsrmRoute>,
    pub waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmRoute {
    pub distance: f64,
    pub duration: f64,
    pub weight: f64,
    pub weight_name: String,
    pub legs: Vec<OsrmLeg>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmLeg {
    pub distance: f64,
    pub duration: f64,
    pub weight: f64,
    pub summary: String,
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmStep {
    pub distance: f64,
    pub duration: f64,
    pub weight: f64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    pub mode: String,
    pub driving_side: String,
    pub maneuver: OsrmManeuver,
    pub intersections: Vec<Intersection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    pub location: LonLat,
    pub bearing_before: u16,
    pub bearing_after: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsrmWaypoint {
    pub name: String,
    pub location: LonLat,
    pub distance: f64,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn joined_names(edge: Option<&TripEdge>) -> String {
    edge.map(|e| e.names.join(";")).unwrap_or_default()
}

fn maneuver_type(step: &Step) -> &'static str {
    match step.kind {
        StepKind::Depart => "depart",
        StepKind::Arrive => "arrive",
        StepKind::Continue if step.causes.contains(BoundaryCauses::NAMES) => "new name",
        StepKind::Continue => "continue",
    }
}

fn osrm_step(leg: &TripLeg, step: &Step, options: &NarrativeOptions) -> OsrmStep {
    let first = step.first_edge(leg);
    let previous = step
        .edge_range
        .start
        .checked_sub(1)
        .and_then(|i| leg.edge(i));

    let (location, named_edge) = if step.is_arrival() {
        (leg.destination(), leg.edges().last())
    } else {
        let location = leg
            .node(step.edge_range.start)
            .map_or(leg.destination(), |n| n.location);
        (location, first)
    };

    let pronunciation = first
        .filter(|_| options.pronunciation)
        .and_then(|e| e.first_tagged(TaggedNameKind::Pronunciation))
        .map(str::to_string);

    let duration = round1(step.duration_s(leg));
    OsrmStep {
        distance: round1(step.length_m(leg)),
        duration,
        weight: duration,
        name: joined_names(named_edge),
        pronunciation,
        mode: "driving".to_string(),
        driving_side: "right".to_string(),
        maneuver: OsrmManeuver {
            kind: maneuver_type(step).to_string(),
            location,
            bearing_before: previous.map_or(0, |e| e.end_heading),
            bearing_after: first.map_or(0, |e| e.begin_heading),
        },
        intersections: step.intersections.clone(),
    }
}

/// Names of the (at most) two longest named steps, in travel order
fn summary(steps: &[OsrmStep]) -> String {
    let mut named: Vec<(usize, &OsrmStep)> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.name.is_empty() && s.maneuver.kind != "arrive")
        .collect();
    named.sort_by(|a, b| b.1.distance.total_cmp(&a.1.distance).then(a.0.cmp(&b.0)));
    named.truncate(2);
    named.sort_by_key(|(i, _)| *i);

    let mut parts: Vec<&str> = Vec::new();
    for (_, step) in named {
        if !parts.contains(&step.name.as_str()) {
            parts.push(&step.name);
        }
    }
    parts.join(", ")
}

pub fn serialize_route(
    leg: &TripLeg,
    steps: &[Step],
    options: &NarrativeOptions,
) -> Result<OsrmResponse, NarrativeError> {
    if steps.is_empty() {
        return Err(NarrativeError::EmptySerialization);
    }

    let osrm_steps: Vec<OsrmStep> = steps.iter().map(|s| osrm_step(leg, s, options)).collect();
    let distance = round1(leg.length_m());
    let duration = round1(leg.duration_s());

    let waypoints = vec![
        OsrmWaypoint {
            name: joined_names(leg.edges().next()),
            location: leg.origin(),
            distance: 0.0,
        },
        OsrmWaypoint {
            name: joined_names(leg.edges().last()),
            location: leg.destination(),
            distance: 0.0,
        },
    ];

    tracing::debug!(
        steps = osrm_steps.len(),
        distance,
        duration,
        "serialized OSRM route"
    );

    Ok(OsrmResponse {
        code: "Ok".to_string(),
        routes: vec![OsrmRoute {
            distance,
            duration,
            weight: duration,
            weight_name: "auto".to_string(),
            legs: vec![OsrmLeg {
                distance,
                duration,
                weight: duration,
                summary: summary(&osrm_steps),
                steps: osrm_steps,
            }],
        }],
        waypoints,
    })
}

pub fn to_json_string(response: &OsrmResponse, pretty: bool) -> Result<String, NarrativeError> {
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::attributes::RoadClass;
    use crate::narrative::segmenter::{segment, SegmentPolicy};
    use crate::narrative::test_support::{leg, EdgeSpec};

    fn to_value(leg: &TripLeg, policy: SegmentPolicy, options: NarrativeOptions) -> Value {
        let steps = segment(leg, policy);
        let response = serialize_route(leg, &steps, &options).unwrap();
        serde_json::to_value(&response).unwrap()
    }

    #[test]
    fn test_empty_steps_rejected() {
        let leg = leg(&[EdgeSpec::road(RoadClass::Primary)]);
        assert!(matches!(
            serialize_route(&leg, &[], &NarrativeOptions::default()),
            Err(NarrativeError::EmptySerialization)
        ));
    }

    #[test]
    fn test_response_shape() {
        let leg = leg(&[
            EdgeSpec::road(RoadClass::Primary).named("Reading Road"),
            EdgeSpec::road(RoadClass::Primary).named("Houston Street"),
        ]);
        let json = to_value(&leg, SegmentPolicy::EdgePerStep, NarrativeOptions::default());

        assert_eq!(json["code"], "Ok");
        assert_eq!(json["waypoints"].as_array().unwrap().len(), 2);
        let route = &json["routes"][0];
        assert_eq!(route["distance"], 200.0);
        assert_eq!(route["duration"], 10.0);
        assert_eq!(route["weight_name"], "auto");

        let steps = route["legs"][0]["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["maneuver"]["type"], "depart");
        assert_eq!(steps[0]["maneuver"]["bearing_before"], 0);
        assert_eq!(steps[0]["maneuver"]["bearing_after"], 90);
        assert_eq!(steps[0]["name"], "Reading Road");
        assert_eq!(steps[0]["mode"], "driving");
        assert_eq!(steps[0]["distance"], 100.0);
        assert_eq!(steps[1]["maneuver"]["type"], "new name");
        assert_eq!(steps[1]["maneuver"]["bearing_before"], 90);
        assert_eq!(steps[2]["maneuver"]["type"], "arrive");
        assert_eq!(steps[2]["distance"], 0.0);
        assert_eq!(steps[2]["name"], "Houston Street");

        assert_eq!(route["legs"][0]["summary"], "Reading Road, Houston Street");
    }

    #[test]
    fn test_tunnel_intersections() {
        let leg = leg(&[
            EdgeSpec::road(RoadClass::Motorway),
            EdgeSpec::tunnel(RoadClass::Motorway, "Fort McHenry Tunnel"),
            EdgeSpec::road(RoadClass::Motorway),
        ]);
        let json = to_value(&leg, SegmentPolicy::EdgePerStep, NarrativeOptions::default());
        let steps = json["routes"][0]["legs"][0]["steps"].as_array().unwrap();

        let tunnel = &steps[1]["intersections"][0];
        assert_eq!(tunnel["classes"], serde_json::json!(["tunnel", "motorway"]));
        assert_eq!(tunnel["tunnel_name"], "Fort McHenry Tunnel");

        for i in [0, 2] {
            let plain = &steps[i]["intersections"][0];
            assert_eq!(plain["classes"], serde_json::json!(["motorway"]));
            assert!(plain.get("tunnel_name").is_none());
        }
        assert_eq!(steps[1]["maneuver"]["type"], "continue");
    }

    #[test]
    fn test_pronunciation_toggle() {
        let leg = leg(&[EdgeSpec::road(RoadClass::Primary)
            .named("Reading Road")
            .pronounced("ˈrɛdɪŋ ˈɹoʊd")]);

        let on = to_value(&leg, SegmentPolicy::EdgePerStep, NarrativeOptions::default());
        let step = &on["routes"][0]["legs"][0]["steps"][0];
        assert_eq!(step["pronunciation"], "ˈrɛdɪŋ ˈɹoʊd");

        let off = to_value(
            &leg,
            SegmentPolicy::EdgePerStep,
            NarrativeOptions {
                pronunciation: false,
            },
        );
        assert!(off["routes"][0]["legs"][0]["steps"][0]
            .get("pronunciation")
            .is_none());
    }

    #[test]
    fn test_json_string() {
        let leg = leg(&[EdgeSpec::road(RoadClass::Residential)]);
        let steps = segment(&leg, SegmentPolicy::default());
        let response = serialize_route(&leg, &steps, &NarrativeOptions::default()).unwrap();

        let compact = to_json_string(&response, false).unwrap();
        let pretty = to_json_string(&response, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let reparsed: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(reparsed, serde_json::to_value(&response).unwrap());
    }
}
