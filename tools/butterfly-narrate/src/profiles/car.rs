//! Car routing profile - Tag semantics for automobile routing
//!
//! Turns a way's tags into per-edge attributes: access, speed, road class,
//! tunnel/bridge flags, street names and tagged names.

use crate::attributes::RoadClass;
use crate::formats::tagged_names::{TaggedName, TaggedNameKind};
use crate::profiles::tag_lookup::TagLookup;

/// Highway values the car profile knows about, routable or not
pub const KNOWN_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "service",
    "living_street",
    "track",
    "footway",
    "path",
    "cycleway",
    "pedestrian",
    "steps",
    "construction",
];

/// Tag keys that produce tagged names, with the kind they produce
const TAGGED_NAME_KEYS: &[(&str, TaggedNameKind)] = &[
    ("tunnel:name", TaggedNameKind::Tunnel),
    ("bridge:name", TaggedNameKind::Bridge),
    ("name:pronunciation", TaggedNameKind::Pronunciation),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WayOutcome {
    Routable(EdgeProfile),
    /// Known highway type without car access, or access explicitly denied
    NoAccess,
    /// No highway tag at all
    NotHighway,
    /// Highway value outside [`KNOWN_HIGHWAYS`]
    UnknownHighway(String),
}

/// Attributes shared by both directions of a routable way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeProfile {
    pub access_fwd: bool,
    pub access_rev: bool,
    pub road_class: RoadClass,
    pub speed_kmh: u16,
    pub tunnel: bool,
    pub bridge: bool,
    pub names: Vec<String>,
    pub tagged_names: Vec<TaggedName>,
}

pub struct CarProfile;

impl CarProfile {
    pub fn process_way(tags: &[(String, String)]) -> WayOutcome {
        let tags = TagLookup::new(tags);

        let Some(highway) = tags.get_str("highway") else {
            return WayOutcome::NotHighway;
        };

        let (road_class, speed_kmh) = match highway {
            "motorway" => (RoadClass::Motorway, 110),
            "motorway_link" => (RoadClass::Motorway, 60),
            "trunk" => (RoadClass::Trunk, 90),
            "trunk_link" => (RoadClass::Trunk, 50),
            "primary" => (RoadClass::Primary, 70),
            "primary_link" => (RoadClass::Primary, 40),
            "secondary" => (RoadClass::Secondary, 60),
            "secondary_link" => (RoadClass::Secondary, 40),
            "tertiary" => (RoadClass::Tertiary, 50),
            "tertiary_link" => (RoadClass::Tertiary, 30),
            "unclassified" => (RoadClass::Unclassified, 50),
            "residential" => (RoadClass::Residential, 30),
            "living_street" => (RoadClass::Residential, 10),
            "service" => (RoadClass::ServiceOther, 20),
            other if KNOWN_HIGHWAYS.contains(&other) => return WayOutcome::NoAccess,
            other => return WayOutcome::UnknownHighway(other.to_string()),
        };

        let motor_vehicle = tags.get_str("motor_vehicle");
        let vehicle = tags.get_str("vehicle");
        let access = tags.get_str("access");
        if is_denied(motor_vehicle) || is_denied(vehicle) || is_denied(access) {
            return WayOutcome::NoAccess;
        }

        let (mut access_fwd, mut access_rev) = (true, true);
        match tags.get_str("oneway") {
            Some("yes" | "1" | "true") => access_rev = false,
            Some("-1" | "reverse") => access_fwd = false,
            Some("no") => {}
            // Motorways are oneway unless tagged otherwise
            _ if highway == "motorway" || highway == "motorway_link" => access_rev = false,
            _ => {}
        }

        let tunnel = is_tunnel(tags.get_str("tunnel"));
        let bridge = is_bridge(tags.get_str("bridge"));

        let speed_kmh = tags
            .get_str("maxspeed")
            .and_then(parse_maxspeed)
            .unwrap_or(speed_kmh);

        let names = tags
            .get_str("name")
            .map(|n| {
                n.split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        WayOutcome::Routable(EdgeProfile {
            access_fwd,
            access_rev,
            road_class,
            speed_kmh,
            tunnel,
            bridge,
            names,
            tagged_names: tagged_names(&tags, tunnel, bridge),
        })
    }
}

/// Tagged names in tag order. Structure names only count on matching structures.
fn tagged_names(tags: &TagLookup<'_>, tunnel: bool, bridge: bool) -> Vec<TaggedName> {
    tags.iter()
        .filter_map(|(key, value)| {
            let (_, kind) = TAGGED_NAME_KEYS.iter().find(|(k, _)| *k == key)?;
            let applies = match kind {
                TaggedNameKind::Tunnel => tunnel,
                TaggedNameKind::Bridge => bridge,
                TaggedNameKind::Pronunciation => true,
            };
            (applies && !value.is_empty()).then(|| TaggedName::new(*kind, value))
        })
        .collect()
}

/// Note: "destination" stays routable
fn is_denied(value: Option<&str>) -> bool {
    matches!(value, Some("no") | Some("private"))
}

fn is_tunnel(value: Option<&str>) -> bool {
    matches!(
        value,
        Some("yes" | "building_passage" | "culvert" | "covered")
    )
}

fn is_bridge(value: Option<&str>) -> bool {
    matches!(
        value,
        Some("yes" | "viaduct" | "aqueduct" | "boardwalk" | "cantilever" | "movable")
    )
}

/// Plain km/h or `<n> mph`
fn parse_maxspeed(value: &str) -> Option<u16> {
    let value = value.trim();
    if let Some(mph) = value.strip_suffix("mph") {
        let mph: f64 = mph.trim().parse().ok()?;
        return Some((mph * 1.609_344).round() as u16);
    }
    value.parse().ok().filter(|v| *v > 0)
}
