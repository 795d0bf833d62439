//! Shared fixtures for end-to-end narrative tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use butterfly_narrate::graph::{GraphId, TileSet};
use butterfly_narrate::ingest::{BuiltScene, Scene, TileBuilder};
use butterfly_narrate::narrative::{self, NarrativeOptions, SegmentPolicy};
use butterfly_narrate::search::{DijkstraSearch, PathSearch};
use butterfly_narrate::trip::{assemble_leg, TripLeg};
use serde_json::Value;

/// Motorway A-B-C-D-E-F with a three-edge tunnel B-C-D-E, plus the B-G-H bypass
pub const TUNNEL_SCENE: &str = "scenes/fort_mchenry.toml";

/// Two named primary roads meeting at B, each with an IPA pronunciation
pub const PRONUNCIATION_SCENE: &str = "scenes/pronunciation.toml";

pub struct Fixture {
    pub tiles: TileSet,
    pub nodes: BTreeMap<char, GraphId>,
}

impl Fixture {
    /// Build a shipped scene, `relative` to the crate root
    pub fn build(relative: &str) -> Self {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative);
        let scene = Scene::load(&path).expect("scene loads");
        let BuiltScene { tile, nodes } = TileBuilder::new(0).build(&scene).expect("scene builds");
        Self {
            tiles: TileSet::from_tiles([tile]),
            nodes,
        }
    }

    pub fn node(&self, name: char) -> GraphId {
        self.nodes[&name]
    }

    pub fn route(&self, from: char, to: char) -> TripLeg {
        let path = DijkstraSearch
            .find_path(&self.tiles, self.node(from), self.node(to))
            .expect("route exists");
        assemble_leg(&self.tiles, &path).expect("leg assembles")
    }
}

pub fn osrm_json(leg: &TripLeg, policy: SegmentPolicy) -> Value {
    let response = narrative::narrate(leg, policy, &NarrativeOptions::default())
        .expect("route serializes");
    serde_json::to_value(&response).expect("response is JSON")
}

pub fn steps(json: &Value) -> &Vec<Value> {
    json["routes"][0]["legs"][0]["steps"]
        .as_array()
        .expect("steps array")
}
