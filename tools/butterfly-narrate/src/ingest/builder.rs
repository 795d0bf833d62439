//! Scene -> tile
//!
//! One tile node per map letter (letter order), one edge-info record per way
//! segment shared by both of its directed edges.

use std::collections::BTreeMap;

use butterfly_common::Error as CommonError;

use super::{AsciiMap, IngestError, Scene};
use crate::attributes::edge_flags;
use crate::formats::edge_info;
use crate::formats::{EdgeRecord, Tile, TileWriter};
use crate::geo::haversine_distance;
use crate::graph::GraphId;
use crate::profiles::car::{CarProfile, WayOutcome, KNOWN_HIGHWAYS};

/// A built tile plus the graph id of every map letter
#[derive(Debug)]
pub struct BuiltScene {
    pub tile: Tile,
    pub nodes: BTreeMap<char, GraphId>,
}

impl BuiltScene {
    pub fn node(&self, name: char) -> Option<GraphId> {
        self.nodes.get(&name).copied()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildStats {
    pub ways_routable: usize,
    pub ways_skipped: usize,
    pub edges: usize,
}

pub struct TileBuilder {
    tile_id: u32,
}

impl TileBuilder {
    pub fn new(tile_id: u32) -> Self {
        Self { tile_id }
    }

    pub fn build(&self, scene: &Scene) -> Result<BuiltScene, IngestError> {
        let map = AsciiMap::parse(&scene.map, scene.grid_size_m)?;
        let mut writer = TileWriter::new(self.tile_id);
        let mut stats = BuildStats::default();

        let mut index = BTreeMap::new();
        for (name, [lon, lat]) in map.nodes() {
            index.insert(name, writer.add_node(lat, lon));
        }

        for (way_idx, way) in scene.ways.iter().enumerate() {
            let way_id = way_idx as i64 + 1;
            let letters: Vec<char> = way.nodes.chars().collect();
            if letters.len() < 2 {
                return Err(IngestError::WayTooShort {
                    way: way.nodes.clone(),
                });
            }
            let nodes = letters
                .iter()
                .map(|c| {
                    index.get(c).copied().ok_or_else(|| IngestError::UnknownNode {
                        way: way.nodes.clone(),
                        node: *c,
                    })
                })
                .collect::<Result<Vec<u32>, _>>()?;

            let profile = match CarProfile::process_way(&way.tags) {
                WayOutcome::Routable(profile) => profile,
                WayOutcome::UnknownHighway(value) => {
                    let err = CommonError::unknown_value("highway", &value, KNOWN_HIGHWAYS);
                    tracing::warn!(way = %way.nodes, "{err}, skipping way");
                    stats.ways_skipped += 1;
                    continue;
                }
                outcome => {
                    tracing::debug!(way = %way.nodes, ?outcome, "way not routable by car, skipping");
                    stats.ways_skipped += 1;
                    continue;
                }
            };
            stats.ways_routable += 1;

            let mut flags = 0u16;
            if profile.tunnel {
                flags |= edge_flags::TUNNEL;
            }
            if profile.bridge {
                flags |= edge_flags::BRIDGE;
            }

            for (pair, ids) in letters.windows(2).zip(nodes.windows(2)) {
                let (a, b) = (ids[0], ids[1]);
                let (Some(from), Some(to)) = (map.location(pair[0]), map.location(pair[1])) else {
                    continue;
                };
                let length_mm = (haversine_distance(from, to) * 1000.0).round() as u32;

                let record = edge_info::encode_record(way_id, &profile.names, &profile.tagged_names)
                    .map_err(|source| IngestError::EdgeInfo {
                        way: way.nodes.clone(),
                        source,
                    })?;
                let edge_info_offset = writer.add_edge_info(&record)?;

                let edge = |end_node, flags| EdgeRecord {
                    end_tile: self.tile_id,
                    end_node,
                    edge_info_offset,
                    length_mm,
                    speed_kmh: profile.speed_kmh,
                    flags,
                    road_class: profile.road_class as u8,
                };
                if profile.access_fwd {
                    writer.add_edge(a, edge(b, flags | edge_flags::FORWARD));
                    stats.edges += 1;
                }
                if profile.access_rev {
                    writer.add_edge(b, edge(a, flags));
                    stats.edges += 1;
                }
            }
        }

        let tile = writer.finish()?;
        tracing::info!(
            tile_id = self.tile_id,
            nodes = tile.node_count(),
            edges = stats.edges,
            ways_routable = stats.ways_routable,
            ways_skipped = stats.ways_skipped,
            "built tile"
        );

        let nodes = index
            .into_iter()
            .map(|(name, i)| (name, GraphId::new(self.tile_id, i)))
            .collect();
        Ok(BuiltScene { tile, nodes })
    }
}
