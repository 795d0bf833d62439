//! CLI commands for butterfly-narrate

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::NarrateConfig;
use crate::formats::Tile;
use crate::graph::{GraphId, TileSet};
use crate::ingest::{Scene, TileBuilder};
use crate::logging::{self, LogFormat};
use crate::narrative::{self, SegmentPolicy};
use crate::search::{self, DijkstraSearch, PathSearch};
use crate::trip;

#[derive(Parser)]
#[command(name = "butterfly-narrate")]
#[command(about = "Tagged-name tiles, trip legs and OSRM-style route narratives", long_about = None)]
pub struct Cli {
    /// Configuration file (narrate.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// OSRM-compatible route response
    Osrm,
    /// Structured trip leg
    Trip,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a tile from an ASCII-map scene file
    Build {
        /// Scene file (TOML)
        #[arg(long)]
        scene: PathBuf,

        /// Output tile file
        #[arg(short, long)]
        output: PathBuf,

        /// Tile id to assign
        #[arg(long, default_value = "0")]
        tile_id: u32,
    },

    /// Route between two coordinates and print the narrative as JSON
    Route {
        /// Tile file(s) to load
        #[arg(long, required = true)]
        tile: Vec<PathBuf>,

        /// Start coordinate (lat,lon)
        #[arg(long)]
        from: String,

        /// End coordinate (lat,lon)
        #[arg(long)]
        to: String,

        #[arg(long, value_enum, default_value = "osrm")]
        format: OutputFormat,

        /// Step segmentation policy (edge_per_step, attribute_runs)
        #[arg(long)]
        policy: Option<SegmentPolicy>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Dump every directed edge of a tile with its attributes
    Inspect {
        /// Tile file
        #[arg(long)]
        tile: PathBuf,
    },
}

fn parse_coord(s: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        anyhow::bail!("Coordinate must be in format 'lat,lon', got '{s}'");
    }
    let lat = parts[0].trim().parse::<f64>()?;
    let lon = parts[1].trim().parse::<f64>()?;
    Ok((lat, lon))
}

fn load_tiles(paths: &[PathBuf]) -> Result<TileSet> {
    let mut tiles = TileSet::new();
    for path in paths {
        let tile = Tile::read(path).with_context(|| format!("loading tile {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            tile_id = tile.tile_id(),
            nodes = tile.node_count(),
            edges = tile.edge_count(),
            "loaded tile"
        );
        tiles.insert(tile);
    }
    Ok(tiles)
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => NarrateConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => NarrateConfig::default(),
        };
        logging::init(self.log_format.unwrap_or(config.logging.format))
            .context("installing log subscriber")?;

        match self.command {
            Commands::Build {
                scene,
                output,
                tile_id,
            } => {
                let parsed = Scene::load(&scene)
                    .with_context(|| format!("reading scene {}", scene.display()))?;
                let built = TileBuilder::new(tile_id).build(&parsed)?;
                built
                    .tile
                    .write(&output)
                    .with_context(|| format!("writing tile {}", output.display()))?;

                println!("✓ Wrote {}", output.display());
                println!(
                    "  tile {}: {} nodes, {} directed edges",
                    built.tile.tile_id(),
                    built.tile.node_count(),
                    built.tile.edge_count()
                );
                for (name, id) in &built.nodes {
                    let node = built.tile.node(id.index);
                    if let Some(node) = node {
                        println!("  {name} = {id} ({:.7},{:.7})", node.lat(), node.lon());
                    }
                }
            }

            Commands::Route {
                tile,
                from,
                to,
                format,
                policy,
                pretty,
            } => {
                let tiles = load_tiles(&tile)?;
                let (from_lat, from_lon) = parse_coord(&from)?;
                let (to_lat, to_lon) = parse_coord(&to)?;

                let origin = search::nearest_node(&tiles, from_lat, from_lon)
                    .ok_or_else(|| anyhow::anyhow!("Could not find start node"))?;
                let destination = search::nearest_node(&tiles, to_lat, to_lon)
                    .ok_or_else(|| anyhow::anyhow!("Could not find goal node"))?;

                let path = DijkstraSearch.find_path(&tiles, origin, destination)?;
                let leg = trip::assemble_leg(&tiles, &path)?;
                let pretty = pretty || config.narrative.pretty;

                let json = match format {
                    OutputFormat::Trip => {
                        if pretty {
                            serde_json::to_string_pretty(&leg)?
                        } else {
                            serde_json::to_string(&leg)?
                        }
                    }
                    OutputFormat::Osrm => {
                        let policy = policy.unwrap_or(config.segmenter.policy);
                        let response =
                            narrative::narrate(&leg, policy, &config.narrative_options())?;
                        narrative::to_json_string(&response, pretty)?
                    }
                };
                println!("{json}");
            }

            Commands::Inspect { tile } => {
                let tiles = load_tiles(std::slice::from_ref(&tile))?;
                for tile_id in tiles.tile_ids() {
                    let edge_count = tiles.tile(tile_id)?.edge_count();
                    for index in 0..edge_count {
                        let id = GraphId::new(tile_id, index);
                        let edge = tiles.edge(id)?;
                        let start = tiles.edge_start_node(id)?;
                        let tagged: Vec<String> = edge
                            .tagged_names()
                            .iter()
                            .map(|t| format!("{}={}", t.kind, t.value))
                            .collect();
                        println!(
                            "{id} {start}->{} class={} tunnel={} bridge={} length={:.1}m speed={}km/h names={:?} tagged=[{}]",
                            edge.end_node(),
                            edge.road_class(),
                            edge.tunnel(),
                            edge.bridge(),
                            edge.length_m(),
                            edge.speed_kmh(),
                            edge.names(),
                            tagged.join(", ")
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
