use std::path::PathBuf;

use butterfly_narrate::config::NarrateConfig;
use butterfly_narrate::ingest::{Scene, TileBuilder};
use butterfly_narrate::narrative::SegmentPolicy;

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_sample_scenes_build() {
    for (file, nodes, edges) in [
        ("scenes/fort_mchenry.toml", 8, 7),
        ("scenes/pronunciation.toml", 4, 6),
    ] {
        let scene = Scene::load(manifest_path(file)).unwrap();
        let built = TileBuilder::new(0).build(&scene).unwrap();
        assert_eq!(built.tile.node_count(), nodes, "{file}");
        assert_eq!(built.tile.edge_count(), edges, "{file}");
    }
}

#[test]
fn test_sample_config_loads() {
    let config = NarrateConfig::load(manifest_path("narrate.toml")).unwrap();
    assert_eq!(config.segmenter.policy, SegmentPolicy::EdgePerStep);
    assert!(config.narrative.pretty);
}
