//! Scene files: an ASCII map plus tagged ways, in TOML
//!
//! ```toml
//! grid_size_m = 100
//! map = """
//! A----B----C
//! """
//!
//! [[ways]]
//! nodes = "ABC"
//! tags = { highway = "primary", name = "Reading Road" }
//! ```
//!
//! Tag order in the file is kept; profiles rely on it for tagged names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::IngestError;

fn default_grid_size() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scene {
    pub map: String,
    #[serde(default = "default_grid_size")]
    pub grid_size_m: f64,
    #[serde(default)]
    pub ways: Vec<WaySpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaySpec {
    /// Node letters in way order, e.g. `"ABC"`
    pub nodes: String,
    #[serde(default, deserialize_with = "ordered_tags")]
    pub tags: Vec<(String, String)>,
}

impl WaySpec {
    pub fn new(nodes: &str, tags: &[(&str, &str)]) -> Self {
        Self {
            nodes: nodes.to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Non-string values (`maxspeed = 50`) are kept in their TOML spelling
fn ordered_tags<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let table = toml::Table::deserialize(deserializer)?;
    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

impl Scene {
    pub fn from_toml_str(text: &str) -> Result<Self, IngestError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENE: &str = r#"
grid_size_m = 50
map = """
A----B
"""

[[ways]]
nodes = "AB"
tags = { highway = "motorway", tunnel = "yes", "tunnel:name" = "Fort McHenry Tunnel", maxspeed = 80 }
"#;

    #[test]
    fn test_parse_keeps_tag_order() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.grid_size_m, 50.0);
        assert_eq!(scene.ways.len(), 1);

        let keys: Vec<&str> = scene.ways[0].tags.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["highway", "tunnel", "tunnel:name", "maxspeed"]);
        assert_eq!(scene.ways[0].tags[3].1, "80");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENE.as_bytes()).unwrap();

        let scene = Scene::load(file.path()).unwrap();
        assert_eq!(scene.ways[0], WaySpec::new(
            "AB",
            &[
                ("highway", "motorway"),
                ("tunnel", "yes"),
                ("tunnel:name", "Fort McHenry Tunnel"),
                ("maxspeed", "80"),
            ],
        ));
    }

    #[test]
    fn test_defaults_and_errors() {
        let scene = Scene::from_toml_str("map = \"A-B\"").unwrap();
        assert_eq!(scene.grid_size_m, 100.0);
        assert!(scene.ways.is_empty());

        assert!(matches!(
            Scene::from_toml_str("ways = []"),
            Err(IngestError::Parse(_))
        ));
        assert!(matches!(
            Scene::load("/nonexistent/scene.toml"),
            Err(IngestError::Io { .. })
        ));
    }
}
