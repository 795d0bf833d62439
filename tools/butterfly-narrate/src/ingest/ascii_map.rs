//! ASCII-drawn road maps
//!
//! Every capital letter is a node. Characters sit on a square grid: one column
//! east or one row south moves `grid_size_m` metres. The first row containing a
//! node is anchored at latitude 0 and the leftmost column of the drawing at
//! longitude 0. Everything else (`-`, `|`, `\`, `/`, spaces) is decoration.

use std::collections::BTreeMap;

use super::IngestError;
use crate::geo::LonLat;

/// Metres per degree along the equator for the haversine sphere used in `geo`
const METRES_PER_DEGREE: f64 = 6_371_008.8 * std::f64::consts::PI / 180.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AsciiMap {
    nodes: BTreeMap<char, LonLat>,
}

impl AsciiMap {
    pub fn parse(text: &str, grid_size_m: f64) -> Result<Self, IngestError> {
        if !(grid_size_m.is_finite() && grid_size_m > 0.0) {
            return Err(IngestError::InvalidGridSize(grid_size_m));
        }

        let step = grid_size_m / METRES_PER_DEGREE;
        let mut first_row = None;
        let mut nodes = BTreeMap::new();

        for (row, line) in text.lines().enumerate() {
            for (col, c) in line.chars().enumerate() {
                if !c.is_ascii_uppercase() {
                    continue;
                }
                let top = *first_row.get_or_insert(row);
                let location = [col as f64 * step, -((row - top) as f64) * step];
                if nodes.insert(c, location).is_some() {
                    return Err(IngestError::DuplicateNode(c));
                }
            }
        }

        if nodes.is_empty() {
            return Err(IngestError::EmptyMap);
        }
        Ok(Self { nodes })
    }

    pub fn location(&self, name: char) -> Option<LonLat> {
        self.nodes.get(&name).copied()
    }

    /// Nodes in letter order
    pub fn nodes(&self) -> impl Iterator<Item = (char, LonLat)> + '_ {
        self.nodes.iter().map(|(c, l)| (*c, *l))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::haversine_distance;

    #[test]
    fn test_grid_distances() {
        let map = AsciiMap::parse(
            r"
    A----B
         |
         C",
            100.0,
        )
        .unwrap();

        let a = map.location('A').unwrap();
        let b = map.location('B').unwrap();
        let c = map.location('C').unwrap();
        assert_eq!(map.len(), 3);
        assert!((haversine_distance(a, b) - 500.0).abs() < 0.01);
        assert!((haversine_distance(b, c) - 200.0).abs() < 0.01);
        assert_eq!(a[1], 0.0);
        assert!(c[1] < 0.0);
    }

    #[test]
    fn test_decoration_is_ignored() {
        let map = AsciiMap::parse("A-\\/|x B", 10.0).unwrap();
        let names: Vec<char> = map.nodes().map(|(c, _)| c).collect();
        assert_eq!(names, vec!['A', 'B']);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            AsciiMap::parse("A--A", 100.0),
            Err(IngestError::DuplicateNode('A'))
        ));
        assert!(matches!(
            AsciiMap::parse("--|--", 100.0),
            Err(IngestError::EmptyMap)
        ));
        assert!(matches!(
            AsciiMap::parse("A--B", 0.0),
            Err(IngestError::InvalidGridSize(_))
        ));
    }
}
