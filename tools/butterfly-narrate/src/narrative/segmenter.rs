//! Maneuver segmentation
//!
//! Walks the edge boundaries of a [`TripLeg`] and groups edges into steps. At
//! each boundary `i | i+1` the causes are collected into one [`BoundaryCauses`]
//! set; the [`SegmentPolicy`] decides whether that set opens a new step. The
//! edge after the boundary always starts the new step. A zero-length arrival
//! step closes every segmentation.

use std::fmt;
use std::ops::{BitOr, BitOrAssign, Range};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::intersections::{self, Intersection};
use crate::trip::{TripEdge, TripLeg};

/// Why a step boundary exists, as a bit set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoundaryCauses(u8);

impl BoundaryCauses {
    pub const TUNNEL_ENTER: Self = Self(1 << 0);
    pub const TUNNEL_EXIT: Self = Self(1 << 1);
    pub const ROAD_CLASS: Self = Self(1 << 2);
    pub const NAMES: Self = Self(1 << 3);
    /// Set on every edge boundary
    pub const EDGE: Self = Self(1 << 4);

    const ATTRIBUTES: Self = Self(
        Self::TUNNEL_ENTER.0 | Self::TUNNEL_EXIT.0 | Self::ROAD_CLASS.0 | Self::NAMES.0,
    );

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Causes found between two consecutive edges
    pub fn between(prev: &TripEdge, next: &TripEdge) -> Self {
        let mut causes = Self::EDGE;
        match (prev.tunnel, next.tunnel) {
            (false, true) => causes |= Self::TUNNEL_ENTER,
            (true, false) => causes |= Self::TUNNEL_EXIT,
            _ => {}
        }
        if prev.road_class != next.road_class {
            causes |= Self::ROAD_CLASS;
        }
        if prev.names != next.names {
            causes |= Self::NAMES;
        }
        causes
    }
}

impl BitOr for BoundaryCauses {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BoundaryCauses {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for BoundaryCauses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = [
            (Self::TUNNEL_ENTER, "tunnel_enter"),
            (Self::TUNNEL_EXIT, "tunnel_exit"),
            (Self::ROAD_CLASS, "road_class"),
            (Self::NAMES, "names"),
            (Self::EDGE, "edge"),
        ];
        let mut first = true;
        for (flag, label) in labels {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(label)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// When a boundary opens a new step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum SegmentPolicy {
    /// Every edge is its own step
    #[default]
    EdgePerStep,
    /// Split only on tunnel, road class or name changes
    AttributeRuns,
}

impl SegmentPolicy {
    pub const NAMES: &'static [&'static str] = &["edge_per_step", "attribute_runs"];

    pub const fn as_str(self) -> &'static str {
        match self {
            SegmentPolicy::EdgePerStep => "edge_per_step",
            SegmentPolicy::AttributeRuns => "attribute_runs",
        }
    }

    pub fn splits(self, causes: BoundaryCauses) -> bool {
        match self {
            SegmentPolicy::EdgePerStep => causes.contains(BoundaryCauses::EDGE),
            SegmentPolicy::AttributeRuns => causes.intersects(BoundaryCauses::ATTRIBUTES),
        }
    }
}

impl fmt::Display for SegmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentPolicy {
    type Err = butterfly_common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "edge_per_step" => Ok(SegmentPolicy::EdgePerStep),
            "attribute_runs" => Ok(SegmentPolicy::AttributeRuns),
            _ => Err(butterfly_common::Error::unknown_value(
                "segment policy",
                s,
                Self::NAMES,
            )),
        }
    }
}

impl TryFrom<String> for SegmentPolicy {
    type Error = butterfly_common::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Depart,
    Continue,
    Arrive,
}

/// A contiguous run of leg edges sharing one instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Edge indices into the leg; empty for the arrival step
    pub edge_range: Range<usize>,
    /// Causes at the boundary that opened this step; empty for depart and arrive
    pub causes: BoundaryCauses,
    pub kind: StepKind,
    pub intersections: Vec<Intersection>,
}

impl Step {
    pub fn is_arrival(&self) -> bool {
        self.kind == StepKind::Arrive
    }

    /// Edges of this step, in order
    pub fn edges<'a>(&self, leg: &'a TripLeg) -> impl Iterator<Item = &'a TripEdge> + 'a {
        let range = self.edge_range.clone();
        range.filter_map(move |i| leg.edge(i))
    }

    pub fn first_edge<'a>(&self, leg: &'a TripLeg) -> Option<&'a TripEdge> {
        if self.edge_range.is_empty() {
            None
        } else {
            leg.edge(self.edge_range.start)
        }
    }

    pub fn length_m(&self, leg: &TripLeg) -> f64 {
        self.edges(leg).map(|e| e.length_m).sum()
    }

    pub fn duration_s(&self, leg: &TripLeg) -> f64 {
        self.edges(leg).map(TripEdge::duration_s).sum()
    }
}

/// Split `leg` into steps. The leg is only read.
pub fn segment(leg: &TripLeg, policy: SegmentPolicy) -> Vec<Step> {
    let edge_count = leg.edge_count();
    let edges: Vec<&TripEdge> = leg.edges().collect();
    let mut steps = Vec::new();

    let mut start = 0;
    let mut causes = BoundaryCauses::empty();
    for i in 1..edge_count {
        let boundary = BoundaryCauses::between(edges[i - 1], edges[i]);
        if policy.splits(boundary) {
            steps.push(travel_step(leg, start..i, causes));
            tracing::trace!(edge = i, causes = %boundary, "step boundary");
            start = i;
            causes = boundary;
        }
    }
    if edge_count > 0 {
        steps.push(travel_step(leg, start..edge_count, causes));
    }

    steps.push(Step {
        edge_range: edge_count..edge_count,
        causes: BoundaryCauses::empty(),
        kind: StepKind::Arrive,
        intersections: vec![intersections::arrival(leg)],
    });

    assert!(
        steps.len() >= 2,
        "segmentation of a {edge_count}-edge leg produced {} steps",
        steps.len()
    );
    tracing::debug!(%policy, edges = edge_count, steps = steps.len(), "segmented trip leg");
    steps
}

fn travel_step(leg: &TripLeg, edge_range: Range<usize>, causes: BoundaryCauses) -> Step {
    let kind = if edge_range.start == 0 {
        StepKind::Depart
    } else {
        StepKind::Continue
    };
    let intersections = edge_range
        .clone()
        .filter_map(|i| intersections::departure(leg, i))
        .collect();
    Step {
        edge_range,
        causes,
        kind,
        intersections,
    }
}
