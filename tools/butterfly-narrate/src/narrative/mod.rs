//! Route narrative: trip leg -> steps -> OSRM-compatible JSON
//!
//! ```text
//! TripLeg -> segmenter::segment -> Vec<Step> (with intersections) -> osrm::serialize_route
//! ```

pub mod intersections;
pub mod osrm;
pub mod segmenter;

#[cfg(test)]
pub(crate) mod test_support;

pub use intersections::Intersection;
pub use osrm::{serialize_route, to_json_string, NarrativeError, NarrativeOptions, OsrmResponse};
pub use segmenter::{segment, BoundaryCauses, SegmentPolicy, Step, StepKind};

use crate::trip::TripLeg;

/// Segment and serialize in one go
pub fn narrate(
    leg: &TripLeg,
    policy: SegmentPolicy,
    options: &NarrativeOptions,
) -> Result<OsrmResponse, NarrativeError> {
    let steps = segment(leg, policy);
    serialize_route(leg, &steps, options)
}
