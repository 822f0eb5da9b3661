//! Exhaustive O(M·N) search.
//!
//! Every candidate is visited for every query. At catalog sizes of a few
//! hundred points this beats building any index, and it is the reference the
//! HEALPix strategy is checked against.

use super::{select_nth, Neighbor, NeighborIndex, TIE_RESOLUTION};
use crate::distance::PreparedPoint;
use crate::point::PointSet;
use skymatch_core::Angle;

pub struct ScanIndex {
    candidates: Vec<PreparedPoint>,
}

impl ScanIndex {
    pub fn new(candidates: &PointSet) -> Self {
        Self {
            candidates: candidates.iter().map(PreparedPoint::new).collect(),
        }
    }
}

impl NeighborIndex for ScanIndex {
    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn nth_nearest(&self, query: &PreparedPoint, nth: usize) -> Option<Neighbor> {
        nth_nearest_in(&self.candidates, query, nth)
    }

    fn within(&self, query: &PreparedPoint, radius: Angle) -> Vec<Neighbor> {
        within_in(&self.candidates, query, radius)
    }
}

pub(crate) fn nth_nearest_in(
    candidates: &[PreparedPoint],
    query: &PreparedPoint,
    nth: usize,
) -> Option<Neighbor> {
    if nth == 1 {
        return nearest_in(candidates, query);
    }
    let mut all: Vec<Neighbor> = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| Neighbor {
            index,
            separation: query.separation(c),
        })
        .collect();
    select_nth(&mut all, nth)
}

pub(crate) fn within_in(
    candidates: &[PreparedPoint],
    query: &PreparedPoint,
    radius: Angle,
) -> Vec<Neighbor> {
    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, c)| {
            let separation = query.separation(c);
            (separation <= radius).then_some(Neighbor { index, separation })
        })
        .collect()
}

fn nearest_in(candidates: &[PreparedPoint], query: &PreparedPoint) -> Option<Neighbor> {
    let closest = candidates
        .iter()
        .map(|c| query.separation(c).radians())
        .min_by(f64::total_cmp)?;
    let limit = closest + TIE_RESOLUTION;

    // first index inside the tie window around the closest separation
    candidates.iter().enumerate().find_map(|(index, c)| {
        let separation = query.separation(c);
        (separation.radians() <= limit).then_some(Neighbor { index, separation })
    })
}
