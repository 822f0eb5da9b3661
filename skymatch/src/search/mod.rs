//! Nearest-neighbor search over a candidate catalog.
//!
//! [`match_nearest`] pairs every query point with its closest candidate.
//! [`match_with_options`] exposes the strategy, the neighbor rank and
//! parallelism; [`search_around`] returns every pair inside a radius.
//!
//! Two strategies implement [`NeighborIndex`] and return identical results:
//!
//! - [`ScanIndex`]: exhaustive scan, O(M·N)
//! - [`HealpixIndex`]: candidates binned by HEALPix pixel, searched outward
//!   from the query's neighborhood
//!
//! # Ranking and ties
//!
//! The nearest candidate is the lowest-indexed one whose separation is within
//! [`TIE_RESOLUTION`] of the smallest separation. A query sitting midway
//! between two candidates therefore resolves to the lower index even when
//! rounding in the coordinate conversion leaves the two distances a few ulp
//! apart. The rule depends only on the set of separations, never on the order
//! candidates are visited in.
//!
//! The `nth` neighbor applies the same rule `nth` times, each time removing the
//! candidate just chosen.

pub mod healpix;
pub mod scan;

pub use healpix::HealpixIndex;
pub use scan::ScanIndex;

use crate::distance::PreparedPoint;
use crate::error::{MatchError, Result};
use crate::point::PointSet;
use crate::result::{Match, MatchResult, Pair};
use rayon::prelude::*;
use skymatch_core::math::chord_from_separation;
use skymatch_core::Angle;
use std::cmp::Ordering;

/// Separations within this of the closest one (radians, about 0.2 µas) tie.
pub const TIE_RESOLUTION: f64 = 1e-12;

/// Scan is used by [`SearchStrategy::Auto`] while `M·N` stays at or below this.
const AUTO_SCAN_MAX_PAIRS: usize = 65_536;
/// ... or while the catalog holds fewer candidates than this.
const AUTO_SCAN_MAX_CANDIDATES: usize = 2048;

/// A candidate index with its separation from some query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub separation: Angle,
}

impl Neighbor {
    /// Exact ordering by separation, then index.
    #[inline]
    pub(crate) fn cmp_by_separation(&self, other: &Self) -> Ordering {
        self.separation
            .radians()
            .total_cmp(&other.separation.radians())
            .then(self.index.cmp(&other.index))
    }
}

/// Picks the `nth` (1-based) neighbor under the tie rule in the module docs.
///
/// Reorders `neighbors`. `None` if `nth` is 0 or exceeds the slice length.
pub(crate) fn select_nth(neighbors: &mut [Neighbor], nth: usize) -> Option<Neighbor> {
    if nth == 0 || nth > neighbors.len() {
        return None;
    }
    neighbors.sort_unstable_by(Neighbor::cmp_by_separation);

    let mut taken = vec![false; neighbors.len()];
    let mut first_free = 0;
    let mut chosen = None;
    for _ in 0..nth {
        while taken[first_free] {
            first_free += 1;
        }
        let limit = neighbors[first_free].separation.radians() + TIE_RESOLUTION;
        let mut best = first_free;
        for (i, n) in neighbors.iter().enumerate().skip(first_free + 1) {
            if n.separation.radians() > limit {
                break;
            }
            if !taken[i] && n.index < neighbors[best].index {
                best = i;
            }
        }
        taken[best] = true;
        chosen = Some(neighbors[best]);
    }
    chosen
}

/// A searchable candidate catalog.
pub trait NeighborIndex: Sync {
    /// Number of candidates indexed.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `nth` closest candidate (1 = nearest), or `None` if fewer than
    /// `nth` candidates exist.
    fn nth_nearest(&self, query: &PreparedPoint, nth: usize) -> Option<Neighbor>;

    /// All candidates within `radius` of `query`, in no particular order.
    fn within(&self, query: &PreparedPoint, radius: Angle) -> Vec<Neighbor>;
}

/// How candidates are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SearchStrategy {
    /// Scan small inputs, index large ones.
    #[default]
    Auto,
    /// Exhaustive O(M·N) scan.
    Scan,
    /// HEALPix-binned candidates at the given order (nside = 2^order).
    Healpix { order: u32 },
}

impl SearchStrategy {
    /// Resolves [`Auto`](Self::Auto) against the input sizes.
    pub fn resolve(self, query_len: usize, candidate_len: usize) -> SearchStrategy {
        match self {
            SearchStrategy::Auto => {
                let pairs = query_len.saturating_mul(candidate_len);
                if pairs <= AUTO_SCAN_MAX_PAIRS || candidate_len < AUTO_SCAN_MAX_CANDIDATES {
                    SearchStrategy::Scan
                } else {
                    SearchStrategy::Healpix {
                        order: healpix::order_for_catalog(candidate_len),
                    }
                }
            }
            other => other,
        }
    }
}

/// Options for [`match_with_options`] and [`search_around_with_options`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchOptions {
    pub strategy: SearchStrategy,
    /// Neighbor rank to return: 1 is the nearest, 2 the next nearest. Use 2
    /// when matching a catalog against itself.
    pub nth_neighbor: usize,
    /// Spread queries over the rayon thread pool.
    pub parallel: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Auto,
            nth_neighbor: 1,
            parallel: false,
        }
    }
}

impl MatchOptions {
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_nth_neighbor(mut self, nth: usize) -> Self {
        self.nth_neighbor = nth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Nearest candidate for each query point.
///
/// ```
/// use skymatch::{match_nearest, PointRole, PointSet};
///
/// let catalog = PointSet::from_degrees(&[(0.0, 0.0), (90.0, 0.0)], PointRole::Candidate).unwrap();
/// let query = PointSet::from_degrees(&[(1.0, 0.0)], PointRole::Query).unwrap();
///
/// let result = match_nearest(&query, &catalog).unwrap();
/// assert_eq!(result.indices(), vec![0]);
/// ```
///
/// # Errors
/// [`MatchError::EmptyCandidateSet`] if `candidates` is empty.
pub fn match_nearest(query: &PointSet, candidates: &PointSet) -> Result<MatchResult> {
    match_with_options(query, candidates, &MatchOptions::default())
}

/// Nearest (or `nth`-nearest) candidate for each query point.
///
/// # Errors
/// - [`MatchError::EmptyCandidateSet`] if `candidates` is empty
/// - [`MatchError::InvalidParameter`] if `nth_neighbor` is 0, or a HEALPix
///   order is out of range
/// - [`MatchError::NotEnoughCandidates`] if `nth_neighbor` exceeds the catalog
pub fn match_with_options(
    query: &PointSet,
    candidates: &PointSet,
    options: &MatchOptions,
) -> Result<MatchResult> {
    if candidates.is_empty() {
        return Err(MatchError::EmptyCandidateSet);
    }
    let nth = options.nth_neighbor;
    if nth == 0 {
        return Err(MatchError::invalid_parameter(
            "nth_neighbor must be at least 1",
        ));
    }
    if nth > candidates.len() {
        return Err(MatchError::NotEnoughCandidates {
            requested: nth,
            available: candidates.len(),
        });
    }

    let strategy = options.strategy.resolve(query.len(), candidates.len());
    log::debug!(
        "matching {} queries against {} candidates (strategy {:?}, nth {}, parallel {})",
        query.len(),
        candidates.len(),
        strategy,
        nth,
        options.parallel
    );

    let index = build_index(strategy, candidates)?;
    let matches = run_queries(query, options.parallel, |q| {
        let found = index.nth_nearest(q, nth).ok_or(MatchError::NotEnoughCandidates {
            requested: nth,
            available: index.len(),
        })?;
        Ok(Match {
            index: found.index,
            separation: found.separation,
            chord: chord_from_separation(found.separation.radians()),
        })
    })?;

    Ok(MatchResult::new(matches, nth))
}

/// Every (query, candidate) pair separated by at most `radius`.
///
/// Pairs are ordered by query index, then separation, then candidate index.
pub fn search_around(query: &PointSet, candidates: &PointSet, radius: Angle) -> Result<Vec<Pair>> {
    search_around_with_options(query, candidates, radius, &MatchOptions::default())
}

/// [`search_around`] with an explicit strategy and parallelism.
/// `nth_neighbor` is ignored.
///
/// # Errors
/// - [`MatchError::EmptyCandidateSet`] if `candidates` is empty
/// - [`MatchError::InvalidParameter`] if `radius` is negative or not finite
pub fn search_around_with_options(
    query: &PointSet,
    candidates: &PointSet,
    radius: Angle,
    options: &MatchOptions,
) -> Result<Vec<Pair>> {
    if candidates.is_empty() {
        return Err(MatchError::EmptyCandidateSet);
    }
    if !radius.is_finite() || radius.radians() < 0.0 {
        return Err(MatchError::invalid_parameter(format!(
            "search radius must be finite and non-negative, got {} rad",
            radius.radians()
        )));
    }

    let strategy = options.strategy.resolve(query.len(), candidates.len());
    log::debug!(
        "radius search of {} queries against {} candidates within {:.6}° (strategy {:?})",
        query.len(),
        candidates.len(),
        radius.degrees(),
        strategy
    );

    let index = build_index(strategy, candidates)?;
    let per_query = run_queries(query, options.parallel, |q| {
        let mut found = index.within(q, radius);
        found.sort_unstable_by(Neighbor::cmp_by_separation);
        Ok(found)
    })?;

    Ok(per_query
        .into_iter()
        .enumerate()
        .flat_map(|(query_index, found)| {
            found.into_iter().map(move |n| Pair {
                query_index,
                candidate_index: n.index,
                separation: n.separation,
            })
        })
        .collect())
}

fn build_index(strategy: SearchStrategy, candidates: &PointSet) -> Result<Box<dyn NeighborIndex>> {
    Ok(match strategy {
        SearchStrategy::Healpix { order } => Box::new(HealpixIndex::new(candidates, order)?),
        SearchStrategy::Scan | SearchStrategy::Auto => Box::new(ScanIndex::new(candidates)),
    })
}

fn run_queries<T, F>(query: &PointSet, parallel: bool, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&PreparedPoint) -> Result<T> + Sync,
{
    if parallel {
        query
            .points()
            .par_iter()
            .map(|p| f(&PreparedPoint::new(p)))
            .collect()
    } else {
        query
            .iter()
            .map(|p| f(&PreparedPoint::new(p)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PointRole;

    fn set(pairs: &[(f64, f64)]) -> PointSet {
        PointSet::from_degrees(pairs, PointRole::Candidate).unwrap()
    }

    #[test]
    fn test_auto_resolves_to_scan_for_small_inputs() {
        assert_eq!(SearchStrategy::Auto.resolve(10, 50), SearchStrategy::Scan);
        assert_eq!(SearchStrategy::Auto.resolve(100_000, 100), SearchStrategy::Scan);
    }

    #[test]
    fn test_auto_resolves_to_healpix_for_large_inputs() {
        match SearchStrategy::Auto.resolve(1_000, 100_000) {
            SearchStrategy::Healpix { order } => assert!((1..=10).contains(&order)),
            other => panic!("Expected Healpix, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_strategy_is_kept() {
        let s = SearchStrategy::Healpix { order: 3 };
        assert_eq!(s.resolve(1, 1), s);
    }

    fn neighbor(index: usize, rad: f64) -> Neighbor {
        Neighbor {
            index,
            separation: Angle::from_radians(rad),
        }
    }

    #[test]
    fn test_select_nth_orders_by_separation() {
        let mut ns = vec![neighbor(2, 0.1), neighbor(0, 0.3), neighbor(1, 0.1)];
        assert_eq!(select_nth(&mut ns, 1).unwrap().index, 1);
        assert_eq!(select_nth(&mut ns, 2).unwrap().index, 2);
        assert_eq!(select_nth(&mut ns, 3).unwrap().index, 0);
        assert!(select_nth(&mut ns, 0).is_none());
        assert!(select_nth(&mut ns, 4).is_none());
    }

    #[test]
    fn test_select_nth_tolerates_rounding_noise() {
        let d = 0.017453292519943295;
        // the higher index is a few ulp closer: still a tie
        let mut ns = vec![neighbor(5, d), neighbor(9, d - 4e-16), neighbor(3, d + 2.0)];
        assert_eq!(select_nth(&mut ns, 1).unwrap().index, 5);
        assert_eq!(select_nth(&mut ns, 2).unwrap().index, 9);
        assert_eq!(select_nth(&mut ns, 3).unwrap().index, 3);
    }

    #[test]
    fn test_select_nth_tolerance_is_relative_to_closest() {
        // 5 is outside the tolerance of 9's separation, so 9 wins outright
        let mut ns = vec![neighbor(5, 1.0), neighbor(9, 1.0 - 3.0 * TIE_RESOLUTION)];
        assert_eq!(select_nth(&mut ns, 1).unwrap().index, 9);
        assert_eq!(select_nth(&mut ns, 2).unwrap().index, 5);
    }

    #[test]
    fn test_nth_zero_rejected() {
        let c = set(&[(0.0, 0.0)]);
        let opts = MatchOptions::default().with_nth_neighbor(0);
        assert!(matches!(
            match_with_options(&c, &c, &opts),
            Err(MatchError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_nth_beyond_catalog_rejected() {
        let c = set(&[(0.0, 0.0), (1.0, 0.0)]);
        let opts = MatchOptions::default().with_nth_neighbor(3);
        assert!(matches!(
            match_with_options(&c, &c, &opts),
            Err(MatchError::NotEnoughCandidates {
                requested: 3,
                available: 2
            })
        ));
    }

    #[test]
    fn test_empty_query_gives_empty_result() {
        let c = set(&[(0.0, 0.0)]);
        let q = PointSet::default();
        let result = match_nearest(&q, &c).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_candidates_checked_before_query() {
        let q = PointSet::default();
        let c = PointSet::default();
        assert!(matches!(
            match_nearest(&q, &c),
            Err(MatchError::EmptyCandidateSet)
        ));
    }

    #[test]
    fn test_search_around_orders_pairs() {
        let c = set(&[(2.0, 0.0), (0.5, 0.0), (0.0, 0.0), (50.0, 0.0)]);
        let q = set(&[(0.0, 0.0), (49.0, 0.0)]);
        let pairs = search_around(&q, &c, Angle::from_degrees(1.5)).unwrap();
        let got: Vec<(usize, usize)> = pairs.iter().map(|p| (p.query_index, p.candidate_index)).collect();
        assert_eq!(got, vec![(0, 2), (0, 1), (1, 3)]);
    }

    #[test]
    fn test_search_around_rejects_bad_radius() {
        let c = set(&[(0.0, 0.0)]);
        assert!(matches!(
            search_around(&c, &c, Angle::from_degrees(-1.0)),
            Err(MatchError::InvalidParameter { .. })
        ));
        assert!(matches!(
            search_around(&c, &c, Angle::from_radians(f64::NAN)),
            Err(MatchError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_options_defaults() {
        let opts = MatchOptions::default();
        assert_eq!(opts.nth_neighbor, 1);
        assert!(!opts.parallel);
        assert_eq!(opts.strategy, SearchStrategy::Auto);
    }
}
