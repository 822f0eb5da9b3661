//! Output types of the search operations.
//!
//! [`MatchResult`] holds one [`Match`] per query point, in query order.
//! [`Pair`] is a single (query, candidate) hit from a radius search.

use skymatch_core::{Angle, AngleUnit};

/// Best candidate for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Match {
    /// Index into the candidate [`PointSet`](crate::PointSet).
    pub index: usize,
    /// Great-circle separation from the query point, in [0, π].
    pub separation: Angle,
    /// Distance between the two unit vectors, `2·sin(separation / 2)`.
    pub chord: f64,
}

/// One [`Match`] per query point, in query order.
///
/// Produced once by a search call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    matches: Vec<Match>,
    nth_neighbor: usize,
}

impl MatchResult {
    pub(crate) fn new(matches: Vec<Match>, nth_neighbor: usize) -> Self {
        Self {
            matches,
            nth_neighbor,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[inline]
    pub fn get(&self, query_index: usize) -> Option<&Match> {
        self.matches.get(query_index)
    }

    /// Which neighbor rank was requested (1 = nearest).
    #[inline]
    pub fn nth_neighbor(&self) -> usize {
        self.nth_neighbor
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    /// Matched candidate indices, in query order.
    pub fn indices(&self) -> Vec<usize> {
        self.matches.iter().map(|m| m.index).collect()
    }

    /// Separations converted to `unit`, in query order.
    pub fn separations(&self, unit: AngleUnit) -> Vec<f64> {
        self.matches
            .iter()
            .map(|m| m.separation.to_unit(unit))
            .collect()
    }

    pub fn into_vec(self) -> Vec<Match> {
        self.matches
    }
}

impl<'a> IntoIterator for &'a MatchResult {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

impl std::ops::Index<usize> for MatchResult {
    type Output = Match;

    fn index(&self, query_index: usize) -> &Match {
        &self.matches[query_index]
    }
}

/// A (query, candidate) pair found by a radius search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pair {
    pub query_index: usize,
    pub candidate_index: usize,
    pub separation: Angle,
}
