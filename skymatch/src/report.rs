//! Matches resolved back to candidate coordinates.
//!
//! A [`MatchResult`] only carries indices. [`MatchReport`] joins it with the
//! candidate set so downstream code (tables, plots, exports) sees the matched
//! coordinates directly.

use crate::error::{MatchError, Result};
use crate::point::{PointSet, SphericalPoint};
use crate::result::MatchResult;
use skymatch_core::{Angle, AngleUnit};
use std::fmt;

/// One query's match with the candidate coordinate filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedMatch {
    pub query_index: usize,
    pub candidate_index: usize,
    pub candidate: SphericalPoint,
    pub separation: Angle,
    pub chord: f64,
}

/// Separation statistics over a report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SeparationSummary {
    pub count: usize,
    pub min: Angle,
    pub max: Angle,
    pub mean: Angle,
    pub median: Angle,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchReport {
    rows: Vec<ResolvedMatch>,
}

impl MatchReport {
    /// Resolves every match in `result` against `candidates`.
    ///
    /// # Errors
    /// [`MatchError::ShapeMismatch`] if a matched index is outside
    /// `candidates`, which happens when the result came from another catalog.
    pub fn new(result: &MatchResult, candidates: &PointSet) -> Result<Self> {
        let rows = result
            .iter()
            .enumerate()
            .map(|(query_index, m)| {
                let candidate = candidates.get(m.index).copied().ok_or_else(|| {
                    MatchError::shape_mismatch(
                        format!("candidate set for match {}", query_index),
                        m.index + 1,
                        candidates.len(),
                    )
                })?;
                Ok(ResolvedMatch {
                    query_index,
                    candidate_index: m.index,
                    candidate,
                    separation: m.separation,
                    chord: m.chord,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ResolvedMatch] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedMatch> {
        self.rows.iter()
    }

    /// Separations in `unit`, in query order.
    pub fn separations(&self, unit: AngleUnit) -> Vec<f64> {
        self.rows.iter().map(|r| r.separation.to_unit(unit)).collect()
    }

    /// Rows whose separation is at most `max_separation`.
    pub fn within(&self, max_separation: Angle) -> Vec<&ResolvedMatch> {
        self.rows
            .iter()
            .filter(|r| r.separation <= max_separation)
            .collect()
    }

    /// A report holding only the rows within `max_separation`, in query order.
    pub fn restricted_to(&self, max_separation: Angle) -> MatchReport {
        MatchReport {
            rows: self.within(max_separation).into_iter().copied().collect(),
        }
    }

    /// Plain-text table with separations in `unit`.
    ///
    /// `Display` for the report itself uses arcseconds.
    pub fn table(&self, unit: AngleUnit) -> ReportTable<'_> {
        ReportTable { report: self, unit }
    }

    /// `None` for an empty report.
    pub fn summary(&self) -> Option<SeparationSummary> {
        if self.rows.is_empty() {
            return None;
        }

        let mut seps: Vec<f64> = self.rows.iter().map(|r| r.separation.radians()).collect();
        seps.sort_by(f64::total_cmp);

        let n = seps.len();
        let mean = seps.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            seps[n / 2]
        } else {
            0.5 * (seps[n / 2 - 1] + seps[n / 2])
        };

        Some(SeparationSummary {
            count: n,
            min: Angle::from_radians(seps[0]),
            max: Angle::from_radians(seps[n - 1]),
            mean: Angle::from_radians(mean),
            median: Angle::from_radians(median),
        })
    }
}

impl<'a> IntoIterator for &'a MatchReport {
    type Item = &'a ResolvedMatch;
    type IntoIter = std::slice::Iter<'a, ResolvedMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// See [`MatchReport::table`].
pub struct ReportTable<'a> {
    report: &'a MatchReport,
    unit: AngleUnit,
}

impl fmt::Display for ReportTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep_header = format!("sep [{}]", self.unit.symbol());
        writeln!(
            f,
            "{:>6}  {:>9}  {:>12}  {:>12}  {:>14}",
            "query", "candidate", "lon [deg]", "lat [deg]", sep_header
        )?;
        for r in &self.report.rows {
            let (lon, lat) = r.candidate.to_degrees();
            writeln!(
                f,
                "{:>6}  {:>9}  {:>12.6}  {:>+12.6}  {:>14.4}",
                r.query_index,
                r.candidate_index,
                lon,
                lat,
                r.separation.to_unit(self.unit)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table(AngleUnit::Arcseconds).fmt(f)
    }
}

impl fmt::Display for SeparationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} matches, separation min {:.4}\" max {:.4}\" mean {:.4}\" median {:.4}\"",
            self.count,
            self.min.arcseconds(),
            self.max.arcseconds(),
            self.mean.arcseconds(),
            self.median.arcseconds()
        )
    }
}
