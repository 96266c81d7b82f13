//! Summary statistics of a filtering run.

use crate::data::SpecimenOutcome;
use crate::filter::PrevalenceDecision;
use serde::{Deserialize, Serialize};

/// Counts describing what a run kept and removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Specimens in the input table.
    pub n_specimens: usize,
    /// Specimens whose coverage converged.
    pub n_converged: usize,
    /// Specimens whose coverage did not converge.
    pub n_not_converged: usize,
    /// Specimens with no reads at all.
    pub n_empty: usize,
    /// Specimens written to the filtered table.
    pub n_emitted: usize,
    /// SV columns in the input table.
    pub n_svs_before: usize,
    /// SV columns passing the prevalence filter.
    pub n_svs_after: usize,
    /// Smallest convergence threshold.
    pub min_threshold: Option<u64>,
    /// Median convergence threshold.
    pub median_threshold: Option<f64>,
    /// Largest convergence threshold.
    pub max_threshold: Option<u64>,
}

impl FilterSummary {
    /// Summarize a run from its outcomes and column decision.
    pub fn new(outcomes: &[SpecimenOutcome], decision: &PrevalenceDecision, n_emitted: usize) -> Self {
        let mut thresholds: Vec<u64> = outcomes
            .iter()
            .filter_map(|o| o.convergence.threshold())
            .collect();
        thresholds.sort_unstable();

        let n_converged = thresholds.len();
        Self {
            n_specimens: outcomes.len(),
            n_converged,
            n_not_converged: outcomes.len() - n_converged,
            n_empty: outcomes.iter().filter(|o| o.depth == 0).count(),
            n_emitted,
            n_svs_before: decision.n_svs(),
            n_svs_after: decision.n_passing(),
            min_threshold: thresholds.first().copied(),
            median_threshold: median(&thresholds),
            max_threshold: thresholds.last().copied(),
        }
    }

    /// Proportion of specimens that converged.
    pub fn convergence_rate(&self) -> f64 {
        if self.n_specimens == 0 {
            0.0
        } else {
            self.n_converged as f64 / self.n_specimens as f64
        }
    }
}

/// Median of sorted values.
fn median(sorted: &[u64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 0 => Some((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0),
        _ => Some(sorted[n / 2] as f64),
    }
}

impl std::fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Good's Filter Summary")?;
        writeln!(f, "  Specimens:      {}", self.n_specimens)?;
        writeln!(
            f,
            "  Converged:      {} ({:.1}%)",
            self.n_converged,
            self.convergence_rate() * 100.0
        )?;
        writeln!(f, "  Not converged:  {}", self.n_not_converged)?;
        writeln!(f, "  Empty:          {}", self.n_empty)?;
        writeln!(f, "  Emitted:        {}", self.n_emitted)?;
        writeln!(f, "  SVs before:     {}", self.n_svs_before)?;
        writeln!(f, "  SVs after:      {}", self.n_svs_after)?;
        if let (Some(min), Some(median), Some(max)) =
            (self.min_threshold, self.median_threshold, self.max_threshold)
        {
            writeln!(f, "  Threshold:      min {}, median {:.1}, max {}", min, median, max)?;
        }
        Ok(())
    }
}
