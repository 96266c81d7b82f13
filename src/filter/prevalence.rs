//! Cross-specimen prevalence vote on SV columns.

use crate::data::SpecimenOutcome;
use crate::error::{GoodsError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-SV outcome of the prevalence vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrevalenceDecision {
    /// Minimum number of converged specimens an SV must be observed in.
    pub min_prev: usize,
    /// Number of converged specimens with a nonzero filtered count, per SV.
    pub prevalence: Vec<usize>,
    /// Whether each SV passes the filter.
    pub passes: Vec<bool>,
}

impl PrevalenceDecision {
    /// Number of SVs voted on.
    #[inline]
    pub fn n_svs(&self) -> usize {
        self.passes.len()
    }

    /// Number of SVs that pass.
    pub fn n_passing(&self) -> usize {
        self.passes.iter().filter(|&&p| p).count()
    }

    /// Indices of passing SVs, in original column order.
    pub fn passing_indices(&self) -> Vec<usize> {
        self.passes
            .iter()
            .enumerate()
            .filter(|(_, &p)| p)
            .map(|(i, _)| i)
            .collect()
    }
}

impl std::fmt::Display for PrevalenceDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n_after = self.n_passing();
        writeln!(f, "Prevalence Filter (min_prev = {})", self.min_prev)?;
        writeln!(f, "  Before:    {} SVs", self.n_svs())?;
        writeln!(f, "  After:     {} SVs", n_after)?;
        writeln!(f, "  Removed:   {} SVs", self.n_svs() - n_after)?;
        Ok(())
    }
}

/// Count, per SV, the converged specimens that still observe it after thresholding.
///
/// Specimens that did not converge never contribute, whether or not they end
/// up in the output table.
pub fn prevalence_counts(outcomes: &[SpecimenOutcome], n_svs: usize) -> Result<Vec<usize>> {
    if let Some(bad) = outcomes.iter().find(|o| o.filtered.len() != n_svs) {
        return Err(GoodsError::DimensionMismatch {
            specimen: bad.specimen.clone(),
            expected: n_svs,
            actual: bad.filtered.len(),
        });
    }

    let counts = (0..n_svs)
        .into_par_iter()
        .map(|sv| {
            outcomes
                .iter()
                .filter(|o| o.is_converged() && o.filtered[sv] > 0)
                .count()
        })
        .collect();
    Ok(counts)
}

/// Vote on which SV columns survive.
///
/// An SV passes when at least `min_prev` converged specimens observe it.
/// With `min_prev = 1` every SV seen in any converged specimen is kept; with
/// `min_prev = 0` every column is kept.
///
/// # Arguments
/// * `outcomes` - Every specimen's outcome, after thresholding
/// * `n_svs` - Number of SV columns in the table
/// * `min_prev` - Minimum prevalence
pub fn filter_prevalence(
    outcomes: &[SpecimenOutcome],
    n_svs: usize,
    min_prev: usize,
) -> Result<PrevalenceDecision> {
    let prevalence = prevalence_counts(outcomes, n_svs)?;
    let passes = prevalence.iter().map(|&n| n >= min_prev).collect();
    Ok(PrevalenceDecision {
        min_prev,
        prevalence,
        passes,
    })
}
