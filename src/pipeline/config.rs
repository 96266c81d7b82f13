//! Run parameters for Good's coverage filtering.

use crate::error::{GoodsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a filtering run.
///
/// Missing keys in a YAML file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoodsConfig {
    /// Largest change in Good's coverage between consecutive reads that still
    /// counts as a plateau.
    pub iteration_cutoff: f64,
    /// Minimum number of converged specimens an SV must be observed in.
    pub min_prev: usize,
    /// Reads that must be consumed before convergence can be declared.
    pub min_reads: u64,
    /// Emit specimens whose coverage did not converge.
    pub keep_nonconverged: bool,
    /// Random seed; `None` draws from OS entropy and makes runs non-reproducible.
    pub seed: Option<u64>,
    /// Process specimens on the rayon thread pool. The per-SV vote and read
    /// depth sums always run on the pool; size it to one thread to keep the
    /// whole run on a single core.
    pub parallel: bool,
    /// Retain every specimen's rarefaction curve in the run result.
    pub keep_curves: bool,
}

impl Default for GoodsConfig {
    fn default() -> Self {
        Self {
            iteration_cutoff: 0.0001,
            min_prev: 1,
            min_reads: 10,
            keep_nonconverged: false,
            seed: None,
            parallel: true,
            keep_curves: false,
        }
    }
}

impl GoodsConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(GoodsError::from)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(GoodsError::from)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.iteration_cutoff.is_finite() || self.iteration_cutoff < 0.0 {
            return Err(GoodsError::InvalidParameter(format!(
                "iteration_cutoff must be a finite, nonnegative number (got {})",
                self.iteration_cutoff
            )));
        }
        Ok(())
    }
}
