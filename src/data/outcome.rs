//! Per-specimen results of the rarefaction step.

use crate::rarefaction::RarefactionCurve;
use serde::{Deserialize, Serialize};

/// Result of scanning a specimen's rarefaction curve for coverage saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    /// Coverage plateaued; counts below `threshold` reads are treated as noise.
    Converged { threshold: u64 },
    /// No plateau was found within the specimen's reads.
    NotConverged,
}

impl Convergence {
    /// Build from the detector's optional threshold.
    pub fn from_threshold(threshold: Option<u64>) -> Self {
        match threshold {
            Some(threshold) => Convergence::Converged { threshold },
            None => Convergence::NotConverged,
        }
    }

    /// Whether the specimen converged.
    #[inline]
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }

    /// The convergence threshold, if any.
    #[inline]
    pub fn threshold(&self) -> Option<u64> {
        match self {
            Convergence::Converged { threshold } => Some(*threshold),
            Convergence::NotConverged => None,
        }
    }
}

/// Everything learned about one specimen, kept together in a single record.
///
/// The filtered counts and the convergence flag always travel as a pair, so
/// later steps never need to line up two separately ordered collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecimenOutcome {
    /// Specimen identifier.
    pub specimen: String,
    /// Total reads in the raw counts.
    pub depth: u64,
    /// Convergence result.
    pub convergence: Convergence,
    /// Counts after thresholding, one per SV (zeroed, never removed).
    pub filtered: Vec<u64>,
    /// Rarefaction curve, when curves are retained.
    pub curve: Option<RarefactionCurve>,
}

impl SpecimenOutcome {
    /// Whether the specimen converged.
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.convergence.is_converged()
    }
}
