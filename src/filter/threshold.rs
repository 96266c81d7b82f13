//! Zeroing of raw counts below a specimen's convergence threshold.

use crate::data::Convergence;

/// Apply a specimen's convergence result to its raw counts.
///
/// For a converged specimen with threshold `T`, counts `>= T` are kept and
/// the rest are set to zero. A specimen that did not converge keeps its raw
/// counts. The result always has the same length as `counts`, so SV columns
/// stay aligned across specimens.
pub fn apply_threshold(counts: &[u64], convergence: Convergence) -> Vec<u64> {
    match convergence {
        Convergence::Converged { threshold } => counts
            .iter()
            .map(|&c| if c >= threshold { c } else { 0 })
            .collect(),
        Convergence::NotConverged => counts.to_vec(),
    }
}
