//! Detection of Good's coverage saturation on a rarefaction curve.

use super::curve::RarefactionSample;

/// Find the read depth at which Good's coverage stops changing.
///
/// Returns the `read_number` of the first sample (never the very first one)
/// whose read number exceeds `min_reads` and whose coverage differs from the
/// preceding sample by at most `iteration_cutoff`. The first qualifying sample
/// wins. Returns `None` when no sample qualifies, which is always the case
/// when the specimen has `min_reads` reads or fewer.
pub fn detect_convergence(
    samples: &[RarefactionSample],
    min_reads: u64,
    iteration_cutoff: f64,
) -> Option<u64> {
    // read_number == index + 1, so `read_number > min_reads` starts at index min_reads
    let start = usize::try_from(min_reads).unwrap_or(usize::MAX).max(1);
    if start >= samples.len() {
        return None;
    }

    (start..samples.len())
        .find(|&i| (samples[i].coverage - samples[i - 1].coverage).abs() <= iteration_cutoff)
        .map(|i| samples[i].read_number)
}
