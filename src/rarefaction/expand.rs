//! Expansion of specimen counts into a virtual read stream.

/// Expand a dense count vector into one token per read.
///
/// Each token is the SV column index, repeated as many times as that SV's
/// count, in column order. The order is meaningless until the reads are
/// shuffled. An all-zero vector yields an empty stream.
///
/// This is the only allocation proportional to the specimen's read depth;
/// very deep specimens pay one `usize` per read here.
pub fn expand_reads(counts: &[u64]) -> Vec<usize> {
    let depth: u64 = counts.iter().sum();
    let mut reads = Vec::with_capacity(depth as usize);
    for (sv, &count) in counts.iter().enumerate() {
        reads.extend(std::iter::repeat(sv).take(count as usize));
    }
    reads
}
