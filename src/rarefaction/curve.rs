//! Incremental rarefaction (collector's) curve with Good's coverage.

use serde::{Deserialize, Serialize};

/// One point on a rarefaction curve, taken after a single read is observed.
///
/// Field names follow the per-specimen curve CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RarefactionSample {
    /// Reads observed so far (1-indexed).
    #[serde(rename = "read_num")]
    pub read_number: u64,
    /// Distinct SVs seen so far.
    #[serde(rename = "esv_total")]
    pub distinct_count: u64,
    /// SVs seen exactly once so far.
    #[serde(rename = "esv_singleton")]
    pub singleton_count: u64,
    /// Good's coverage: `1 - singleton_count / read_number`.
    #[serde(rename = "goods_coverage")]
    pub coverage: f64,
}

/// A rarefaction curve: one sample per read, in read order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RarefactionCurve {
    samples: Vec<RarefactionSample>,
}

impl RarefactionCurve {
    /// Curve samples in read order.
    #[inline]
    pub fn samples(&self) -> &[RarefactionSample] {
        &self.samples
    }

    /// Number of samples (equal to the number of reads consumed).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the curve is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The last sample, i.e. the statistics over every read.
    pub fn last(&self) -> Option<&RarefactionSample> {
        self.samples.last()
    }
}

/// Running per-SV tally that emits one curve sample per observed read.
///
/// Distinct and singleton counts are maintained incrementally, so each read
/// costs O(1). The tally is sized by the number of SVs, not by read depth.
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    tally: Vec<u64>,
    reads: u64,
    distinct: u64,
    singletons: u64,
}

impl CurveBuilder {
    /// Create a builder for a table with `n_svs` SV columns.
    pub fn new(n_svs: usize) -> Self {
        Self {
            tally: vec![0; n_svs],
            reads: 0,
            distinct: 0,
            singletons: 0,
        }
    }

    /// Record one read of SV `sv` and return the updated sample.
    pub fn observe(&mut self, sv: usize) -> RarefactionSample {
        let seen = &mut self.tally[sv];
        *seen += 1;
        match *seen {
            1 => {
                self.distinct += 1;
                self.singletons += 1;
            }
            2 => self.singletons -= 1,
            _ => {}
        }
        self.reads += 1;

        RarefactionSample {
            read_number: self.reads,
            distinct_count: self.distinct,
            singleton_count: self.singletons,
            coverage: 1.0 - self.singletons as f64 / self.reads as f64,
        }
    }
}

/// Build the rarefaction curve for a shuffled read stream.
///
/// # Arguments
/// * `reads` - SV column index of each read, in sampling order
/// * `n_svs` - Number of SV columns; every read must be below this
pub fn build_curve(reads: &[usize], n_svs: usize) -> RarefactionCurve {
    let mut builder = CurveBuilder::new(n_svs);
    let samples = reads.iter().map(|&sv| builder.observe(sv)).collect();
    RarefactionCurve { samples }
}
