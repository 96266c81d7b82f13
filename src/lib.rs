//! Good's coverage filtering of amplicon sequence tables
//!
//! This library removes likely contaminant and PCR-error sequence variants
//! (SVs) from DADA2-style count tables. Each specimen's counts are expanded
//! into virtual reads, shuffled, and walked to build a collector's curve of
//! Good's coverage. The read depth at which coverage stops changing becomes
//! that specimen's threshold: SVs with fewer reads are zeroed. A prevalence
//! vote over converged specimens then decides which SV columns survive.
//!
//! # Overview
//!
//! - **data**: Sequence table and per-specimen outcomes
//! - **rarefaction**: Read expansion, shuffling, curves and convergence
//! - **filter**: Count thresholding and the prevalence vote
//! - **output**: Filtered table, convergence report and curve writing
//! - **pipeline**: Configuration and run composition
//!
//! # Example
//!
//! ```no_run
//! use goodsfilter::prelude::*;
//!
//! let table = SequenceTable::from_csv("seqtab.csv").unwrap();
//! let run = GoodsFilter::new()
//!     .min_reads(10)
//!     .iteration_cutoff(0.0001)
//!     .min_prev(2)
//!     .seed(42)
//!     .run(&table)
//!     .unwrap();
//! run.write_outputs(&OutputPaths::new("seqtab.filtered.csv")).unwrap();
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod rarefaction;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{Convergence, SequenceTable, SpecimenOutcome};
    pub use crate::error::{GoodsError, Result};
    pub use crate::filter::{apply_threshold, filter_prevalence, PrevalenceDecision};
    pub use crate::output::{
        assemble_filtered_table, convergence_report, select_rows, ConvergenceRecord, OutputPaths,
    };
    pub use crate::pipeline::{process_specimen, FilterSummary, GoodsConfig, GoodsFilter, GoodsRun};
    pub use crate::rarefaction::{
        build_curve, create_rng, detect_convergence, expand_reads, shuffle_reads, specimen_rng,
        RarefactionCurve, RarefactionSample,
    };
}
