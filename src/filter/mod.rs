//! Filtering primitives: per-specimen count thresholding and the cross-specimen
//! prevalence vote.

pub mod prevalence;
pub mod threshold;

pub use prevalence::{filter_prevalence, prevalence_counts, PrevalenceDecision};
pub use threshold::apply_threshold;
