//! Per-specimen rarefaction: virtual reads, shuffling, collector's curves and
//! Good's coverage convergence.
//!
//! # Algorithm
//!
//! 1. Expand a specimen's counts into one token per read
//! 2. Shuffle the tokens uniformly at random
//! 3. Walk the shuffled reads, recording distinct SVs, singleton SVs and
//!    Good's coverage after every read
//! 4. Report the first read depth (past `min_reads`) where coverage changes by
//!    no more than `iteration_cutoff` between consecutive reads

pub mod convergence;
pub mod curve;
pub mod expand;
pub mod shuffle;

pub use convergence::detect_convergence;
pub use curve::{build_curve, CurveBuilder, RarefactionCurve, RarefactionSample};
pub use expand::expand_reads;
pub use shuffle::{create_rng, shuffle_reads, specimen_rng};
