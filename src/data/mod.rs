//! Data structures for Good's coverage filtering.

mod outcome;
mod sequence_table;

pub use outcome::{Convergence, SpecimenOutcome};
pub use sequence_table::SequenceTable;
