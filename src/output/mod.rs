//! Output assembly and writing.

mod assemble;
mod writer;

pub use assemble::{assemble_filtered_table, convergence_report, select_rows, ConvergenceRecord};
pub use writer::{
    curve_path, write_convergence_report, write_curve, write_curves, OutputPaths,
    CONVERGENCE_HEADER, CURVE_HEADER,
};
