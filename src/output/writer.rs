//! CSV writers for the convergence report and per-specimen curves.

use super::assemble::ConvergenceRecord;
use crate::data::SpecimenOutcome;
use crate::error::Result;
use crate::rarefaction::RarefactionCurve;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header of the convergence report.
pub const CONVERGENCE_HEADER: [&str; 2] = ["specimen", "goods_converged"];

/// Header of a per-specimen rarefaction curve.
pub const CURVE_HEADER: [&str; 4] = ["read_num", "esv_total", "esv_singleton", "goods_coverage"];

/// Where the outputs of a run are written.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    /// Filtered sequence table (CSV).
    pub filtered_table: PathBuf,
    /// Convergence report (CSV).
    pub converged_file: Option<PathBuf>,
    /// Directory receiving `<specimen>_collector.csv` curves.
    pub curves_dir: Option<PathBuf>,
    /// Run summary (JSON).
    pub summary: Option<PathBuf>,
}

impl OutputPaths {
    /// Paths for a run that only writes the filtered table.
    pub fn new<P: Into<PathBuf>>(filtered_table: P) -> Self {
        Self {
            filtered_table: filtered_table.into(),
            ..Default::default()
        }
    }
}

/// Serialize `records` under a fixed header, which is written even when there
/// are no records.
fn write_records<W: Write, T: Serialize>(writer: W, header: &[&str], records: &[T]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the convergence report as CSV.
pub fn write_convergence_report<W: Write>(writer: W, records: &[ConvergenceRecord]) -> Result<()> {
    write_records(writer, &CONVERGENCE_HEADER, records)
}

/// Write one rarefaction curve as CSV.
pub fn write_curve<W: Write>(writer: W, curve: &RarefactionCurve) -> Result<()> {
    write_records(writer, &CURVE_HEADER, curve.samples())
}

/// Path of a specimen's curve file inside `dir`.
pub fn curve_path(dir: &Path, specimen: &str) -> PathBuf {
    dir.join(format!("{}_collector.csv", specimen))
}

/// Write every retained curve into `dir`, creating it if needed.
///
/// Returns the number of curve files written.
pub fn write_curves(dir: &Path, outcomes: &[SpecimenOutcome]) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for outcome in outcomes {
        if let Some(curve) = &outcome.curve {
            let file = File::create(curve_path(dir, &outcome.specimen))?;
            write_curve(BufWriter::new(file), curve)?;
            written += 1;
        }
    }
    Ok(written)
}
