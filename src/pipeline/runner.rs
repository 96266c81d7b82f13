//! Runner composing rarefaction, thresholding, the prevalence vote and output
//! assembly.

use super::config::GoodsConfig;
use super::summary::FilterSummary;
use crate::data::{Convergence, SequenceTable, SpecimenOutcome};
use crate::error::Result;
use crate::filter::{apply_threshold, filter_prevalence, PrevalenceDecision};
use crate::output::{
    assemble_filtered_table, convergence_report, write_convergence_report, write_curves,
    ConvergenceRecord, OutputPaths,
};
use crate::rarefaction::{build_curve, detect_convergence, expand_reads, shuffle_reads, specimen_rng};
use log::{debug, info, warn};
use rand::Rng;
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Run one specimen through expansion, shuffling, curve building, convergence
/// detection and thresholding.
///
/// # Arguments
/// * `specimen` - Specimen identifier
/// * `counts` - Raw counts, one per SV
/// * `config` - Run parameters (`min_reads`, `iteration_cutoff`, `keep_curves`)
/// * `rng` - Random source for the shuffle
pub fn process_specimen<R: Rng + ?Sized>(
    specimen: &str,
    counts: &[u64],
    config: &GoodsConfig,
    rng: &mut R,
) -> SpecimenOutcome {
    let mut reads = expand_reads(counts);
    let depth = reads.len() as u64;
    if depth == 0 {
        warn!("Specimen '{}' has no reads; it cannot converge", specimen);
    }

    shuffle_reads(&mut reads, rng);
    let curve = build_curve(&reads, counts.len());
    drop(reads);

    let convergence = Convergence::from_threshold(detect_convergence(
        curve.samples(),
        config.min_reads,
        config.iteration_cutoff,
    ));
    match convergence {
        Convergence::Converged { threshold } => {
            debug!("Specimen '{}' ({} reads) converged at {} reads", specimen, depth, threshold)
        }
        Convergence::NotConverged => {
            debug!("Specimen '{}' ({} reads) did not converge", specimen, depth)
        }
    }

    SpecimenOutcome {
        specimen: specimen.to_string(),
        depth,
        convergence,
        filtered: apply_threshold(counts, convergence),
        curve: config.keep_curves.then_some(curve),
    }
}

/// Everything produced by a filtering run.
#[derive(Debug, Clone)]
pub struct GoodsRun {
    /// Per-specimen outcomes, in input order.
    pub outcomes: Vec<SpecimenOutcome>,
    /// Per-SV prevalence vote.
    pub decision: PrevalenceDecision,
    /// Filtered sequence table.
    pub filtered: SequenceTable,
    /// Convergence flag of every specimen.
    pub report: Vec<ConvergenceRecord>,
    /// Run summary.
    pub summary: FilterSummary,
}

impl GoodsRun {
    /// Write the filtered table and whichever optional outputs are requested.
    ///
    /// Curves can only be written when the run kept them.
    pub fn write_outputs(&self, paths: &OutputPaths) -> Result<()> {
        info!("Writing filtered sequence table to {:?}", paths.filtered_table);
        self.filtered.to_csv(&paths.filtered_table)?;

        if let Some(path) = &paths.converged_file {
            info!("Writing convergence report to {:?}", path);
            write_convergence_report(BufWriter::new(File::create(path)?), &self.report)?;
        }

        if let Some(dir) = &paths.curves_dir {
            let written = write_curves(dir, &self.outcomes)?;
            info!("Wrote {} rarefaction curves to {:?}", written, dir);
        }

        if let Some(path) = &paths.summary {
            info!("Writing run summary to {:?}", path);
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &self.summary)?;
            writer.flush()?;
        }

        Ok(())
    }
}

/// Builder for configuring and running Good's coverage filtering.
#[derive(Debug, Clone, Default)]
pub struct GoodsFilter {
    config: GoodsConfig,
}

impl GoodsFilter {
    /// Create a filter with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &GoodsConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Set the coverage-change cutoff that marks a plateau.
    pub fn iteration_cutoff(mut self, iteration_cutoff: f64) -> Self {
        self.config.iteration_cutoff = iteration_cutoff;
        self
    }

    /// Set the minimum prevalence among converged specimens.
    pub fn min_prev(mut self, min_prev: usize) -> Self {
        self.config.min_prev = min_prev;
        self
    }

    /// Set the read count that must be exceeded before convergence is checked.
    pub fn min_reads(mut self, min_reads: u64) -> Self {
        self.config.min_reads = min_reads;
        self
    }

    /// Emit specimens that did not converge.
    pub fn keep_nonconverged(mut self, keep: bool) -> Self {
        self.config.keep_nonconverged = keep;
        self
    }

    /// Seed the shuffles for reproducible output.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Toggle parallel processing of specimens.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Keep rarefaction curves in the result.
    pub fn keep_curves(mut self, keep: bool) -> Self {
        self.config.keep_curves = keep;
        self
    }

    /// Filter a sequence table.
    ///
    /// Specimens are processed independently, each with its own random stream,
    /// and the prevalence vote only starts once every specimen is done.
    pub fn run(&self, table: &SequenceTable) -> Result<GoodsRun> {
        let config = &self.config;
        config.validate()?;

        info!(
            "Filtering {} specimens × {} SVs (min_reads = {}, iteration_cutoff = {}, min_prev = {})",
            table.n_specimens(),
            table.n_svs(),
            config.min_reads,
            config.iteration_cutoff,
            config.min_prev
        );
        if config.seed.is_none() {
            debug!("No seed given; shuffles draw from OS entropy");
        }

        let process = |idx: usize| {
            let counts = table.row_dense(idx);
            let mut rng = specimen_rng(config.seed, idx);
            process_specimen(&table.specimen_ids()[idx], &counts, config, &mut rng)
        };
        let outcomes: Vec<SpecimenOutcome> = if config.parallel {
            (0..table.n_specimens()).into_par_iter().map(process).collect()
        } else {
            (0..table.n_specimens()).map(process).collect()
        };

        let decision = filter_prevalence(&outcomes, table.n_svs(), config.min_prev)?;
        for line in decision.to_string().lines() {
            debug!("{}", line);
        }
        let filtered =
            assemble_filtered_table(table.sv_ids(), &outcomes, &decision, config.keep_nonconverged)?;
        let report = convergence_report(&outcomes);
        let summary = FilterSummary::new(&outcomes, &decision, filtered.n_specimens());

        info!(
            "{} of {} specimens converged; {} of {} SVs pass the prevalence filter",
            summary.n_converged, summary.n_specimens, summary.n_svs_after, summary.n_svs_before
        );
        if filtered.n_specimens() == 0 || filtered.n_svs() == 0 {
            warn!(
                "Filtered table is empty ({} specimens × {} SVs)",
                filtered.n_specimens(),
                filtered.n_svs()
            );
        }

        Ok(GoodsRun {
            outcomes,
            decision,
            filtered,
            report,
            summary,
        })
    }
}
