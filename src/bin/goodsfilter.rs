//! goodsfilter - Good's coverage filtering CLI
//!
//! Filters DADA2-style sequence tables using Good's coverage saturation to
//! remove likely contaminant and PCR error sequence variants.

use clap::Parser;
use env_logger::Env;
use goodsfilter::data::SequenceTable;
use goodsfilter::error::Result;
use goodsfilter::output::OutputPaths;
use goodsfilter::pipeline::{GoodsConfig, GoodsFilter};
use log::{error, info, warn};
use std::path::PathBuf;

/// Filter DADA2-style sequence tables using Good's coverage saturation
#[derive(Parser)]
#[command(name = "goodsfilter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Sequence table from dada2, in CSV format
    #[arg(short = 's', long)]
    seqtable: PathBuf,

    /// Write the filtered dada2-style sequence table to this file (CSV)
    #[arg(short = 'O', long, alias = "seqtable_filtered")]
    seqtable_filtered: PathBuf,

    /// Write whether Good's coverage converged for each specimen (CSV);
    /// non-convergence indicates insufficient read depth
    #[arg(short = 'C', long, alias = "converged_file")]
    converged_file: Option<PathBuf>,

    /// Keep specimens whose Good's coverage failed to converge
    #[arg(long, alias = "keep_nonconverged")]
    keep_nonconverged: bool,

    /// Good's iteration cutoff [default: 0.0001]
    #[arg(long, alias = "iteration_cutoff")]
    iteration_cutoff: Option<f64>,

    /// Minimum prevalence of an SV among converged specimens [default: 1, no filter]
    #[arg(long, alias = "min_prev")]
    min_prev: Option<usize>,

    /// Minimum reads before triggering Good's filter [default: 10]
    #[arg(long, alias = "min_reads")]
    min_reads: Option<u64>,

    /// Directory to write collector's curves as <dir>/<specimen>_collector.csv
    #[arg(long, alias = "curves_path")]
    curves_path: Option<PathBuf>,

    /// Random seed for reproducible shuffles (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Size of the worker thread pool (1 runs single-threaded and processes
    /// specimens sequentially; default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// YAML configuration; command-line options override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Merge command-line options over the base configuration.
    fn resolve_config(&self) -> Result<GoodsConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from {:?}", path);
                GoodsConfig::from_yaml_file(path)?
            }
            None => GoodsConfig::default(),
        };

        if let Some(cutoff) = self.iteration_cutoff {
            config.iteration_cutoff = cutoff;
        }
        if let Some(min_prev) = self.min_prev {
            config.min_prev = min_prev;
        }
        if let Some(min_reads) = self.min_reads {
            config.min_reads = min_reads;
        }
        if self.keep_nonconverged {
            config.keep_nonconverged = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.threads == Some(1) {
            config.parallel = false;
        }
        config.keep_curves = config.keep_curves || self.curves_path.is_some();

        config.validate()?;
        Ok(config)
    }

    /// Requested size of the global thread pool; 0 leaves rayon's default.
    fn worker_threads(&self) -> Option<usize> {
        self.threads.filter(|&n| n > 0)
    }

    fn output_paths(&self) -> OutputPaths {
        OutputPaths {
            filtered_table: self.seqtable_filtered.clone(),
            converged_file: self.converged_file.clone(),
            curves_dir: self.curves_path.clone(),
            summary: self.summary.clone(),
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    if let Some(threads) = cli.worker_threads() {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
        {
            warn!("Could not configure {} worker threads: {}", threads, e);
        }
    }

    info!("Loading sequence table from {:?}", cli.seqtable);
    let table = SequenceTable::from_csv(&cli.seqtable)?;
    info!(
        "Loaded {} specimens × {} SVs ({} reads)",
        table.n_specimens(),
        table.n_svs(),
        table.read_depths().iter().sum::<u64>()
    );

    let run = GoodsFilter::from_config(&config).run(&table)?;
    run.write_outputs(&cli.output_paths())?;

    for line in run.summary.to_string().lines() {
        info!("{}", line);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goodsfilter::error::GoodsError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec!["goodsfilter", "-s", "seqtab.csv", "-O", "filtered.csv"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = parse(&[]);
        assert_eq!(cli.resolve_config().unwrap(), GoodsConfig::default());
        assert_eq!(cli.worker_threads(), None);

        let paths = cli.output_paths();
        assert_eq!(paths.filtered_table, PathBuf::from("filtered.csv"));
        assert!(paths.converged_file.is_none());
        assert!(paths.curves_dir.is_none());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut yaml = NamedTempFile::new().unwrap();
        writeln!(yaml, "iteration_cutoff: 0.01").unwrap();
        writeln!(yaml, "min_prev: 3").unwrap();
        writeln!(yaml, "min_reads: 50").unwrap();
        writeln!(yaml, "seed: 11").unwrap();
        yaml.flush().unwrap();
        let config_path = yaml.path().to_str().unwrap();

        // File values apply where no flag is given
        let config = parse(&["--config", config_path]).resolve_config().unwrap();
        assert_eq!(config.iteration_cutoff, 0.01);
        assert_eq!(config.min_prev, 3);
        assert_eq!(config.min_reads, 50);
        assert_eq!(config.seed, Some(11));
        assert!(config.parallel);

        let config = parse(&["--config", config_path, "--min-reads", "5", "--seed", "2"])
            .resolve_config()
            .unwrap();
        assert_eq!(config.min_reads, 5);
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.min_prev, 3);
        assert_eq!(config.iteration_cutoff, 0.01);
    }

    #[test]
    fn test_underscore_aliases() {
        let cli = parse(&[
            "--min_reads",
            "20",
            "--min_prev",
            "2",
            "--iteration_cutoff",
            "0.001",
            "--keep_nonconverged",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.min_reads, 20);
        assert_eq!(config.min_prev, 2);
        assert_eq!(config.iteration_cutoff, 0.001);
        assert!(config.keep_nonconverged);
    }

    #[test]
    fn test_single_thread_runs_sequentially() {
        let cli = parse(&["--threads", "1"]);
        assert!(!cli.resolve_config().unwrap().parallel);
        assert_eq!(cli.worker_threads(), Some(1));

        let cli = parse(&["-t", "4"]);
        assert!(cli.resolve_config().unwrap().parallel);
        assert_eq!(cli.worker_threads(), Some(4));
    }

    #[test]
    fn test_curves_path_keeps_curves() {
        let cli = parse(&["--curves-path", "curves"]);
        assert!(cli.resolve_config().unwrap().keep_curves);
        assert_eq!(cli.output_paths().curves_dir, Some(PathBuf::from("curves")));
    }

    #[test]
    fn test_invalid_cutoff_rejected() {
        let err = parse(&["--iteration-cutoff=-1"]).resolve_config().unwrap_err();
        assert!(matches!(err, GoodsError::InvalidParameter(_)));
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let err = parse(&["--config", "does/not/exist.yaml"])
            .resolve_config()
            .unwrap_err();
        assert!(matches!(err, GoodsError::Io(_)));
    }
}
