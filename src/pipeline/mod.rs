//! Configuration and execution of a full filtering run.

mod config;
mod runner;
mod summary;

pub use config::GoodsConfig;
pub use runner::{process_specimen, GoodsFilter, GoodsRun};
pub use summary::FilterSummary;
