//! Command-line argument parsing for Fascicle.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Fascicle command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "fascicle", about = "Chunk fiber tracts into draw-call sized buffers")]
pub struct CliArgs {
    /// Exclusive per-chunk vertex limit.
    #[arg(long)]
    pub vertex_limit: Option<u32>,

    /// Dataset directory containing `tracts.ron` and `vertices.bin`.
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Number of synthetic tracts when no dataset directory is set.
    #[arg(long)]
    pub tracts: Option<u32>,

    /// RNG seed for synthetic data.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Only report this region.
    #[arg(long, allow_negative_numbers = true)]
    pub region: Option<i32>,

    /// Write the dataset in use to this directory.
    #[arg(long)]
    pub write_dataset: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(limit) = args.vertex_limit {
            self.chunking.vertex_limit = limit;
        }
        if let Some(ref dir) = args.dataset {
            self.dataset.directory = Some(dir.clone());
        }
        if let Some(tracts) = args.tracts {
            self.dataset.synthetic_tracts = tracts;
        }
        if let Some(seed) = args.seed {
            self.dataset.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
