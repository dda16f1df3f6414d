//! Configuration system for Fascicle.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap, and
//! tolerate missing or unknown fields so config files survive upgrades.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{ChunkingConfig, Config, DatasetConfig, DebugConfig};
pub use error::ConfigError;
