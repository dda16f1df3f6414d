//! Structured logging for Fascicle.
//!
//! Console output with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The level comes from `RUST_LOG` when set, else
//! from the config's `debug.log_level`.

use fascicle_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config name a level.
const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "fascicle.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration supplying the log level and file toggle
///
/// ```no_run
/// use fascicle_config::Config;
/// use fascicle_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if file_logging_enabled(debug_build, config)
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!(
            path = %log_dir.join(LOG_FILE_NAME).display(),
            "JSON file logging enabled"
        );
        return;
    }

    subscriber.init();
    tracing::debug!("console logging only");
}

/// Whether the JSON file layer should be installed.
///
/// File logging is limited to debug builds and can be switched off with
/// `debug.log_to_file`; without a config it defaults to on.
pub fn file_logging_enabled(debug_build: bool, config: Option<&Config>) -> bool {
    debug_build && config.is_none_or(|c| c.debug.log_to_file)
}

/// Filter directive string for `config`, falling back to [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter = default_env_filter();
        assert!(format!("{}", filter).contains("info"));
    }

    #[test]
    fn test_filter_from_config() {
        let mut config = Config::default();
        config.debug.log_level = "debug,fascicle_core=trace".to_string();
        assert_eq!(filter_string(Some(&config)), "debug,fascicle_core=trace");
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level.clear();
        assert_eq!(filter_string(Some(&config)), "info");
        assert_eq!(filter_string(None), "info");
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,fascicle_core=trace",
            "warn,fascicle_core::planner=debug",
            "error",
        ];
        for filter_str in &valid_filters {
            let result = EnvFilter::try_from(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_file_logging_toggle() {
        let mut config = Config::default();
        assert!(file_logging_enabled(true, Some(&config)));
        assert!(file_logging_enabled(true, None));
        assert!(!file_logging_enabled(false, Some(&config)));

        config.debug.log_to_file = false;
        assert!(!file_logging_enabled(true, Some(&config)));
    }

    #[test]
    fn test_disabled_file_logging_creates_no_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_to_file = false;

        init_logging(Some(temp_dir.path()), true, Some(&config));
        tracing::info!("after init");

        assert!(!temp_dir.path().join(LOG_FILE_NAME).exists());
    }
}
