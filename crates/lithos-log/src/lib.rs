//! Structured logging for Lithos.
//!
//! Library crates emit events through `tracing`; binaries and tests that host
//! them call [`init_logging`] once to install a subscriber. The filter comes
//! from `RUST_LOG` when set, otherwise from the configured log level.

use std::path::Path;

use lithos_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config specifies one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "lithos.log";

/// Returns the filter directive taken from `config`, falling back to [`DEFAULT_FILTER`].
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Initialize the global tracing subscriber.
///
/// Sets up:
/// - console output with uptime timestamps, targets and levels
/// - a JSON file layer in `log_dir` for debug builds
/// - filtering from `RUST_LOG`, else from `config.debug.log_level`
///
/// Must be called at most once per process.
///
/// ```no_run
/// use lithos_config::Config;
/// use lithos_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);
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

    if debug_build
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
        return;
    }

    subscriber.init();
}

/// Create an `EnvFilter` with [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_log_level() {
        assert_eq!(filter_directive(None), "info");
        assert!(format!("{}", default_env_filter()).contains("info"));
    }

    #[test]
    fn test_config_log_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "warn,lithos_geology=trace".to_string();
        assert_eq!(filter_directive(Some(&config)), "warn,lithos_geology=trace");
    }

    #[test]
    fn test_blank_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in ["info", "debug,lithos_geology=trace", "warn,lithos_config=debug", "error"] {
            assert!(
                EnvFilter::try_new(filter_str).is_ok(),
                "failed to parse filter: {filter_str}"
            );
        }
    }

    #[test]
    fn test_json_output_is_structured() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = fmt()
            .json()
            .with_writer(move || writer.clone())
            .with_env_filter(EnvFilter::new("debug"))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(height = 64, "decoding legacy rock layers");
            tracing::trace!("filtered out");
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 1);
        let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["message"], "decoding legacy rock layers");
        assert_eq!(event["fields"]["height"], 64);
    }

    #[test]
    fn test_file_logger_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join(LOG_FILE_NAME);
        std::fs::File::create(&log_path).unwrap();
        assert_eq!(log_path.file_name().unwrap(), "lithos.log");
    }
}
