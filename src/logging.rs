//! Tracing subscriber setup for binaries embedding this crate.
//!
//! Interactive front-ends must not write logs to stdout/stderr (that
//! would corrupt the screen), so the file variant routes everything to a
//! daily-rolling file through a non-blocking writer. `RUST_LOG` always
//! takes precedence over the configured filter.

use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn filter_from_config(config: &LoggingConfig) -> EnvFilter {
    let mut filter_str = config.level.to_string();
    for (module, level) in &config.module_levels {
        filter_str.push_str(&format!(",{}={}", module, level));
    }
    EnvFilter::new(filter_str)
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => filter_from_config(config),
    }
}

/// Log to a daily-rolling file. The returned guard must be kept alive for
/// the process lifetime or buffered lines are lost on exit.
pub fn init_file_logging(config: &LoggingConfig) -> WorkerGuard {
    let log_dir = config.log_directory.as_deref().unwrap_or("logs");
    let file_appender = tracing_appender::rolling::daily(log_dir, "hn-reader.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .with_writer(non_blocking)
        .with_ansi(false)
        .compact()
        .init();

    guard
}

/// Log to the console; for plain command-line drivers where stderr is fine.
pub fn init_console_logging(config: &LoggingConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(config))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_includes_module_levels() {
        let mut config = LoggingConfig::default();
        config.level = "warn".to_string();
        config
            .module_levels
            .insert("hn_reader::api".to_string(), "debug".to_string());

        // EnvFilter has no accessor; round-trip through Display.
        let filter = filter_from_config(&config);
        let rendered = filter.to_string();
        assert!(rendered.contains("warn"));
        assert!(rendered.contains("hn_reader::api=debug"));
    }
}
