//! Structured logging setup for fsmock
//!
//! Mocks and overrides emit `tracing` events (`debug` when they are built,
//! `trace` for every call the std::fs adapter forwards). Nothing is printed
//! unless a subscriber is installed, which is what this module does.
//!
//! # Example
//!
//! ```no_run
//! use fsmock::util::logging;
//!
//! // In a test: route events through the libtest capture.
//! logging::init_test_logging();
//!
//! // Or honor FSMOCK_LOG_LEVEL / FSMOCK_LOG_JSON / RUST_LOG.
//! logging::init_from_env();
//! ```

use crate::config::FsMockConfig;
use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., fsmock::callbacks) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,

    /// Include thread ID and name in logs
    pub include_thread_ids: bool,

    /// Write through the libtest capture instead of straight to stdout
    pub test_writer: bool,
}

impl Default for LoggingConfig {
    /// Defaults: INFO, pretty console output, targets on, everything else off.
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
            include_thread_ids: false,
            test_writer: false,
        }
    }
}

impl LoggingConfig {
    /// Creates a logging configuration with the specified level
    ///
    /// ```
    /// use fsmock::util::LoggingConfig;
    /// use tracing::Level;
    ///
    /// let config = LoggingConfig::with_level(Level::DEBUG);
    /// assert_eq!(config.level, Level::DEBUG);
    /// ```
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Configuration used inside `cargo test`: every mock and override event,
    /// captured per test.
    pub fn for_tests() -> Self {
        Self {
            level: Level::TRACE,
            include_location: true,
            test_writer: true,
            ..Default::default()
        }
    }
}

/// Parses a log level from a string, falling back to INFO.
///
/// ```
/// use fsmock::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

/// Initializes the logging system with the provided configuration.
///
/// Only the first call installs a subscriber; later calls are ignored, as is
/// the case where another subscriber was already set globally.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = format!("fsmock={}", config.level).parse() {
            filter = filter.add_directive(directive);
        }

        let layer = fmt::layer()
            .with_target(config.include_target)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_thread_ids(config.include_thread_ids)
            .with_thread_names(config.include_thread_ids);

        let registry = tracing_subscriber::registry().with(filter);

        let result = match (config.use_json, config.test_writer) {
            (true, true) => registry.with(layer.json().with_test_writer()).try_init(),
            (true, false) => registry.with(layer.json()).try_init(),
            (false, true) => registry.with(layer.with_test_writer()).try_init(),
            (false, false) => registry.with(layer).try_init(),
        };

        if result.is_err() && env::var("RUST_LOG").is_ok() {
            eprintln!("fsmock: a global tracing subscriber is already installed");
        }
    });
}

/// Initializes logging with default configuration
pub fn init_default() {
    init_logging(LoggingConfig::default());
}

/// Initializes logging from `FSMOCK_LOG_LEVEL` and `FSMOCK_LOG_JSON`.
pub fn init_from_env() {
    let settings = FsMockConfig::default();

    init_logging(LoggingConfig {
        level: parse_level(&settings.log_level),
        use_json: settings.log_json,
        ..Default::default()
    });
}

/// Initializes logging for a test binary. Safe to call from every test.
pub fn init_test_logging() {
    init_logging(LoggingConfig::for_tests());
}
