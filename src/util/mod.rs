//! Utility modules for fsmock

pub mod logging;

pub use logging::{init_default, init_from_env, init_logging, init_test_logging, LoggingConfig};
