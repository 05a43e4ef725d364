use std::env;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_FS_NAME: &str = "fsmock.Fs";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;

const ENV_FS_NAME: &str = "FSMOCK_FS_NAME";
const ENV_LOG_LEVEL: &str = "FSMOCK_LOG_LEVEL";
const ENV_LOG_JSON: &str = "FSMOCK_LOG_JSON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Process-level settings for the mocks, read from `FSMOCK_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsMockConfig {
    /// Name reported by `MockFs::name` when built through a `Mocker`.
    pub fs_name: String,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for FsMockConfig {
    fn default() -> Self {
        let fs_name = env::var(ENV_FS_NAME)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FS_NAME.to_string());

        let log_level = env::var(ENV_LOG_LEVEL)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        let log_json = env::var(ENV_LOG_JSON)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_LOG_JSON);

        Self {
            fs_name,
            log_level,
            log_json,
        }
    }
}

impl FsMockConfig {
    /// Strict variant of `default()`: malformed values are reported instead
    /// of being replaced by defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_LOG_JSON) {
            config.log_json = raw.parse::<bool>().map_err(|e| ConfigError::ParseError {
                field: ENV_LOG_JSON.to_string(),
                error: e.to_string(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fs_name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Filesystem name cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            ))),
        }
    }
}

impl fmt::Display for FsMockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fsmock Configuration:")?;
        writeln!(f, "  Fs Name: {}", self.fs_name)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}

/// Name reported by mocked filesystems, resolved once per process.
pub fn fs_name() -> &'static str {
    static FS_NAME: OnceLock<String> = OnceLock::new();

    FS_NAME.get_or_init(|| FsMockConfig::default().fs_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = [
            EnvGuard::unset(ENV_FS_NAME),
            EnvGuard::unset(ENV_LOG_LEVEL),
            EnvGuard::unset(ENV_LOG_JSON),
        ];

        let config = FsMockConfig::default();

        assert_eq!(config.fs_name, DEFAULT_FS_NAME);
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.log_json, DEFAULT_LOG_JSON);
    }

    #[test]
    #[serial]
    fn test_environment_variable_parsing() {
        let _guards = [
            EnvGuard::set(ENV_FS_NAME, "custom.Fs"),
            EnvGuard::set(ENV_LOG_LEVEL, "DEBUG"),
            EnvGuard::set(ENV_LOG_JSON, "true"),
        ];

        let config = FsMockConfig::default();

        assert_eq!(config.fs_name, "custom.Fs");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    #[serial]
    fn test_empty_fs_name_falls_back_to_default() {
        let _guard = EnvGuard::set(ENV_FS_NAME, "");

        assert_eq!(FsMockConfig::default().fs_name, DEFAULT_FS_NAME);
    }

    #[test]
    #[serial]
    fn test_blank_fs_name_falls_back_to_default() {
        let _guards = [
            EnvGuard::set(ENV_FS_NAME, "   "),
            EnvGuard::unset(ENV_LOG_LEVEL),
        ];

        let config = FsMockConfig::default();

        assert_eq!(config.fs_name, DEFAULT_FS_NAME);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_malformed_bool() {
        let _guard = EnvGuard::set(ENV_LOG_JSON, "maybe");

        assert!(!FsMockConfig::default().log_json);
        match FsMockConfig::from_env() {
            Err(ConfigError::ParseError { field, .. }) => assert_eq!(field, ENV_LOG_JSON),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_level() {
        let _guards = [
            EnvGuard::set(ENV_LOG_LEVEL, "verbose"),
            EnvGuard::unset(ENV_LOG_JSON),
        ];

        let err = FsMockConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid log level: verbose"));
    }

    #[test]
    fn test_display() {
        let config = FsMockConfig {
            fs_name: "x.Fs".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
        };

        let rendered = config.to_string();
        assert!(rendered.contains("Fs Name: x.Fs"));
        assert!(rendered.contains("Log Level: warn"));
    }
}
