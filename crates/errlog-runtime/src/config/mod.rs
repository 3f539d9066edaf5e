//! errlog configuration
//!
//! Compile-time defaults come from `build.rs` (see [`defaults`]); runtime
//! settings are read from the environment.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls on [`ReporterConfig`]
//! 2. Environment variables (runtime, read by [`ReporterConfig::from_env`])
//! 3. Library defaults
//!
//! ```rust,ignore
//! use errlog_runtime::config::ReporterConfig;
//!
//! let config = ReporterConfig::from_env()
//!     .fatal_report(false)
//!     .history_path("/fs/crash.txt");
//! reporter.configure(&config);
//! ```

/// Compile-time settings generated by `build.rs`.
///
/// - `HIST_SIZE` - history ring capacity (`ERRLOG_HIST_SIZE`, default 4)
/// - `FILENAME_CAPTURE` - default for call-site capture (`ERRLOG_FILENAME_CAPTURE`)
pub mod defaults {
    include!(concat!(env!("OUT_DIR"), "/errlog_config.rs"));

    pub const HISTORY_PATH: &str = "/fs/errors.txt";
    pub const FATAL_REPORT: bool = true;
}

use errlog_core::env::{env_get_bool, env_get_str};

/// Runtime reporter settings with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Record the caller's file and line in each record
    pub capture_location: bool,
    /// Print the error report on stderr before halting
    pub fatal_report: bool,
    /// Default target for `save_history`
    pub history_path: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ReporterConfig {
    /// Compile-time defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `ERRLOG_CAPTURE_LOCATION` - Record call sites (0/1)
    /// - `ERRLOG_FATAL_REPORT` - Print the report on fatal errors (0/1)
    /// - `ERRLOG_HISTORY_PATH` - Default history file path
    pub fn from_env() -> Self {
        Self {
            capture_location: env_get_bool("ERRLOG_CAPTURE_LOCATION", defaults::FILENAME_CAPTURE),
            fatal_report: env_get_bool("ERRLOG_FATAL_REPORT", defaults::FATAL_REPORT),
            history_path: env_get_str("ERRLOG_HISTORY_PATH", defaults::HISTORY_PATH),
        }
    }

    /// Library defaults only, no environment. Useful for tests.
    pub fn new() -> Self {
        Self {
            capture_location: defaults::FILENAME_CAPTURE,
            fatal_report: defaults::FATAL_REPORT,
            history_path: defaults::HISTORY_PATH.to_string(),
        }
    }

    // Builder methods

    pub fn capture_location(mut self, enable: bool) -> Self {
        self.capture_location = enable;
        self
    }

    pub fn fatal_report(mut self, enable: bool) -> Self {
        self.fatal_report = enable;
        self
    }

    pub fn history_path(mut self, path: impl Into<String>) -> Self {
        self.history_path = path.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_path.is_empty() {
            return Err(ConfigError::InvalidValue("history_path must not be empty"));
        }
        if !self.history_path.starts_with('/') {
            return Err(ConfigError::InvalidValue("history_path must be absolute (/<mount>/<file>)"));
        }
        if self.history_path.ends_with('/') {
            return Err(ConfigError::InvalidValue("history_path must name a file"));
        }
        Ok(())
    }

    /// Print configuration (for debugging)
    pub fn print(&self) {
        eprintln!("errlog configuration:");
        eprintln!("  history capacity:  {}", defaults::HIST_SIZE);
        eprintln!("  capture_location:  {}", self.capture_location);
        eprintln!("  fatal_report:      {}", self.fatal_report);
        eprintln!("  history_path:      {}", self.history_path);
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::new();
        assert_eq!(config.history_path, "/fs/errors.txt");
        assert!(config.fatal_report);
        assert!(config.validate().is_ok());
        assert!(defaults::HIST_SIZE > 0);
    }

    #[test]
    fn test_builder() {
        let config = ReporterConfig::new()
            .capture_location(false)
            .fatal_report(false)
            .history_path("/sd/hist.log");
        assert!(!config.capture_location);
        assert!(!config.fatal_report);
        assert_eq!(config.history_path, "/sd/hist.log");
    }

    #[test]
    fn test_validation() {
        assert!(ReporterConfig::new().history_path("").validate().is_err());
        assert!(ReporterConfig::new().history_path("errors.txt").validate().is_err());
        assert!(ReporterConfig::new().history_path("/fs/").validate().is_err());
    }

    #[test]
    fn test_from_env_override() {
        std::env::set_var("ERRLOG_HISTORY_PATH", "/flash/errs.txt");
        let config = ReporterConfig::from_env();
        std::env::remove_var("ERRLOG_HISTORY_PATH");
        assert_eq!(config.history_path, "/flash/errs.txt");
    }

    #[test]
    fn test_builder_beats_environment() {
        std::env::set_var("ERRLOG_FATAL_REPORT", "1");
        let config = ReporterConfig::from_env().fatal_report(false);
        std::env::remove_var("ERRLOG_FATAL_REPORT");
        assert!(!config.fatal_report);
    }
}
