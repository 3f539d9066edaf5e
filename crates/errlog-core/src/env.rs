//! Environment variable utilities
//!
//! Backing for `ReporterConfig::from_env()` and the logging setup.
//!
//! ```ignore
//! use errlog_core::env::{env_get, env_get_bool, env_get_str};
//!
//! let hist_path = env_get_str("ERRLOG_HISTORY_PATH", "/fs/errors.txt");
//! let report: bool = env_get_bool("ERRLOG_FATAL_REPORT", true);
//! let chunk: usize = env_get("ERRLOG_READ_CHUNK", 64);
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// Unset and unparsable values both fall back to `default`.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Get environment variable as boolean
///
/// "1", "true", "yes", "on" read as true and "0", "false", "no", "off" as
/// false (case-insensitive). Anything else, including unset, is `default`.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => match val.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default() {
        let val: usize = env_get("__ERRLOG_TEST_UNSET__", 42);
        assert_eq!(val, 42);
        let val: Option<u32> = env_get_opt("__ERRLOG_TEST_UNSET__");
        assert!(val.is_none());
        assert_eq!(env_get_str("__ERRLOG_TEST_UNSET__", "/fs/errors.txt"), "/fs/errors.txt");
    }

    #[test]
    fn test_env_get_with_set_var() {
        std::env::set_var("__ERRLOG_TEST_NUM__", " 16 ");
        let val: usize = env_get("__ERRLOG_TEST_NUM__", 0);
        assert_eq!(val, 16);
        std::env::remove_var("__ERRLOG_TEST_NUM__");
    }

    #[test]
    fn test_env_get_invalid_parse() {
        std::env::set_var("__ERRLOG_TEST_INVALID__", "four");
        let val: usize = env_get("__ERRLOG_TEST_INVALID__", 4);
        assert_eq!(val, 4);
        std::env::remove_var("__ERRLOG_TEST_INVALID__");
    }

    #[test]
    fn test_env_get_bool_variants() {
        let key = "__ERRLOG_TEST_BOOL__";
        for on in ["1", "true", "TRUE", "yes", "on"] {
            std::env::set_var(key, on);
            assert!(env_get_bool(key, false), "{on}");
        }
        for off in ["0", "false", "no", "Off"] {
            std::env::set_var(key, off);
            assert!(!env_get_bool(key, true), "{off}");
        }
        std::env::set_var(key, "garbage");
        assert!(env_get_bool(key, true));
        assert!(!env_get_bool(key, false));
        std::env::remove_var(key);
    }
}
