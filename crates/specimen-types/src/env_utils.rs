//! Environment variable parsing for engine configuration overrides.
//!
//! # Example
//!
//! ```
//! use specimen_types::env_utils::{env_var, env_var_or};
//!
//! let count: usize = env_var_or("SPECIMEN_DOC_COUNT", 3);
//! assert_eq!(count, 3);
//!
//! let seed: Option<u64> = env_var("SPECIMEN_DOC_SEED");
//! assert!(seed.is_none());
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is unset, blank, or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    env_raw(key).and_then(|v| v.parse().ok())
}

/// Parse an environment variable, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Parse an environment variable, surfacing parse failures instead of
/// silently ignoring them. `Ok(None)` when the variable is unset.
pub fn env_var_checked<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_raw(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| format!("{}={:?}: {}", key, raw, e)),
    }
}

/// True when the variable is "1", "true", "yes" or "on" (case-insensitive);
/// `default` when unset.
pub fn env_bool_or(key: &str, default: bool) -> bool {
    match env_raw(key) {
        Some(v) => matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

fn env_raw(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parsing() {
        std::env::set_var("SPECIMEN_TEST_U64", " 42 ");
        let val: Option<u64> = env_var("SPECIMEN_TEST_U64");
        assert_eq!(val, Some(42));

        let missing: Option<u64> = env_var("SPECIMEN_NONEXISTENT_1");
        assert_eq!(missing, None);

        std::env::remove_var("SPECIMEN_TEST_U64");
    }

    #[test]
    fn test_env_var_checked_reports_garbage() {
        std::env::set_var("SPECIMEN_TEST_BAD", "-3");
        let result: Result<Option<usize>, String> = env_var_checked("SPECIMEN_TEST_BAD");
        assert!(result.unwrap_err().contains("SPECIMEN_TEST_BAD"));

        let unset: Result<Option<usize>, String> = env_var_checked("SPECIMEN_NONEXISTENT_2");
        assert_eq!(unset, Ok(None));

        std::env::remove_var("SPECIMEN_TEST_BAD");
    }

    #[test]
    fn test_env_bool_or() {
        std::env::set_var("SPECIMEN_TEST_BOOL", "On");
        assert!(env_bool_or("SPECIMEN_TEST_BOOL", false));
        assert!(env_bool_or("SPECIMEN_NONEXISTENT_3", true));
        assert!(!env_bool_or("SPECIMEN_NONEXISTENT_4", false));
        std::env::remove_var("SPECIMEN_TEST_BOOL");
    }
}
