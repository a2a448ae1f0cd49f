//! Environment variable utilities
//!
//! Small typed accessors used by `kprint` and the smoke tool.
//!
//! ```ignore
//! let line: u32 = env_get("GPM_LINE", 46);
//! let flush = env_get_bool("GPM_FLUSH_EPRINT", false);
//! ```

use std::str::FromStr;

/// Get an environment variable parsed as `T`, or the default.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Get an environment variable as a boolean.
///
/// "1", "true", "yes", "on" (case-insensitive) are true; anything else
/// set is false; unset returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_default() {
        let v: u32 = env_get("GPM_TEST_UNSET_VAR", 46);
        assert_eq!(v, 46);
    }

    #[test]
    fn test_env_get_bool_default() {
        assert!(env_get_bool("GPM_TEST_UNSET_BOOL", true));
        assert!(!env_get_bool("GPM_TEST_UNSET_BOOL2", false));
    }
}
