//! Typed environment lookups shared by every `from_env` constructor.
//!
//! Unset or blank variables take their default. A value that is present but
//! does not parse is a startup error, never a silent fallback.

use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("{key}='{value}' is not a valid {expected}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Parse `key` as `T`, using `default` when it is unset or blank.
pub fn var_or<T: FromStr>(key: &'static str, default: T) -> Result<T, EnvError> {
    parse_or(key, std::env::var(key).ok(), default)
}

/// A non-blank string value for `key`.
pub fn required(key: &'static str) -> Result<String, EnvError> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(EnvError::Missing { key })
}

/// A non-blank string value for `key`, if any.
pub fn optional(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, EnvError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value.parse().map_err(|_| EnvError::Invalid {
            key,
            value: value.to_string(),
            expected: short_type_name::<T>(),
        }),
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
