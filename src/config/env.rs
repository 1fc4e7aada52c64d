//! Flat environment overrides (`TOAST_AUTO_DISMISS=3s`, ...).
//!
//! Unset and blank variables both mean "keep the file value".

use std::env::{self, VarError};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

fn read_var(key: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err @ VarError::NotUnicode(_)) => Err(ConfigError::InvalidField {
            field: key,
            message: err.to_string(),
        }),
    }
}

fn convert<T, E>(
    key: &'static str,
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> Result<Option<T>, ConfigError>
where
    E: Display,
{
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    parse(raw.trim())
        .map(Some)
        .map_err(|err| ConfigError::InvalidField {
            field: key,
            message: format!("{raw:?}: {err}"),
        })
}

pub(super) fn env_parse<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    convert(key, read_var(key)?, str::parse::<T>)
}

pub(super) fn env_duration(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    convert(key, read_var(key)?, humantime::parse_duration)
}
