use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::presenter::Timings;

use super::defaults::{
    default_auto_dismiss, default_entrance_delay, default_exit_animation,
    default_header_height, default_header_hide_after, default_interaction_capacity,
    default_outside_click_grace, default_section_offset, default_submit_delay,
};
use super::env::{env_duration, env_parse};
use super::{Config, ContactSettings, HumantimeDuration, PageSettings};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("TOASTER")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Load(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) notify: RawNotify,
    #[serde(default)]
    pub(super) contact: RawContact,
    #[serde(default)]
    pub(super) page: RawPage,
    #[serde(default)]
    pub(super) app: RawApp,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_entrance_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) entrance_delay: Duration,
    #[serde(default = "default_auto_dismiss")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) auto_dismiss: Duration,
    #[serde(default = "default_outside_click_grace")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) outside_click_grace: Duration,
    #[serde(default = "default_exit_animation")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) exit_animation: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawContact {
    #[serde(default = "default_submit_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) submit_delay: Duration,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawPage {
    #[serde(default = "default_header_height")]
    pub(super) header_height: f64,
    #[serde(default = "default_header_hide_after")]
    pub(super) header_hide_after: f64,
    #[serde(default = "default_section_offset")]
    pub(super) section_offset: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawApp {
    #[serde(default = "default_interaction_capacity")]
    pub(super) interaction_capacity: usize,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(delay) = env_duration("TOAST_ENTRANCE_DELAY")? {
            self.notify.entrance_delay = delay;
        }
        if let Some(auto_dismiss) = env_duration("TOAST_AUTO_DISMISS")? {
            self.notify.auto_dismiss = auto_dismiss;
        }
        if let Some(grace) = env_duration("TOAST_OUTSIDE_GRACE")? {
            self.notify.outside_click_grace = grace;
        }
        if let Some(exit) = env_duration("TOAST_EXIT_ANIMATION")? {
            self.notify.exit_animation = exit;
        }
        if let Some(delay) = env_duration("CONTACT_SUBMIT_DELAY")? {
            self.contact.submit_delay = delay;
        }
        if let Some(capacity) = env_parse::<usize>("INTERACTION_CAPACITY")? {
            self.app.interaction_capacity = capacity;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if self.notify.auto_dismiss.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "notify.auto_dismiss",
                message: "auto-dismiss delay must be greater than zero".to_string(),
            }
            .into());
        }
        if self.notify.outside_click_grace >= self.notify.auto_dismiss {
            return Err(ConfigError::InvalidField {
                field: "notify.outside_click_grace",
                message: format!(
                    "grace period ({}) must be shorter than auto-dismiss ({})",
                    humantime::format_duration(self.notify.outside_click_grace),
                    humantime::format_duration(self.notify.auto_dismiss),
                ),
            }
            .into());
        }
        if self.app.interaction_capacity == 0 {
            return Err(ConfigError::InvalidField {
                field: "app.interaction_capacity",
                message: "interaction capacity must be greater than zero".to_string(),
            }
            .into());
        }
        if self.page.header_height < 0.0 || self.page.section_offset < 0.0 {
            return Err(ConfigError::InvalidField {
                field: "page",
                message: "offsets cannot be negative".to_string(),
            }
            .into());
        }

        Ok(Config {
            timings: Timings {
                entrance_delay: self.notify.entrance_delay,
                auto_dismiss: self.notify.auto_dismiss,
                outside_click_grace: self.notify.outside_click_grace,
                exit_animation: self.notify.exit_animation,
            },
            interaction_capacity: self.app.interaction_capacity,
            contact: ContactSettings {
                submit_delay: self.contact.submit_delay,
            },
            page: PageSettings {
                header_height: self.page.header_height,
                header_hide_after: self.page.header_hide_after,
                section_offset: self.page.section_offset,
            },
        })
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            entrance_delay: default_entrance_delay(),
            auto_dismiss: default_auto_dismiss(),
            outside_click_grace: default_outside_click_grace(),
            exit_animation: default_exit_animation(),
        }
    }
}

impl Default for RawContact {
    fn default() -> Self {
        Self {
            submit_delay: default_submit_delay(),
        }
    }
}

impl Default for RawPage {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
            header_hide_after: default_header_hide_after(),
            section_offset: default_section_offset(),
        }
    }
}

impl Default for RawApp {
    fn default() -> Self {
        Self {
            interaction_capacity: default_interaction_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawConfig;
    use std::time::Duration;

    #[test]
    fn zero_auto_dismiss_is_rejected() {
        let mut raw = RawConfig::default();
        raw.notify.auto_dismiss = Duration::ZERO;
        assert!(raw.validate_and_build().is_err());
    }

    #[test]
    fn zero_interaction_capacity_is_rejected() {
        let mut raw = RawConfig::default();
        raw.app.interaction_capacity = 0;
        let err = raw.validate_and_build().unwrap_err();
        assert!(err.to_string().contains("app.interaction_capacity"));
    }
}
