use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToasterError;
use crate::presenter::Timings;

mod defaults;
mod env;
mod raw;
mod serde;

use self::serde::HumantimeDuration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub timings: Timings,
    /// Buffered interactions per listener before it starts lagging.
    pub interaction_capacity: usize,
    pub contact: ContactSettings,
    pub page: PageSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSettings {
    pub submit_delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    pub header_height: f64,
    pub header_hide_after: f64,
    pub section_offset: f64,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be read, parsed,
    /// when environment overrides are invalid, or when the resulting values
    /// fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToasterError::from)?;
        raw.apply_env_overrides().map_err(ToasterError::from)?;
        raw.validate_and_build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timings: Timings::default(),
            interaction_capacity: defaults::default_interaction_capacity(),
            contact: ContactSettings {
                submit_delay: defaults::default_submit_delay(),
            },
            page: PageSettings {
                header_height: defaults::default_header_height(),
                header_hide_after: defaults::default_header_hide_after(),
                section_offset: defaults::default_section_offset(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::time::Duration;

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("toaster-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = Config::from_env_and_file(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.timings.auto_dismiss, Duration::from_secs(5));
    }

    #[test]
    fn file_values_override_defaults() {
        let path = std::env::temp_dir().join(format!("toaster-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[notify]\nauto_dismiss = \"8s\"\nexit_animation = \"150ms\"\n\n[contact]\nsubmit_delay = \"2s\"\n\n[page]\nheader_height = 64.0\n",
        )
        .unwrap();

        let config = Config::from_env_and_file(&path);
        let _ = std::fs::remove_file(&path);
        let config = config.unwrap();

        assert_eq!(config.timings.auto_dismiss, Duration::from_secs(8));
        assert_eq!(config.timings.exit_animation, Duration::from_millis(150));
        assert_eq!(config.timings.outside_click_grace, Duration::from_millis(500));
        assert_eq!(config.contact.submit_delay, Duration::from_secs(2));
        assert!((config.page.header_height - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn grace_longer_than_auto_dismiss_is_rejected() {
        let path = std::env::temp_dir().join(format!("toaster-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[notify]\nauto_dismiss = \"1s\"\noutside_click_grace = \"2s\"\n",
        )
        .unwrap();

        let result = Config::from_env_and_file(&path);
        let _ = std::fs::remove_file(&path);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("notify.outside_click_grace"), "{err}");
    }
}
