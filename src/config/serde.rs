use std::fmt;
use std::time::Duration;

use humantime::parse_duration;
use serde::de::{self, Visitor};
use serde_with::DeserializeAs;

/// Duration written as a humantime string (`"500ms"`, `"5s"`) or as bare milliseconds.
///
/// Bare numbers show up when an environment override is parsed with `try_parsing`.
pub(super) struct HumantimeDuration;

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"300ms\" or a number of milliseconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
        parse_duration(value.trim()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Duration, E> {
        Ok(Duration::from_millis(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Duration, E> {
        u64::try_from(value)
            .map(Duration::from_millis)
            .map_err(|_| E::custom("duration cannot be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::HumantimeDuration;
    use serde::Deserialize;
    use serde_with::serde_as;
    use std::time::Duration;

    #[serde_as]
    #[derive(Deserialize)]
    struct Sample {
        #[serde_as(as = "Option<HumantimeDuration>")]
        duration: Option<Duration>,
    }

    fn parse(json: &str) -> Result<Option<Duration>, serde_json::Error> {
        serde_json::from_str::<Sample>(json).map(|s| s.duration)
    }

    #[test]
    fn humantime_duration_parses_strings() {
        assert_eq!(parse(r#"{"duration":"5s"}"#).unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(
            parse(r#"{"duration":"300ms"}"#).unwrap(),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn bare_numbers_are_milliseconds() {
        assert_eq!(
            parse(r#"{"duration":1200}"#).unwrap(),
            Some(Duration::from_millis(1200))
        );
        assert!(parse(r#"{"duration":-5}"#).is_err());
        assert!(parse(r#"{"duration":"soon"}"#).is_err());
    }
}
