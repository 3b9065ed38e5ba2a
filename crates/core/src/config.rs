//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the roster and the
//! presentation layers. The core never reads environment variables itself; binaries read them
//! and hand the raw values to the helpers here.

use crate::constants::{
    DEFAULT_ANALYSIS_DELAY_MS, DEFAULT_FOLLOW_UP_DAYS, DEFAULT_MAX_IMAGE_BYTES,
};
use crate::{CoreError, CoreResult};
use std::str::FromStr;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreConfig {
    follow_up_interval: chrono::Duration,
    analysis_delay: Duration,
    max_image_bytes: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `follow_up_days` is not positive or
    /// `max_image_bytes` is zero.
    pub fn new(
        follow_up_days: i64,
        analysis_delay: Duration,
        max_image_bytes: usize,
    ) -> CoreResult<Self> {
        if follow_up_days <= 0 {
            return Err(CoreError::InvalidConfig(
                "follow-up interval must be at least one day".into(),
            ));
        }
        if max_image_bytes == 0 {
            return Err(CoreError::InvalidConfig(
                "maximum image size must be greater than zero".into(),
            ));
        }

        Ok(Self {
            follow_up_interval: chrono::Duration::days(follow_up_days),
            analysis_delay,
            max_image_bytes,
        })
    }

    /// Gap between a patient's registration and their next appointment.
    pub fn follow_up_interval(&self) -> chrono::Duration {
        self.follow_up_interval
    }

    /// How long a presentation layer waits before publishing an image analysis.
    pub fn analysis_delay(&self) -> Duration {
        self.analysis_delay
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            follow_up_interval: chrono::Duration::days(DEFAULT_FOLLOW_UP_DAYS),
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Parse an optional numeric setting taken from the environment.
///
/// `None` or a blank value yields `default`. `name` is only used in the error message.
pub fn number_from_env_value<T>(name: &str, value: Option<String>, default: T) -> CoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(default),
        Some(v) => v
            .parse::<T>()
            .map_err(|e| CoreError::InvalidConfig(format!("{name}='{v}': {e}"))),
    }
}

/// Build a [`CoreConfig`] from raw environment values, falling back to defaults.
pub fn config_from_env_values(
    follow_up_days: Option<String>,
    analysis_delay_ms: Option<String>,
    max_image_bytes: Option<String>,
) -> CoreResult<CoreConfig> {
    let follow_up_days =
        number_from_env_value("follow_up_days", follow_up_days, DEFAULT_FOLLOW_UP_DAYS)?;
    let delay_ms = number_from_env_value(
        "analysis_delay_ms",
        analysis_delay_ms,
        DEFAULT_ANALYSIS_DELAY_MS,
    )?;
    let max_image_bytes =
        number_from_env_value("max_image_bytes", max_image_bytes, DEFAULT_MAX_IMAGE_BYTES)?;

    CoreConfig::new(
        follow_up_days,
        Duration::from_millis(delay_ms),
        max_image_bytes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_behaviour() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.follow_up_interval(), chrono::Duration::days(14));
        assert_eq!(cfg.analysis_delay(), Duration::from_secs(3));
        assert_eq!(cfg.max_image_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn new_rejects_non_positive_follow_up() {
        let err = CoreConfig::new(0, Duration::ZERO, 1).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
        assert!(CoreConfig::new(7, Duration::ZERO, 0).is_err());
    }

    #[test]
    fn env_values_fall_back_to_defaults_when_missing_or_blank() {
        let cfg = config_from_env_values(None, Some("  ".into()), None).unwrap();
        assert_eq!(cfg, CoreConfig::default());
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg =
            config_from_env_values(Some("28".into()), Some("0".into()), Some("2048".into()))
                .unwrap();
        assert_eq!(cfg.follow_up_interval(), chrono::Duration::days(28));
        assert_eq!(cfg.analysis_delay(), Duration::ZERO);
        assert_eq!(cfg.max_image_bytes(), 2048);
    }

    #[test]
    fn env_values_report_unparseable_setting() {
        let err = config_from_env_values(Some("two weeks".into()), None, None).unwrap_err();
        assert!(err.to_string().contains("follow_up_days='two weeks'"));
    }
}
