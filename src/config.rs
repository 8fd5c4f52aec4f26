use core::str::FromStr;
use thiserror::Error;

/// Environment variable consulted by [`Config::from_env`].
pub const ENABLED_ENV: &str = "SYNC_POINT_ENABLED";

/// Construction-time settings of a [`SyncPoint`](crate::engine::SyncPoint).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Whether processing is enabled right after construction.
    ///
    /// Off by default, so instrumented code runs untouched until a test opts in.
    pub enabled: bool,
}

impl Config {
    /// Settings with processing switched on from the start.
    #[must_use]
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Read settings from the environment.
    ///
    /// Reads `SYNC_POINT_ENABLED`. Falls back to the default if it is unset or
    /// cannot be parsed.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Read settings from the environment, using `default` for anything unset or
    /// invalid.
    #[must_use]
    pub fn from_env_or(default: Self) -> Self {
        Self::from_value(std::env::var(ENABLED_ENV).ok().as_deref(), default)
    }

    fn from_value(value: Option<&str>, default: Self) -> Self {
        let enabled = value
            .and_then(|value| match value.parse::<Toggle>() {
                Ok(toggle) => Some(bool::from(toggle)),
                Err(err) => {
                    tracing::warn!("ignoring {ENABLED_ENV}: {err}");
                    None
                }
            })
            .unwrap_or(default.enabled);
        Self { enabled }
    }
}

/// Error produced while parsing configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The value is not a recognised on/off spelling.
    #[error("invalid toggle '{0}', expected one of 1/0, true/false, on/off, yes/no")]
    InvalidToggle(String),
}

/// An on/off switch as spelled in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Switched on.
    On,
    /// Switched off.
    Off,
}

impl FromStr for Toggle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(Self::On),
            "0" | "false" | "off" | "no" => Ok(Self::Off),
            _ => Err(ConfigError::InvalidToggle(s.to_owned())),
        }
    }
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        matches!(toggle, Toggle::On)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_from_str() {
        assert_eq!("1".parse::<Toggle>().unwrap(), Toggle::On);
        assert_eq!("TRUE".parse::<Toggle>().unwrap(), Toggle::On);
        assert_eq!(" yes ".parse::<Toggle>().unwrap(), Toggle::On);
        assert_eq!("off".parse::<Toggle>().unwrap(), Toggle::Off);
        assert_eq!("No".parse::<Toggle>().unwrap(), Toggle::Off);
        assert_eq!(
            "maybe".parse::<Toggle>().unwrap_err(),
            ConfigError::InvalidToggle("maybe".to_owned())
        );
    }

    #[test]
    fn value_overrides_default() {
        let off = Config::default();
        let on = Config::enabled();
        assert_eq!(Config::from_value(None, off), off);
        assert_eq!(Config::from_value(None, on), on);
        assert_eq!(Config::from_value(Some("on"), off), on);
        assert_eq!(Config::from_value(Some("0"), on), off);
        assert_eq!(Config::from_value(Some("garbage"), off), off);
        assert_eq!(Config::from_value(Some("garbage"), on), on);
    }

    #[test]
    fn disabled_by_default() {
        assert!(!Config::default().enabled);
        assert!(Config::enabled().enabled);
    }
}
