use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub backend_base_url: Option<Url>,
    pub backend_token: Option<String>,
    pub use_fixtures: bool,
    pub fixture_path: Option<PathBuf>,
    pub debug: bool,
    pub auth_token: String,
    pub enable_swagger: bool,
    pub port: u16,
    /// IANA zone used for calendar-day comparisons.
    pub timezone: String,
    pub label_include_year: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_environment(None)
    }

    /// Loads `APP_*` variables from `vars`, or from the process
    /// environment when `None`.
    pub fn from_environment(vars: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // APP_AUTH_TOKEN -> auth_token
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .set_default("use_fixtures", false)?
            .set_default("debug", false)?
            .set_default("auth_token", "default-token-change-me")?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("timezone", "UTC")?
            .set_default("label_include_year", false)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_environment(vars(&[])).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.auth_token, "default-token-change-me");
        assert!(settings.backend_base_url.is_none());
        assert!(!settings.use_fixtures);
        assert!(!settings.label_include_year);
    }

    #[test]
    fn test_overrides_from_env() {
        let settings = Settings::from_environment(vars(&[
            ("APP_PORT", "9090"),
            ("APP_TIMEZONE", "Europe/Warsaw"),
            ("APP_AUTH_TOKEN", "s3cret"),
            ("APP_BACKEND_BASE_URL", "http://backend.local/api"),
            ("APP_USE_FIXTURES", "true"),
            ("APP_LABEL_INCLUDE_YEAR", "true"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 9090);
        assert_eq!(settings.timezone, "Europe/Warsaw");
        assert_eq!(settings.auth_token, "s3cret");
        assert_eq!(
            settings.backend_base_url.map(|u| u.to_string()),
            Some("http://backend.local/api".to_string())
        );
        assert!(settings.use_fixtures);
        assert!(settings.label_include_year);
    }

    #[test]
    fn test_invalid_port_is_error() {
        assert!(Settings::from_environment(vars(&[("APP_PORT", "not-a-port")])).is_err());
    }
}
