//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into services behind an
//! `Arc`. Services never read process environment themselves; the `*_from_env_value` parsers
//! take the raw `Option<String>` so they can be tested without touching the environment.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT, ENV_API_BASE_URL, ENV_HTTP_TIMEOUT_SECS,
    ENV_STUB_FIXTURES, ENV_USE_STUB_DATA,
};
use crate::{HmsError, HmsResult};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    use_stub_data: bool,
    timeout: Duration,
    stub_fixtures: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The base URL is normalised to end with `/` so relative resource paths join beneath it
    /// (`http://host/api` + `patients` → `http://host/api/patients`).
    ///
    /// # Errors
    ///
    /// Returns [`HmsError::InvalidBaseUrl`] if the URL does not parse or is not http(s), and
    /// [`HmsError::InvalidInput`] if `timeout` is zero.
    pub fn new(
        base_url: &str,
        use_stub_data: bool,
        timeout: Duration,
        stub_fixtures: Option<PathBuf>,
    ) -> HmsResult<Self> {
        let trimmed = base_url.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };

        let base_url = Url::parse(&with_slash).map_err(|e| HmsError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(HmsError::InvalidBaseUrl {
                url: trimmed.to_owned(),
                reason: format!("unsupported scheme {:?}", base_url.scheme()),
            });
        }

        if timeout.is_zero() {
            return Err(HmsError::InvalidInput("HTTP timeout must be positive".into()));
        }

        Ok(Self {
            base_url,
            use_stub_data,
            timeout,
            stub_fixtures,
        })
    }

    /// Resolve configuration from the process environment.
    ///
    /// Reads `HMS_API_BASE_URL`, `HMS_USE_STUB_DATA`, `HMS_HTTP_TIMEOUT_SECS` and
    /// `HMS_STUB_FIXTURES`. Call once from `main`.
    pub fn from_env() -> HmsResult<Self> {
        let base_url = base_url_from_env_value(std::env::var(ENV_API_BASE_URL).ok());
        let use_stub_data = use_stub_data_from_env_value(std::env::var(ENV_USE_STUB_DATA).ok())?;
        let timeout = timeout_from_env_value(std::env::var(ENV_HTTP_TIMEOUT_SECS).ok())?;
        let stub_fixtures = std::env::var(ENV_STUB_FIXTURES)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self::new(&base_url, use_stub_data, timeout, stub_fixtures)
    }

    /// Returns a copy pointing at a different backend.
    pub fn with_base_url(self, base_url: &str) -> HmsResult<Self> {
        Self::new(base_url, self.use_stub_data, self.timeout, self.stub_fixtures)
    }

    /// Returns a copy with stub fallback switched on or off.
    pub fn with_stub_data(mut self, use_stub_data: bool) -> Self {
        self.use_stub_data = use_stub_data;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn use_stub_data(&self) -> bool {
        self.use_stub_data
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn stub_fixtures(&self) -> Option<&Path> {
        self.stub_fixtures.as_deref()
    }
}

/// Base URL from an optional raw value, falling back to [`DEFAULT_API_BASE_URL`].
pub fn base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned())
}

/// Parse the stub fallback flag.
///
/// Missing or blank means `false`. Accepts `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn use_stub_data_from_env_value(value: Option<String>) -> HmsResult<bool> {
    let Some(raw) = value.map(|v| v.trim().to_ascii_lowercase()).filter(|v| !v.is_empty())
    else {
        return Ok(false);
    };

    match raw.as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(HmsError::InvalidInput(format!(
            "{ENV_USE_STUB_DATA} must be a boolean, got {other:?}"
        ))),
    }
}

/// Parse the request timeout in whole seconds. Missing or blank gives the default.
pub fn timeout_from_env_value(value: Option<String>) -> HmsResult<Duration> {
    let Some(raw) = value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_HTTP_TIMEOUT);
    };

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(HmsError::InvalidInput(format!(
            "{ENV_HTTP_TIMEOUT_SECS} must be a positive integer, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let cfg = ClientConfig::new("http://hms.local/api", false, DEFAULT_HTTP_TIMEOUT, None)
            .expect("valid config");
        assert_eq!(cfg.base_url().as_str(), "http://hms.local/api/");
        assert_eq!(
            cfg.base_url().join("patients").expect("join").as_str(),
            "http://hms.local/api/patients"
        );
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeout() {
        let err = ClientConfig::new("not a url", false, DEFAULT_HTTP_TIMEOUT, None)
            .expect_err("should reject");
        assert!(matches!(err, HmsError::InvalidBaseUrl { .. }));

        let err = ClientConfig::new("ftp://hms.local/", false, DEFAULT_HTTP_TIMEOUT, None)
            .expect_err("should reject scheme");
        assert!(matches!(err, HmsError::InvalidBaseUrl { .. }));

        let err = ClientConfig::new("http://hms.local/", false, Duration::ZERO, None)
            .expect_err("should reject zero timeout");
        assert!(matches!(err, HmsError::InvalidInput(_)));
    }

    #[test]
    fn stub_flag_parsing() {
        assert!(!use_stub_data_from_env_value(None).expect("default"));
        assert!(!use_stub_data_from_env_value(Some("  ".into())).expect("blank"));
        assert!(use_stub_data_from_env_value(Some("TRUE".into())).expect("true"));
        assert!(use_stub_data_from_env_value(Some("on".into())).expect("on"));
        assert!(!use_stub_data_from_env_value(Some("0".into())).expect("zero"));
        assert!(use_stub_data_from_env_value(Some("sometimes".into())).is_err());
    }

    #[test]
    fn timeout_parsing() {
        assert_eq!(
            timeout_from_env_value(None).expect("default"),
            DEFAULT_HTTP_TIMEOUT
        );
        assert_eq!(
            timeout_from_env_value(Some("5".into())).expect("five"),
            Duration::from_secs(5)
        );
        assert!(timeout_from_env_value(Some("0".into())).is_err());
        assert!(timeout_from_env_value(Some("-3".into())).is_err());
    }

    #[test]
    fn base_url_defaults_when_unset() {
        assert_eq!(base_url_from_env_value(None), DEFAULT_API_BASE_URL);
        assert_eq!(
            base_url_from_env_value(Some(" http://x/ ".into())),
            "http://x/"
        );
    }

    #[test]
    fn overrides_keep_other_settings() {
        let cfg = ClientConfig::new("http://localhost:5000/api", false, DEFAULT_HTTP_TIMEOUT, None)
            .expect("valid config")
            .with_stub_data(true)
            .with_base_url("https://hms.example.org/api")
            .expect("valid override");
        assert!(cfg.use_stub_data());
        assert_eq!(cfg.base_url().as_str(), "https://hms.example.org/api/");
    }
}
