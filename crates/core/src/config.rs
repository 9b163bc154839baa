//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the submitter and
//! transport. Core code never reads environment variables itself; hosts call the
//! `*_from_env_value` helpers with whatever they read and hand the result to [`CoreConfig::new`].

use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCHOOL_YEAR};
use crate::{RegistrationError, RegistrationResult};
use admissions_types::NonEmptyText;
use reqwest::Url;
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    webhook_url: Url,
    school_year: NonEmptyText,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidWebhookUrl`] if the URL is not http(s) or has no
    /// host, and [`RegistrationError::InvalidInput`] for a zero timeout.
    pub fn new(
        webhook_url: Url,
        school_year: NonEmptyText,
        request_timeout: Duration,
    ) -> RegistrationResult<Self> {
        if !matches!(webhook_url.scheme(), "http" | "https") {
            return Err(RegistrationError::InvalidWebhookUrl(format!(
                "unsupported scheme '{}' (expected http or https)",
                webhook_url.scheme()
            )));
        }
        if webhook_url.host_str().is_none() {
            return Err(RegistrationError::InvalidWebhookUrl(
                "webhook URL has no host".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(RegistrationError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            webhook_url,
            school_year,
            request_timeout,
        })
    }

    /// Configuration for `webhook_url` with the default school year and timeout.
    pub fn for_endpoint(webhook_url: Url) -> RegistrationResult<Self> {
        Self::new(
            webhook_url,
            default_school_year()?,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    pub fn school_year(&self) -> &NonEmptyText {
        &self.school_year
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn default_school_year() -> RegistrationResult<NonEmptyText> {
    NonEmptyText::new(DEFAULT_SCHOOL_YEAR)
        .map_err(|e| RegistrationError::InvalidInput(format!("default school year: {e}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the webhook endpoint from an optional string value.
///
/// There is no default endpoint: a missing or blank value is an error.
pub fn webhook_url_from_env_value(value: Option<String>) -> RegistrationResult<Url> {
    let value = non_blank(value).ok_or_else(|| {
        RegistrationError::InvalidWebhookUrl("no webhook endpoint configured".into())
    })?;

    Url::parse(&value).map_err(|e| RegistrationError::InvalidWebhookUrl(format!("{value}: {e}")))
}

/// Parse the school year tag from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default year.
pub fn school_year_from_env_value(value: Option<String>) -> RegistrationResult<NonEmptyText> {
    match non_blank(value).and_then(|v| NonEmptyText::new(v).ok()) {
        Some(year) => Ok(year),
        None => default_school_year(),
    }
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default timeout.
pub fn request_timeout_from_env_value(value: Option<String>) -> RegistrationResult<Duration> {
    let Some(value) = non_blank(value) else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };

    let secs = value.parse::<u64>().map_err(|_| {
        RegistrationError::InvalidInput(format!(
            "request timeout must be a whole number of seconds, got '{value}'"
        ))
    })?;
    if secs == 0 {
        return Err(RegistrationError::InvalidInput(
            "request timeout must be greater than zero".into(),
        ));
    }

    Ok(Duration::from_secs(secs))
}
