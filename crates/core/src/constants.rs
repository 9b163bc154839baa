//! Constants used throughout the admissions core crate.

/// Academic year tag attached to every submission when none is configured.
pub const DEFAULT_SCHOOL_YEAR: &str = "2025-2026";

/// Default whole-request timeout for the webhook POST, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connect timeout for the webhook POST, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Content type of the submission body.
pub const SUBMISSION_CONTENT_TYPE: &str = "application/json";

/// Environment variable holding the webhook endpoint.
pub const WEBHOOK_URL_ENV: &str = "ADMISSIONS_WEBHOOK_URL";

/// Environment variable holding the academic year tag.
pub const SCHOOL_YEAR_ENV: &str = "ADMISSIONS_SCHOOL_YEAR";

/// Environment variable holding the request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "ADMISSIONS_TIMEOUT_SECS";
