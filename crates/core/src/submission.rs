//! Building and sending a registration submission.
//!
//! A submission is the draft's 24 fields under their wire names, with two changes:
//! - `parentSignDate` becomes a UTC instant (`2025-03-01T00:00:00.000Z`), or `null` when blank;
//! - `submissionDate` (the instant the payload was built) and `schoolYear` (from config) are
//!   added.
//!
//! [`Submitter::submit`] makes exactly one POST attempt. There is no retry and no queueing;
//! guarding against a second concurrent attempt is the workflow's job.

use crate::config::CoreConfig;
use crate::draft::{Draft, FieldId};
use crate::transport::{Transport, TransportError};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::Instrument;

/// The remote endpoint accepted the submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack {
    pub status: u16,
}

/// The submission was not acknowledged.
///
/// Payload, status and transport faults are one outcome type; the variant only matters for
/// diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("could not build submission: {0}")]
    Payload(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Wire form of a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(flatten)]
    fields: BTreeMap<&'static str, String>,
    parent_sign_date: Option<String>,
    submission_date: String,
    school_year: String,
}

impl Submission {
    /// Builds the payload for `draft` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Payload`] if a non-blank `parentSignDate` is neither a
    /// `YYYY-MM-DD` date nor an RFC 3339 timestamp.
    pub fn build(
        draft: &Draft,
        school_year: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, SubmitError> {
        let fields = draft
            .iter()
            .filter(|(field, _)| *field != FieldId::ParentSignDate)
            .map(|(field, value)| (field.key(), value.to_string()))
            .collect();

        let parent_sign_date = normalise_sign_date(draft.get(FieldId::ParentSignDate))?
            .map(|instant| format_instant(&instant));

        Ok(Self {
            fields,
            parent_sign_date,
            submission_date: format_instant(&now),
            school_year: school_year.to_string(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "parentSignDate" => self.parent_sign_date.as_deref(),
            "submissionDate" => Some(&self.submission_date),
            "schoolYear" => Some(&self.school_year),
            _ => self.fields.get(key).map(String::as_str),
        }
    }

    pub fn to_json(&self) -> Result<String, SubmitError> {
        serde_json::to_string(self).map_err(|e| SubmitError::Payload(e.to_string()))
    }
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn normalise_sign_date(raw: &str) -> Result<Option<DateTime<Utc>>, SubmitError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // A bare calendar date is midnight UTC.
        return Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| SubmitError::Payload(format!("invalid parentSignDate '{raw}': {e}")))
}

/// Sends drafts to the configured webhook.
pub struct Submitter<T> {
    cfg: CoreConfig,
    transport: T,
}

impl<T: Transport> Submitter<T> {
    pub fn new(cfg: CoreConfig, transport: T) -> Self {
        Self { cfg, transport }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits `draft` once.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError`] if the payload cannot be built, the transport fails, or the
    /// endpoint answers with a non-2xx status.
    pub async fn submit(&self, draft: &Draft) -> Result<Ack, SubmitError> {
        let attempt_id = uuid::Uuid::new_v4().simple().to_string();
        let span = tracing::info_span!("submission", attempt = %attempt_id);

        self.attempt(draft).instrument(span).await
    }

    async fn attempt(&self, draft: &Draft) -> Result<Ack, SubmitError> {
        let body =
            Submission::build(draft, self.cfg.school_year().as_str(), Utc::now())?.to_json()?;

        let url = self.cfg.webhook_url();
        tracing::info!("posting registration to {}", url);
        let response = self.transport.post_json(url, body).await?;

        if !response.is_success() {
            return Err(SubmitError::Status(response.status));
        }

        tracing::debug!("submission response: {}", response.body);
        Ok(Ack {
            status: response.status,
        })
    }
}
