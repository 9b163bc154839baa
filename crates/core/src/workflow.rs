//! Registration workflow controller.
//!
//! One [`RegistrationWorkflow`] backs one form instance. It owns the draft store and the
//! lifecycle state, and reacts to the form's events:
//!
//! ```text
//! Idle ──edit──▶ Idle                 Errored ──edit──▶ Idle
//! Idle/Errored ──submit, invalid──▶ Errored(reason)
//! Idle/Errored ──submit, valid──▶ Submitting ──ack──▶ Submitted (draft reset)
//!                                            └─fail─▶ Errored(submission failed, draft kept)
//! Submitted ──submit another──▶ Idle
//! ```
//!
//! `Submitting` is the in-flight guard: a second submit while a request is outstanding is
//! rejected here, whether or not a host has disabled its submit button. Edits are also
//! rejected while in flight, so the draft kept after a failure is exactly what was sent.
//!
//! The state lock is never held across the network call. There is no cancellation: if the
//! `submit` future is dropped mid-request, the workflow stays in `Submitting`.

use crate::draft::{Draft, DraftStore, FieldId};
use crate::signature::SignaturePad;
use crate::submission::{Ack, SubmitError, Submitter};
use crate::text::{MessageKey, TextLookup};
use crate::transport::Transport;
use crate::validation::{validate, ValidationError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Why the form is showing an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    MissingFields,
    InvalidEmail,
    SubmissionFailed,
}

impl NoticeKind {
    /// Lookup key of the message shown for this kind.
    pub fn message_key(self) -> MessageKey {
        match self {
            NoticeKind::MissingFields => MessageKey::RequiredFieldsMissing,
            NoticeKind::InvalidEmail => MessageKey::InvalidEmail,
            NoticeKind::SubmissionFailed => MessageKey::SubmissionFailed,
        }
    }
}

impl From<ValidationError> for NoticeKind {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingRequiredFields => NoticeKind::MissingFields,
            ValidationError::InvalidEmail => NoticeKind::InvalidEmail,
        }
    }
}

/// A user-visible error message and what caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Submitting,
    Submitted,
    Errored(ErrorNotice),
}

/// An event the workflow refused, or a submit that did not reach `Submitted`.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("the registration has already been submitted")]
    AlreadySubmitted,
    #[error("the terms must be accepted before submitting")]
    TermsNotAccepted,
    #[error("there is no completed submission to start over from")]
    NotSubmitted,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("submission failed: {0}")]
    Submission(#[from] SubmitError),
}

struct Inner {
    store: DraftStore,
    state: WorkflowState,
    terms_accepted: bool,
}

pub struct RegistrationWorkflow<T> {
    submitter: Submitter<T>,
    text: Arc<dyn TextLookup>,
    inner: Mutex<Inner>,
}

impl<T: Transport> RegistrationWorkflow<T> {
    /// Mounts a workflow with an empty draft.
    pub fn new(submitter: Submitter<T>, text: Arc<dyn TextLookup>) -> Self {
        Self {
            submitter,
            text,
            inner: Mutex::new(Inner {
                store: DraftStore::new(),
                state: WorkflowState::Idle,
                terms_accepted: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Nothing panics while holding the lock, but a poisoned lock still holds a
        // consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notice(&self, kind: NoticeKind) -> ErrorNotice {
        ErrorNotice {
            kind,
            message: self.text.text(kind.message_key().key()),
        }
    }

    fn guard_editable(inner: &Inner) -> Result<(), WorkflowError> {
        match inner.state {
            WorkflowState::Submitting => Err(WorkflowError::SubmissionInFlight),
            WorkflowState::Submitted => Err(WorkflowError::AlreadySubmitted),
            WorkflowState::Idle | WorkflowState::Errored(_) => Ok(()),
        }
    }

    /// Field-edit event. Clears any error being shown.
    pub fn edit(&self, field: FieldId, value: impl Into<String>) -> Result<(), WorkflowError> {
        let mut inner = self.lock();
        Self::guard_editable(&inner)?;
        inner.store.set_field(field, value);
        inner.state = WorkflowState::Idle;
        Ok(())
    }

    /// Fills `parentSignature` from a signature pad. Counts as an edit.
    pub fn capture_signature(&self, pad: &dyn SignaturePad) -> Result<(), WorkflowError> {
        let mut inner = self.lock();
        Self::guard_editable(&inner)?;
        inner.store.capture_signature(pad);
        inner.state = WorkflowState::Idle;
        Ok(())
    }

    pub fn clear_signature(&self) -> Result<(), WorkflowError> {
        let mut inner = self.lock();
        Self::guard_editable(&inner)?;
        inner.store.clear_signature();
        inner.state = WorkflowState::Idle;
        Ok(())
    }

    /// Confirm/accept-terms event. Reveals the submit control; validates nothing.
    pub fn accept_terms(&self) {
        self.lock().terms_accepted = true;
    }

    /// Submit event.
    ///
    /// On success the draft is reset and the workflow is `Submitted`. On a validation or
    /// submission failure the workflow is `Errored` and the draft is kept.
    ///
    /// # Errors
    ///
    /// - [`WorkflowError::SubmissionInFlight`], [`WorkflowError::AlreadySubmitted`] and
    ///   [`WorkflowError::TermsNotAccepted`]: the event was refused and nothing changed.
    /// - [`WorkflowError::Validation`]: the draft is incomplete or has a malformed email.
    /// - [`WorkflowError::Submission`]: the endpoint did not acknowledge the submission.
    pub async fn submit(&self) -> Result<Ack, WorkflowError> {
        let draft = {
            let mut inner = self.lock();
            match inner.state {
                WorkflowState::Submitting => return Err(WorkflowError::SubmissionInFlight),
                WorkflowState::Submitted => return Err(WorkflowError::AlreadySubmitted),
                WorkflowState::Idle | WorkflowState::Errored(_) => {}
            }
            if !inner.terms_accepted {
                return Err(WorkflowError::TermsNotAccepted);
            }
            if let Err(reason) = validate(inner.store.get_all()) {
                inner.state = WorkflowState::Errored(self.notice(reason.into()));
                return Err(reason.into());
            }
            inner.state = WorkflowState::Submitting;
            inner.store.get_all().clone()
        };

        let result = self.submitter.submit(&draft).await;

        let mut inner = self.lock();
        match result {
            Ok(ack) => {
                tracing::info!("registration acknowledged with status {}", ack.status);
                inner.store.reset();
                inner.state = WorkflowState::Submitted;
                Ok(ack)
            }
            Err(err) => {
                tracing::warn!("form submission error: {}", err);
                inner.state = WorkflowState::Errored(self.notice(NoticeKind::SubmissionFailed));
                Err(err.into())
            }
        }
    }

    /// "Submit another" event: shows an empty form again.
    pub fn submit_another(&self) -> Result<(), WorkflowError> {
        let mut inner = self.lock();
        if inner.state != WorkflowState::Submitted {
            return Err(WorkflowError::NotSubmitted);
        }
        inner.state = WorkflowState::Idle;
        Ok(())
    }

    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    /// A copy of the current draft.
    pub fn draft(&self) -> Draft {
        self.lock().store.get_all().clone()
    }

    pub fn error_message(&self) -> Option<String> {
        match &self.lock().state {
            WorkflowState::Errored(notice) => Some(notice.message.clone()),
            _ => None,
        }
    }

    pub fn terms_accepted(&self) -> bool {
        self.lock().terms_accepted
    }

    /// Whether the submit control is shown.
    pub fn submit_visible(&self) -> bool {
        self.terms_accepted()
    }

    /// Whether the submit control accepts clicks: it is shown and no request is in flight.
    ///
    /// After an acknowledged submission the control is enabled again, although hosts show the
    /// confirmation instead of the form until [`submit_another`](Self::submit_another).
    pub fn submit_enabled(&self) -> bool {
        let inner = self.lock();
        inner.terms_accepted && inner.state != WorkflowState::Submitting
    }

    /// Display label for a field.
    pub fn label(&self, field: FieldId) -> String {
        self.text.text(field.key())
    }

    pub fn message(&self, key: MessageKey) -> String {
        self.text.text(key.key())
    }

    pub fn submitter(&self) -> &Submitter<T> {
        &self.submitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::signature::TypedSignature;
    use crate::text::Catalogue;
    use crate::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;
    use reqwest::Url;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn post_json(
            &self,
            url: &Url,
            _body: String,
        ) -> Result<TransportResponse, TransportError> {
            Err(TransportError::Connect(url.to_string()))
        }
    }

    fn workflow() -> RegistrationWorkflow<Unreachable> {
        let cfg = CoreConfig::for_endpoint(Url::parse("http://127.0.0.1:9/hook").expect("url"))
            .expect("config");
        RegistrationWorkflow::new(
            Submitter::new(cfg, Unreachable),
            Arc::new(Catalogue::english()),
        )
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(fut)
    }

    #[test]
    fn starts_idle_with_hidden_submit() {
        let wf = workflow();
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert!(wf.draft().is_blank());
        assert!(!wf.submit_visible());
        assert!(!wf.submit_enabled());
    }

    #[test]
    fn accepting_terms_reveals_submit() {
        let wf = workflow();
        wf.accept_terms();
        assert!(wf.submit_visible());
        assert!(wf.submit_enabled());
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn submit_before_accepting_terms_is_refused() {
        let wf = workflow();
        let err = block_on(wf.submit()).expect_err("terms not accepted");
        assert!(matches!(err, WorkflowError::TermsNotAccepted));
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn invalid_draft_shows_localised_reason_and_edit_clears_it() {
        let wf = workflow();
        wf.accept_terms();
        wf.edit(FieldId::StudentFirstName, "Amina").expect("edit");

        let err = block_on(wf.submit()).expect_err("incomplete");
        assert!(matches!(
            err,
            WorkflowError::Validation(ValidationError::MissingRequiredFields)
        ));
        assert_eq!(
            wf.error_message().as_deref(),
            Some("Please fill in all required fields marked with *")
        );
        assert_eq!(wf.draft().get(FieldId::StudentFirstName), "Amina");

        wf.edit(FieldId::StudentLastName, "Otieno").expect("edit");
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert_eq!(wf.error_message(), None);
    }

    #[test]
    fn transport_fault_keeps_draft_and_reenables_submit() {
        let wf = workflow();
        wf.accept_terms();
        for field in crate::validation::REQUIRED_FIELDS {
            wf.edit(field, "x").expect("edit");
        }
        let before = wf.draft();

        let err = block_on(wf.submit()).expect_err("unreachable endpoint");
        assert!(matches!(
            err,
            WorkflowError::Submission(SubmitError::Transport(TransportError::Connect(_)))
        ));
        match wf.state() {
            WorkflowState::Errored(notice) => {
                assert_eq!(notice.kind, NoticeKind::SubmissionFailed);
                assert!(notice.message.starts_with("There was an error submitting"));
            }
            other => panic!("expected Errored, got {other:?}"),
        }
        assert_eq!(wf.draft(), before);
        assert!(wf.submit_enabled());
    }

    #[test]
    fn signature_capture_is_an_edit() {
        let wf = workflow();
        wf.capture_signature(&TypedSignature::new("Jane Doe"))
            .expect("capture");
        assert!(!wf.draft().get(FieldId::ParentSignature).is_empty());
        wf.clear_signature().expect("clear");
        assert_eq!(wf.draft().get(FieldId::ParentSignature), "");
    }

    #[test]
    fn submit_another_requires_a_completed_submission() {
        let wf = workflow();
        assert!(matches!(
            wf.submit_another(),
            Err(WorkflowError::NotSubmitted)
        ));
    }

    #[test]
    fn labels_come_from_the_lookup() {
        let wf = workflow();
        assert_eq!(wf.label(FieldId::MedicalFoodAllergy), "Food allergies");
        assert_eq!(wf.message(MessageKey::Submit), "Submit Application");
    }
}
