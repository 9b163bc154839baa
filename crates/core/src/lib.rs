//! # Admissions Core
//!
//! Core logic for the student registration form.
//!
//! This crate contains the form's behaviour, independent of how it is displayed:
//! - [`draft`]: the in-memory registration record and its store
//! - [`validation`]: required-field and email checks
//! - [`submission`]: payload building and the single webhook POST
//! - [`workflow`]: the controller driving idle / submitting / submitted / errored
//! - [`text`]: label and message lookup
//! - [`signature`]: pluggable parent-signature capture
//!
//! **No presentation concerns**: rendering the form and reading user input belong to the host
//! (see the `admissions-cli` crate).

pub mod config;
pub mod constants;
pub mod draft;
pub mod error;
pub mod signature;
pub mod submission;
pub mod text;
pub mod transport;
pub mod validation;
pub mod workflow;

pub use config::CoreConfig;
pub use draft::{Draft, DraftStore, FieldId, FieldKind};
pub use error::{RegistrationError, RegistrationResult};
pub use signature::{DrawnSignature, SignaturePad, TypedSignature};
pub use submission::{Ack, SubmitError, Submission, Submitter};
pub use text::{Catalogue, MessageKey, TextLookup};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
pub use validation::{validate, ValidationError, REQUIRED_FIELDS};
pub use workflow::{ErrorNotice, NoticeKind, RegistrationWorkflow, WorkflowError, WorkflowState};

pub use admissions_types::{EmailAddress, NonEmptyText};

// Re-exported so hosts can build a `CoreConfig` without depending on reqwest.
pub use reqwest::Url;
