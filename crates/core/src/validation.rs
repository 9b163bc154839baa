//! Draft validation.
//!
//! Validation runs before any submission is attempted. It is a pure function of the draft:
//! the same draft always yields the same result, and nothing is mutated or logged.
//!
//! Two rules are applied in order:
//! 1. every field in [`REQUIRED_FIELDS`] must be non-empty after trimming whitespace and
//!    U+FEFF, checked in list order and stopping at the first missing one;
//! 2. `parentEmail`, when non-empty, must have a `local@domain.tld` shape.
//!
//! A missing field yields one generic reason. The form does not point at the offending field.

use crate::draft::{Draft, FieldId};
use admissions_types::{trim_whitespace, EmailAddress, EmailError};

/// Fields that must be filled in, in the order they are checked.
pub const REQUIRED_FIELDS: [FieldId; 16] = [
    FieldId::StudentFirstName,
    FieldId::StudentLastName,
    FieldId::DateOfBirth,
    FieldId::ResidencyAddress,
    FieldId::Nationality,
    FieldId::SpeaksEnglish,
    FieldId::LanguageAtHome,
    FieldId::MotherPhone,
    FieldId::ParentSignature,
    FieldId::HeadInjury,
    FieldId::EmergencyContact,
    FieldId::EmergencyPhone,
    FieldId::MedicalMedication,
    FieldId::MedicalDrugAllergy,
    FieldId::MedicalFoodAllergy,
    FieldId::MedicalEnvAllergy,
];

/// Reason a draft is not ready to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please fill in all required fields")]
    MissingRequiredFields,
    #[error("please enter a valid email address")]
    InvalidEmail,
}

/// Validates a draft.
///
/// # Errors
///
/// Returns [`ValidationError::MissingRequiredFields`] if any required field is blank, or
/// [`ValidationError::InvalidEmail`] if all required fields are present but a non-empty
/// `parentEmail` is malformed.
pub fn validate(draft: &Draft) -> Result<(), ValidationError> {
    if first_missing_field(draft).is_some() {
        return Err(ValidationError::MissingRequiredFields);
    }

    match EmailAddress::parse(draft.get(FieldId::ParentEmail)) {
        Ok(_) | Err(EmailError::Empty) => Ok(()),
        Err(EmailError::Malformed(_)) => Err(ValidationError::InvalidEmail),
    }
}

/// The first required field that is blank, in check order.
///
/// Hosts that want to highlight or focus a field can use this; [`validate`] itself only
/// reports the generic reason.
pub fn first_missing_field(draft: &Draft) -> Option<FieldId> {
    REQUIRED_FIELDS
        .into_iter()
        .find(|field| trim_whitespace(draft.get(*field)).is_empty())
}
