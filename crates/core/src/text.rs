//! Display text lookup.
//!
//! Every label, placeholder and status message the workflow shows goes through a
//! [`TextLookup`]. Field labels use the field's wire name as the key (see
//! [`FieldId::key`](crate::FieldId::key)); status and error messages use [`MessageKey`].
//!
//! [`Catalogue`] ships the English strings and can be overlaid with another language loaded
//! from JSON. A key the catalogue does not know resolves to the key itself, so a missing
//! translation is visible on screen instead of rendering as blank.

use crate::error::{RegistrationError, RegistrationResult};
use std::collections::HashMap;

/// Resolves a message key to display text.
pub trait TextLookup: Send + Sync {
    fn text(&self, key: &str) -> String;
}

impl<F> TextLookup for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn text(&self, key: &str) -> String {
        self(key)
    }
}

/// Keys for the non-label text the workflow itself produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKey {
    RegistrationForm,
    MedicalHistory,
    MedicalConsentPlaceholder,
    Select,
    Yes,
    No,
    AcceptTerms,
    RequiredFields,
    Submit,
    Submitting,
    SubmitOk,
    SubmitDiscus,
    SubmitAnotherApp,
    RequiredFieldsMissing,
    InvalidEmail,
    SubmissionFailed,
}

impl MessageKey {
    pub fn key(self) -> &'static str {
        match self {
            MessageKey::RegistrationForm => "registrationForm",
            MessageKey::MedicalHistory => "medicalHistory",
            MessageKey::MedicalConsentPlaceholder => "medicalConsentPlaceholder",
            MessageKey::Select => "select",
            MessageKey::Yes => "yes",
            MessageKey::No => "no",
            MessageKey::AcceptTerms => "acceptTerms",
            MessageKey::RequiredFields => "requiredFields",
            MessageKey::Submit => "submit",
            MessageKey::Submitting => "submitting",
            MessageKey::SubmitOk => "submitOk",
            MessageKey::SubmitDiscus => "submitDiscus",
            MessageKey::SubmitAnotherApp => "submitAnotherApp",
            MessageKey::RequiredFieldsMissing => "requiredFieldsMissing",
            MessageKey::InvalidEmail => "invalidEmail",
            MessageKey::SubmissionFailed => "submissionFailed",
        }
    }
}

const ENGLISH: &[(&str, &str)] = &[
    // field labels
    ("studentFirstName", "Student's First Name"),
    ("studentLastName", "Student's Last Name"),
    ("dateOfBirth", "Date of Birth"),
    ("nationality", "Nationality"),
    ("residencyAddress", "Residency Address"),
    ("speaksEnglish", "Does the student speak English?"),
    ("languageAtHome", "Language spoken at home"),
    ("motherName", "Mother's Name"),
    ("fatherName", "Father's Name"),
    ("motherPhone", "Mother's Phone"),
    ("fatherPhone", "Father's Phone"),
    ("parentEmail", "Parent's Email"),
    ("emergencyContact", "Emergency Contact"),
    ("emergencyPhone", "Emergency Phone"),
    ("medicalMedication", "Medication currently taking"),
    ("medicalDrugAllergy", "Allergy to medications"),
    ("medicalFoodAllergy", "Food allergies"),
    ("medicalEnvAllergy", "Environmental allergies"),
    ("chronicConditions", "Chronic health conditions"),
    ("headInjury", "Did the student ever suffer a head injury?"),
    ("medicalDiagnosis", "Diagnoses made by a doctor"),
    ("medicalConsent", "Consent for emergency treatment"),
    ("parentSignature", "Parent's Signature"),
    ("parentSignDate", "Date Signed"),
    // form text
    ("registrationForm", "Student Registration Form"),
    ("medicalHistory", "Student's Medical History"),
    ("medicalConsentPlaceholder", "Parent/Guardian initials"),
    ("select", "Select"),
    ("yes", "Yes"),
    ("no", "No"),
    (
        "acceptTerms",
        "I confirm the information above is accurate and accept the terms of enrolment",
    ),
    ("requiredFields", "Required fields"),
    ("submit", "Submit Application"),
    ("submitting", "Submitting..."),
    ("submitOk", "Application Submitted Successfully!"),
    (
        "submitDiscus",
        "Thank you for your application. We will contact you soon to discuss the next steps.",
    ),
    ("submitAnotherApp", "Submit another application"),
    // errors
    (
        "requiredFieldsMissing",
        "Please fill in all required fields marked with *",
    ),
    ("invalidEmail", "Please enter a valid email address"),
    (
        "submissionFailed",
        "There was an error submitting your application. Please try again or contact us directly.",
    ),
];

/// Key to text map with built-in English strings.
#[derive(Clone, Debug)]
pub struct Catalogue {
    entries: HashMap<String, String>,
}

impl Catalogue {
    /// The built-in English catalogue.
    pub fn english() -> Self {
        let entries = ENGLISH
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { entries }
    }

    /// English overlaid with the entries of a flat JSON object of strings.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Catalogue`] if the text is not a JSON object whose values
    /// are all strings.
    pub fn from_json_str(json_text: &str) -> RegistrationResult<Self> {
        let overrides: HashMap<String, String> = serde_json::from_str(json_text)
            .map_err(|e| RegistrationError::Catalogue(e.to_string()))?;
        let mut catalogue = Self::english();
        catalogue.extend(overrides);
        Ok(catalogue)
    }

    /// English overlaid with the catalogue stored at `path`.
    pub fn from_json_file(path: &std::path::Path) -> RegistrationResult<Self> {
        let text = std::fs::read_to_string(path).map_err(RegistrationError::FileRead)?;
        Self::from_json_str(&text)
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.entries.extend(entries);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn message(&self, key: MessageKey) -> String {
        self.text(key.key())
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::english()
    }
}

impl TextLookup for Catalogue {
    fn text(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
