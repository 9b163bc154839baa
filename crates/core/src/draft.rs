//! Registration draft and its in-memory store.
//!
//! A [`Draft`] is the unsaved registration record for one form session. It holds one string
//! slot per [`FieldId`], so a draft can never be partial: a field nobody has touched is the
//! empty string. Dates, phone numbers and yes/no answers stay free text until the payload is
//! built for submission.
//!
//! The [`DraftStore`] is the only thing that mutates a draft. It overwrites one field at a
//! time, resets to empty, and accepts a [`SignaturePad`] as the way to fill `parentSignature`.

use crate::error::{RegistrationError, RegistrationResult};
use crate::signature::SignaturePad;
use serde::Deserialize;

/// Kind of control a field is entered through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Phone,
    Email,
    /// A `yes` / `no` choice with an empty "select" placeholder.
    YesNo,
    /// Filled through a [`SignaturePad`] rather than typed.
    Signature,
}

/// Identifier for every field on the registration form, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    StudentFirstName,
    StudentLastName,
    DateOfBirth,
    Nationality,
    ResidencyAddress,
    SpeaksEnglish,
    LanguageAtHome,
    MotherName,
    FatherName,
    MotherPhone,
    FatherPhone,
    ParentEmail,
    EmergencyContact,
    EmergencyPhone,
    MedicalMedication,
    MedicalDrugAllergy,
    MedicalFoodAllergy,
    MedicalEnvAllergy,
    ChronicConditions,
    HeadInjury,
    MedicalDiagnosis,
    MedicalConsent,
    ParentSignature,
    ParentSignDate,
}

impl FieldId {
    /// Number of fields on the form.
    pub const COUNT: usize = 24;

    /// Every field, in form order.
    pub const ALL: [FieldId; FieldId::COUNT] = [
        FieldId::StudentFirstName,
        FieldId::StudentLastName,
        FieldId::DateOfBirth,
        FieldId::Nationality,
        FieldId::ResidencyAddress,
        FieldId::SpeaksEnglish,
        FieldId::LanguageAtHome,
        FieldId::MotherName,
        FieldId::FatherName,
        FieldId::MotherPhone,
        FieldId::FatherPhone,
        FieldId::ParentEmail,
        FieldId::EmergencyContact,
        FieldId::EmergencyPhone,
        FieldId::MedicalMedication,
        FieldId::MedicalDrugAllergy,
        FieldId::MedicalFoodAllergy,
        FieldId::MedicalEnvAllergy,
        FieldId::ChronicConditions,
        FieldId::HeadInjury,
        FieldId::MedicalDiagnosis,
        FieldId::MedicalConsent,
        FieldId::ParentSignature,
        FieldId::ParentSignDate,
    ];

    /// Wire name of the field. This is also its text-lookup key for the label.
    pub fn key(self) -> &'static str {
        match self {
            FieldId::StudentFirstName => "studentFirstName",
            FieldId::StudentLastName => "studentLastName",
            FieldId::DateOfBirth => "dateOfBirth",
            FieldId::Nationality => "nationality",
            FieldId::ResidencyAddress => "residencyAddress",
            FieldId::SpeaksEnglish => "speaksEnglish",
            FieldId::LanguageAtHome => "languageAtHome",
            FieldId::MotherName => "motherName",
            FieldId::FatherName => "fatherName",
            FieldId::MotherPhone => "motherPhone",
            FieldId::FatherPhone => "fatherPhone",
            FieldId::ParentEmail => "parentEmail",
            FieldId::EmergencyContact => "emergencyContact",
            FieldId::EmergencyPhone => "emergencyPhone",
            FieldId::MedicalMedication => "medicalMedication",
            FieldId::MedicalDrugAllergy => "medicalDrugAllergy",
            FieldId::MedicalFoodAllergy => "medicalFoodAllergy",
            FieldId::MedicalEnvAllergy => "medicalEnvAllergy",
            FieldId::ChronicConditions => "chronicConditions",
            FieldId::HeadInjury => "headInjury",
            FieldId::MedicalDiagnosis => "medicalDiagnosis",
            FieldId::MedicalConsent => "medicalConsent",
            FieldId::ParentSignature => "parentSignature",
            FieldId::ParentSignDate => "parentSignDate",
        }
    }

    /// Parse a field from its wire name.
    pub fn from_key(key: &str) -> Option<Self> {
        FieldId::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldId::DateOfBirth | FieldId::ParentSignDate => FieldKind::Date,
            FieldId::MotherPhone | FieldId::FatherPhone | FieldId::EmergencyPhone => {
                FieldKind::Phone
            }
            FieldId::ParentEmail => FieldKind::Email,
            FieldId::SpeaksEnglish | FieldId::HeadInjury => FieldKind::YesNo,
            FieldId::ParentSignature => FieldKind::Signature,
            _ => FieldKind::Text,
        }
    }

    /// Whether the field must be filled in before a submission is attempted.
    pub fn is_required(self) -> bool {
        crate::validation::REQUIRED_FIELDS.contains(&self)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for FieldId {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldId::from_key(s).ok_or_else(|| RegistrationError::UnknownField(s.to_string()))
    }
}

/// The in-progress registration record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    values: [String; FieldId::COUNT],
}

impl Draft {
    /// Creates an all-empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    /// Fields and values in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> + '_ {
        FieldId::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }

    /// True when every field is the empty string.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }

    fn set(&mut self, field: FieldId, value: String) {
        self.values[field.index()] = value;
    }

    /// Parse a draft from a JSON object keyed by the fields' wire names.
    ///
    /// Missing keys stay empty. Unknown keys and non-string values are rejected with the
    /// path of the offending entry, so a typo in a draft file is reported instead of being
    /// silently dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DraftSchema`] if the JSON does not match the draft schema.
    pub fn from_json_str(json_text: &str) -> RegistrationResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);
        let wire = match serde_path_to_error::deserialize::<_, DraftWire>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(RegistrationError::DraftSchema(format!(
                    "draft schema mismatch at {path}: {source}"
                )));
            }
        };
        deserializer
            .end()
            .map_err(|e| RegistrationError::DraftSchema(format!("trailing content: {e}")))?;

        Ok(wire.into_draft())
    }
}

/// Mutable holder of the current draft.
#[derive(Clone, Debug, Default)]
pub struct DraftStore {
    draft: Draft,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites exactly one field, leaving all others untouched.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.draft.set(field, value.into());
    }

    /// Restores the initial all-empty draft.
    pub fn reset(&mut self) {
        self.draft = Draft::new();
    }

    /// Returns the current full draft.
    pub fn get_all(&self) -> &Draft {
        &self.draft
    }

    /// Stores whatever the pad exports in `parentSignature`.
    ///
    /// An empty pad clears the field, the same as pressing "clear" on it.
    pub fn capture_signature(&mut self, pad: &dyn SignaturePad) {
        let exported = pad.export().unwrap_or_default();
        self.set_field(FieldId::ParentSignature, exported);
    }

    pub fn clear_signature(&mut self) {
        self.set_field(FieldId::ParentSignature, String::new());
    }
}

// Wire shape of a draft file. `deny_unknown_fields` catches misspelt keys.
#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
struct DraftWire {
    student_first_name: String,
    student_last_name: String,
    date_of_birth: String,
    nationality: String,
    residency_address: String,
    speaks_english: String,
    language_at_home: String,
    mother_name: String,
    father_name: String,
    mother_phone: String,
    father_phone: String,
    parent_email: String,
    emergency_contact: String,
    emergency_phone: String,
    medical_medication: String,
    medical_drug_allergy: String,
    medical_food_allergy: String,
    medical_env_allergy: String,
    chronic_conditions: String,
    head_injury: String,
    medical_diagnosis: String,
    medical_consent: String,
    parent_signature: String,
    parent_sign_date: String,
}

impl DraftWire {
    fn into_draft(self) -> Draft {
        let mut store = DraftStore::new();
        store.set_field(FieldId::StudentFirstName, self.student_first_name);
        store.set_field(FieldId::StudentLastName, self.student_last_name);
        store.set_field(FieldId::DateOfBirth, self.date_of_birth);
        store.set_field(FieldId::Nationality, self.nationality);
        store.set_field(FieldId::ResidencyAddress, self.residency_address);
        store.set_field(FieldId::SpeaksEnglish, self.speaks_english);
        store.set_field(FieldId::LanguageAtHome, self.language_at_home);
        store.set_field(FieldId::MotherName, self.mother_name);
        store.set_field(FieldId::FatherName, self.father_name);
        store.set_field(FieldId::MotherPhone, self.mother_phone);
        store.set_field(FieldId::FatherPhone, self.father_phone);
        store.set_field(FieldId::ParentEmail, self.parent_email);
        store.set_field(FieldId::EmergencyContact, self.emergency_contact);
        store.set_field(FieldId::EmergencyPhone, self.emergency_phone);
        store.set_field(FieldId::MedicalMedication, self.medical_medication);
        store.set_field(FieldId::MedicalDrugAllergy, self.medical_drug_allergy);
        store.set_field(FieldId::MedicalFoodAllergy, self.medical_food_allergy);
        store.set_field(FieldId::MedicalEnvAllergy, self.medical_env_allergy);
        store.set_field(FieldId::ChronicConditions, self.chronic_conditions);
        store.set_field(FieldId::HeadInjury, self.head_injury);
        store.set_field(FieldId::MedicalDiagnosis, self.medical_diagnosis);
        store.set_field(FieldId::MedicalConsent, self.medical_consent);
        store.set_field(FieldId::ParentSignature, self.parent_signature);
        store.set_field(FieldId::ParentSignDate, self.parent_sign_date);
        store.draft
    }
}
