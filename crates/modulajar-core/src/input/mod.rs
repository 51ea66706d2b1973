//! The module request a teacher fills in.
//!
//! [`ModuleInput`] is the single record behind the form. Option fields are
//! closed enums (see [`options`]) so nothing outside the offered lists can
//! reach the prompt; the DPL multi-select is a [`ProfileSelection`].

pub mod options;
pub mod selection;
pub mod validation;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use options::{Grade, ProfileDimension, Semester, TeachingModel};
pub use selection::ProfileSelection;
pub use validation::{RequiredField, ValidationError, validate};

/// Academic-year label pre-filled on a fresh form.
pub const DEFAULT_ACADEMIC_YEAR: &str = "2025/2026";

/// Errors raised while reading a [`ModuleInput`] from outside the process.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown {field} value: {value:?}")]
    UnknownOption { field: &'static str, value: String },

    #[error("invalid module input: {0}")]
    Toml(#[from] toml::de::Error),
}

impl InputError {
    pub(crate) fn unknown(field: &'static str, value: &str) -> Self {
        Self::UnknownOption {
            field,
            value: value.to_owned(),
        }
    }
}

/// Lesson-module request.
///
/// Free-text fields may be empty while the teacher is still typing; the
/// [`validation`] gate decides at submit time whether the record is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleInput {
    pub school_name: String,
    pub teacher_name: String,
    /// Teacher's civil-service number (NIP).
    pub teacher_nip: String,
    pub principal_name: String,
    /// Principal's civil-service number (NIP).
    pub principal_nip: String,
    pub grade: Grade,
    pub semester: Semester,
    pub academic_year: String,
    pub subject: String,
    pub core_topic: String,
    pub sub_topic: String,
    /// Free-form duration, e.g. "2 x 40 Menit".
    pub duration: String,
    /// Free-form meeting count, e.g. "2 Pertemuan".
    pub meeting_count: String,
    pub teaching_model: TeachingModel,
    pub selected_dpl: ProfileSelection,
}

impl Default for ModuleInput {
    fn default() -> Self {
        Self {
            school_name: String::new(),
            teacher_name: String::new(),
            teacher_nip: String::new(),
            principal_name: String::new(),
            principal_nip: String::new(),
            grade: Grade::default(),
            semester: Semester::default(),
            academic_year: DEFAULT_ACADEMIC_YEAR.to_owned(),
            subject: String::new(),
            core_topic: String::new(),
            sub_topic: String::new(),
            duration: String::new(),
            meeting_count: String::new(),
            teaching_model: TeachingModel::default(),
            selected_dpl: ProfileSelection::new(),
        }
    }
}

impl ModuleInput {
    /// Parse a module input file. Omitted fields keep their form defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, InputError> {
        Ok(toml::from_str(content)?)
    }
}
