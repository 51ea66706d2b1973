//! Submit-time validation gate.
//!
//! Runs once when the teacher asks for a module. Either the whole record is
//! usable or generation does not start; there is no partial submission.

use std::fmt;

use super::ModuleInput;

/// A free-text field that must not be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    SchoolName,
    TeacherName,
    PrincipalName,
    Subject,
    CoreTopic,
}

impl RequiredField {
    /// Required fields in form order.
    pub const ALL: [RequiredField; 5] = [
        Self::SchoolName,
        Self::TeacherName,
        Self::PrincipalName,
        Self::Subject,
        Self::CoreTopic,
    ];

    /// Form label shown to the teacher.
    pub fn label(self) -> &'static str {
        match self {
            Self::SchoolName => "Nama Sekolah",
            Self::TeacherName => "Nama Guru Mapel",
            Self::PrincipalName => "Nama Kepala Sekolah",
            Self::Subject => "Mata Pelajaran",
            Self::CoreTopic => "Materi Pokok",
        }
    }

    fn value(self, input: &ModuleInput) -> &str {
        match self {
            Self::SchoolName => &input.school_name,
            Self::TeacherName => &input.teacher_name,
            Self::PrincipalName => &input.principal_name,
            Self::Subject => &input.subject,
            Self::CoreTopic => &input.core_topic,
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything that blocks a submission, aggregated into one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Blank required fields, in form order.
    pub missing: Vec<RequiredField>,
    /// No profile dimension was selected.
    pub missing_dpl: bool,
}

impl ValidationError {
    /// The single message surfaced next to the submit button.
    pub fn user_message(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if !self.missing.is_empty() {
            let labels: Vec<&str> = self.missing.iter().map(|f| f.label()).collect();
            parts.push(format!("Mohon lengkapi field wajib: {}.", labels.join(", ")));
        }
        if self.missing_dpl {
            parts.push("Pilih minimal satu Dimensi Profil Lulusan (DPL).".to_owned());
        }
        parts.join(" ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ValidationError {}

/// Check the required-field subset and the non-empty DPL rule.
///
/// The teaching model always has a value, so it is not checked.
pub fn validate(input: &ModuleInput) -> Result<(), ValidationError> {
    let missing: Vec<RequiredField> = RequiredField::ALL
        .into_iter()
        .filter(|field| field.value(input).trim().is_empty())
        .collect();
    let missing_dpl = input.selected_dpl.is_empty();

    if missing.is_empty() && !missing_dpl {
        Ok(())
    } else {
        Err(ValidationError {
            missing,
            missing_dpl,
        })
    }
}
