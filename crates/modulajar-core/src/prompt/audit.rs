//! Post-generation check of the identity-section rule.
//!
//! The prompt asks the model to keep personnel out of the identity block,
//! but the returned text is not structurally constrained. This audit only
//! reports what it finds; the generated text is never rewritten.

use std::fmt;

use serde::Serialize;

use crate::input::ModuleInput;

/// Personnel field that belongs only in the signature block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonnelField {
    TeacherName,
    TeacherNip,
    PrincipalName,
    PrincipalNip,
}

impl fmt::Display for PersonnelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TeacherName => "teacher name",
            Self::TeacherNip => "teacher NIP",
            Self::PrincipalName => "principal name",
            Self::PrincipalNip => "principal NIP",
        };
        f.write_str(s)
    }
}

/// A personnel value found inside the generated identity section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityLeak {
    pub field: PersonnelField,
    pub value: String,
}

/// Scan the identity section of generated `markdown` for personnel values
/// taken from `input`.
///
/// The section starts at the first line mentioning "Identitas" and ends at
/// the next heading of the same or a higher level (or, when the start line
/// is not a heading, at the next heading of any level). Returns an empty
/// list when no identity section is found.
pub fn audit_identity_section(markdown: &str, input: &ModuleInput) -> Vec<IdentityLeak> {
    let Some(section) = identity_span(markdown) else {
        return Vec::new();
    };

    [
        (PersonnelField::TeacherName, input.teacher_name.trim()),
        (PersonnelField::TeacherNip, input.teacher_nip.trim()),
        (PersonnelField::PrincipalName, input.principal_name.trim()),
        (PersonnelField::PrincipalNip, input.principal_nip.trim()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty() && section.contains(value))
    .map(|(field, value)| IdentityLeak {
        field,
        value: value.to_owned(),
    })
    .collect()
}

fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    (level > 0 && trimmed[level..].starts_with(' ')).then_some(level)
}

fn identity_span(markdown: &str) -> Option<String> {
    let mut lines = markdown.lines();
    let start = lines.by_ref().find(|l| l.to_lowercase().contains("identitas"))?;
    // Headings of this level or above close the section.
    let limit = heading_level(start).unwrap_or(usize::MAX);

    let mut span = String::from(start);
    for line in lines {
        if heading_level(line).is_some_and(|level| level <= limit) {
            break;
        }
        span.push('\n');
        span.push_str(line);
    }
    Some(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personnel() -> ModuleInput {
        ModuleInput {
            teacher_name: "Budi".into(),
            teacher_nip: "1985".into(),
            principal_name: "Siti".into(),
            principal_nip: "1975".into(),
            ..ModuleInput::default()
        }
    }

    #[test]
    fn compliant_module_has_no_leaks() {
        let md = "# Modul Ajar\n\n## A. Identitas Modul\n\n| Sekolah | SMPN 3 |\n\n\
                  ## B. Kompetensi Awal\n\n...\n\n## P. Lembar Pengesahan\n\n| Siti | Budi |\n";
        assert!(audit_identity_section(md, &personnel()).is_empty());
    }

    #[test]
    fn names_inside_identity_are_reported() {
        let md = "## A. Identitas Modul\n- Guru: Budi\n- NIP: 1985\n### Rincian\n- Kepala: Siti\n\
                  ## B. Kompetensi Awal\n";
        let leaks = audit_identity_section(md, &personnel());
        let fields: Vec<PersonnelField> = leaks.iter().map(|l| l.field).collect();
        assert_eq!(
            fields,
            vec![
                PersonnelField::TeacherName,
                PersonnelField::TeacherNip,
                PersonnelField::PrincipalName
            ]
        );
    }

    #[test]
    fn non_heading_start_ends_at_next_heading() {
        let md = "**Identitas Modul**\nSekolah: SMPN 3\n# Kompetensi Awal\nBudi\n";
        assert!(audit_identity_section(md, &personnel()).is_empty());
    }

    #[test]
    fn blank_personnel_values_are_ignored() {
        let md = "## Identitas\nSekolah\n";
        assert!(audit_identity_section(md, &ModuleInput::default()).is_empty());
    }

    #[test]
    fn missing_identity_section_yields_nothing() {
        assert!(audit_identity_section("# Modul\nBudi", &personnel()).is_empty());
    }
}
