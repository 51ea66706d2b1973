use anyhow::Result;
use serde::Serialize;

use modulajar_core::input::{
    DEFAULT_ACADEMIC_YEAR, Grade, ProfileDimension, Semester, TeachingModel,
};

/// Every choice the form offers, as served by `GET /api/options`.
#[derive(Debug, Serialize)]
pub struct OptionCatalog {
    pub grades: Vec<&'static str>,
    pub semesters: Vec<&'static str>,
    pub teaching_models: Vec<OptionEntry>,
    pub profile_dimensions: Vec<OptionEntry>,
    pub default_academic_year: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OptionEntry {
    pub slug: &'static str,
    pub label: &'static str,
}

pub fn catalog() -> OptionCatalog {
    OptionCatalog {
        grades: Grade::ALL.iter().map(|g| g.label()).collect(),
        semesters: Semester::ALL.iter().map(|s| s.label()).collect(),
        teaching_models: TeachingModel::ALL
            .iter()
            .map(|m| OptionEntry {
                slug: m.slug(),
                label: m.label(),
            })
            .collect(),
        profile_dimensions: ProfileDimension::ALL
            .iter()
            .map(|d| OptionEntry {
                slug: d.slug(),
                label: d.label(),
            })
            .collect(),
        default_academic_year: DEFAULT_ACADEMIC_YEAR,
    }
}

/// Print the option lists, as a table or as JSON.
pub fn run_options(json: bool) -> Result<()> {
    let catalog = catalog();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Kelas:    {}", catalog.grades.join(", "));
    println!("Semester: {}", catalog.semesters.join(", "));
    println!();
    println!("Model pembelajaran:");
    for entry in &catalog.teaching_models {
        println!("  {:<14} {}", entry.slug, entry.label);
    }
    println!();
    println!("Dimensi Profil Lulusan (DPL):");
    for entry in &catalog.profile_dimensions {
        println!("  {:<18} {}", entry.slug, entry.label);
    }
    Ok(())
}
