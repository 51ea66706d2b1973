//! Closed option lists offered by the module form.
//!
//! Every enum serializes to (and parses from) the exact label shown to the
//! teacher, because that label is what ends up in the prompt. Short slugs
//! (`pbl`, `ganjil`, `kreativitas`, ...) are accepted as aliases so input
//! files stay pleasant to write by hand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::InputError;

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// Class level (Fase D, junior secondary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[default]
    #[serde(rename = "VII", alias = "7")]
    VII,
    #[serde(rename = "VIII", alias = "8")]
    VIII,
    #[serde(rename = "IX", alias = "9")]
    IX,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Self::VII, Self::VIII, Self::IX];

    pub fn label(self) -> &'static str {
        match self {
            Self::VII => "VII",
            Self::VIII => "VIII",
            Self::IX => "IX",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Grade {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VII" | "7" => Ok(Self::VII),
            "VIII" | "8" => Ok(Self::VIII),
            "IX" | "9" => Ok(Self::IX),
            _ => Err(InputError::unknown("grade", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Semester
// ---------------------------------------------------------------------------

/// Half of the academic year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    /// First half.
    #[default]
    #[serde(rename = "Ganjil", alias = "ganjil")]
    Ganjil,
    /// Second half.
    #[serde(rename = "Genap", alias = "genap")]
    Genap,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Self::Ganjil, Self::Genap];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ganjil => "Ganjil",
            Self::Genap => "Genap",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Semester {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ganjil" => Ok(Self::Ganjil),
            "genap" => Ok(Self::Genap),
            _ => Err(InputError::unknown("semester", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Teaching model
// ---------------------------------------------------------------------------

/// Pedagogical model whose syntax drives the core activity phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeachingModel {
    #[serde(rename = "Discovery Learning", alias = "discovery")]
    DiscoveryLearning,
    #[serde(rename = "Inquiry Learning", alias = "inquiry")]
    InquiryLearning,
    #[default]
    #[serde(rename = "Problem Based Learning (PBL)", alias = "pbl")]
    ProblemBased,
    #[serde(rename = "Project Based Learning (PjBL)", alias = "pjbl")]
    ProjectBased,
    #[serde(rename = "Pembelajaran Diferensiasi", alias = "diferensiasi")]
    Differentiated,
    #[serde(rename = "Contextual Teaching and Learning (CTL)", alias = "ctl")]
    Contextual,
    #[serde(rename = "Cooperative Learning", alias = "cooperative")]
    Cooperative,
}

impl TeachingModel {
    pub const ALL: [TeachingModel; 7] = [
        Self::DiscoveryLearning,
        Self::InquiryLearning,
        Self::ProblemBased,
        Self::ProjectBased,
        Self::Differentiated,
        Self::Contextual,
        Self::Cooperative,
    ];

    /// The label referenced verbatim in generated content.
    pub fn label(self) -> &'static str {
        match self {
            Self::DiscoveryLearning => "Discovery Learning",
            Self::InquiryLearning => "Inquiry Learning",
            Self::ProblemBased => "Problem Based Learning (PBL)",
            Self::ProjectBased => "Project Based Learning (PjBL)",
            Self::Differentiated => "Pembelajaran Diferensiasi",
            Self::Contextual => "Contextual Teaching and Learning (CTL)",
            Self::Cooperative => "Cooperative Learning",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::DiscoveryLearning => "discovery",
            Self::InquiryLearning => "inquiry",
            Self::ProblemBased => "pbl",
            Self::ProjectBased => "pjbl",
            Self::Differentiated => "diferensiasi",
            Self::Contextual => "ctl",
            Self::Cooperative => "cooperative",
        }
    }
}

impl fmt::Display for TeachingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TeachingModel {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.label() == needle || m.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| InputError::unknown("teaching_model", s))
    }
}

// ---------------------------------------------------------------------------
// Profile dimension (DPL)
// ---------------------------------------------------------------------------

/// Graduate-profile dimension (Dimensi Profil Lulusan).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileDimension {
    #[serde(rename = "Keimanan dan Ketakwaan terhadap Tuhan YME", alias = "keimanan")]
    Faith,
    #[serde(rename = "Kewargaan", alias = "kewargaan")]
    Citizenship,
    #[serde(rename = "Penalaran Kritis", alias = "penalaran-kritis")]
    CriticalReasoning,
    #[serde(rename = "Kreativitas", alias = "kreativitas")]
    Creativity,
    #[serde(rename = "Kolaborasi", alias = "kolaborasi")]
    Collaboration,
    #[serde(rename = "Kemandirian", alias = "kemandirian")]
    Independence,
    #[serde(rename = "Kesehatan Jasmani dan Mental", alias = "kesehatan")]
    Wellbeing,
    #[serde(rename = "Literasi dan Numerasi", alias = "literasi-numerasi")]
    LiteracyNumeracy,
    #[serde(rename = "Kepedulian terhadap Lingkungan", alias = "lingkungan")]
    EnvironmentalCare,
}

impl ProfileDimension {
    pub const ALL: [ProfileDimension; 9] = [
        Self::Faith,
        Self::Citizenship,
        Self::CriticalReasoning,
        Self::Creativity,
        Self::Collaboration,
        Self::Independence,
        Self::Wellbeing,
        Self::LiteracyNumeracy,
        Self::EnvironmentalCare,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Faith => "Keimanan dan Ketakwaan terhadap Tuhan YME",
            Self::Citizenship => "Kewargaan",
            Self::CriticalReasoning => "Penalaran Kritis",
            Self::Creativity => "Kreativitas",
            Self::Collaboration => "Kolaborasi",
            Self::Independence => "Kemandirian",
            Self::Wellbeing => "Kesehatan Jasmani dan Mental",
            Self::LiteracyNumeracy => "Literasi dan Numerasi",
            Self::EnvironmentalCare => "Kepedulian terhadap Lingkungan",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Faith => "keimanan",
            Self::Citizenship => "kewargaan",
            Self::CriticalReasoning => "penalaran-kritis",
            Self::Creativity => "kreativitas",
            Self::Collaboration => "kolaborasi",
            Self::Independence => "kemandirian",
            Self::Wellbeing => "kesehatan",
            Self::LiteracyNumeracy => "literasi-numerasi",
            Self::EnvironmentalCare => "lingkungan",
        }
    }
}

impl fmt::Display for ProfileDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProfileDimension {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label() == needle || d.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| InputError::unknown("selected_dpl", s))
    }
}
