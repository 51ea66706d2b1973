//! Prompt construction for teaching-module generation.
//!
//! Renders a validated [`ModuleInput`] into the single instruction sent to
//! the language model: a numbered input manifest, the composition rules,
//! and the fixed A–P module outline. This module contains pure logic (no
//! I/O); the outline never changes shape, only the values interpolated
//! into it.

pub mod audit;

use std::fmt::Write as _;

use crate::input::ModuleInput;

pub use audit::{IdentityLeak, PersonnelField, audit_identity_section};

// ---------------------------------------------------------------------------
// Fixed text
// ---------------------------------------------------------------------------

/// Header of the numbered input manifest.
pub const INPUT_HEADER: &str = "=== INPUT ===";
/// Header of the composition rules.
pub const RULES_HEADER: &str = "=== KETENTUAN PENYUSUNAN ===";
/// Header of the A–P outline.
pub const OUTLINE_HEADER: &str = "=== STRUKTUR MODUL (WAJIB ADA SEMUA) ===";

/// Section letters of the module outline, in order.
pub const SECTION_LETTERS: [char; 16] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
];

/// Letter of the identity block.
pub const IDENTITY_SECTION: char = 'A';
/// Letter of the pedagogical model statement.
pub const MODEL_SECTION: char = 'F';
/// Letter of the learning objectives.
pub const OBJECTIVES_SECTION: char = 'G';
/// Letter of the three-phase activity plan.
pub const ACTIVITIES_SECTION: char = 'J';
/// Letter of the assessment plan.
pub const ASSESSMENT_SECTION: char = 'K';
/// Letter of the signature block.
pub const SIGNATURE_SECTION: char = 'P';

const ROLE: &str = "Anda adalah AI ahli kurikulum dan perancang Modul Ajar Deep Learning \
Kurikulum Merdeka jenjang SMP.\n\
Buatlah MODUL AJAR PEMBELAJARAN DEEP LEARNING secara LENGKAP, SISTEMATIS, dan SIAP \
DIGUNAKAN GURU berdasarkan data berikut:\n";

const CLOSING: &str = "Hasilkan konten dalam format Markdown yang rapi dan profesional. \
Gunakan tabel jika diperlukan untuk rubrik penilaian.\n";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the generation prompt for `input`.
///
/// Callers are expected to have passed `input` through
/// [`crate::input::validate`] first; the builder itself never fails.
///
/// Content rules carried by the outline:
/// - section A lists the module identity but never the teacher or
///   principal (names and NIPs live only in section P);
/// - section P asks for a borderless two-column table, principal on the
///   left and teacher on the right, each NIP beneath its name;
/// - the teaching-model label is quoted verbatim in sections F and J;
/// - every selected DPL is named in sections G, J and K.
pub fn build_prompt(input: &ModuleInput) -> String {
    let school = inline(&input.school_name);
    let teacher = inline(&input.teacher_name);
    let teacher_nip = inline(&input.teacher_nip);
    let principal = inline(&input.principal_name);
    let principal_nip = inline(&input.principal_nip);
    let model = input.teaching_model.label();
    let dpl = input.selected_dpl.joined_labels();

    let mut prompt = String::with_capacity(4096);
    prompt.push_str(ROLE);
    prompt.push('\n');

    // Input manifest.
    let manifest: [(&str, String); 15] = [
        ("Nama Sekolah", school.clone()),
        ("Nama Guru Mapel", teacher.clone()),
        ("NIP Guru Mapel", teacher_nip.clone()),
        ("Nama Kepala Sekolah", principal.clone()),
        ("NIP Kepala Sekolah", principal_nip.clone()),
        ("Kelas", input.grade.label().to_owned()),
        ("Semester", input.semester.label().to_owned()),
        ("Tahun Pelajaran", inline(&input.academic_year)),
        ("Mata Pelajaran", inline(&input.subject)),
        ("Materi Pokok", inline(&input.core_topic)),
        ("Sub Materi", inline(&input.sub_topic)),
        ("Alokasi Waktu", inline(&input.duration)),
        ("Jumlah Pertemuan", inline(&input.meeting_count)),
        ("Model Pembelajaran", model.to_owned()),
        ("Dimensi Profil Lulusan (DPL)", dpl.clone()),
    ];
    prompt.push_str(INPUT_HEADER);
    prompt.push('\n');
    for (i, (label, value)) in manifest.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {label}: {value}", i + 1);
    }
    prompt.push('\n');

    // Composition rules.
    prompt.push_str(RULES_HEADER);
    prompt.push('\n');
    let rules = [
        "Modul harus berbasis pendekatan Deep Learning: Mindful Learning, Meaningful Learning, \
         Joyful Learning."
            .to_owned(),
        format!(
            "Integrasikan Model Pembelajaran \"{model}\" secara eksplisit ke dalam sintaks \
             kegiatan inti."
        ),
        "Pembelajaran berpusat pada peserta didik.".to_owned(),
        format!(
            "Kontekstual dengan lingkungan {school} (sesuaikan dengan karakteristik \
             pesisir/pedesaan jika relevan)."
        ),
        format!("Integrasikan DPL ({dpl}) ke dalam Tujuan, Aktivitas, dan Asesmen."),
        "Gunakan Bahasa Indonesia formal-edukatif yang mudah dipahami guru.".to_owned(),
    ];
    for (i, rule) in rules.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {rule}", i + 1);
    }
    prompt.push('\n');

    // Outline.
    prompt.push_str(OUTLINE_HEADER);
    prompt.push('\n');
    let outline: [String; 16] = [
        "Identitas Modul (Sertakan: Nama Sekolah, Kelas, Mata Pelajaran, Materi Pokok, \
         Sub Materi, Alokasi Waktu, Semester, Tahun Pelajaran. PENTING: JANGAN sertakan \
         Nama Guru, NIP, atau Kepala Sekolah di bagian identitas ini karena informasi \
         tersebut dikhususkan untuk Lembar Pengesahan.)"
            .to_owned(),
        "Kompetensi Awal".to_owned(),
        "Profil Pelajar (DPL)".to_owned(),
        "Sarana dan Prasarana".to_owned(),
        "Target Peserta Didik".to_owned(),
        format!("Model, Pendekatan, dan Metode (Sebutkan Deep Learning & {model})"),
        format!("Tujuan Pembelajaran (Terukur & Integrasi DPL: {dpl})"),
        "Pemahaman Bermakna (Meaningful Learning)".to_owned(),
        "Pertanyaan Pemantik (HOTS)".to_owned(),
        format!(
            "Kegiatan Pembelajaran (Pendahuluan: Mindful, Inti: Deep dengan Sintaks {model}, \
             Penutup: Joyful & Refleksi. Tunjukkan aktivitas yang menumbuhkan DPL: {dpl})"
        ),
        format!(
            "Asesmen Pembelajaran (Diagnostik, Formatif, Sumatif + Contoh Instrumen. \
             Nilai ketercapaian DPL: {dpl})"
        ),
        "Pengayaan dan Remedial".to_owned(),
        "Refleksi Guru dan Peserta Didik".to_owned(),
        "Bahan Bacaan Guru dan Peserta Didik".to_owned(),
        "Lampiran (LKPD, Rubrik, Contoh Soal)".to_owned(),
        format!(
            "Lembar Pengesahan (WAJIB: Buatlah tempat tanda tangan yang SEJAJAR secara \
             horizontal. Nama Kepala Sekolah [{principal}] diletakkan di sebelah KIRI dan \
             Nama Guru Mapel [{teacher}] diletakkan di sebelah KANAN. Cantumkan NIP Kepala \
             Sekolah [{principal_nip}] tepat di bawah nama Kepala Sekolah dan NIP Guru \
             [{teacher_nip}] tepat di bawah nama guru. Gunakan tabel Markdown dua kolom \
             tanpa garis tepi (tanpa border) agar posisi kiri-kanan tersebut tetap rapi.)"
        ),
    ];
    for (letter, text) in SECTION_LETTERS.iter().zip(outline.iter()) {
        let _ = writeln!(prompt, "{letter}. {text}");
    }
    prompt.push('\n');

    prompt.push_str(CLOSING);
    prompt
}

/// Return the outline line for `letter` (e.g. `'A'`) in a built prompt.
///
/// Each outline section is rendered on one line after [`OUTLINE_HEADER`];
/// the returned slice is that whole line including the `"A. "` prefix.
pub fn section_text(prompt: &str, letter: char) -> Option<&str> {
    let (_, outline) = prompt.split_once(OUTLINE_HEADER)?;
    let prefix = format!("{letter}. ");
    outline.lines().find(|line| line.starts_with(&prefix))
}

/// Trim and collapse whitespace runs so a value stays on one line.
fn inline(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Grade, ProfileDimension, Semester, TeachingModel};

    fn sample_input() -> ModuleInput {
        let mut input = ModuleInput {
            school_name: "SMPN 3 Pakuhaji".into(),
            teacher_name: "Budi".into(),
            teacher_nip: "19850101 201001 1 001".into(),
            principal_name: "Siti".into(),
            principal_nip: "19750202 200501 2 002".into(),
            grade: Grade::VIII,
            semester: Semester::Genap,
            subject: "Matematika".into(),
            core_topic: "Persamaan Linear".into(),
            sub_topic: "SPLDV".into(),
            duration: "2 x 40 Menit".into(),
            meeting_count: "2 Pertemuan".into(),
            ..ModuleInput::default()
        };
        input.selected_dpl.insert(ProfileDimension::Creativity);
        input.selected_dpl.insert(ProfileDimension::Collaboration);
        input
    }

    #[test]
    fn manifest_lists_every_field_in_order() {
        let prompt = build_prompt(&sample_input());
        let expected = [
            "1. Nama Sekolah: SMPN 3 Pakuhaji",
            "2. Nama Guru Mapel: Budi",
            "3. NIP Guru Mapel: 19850101 201001 1 001",
            "4. Nama Kepala Sekolah: Siti",
            "5. NIP Kepala Sekolah: 19750202 200501 2 002",
            "6. Kelas: VIII",
            "7. Semester: Genap",
            "8. Tahun Pelajaran: 2025/2026",
            "9. Mata Pelajaran: Matematika",
            "10. Materi Pokok: Persamaan Linear",
            "11. Sub Materi: SPLDV",
            "12. Alokasi Waktu: 2 x 40 Menit",
            "13. Jumlah Pertemuan: 2 Pertemuan",
            "14. Model Pembelajaran: Problem Based Learning (PBL)",
            "15. Dimensi Profil Lulusan (DPL): Kreativitas, Kolaborasi",
        ];
        let mut cursor = 0;
        for line in expected {
            let found = prompt[cursor..]
                .find(line)
                .unwrap_or_else(|| panic!("missing or out of order: {line}"));
            cursor += found + line.len();
        }
    }

    #[test]
    fn outline_has_all_sixteen_sections() {
        let prompt = build_prompt(&sample_input());
        for letter in SECTION_LETTERS {
            assert!(
                section_text(&prompt, letter).is_some(),
                "section {letter} missing"
            );
        }
        assert!(section_text(&prompt, 'Q').is_none());
    }

    #[test]
    fn identity_section_excludes_personnel() {
        let input = sample_input();
        let prompt = build_prompt(&input);
        let identity = section_text(&prompt, IDENTITY_SECTION).unwrap();
        for value in [
            &input.teacher_name,
            &input.teacher_nip,
            &input.principal_name,
            &input.principal_nip,
        ] {
            assert!(
                !identity.contains(value.as_str()),
                "identity section leaks {value:?}: {identity}"
            );
        }
        assert!(identity.contains("JANGAN sertakan"));
    }

    #[test]
    fn signature_section_carries_both_signatories() {
        let input = sample_input();
        let prompt = build_prompt(&input);
        let signature = section_text(&prompt, SIGNATURE_SECTION).unwrap();
        assert!(signature.contains("[Siti]"));
        assert!(signature.contains("[Budi]"));
        assert!(signature.contains("[19750202 200501 2 002]"));
        assert!(signature.contains("[19850101 201001 1 001]"));
        assert!(signature.contains("KIRI"));
        assert!(signature.contains("KANAN"));
        assert!(signature.contains("tanpa garis tepi"));
        // Principal is placed before the teacher (left, then right).
        assert!(signature.find("[Siti]").unwrap() < signature.find("[Budi]").unwrap());
    }

    #[test]
    fn teaching_model_is_quoted_verbatim() {
        for model in TeachingModel::ALL {
            let input = ModuleInput {
                teaching_model: model,
                ..sample_input()
            };
            let prompt = build_prompt(&input);
            assert!(section_text(&prompt, ACTIVITIES_SECTION)
                .unwrap()
                .contains(model.label()));
            assert!(section_text(&prompt, MODEL_SECTION)
                .unwrap()
                .contains(model.label()));
        }
    }

    #[test]
    fn every_selected_dpl_reaches_objectives_activities_and_assessment() {
        let mut input = sample_input();
        input.selected_dpl.insert(ProfileDimension::EnvironmentalCare);
        let prompt = build_prompt(&input);
        for letter in [OBJECTIVES_SECTION, ACTIVITIES_SECTION, ASSESSMENT_SECTION] {
            let section = section_text(&prompt, letter).unwrap();
            for dim in input.selected_dpl.iter() {
                assert!(
                    section.contains(dim.label()),
                    "section {letter} does not mention {dim}"
                );
            }
        }
    }

    #[test]
    fn contextual_rule_names_the_input_school() {
        let input = ModuleInput {
            school_name: "SMP Negeri 1 Teluknaga".into(),
            ..sample_input()
        };
        let prompt = build_prompt(&input);
        assert!(prompt.contains("Kontekstual dengan lingkungan SMP Negeri 1 Teluknaga"));
    }

    #[test]
    fn multiline_values_cannot_inject_outline_lines() {
        let input = ModuleInput {
            core_topic: "Persamaan\nA. Identitas palsu Budi".into(),
            ..sample_input()
        };
        let prompt = build_prompt(&input);
        assert!(prompt.contains("10. Materi Pokok: Persamaan A. Identitas palsu Budi"));
        let identity = section_text(&prompt, IDENTITY_SECTION).unwrap();
        assert!(identity.starts_with("A. Identitas Modul"));
        assert!(!identity.contains("Budi"));
    }

    #[test]
    fn build_is_deterministic() {
        let input = sample_input();
        assert_eq!(build_prompt(&input), build_prompt(&input));
    }

    #[test]
    fn outline_shape_does_not_depend_on_values() {
        let a = build_prompt(&sample_input());
        let b = build_prompt(&ModuleInput::default());
        let count = |p: &str| {
            p.split_once(OUTLINE_HEADER)
                .unwrap()
                .1
                .lines()
                .filter(|l| !l.is_empty())
                .count()
        };
        assert_eq!(count(&a), count(&b));
    }
}
