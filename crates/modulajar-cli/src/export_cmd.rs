use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use modulajar_core::export::{ExportFormat, ExportPayload, export, print_filename};
use modulajar_core::input::ModuleInput;

use crate::generate_cmd::load_input;

/// Deliver one payload: clipboard text goes to stdout, everything else is
/// written under `out_dir`. Returns the written path, if any.
pub fn write_payload(
    payload: &ExportPayload,
    input: &ModuleInput,
    out_dir: &Path,
) -> Result<Option<PathBuf>> {
    if payload.format == ExportFormat::Copy {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&payload.body)?;
        stdout.flush()?;
        return Ok(None);
    }

    let name = payload
        .filename
        .clone()
        .unwrap_or_else(|| print_filename(&input.subject));
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let path = out_dir.join(name);
    std::fs::write(&path, &payload.body)
        .with_context(|| format!("cannot write output file {}", path.display()))?;
    Ok(Some(path))
}

/// Execute `modulajar export`: convert existing Markdown without generating.
pub fn run_export(
    markdown_path: &Path,
    input_path: &Path,
    formats: &[ExportFormat],
    out_dir: &Path,
) -> Result<()> {
    let markdown = std::fs::read_to_string(markdown_path)
        .with_context(|| format!("failed to read module file {}", markdown_path.display()))?;
    let input = load_input(input_path)?;

    for &format in formats {
        let payload = export(format, &markdown, &input);
        if let Some(path) = write_payload(&payload, &input, out_dir)? {
            println!("Wrote {} to {}", format, path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modulajar_test_utils::{sample_input, sample_module};

    #[test]
    fn export_writes_word_and_markdown() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = sample_input();
        let md_path = tmp.path().join("modul.md");
        let input_path = tmp.path().join("input.toml");
        std::fs::write(&md_path, sample_module(&input)).unwrap();
        std::fs::write(&input_path, toml::to_string(&input).unwrap()).unwrap();

        run_export(
            &md_path,
            &input_path,
            &[ExportFormat::Word, ExportFormat::Markdown],
            tmp.path(),
        )
        .unwrap();

        let doc = std::fs::read(tmp.path().join("Modul_Ajar_Matematika.doc")).unwrap();
        assert!(doc.starts_with(&[0xEF, 0xBB, 0xBF]));
        let md = std::fs::read_to_string(
            tmp.path()
                .join("Modul_Ajar_Matematika_Persamaan Linear Satu Variabel.md"),
        )
        .unwrap();
        assert_eq!(md, sample_module(&input));
    }

    #[test]
    fn print_page_gets_a_file_name_on_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = sample_input();
        let payload = export(ExportFormat::Pdf, "# Modul", &input);
        let path = write_payload(&payload, &input, tmp.path()).unwrap().unwrap();
        assert!(path.ends_with("Modul_Ajar_Matematika.html"));
    }

    #[test]
    fn missing_markdown_file_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = run_export(
            &tmp.path().join("missing.md"),
            &tmp.path().join("input.toml"),
            &[ExportFormat::Markdown],
            tmp.path(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing.md"));
    }
}
