use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use modulajar_core::input::{ModuleInput, validate};
use modulajar_core::prompt::build_prompt;
use modulajar_core::{ExportFormat, Generator, Session};

use crate::export_cmd::write_payload;

/// Read a module request from a TOML file.
pub fn load_input(path: &Path) -> Result<ModuleInput> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    ModuleInput::from_toml_str(&contents)
        .with_context(|| format!("failed to parse input file {}", path.display()))
}

/// Execute `modulajar prompt`: validate and print the prompt, no network.
pub fn run_prompt(input_path: &Path) -> Result<()> {
    let input = load_input(input_path)?;
    if let Err(e) = validate(&input) {
        bail!("{}", e.user_message());
    }
    print!("{}", build_prompt(&input));
    Ok(())
}

/// Execute `modulajar generate`: one submission, then every requested export.
pub async fn run_generate(
    generator: &dyn Generator,
    input_path: &Path,
    formats: &[ExportFormat],
    out_dir: &Path,
) -> Result<()> {
    let input = load_input(input_path)?;
    let mut session = Session::with_input(input);

    match session.submit(generator).await {
        Ok(module) => info!(
            bytes = module.content.len(),
            teaching_model = %module.teaching_model,
            "module ready"
        ),
        Err(err) => {
            error!(error = %err, "module generation failed");
            bail!("{}", err.user_message());
        }
    }

    for &format in formats {
        let payload = session.export(format)?;
        if let Some(path) = write_payload(&payload, session.input(), out_dir)? {
            println!("Wrote {} to {}", format, path.display());
        }
    }
    Ok(())
}
