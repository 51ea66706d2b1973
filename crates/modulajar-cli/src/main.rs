mod config;
mod export_cmd;
mod generate_cmd;
mod options_cmd;
mod serve_cmd;
#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

use modulajar_core::ExportFormat;
use modulajar_core::generation::{GeminiGenerator, GeneratorConfig};

use config::ModulajarConfig;

#[derive(Parser)]
#[command(name = "modulajar", version, about = "Lesson-module (Modul Ajar) generator")]
struct Cli {
    /// Generation model (overrides MODULAJAR_MODEL and the config file)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a modulajar config file
    Init {
        /// Gemini API key (defaults to GEMINI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// List grades, semesters, teaching models and profile dimensions
    Options {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate an input file and print the generation prompt
    Prompt {
        /// Path to the module input TOML file
        input: PathBuf,
    },
    /// Generate a module and write the requested exports
    Generate {
        /// Path to the module input TOML file
        input: PathBuf,
        /// Export format: markdown, word, pdf or copy (repeatable)
        #[arg(long = "format", short = 'f', default_value = "markdown")]
        formats: Vec<ExportFormat>,
        /// Directory for written files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Convert an existing Markdown module without generating
    Export {
        /// Path to the generated Markdown
        module: PathBuf,
        /// Input file the module was generated from (used for file names)
        #[arg(long)]
        input: PathBuf,
        /// Export format: markdown, word, pdf or copy (repeatable)
        #[arg(long = "format", short = 'f', required = true)]
        formats: Vec<ExportFormat>,
        /// Directory for written files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Serve the form and JSON API over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

/// Execute the `modulajar init` command: write config file.
fn cmd_init(api_key: Option<String>, model: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let api_key = api_key
        .or_else(|| std::env::var(GeneratorConfig::API_KEY_ENV).ok())
        .filter(|k| !k.trim().is_empty());
    let model = model.unwrap_or_else(|| GeneratorConfig::DEFAULT_MODEL.to_string());

    let cfg = config::ConfigFile {
        generation: config::GenerationSection {
            api_key: api_key.clone(),
            model: Some(model.clone()),
            endpoint: None,
        },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match &api_key {
        Some(key) => println!("  generation.api_key = {}", config::mask_key(key)),
        None => println!(
            "  generation.api_key not set; export {} before generating",
            GeneratorConfig::API_KEY_ENV
        ),
    }
    println!("  generation.model = {model}");

    Ok(())
}

fn build_generator(cli_model: Option<&str>) -> anyhow::Result<GeminiGenerator> {
    let resolved = ModulajarConfig::resolve(cli_model)?;
    tracing::debug!(config = ?resolved.generator, "resolved generator config");
    GeminiGenerator::new(resolved.generator).context("failed to create Gemini client")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { api_key, force } => cmd_init(api_key, cli.model, force)?,
        Commands::Options { json } => options_cmd::run_options(json)?,
        Commands::Prompt { input } => generate_cmd::run_prompt(&input)?,
        Commands::Generate {
            input,
            formats,
            out_dir,
        } => {
            let generator = build_generator(cli.model.as_deref())?;
            generate_cmd::run_generate(&generator, &input, &formats, &out_dir).await?;
        }
        Commands::Export {
            module,
            input,
            formats,
            out_dir,
        } => export_cmd::run_export(&module, &input, &formats, &out_dir)?,
        Commands::Serve { bind, port } => {
            let generator = build_generator(cli.model.as_deref())?;
            serve_cmd::run_serve(Arc::new(generator), &bind, port).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "modulajar", &mut std::io::stdout());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
