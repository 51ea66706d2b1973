//! Configuration file management for modulajar.
//!
//! Provides a TOML-based config file at `~/.config/modulajar/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use modulajar_core::generation::GeneratorConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// API root override, e.g. a proxy in front of the public endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the modulajar config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/modulajar` or
/// `~/.config/modulajar`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("modulajar");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("modulajar")
}

/// Return the path to the modulajar config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

/// Show only the edges of a key.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ModulajarConfig {
    pub generator: GeneratorConfig,
}

impl ModulajarConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `GEMINI_API_KEY` env > `generation.api_key` > error
    /// - Model: `cli_model` > `MODULAJAR_MODEL` env > `generation.model` > `GeneratorConfig::DEFAULT_MODEL`
    /// - Endpoint: `MODULAJAR_ENDPOINT` env > `generation.endpoint` > `GeneratorConfig::DEFAULT_ENDPOINT`
    pub fn resolve(cli_model: Option<&str>) -> Result<Self> {
        let file = load_config().ok().unwrap_or_default().generation;

        let api_key = match non_empty_env(GeneratorConfig::API_KEY_ENV).or(file.api_key) {
            Some(key) if !key.trim().is_empty() => key,
            _ => bail!(
                "API key not found; set {} or run `modulajar init --api-key <KEY>`",
                GeneratorConfig::API_KEY_ENV
            ),
        };

        let model = cli_model
            .map(str::to_owned)
            .or_else(|| non_empty_env(GeneratorConfig::MODEL_ENV))
            .or(file.model)
            .unwrap_or_else(|| GeneratorConfig::DEFAULT_MODEL.to_owned());

        let endpoint = non_empty_env(GeneratorConfig::ENDPOINT_ENV)
            .or(file.endpoint)
            .unwrap_or_else(|| GeneratorConfig::DEFAULT_ENDPOINT.to_owned());

        let generator = GeneratorConfig::new(api_key)
            .with_model(model)
            .with_endpoint(endpoint);
        Ok(Self { generator })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{EnvGuard, lock_env};

    const VARS: [&str; 5] = [
        "XDG_CONFIG_HOME",
        "HOME",
        GeneratorConfig::API_KEY_ENV,
        GeneratorConfig::MODEL_ENV,
        GeneratorConfig::ENDPOINT_ENV,
    ];

    fn write_file(contents: &str) {
        let dir = config_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), contents).unwrap();
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let original = ConfigFile {
            generation: GenerationSection {
                api_key: Some("AIza-test-key".to_string()),
                model: Some("gemini-2.5-pro".to_string()),
                endpoint: None,
            },
        };
        save_config(&original).unwrap();

        let loaded = load_config().unwrap();
        assert_eq!(loaded.generation.api_key, original.generation.api_key);
        assert_eq!(loaded.generation.model, original.generation.model);
        assert!(loaded.generation.endpoint.is_none());
        assert!(config_path().starts_with(tmp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        save_config(&ConfigFile::default()).unwrap();

        let meta = std::fs::metadata(config_path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_model_overrides_all() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::set_var(GeneratorConfig::API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(GeneratorConfig::MODEL_ENV, "env-model") };
        write_file("[generation]\nmodel = \"file-model\"\n");

        let config = ModulajarConfig::resolve(Some("cli-model")).unwrap();
        assert_eq!(config.generator.model, "cli-model");
        assert_eq!(config.generator.api_key, "env-key");
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::set_var(GeneratorConfig::API_KEY_ENV, "env-key") };
        unsafe { std::env::set_var(GeneratorConfig::MODEL_ENV, "env-model") };
        unsafe { std::env::set_var(GeneratorConfig::ENDPOINT_ENV, "http://proxy.local/v1beta/") };
        write_file(
            "[generation]\napi_key = \"file-key\"\nmodel = \"file-model\"\nendpoint = \"http://file.local\"\n",
        );

        let config = ModulajarConfig::resolve(None).unwrap();
        assert_eq!(config.generator.api_key, "env-key");
        assert_eq!(config.generator.model, "env-model");
        assert_eq!(config.generator.endpoint, "http://proxy.local/v1beta");
    }

    #[test]
    fn resolve_reads_config_file_then_defaults() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var(GeneratorConfig::API_KEY_ENV) };
        unsafe { std::env::remove_var(GeneratorConfig::MODEL_ENV) };
        unsafe { std::env::remove_var(GeneratorConfig::ENDPOINT_ENV) };
        write_file("[generation]\napi_key = \"file-key\"\n");

        let config = ModulajarConfig::resolve(None).unwrap();
        assert_eq!(config.generator.api_key, "file-key");
        assert_eq!(config.generator.model, GeneratorConfig::DEFAULT_MODEL);
        assert_eq!(config.generator.endpoint, GeneratorConfig::DEFAULT_ENDPOINT);
    }

    #[test]
    fn resolve_errors_when_no_api_key() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let _env = EnvGuard::capture(&VARS);
        unsafe { std::env::remove_var(GeneratorConfig::API_KEY_ENV) };
        unsafe { std::env::set_var("HOME", tmp.path()) };
        unsafe { std::env::remove_var("XDG_CONFIG_HOME") };

        let result = ModulajarConfig::resolve(None);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("API key not found"), "unexpected error: {msg}");
    }

    #[test]
    fn mask_key_hides_the_middle() {
        assert_eq!(mask_key("AIzaSyAbcdefghijklmnop"), "AIza...mnop");
        assert_eq!(mask_key("short"), "*****");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("modulajar/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
