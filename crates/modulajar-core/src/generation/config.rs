use std::env;

use serde::{Deserialize, Serialize};

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

/// Generation service configuration.
///
/// Reads `GEMINI_API_KEY`, `MODULAJAR_MODEL` and `MODULAJAR_ENDPOINT` from
/// the environment, falling back to the compile-time defaults.
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Access credential for the generation endpoint.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-3-flash-preview`.
    pub model: String,
    /// API root without a trailing slash.
    pub endpoint: String,
    pub sampling: SamplingConfig,
}

impl GeneratorConfig {
    /// Model used when nothing else is configured.
    pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

    /// Public Generative Language API root.
    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Environment variable holding the API key.
    pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
    pub const MODEL_ENV: &str = "MODULAJAR_MODEL";
    pub const ENDPOINT_ENV: &str = "MODULAJAR_ENDPOINT";

    /// Build a config from the environment.
    ///
    /// A missing API key yields an empty string; the generator rejects it at
    /// construction time.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var(Self::API_KEY_ENV).unwrap_or_default(),
            model: env::var(Self::MODEL_ENV).unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned()),
            endpoint: env::var(Self::ENDPOINT_ENV)
                .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_owned()),
            sampling: SamplingConfig::default(),
        }
    }

    /// Build a config from an explicit key with default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: Self::DEFAULT_MODEL.to_owned(),
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            sampling: SamplingConfig::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_owned();
        self
    }

    /// Full `generateContent` URL for the configured model.
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// The key must never reach a log line.
impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("sampling", &self.sampling)
            .finish()
    }
}
