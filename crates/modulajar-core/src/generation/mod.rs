//! Generation client interface.
//!
//! [`Generator`] is the seam between the session and whatever produces the
//! module text. The production implementation is [`GeminiGenerator`];
//! tests plug in scripted generators.
//!
//! ```text
//! Session --build_prompt--> prompt
//!     |
//!     v
//! &dyn Generator --generate(prompt)--> Ok(markdown) | Err(GenerationError)
//! ```
//!
//! One call per user action: no retries, no timeout beyond the transport
//! default.

pub mod config;
pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{GeneratorConfig, SamplingConfig};
pub use gemini::GeminiGenerator;

/// Message shown when the service could not be reached or refused the call.
pub const UNREACHABLE_MESSAGE: &str =
    "Terjadi kesalahan saat menghubungi AI. Periksa koneksi atau API Key Anda.";

/// Message shown when the service answered without usable text.
pub const EMPTY_MESSAGE: &str = "Gagal menghasilkan modul. Silakan coba lagi.";

/// Errors from a single generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator was configured without an access credential.
    #[error("no API key configured for the generation service")]
    MissingApiKey,

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("failed to reach the generation service: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("generation service rejected the request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The service answered 2xx but the body could not be decoded.
    #[error("malformed response from the generation service: {0}")]
    Malformed(String),

    /// The service answered without any non-blank text.
    #[error("generation service returned no text")]
    EmptyResponse,
}

impl GenerationError {
    /// The single message surfaced at the UI boundary.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyResponse => EMPTY_MESSAGE,
            Self::MissingApiKey
            | Self::Transport(_)
            | Self::Rejected { .. }
            | Self::Malformed(_) => UNREACHABLE_MESSAGE,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A text-generation backend.
///
/// Object-safe so sessions and servers can hold `&dyn Generator` or
/// `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send `prompt` and return the generated Markdown.
    ///
    /// Implementations must return [`GenerationError::EmptyResponse`]
    /// rather than `Ok` with blank text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};
