//! Form session: one input record, the last generated module, the last
//! error, and the busy flag guarding re-submission.
//!
//! A submission runs in two halves so a caller that shares the session
//! (the HTTP server) never holds its lock across the network call:
//!
//! ```text
//! begin()  -- validate, set busy, clear error, build prompt --> PendingGeneration
//!   |
//!   |   generator.generate(prompt).await   (no session access)
//!   v
//! finish() -- clear busy, record module or error
//! ```
//!
//! [`Session::submit`] runs both halves for callers that own the session.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::export::{self, ExportFormat, ExportPayload};
use crate::generation::{GenerationError, Generator};
use crate::input::{ModuleInput, TeachingModel, ValidationError, validate};
use crate::prompt::{PersonnelField, audit_identity_section, build_prompt};

/// Errors surfaced by a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a generation request is already in flight")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("no module has been generated yet")]
    NothingGenerated,
}

impl SessionError {
    /// The single message shown at the UI boundary.
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => "Modul sedang dibuat. Mohon tunggu hingga selesai.".to_owned(),
            Self::Validation(e) => e.user_message(),
            Self::Generation(e) => e.user_message().to_owned(),
            Self::NothingGenerated => "Belum ada modul yang dihasilkan.".to_owned(),
        }
    }
}

/// A successfully generated module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedModule {
    /// Markdown exactly as returned by the generator.
    pub content: String,
    pub teaching_model: TeachingModel,
    pub generated_at: DateTime<Utc>,
    /// Personnel fields found inside the identity section. Kinds only, so
    /// names and NIPs never leave the content.
    pub identity_findings: Vec<PersonnelField>,
}

/// Token returned by [`Session::begin`]; carries what the network half needs.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    pub prompt: String,
    /// Snapshot of the input the prompt was built from.
    pub input: ModuleInput,
}

/// State owned by one form session.
#[derive(Debug, Default)]
pub struct Session {
    input: ModuleInput,
    generated: Option<GeneratedModule>,
    /// Input snapshot the current module was generated from; drives export
    /// file names even if the form is edited afterwards.
    generated_from: Option<ModuleInput>,
    error: Option<String>,
    busy: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: ModuleInput) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &ModuleInput {
        &self.input
    }

    /// Mutable access for field-by-field edits.
    pub fn input_mut(&mut self) -> &mut ModuleInput {
        &mut self.input
    }

    pub fn set_input(&mut self, input: ModuleInput) {
        self.input = input;
    }

    pub fn generated(&self) -> Option<&GeneratedModule> {
        self.generated.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// First half of a submission.
    ///
    /// Refuses while busy. On a validation failure the error is recorded and
    /// the busy flag stays clear; otherwise the flag is set, the previous
    /// error is cleared and the prompt is built.
    pub fn begin(&mut self) -> Result<PendingGeneration, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        if let Err(e) = validate(&self.input) {
            self.error = Some(e.user_message());
            return Err(e.into());
        }

        self.busy = true;
        self.error = None;
        Ok(PendingGeneration {
            prompt: build_prompt(&self.input),
            input: self.input.clone(),
        })
    }

    /// Second half of a submission: record the outcome and clear busy.
    ///
    /// On failure the previous module (if any) is kept and the error message
    /// is recorded.
    pub fn finish(
        &mut self,
        pending: PendingGeneration,
        outcome: Result<String, GenerationError>,
    ) -> Result<&GeneratedModule, SessionError> {
        self.busy = false;

        let content = match outcome {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                let err = GenerationError::EmptyResponse;
                warn!("generator returned blank text");
                self.error = Some(err.user_message().to_owned());
                return Err(err.into());
            }
            Err(err) => {
                warn!(error = %err, "generation failed");
                self.error = Some(err.user_message().to_owned());
                return Err(err.into());
            }
        };

        let identity_findings: Vec<PersonnelField> =
            audit_identity_section(&content, &pending.input)
                .into_iter()
                .map(|leak| leak.field)
                .collect();
        for field in &identity_findings {
            warn!(%field, "generated identity section mentions personnel");
        }

        let module = GeneratedModule {
            content,
            teaching_model: pending.input.teaching_model,
            generated_at: Utc::now(),
            identity_findings,
        };
        self.generated_from = Some(pending.input);
        Ok(&*self.generated.insert(module))
    }

    /// Validate, build, generate and record in one call.
    pub async fn submit(
        &mut self,
        generator: &dyn Generator,
    ) -> Result<&GeneratedModule, SessionError> {
        let pending = self.begin()?;
        info!(
            generator = generator.name(),
            model = generator.model(),
            teaching_model = %pending.input.teaching_model,
            "generating module"
        );
        let outcome = generator.generate(&pending.prompt).await;
        if let Ok(text) = &outcome {
            info!(bytes = text.len(), "module generated");
        }
        self.finish(pending, outcome)
    }

    /// Export the last generated module.
    pub fn export(&self, format: ExportFormat) -> Result<ExportPayload, SessionError> {
        let module = self.generated.as_ref().ok_or(SessionError::NothingGenerated)?;
        let input = self.generated_from.as_ref().unwrap_or(&self.input);
        Ok(export::export(format, &module.content, input))
    }

    /// HTML preview of the last generated module.
    pub fn preview_html(&self) -> Result<String, SessionError> {
        let module = self.generated.as_ref().ok_or(SessionError::NothingGenerated)?;
        Ok(export::render_html(&module.content))
    }
}
