//! Core library for the lesson-module ("Modul Ajar") generator.
//!
//! - [`input`]: the form record, its closed option lists and the validation gate
//! - [`prompt`]: deterministic prompt assembly and the identity-section audit
//! - [`generation`]: the [`generation::Generator`] seam and the Gemini adapter
//! - [`export`]: clipboard, Markdown, Word and print conversions
//! - [`session`]: one form session with its busy flag

pub mod export;
pub mod generation;
pub mod input;
pub mod prompt;
pub mod session;

pub use export::{ExportFormat, ExportPayload};
pub use generation::{GenerationError, Generator};
pub use input::ModuleInput;
pub use session::{GeneratedModule, Session, SessionError};
