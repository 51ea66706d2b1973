//! Export pipeline for generated modules.
//!
//! Every conversion is a pure function of the generated Markdown (plus the
//! input fields used for file names). Nothing here touches the clipboard,
//! the file system or a printer; callers hand the resulting
//! [`ExportPayload`] to whichever host facility applies.

pub mod html;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::input::ModuleInput;

pub use html::{PRINT_STYLE, WORD_STYLE, print_document, render_html, word_document_html};

/// MIME type for raw Markdown downloads.
pub const MARKDOWN_MIME: &str = "text/markdown";
/// Legacy office MIME type Word opens HTML documents under.
pub const WORD_MIME: &str = "application/msword";
/// MIME type of the print page and the preview.
pub const HTML_MIME: &str = "text/html; charset=utf-8";
/// MIME type of the clipboard payload.
pub const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// Byte-order mark Word needs to detect UTF-8 in an HTML `.doc`.
const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format {0:?} (expected copy, markdown, word or pdf)")]
    UnknownFormat(String),
}

/// The four post-generation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Raw Markdown for the clipboard.
    Copy,
    /// Raw Markdown as a `.md` download.
    Markdown,
    /// Word-compatible HTML as a `.doc` download.
    Word,
    /// Print page handed to the host print dialog.
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Copy, Self::Markdown, Self::Word, Self::Pdf];
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Copy => "copy",
            Self::Markdown => "markdown",
            Self::Word => "word",
            Self::Pdf => "pdf",
        };
        f.write_str(s)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" | "clipboard" => Ok(Self::Copy),
            "markdown" | "md" => Ok(Self::Markdown),
            "word" | "doc" => Ok(Self::Word),
            "pdf" | "print" => Ok(Self::Pdf),
            _ => Err(ExportError::UnknownFormat(s.to_owned())),
        }
    }
}

/// Bytes plus the metadata a host facility needs to deliver them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub format: ExportFormat,
    /// Suggested download name; `None` for clipboard and print.
    pub filename: Option<String>,
    pub mime: &'static str,
    pub body: Vec<u8>,
}

impl ExportPayload {
    /// Body as text. Every payload produced here is UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Produce the payload for `format`.
pub fn export(format: ExportFormat, markdown: &str, input: &ModuleInput) -> ExportPayload {
    match format {
        ExportFormat::Copy => clipboard(markdown),
        ExportFormat::Markdown => markdown_file(markdown, &input.subject, &input.core_topic),
        ExportFormat::Word => word_document(markdown, &input.subject),
        ExportFormat::Pdf => print_page(markdown),
    }
}

/// Raw Markdown, verbatim.
pub fn clipboard(markdown: &str) -> ExportPayload {
    ExportPayload {
        format: ExportFormat::Copy,
        filename: None,
        mime: TEXT_MIME,
        body: markdown.as_bytes().to_vec(),
    }
}

/// Raw Markdown as `Modul_Ajar_{subject}_{core_topic}.md`, verbatim.
pub fn markdown_file(markdown: &str, subject: &str, core_topic: &str) -> ExportPayload {
    ExportPayload {
        format: ExportFormat::Markdown,
        filename: Some(markdown_filename(subject, core_topic)),
        mime: MARKDOWN_MIME,
        body: markdown.as_bytes().to_vec(),
    }
}

/// Word-compatible HTML as `Modul_Ajar_{subject}.doc`, BOM-prefixed.
pub fn word_document(markdown: &str, subject: &str) -> ExportPayload {
    let mut body = String::from(UTF8_BOM);
    body.push_str(&word_document_html(markdown));
    ExportPayload {
        format: ExportFormat::Word,
        filename: Some(word_filename(subject)),
        mime: WORD_MIME,
        body: body.into_bytes(),
    }
}

/// Print page that opens the host print dialog on load.
pub fn print_page(markdown: &str) -> ExportPayload {
    ExportPayload {
        format: ExportFormat::Pdf,
        filename: None,
        mime: HTML_MIME,
        body: print_document(markdown).into_bytes(),
    }
}

pub fn markdown_filename(subject: &str, core_topic: &str) -> String {
    format!(
        "Modul_Ajar_{}_{}.md",
        filename_part(subject),
        filename_part(core_topic)
    )
}

pub fn word_filename(subject: &str) -> String {
    format!("Modul_Ajar_{}.doc", filename_part(subject))
}

/// Name used when the print page is saved to disk instead of opened.
pub fn print_filename(subject: &str) -> String {
    format!("Modul_Ajar_{}.html", filename_part(subject))
}

/// Replace path separators and characters reserved on common file systems.
fn filename_part(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
