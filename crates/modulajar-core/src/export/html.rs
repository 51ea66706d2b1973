//! Markdown rendering and the HTML document shells.

use pulldown_cmark::{Options, Parser, html};

/// Embedded stylesheet of the Word document.
pub const WORD_STYLE: &str = "\
body { font-family: 'Arial', sans-serif; line-height: 1.5; }
h1 { color: #1e40af; border-bottom: 2px solid #e0e7ff; padding-bottom: 5px; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid black; padding: 8px; }
th { background-color: #f3f4f6; }
";

/// Embedded stylesheet of the print page.
pub const PRINT_STYLE: &str = "\
@page { size: A4; margin: 2cm; }
body { font-family: 'Arial', sans-serif; line-height: 1.5; color: #0f172a; margin: 0; }
h1, h2, h3 { color: #1e40af; page-break-after: avoid; }
h1 { border-bottom: 2px solid #e0e7ff; padding-bottom: 5px; }
table { border-collapse: collapse; width: 100%; page-break-inside: avoid; }
th, td { border: 1px solid #94a3b8; padding: 6px 8px; vertical-align: top; }
th { background-color: #f3f4f6; }
";

const WORD_HEADER: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>\n\
<head><meta charset='utf-8'><title>Modul Ajar</title>\n";

const FOOTER: &str = "</body></html>";

/// Convert Markdown to an HTML fragment.
///
/// CommonMark plus GFM tables, strikethrough and task lists, which covers
/// the rubric tables and signature block the model is asked to produce.
pub fn render_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Word-compatible HTML document (without the BOM).
pub fn word_document_html(markdown: &str) -> String {
    let body = render_html(markdown);
    let mut doc = String::with_capacity(WORD_HEADER.len() + WORD_STYLE.len() + body.len() + 64);
    doc.push_str(WORD_HEADER);
    doc.push_str("<style>\n");
    doc.push_str(WORD_STYLE);
    doc.push_str("</style>\n</head><body>\n");
    doc.push_str(&body);
    doc.push_str(FOOTER);
    doc
}

/// Standalone print page for the host's print-to-PDF facility.
pub fn print_document(markdown: &str) -> String {
    let body = render_html(markdown);
    format!(
        "<!DOCTYPE html>\n<html lang=\"id\"><head><meta charset=\"utf-8\">\
<title>Modul Ajar</title>\n<style>\n{PRINT_STYLE}</style>\n</head><body>\n\
<article class=\"print-only\">\n{body}</article>\n\
<script>window.addEventListener('load', function () {{ window.print(); }});</script>\n\
{FOOTER}"
    )
}
