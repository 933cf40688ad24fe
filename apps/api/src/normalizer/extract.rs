//! Format-specific text extractors. Each one works on an in-memory byte slice and
//! returns raw (untrimmed) text or an `ExtractError`.

use std::any::Any;
use std::io::Cursor;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use docx_rust::document::{BodyContent, BreakType, Paragraph, ParagraphContent, Run, RunContent};
use docx_rust::DocxFile;
use thiserror::Error;

use super::MediaType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("plain text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("Word document parsing failed: {0}")]
    Word(String),

    #[error("{format} parser panicked: {message}")]
    ParserPanic {
        format: &'static str,
        message: String,
    },

    #[error("extraction timed out after {0:?}")]
    TimedOut(Duration),

    #[error("extraction worker failed: {0}")]
    Worker(String),
}

impl ExtractError {
    /// Timeouts and worker faults say nothing about the upload itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractError::TimedOut(_) | ExtractError::Worker(_))
    }
}

/// Dispatches on the declared media type. No content sniffing.
pub fn extract_text(media_type: MediaType, bytes: &[u8]) -> Result<String, ExtractError> {
    match media_type {
        MediaType::PlainText => extract_plain_text(bytes),
        MediaType::Pdf => extract_pdf(bytes),
        MediaType::MsWord | MediaType::Docx => extract_word(bytes),
    }
}

fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    guard_panics("PDF", || {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    })
}

/// Concatenates the text of every top-level paragraph, in document order, one per line.
fn extract_word(bytes: &[u8]) -> Result<String, ExtractError> {
    guard_panics("Word", || {
        let file = DocxFile::from_reader(Cursor::new(bytes))
            .map_err(|e| ExtractError::Word(format!("{e:?}")))?;
        let docx = file
            .parse()
            .map_err(|e| ExtractError::Word(format!("{e:?}")))?;

        let lines: Vec<String> = docx
            .document
            .body
            .content
            .iter()
            .filter_map(|content| match content {
                BodyContent::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
                _ => None,
            })
            .collect();

        Ok(lines.join("\n"))
    })
}

/// Visible paragraph text. Tabs and line breaks become `\t` and `\n`; field codes
/// (`w:instrText`) and tracked deletions are skipped.
fn paragraph_text(paragraph: &Paragraph<'_>) -> String {
    let mut line = String::new();
    for content in &paragraph.content {
        match content {
            ParagraphContent::Run(run) => push_run_text(run, &mut line),
            ParagraphContent::Link(link) => {
                if let Some(run) = &link.content {
                    push_run_text(run, &mut line);
                }
                if let Some(bidi) = &link.bidirectional_embedding {
                    bidi.iter_text().for_each(|text| line.push_str(text));
                }
            }
            ParagraphContent::SDT(sdt) => sdt.iter_text().for_each(|text| line.push_str(text)),
            _ => {}
        }
    }
    line
}

fn push_run_text(run: &Run<'_>, line: &mut String) {
    for content in &run.content {
        match content {
            RunContent::Text(text) => line.push_str(&text.text),
            RunContent::Tab(_) | RunContent::PTab(_) => line.push('\t'),
            RunContent::CarriageReturn(_) => line.push('\n'),
            // Page and column breaks carry no text.
            RunContent::Break(br) => {
                if matches!(br.ty, None | Some(BreakType::TextWrapping)) {
                    line.push('\n');
                }
            }
            RunContent::NoBreakHyphen(_) => line.push('-'),
            _ => {}
        }
    }
}

/// Third-party parsers may panic on hostile input. Convert that into an error here,
/// at the parser call, so it never unwinds through request handling.
fn guard_panics<F>(format: &'static str, parse: F) -> Result<String, ExtractError>
where
    F: FnOnce() -> Result<String, ExtractError>,
{
    panic::catch_unwind(AssertUnwindSafe(parse)).unwrap_or_else(|payload| {
        Err(ExtractError::ParserPanic {
            format,
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
