pub mod chunk;
pub mod docx;
pub mod pdf;

use std::path::Path;

use crate::error::BotError;

/// The two document formats the bot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from a file name, case-insensitively.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(&name.to_lowercase())
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string)?;
        match ext.as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Bounds applied during extraction, taken from the bot configuration.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionLimits {
    pub max_chars: usize,
    pub max_pdf_pages: usize,
    pub max_docx_paragraphs: usize,
}

/// Extracts bounded plain text from a downloaded document. The source file
/// is only read; deleting it afterwards is the caller's job.
pub fn extract(
    path: &Path,
    format: DocumentFormat,
    limits: ExtractionLimits,
) -> Result<String, BotError> {
    let content = match format {
        DocumentFormat::Pdf => pdf::extract(path, limits.max_pdf_pages, limits.max_chars)
            .map_err(|e| BotError::Extraction(e.to_string()))?,
        DocumentFormat::Docx => docx::extract(path, limits.max_docx_paragraphs, limits.max_chars)
            .map_err(|e| BotError::Extraction(e.to_string()))?,
    };

    let cleaned = content.replace(|c: char| c.is_control() && c != '\n', "");
    if cleaned.trim().is_empty() {
        return Err(BotError::EmptyDocument);
    }
    Ok(cleaned)
}

/// Keeps at most the first `max` characters, on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
