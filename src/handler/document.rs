use std::path::{Path, PathBuf};

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::Document;

use super::{messages, user_message, BotState};
use crate::document::{self, DocumentFormat, ExtractionLimits};
use crate::error::BotError;

/// Gate checks on the declared upload, run before any download work.
pub fn validate_upload(
    file_name: &str,
    declared_size: u32,
    max_size: u32,
) -> Result<DocumentFormat, BotError> {
    if declared_size > max_size {
        return Err(BotError::FileTooLarge(declared_size));
    }
    DocumentFormat::from_file_name(file_name).ok_or_else(|| {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        BotError::UnsupportedFormat(ext)
    })
}

pub async fn handle_upload(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    doc: &Document,
    user_id: i64,
) -> anyhow::Result<()> {
    if state.sessions.get(user_id).await.is_none() {
        log::debug!("Ignoring upload from {} with no session", user_id);
        return Ok(());
    }

    let file_name = doc.file_name.clone().unwrap_or_else(|| "file".to_string());
    let format = match validate_upload(&file_name, doc.file.size, state.config.max_file_size) {
        Ok(format) => format,
        Err(err) => {
            log::warn!("Rejected upload from {}: {}", user_id, err);
            bot.send_message(msg.chat.id, user_message(&err.into()))
                .await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, messages::DOWNLOADING).await?;

    // Per-request file name, so concurrent users uploading identically named
    // documents never collide.
    let temp_path = PathBuf::from(&state.config.download_dir).join(format!(
        "{}-{}.{}",
        user_id,
        chrono::Utc::now().timestamp_millis(),
        format.extension()
    ));

    let outcome = download_and_extract(bot, state, doc, &temp_path, format, msg.chat.id).await;

    // The temp file is removed on every exit path; a failed removal is
    // logged, never propagated.
    if let Err(err) = tokio::fs::remove_file(&temp_path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            log::error!("Error cleaning up {}: {}", temp_path.display(), err);
        }
    }

    match outcome {
        Ok(text) => {
            state.sessions.set_document(user_id, text).await;
            bot.send_message(msg.chat.id, messages::DOC_READY).await?;
        }
        Err(err) => {
            log::error!("Error processing document from {}: {:#}", user_id, err);
            bot.send_message(msg.chat.id, user_message(&err)).await?;
        }
    }

    Ok(())
}

async fn download_and_extract(
    bot: &Bot,
    state: &BotState,
    doc: &Document,
    temp_path: &Path,
    format: DocumentFormat,
    chat_id: ChatId,
) -> anyhow::Result<String> {
    let file = bot.get_file(doc.file.id.clone()).await?;
    let mut dst = tokio::fs::File::create(temp_path).await?;
    bot.download_file(&file.path, &mut dst).await?;

    bot.send_message(chat_id, messages::EXTRACTING).await?;

    let limits = ExtractionLimits {
        max_chars: state.config.max_text_length,
        max_pdf_pages: state.config.max_pdf_pages,
        max_docx_paragraphs: state.config.max_docx_paragraphs,
    };
    let text = document::extract(temp_path, format, limits)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 5 * 1024 * 1024;

    #[test]
    fn test_oversized_upload_rejected() {
        let result = validate_upload("report.pdf", MAX + 1, MAX);
        assert!(matches!(result, Err(BotError::FileTooLarge(_))));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let result = validate_upload("notes.txt", 1024, MAX);
        assert!(matches!(result, Err(BotError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_supported_uploads_pass() {
        assert_eq!(
            validate_upload("report.pdf", MAX, MAX).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            validate_upload("Thesis.DOCX", 1024, MAX).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_size_gate_runs_before_format_gate() {
        // an oversized file with a bad extension reports the size problem
        let result = validate_upload("movie.mkv", MAX + 1, MAX);
        assert!(matches!(result, Err(BotError::FileTooLarge(_))));
    }
}
