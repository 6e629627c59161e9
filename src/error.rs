/// User-facing error categories. Every variant maps to exactly one fixed
/// chat reply at the dispatcher boundary; none of them crash the process.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("file exceeds the {0} byte upload limit")]
    FileTooLarge(u32),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("document is empty after extraction")]
    EmptyDocument,

    #[error("generation failed after {attempts} attempts: {message}")]
    Generation { attempts: u32, message: String },

    #[error("no credits remaining")]
    NoCredits,
}
