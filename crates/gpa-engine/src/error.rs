use thiserror::Error;
use transcript_pdf::ExtractError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Rejected before extraction begins; user-correctable.
    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    OversizedInput { size: usize, limit: usize },

    /// Extraction could not obtain any text; fatal for the request, no
    /// partial result is produced.
    #[error("Unreadable PDF: {0}")]
    UnreadablePdf(#[from] ExtractError),
}
