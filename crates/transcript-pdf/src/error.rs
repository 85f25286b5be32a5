use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to parse PDF: {0}")]
    Malformed(String),

    #[error("PDF is encrypted and exposes no text layer")]
    Encrypted,

    #[error("PDF contains no extractable text")]
    NoText,
}
