//! Transcript PDF text extraction
//!
//! Turns an uploaded PDF byte stream into ordered [`transcript_types::TextLine`]s
//! with page provenance. Structure checks (parseability, encryption, page
//! count) go through lopdf; the text layer is pulled with pdf-extract.

pub mod error;
pub mod extract;

pub use error::ExtractError;
pub use extract::extract_lines;
