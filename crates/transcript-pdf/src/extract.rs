//! PDF text extraction.
//!
//! pdf-extract can panic on malformed input rather than returning errors,
//! so the extraction call is wrapped in `catch_unwind` and panics become
//! [`ExtractError::Malformed`].

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;
use transcript_types::{ExtractedText, TextLine};

use crate::error::ExtractError;

/// Extract one text string per page from a PDF byte slice.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let owned = bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        pdf_extract::extract_text_from_mem_by_pages(&owned)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractError::Malformed(e.to_string())),
        Err(_) => Err(ExtractError::Malformed(
            "text extraction panicked on malformed document".into(),
        )),
    }
}

/// Convert PDF bytes into document-ordered text lines.
///
/// At most `max_pages` pages are extracted; longer documents are truncated
/// and flagged, never failed. Blank lines are dropped: downstream matching
/// is line-oriented and never keys on blank separators. No hyphen merging
/// or column reconstruction is attempted, so consumers must tolerate
/// concatenated and jumbled spacing.
pub fn extract_lines(bytes: &[u8], max_pages: usize) -> Result<ExtractedText, ExtractError> {
    let doc = lopdf::Document::load_mem(bytes)
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }
    let page_count = doc.get_pages().len();
    debug!(page_count, "loaded PDF structure");

    let pages = extract_pages(bytes)?;
    let truncated = pages.len() > max_pages;

    let mut lines = Vec::new();
    for (page_idx, page_text) in pages.iter().take(max_pages).enumerate() {
        let page = (page_idx + 1) as u32;
        let mut index = 0u32;
        for raw in page_text.lines() {
            let content = raw.trim_end();
            if content.trim().is_empty() {
                continue;
            }
            lines.push(TextLine {
                page,
                index,
                content: content.to_string(),
            });
            index += 1;
        }
    }

    if lines.is_empty() {
        return Err(ExtractError::NoText);
    }

    Ok(ExtractedText {
        lines,
        page_count,
        truncated,
    })
}
