//! Resume text extraction.
//!
//! Extraction never aborts a scoring batch: on failure the error string
//! itself becomes the "extracted text", and the model scores that. The
//! resulting record is garbage for that one resume, which is exactly the
//! per-item isolation the pipeline wants.

use tracing::warn;

/// Extracts plain text from a PDF document in memory.
pub fn text_from_pdf(filename: &str, bytes: &[u8]) -> String {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!("PDF extraction failed for '{filename}': {e}");
            e.to_string()
        }
    }
}
