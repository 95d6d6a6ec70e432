//! Text extraction. Turns an uploaded document into plain text.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to extract text from '{filename}': {reason}")]
    Unreadable { filename: String, reason: String },

    #[error("no text found in '{0}'")]
    Empty(String),
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ExtractError>;
}

/// Runs `reader` on the blocking pool. PDF parsing is CPU-bound, and a panic
/// inside the parser surfaces as `Unreadable` for this one file.
pub async fn extract_blocking(
    reader: Arc<dyn TextExtractor>,
    bytes: Bytes,
    filename: &str,
) -> Result<String, ExtractError> {
    let name = filename.to_string();
    tokio::task::spawn_blocking(move || reader.extract(&bytes, &name))
        .await
        .map_err(|e| ExtractError::Unreadable {
            filename: filename.to_string(),
            reason: format!("text extraction task failed: {e}"),
        })?
}

/// PDF text extraction via `pdf-extract`.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8], filename: &str) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ExtractError::Unreadable {
                filename: filename.to_string(),
                reason: e.to_string(),
            }
        })?;
        non_empty(text, filename)
    }
}

/// A document whose extracted text is blank cannot be scored.
fn non_empty(text: String, filename: &str) -> Result<String, ExtractError> {
    if text.trim().is_empty() {
        Err(ExtractError::Empty(filename.to_string()))
    } else {
        Ok(text)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        let err = PdfTextExtractor
            .extract(b"definitely not a pdf", "cv.pdf")
            .unwrap_err();
        match err {
            ExtractError::Unreadable { filename, .. } => assert_eq!(filename, "cv.pdf"),
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocking_extraction_returns_text() {
        let text = extract_blocking(
            Arc::new(plain::PlainTextExtractor),
            Bytes::from_static(b"Rust and SQL"),
            "cv.pdf",
        )
        .await
        .unwrap();
        assert_eq!(text, "Rust and SQL");
    }

    #[tokio::test]
    async fn test_extractor_panic_becomes_unreadable() {
        let err = extract_blocking(
            Arc::new(plain::PanickingExtractor),
            Bytes::from_static(b"%PDF-1.4"),
            "broken.pdf",
        )
        .await
        .unwrap_err();
        match err {
            ExtractError::Unreadable { filename, reason } => {
                assert_eq!(filename, "broken.pdf");
                assert!(reason.contains("text extraction task failed"));
            }
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_text_is_empty_error() {
        assert!(matches!(
            non_empty("  \n\t ".to_string(), "blank.pdf"),
            Err(ExtractError::Empty(name)) if name == "blank.pdf"
        ));
        assert_eq!(non_empty("Rust".to_string(), "x.pdf").unwrap(), "Rust");
    }
}
