use bytes::Bytes;

use crate::errors::AppError;
use crate::upload::validation::ResumeKind;

/// Extracts the plain text stored with a library resume.
///
/// PDFs go through `pdf-extract` on a blocking thread. Other kinds are decoded as
/// UTF-8, replacing invalid sequences.
pub async fn extract_text(kind: ResumeKind, bytes: Bytes) -> Result<String, AppError> {
    let text = match kind {
        ResumeKind::Pdf => {
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                // pdf-extract can panic on malformed input; treat it like a parse failure
                .map_err(|_| {
                    AppError::Validation("Could not extract text from PDF file".to_string())
                })?
                .map_err(|e| {
                    AppError::Validation(format!("Could not extract text from PDF file: {e}"))
                })?
        }
        ResumeKind::Doc | ResumeKind::Docx | ResumeKind::Txt => {
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from file".to_string(),
        ));
    }
    Ok(text.to_string())
}
