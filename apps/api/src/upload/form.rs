use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// One file part of a multipart upload, read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// The fields an upload request may carry.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub files: Vec<UploadedPart>,
    pub job_description: Option<String>,
}

/// File parts are accepted under `files` or `file`; any other part that carries a
/// filename is treated as a file too. Unknown text fields are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        if name == "job_description" {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?;
            form.job_description = Some(text);
            continue;
        }

        if name == "files" || name == "file" || filename.is_some() {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e.body_text())))?;
            debug!(
                "Received upload part '{name}' ({:?}, {} bytes)",
                filename,
                bytes.len()
            );
            form.files.push(UploadedPart {
                filename,
                content_type,
                bytes,
            });
        }
    }

    Ok(form)
}
