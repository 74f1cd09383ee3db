use serde::Serialize;
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TXT: &str = "text/plain";

/// The resume formats accepted by both upload surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeKind {
    Pdf,
    Doc,
    Docx,
    Txt,
}

impl ResumeKind {
    /// Matches a MIME type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(ResumeKind::Pdf),
            MIME_DOC => Some(ResumeKind::Doc),
            MIME_DOCX => Some(ResumeKind::Docx),
            MIME_TXT => Some(ResumeKind::Txt),
            _ => None,
        }
    }

    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(ResumeKind::Pdf),
            "doc" => Some(ResumeKind::Doc),
            "docx" => Some(ResumeKind::Docx),
            "txt" => Some(ResumeKind::Txt),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ResumeKind::Pdf => MIME_PDF,
            ResumeKind::Doc => MIME_DOC,
            ResumeKind::Docx => MIME_DOCX,
            ResumeKind::Txt => MIME_TXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("No file provided")]
    MissingFile,

    #[error("Invalid file type: {0}")]
    InvalidType(String),

    #[error("File is empty")]
    Empty,

    #[error("File size exceeds {limit} limit")]
    TooLarge { limit: String },

    #[error("Job description is required")]
    MissingJobDescription,
}

/// Checks a single uploaded file before anything is sent over the network.
///
/// The declared MIME type decides. A missing or generic `application/octet-stream`
/// type falls back to the file extension.
pub fn validate_file(
    filename: Option<&str>,
    content_type: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<ResumeKind, UploadRejection> {
    let filename = filename
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or(UploadRejection::MissingFile)?;

    let declared = content_type.map(str::trim).filter(|t| !t.is_empty());
    let kind = match declared {
        Some(mime) if !mime.eq_ignore_ascii_case("application/octet-stream") => {
            ResumeKind::from_mime(mime)
                .ok_or_else(|| UploadRejection::InvalidType(mime.to_string()))?
        }
        _ => ResumeKind::from_filename(filename).ok_or_else(|| {
            let ext = filename
                .rsplit_once('.')
                .map(|(_, e)| format!(".{e}"))
                .unwrap_or_else(|| "unknown".to_string());
            UploadRejection::InvalidType(ext)
        })?,
    };

    if size == 0 {
        return Err(UploadRejection::Empty);
    }
    if size > max_bytes {
        return Err(UploadRejection::TooLarge {
            limit: human_size(max_bytes),
        });
    }

    Ok(kind)
}

/// Whole mebibytes print as `MB`, anything else as `KB` rounded up.
fn human_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{}KB", bytes.div_ceil(KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_MB: usize = 5 * 1024 * 1024;

    #[test]
    fn test_accepts_each_resume_mime() {
        for (mime, kind) in [
            (MIME_PDF, ResumeKind::Pdf),
            (MIME_DOC, ResumeKind::Doc),
            (MIME_DOCX, ResumeKind::Docx),
            ("text/plain; charset=utf-8", ResumeKind::Txt),
        ] {
            assert_eq!(validate_file(Some("cv"), Some(mime), 10, FIVE_MB), Ok(kind));
        }
    }

    #[test]
    fn test_rejects_image_upload() {
        let result = validate_file(Some("photo.png"), Some("image/png"), 10, FIVE_MB);
        assert_eq!(result, Err(UploadRejection::InvalidType("image/png".to_string())));
    }

    #[test]
    fn test_declared_type_wins_over_extension() {
        // A .pdf name does not rescue a non-resume MIME type.
        let result = validate_file(Some("cv.pdf"), Some("application/zip"), 10, FIVE_MB);
        assert!(matches!(result, Err(UploadRejection::InvalidType(_))));
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        assert_eq!(
            validate_file(Some("CV.DOCX"), Some("application/octet-stream"), 10, FIVE_MB),
            Ok(ResumeKind::Docx)
        );
        assert_eq!(
            validate_file(Some("cv.exe"), None, 10, FIVE_MB),
            Err(UploadRejection::InvalidType(".exe".to_string()))
        );
    }

    #[test]
    fn test_rejects_oversized_file() {
        let result = validate_file(Some("cv.pdf"), Some(MIME_PDF), FIVE_MB + 1, FIVE_MB);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 5MB limit");
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        assert!(validate_file(Some("cv.pdf"), Some(MIME_PDF), FIVE_MB, FIVE_MB).is_ok());
    }

    #[test]
    fn test_rejects_missing_name_and_empty_file() {
        assert_eq!(
            validate_file(None, Some(MIME_PDF), 10, FIVE_MB),
            Err(UploadRejection::MissingFile)
        );
        assert_eq!(
            validate_file(Some("  "), Some(MIME_PDF), 10, FIVE_MB),
            Err(UploadRejection::MissingFile)
        );
        assert_eq!(
            validate_file(Some("cv.txt"), Some(MIME_TXT), 0, FIVE_MB),
            Err(UploadRejection::Empty)
        );
    }

    #[test]
    fn test_limit_under_one_mebibyte_reads_in_kilobytes() {
        let err = validate_file(Some("tiny.pdf"), Some(MIME_PDF), 600_000, 512 * 1024).unwrap_err();
        assert_eq!(err.to_string(), "File size exceeds 512KB limit");
        assert_eq!(human_size(1536 * 1024), "1536KB");
        assert_eq!(human_size(1000), "1KB");
    }
}
