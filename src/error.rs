use thiserror::Error;

/// Every failure the user can see. All of them are recoverable: they end up in
/// a toast and an inline message, never in a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Unsupported format ({}). Supported: PNG, JPG, JPEG, WEBP.", display_mime(.mime_type))]
    InvalidFormat { mime_type: String },

    #[error("File too large ({:.1} MB). Max: {} MB.", megabytes(.size_bytes), megabytes(.max_bytes))]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("Could not read file: {0}")]
    ReadFailed(String),

    #[error("Error during analysis. Please try again.")]
    AnalysisFailed(String),

    #[error("Could not save report: {0}")]
    ExportFailed(String),
}

pub fn display_mime(mime_type: &str) -> &str {
    if mime_type.is_empty() {
        "unknown"
    } else {
        mime_type
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn megabytes(bytes: &u64) -> f64 {
    bytes_to_mb(*bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_message() {
        let err = AppError::InvalidFormat {
            mime_type: "".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported format (unknown). Supported: PNG, JPG, JPEG, WEBP."
        );

        let err = AppError::InvalidFormat {
            mime_type: "image/gif".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported format (image/gif). Supported: PNG, JPG, JPEG, WEBP."
        );
    }

    #[test]
    fn test_file_too_large_message() {
        let err = AppError::FileTooLarge {
            size_bytes: 9 * 1024 * 1024 + 512 * 1024,
            max_bytes: 8 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "File too large (9.5 MB). Max: 8 MB.");
    }

    #[test]
    fn test_analysis_failed_is_generic() {
        let err = AppError::AnalysisFailed("socket closed".to_string());
        assert_eq!(err.to_string(), "Error during analysis. Please try again.");
    }
}
