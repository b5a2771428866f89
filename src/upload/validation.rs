use crate::config::Config;
use crate::error::AppError;
use crate::upload::file_input::FileInput;

/// Cheap checks done before any file is read.
pub fn validate(config: &Config, input: &FileInput) -> Result<(), AppError> {
    if !config
        .allowed_mime_types
        .iter()
        .any(|allowed| allowed == &input.mime_type)
    {
        return Err(AppError::InvalidFormat {
            mime_type: input.mime_type.clone(),
        });
    }

    if input.size > config.max_upload_size_bytes {
        return Err(AppError::FileTooLarge {
            size_bytes: input.size,
            max_bytes: config.max_upload_size_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::file_input::FileContent;
    use std::path::PathBuf;

    fn input(mime_type: &str, size: u64) -> FileInput {
        FileInput {
            name: "scan".to_string(),
            mime_type: mime_type.to_string(),
            size,
            content: FileContent::Path(PathBuf::from("scan")),
        }
    }

    #[test]
    fn test_accepts_allowed_types() {
        let config = Config::default();
        for mime in ["image/png", "image/jpeg", "image/jpg", "image/webp"] {
            assert_eq!(validate(&config, &input(mime, 1024)), Ok(()));
        }
    }

    #[test]
    fn test_rejects_other_types() {
        let config = Config::default();
        for mime in ["image/gif", "image/bmp", "application/pdf", "", "IMAGE/PNG"] {
            assert_eq!(
                validate(&config, &input(mime, 1024)),
                Err(AppError::InvalidFormat {
                    mime_type: mime.to_string()
                })
            );
        }
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let config = Config::default();
        let max = config.max_upload_size_bytes;

        assert_eq!(validate(&config, &input("image/png", max)), Ok(()));
        assert_eq!(
            validate(&config, &input("image/png", max + 1)),
            Err(AppError::FileTooLarge {
                size_bytes: max + 1,
                max_bytes: max
            })
        );
    }

    #[test]
    fn test_format_is_checked_before_size() {
        let config = Config::default();
        let result = validate(&config, &input("image/gif", u64::MAX));
        assert!(matches!(result, Err(AppError::InvalidFormat { .. })));
    }
}
