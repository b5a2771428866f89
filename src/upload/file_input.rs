use crate::error::AppError;
use image::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, PartialEq, Eq)]
pub enum FileContent {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file offered by the user, before any validation. Only the cheap facts
/// (name, MIME type, size) are known at this point; the bytes of a path are
/// read later, off the UI thread.
#[derive(Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: FileContent,
}

impl FileInput {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let metadata =
            std::fs::metadata(path).map_err(|e| AppError::ReadFailed(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_type: mime_from_name(&name),
            name,
            size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// `mime_type` is whatever the windowing layer reported, which is often
    /// empty on native platforms. The file name is used as a fallback.
    pub fn from_bytes(name: &str, mime_type: &str, bytes: Arc<[u8]>) -> Self {
        let mime_type = if mime_type.is_empty() {
            mime_from_name(name)
        } else {
            mime_type.to_string()
        };

        Self {
            name: name.to_string(),
            mime_type,
            size: bytes.len() as u64,
            content: FileContent::Bytes(bytes),
        }
    }

    pub fn read_bytes(&self) -> Result<Arc<[u8]>, AppError> {
        match &self.content {
            FileContent::Bytes(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => std::fs::read(path)
                .map(Arc::from)
                .map_err(|e| AppError::ReadFailed(e.to_string())),
        }
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let content = match &self.content {
            FileContent::Path(path) => path.display().to_string(),
            FileContent::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        };
        f.debug_struct("FileInput")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .field("content", &content)
            .finish()
    }
}

/// MIME type guessed from the extension, empty when unknown.
pub fn mime_from_name(name: &str) -> String {
    ImageFormat::from_path(name)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_name() {
        assert_eq!(mime_from_name("scan.png"), "image/png");
        assert_eq!(mime_from_name("scan.JPG"), "image/jpeg");
        assert_eq!(mime_from_name("scan.webp"), "image/webp");
        assert_eq!(mime_from_name("notes.txt"), "");
        assert_eq!(mime_from_name("no_extension"), "");
    }

    #[test]
    fn test_from_bytes_prefers_reported_mime() {
        let input = FileInput::from_bytes("scan.bin", "image/png", Arc::from(vec![0u8; 10]));
        assert_eq!(input.mime_type, "image/png");
        assert_eq!(input.size, 10);

        let input = FileInput::from_bytes("scan.jpeg", "", Arc::from(vec![0u8; 4]));
        assert_eq!(input.mime_type, "image/jpeg");
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let path = std::env::temp_dir().join(format!("mvl-input-{}.png", std::process::id()));
        std::fs::write(&path, [1u8, 2, 3, 4, 5]).unwrap();

        let input = FileInput::from_path(&path).unwrap();
        assert_eq!(input.mime_type, "image/png");
        assert_eq!(input.size, 5);
        assert_eq!(&*input.read_bytes().unwrap(), &[1u8, 2, 3, 4, 5]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_path_is_read_failure() {
        let result = FileInput::from_path(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(AppError::ReadFailed(_))));
    }
}
