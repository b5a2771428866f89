use crate::error::AppError;
use crate::upload::file_input::FileInput;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const PREVIEW_MAX_SIDE: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FileMeta {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// `image/png • 500.0 KB • 2000×1500`. The dimensions are left out when
    /// the image could not be decoded.
    pub fn summary(&self) -> String {
        let mut summary = format!("{} • {}", self.mime_type, format_bytes(self.size));
        if let Some((width, height)) = self.dimensions() {
            summary.push_str(&format!(" • {}×{}", width, height));
        }
        summary
    }
}

/// Decoded RGBA pixels, downscaled for display.
#[derive(Clone, PartialEq, Eq)]
pub struct Preview {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl fmt::Debug for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Preview({}×{})", self.width, self.height)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub meta: FileMeta,
    pub bytes: Arc<[u8]>,
    pub preview: Option<Preview>,
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("meta", &self.meta)
            .field("bytes", &format!("<{} bytes>", self.bytes.len()))
            .field("preview", &self.preview)
            .finish()
    }
}

/// Reads the file (if needed) and decodes it. A file that cannot be decoded is
/// still accepted, only without dimensions and preview.
pub fn load_image(input: &FileInput) -> Result<UploadedImage, AppError> {
    let bytes = input.read_bytes()?;
    let decoded = decode(&bytes);

    let meta = FileMeta {
        name: input.name.clone(),
        mime_type: input.mime_type.clone(),
        size: input.size,
        width: decoded.as_ref().map(|(width, _, _)| *width),
        height: decoded.as_ref().map(|(_, height, _)| *height),
    };

    Ok(UploadedImage {
        meta,
        bytes,
        preview: decoded.map(|(_, _, preview)| preview),
    })
}

fn decode(bytes: &[u8]) -> Option<(u32, u32, Preview)> {
    let image = image::load_from_memory(bytes).ok()?;
    let (width, height) = (image.width(), image.height());

    let thumbnail = if width > PREVIEW_MAX_SIDE || height > PREVIEW_MAX_SIDE {
        image.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE)
    } else {
        image
    };
    let rgba = thumbnail.to_rgba8();

    let preview = Preview {
        width: rgba.width(),
        height: rgba.height(),
        rgba: Arc::from(rgba.into_raw()),
    };

    Some((width, height, preview))
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    if unit == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(512_000), "500.0 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
        assert_eq!(format_bytes(8 * 1024 * 1024), "8.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(format_bytes(2048 * 1024 * 1024 * 1024), "2048.0 GB");
    }

    #[test]
    fn test_summary() {
        let meta = FileMeta {
            name: "chest.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 512_000,
            width: Some(2000),
            height: Some(1500),
        };
        assert_eq!(meta.summary(), "image/png • 500.0 KB • 2000×1500");

        let meta = FileMeta {
            width: None,
            height: None,
            ..meta
        };
        assert_eq!(meta.summary(), "image/png • 500.0 KB");
    }

    #[test]
    fn test_load_image_probes_dimensions() {
        let bytes = png(40, 30);
        let input = FileInput::from_bytes("chest.png", "image/png", Arc::from(bytes));

        let image = load_image(&input).unwrap();

        assert_eq!(image.meta.dimensions(), Some((40, 30)));
        let preview = image.preview.unwrap();
        assert_eq!((preview.width, preview.height), (40, 30));
        assert_eq!(preview.rgba.len(), 40 * 30 * 4);
    }

    #[test]
    fn test_large_image_preview_is_downscaled() {
        let bytes = png(2000, 1500);
        let input = FileInput::from_bytes("chest.png", "image/png", Arc::from(bytes));

        let image = load_image(&input).unwrap();

        assert_eq!(image.meta.dimensions(), Some((2000, 1500)));
        let preview = image.preview.unwrap();
        assert!(preview.width <= PREVIEW_MAX_SIDE && preview.height <= PREVIEW_MAX_SIDE);
    }

    #[test]
    fn test_undecodable_image_has_no_dimensions() {
        let input = FileInput::from_bytes("broken.png", "image/png", Arc::from(vec![0u8; 64]));

        let image = load_image(&input).unwrap();

        assert_eq!(image.meta.width, None);
        assert_eq!(image.meta.height, None);
        assert!(image.preview.is_none());
        assert_eq!(image.meta.size, 64);
    }

    #[test]
    fn test_meta_serializes_type_field() {
        let meta = FileMeta {
            name: "a.png".to_string(),
            mime_type: "image/png".to_string(),
            size: 1,
            width: None,
            height: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["type"], "image/png");
        assert!(json["width"].is_null());
    }
}
