use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, ImageReader};
use uuid::Uuid;

use crate::error::AppError;

pub const MAX_IMAGE_SIZE: usize = 2 * 1024 * 1024;

/// Formats accepted for uploaded images, checked against the file's
/// actual magic bytes rather than its claimed name.
pub const ALLOWED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

fn extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Jpeg => "jpg",
        ImageFormat::WebP => "webp",
        other => other.extensions_str().first().copied().unwrap_or("bin"),
    }
}

/// Detect the image format from content bytes and check it against the
/// allow-list. The error string is a user-facing validation message.
pub fn sniff_image(data: &[u8]) -> Result<ImageFormat, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|_| "Could not read uploaded file".to_string())?;

    let format = reader
        .format()
        .ok_or_else(|| "Unaccepted file type".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err("Unaccepted file type. Allowed: PNG, JPEG, WEBP".to_string());
    }

    Ok(format)
}

/// Write a validated upload into the upload directory under a fresh
/// name. Callers sniff first; nothing is ever written for a rejected
/// file, so there is no temp file to clean up on validation failure.
pub async fn store_image(data: &[u8], format: ImageFormat, dir: &str) -> Result<String, AppError> {
    let filename = format!("{}.{}", Uuid::new_v4(), extension(format));
    tokio::fs::write(Path::new(dir).join(&filename), data).await?;
    Ok(filename)
}

/// Delete a stored image, awaited so responses only go out once the
/// file is actually gone. A missing file is fine; anything else is
/// logged and swallowed, since the record change already succeeded.
pub async fn remove_image(dir: &str, filename: &str) {
    let path: PathBuf = Path::new(dir).join(filename);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("failed to delete upload {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
    const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";
    const WEBP_MAGIC: &[u8] = b"RIFF\x24\x00\x00\x00WEBPVP8 ";

    #[test]
    fn accepts_allowed_formats() {
        assert_eq!(sniff_image(PNG_MAGIC), Ok(ImageFormat::Png));
        assert_eq!(sniff_image(JPEG_MAGIC), Ok(ImageFormat::Jpeg));
        assert_eq!(sniff_image(WEBP_MAGIC), Ok(ImageFormat::WebP));
    }

    #[test]
    fn rejects_disguised_text_file() {
        // Content sniffing ignores the claimed .png name entirely
        assert!(sniff_image(b"definitely not an image").is_err());
    }

    #[test]
    fn rejects_formats_outside_the_allow_list() {
        assert!(sniff_image(b"GIF89a\x01\x00\x01\x00").is_err());
    }

    #[tokio::test]
    async fn store_and_remove_round_trip() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let dir = dir.to_str().unwrap().to_string();

        let filename = store_image(PNG_MAGIC, ImageFormat::Png, &dir).await.unwrap();
        assert!(filename.ends_with(".png"));
        let path = Path::new(&dir).join(&filename);
        assert!(path.exists());

        remove_image(&dir, &filename).await;
        assert!(!path.exists());

        // Removing again is a no-op
        remove_image(&dir, &filename).await;
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
