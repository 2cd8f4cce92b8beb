use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageReader;

/// Natural pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Image load timed out after {0:?}")]
    Timeout(Duration),
    #[error("Image request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Image request returned {0}")]
    Status(reqwest::StatusCode),
    #[error("Unreadable image data: {0}")]
    Io(#[from] std::io::Error),
    #[error("Undecodable image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Loads an image far enough to learn its dimensions.
///
/// Implementations must give up once `timeout` has elapsed.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ImageDimensions, ProbeError>;
}

/// Probes images over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct HttpImageProbe {
    client: reqwest::Client,
}

impl HttpImageProbe {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ImageDimensions, ProbeError> {
        let load = async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ProbeError::Status(status));
            }
            let bytes = response.bytes().await?;
            dimensions(&bytes)
        };
        tokio::time::timeout(timeout, load)
            .await
            .map_err(|_| ProbeError::Timeout(timeout))?
    }
}

/// Reads pixel dimensions from encoded image bytes without decoding pixels.
pub fn dimensions(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(ImageDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn reads_png_dimensions() {
        let dims = dimensions(&encoded_png(320, 180)).unwrap();
        assert_eq!(
            dims,
            ImageDimensions {
                width: 320,
                height: 180
            }
        );
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = dimensions(b"<html>not found</html>").unwrap_err();
        assert!(matches!(err, ProbeError::Decode(_)));
    }
}
