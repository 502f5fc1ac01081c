//! Camera snapshot pipeline.
//!
//! The live camera is abstracted behind [`FrameSource`]: something that can
//! produce one raw RGB frame on demand and be released. A snapshot grabs
//! the current frame, encodes it to JPEG at the portal's quality setting,
//! and releases the source — on failure too, so a denied camera never
//! leaves a dangling acquisition.

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;

use crate::{CapturedImage, ImageKind, MediaError};

/// JPEG quality for camera snapshots, matching the portal's 0.85.
pub const SNAPSHOT_JPEG_QUALITY: u8 = 85;

/// One raw video frame, tightly packed RGB8.
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes of RGB data.
    pub rgb: Vec<u8>,
}

/// A live camera stream that can be sampled and released.
#[async_trait]
pub trait FrameSource: Send {
    /// Grabs the current frame.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Capture`] if access is denied or no frame is
    /// available.
    async fn grab(&mut self) -> Result<RawFrame, MediaError>;

    /// Releases the underlying stream. Must be idempotent.
    fn release(&mut self);
}

/// Exclusive owner of the single active camera stream.
///
/// Only one session may hold the device camera; acquiring a new source
/// releases any prior one first.
#[derive(Default)]
pub struct CameraSession {
    source: Option<Box<dyn FrameSource>>,
}

impl CameraSession {
    /// Creates an empty session holding no stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `source`, releasing any previously held stream.
    pub fn acquire(&mut self, source: Box<dyn FrameSource>) {
        self.release();
        self.source = Some(source);
    }

    /// Whether a stream is currently held.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Captures one frame as a JPEG and releases the stream.
    ///
    /// The stream is released on every path, including grab and encode
    /// failures.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Capture`] if no stream is held or the grab
    /// fails, and [`MediaError::InvalidImage`] if the frame cannot be
    /// encoded.
    pub async fn snapshot(&mut self) -> Result<CapturedImage, MediaError> {
        let Some(mut source) = self.source.take() else {
            return Err(MediaError::Capture {
                message: "no active camera stream".to_string(),
            });
        };

        let grabbed = source.grab().await;
        source.release();

        encode_jpeg(&grabbed?)
    }

    /// Releases the held stream, if any.
    pub fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// Encodes a raw RGB frame as a JPEG snapshot.
fn encode_jpeg(frame: &RawFrame) -> Result<CapturedImage, MediaError> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.rgb.len() != expected {
        return Err(MediaError::InvalidImage {
            message: format!(
                "frame is {} bytes, expected {expected} for {}x{} RGB",
                frame.rgb.len(),
                frame.width,
                frame.height
            ),
        });
    }

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, SNAPSHOT_JPEG_QUALITY)
        .encode(
            &frame.rgb,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| MediaError::InvalidImage {
            message: format!("JPEG encode failed: {e}"),
        })?;

    Ok(CapturedImage {
        bytes,
        kind: ImageKind::Jpeg,
        file_name: "snapshot.jpg".to_string(),
    })
}
