//! Single-slot image attachment with preview lifecycle.
//!
//! The slot holds at most one image. Every attach writes a preview file to
//! the system temp directory (the blob-URL counterpart); replacing or
//! clearing the attachment deletes the previous preview before the new one
//! exists, so at most one preview file is ever outstanding per slot.

use std::path::{Path, PathBuf};

use crate::capture::CameraSession;
use crate::{CapturedImage, ImageKind, MediaError};

/// The one image attached to a report draft, plus its preview handle.
#[derive(Debug)]
pub struct Attachment {
    image: CapturedImage,
    preview: PreviewHandle,
}

impl Attachment {
    /// The attached image.
    #[must_use]
    pub const fn image(&self) -> &CapturedImage {
        &self.image
    }

    /// Path of the preview file.
    #[must_use]
    pub fn preview_path(&self) -> &Path {
        &self.preview.path
    }
}

/// Owns a preview file on disk; deletes it when dropped.
#[derive(Debug)]
struct PreviewHandle {
    path: PathBuf,
}

impl PreviewHandle {
    fn write(image: &CapturedImage) -> Result<Self, MediaError> {
        let path = std::env::temp_dir().join(format!(
            "samadhan-preview-{}.{}",
            uuid::Uuid::new_v4(),
            image.kind.extension()
        ));
        std::fs::write(&path, &image.bytes)?;
        Ok(Self { path })
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to remove preview {}: {e}", self.path.display());
            }
        }
    }
}

/// The report form's single image slot.
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    current: Option<Attachment>,
}

impl AttachmentSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an image from a picked file, replacing any prior attachment.
    ///
    /// The file must decode as a JPEG or PNG image.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] if the file cannot be read, is not a
    /// supported image, or the preview cannot be written. The slot keeps
    /// its previous attachment on validation failure.
    pub fn attach_file(&mut self, path: &Path) -> Result<(), MediaError> {
        let bytes = std::fs::read(path)?;
        let kind = validate_image(&bytes)?;

        let file_name = path
            .file_name()
            .map_or_else(|| format!("evidence.{}", kind.extension()), |n| {
                n.to_string_lossy().into_owned()
            });

        self.attach(CapturedImage {
            bytes,
            kind,
            file_name,
        })
    }

    /// Captures a camera snapshot and attaches it, replacing any prior
    /// attachment.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError`] if the capture fails or the preview cannot
    /// be written. The slot keeps its previous attachment on failure.
    pub async fn attach_snapshot(&mut self, camera: &mut CameraSession) -> Result<(), MediaError> {
        let image = camera.snapshot().await?;
        self.attach(image)
    }

    /// Attaches an already-validated image, replacing any prior attachment.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] if the preview file cannot be written.
    pub fn attach(&mut self, image: CapturedImage) -> Result<(), MediaError> {
        // Release the old preview before creating the new one.
        self.current = None;
        let preview = PreviewHandle::write(&image)?;
        self.current = Some(Attachment { image, preview });
        Ok(())
    }

    /// Clears the slot, releasing the preview resource.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The current attachment, if any.
    #[must_use]
    pub const fn attachment(&self) -> Option<&Attachment> {
        self.current.as_ref()
    }

    /// The attached image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&CapturedImage> {
        self.current.as_ref().map(Attachment::image)
    }
}

/// Validates picked-file bytes as a supported, decodable image.
fn validate_image(bytes: &[u8]) -> Result<ImageKind, MediaError> {
    let format = image::guess_format(bytes).map_err(|e| MediaError::InvalidImage {
        message: format!("unrecognized image data: {e}"),
    })?;

    let kind = match format {
        image::ImageFormat::Jpeg => ImageKind::Jpeg,
        image::ImageFormat::Png => ImageKind::Png,
        other => {
            return Err(MediaError::InvalidImage {
                message: format!("unsupported image format {other:?}"),
            });
        }
    };

    // A recognizable signature is not enough; make sure it decodes.
    image::load_from_memory(bytes).map_err(|e| MediaError::InvalidImage {
        message: format!("image failed to decode: {e}"),
    })?;

    Ok(kind)
}
