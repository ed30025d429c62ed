//! Image resolution: turning a source reference into decoded pixels.
//!
//! The engine only sees the [`ImageResolver`] trait. Two implementations ship
//! with the crate: [`FileImageResolver`] for `data:` URIs and local files, and
//! [`MemoryImageResolver`] for callers that already hold decoded images.

use std::collections::HashMap;
use std::future::Future;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;

use crate::error::ResourceError;
use crate::model::PhysicalImage;

/// Fetches and decodes the image behind a source reference.
///
/// Resolution may suspend (a network fetch, a slow disk). The engine awaits
/// each call before laying out anything after it, so at most one resolution
/// is ever in flight.
pub trait ImageResolver {
    fn resolve(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Arc<PhysicalImage>, ResourceError>>;
}

/// Decode PNG or JPEG bytes into RGBA8.
pub fn decode_image_bytes(data: &[u8]) -> Result<PhysicalImage, ResourceError> {
    let reader = image::ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let decoded = reader
        .decode()
        .map_err(|e| ResourceError::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width_px, height_px) = (rgba.width(), rgba.height());
    if width_px == 0 || height_px == 0 {
        return Err(ResourceError::Decode("image has no pixels".into()));
    }
    Ok(PhysicalImage {
        width_px,
        height_px,
        rgba: rgba.into_raw(),
    })
}

/// Decode inline image data: a `data:image/...;base64,` URI or bare base64.
pub fn decode_image_data(data: &str) -> Result<PhysicalImage, ResourceError> {
    let payload = match data.strip_prefix("data:") {
        Some(uri) => {
            let (header, body) = uri
                .split_once(',')
                .ok_or_else(|| ResourceError::Decode("data URI has no comma".into()))?;
            if !header.ends_with(";base64") {
                return Err(ResourceError::Unsupported(format!(
                    "data URI without base64 encoding ({header})"
                )));
            }
            body
        }
        None => data,
    };
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
    decode_image_bytes(&bytes)
}

/// Resolves `data:` URIs and paths on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileImageResolver {
    base_dir: PathBuf,
}

impl FileImageResolver {
    /// Relative references resolve against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for FileImageResolver {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ImageResolver for FileImageResolver {
    async fn resolve(&self, reference: &str) -> Result<Arc<PhysicalImage>, ResourceError> {
        if reference.starts_with("data:") {
            return decode_image_data(reference).map(Arc::new);
        }
        if let Some((scheme, _)) = reference.split_once("://") {
            return Err(ResourceError::Unsupported(format!("{scheme}:// reference {reference}")));
        }
        let path = self.path_for(reference);
        let bytes = std::fs::read(&path).map_err(|e| {
            ResourceError::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let image = decode_image_bytes(&bytes)?;
        log::debug!(
            "Resolved {} ({}x{} px)",
            path.display(),
            image.width_px,
            image.height_px
        );
        Ok(Arc::new(image))
    }
}

/// Serves pre-decoded images by reference. Unknown references fail.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageResolver {
    images: HashMap<String, Arc<PhysicalImage>>,
}

impl MemoryImageResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, image: PhysicalImage) {
        self.images.insert(reference.into(), Arc::new(image));
    }

    pub fn with(mut self, reference: impl Into<String>, image: PhysicalImage) -> Self {
        self.insert(reference, image);
        self
    }
}

impl ImageResolver for MemoryImageResolver {
    async fn resolve(&self, reference: &str) -> Result<Arc<PhysicalImage>, ResourceError> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| ResourceError::Unsupported(format!("unknown image {reference}")))
    }
}
