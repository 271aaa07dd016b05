//! Image-source collaborator.
//!
//! The picker hands back raw bytes (or nothing, when the user cancels).
//! Decoding happens here; bytes that are not a decodable image are treated
//! exactly like a cancelled pick.

use image::DynamicImage;
use std::future::Future;
use std::path::PathBuf;

/// Something that can produce the raw bytes of a user-chosen image.
pub trait ImageSource {
    /// `None` when nothing was picked or the bytes could not be obtained.
    fn pick_image(&self) -> impl Future<Output = Option<Vec<u8>>> + Send;
}

/// Reads the image from a fixed path on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileSource {
    fn pick_image(&self) -> impl Future<Output = Option<Vec<u8>>> + Send {
        let path = self.path.clone();
        async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                    None
                }
            }
        }
    }
}

/// Decode picker bytes into a bitmap. Decode failures yield `None`.
pub fn decode_source(bytes: &[u8]) -> Option<DynamicImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("ignoring picked data that is not an image: {e}");
            None
        }
    }
}
