//! Export: render at the export size and hand the bitmap to the photo library.
//!
//! The export never retries and never mutates the composition state. A
//! library failure is an ordinary outcome (`succeeded: false`), not an error;
//! the only errors are contract violations by the caller.

use crate::composition::{CompositionState, LayoutError};
use crate::config::StudioConfig;
use crate::imaging::Renderer;
use crate::library::PhotoLibrary;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// The export control must be disabled while no image is selected.
    #[error("export requested without a source image")]
    MissingSourceImage,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Outcome of one export, consumed once by whoever presents the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportResult {
    pub succeeded: bool,
}

impl ExportResult {
    pub fn title(&self) -> &'static str {
        if self.succeeded {
            "Image Saved!"
        } else {
            "Save Failed"
        }
    }

    pub fn message(&self) -> &'static str {
        if self.succeeded {
            "Your image has been saved to Photos successfully!"
        } else {
            "Failed to save image to Photos. Please check permissions."
        }
    }
}

/// Render `state` at `export.canvas_size` and save it to `library`.
///
/// Writes exactly one bitmap per call.
pub async fn export_and_save<L: PhotoLibrary>(
    state: &CompositionState,
    config: &StudioConfig,
    library: &L,
) -> Result<ExportResult, ExportError> {
    if !state.has_source_image() {
        return Err(ExportError::MissingSourceImage);
    }

    let size = config.export.canvas_size;
    let bitmap = Renderer::from_config(config).render(size, state)?;
    log::debug!("export rendered at {size}x{size}");

    let succeeded = library.save(bitmap).await;
    if !succeeded {
        log::warn!("export was not saved");
    }
    Ok(ExportResult { succeeded })
}
