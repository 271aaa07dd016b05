//! # Shotframe
//!
//! Frame a screenshot on a decorative background: pick an image, choose a
//! gradient or flat fill, round the corners, scale the image, preview the
//! result live, and export a 2000×2000 opaque bitmap to a photo library.
//!
//! # Architecture: One Geometry Path, Two Render Targets
//!
//! ```text
//! edit (slider, tap, pick) ─→ CompositionState ─→ render(350)  → preview
//!                                           └──→ render(2000) → PhotoLibrary::save
//! ```
//!
//! The preview and the export share [`composition::compute_layout`]. Frame
//! size and corner radius are both linear in the canvas side, so the export
//! is a proportional enlargement of the preview rather than a re-layout with
//! the same pixel values.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`background`] | Fixed catalog of gradient and solid backgrounds |
//! | [`composition`] | Editing state, corner styles, and the layout function |
//! | [`config`] | `shotframe.toml` loading, validation, and the composition profile |
//! | [`imaging`] | Rasterization: background fill, aspect-fit, rounded clip, shadow |
//! | [`source`] | Image-source collaborator and picker-bytes decoding |
//! | [`library`] | Photo-library collaborator and the directory-backed implementation |
//! | [`export`] | Render at export size and save, once, without retry |
//! | [`session`] | Owner of the state: clamped edits, preview, export bookkeeping |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Constants Live in a Profile
//!
//! Control ranges, the frame factor, the smooth-corner multiplier, and the
//! reference canvas are fields of [`config::CompositionProfile`], not
//! literals. Each historical variant of the screen is a profile, and every
//! geometry property can be tested against any of them.
//!
//! ## Opaque by Type
//!
//! Renders return `image::RgbImage`. There is no alpha channel to leak, so
//! the export cannot have transparent fringes at the canvas edge.
//!
//! ## Failures Are Binary
//!
//! Undecodable picker data is treated as "nothing picked". A failed library
//! write is an [`export::ExportResult`] with `succeeded: false`. Only
//! contract violations (non-positive canvas, export without an image) are
//! typed errors.

pub mod background;
pub mod composition;
pub mod config;
pub mod export;
pub mod imaging;
pub mod library;
pub mod output;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod test_helpers;
