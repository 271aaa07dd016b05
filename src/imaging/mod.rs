//! Compositing and rasterization in pure Rust, on top of the `image` crate.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Background** | [`Recipe::color_at`](crate::background::Recipe::color_at), rows in parallel (rayon) |
//! | **Fit + resample** | `DynamicImage::resize_exact` with `Lanczos3` |
//! | **Clip** | analytic rounded-rect coverage ([`mask`]) |
//! | **Shadow** | three-pass box blur of the silhouette ([`shadow`]) |
//! | **Fingerprint** | SHA-256 of the raw pixels (`sha2`) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for placement math (unit testable)
//! - **Mask**: Corner-curve coverage for standard and smooth corners
//! - **Shadow**: Blurred alpha plane
//! - **Render**: [`Renderer`] combining the above into a bitmap

mod calculations;
pub mod mask;
pub mod render;
pub mod shadow;

pub use calculations::{calculate_fit_dimensions, effective_corner_radius};
pub use mask::RoundedRect;
pub use render::{PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH, Renderer, fingerprint};
