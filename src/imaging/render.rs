//! Rasterize a composition onto a square canvas.
//!
//! The same [`Renderer::render`] call serves the interactive preview and the
//! 2000px export; only the canvas side differs. Every size-dependent
//! quantity (frame, corner radius, shadow sigma and offset) comes from
//! [`compute_layout`] or the shadow fractions, so both targets are
//! proportionally identical.
//!
//! ## Layer order
//!
//! ```text
//! 1. background recipe        (gradient or flat fill, every pixel)
//! 2. drop shadow              (blurred silhouette, black at `shadow.opacity`)
//! 3. source image             (aspect-fit, Lanczos3, rounded-rect clipped)
//! ```
//!
//! Without a source image, step 2–3 are replaced by a fixed-size
//! placeholder box centred on the canvas.
//!
//! The output is an [`RgbImage`]: opaque by construction.

use super::calculations::{
    calculate_fit_dimensions, centered_offset, effective_corner_radius, shadow_sigma,
};
use super::mask::{RoundedRect, plus_coverage};
use super::shadow::AlphaPlane;
use crate::composition::{CompositionState, CornerStyle, LayoutError, compute_layout};
use crate::config::{CompositionProfile, MAX_CANVAS_SIZE, ShadowConfig, StudioConfig};
use image::imageops::FilterType;
use image::{RgbImage, RgbaImage};
use rayon::prelude::*;
use sha2::{Digest, Sha256};

/// Placeholder box width in pixels, independent of the canvas.
pub const PLACEHOLDER_WIDTH: u32 = 96;
/// Placeholder box height in pixels, independent of the canvas.
pub const PLACEHOLDER_HEIGHT: u32 = 72;
const PLACEHOLDER_RADIUS: f64 = 12.0;
const PLACEHOLDER_FILL_ALPHA: f32 = 0.25;
const PLACEHOLDER_GLYPH_ALPHA: f32 = 0.7;
const PLACEHOLDER_GLYPH_SIZE: f64 = 28.0;
const PLACEHOLDER_GLYPH_STROKE: f64 = 5.0;

/// Pure renderer configured with a composition profile and shadow settings.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    profile: CompositionProfile,
    shadow: ShadowConfig,
}

impl Renderer {
    pub fn new(profile: CompositionProfile, shadow: ShadowConfig) -> Self {
        Self { profile, shadow }
    }

    pub fn from_config(config: &StudioConfig) -> Self {
        Self::new(config.composition.clone(), config.shadow.clone())
    }

    pub fn profile(&self) -> &CompositionProfile {
        &self.profile
    }

    /// Render `state` onto a `canvas_size × canvas_size` bitmap.
    pub fn render(
        &self,
        canvas_size: u32,
        state: &CompositionState,
    ) -> Result<RgbImage, LayoutError> {
        if !(1..=MAX_CANVAS_SIZE).contains(&canvas_size) {
            return Err(LayoutError::InvalidArgument(format!(
                "canvas size must be within 1-{MAX_CANVAS_SIZE}, got {canvas_size}"
            )));
        }

        let mut canvas = fill_background(canvas_size, state);

        match &state.source_image {
            Some(source) => {
                let layout = compute_layout(canvas_size as f64, state, &self.profile)?;
                let (w, h) = calculate_fit_dimensions(
                    (source.width(), source.height()),
                    (layout.frame_width, layout.frame_height),
                );
                let placed = source.resize_exact(w, h, FilterType::Lanczos3).to_rgba8();
                let radius = effective_corner_radius(layout.corner_radius_px, w, h);
                let clip = RoundedRect::new(w as f64, h as f64, radius, layout.corner_style);
                let x0 = centered_offset(canvas_size, w);
                let y0 = centered_offset(canvas_size, h);

                log::debug!(
                    "render {canvas_size}px: image {w}x{h} at ({x0}, {y0}), radius {radius:.2} ({})",
                    layout.corner_style.label()
                );

                self.draw_shadow(&mut canvas, &placed, &clip, x0, y0);
                draw_clipped(&mut canvas, &placed, &clip, x0, y0);
            }
            None => draw_placeholder(&mut canvas),
        }

        Ok(canvas)
    }

    fn draw_shadow(
        &self,
        canvas: &mut RgbImage,
        placed: &RgbaImage,
        clip: &RoundedRect,
        x0: i64,
        y0: i64,
    ) {
        let opacity = self.shadow.opacity as f32;
        if opacity <= 0.0 {
            return;
        }
        let side = canvas.width();
        let sigma = shadow_sigma(side, self.shadow.blur_fraction);
        let offset = (side as f64 * self.shadow.offset_fraction).round() as i64;
        let pad = (3.0 * sigma).ceil() as usize;

        let (w, h) = (placed.width() as usize, placed.height() as usize);
        let mut silhouette = AlphaPlane::new(w + 2 * pad, h + 2 * pad);
        for y in 0..h {
            for x in 0..w {
                let coverage = clip.coverage(x as f64 + 0.5, y as f64 + 0.5);
                let alpha = placed.get_pixel(x as u32, y as u32)[3] as f32 / 255.0;
                silhouette.set(x + pad, y + pad, coverage * alpha);
            }
        }
        let blurred = silhouette.blur(sigma);

        let origin_x = x0 - pad as i64;
        let origin_y = y0 - pad as i64 + offset;
        let row_len = side as usize * 3;
        canvas
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(cy, row)| {
                let by = cy as i64 - origin_y;
                if by < 0 || by >= blurred.height as i64 {
                    return;
                }
                for cx in 0..side as i64 {
                    let bx = cx - origin_x;
                    if bx < 0 || bx >= blurred.width as i64 {
                        continue;
                    }
                    let a = blurred.get(bx as usize, by as usize) * opacity;
                    if a <= 0.0 {
                        continue;
                    }
                    let i = cx as usize * 3;
                    for c in &mut row[i..i + 3] {
                        *c = blend(*c, 0, a);
                    }
                }
            });
    }
}

/// Fill the canvas with the background recipe, one row per rayon task.
fn fill_background(side: u32, state: &CompositionState) -> RgbImage {
    let mut canvas = RgbImage::new(side, side);
    let recipe = state.background.recipe;
    canvas
        .par_chunks_mut(side as usize * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(3).enumerate() {
                px.copy_from_slice(&recipe.color_at(x as u32, y as u32, side).0);
            }
        });
    canvas
}

/// Composite `placed` at `(x0, y0)`, clipped by `clip` and its own alpha.
fn draw_clipped(canvas: &mut RgbImage, placed: &RgbaImage, clip: &RoundedRect, x0: i64, y0: i64) {
    let side = canvas.width() as i64;
    let row_len = side as usize * 3;
    let (w, h) = (placed.width() as i64, placed.height() as i64);
    canvas
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(cy, row)| {
            let py = cy as i64 - y0;
            if py < 0 || py >= h {
                return;
            }
            for px in 0..w {
                let cx = x0 + px;
                if cx < 0 || cx >= side {
                    continue;
                }
                let src = placed.get_pixel(px as u32, py as u32);
                let coverage = clip.coverage(px as f64 + 0.5, py as f64 + 0.5);
                let a = coverage * src[3] as f32 / 255.0;
                if a <= 0.0 {
                    continue;
                }
                let i = cx as usize * 3;
                for (c, s) in row[i..i + 3].iter_mut().zip(&src.0[..3]) {
                    *c = blend(*c, *s, a);
                }
            }
        });
}

/// Translucent rounded box with a plus glyph, fixed size, centred.
fn draw_placeholder(canvas: &mut RgbImage) {
    let side = canvas.width();
    let x0 = centered_offset(side, PLACEHOLDER_WIDTH);
    let y0 = centered_offset(side, PLACEHOLDER_HEIGHT);
    let box_shape = RoundedRect::new(
        PLACEHOLDER_WIDTH as f64,
        PLACEHOLDER_HEIGHT as f64,
        PLACEHOLDER_RADIUS,
        CornerStyle::Standard,
    );
    let (gx, gy) = (
        PLACEHOLDER_WIDTH as f64 / 2.0,
        PLACEHOLDER_HEIGHT as f64 / 2.0,
    );

    for py in 0..PLACEHOLDER_HEIGHT as i64 {
        for px in 0..PLACEHOLDER_WIDTH as i64 {
            let (cx, cy) = (x0 + px, y0 + py);
            if cx < 0 || cy < 0 || cx >= side as i64 || cy >= side as i64 {
                continue;
            }
            let (lx, ly) = (px as f64 + 0.5, py as f64 + 0.5);
            let fill = box_shape.coverage(lx, ly) * PLACEHOLDER_FILL_ALPHA;
            let glyph = plus_coverage(
                lx,
                ly,
                gx,
                gy,
                PLACEHOLDER_GLYPH_SIZE,
                PLACEHOLDER_GLYPH_STROKE,
            ) * PLACEHOLDER_GLYPH_ALPHA;
            let a = fill.max(glyph);
            if a <= 0.0 {
                continue;
            }
            let pixel = canvas.get_pixel_mut(cx as u32, cy as u32);
            for c in pixel.0.iter_mut() {
                *c = blend(*c, 255, a);
            }
        }
    }
}

#[inline]
fn blend(dst: u8, src: u8, alpha: f32) -> u8 {
    let a = alpha.clamp(0.0, 1.0);
    (dst as f32 * (1.0 - a) + src as f32 * a).round() as u8
}

/// SHA-256 over the bitmap dimensions and pixels, as a hex string.
///
/// Two renders of the same state at the same size have equal fingerprints.
pub fn fingerprint(bitmap: &RgbImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bitmap.width().to_le_bytes());
    hasher.update(bitmap.height().to_le_bytes());
    hasher.update(bitmap.as_raw());
    format!("{:x}", hasher.finalize())
}
