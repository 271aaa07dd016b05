//! Shared test utilities for the shotframe test suite.
//!
//! Builders for synthetic source images and composition states, so tests
//! never depend on fixture files.

use crate::composition::CompositionState;
use crate::config::CompositionProfile;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;

/// An opaque single-color source image.
pub fn solid_source(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([rgb[0], rgb[1], rgb[2], 255]),
    ))
}

/// A fully transparent source image.
pub fn transparent_source(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
}

/// PNG-encoded bytes of a small gradient image, as a picker would return.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Default state with no image.
pub fn empty_state() -> CompositionState {
    CompositionState::new(&CompositionProfile::default())
}

/// Default state holding `img`.
pub fn state_with_image(img: DynamicImage) -> CompositionState {
    CompositionState {
        source_image: Some(Arc::new(img)),
        ..empty_state()
    }
}
