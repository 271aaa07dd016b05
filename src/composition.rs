//! Composition model: editing state and placement geometry.
//!
//! [`compute_layout`] is the single geometry path shared by the preview and
//! the export. Both the frame and the corner radius are linear in the canvas
//! side, so a composition looks proportionally identical at 350px and at
//! 2000px:
//!
//! ```text
//! frame  = canvas * clamp(scale, min_scale, 1) * preview_factor
//! radius = clamp(setting, 0, max_radius) * style_multiplier * canvas / reference_canvas
//! ```
//!
//! `style_multiplier` is `smooth_multiplier` (1.5 by default) for
//! [`CornerStyle::Smooth`] and 1 for [`CornerStyle::Standard`].

use crate::background::{BackgroundSpec, default_background};
use crate::config::CompositionProfile;
use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Rounding curve used to clip the placed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerStyle {
    /// Continuous (superellipse) corners.
    Smooth,
    /// Circular-arc corners.
    #[default]
    Standard,
}

impl CornerStyle {
    pub fn toggled(self) -> Self {
        match self {
            CornerStyle::Smooth => CornerStyle::Standard,
            CornerStyle::Standard => CornerStyle::Smooth,
        }
    }

    /// Radius multiplier for this style under `profile`.
    pub fn multiplier(self, profile: &CompositionProfile) -> f64 {
        match self {
            CornerStyle::Smooth => profile.smooth_multiplier,
            CornerStyle::Standard => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CornerStyle::Smooth => "smooth",
            CornerStyle::Standard => "standard",
        }
    }
}

/// Editing state for one session.
///
/// The source image is shared behind an `Arc` so a render or an export can
/// hold it while the session keeps accepting edits.
#[derive(Debug, Clone)]
pub struct CompositionState {
    pub source_image: Option<Arc<DynamicImage>>,
    pub background: &'static BackgroundSpec,
    pub corner_radius: f64,
    pub image_scale: f64,
    pub corner_style: CornerStyle,
}

impl CompositionState {
    /// Fresh state with the profile's default settings and no image.
    pub fn new(profile: &CompositionProfile) -> Self {
        Self {
            source_image: None,
            background: default_background(),
            corner_radius: profile.default_corner_radius,
            image_scale: profile.default_image_scale,
            corner_style: CornerStyle::default(),
        }
    }

    pub fn has_source_image(&self) -> bool {
        self.source_image.is_some()
    }
}

/// Placement of the source image on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub frame_width: f64,
    pub frame_height: f64,
    pub corner_radius_px: f64,
    pub corner_style: CornerStyle,
}

/// Clamp the corner-radius setting into `[0, max_corner_radius]`. NaN maps to 0.
///
/// Profiles are not necessarily validated: a negative or NaN maximum
/// collapses the range to 0.
pub fn clamp_corner_radius(value: f64, profile: &CompositionProfile) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, profile.max_corner_radius.max(0.0))
}

/// Clamp the image-scale setting into `[min_image_scale, 1]`. NaN maps to the minimum.
///
/// A minimum outside `[0, 1]` (or NaN) is pulled into that range first.
pub fn clamp_image_scale(value: f64, profile: &CompositionProfile) -> f64 {
    let min = profile.min_image_scale.max(0.0).min(1.0);
    if value.is_nan() {
        return min;
    }
    value.clamp(min, 1.0)
}

/// Compute the image frame and corner radius for a `canvas_size` square.
///
/// Out-of-range settings are clamped rather than rejected. The returned
/// radius follows the proportionality law exactly; fitting it into the
/// drawn rectangle is the renderer's job.
pub fn compute_layout(
    canvas_size: f64,
    state: &CompositionState,
    profile: &CompositionProfile,
) -> Result<Layout, LayoutError> {
    if !(canvas_size.is_finite() && canvas_size > 0.0) {
        return Err(LayoutError::InvalidArgument(format!(
            "canvas size must be positive, got {canvas_size}"
        )));
    }

    let scale = clamp_image_scale(state.image_scale, profile);
    let frame = canvas_size * scale * profile.preview_factor.clamp(f64::MIN_POSITIVE, 1.0);

    let setting = clamp_corner_radius(state.corner_radius, profile);
    let radius = setting * state.corner_style.multiplier(profile) * canvas_size
        / profile.reference_canvas;

    Ok(Layout {
        frame_width: frame,
        frame_height: frame,
        corner_radius_px: radius,
        corner_style: state.corner_style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::find_background;

    fn state(radius: f64, scale: f64, style: CornerStyle) -> CompositionState {
        CompositionState {
            corner_radius: radius,
            image_scale: scale,
            corner_style: style,
            ..CompositionState::new(&CompositionProfile::default())
        }
    }

    fn layout(canvas: f64, s: &CompositionState) -> Layout {
        compute_layout(canvas, s, &CompositionProfile::default()).unwrap()
    }

    #[test]
    fn new_state_uses_profile_defaults() {
        let s = CompositionState::new(&CompositionProfile::default());
        assert!(!s.has_source_image());
        assert_eq!(s.background.id, "gradient1");
        assert_eq!(s.corner_radius, 0.0);
        assert_eq!(s.image_scale, 0.8);
        assert_eq!(s.corner_style, CornerStyle::Standard);
    }

    #[test]
    fn smooth_preview_scenario() {
        let mut s = state(20.0, 0.85, CornerStyle::Smooth);
        s.background = find_background("gradient1").unwrap();
        let l = layout(350.0, &s);
        assert!((l.corner_radius_px - 30.0).abs() < 1e-9);
    }

    #[test]
    fn smooth_export_scenario_scales_radius() {
        let s = state(20.0, 0.85, CornerStyle::Smooth);
        let l = layout(2000.0, &s);
        assert!((l.corner_radius_px - 30.0 * (2000.0 / 350.0)).abs() < 1e-9);
    }

    #[test]
    fn proportionality_law_across_canvas_sizes() {
        let sizes = [1.0, 64.0, 350.0, 999.0, 2000.0, 4096.0];
        for style in [CornerStyle::Smooth, CornerStyle::Standard] {
            for radius in [0.0, 7.5, 20.0, 100.0, 250.0] {
                let s = state(radius, 0.6, style);
                let reference = layout(350.0, &s).corner_radius_px / 350.0;
                for c in sizes {
                    let ratio = layout(c, &s).corner_radius_px / c;
                    let tolerance = 1e-6 * reference.abs().max(1e-12);
                    assert!(
                        (ratio - reference).abs() <= tolerance,
                        "ratio drifted at canvas {c}: {ratio} vs {reference}"
                    );
                }
            }
        }
    }

    #[test]
    fn frame_is_proportional_too() {
        let s = state(10.0, 0.5, CornerStyle::Standard);
        let a = layout(350.0, &s);
        let b = layout(2000.0, &s);
        assert!((a.frame_width / 350.0 - b.frame_width / 2000.0).abs() < 1e-12);
    }

    #[test]
    fn smooth_is_exactly_one_and_a_half_standard() {
        for radius in [1.0, 20.0, 33.3, 100.0] {
            let smooth = layout(777.0, &state(radius, 0.8, CornerStyle::Smooth));
            let standard = layout(777.0, &state(radius, 0.8, CornerStyle::Standard));
            assert!((smooth.corner_radius_px - 1.5 * standard.corner_radius_px).abs() < 1e-9);
        }
    }

    #[test]
    fn scale_is_strictly_monotonic() {
        let mut previous = 0.0;
        for step in 0..=14 {
            let scale = 0.3 + step as f64 * 0.05;
            let l = layout(2000.0, &state(0.0, scale, CornerStyle::Standard));
            assert!(l.frame_width > previous, "not increasing at scale {scale}");
            assert_eq!(l.frame_width, l.frame_height);
            previous = l.frame_width;
        }
    }

    #[test]
    fn frame_uses_preview_factor() {
        let l = layout(1000.0, &state(0.0, 1.0, CornerStyle::Standard));
        assert!((l.frame_width - 850.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let huge = layout(500.0, &state(1e9, 50.0, CornerStyle::Smooth));
        assert!(huge.frame_width <= 500.0);
        assert!(huge.frame_height <= 500.0);
        let capped = layout(500.0, &state(100.0, 1.0, CornerStyle::Smooth));
        assert_eq!(huge, capped);

        let negative = layout(500.0, &state(-40.0, -3.0, CornerStyle::Standard));
        assert_eq!(negative.corner_radius_px, 0.0);
        let minimum = layout(500.0, &state(0.0, 0.3, CornerStyle::Standard));
        assert_eq!(negative.frame_width, minimum.frame_width);
    }

    #[test]
    fn nan_settings_are_clamped() {
        let l = layout(500.0, &state(f64::NAN, f64::NAN, CornerStyle::Standard));
        assert_eq!(l.corner_radius_px, 0.0);
        assert!(l.frame_width > 0.0);
    }

    #[test]
    fn non_positive_canvas_is_invalid() {
        let s = state(10.0, 0.5, CornerStyle::Standard);
        let profile = CompositionProfile::default();
        for c in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute_layout(c, &s, &profile),
                Err(LayoutError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn other_profile_constants_are_honoured() {
        let profile = CompositionProfile {
            max_corner_radius: 40.0,
            min_image_scale: 0.4,
            preview_factor: 0.7,
            ..CompositionProfile::default()
        };
        let s = state(50.0, 0.1, CornerStyle::Standard);
        let l = compute_layout(350.0, &s, &profile).unwrap();
        assert!((l.corner_radius_px - 40.0).abs() < 1e-9);
        assert!((l.frame_width - 350.0 * 0.4 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn style_toggles() {
        assert_eq!(CornerStyle::Smooth.toggled(), CornerStyle::Standard);
        assert_eq!(CornerStyle::Standard.toggled(), CornerStyle::Smooth);
    }

    #[test]
    fn unvalidated_profile_bounds_do_not_panic() {
        let inverted = CompositionProfile {
            min_image_scale: 1.5,
            max_corner_radius: -10.0,
            ..CompositionProfile::default()
        };
        assert_eq!(clamp_image_scale(0.5, &inverted), 1.0);
        assert_eq!(clamp_corner_radius(30.0, &inverted), 0.0);
        let layout = compute_layout(350.0, &state(30.0, 0.5, CornerStyle::Standard), &inverted)
            .unwrap();
        assert_eq!(layout.corner_radius_px, 0.0);
        assert!((layout.frame_width - 350.0 * 0.85).abs() < 1e-9);

        let nan = CompositionProfile {
            min_image_scale: f64::NAN,
            max_corner_radius: f64::NAN,
            ..CompositionProfile::default()
        };
        assert_eq!(clamp_image_scale(0.5, &nan), 0.5);
        assert_eq!(clamp_image_scale(f64::NAN, &nan), 0.0);
        assert_eq!(clamp_corner_radius(30.0, &nan), 0.0);
        assert!(compute_layout(350.0, &state(30.0, 0.5, CornerStyle::Smooth), &nan).is_ok());
    }
}
