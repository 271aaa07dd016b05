//! Pure calculation functions for placement and shadow geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate dimensions that fit `source` inside a `frame` box.
///
/// The source aspect ratio is preserved and the result never exceeds the
/// frame on either axis (aspect-fit, not fill). Both dimensions are at
/// least 1 pixel.
///
/// # Examples
/// ```
/// # use shotframe::imaging::calculate_fit_dimensions;
/// // Portrait phone screenshot into a square frame: height matches.
/// assert_eq!(calculate_fit_dimensions((1170, 2532), (850.0, 850.0)), (393, 850));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), frame: (f64, f64)) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let (frame_w, frame_h) = (frame.0.max(1.0), frame.1.max(1.0));

    let ratio = (frame_w / src_w).min(frame_h / src_h);
    let w = (src_w * ratio).round().clamp(1.0, frame_w.floor().max(1.0));
    let h = (src_h * ratio).round().clamp(1.0, frame_h.floor().max(1.0));
    (w as u32, h as u32)
}

/// Offset that centers `extent` pixels on a `canvas`-pixel axis.
///
/// Negative when the extent is larger than the canvas.
pub fn centered_offset(canvas: u32, extent: u32) -> i64 {
    (canvas as i64 - extent as i64).div_euclid(2)
}

/// Corner radius actually drawn for a `width × height` rectangle.
///
/// A rounded rectangle cannot have a radius above half its shorter side;
/// larger requests degrade to a capsule. Negative requests become 0.
pub fn effective_corner_radius(requested: f64, width: u32, height: u32) -> f64 {
    let cap = width.min(height) as f64 / 2.0;
    if requested.is_nan() {
        return 0.0;
    }
    requested.clamp(0.0, cap)
}

/// Gaussian sigma of the drop shadow for a canvas side.
pub fn shadow_sigma(canvas: u32, blur_fraction: f64) -> f64 {
    canvas as f64 * blur_fraction.max(0.0)
}

/// Box widths whose successive application approximates a Gaussian blur.
///
/// Uses the standard "boxes for Gauss" derivation: `passes` boxes of odd
/// width `wl` or `wl + 2` whose combined variance equals `sigma²`.
pub fn box_sizes_for_gauss(sigma: f64, passes: usize) -> Vec<usize> {
    if sigma <= 0.0 || passes == 0 {
        return vec![1; passes];
    }
    let n = passes as f64;
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let m_ideal = (12.0 * sigma * sigma - n * wlf * wlf - 4.0 * n * wlf - 3.0 * n) / (-4.0 * wlf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { wl as usize } else { wu as usize })
        .collect()
}
