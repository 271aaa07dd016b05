//! Anti-aliased coverage for rounded rectangles.
//!
//! Coverage is evaluated at pixel centres in the rectangle's local
//! coordinates (`0..width`, `0..height`). The straight edges of the
//! rectangle land on pixel boundaries, so only the four corner regions need
//! anti-aliasing.
//!
//! | Style | Corner curve |
//! |---|---|
//! | [`CornerStyle::Standard`] | circular arc of radius `r` |
//! | [`CornerStyle::Smooth`] | superellipse `|x|ⁿ + |y|ⁿ = rⁿ`, curvature-continuous at the joins |

use crate::composition::CornerStyle;

/// Superellipse exponent used for smooth corners.
const SMOOTH_EXPONENT: f64 = 5.0;

/// A rounded rectangle in local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub style: CornerStyle,
}

impl RoundedRect {
    pub fn new(width: f64, height: f64, radius: f64, style: CornerStyle) -> Self {
        let cap = width.min(height) / 2.0;
        Self {
            width,
            height,
            radius: radius.clamp(0.0, cap.max(0.0)),
            style,
        }
    }

    /// Coverage of the pixel whose centre is `(x, y)`, in `0.0..=1.0`.
    pub fn coverage(&self, x: f64, y: f64) -> f32 {
        if x < 0.0 || y < 0.0 || x > self.width || y > self.height {
            return 0.0;
        }
        let r = self.radius;
        if r <= 0.0 {
            return 1.0;
        }

        let cx = if x < r {
            r
        } else if x > self.width - r {
            self.width - r
        } else {
            return 1.0;
        };
        let cy = if y < r {
            r
        } else if y > self.height - r {
            self.height - r
        } else {
            return 1.0;
        };

        let dx = (x - cx).abs();
        let dy = (y - cy).abs();
        let distance = match self.style {
            CornerStyle::Standard => dx.hypot(dy),
            CornerStyle::Smooth => {
                let n = SMOOTH_EXPONENT;
                r * ((dx / r).powf(n) + (dy / r).powf(n)).powf(1.0 / n)
            }
        };
        (r - distance + 0.5).clamp(0.0, 1.0) as f32
    }
}

/// Coverage of a plus glyph of arm length `size` and stroke `thickness`,
/// centred at `(cx, cy)`.
pub fn plus_coverage(x: f64, y: f64, cx: f64, cy: f64, size: f64, thickness: f64) -> f32 {
    let half = size / 2.0;
    let stroke = thickness / 2.0;
    let dx = (x - cx).abs();
    let dy = (y - cy).abs();
    let horizontal = dx <= half && dy <= stroke;
    let vertical = dy <= half && dx <= stroke;
    if horizontal || vertical { 1.0 } else { 0.0 }
}
