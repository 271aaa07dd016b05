//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Backgrounds
//!
//! ```text
//! 001 Blue Gradient (gradient1)
//!     gradient #0066cc → #0099ff
//! 005 Dark Blue (solid1)
//!     solid #003380
//! ```
//!
//! ## Render
//!
//! ```text
//! Canvas 2000x2000
//!     Background: Blue Gradient
//!     Corner Radius: 20 (smooth) → 171.43px
//!     Image Size: 85% → frame 1445.00px
//!     Fingerprint: 3f5a…
//! ```
//!
//! ## Export
//!
//! ```text
//! Image Saved!
//!     Your image has been saved to Photos successfully!
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.

use crate::background::{BackgroundSpec, Recipe};
use crate::composition::{CompositionState, Layout};
use crate::export::ExportResult;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Backgrounds
// ============================================================================

pub fn format_backgrounds(catalog: &[BackgroundSpec]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, spec) in catalog.iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), spec.name, spec.id));
        let recipe = match spec.recipe {
            Recipe::Gradient { from, to, .. } => {
                format!("gradient {} → {}", from.to_hex(), to.to_hex())
            }
            Recipe::Solid { color } => format!("solid {}", color.to_hex()),
        };
        lines.push(format!("{}{}", indent(1), recipe));
    }
    lines
}

pub fn print_backgrounds(catalog: &[BackgroundSpec]) {
    for line in format_backgrounds(catalog) {
        println!("{}", line);
    }
}

// ============================================================================
// Render summary
// ============================================================================

/// Summary of one render. `layout` is `None` for placeholder renders.
pub fn format_render(
    canvas: u32,
    state: &CompositionState,
    layout: Option<&Layout>,
    fingerprint: &str,
) -> Vec<String> {
    let mut lines = vec![format!("Canvas {canvas}x{canvas}")];
    lines.push(format!("{}Background: {}", indent(1), state.background.name));
    match layout {
        Some(l) => {
            lines.push(format!(
                "{}Corner Radius: {} ({}) → {:.2}px",
                indent(1),
                state.corner_radius.trunc() as i64,
                l.corner_style.label(),
                l.corner_radius_px
            ));
            lines.push(format!(
                "{}Image Size: {}% → frame {:.2}px",
                indent(1),
                (state.image_scale * 100.0).trunc() as i64,
                l.frame_width
            ));
        }
        None => lines.push(format!("{}No image (placeholder)", indent(1))),
    }
    lines.push(format!("{}Fingerprint: {}", indent(1), fingerprint));
    lines
}

pub fn print_render(
    canvas: u32,
    state: &CompositionState,
    layout: Option<&Layout>,
    fingerprint: &str,
) {
    for line in format_render(canvas, state, layout, fingerprint) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

pub fn format_export_result(result: &ExportResult) -> Vec<String> {
    vec![
        result.title().to_string(),
        format!("{}{}", indent(1), result.message()),
    ]
}

pub fn print_export_result(result: &ExportResult) {
    for line in format_export_result(result) {
        println!("{}", line);
    }
}
