//! Background palette.
//!
//! A fixed catalog of eight backgrounds, four diagonal gradients followed by
//! four flat fills. The catalog is a `static` table: entries are never
//! mutated, and the first entry is the default selection.
//!
//! Colors are declared in unit components (`0.0..=1.0`) and converted to
//! bytes with `round(c * 255)`.

use serde::Serialize;

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Build a color from unit components, clamping each to `0.0..=1.0`.
    pub const fn from_unit(r: f32, g: f32, b: f32) -> Self {
        Self([unit_to_byte(r), unit_to_byte(g), unit_to_byte(b)])
    }

    /// Linear interpolation toward `other`; `t` is clamped to `0.0..=1.0`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }

    /// Hex notation, e.g. `#0066cc`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

const fn unit_to_byte(c: f32) -> u8 {
    let c = if c < 0.0 {
        0.0
    } else if c > 1.0 {
        1.0
    } else {
        c
    };
    // const-friendly round-half-up
    (c * 255.0 + 0.5) as u8
}

/// Axis along which a gradient runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    /// Top-left corner to bottom-right corner.
    TopLeadingToBottomTrailing,
}

impl GradientDirection {
    /// Interpolation parameter for pixel `(x, y)` on a `side × side` canvas,
    /// sampled at the pixel centre.
    pub fn position(self, x: u32, y: u32, side: u32) -> f32 {
        match self {
            GradientDirection::TopLeadingToBottomTrailing => {
                (x as f32 + y as f32 + 1.0) / (2.0 * side as f32)
            }
        }
    }
}

/// How a background paints the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recipe {
    Gradient {
        from: Rgb,
        to: Rgb,
        direction: GradientDirection,
    },
    Solid {
        color: Rgb,
    },
}

impl Recipe {
    /// Color at pixel `(x, y)` of a `side × side` canvas.
    pub fn color_at(&self, x: u32, y: u32, side: u32) -> Rgb {
        match *self {
            Recipe::Gradient {
                from,
                to,
                direction,
            } => from.lerp(to, direction.position(x, y, side)),
            Recipe::Solid { color } => color,
        }
    }
}

/// A catalog entry: stable identifier, display name, and render recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub recipe: Recipe,
}

const fn gradient(id: &'static str, name: &'static str, from: Rgb, to: Rgb) -> BackgroundSpec {
    BackgroundSpec {
        id,
        name,
        recipe: Recipe::Gradient {
            from,
            to,
            direction: GradientDirection::TopLeadingToBottomTrailing,
        },
    }
}

const fn solid(id: &'static str, name: &'static str, color: Rgb) -> BackgroundSpec {
    BackgroundSpec {
        id,
        name,
        recipe: Recipe::Solid { color },
    }
}

static CATALOG: [BackgroundSpec; 8] = [
    gradient(
        "gradient1",
        "Blue Gradient",
        Rgb::from_unit(0.0, 0.4, 0.8),
        Rgb::from_unit(0.0, 0.6, 1.0),
    ),
    gradient(
        "gradient2",
        "Purple Gradient",
        Rgb::from_unit(0.5, 0.0, 0.8),
        Rgb::from_unit(0.8, 0.0, 0.5),
    ),
    gradient(
        "gradient3",
        "Sunset Gradient",
        Rgb::from_unit(1.0, 0.4, 0.2),
        Rgb::from_unit(1.0, 0.2, 0.4),
    ),
    gradient(
        "gradient4",
        "Ocean Gradient",
        Rgb::from_unit(0.0, 0.5, 0.8),
        Rgb::from_unit(0.0, 0.8, 0.8),
    ),
    solid("solid1", "Dark Blue", Rgb::from_unit(0.0, 0.2, 0.5)),
    solid("solid2", "Purple", Rgb::from_unit(0.5, 0.0, 0.5)),
    solid("solid3", "Black", Rgb::from_unit(0.0, 0.0, 0.0)),
    solid("solid4", "White", Rgb::from_unit(1.0, 1.0, 1.0)),
];

/// The full background catalog in display order.
pub fn catalog() -> &'static [BackgroundSpec] {
    &CATALOG
}

/// The default selection (first catalog entry).
pub fn default_background() -> &'static BackgroundSpec {
    &CATALOG[0]
}

/// Look up a background by id (`gradient3`) or display name (`Sunset Gradient`),
/// case-insensitively.
pub fn find_background(key: &str) -> Option<&'static BackgroundSpec> {
    CATALOG
        .iter()
        .find(|b| b.id.eq_ignore_ascii_case(key) || b.name.eq_ignore_ascii_case(key))
}
