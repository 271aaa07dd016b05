//! Studio configuration module.
//!
//! Handles loading, validating, and merging `shotframe.toml`. Stock defaults
//! are overridden by a sparse user file; every key is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! [composition]
//! max_corner_radius = 100.0     # Upper bound of the corner-radius setting
//! min_image_scale = 0.3         # Lower bound of the image-scale setting
//! default_corner_radius = 0.0
//! default_image_scale = 0.8
//! preview_factor = 0.85         # Frame side = canvas * scale * preview_factor
//! smooth_multiplier = 1.5       # Radius multiplier for smooth corners
//! reference_canvas = 350.0      # Canvas size at which the setting is in pixels
//!
//! [preview]
//! canvas_size = 350
//!
//! [export]
//! canvas_size = 2000
//! indicator_seconds = 1.5       # How long the "exporting" flag stays raised
//!
//! [shadow]
//! blur_fraction = 0.0285714     # Blur sigma as a fraction of the canvas side
//! opacity = 0.33
//! offset_fraction = 0.0         # Downward offset as a fraction of the canvas side
//!
//! [processing]
//! max_threads = 4               # Render threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "shotframe.toml";

/// Largest canvas side the renderer accepts.
pub const MAX_CANVAS_SIZE: u32 = 16384;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Geometry constants and control ranges.
    pub composition: CompositionProfile,
    /// Interactive preview target.
    pub preview: PreviewConfig,
    /// Export target and exporting-indicator timing.
    pub export: ExportConfig,
    /// Drop shadow under the placed image.
    pub shadow: ShadowConfig,
    /// Render thread pool.
    pub processing: ProcessingConfig,
}

impl StudioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.composition;
        if !(c.max_corner_radius.is_finite() && c.max_corner_radius > 0.0) {
            return Err(ConfigError::Validation(
                "composition.max_corner_radius must be positive".into(),
            ));
        }
        if !(c.min_image_scale > 0.0 && c.min_image_scale <= 1.0) {
            return Err(ConfigError::Validation(
                "composition.min_image_scale must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=c.max_corner_radius).contains(&c.default_corner_radius) {
            return Err(ConfigError::Validation(
                "composition.default_corner_radius must be within [0, max_corner_radius]".into(),
            ));
        }
        if !(c.min_image_scale..=1.0).contains(&c.default_image_scale) {
            return Err(ConfigError::Validation(
                "composition.default_image_scale must be within [min_image_scale, 1]".into(),
            ));
        }
        if !(c.preview_factor > 0.0 && c.preview_factor <= 1.0) {
            return Err(ConfigError::Validation(
                "composition.preview_factor must be in (0, 1]".into(),
            ));
        }
        if !(c.smooth_multiplier.is_finite() && c.smooth_multiplier >= 1.0) {
            return Err(ConfigError::Validation(
                "composition.smooth_multiplier must be at least 1".into(),
            ));
        }
        if !(c.reference_canvas.is_finite() && c.reference_canvas > 0.0) {
            return Err(ConfigError::Validation(
                "composition.reference_canvas must be positive".into(),
            ));
        }
        for (key, size) in [
            ("preview.canvas_size", self.preview.canvas_size),
            ("export.canvas_size", self.export.canvas_size),
        ] {
            if !(1..=MAX_CANVAS_SIZE).contains(&size) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be within 1-{MAX_CANVAS_SIZE}, got {size}"
                )));
            }
        }
        if !(self.export.indicator_seconds.is_finite() && self.export.indicator_seconds >= 0.0) {
            return Err(ConfigError::Validation(
                "export.indicator_seconds must not be negative".into(),
            ));
        }
        let s = &self.shadow;
        if !(0.0..=1.0).contains(&s.opacity) {
            return Err(ConfigError::Validation(
                "shadow.opacity must be 0-1".into(),
            ));
        }
        if !(0.0..=0.25).contains(&s.blur_fraction) || !(0.0..=0.25).contains(&s.offset_fraction) {
            return Err(ConfigError::Validation(
                "shadow fractions must be in [0, 0.25]".into(),
            ));
        }
        Ok(())
    }
}

/// Constants of the composition model.
///
/// Earlier iterations of the screen shipped with different ranges and
/// factors; they are all expressible as a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositionProfile {
    pub max_corner_radius: f64,
    pub min_image_scale: f64,
    pub default_corner_radius: f64,
    pub default_image_scale: f64,
    /// Fraction of `canvas * scale` occupied by the image frame.
    pub preview_factor: f64,
    /// Radius multiplier applied in smooth corner mode.
    pub smooth_multiplier: f64,
    /// Canvas side at which one unit of corner-radius setting is one pixel.
    pub reference_canvas: f64,
}

impl Default for CompositionProfile {
    fn default() -> Self {
        Self {
            max_corner_radius: 100.0,
            min_image_scale: 0.3,
            default_corner_radius: 0.0,
            default_image_scale: 0.8,
            preview_factor: 0.85,
            smooth_multiplier: 1.5,
            reference_canvas: 350.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub canvas_size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { canvas_size: 350 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub canvas_size: u32,
    /// Seconds the cosmetic "exporting" flag stays raised after an export starts.
    pub indicator_seconds: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            canvas_size: 2000,
            indicator_seconds: 1.5,
        }
    }
}

/// Shadow parameters, expressed relative to the canvas side so the shadow
/// looks the same at every render size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShadowConfig {
    pub blur_fraction: f64,
    pub opacity: f64,
    pub offset_fraction: f64,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            blur_fraction: 10.0 / 350.0,
            opacity: 0.33,
            offset_fraction: 0.0,
        }
    }
}

/// Render thread settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of render threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a `toml::Value::Table`, the base layer for user overrides.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(StudioConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<StudioConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StudioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Parse a config document from a string.
pub fn parse_config(content: &str) -> Result<StudioConfig, ConfigError> {
    let value: toml::Value = toml::from_str(content)?;
    resolve_config(Some(value))
}

/// Load config from a file path.
///
/// A missing file yields the stock defaults; an unreadable or invalid file
/// is an error.
pub fn load_config(path: &Path) -> Result<StudioConfig, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Shotframe Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Composition geometry
# ---------------------------------------------------------------------------
[composition]
# Corner-radius setting range is [0, max_corner_radius].
max_corner_radius = 100.0

# Image-scale setting range is [min_image_scale, 1.0].
min_image_scale = 0.3

# Settings a fresh session starts with.
default_corner_radius = 0.0
default_image_scale = 0.8

# Image frame side = canvas * image_scale * preview_factor.
preview_factor = 0.85

# Smooth (continuous) corners use a larger radius than standard ones.
smooth_multiplier = 1.5

# Canvas side at which one unit of the corner-radius setting equals one
# pixel. Other canvas sizes scale the radius proportionally, so preview and
# export look the same.
reference_canvas = 350.0

# ---------------------------------------------------------------------------
# Render targets (square side in pixels, 1-16384)
# ---------------------------------------------------------------------------
[preview]
canvas_size = 350

[export]
canvas_size = 2000

# Seconds the "exporting" indicator stays up after pressing export.
indicator_seconds = 1.5

# ---------------------------------------------------------------------------
# Drop shadow (fractions of the canvas side)
# ---------------------------------------------------------------------------
[shadow]
blur_fraction = 0.0285714
opacity = 0.33
offset_fraction = 0.0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum render threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
