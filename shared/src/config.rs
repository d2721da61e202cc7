use serde::Deserialize;

// Logical canvas. Device-pixel scaling belongs to the rendering surface.
pub const CANVAS_WIDTH: f64 = 600.0;
pub const CANVAS_HEIGHT: f64 = 400.0;
pub const CANVAS_PADDING: f64 = 20.0;

pub const IDENTITY_SCALE: f64 = 1.0;
pub const MIN_ZOOM_SCALE: f64 = 2.0;
pub const MAX_ZOOM_SCALE: f64 = 8.0;

/// Fraction of a feature's extent added on each axis before framing it.
pub const FEATURE_PADDING_RATIO: f64 = 0.1;
/// Stand-in extent (degrees) for features with zero width or height.
pub const MIN_FEATURE_EXTENT: f64 = 0.1;

pub const AUTO_ZOOM_DEFER_MS: u32 = 200;

pub const DEFAULT_BOUNDARY_OBJECT: &str = "states";

/// Values an embedder may override when constructing a map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Topology object holding every administrative region.
    pub boundary_object: String,
    pub auto_zoom_defer_ms: u32,
    pub inject_exclaves: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            boundary_object: DEFAULT_BOUNDARY_OBJECT.to_string(),
            auto_zoom_defer_ms: AUTO_ZOOM_DEFER_MS,
            inject_exclaves: true,
        }
    }
}

impl MapConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
