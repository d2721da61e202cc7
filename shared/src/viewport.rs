use serde::{Deserialize, Serialize};

use crate::centroid::{CentroidStrategy, VertexMean};
use crate::config::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FEATURE_PADDING_RATIO, IDENTITY_SCALE, MAX_ZOOM_SCALE,
    MIN_FEATURE_EXTENT, MIN_ZOOM_SCALE,
};
use crate::geometry::{Position, RegionFeature};
use crate::region_map::RegionMap;

/// Pan/zoom applied on top of the base projection.
/// `scale` stays in `[1, 8]`, and `scale == 1` exactly when not zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub zoomed: bool,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: IDENTITY_SCALE,
        zoomed: false,
    };

    /// Convert base canvas coordinates to on-screen canvas coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    /// Convert on-screen canvas coordinates to base canvas coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Value for an SVG `transform` attribute.
    pub fn svg_transform(&self) -> String {
        format!(
            "translate({:.3}, {:.3}) scale({:.4})",
            self.offset_x, self.offset_y, self.scale
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Where a zoom lands and why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTarget {
    pub transform: ViewTransform,
    /// Approximate centroid, geographic.
    pub centroid: Position,
}

/// Frame `feature`: padded extent relative to the whole map picks the zoom,
/// the centroid is moved to the canvas center.
///
/// `None` only for a feature without vertices.
pub fn frame_feature(
    map: &RegionMap,
    feature: &RegionFeature,
    centroid: &dyn CentroidStrategy,
) -> Option<ZoomTarget> {
    let feature_bounds = feature.bounds()?;
    let center = centroid.centroid(&feature.geometry)?;

    let extent = |span: f64| {
        let span = if span == 0.0 {
            MIN_FEATURE_EXTENT
        } else {
            span
        };
        span * (1.0 + 2.0 * FEATURE_PADDING_RATIO)
    };
    let map_bounds = map.bounds();
    let width_ratio = extent(feature_bounds.width()) / map_bounds.width();
    let height_ratio = extent(feature_bounds.height()) / map_bounds.height();
    let raw_scale = 1.0 / width_ratio.max(height_ratio);
    let zoom_scale = raw_scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE);

    let (cx, cy) = map.projection().project(center);
    Some(ZoomTarget {
        transform: ViewTransform {
            offset_x: CANVAS_WIDTH / 2.0 - cx * zoom_scale,
            offset_y: CANVAS_HEIGHT / 2.0 - cy * zoom_scale,
            scale: zoom_scale,
            zoomed: true,
        },
        centroid: center,
    })
}

/// Owns the current [`ViewTransform`].
pub struct ZoomController {
    transform: ViewTransform,
    centroid: Box<dyn CentroidStrategy>,
}

impl std::fmt::Debug for ZoomController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomController")
            .field("transform", &self.transform)
            .finish_non_exhaustive()
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(Box::new(VertexMean))
    }
}

impl ZoomController {
    pub fn new(centroid: Box<dyn CentroidStrategy>) -> Self {
        Self {
            transform: ViewTransform::IDENTITY,
            centroid,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn is_zoomed(&self) -> bool {
        self.transform.zoomed
    }

    /// Strategy zoom targets are centered on.
    pub fn centroid_strategy(&self) -> &dyn CentroidStrategy {
        self.centroid.as_ref()
    }

    pub fn zoom_to_feature(
        &mut self,
        map: &RegionMap,
        feature: &RegionFeature,
    ) -> Option<ZoomTarget> {
        let target = frame_feature(map, feature, self.centroid.as_ref())?;
        tracing::debug!(
            region = %feature.id,
            scale = target.transform.scale,
            offset_x = target.transform.offset_x,
            offset_y = target.transform.offset_y,
            "zooming to region"
        );
        self.transform = target.transform;
        Some(target)
    }

    pub fn reset(&mut self) {
        self.transform = ViewTransform::IDENTITY;
    }
}
