use std::fmt::Write as FmtWrite;

use crate::config::{CANVAS_HEIGHT, CANVAS_PADDING, CANVAS_WIDTH};
use crate::geometry::{BoundingBox, Geometry, Position, Ring};

/// Linear uniform-scale fit of a bounding box onto the logical canvas.
///
/// Always evaluated at view scale 1; pan and zoom are applied afterwards by
/// [`ViewTransform`](crate::viewport::ViewTransform).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: BoundingBox,
    base_scale: f64,
    left: f64,
    bottom: f64,
}

impl Projection {
    pub fn new(bounds: BoundingBox) -> Self {
        Self::with_canvas(bounds, CANVAS_WIDTH, CANVAS_HEIGHT, CANVAS_PADDING)
    }

    pub fn with_canvas(bounds: BoundingBox, width: f64, height: f64, padding: f64) -> Self {
        let scale_x = (width - 2.0 * padding) / bounds.width();
        let scale_y = (height - 2.0 * padding) / bounds.height();
        // A zero-extent axis divides to infinity; `min` then picks the other axis.
        let mut base_scale = scale_x.min(scale_y);
        if !base_scale.is_finite() || base_scale <= 0.0 {
            base_scale = 1.0;
        }

        let bounds_w = bounds.width() * base_scale;
        let bounds_h = bounds.height() * base_scale;
        Self {
            bounds,
            base_scale,
            left: width / 2.0 - bounds_w / 2.0,
            bottom: height / 2.0 + bounds_h / 2.0,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Canvas units per geographic degree.
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Geographic to canvas coordinates. Canvas y grows downward.
    pub fn project(&self, [lon, lat]: Position) -> (f64, f64) {
        (
            self.left + (lon - self.bounds.min_lon) * self.base_scale,
            self.bottom - (lat - self.bounds.min_lat) * self.base_scale,
        )
    }

    pub fn unproject(&self, x: f64, y: f64) -> Position {
        [
            self.bounds.min_lon + (x - self.left) / self.base_scale,
            self.bounds.min_lat + (self.bottom - y) / self.base_scale,
        ]
    }

    /// SVG path data: one `M … L … Z` subpath per ring, MultiPolygon parts concatenated.
    pub fn geometry_path(&self, geometry: &Geometry) -> String {
        let mut d = String::new();
        for ring in geometry.rings() {
            self.write_ring(ring, &mut d);
        }
        d
    }

    fn write_ring(&self, ring: &Ring, d: &mut String) {
        let Some((first, rest)) = ring.split_first() else {
            return;
        };
        if !d.is_empty() {
            d.push(' ');
        }
        let (x, y) = self.project(*first);
        let _ = write!(d, "M {x:.2} {y:.2}");
        for position in rest {
            let (x, y) = self.project(*position);
            let _ = write!(d, " L {x:.2} {y:.2}");
        }
        d.push_str(" Z");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rectangle_ring;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    fn bounds() -> BoundingBox {
        BoundingBox {
            min_lon: 102.0,
            min_lat: 8.5,
            max_lon: 114.3,
            max_lat: 23.4,
        }
    }

    #[test]
    fn corners_respect_padding() {
        let projection = Projection::new(bounds());
        for corner in [[102.0, 8.5], [114.3, 23.4], [102.0, 23.4], [114.3, 8.5]] {
            let (x, y) = projection.project(corner);
            assert!((20.0..=580.0).contains(&x), "x={x} for {corner:?}");
            assert!((20.0..=380.0).contains(&y), "y={y} for {corner:?}");
        }
    }

    #[test]
    fn interior_points_stay_on_canvas() {
        let projection = Projection::new(bounds());
        for i in 0..=10 {
            for j in 0..=10 {
                let lon = 102.0 + 12.3 * f64::from(i) / 10.0;
                let lat = 8.5 + 14.9 * f64::from(j) / 10.0;
                let (x, y) = projection.project([lon, lat]);
                assert!((0.0..=600.0).contains(&x));
                assert!((0.0..=400.0).contains(&y));
            }
        }
    }

    #[test]
    fn taller_axis_drives_scale_and_is_centered() {
        let projection = Projection::new(bounds());
        // Height is the constraining axis: 360 / 14.9.
        assert_close(projection.base_scale(), 360.0 / 14.9);
        let (_, top) = projection.project([102.0, 23.4]);
        let (_, bottom) = projection.project([102.0, 8.5]);
        assert_close(top, 20.0);
        assert_close(bottom, 380.0);
        let (left, _) = projection.project([102.0, 8.5]);
        let (right, _) = projection.project([114.3, 8.5]);
        assert_close((left + right) / 2.0, 300.0);
    }

    #[test]
    fn north_is_up() {
        let projection = Projection::new(bounds());
        let (_, south) = projection.project([105.0, 10.0]);
        let (_, north) = projection.project([105.0, 21.0]);
        assert!(north < south);
    }

    #[test]
    fn projection_is_deterministic_and_invertible() {
        let projection = Projection::new(bounds());
        let a = projection.project([106.7, 10.8]);
        let b = projection.project([106.7, 10.8]);
        assert_eq!(a, b);
        let [lon, lat] = projection.unproject(a.0, a.1);
        assert_close(lon, 106.7);
        assert_close(lat, 10.8);
    }

    #[test]
    fn degenerate_axis_falls_back_to_the_other() {
        let flat = BoundingBox {
            min_lon: 0.0,
            min_lat: 5.0,
            max_lon: 10.0,
            max_lat: 5.0,
        };
        let projection = Projection::new(flat);
        assert_close(projection.base_scale(), 56.0);
        assert_eq!(projection.project([0.0, 5.0]), (20.0, 200.0));
    }

    #[test]
    fn path_has_one_subpath_per_ring() {
        let projection = Projection::with_canvas(
            BoundingBox {
                min_lon: 0.0,
                min_lat: 0.0,
                max_lon: 10.0,
                max_lat: 10.0,
            },
            100.0,
            100.0,
            0.0,
        );
        let geometry = Geometry::MultiPolygon(vec![
            vec![rectangle_ring(0.0, 0.0, 10.0, 10.0)],
            vec![rectangle_ring(2.0, 2.0, 3.0, 3.0)],
        ]);
        let d = projection.geometry_path(&geometry);
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
        assert!(d.starts_with("M 0.00 100.00 L 100.00 100.00 L 100.00 0.00"));
    }
}
