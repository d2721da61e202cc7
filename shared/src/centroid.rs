use crate::geometry::{Geometry, Position, Ring};

/// How a region's representative point is chosen for zoom targets, labels
/// and selection events.
pub trait CentroidStrategy {
    /// `None` only for a geometry without vertices.
    fn centroid(&self, geometry: &Geometry) -> Option<Position>;
}

/// Arithmetic mean of every ring vertex, closing vertices included.
///
/// Not an area centroid: densely sampled stretches of boundary pull the
/// result toward themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexMean;

impl CentroidStrategy for VertexMean {
    fn centroid(&self, geometry: &Geometry) -> Option<Position> {
        vertex_mean(geometry.positions())
    }
}

fn vertex_mean<'a>(positions: impl Iterator<Item = &'a Position>) -> Option<Position> {
    let (mut sum_lon, mut sum_lat, mut count) = (0.0f64, 0.0f64, 0usize);
    for [lon, lat] in positions {
        sum_lon += lon;
        sum_lat += lat;
        count += 1;
    }
    (count > 0).then(|| [sum_lon / count as f64, sum_lat / count as f64])
}

/// Area-weighted centroid: exteriors add area, holes subtract it.
/// Falls back to [`VertexMean`] when the signed area vanishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AreaCentroid;

impl CentroidStrategy for AreaCentroid {
    fn centroid(&self, geometry: &Geometry) -> Option<Position> {
        let (mut area_sum, mut cx_sum, mut cy_sum) = (0.0f64, 0.0f64, 0.0f64);
        for rings in geometry.polygons() {
            for (i, ring) in rings.iter().enumerate() {
                let (area, cx, cy) = ring_moments(ring);
                // Orientation varies between sources; sign comes from the ring role.
                let role = if i == 0 { 1.0 } else { -1.0 };
                let sign = role * area.signum();
                area_sum += sign * area;
                cx_sum += sign * cx;
                cy_sum += sign * cy;
            }
        }
        if area_sum.abs() < f64::EPSILON {
            return VertexMean.centroid(geometry);
        }
        Some([cx_sum / (6.0 * area_sum), cy_sum / (6.0 * area_sum)])
    }
}

/// Shoelace signed area with the unnormalized first moments.
fn ring_moments(ring: &Ring) -> (f64, f64, f64) {
    let (mut area2, mut cx, mut cy) = (0.0f64, 0.0f64, 0.0f64);
    for pair in ring.windows(2) {
        let [x0, y0] = pair[0];
        let [x1, y1] = pair[1];
        let cross = x0 * y1 - x1 * y0;
        area2 += cross;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }
    (area2 / 2.0, cx, cy)
}
