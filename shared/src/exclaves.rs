use crate::geometry::{Geometry, RegionFeature, RegionKind, rectangle_ring};

pub const HOANG_SA: &str = "Hoàng Sa";
pub const TRUONG_SA: &str = "Trường Sa";

/// Island groups absent from the source topology, drawn as small rectangles.
pub fn island_groups() -> [RegionFeature; 2] {
    [
        exclave(HOANG_SA, "VN-HS", [112.0, 16.5, 112.2, 16.7]),
        exclave(TRUONG_SA, "VN-TS", [114.0, 8.5, 114.3, 8.8]),
    ]
}

/// Append the island groups unless a region of the same name is already present.
pub fn augment(features: &mut Vec<RegionFeature>) {
    for island in island_groups() {
        if features.iter().any(|f| f.id == island.id) {
            tracing::warn!(region = %island.id, "source already contains exclave, not injecting");
            continue;
        }
        features.push(island);
    }
}

fn exclave(
    name: &str,
    code: &str,
    [min_lon, min_lat, max_lon, max_lat]: [f64; 4],
) -> RegionFeature {
    RegionFeature {
        id: name.to_string(),
        code: Some(code.to_string()),
        geometry: Geometry::MultiPolygon(vec![vec![rectangle_ring(
            min_lon, min_lat, max_lon, max_lat,
        )]]),
        kind: RegionKind::Exclave,
    }
}
