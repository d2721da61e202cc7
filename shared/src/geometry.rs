use serde::{Deserialize, Serialize};

/// A `[lon, lat]` pair in geographic degrees.
pub type Position = [f64; 2];

/// A closed sequence of positions (first == last once decoded).
pub type Ring = Vec<Position>;

/// Areal geometry of a region. Serializes with the GeoJSON
/// `{"type": ..., "coordinates": ...}` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// First ring is the exterior, the rest are holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Every ring of the geometry, in document order.
    /// MultiPolygon parts are flattened one level.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Self::Polygon(rings) => Box::new(rings.iter()),
            Self::MultiPolygon(polygons) => Box::new(polygons.iter().flatten()),
        }
    }

    /// Every vertex of every ring, closing vertices included.
    pub fn positions(&self) -> impl Iterator<Item = &Position> + '_ {
        self.rings().flatten()
    }

    /// Polygons as ring sets, so callers can tell exteriors from holes.
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Self::Polygon(rings) => vec![rings.as_slice()],
            Self::MultiPolygon(polygons) => polygons.iter().map(Vec::as_slice).collect(),
        }
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_positions(self.positions())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    #[default]
    Ordinary,
    /// Hand-authored region outside the source topology.
    Exclave,
}

/// One administrative region. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionFeature {
    /// Canonical name, unique within a dataset.
    pub id: String,
    /// Short administrative code such as `VN-HN`, when the source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub kind: RegionKind,
}

impl RegionFeature {
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            code: None,
            geometry,
            kind: RegionKind::Ordinary,
        }
    }

    pub fn is_exclave(&self) -> bool {
        self.kind == RegionKind::Exclave
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.geometry.bounds()
    }
}

/// Axis-aligned rectangle in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Min/max reduction over the positions. `None` when there are none.
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Self> {
        let mut positions = positions.into_iter();
        let first = positions.next()?;
        let mut bounds = Self {
            min_lon: first[0],
            min_lat: first[1],
            max_lon: first[0],
            max_lat: first[1],
        };
        for &[lon, lat] in positions {
            bounds.min_lon = bounds.min_lon.min(lon);
            bounds.max_lon = bounds.max_lon.max(lon);
            bounds.min_lat = bounds.min_lat.min(lat);
            bounds.max_lat = bounds.max_lat.max(lat);
        }
        Some(bounds)
    }

    /// Bounds of every vertex of every feature.
    pub fn of_features<'a>(features: impl IntoIterator<Item = &'a RegionFeature>) -> Option<Self> {
        Self::from_positions(
            features
                .into_iter()
                .flat_map(|feature| feature.geometry.positions()),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn contains(&self, [lon, lat]: Position) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }
}

/// Closed axis-aligned rectangle ring, counter-clockwise from the south-west corner.
pub fn rectangle_ring(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Ring {
    vec![
        [min_lon, min_lat],
        [max_lon, min_lat],
        [max_lon, max_lat],
        [min_lon, max_lat],
        [min_lon, min_lat],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Geometry {
        Geometry::Polygon(vec![rectangle_ring(min, min, max, max)])
    }

    #[test]
    fn multipolygon_positions_flatten_one_level_deeper() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![rectangle_ring(0.0, 0.0, 1.0, 1.0)],
            vec![
                rectangle_ring(2.0, 2.0, 5.0, 5.0),
                rectangle_ring(3.0, 3.0, 4.0, 4.0),
            ],
        ]);
        assert_eq!(geometry.rings().count(), 3);
        assert_eq!(geometry.positions().count(), 15);
        assert_eq!(geometry.polygons().len(), 2);
    }

    #[test]
    fn bounds_enclose_every_feature() {
        let features = [
            RegionFeature::new("a", square(0.0, 1.0)),
            RegionFeature::new("b", square(-3.0, -2.0)),
            RegionFeature::new("c", square(4.0, 9.0)),
        ];
        let bounds = BoundingBox::of_features(&features).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                min_lon: -3.0,
                min_lat: -3.0,
                max_lon: 9.0,
                max_lat: 9.0,
            }
        );
        for feature in &features {
            assert!(feature.geometry.positions().all(|p| bounds.contains(*p)));
        }
    }

    #[test]
    fn bounds_of_nothing_is_none() {
        assert_eq!(
            BoundingBox::of_features(Vec::<RegionFeature>::new().iter()),
            None
        );
        assert_eq!(Geometry::Polygon(Vec::new()).bounds(), None);
    }

    #[test]
    fn geometry_serializes_as_geojson() {
        let json = serde_json::to_value(square(0.0, 1.0)).unwrap();
        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0][2], serde_json::json!([1.0, 1.0]));
    }
}
