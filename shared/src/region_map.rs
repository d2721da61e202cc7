use crate::config::MapConfig;
use crate::error::LoadError;
use crate::exclaves;
use crate::geojson;
use crate::geometry::{BoundingBox, RegionFeature};
use crate::projection::Projection;
use crate::topology;

/// The loaded region set with its dataset-wide bounds.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RegionMap {
    features: Vec<RegionFeature>,
    bounds: BoundingBox,
    projection: Projection,
}

impl RegionMap {
    /// Fails with [`LoadError::EmptyDataset`] when there is no vertex to bound.
    pub fn new(features: Vec<RegionFeature>) -> Result<Self, LoadError> {
        let bounds = BoundingBox::of_features(&features).ok_or(LoadError::EmptyDataset)?;
        Ok(Self {
            projection: Projection::new(bounds),
            features,
            bounds,
        })
    }

    /// Decode a topology document, inject the island groups and compute bounds.
    pub fn load(document: &str, config: &MapConfig) -> Result<Self, LoadError> {
        let result = topology::decode(document, &config.boundary_object)
            .and_then(|features| Self::assemble(features, config));
        log_outcome(result)
    }

    /// Same as [`RegionMap::load`] for a pre-decoded GeoJSON FeatureCollection.
    pub fn load_geojson(document: &str, config: &MapConfig) -> Result<Self, LoadError> {
        let result =
            geojson::decode(document).and_then(|features| Self::assemble(features, config));
        log_outcome(result)
    }

    fn assemble(mut features: Vec<RegionFeature>, config: &MapConfig) -> Result<Self, LoadError> {
        if config.inject_exclaves {
            exclaves::augment(&mut features);
        }
        Self::new(features)
    }

    pub fn features(&self) -> &[RegionFeature] {
        &self.features
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn get(&self, name: &str) -> Option<&RegionFeature> {
        self.features.iter().find(|f| f.id == name)
    }

    pub fn exclaves(&self) -> impl Iterator<Item = &RegionFeature> + '_ {
        self.features.iter().filter(|f| f.is_exclave())
    }

    /// Drawable SVG path for a region at view scale 1.
    pub fn region_path(&self, feature: &RegionFeature) -> String {
        self.projection.geometry_path(&feature.geometry)
    }
}

/// Load state shown by the map header and placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

impl MapStatus {
    pub fn of<T>(result: &Result<T, LoadError>) -> Self {
        match result {
            Ok(_) => Self::Ready,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

fn log_outcome(result: Result<RegionMap, LoadError>) -> Result<RegionMap, LoadError> {
    match &result {
        Ok(map) => {
            let b = map.bounds;
            tracing::info!(
                regions = map.features.len(),
                exclaves = map.exclaves().count(),
                min_lon = b.min_lon,
                min_lat = b.min_lat,
                max_lon = b.max_lon,
                max_lat = b.max_lat,
                "boundary dataset loaded"
            );
        }
        Err(e) => tracing::error!(error = %e, "failed to load boundary dataset"),
    }
    result
}
