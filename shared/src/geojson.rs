//! Pre-decoded GeoJSON input, for datasets that are not topology-encoded.

use serde::Deserialize;

use crate::error::LoadError;
use crate::geometry::{Geometry, Position, RegionFeature, RegionKind, Ring};
use crate::topology::RegionProperties;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<RegionProperties>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "GeometryObject")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    Other,
}

#[derive(Deserialize)]
struct GeometryObject {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    coordinates: serde_json::Value,
}

impl TryFrom<GeometryObject> for RawGeometry {
    type Error = serde_json::Error;

    fn try_from(raw: GeometryObject) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_deref() {
            Some("Polygon") => Self::Polygon {
                coordinates: serde_json::from_value(raw.coordinates)?,
            },
            Some("MultiPolygon") => Self::MultiPolygon {
                coordinates: serde_json::from_value(raw.coordinates)?,
            },
            _ => Self::Other,
        })
    }
}

pub fn decode(document: &str) -> Result<Vec<RegionFeature>, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(document)?;
    let mut features = Vec::with_capacity(collection.features.len());

    for feature in collection.features {
        let properties = feature.properties.unwrap_or_default();
        let id = feature.id.map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        let Some(name) = properties.name.or_else(|| id.clone()) else {
            tracing::warn!("skipping unnamed feature");
            continue;
        };
        let geometry = match feature.geometry {
            Some(RawGeometry::Polygon { coordinates }) => {
                Geometry::Polygon(polygon(&coordinates, &name)?)
            }
            Some(RawGeometry::MultiPolygon { coordinates }) => Geometry::MultiPolygon(
                coordinates
                    .iter()
                    .map(|rings| polygon(rings, &name))
                    .collect::<Result<_, _>>()?,
            ),
            Some(RawGeometry::Other) | None => {
                tracing::warn!(region = %name, "skipping non-areal feature");
                continue;
            }
        };
        features.push(RegionFeature {
            id: name,
            code: properties.iso.or(id),
            geometry,
            kind: RegionKind::Ordinary,
        });
    }
    Ok(features)
}

fn polygon(rings: &[Vec<Vec<f64>>], name: &str) -> Result<Vec<Ring>, LoadError> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .map(|p| position(p, name))
                .collect::<Result<Ring, _>>()
        })
        .collect()
}

fn position(coords: &[f64], name: &str) -> Result<Position, LoadError> {
    match coords {
        [lon, lat, ..] => Ok([*lon, *lat]),
        _ => Err(LoadError::InvalidPosition {
            context: format!("feature {name:?}"),
        }),
    }
}
