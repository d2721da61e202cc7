//! Topology-encoded boundary documents.
//!
//! Shared polygon edges are stored once as arcs and referenced by index from
//! each geometry. Decoding resolves those references into concrete rings.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::LoadError;
use crate::geometry::{Geometry, Position, RegionFeature, RegionKind, Ring};

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    /// Present when arcs are quantized and delta-encoded.
    #[serde(default)]
    pub transform: Option<QuantizeTransform>,
    pub arcs: Vec<Vec<Vec<f64>>>,
    pub objects: HashMap<String, TopoObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RegionProperties {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iso: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawObject")]
pub enum TopoObject {
    GeometryCollection {
        geometries: Vec<TopoObject>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        id: Option<serde_json::Value>,
        properties: Option<RegionProperties>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        id: Option<serde_json::Value>,
        properties: Option<RegionProperties>,
    },
    /// Points, lines and null or missing geometry types carry no area to draw.
    Other,
}

/// Wire shape of a topology object. The `type` member may be null.
#[derive(Deserialize)]
struct RawObject {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    geometries: Vec<TopoObject>,
    #[serde(default)]
    arcs: serde_json::Value,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    properties: Option<RegionProperties>,
}

impl TryFrom<RawObject> for TopoObject {
    type Error = serde_json::Error;

    fn try_from(raw: RawObject) -> Result<Self, Self::Error> {
        Ok(match raw.kind.as_deref() {
            Some("GeometryCollection") => Self::GeometryCollection {
                geometries: raw.geometries,
            },
            Some("Polygon") => Self::Polygon {
                arcs: serde_json::from_value(raw.arcs)?,
                id: raw.id,
                properties: raw.properties,
            },
            Some("MultiPolygon") => Self::MultiPolygon {
                arcs: serde_json::from_value(raw.arcs)?,
                id: raw.id,
                properties: raw.properties,
            },
            _ => Self::Other,
        })
    }
}

/// Parse a topology document and expand the named object into region features.
pub fn decode(document: &str, object: &str) -> Result<Vec<RegionFeature>, LoadError> {
    let topology: Topology = serde_json::from_str(document)?;
    decode_topology(&topology, object)
}

pub fn decode_topology(topology: &Topology, object: &str) -> Result<Vec<RegionFeature>, LoadError> {
    let root = topology
        .objects
        .get(object)
        .ok_or_else(|| LoadError::MissingObject {
            name: object.to_string(),
        })?;
    let arcs = ArcTable::resolve(topology)?;

    let mut features = Vec::new();
    collect_features(root, &arcs, &mut features)?;
    Ok(features)
}

fn collect_features(
    object: &TopoObject,
    arcs: &ArcTable,
    out: &mut Vec<RegionFeature>,
) -> Result<(), LoadError> {
    let (geometry, id, properties) = match object {
        TopoObject::GeometryCollection { geometries } => {
            for child in geometries {
                collect_features(child, arcs, out)?;
            }
            return Ok(());
        }
        TopoObject::Polygon {
            arcs: rings,
            id,
            properties,
        } => (Geometry::Polygon(arcs.polygon(rings)?), id, properties),
        TopoObject::MultiPolygon {
            arcs: polygons,
            id,
            properties,
        } => {
            let polygons = polygons
                .iter()
                .map(|rings| arcs.polygon(rings))
                .collect::<Result<Vec<_>, _>>()?;
            (Geometry::MultiPolygon(polygons), id, properties)
        }
        TopoObject::Other => {
            tracing::warn!("skipping non-areal topology geometry");
            return Ok(());
        }
    };

    let properties = properties.clone().unwrap_or_default();
    let id = id.as_ref().map(id_string);
    let Some(name) = properties.name.clone().or_else(|| id.clone()) else {
        tracing::warn!("skipping unnamed topology geometry");
        return Ok(());
    };
    if geometry.positions().next().is_none() {
        tracing::warn!(region = %name, "skipping region without vertices");
        return Ok(());
    }

    out.push(RegionFeature {
        id: name,
        code: properties.iso.or(id),
        geometry,
        kind: RegionKind::Ordinary,
    });
    Ok(())
}

fn id_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Arcs with quantization undone, ready to be stitched into rings.
struct ArcTable {
    arcs: Vec<Vec<Position>>,
}

impl ArcTable {
    fn resolve(topology: &Topology) -> Result<Self, LoadError> {
        let arcs = topology
            .arcs
            .iter()
            .enumerate()
            .map(|(arc_index, arc)| {
                let mut x = 0.0;
                let mut y = 0.0;
                arc.iter()
                    .map(|point| {
                        let (&px, &py) = match point.as_slice() {
                            [px, py, ..] => (px, py),
                            _ => {
                                return Err(LoadError::InvalidPosition {
                                    context: format!("arc {arc_index}"),
                                });
                            }
                        };
                        Ok(match &topology.transform {
                            Some(t) => {
                                x += px;
                                y += py;
                                [
                                    x * t.scale[0] + t.translate[0],
                                    y * t.scale[1] + t.translate[1],
                                ]
                            }
                            None => [px, py],
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { arcs })
    }

    /// `~index` (negative) selects the arc traversed backwards.
    fn arc(&self, index: i64) -> Result<&[Position], LoadError> {
        let resolved = if index < 0 { !index } else { index };
        usize::try_from(resolved)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .map(Vec::as_slice)
            .ok_or(LoadError::ArcOutOfRange {
                index,
                len: self.arcs.len(),
            })
    }

    fn ring(&self, indices: &[i64]) -> Result<Ring, LoadError> {
        let mut points: Ring = Vec::new();
        for &index in indices {
            let arc = self.arc(index)?;
            // Consecutive arcs share their join vertex.
            points.pop();
            let start = points.len();
            points.extend_from_slice(arc);
            if index < 0 {
                points[start..].reverse();
            }
        }
        // A ring built from two-point arcs can come out short.
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Vec<Ring>, LoadError> {
        rings.iter().map(|indices| self.ring(indices)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BUNDLED_TOPOLOGY;

    const QUANTIZED: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.25], "translate": [100.0, 10.0] },
        "arcs": [
            [[0, 0], [0, 4]],
            [[0, 4], [-2, 0], [0, -4], [2, 0]],
            [[0, 0], [2, 0], [0, 4], [-2, 0]]
        ],
        "objects": {
            "regions": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "id": 7, "properties": { "name": "West" } },
                    { "type": "Polygon", "arcs": [[2, -1]], "properties": { "name": "East", "iso": "E" } },
                    { "type": "Point", "coordinates": [0, 0] },
                    { "type": "Polygon", "arcs": [[0]] }
                ]
            }
        }
    }"#;

    #[test]
    fn quantized_arcs_are_delta_decoded_and_stitched() {
        let features = decode(QUANTIZED, "regions").unwrap();
        let names: Vec<_> = features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(names, ["West", "East"]);

        let Geometry::Polygon(west) = &features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            west[0],
            vec![
                [100.0, 10.0],
                [100.0, 11.0],
                [99.0, 11.0],
                [99.0, 10.0],
                [100.0, 10.0]
            ]
        );
        assert_eq!(features[0].code.as_deref(), Some("7"));
    }

    #[test]
    fn negative_index_reverses_shared_arc() {
        let features = decode(QUANTIZED, "regions").unwrap();
        let Geometry::Polygon(east) = &features[1].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            east[0],
            vec![
                [100.0, 10.0],
                [101.0, 10.0],
                [101.0, 11.0],
                [100.0, 11.0],
                [100.0, 10.0]
            ]
        );
        assert_eq!(features[1].code.as_deref(), Some("E"));
    }

    #[test]
    fn short_ring_is_padded_to_four_positions() {
        let doc = r#"{
            "type": "Topology",
            "arcs": [[[1, 1], [2, 2]]],
            "objects": { "o": { "type": "Polygon", "arcs": [[0]], "properties": { "name": "Sliver" } } }
        }"#;
        let features = decode(doc, "o").unwrap();
        let Geometry::Polygon(rings) = &features[0].geometry else {
            panic!("expected polygon");
        };
        let padded = vec![[1.0, 1.0], [2.0, 2.0], [1.0, 1.0], [1.0, 1.0]];
        assert_eq!(rings[0], padded);
    }

    #[test]
    fn missing_object_is_a_load_error() {
        let err = decode(QUANTIZED, "states").unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingObject { name } if name == "states"
        ));
    }

    #[test]
    fn null_geometry_type_is_skipped() {
        let doc = r#"{
            "type": "Topology",
            "arcs": [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            "objects": {
                "o": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0]], "properties": { "name": "A" } },
                        { "type": null, "properties": { "name": "Empty" } },
                        { "properties": { "name": "Untyped" } }
                    ]
                }
            }
        }"#;
        let features = decode(doc, "o").unwrap();
        let names: Vec<_> = features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn dangling_arc_reference_is_a_load_error() {
        let doc = r#"{
            "type": "Topology",
            "arcs": [],
            "objects": { "o": { "type": "Polygon", "arcs": [[-3]], "properties": { "name": "X" } } }
        }"#;
        let err = decode(doc, "o").unwrap_err();
        assert!(matches!(
            err,
            LoadError::ArcOutOfRange { index: -3, len: 0 }
        ));
    }

    #[test]
    fn truncated_position_is_a_load_error() {
        let doc = r#"{ "type": "Topology", "arcs": [[[1]]], "objects": {} }"#;
        let err = decode(doc, "o").unwrap_err();
        assert!(matches!(err, LoadError::MissingObject { .. }));

        let doc = r#"{
            "type": "Topology",
            "arcs": [[[1]]],
            "objects": { "o": { "type": "Polygon", "arcs": [[0]], "properties": { "name": "X" } } }
        }"#;
        let err = decode(doc, "o").unwrap_err();
        assert!(matches!(err, LoadError::InvalidPosition { .. }));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = decode("{ nope", "states").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn bundled_topology_decodes_every_region() {
        let features = decode(BUNDLED_TOPOLOGY, "states").unwrap();
        assert_eq!(features.len(), 7);
        assert!(features.iter().all(|f| !f.is_exclave()));
        let hcm = features.iter().find(|f| f.id == "Hồ Chí Minh").unwrap();
        let Geometry::MultiPolygon(parts) = &hcm.geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(parts.len(), 2);
        for feature in &features {
            for ring in feature.geometry.rings() {
                assert_eq!(ring.first(), ring.last(), "{} ring not closed", feature.id);
            }
        }
    }
}
