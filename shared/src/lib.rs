pub mod centroid;
pub mod config;
pub mod error;
pub mod exclaves;
pub mod geojson;
pub mod geometry;
pub mod interaction;
pub mod projection;
pub mod region_map;
pub mod resolver;
pub mod style;
pub mod topology;
pub mod viewport;

pub use centroid::{AreaCentroid, CentroidStrategy, VertexMean};
pub use config::MapConfig;
pub use error::LoadError;
pub use geojson::decode as decode_geojson;
pub use geometry::*;
pub use interaction::*;
pub use projection::Projection;
pub use region_map::{MapStatus, RegionMap};
pub use resolver::{AliasTable, Matcher, NameResolver};
pub use style::{ColorToken, Label, RegionStyle, SelectionMarker};
pub use viewport::{ViewTransform, ZoomController, ZoomTarget};

/// Province boundaries shipped with the crate, object `"states"`.
pub const BUNDLED_TOPOLOGY: &str = include_str!("../data/vietnam.topo.json");
