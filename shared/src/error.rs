use thiserror::Error;

/// Failure to turn a boundary document into a usable region set.
/// Fatal to the map instance that hit it; there is no retry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse boundary document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("boundary document has no object named {name:?}")]
    MissingObject { name: String },
    #[error("arc index {index} out of range ({len} arcs)")]
    ArcOutOfRange { index: i64, len: usize },
    #[error("{context} contains a position with fewer than two coordinates")]
    InvalidPosition { context: String },
    #[error("boundary document contains no areal regions")]
    EmptyDataset,
}
