use std::path::PathBuf;

/// Error type for capture, persistence and placement operations.
///
/// Only `InvalidCapture`, `InvalidId`, `StructureLoad`, `NotFound` and the I/O variants ever
/// abort an operation. `Extraction` and `PlacementIo` describe a single voxel or
/// entity and are swallowed by the engines after being logged and counted.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("Invalid capture: {0}")]
    InvalidCapture(String),
    #[error("Extraction failed at {pos:?}: {reason}")]
    Extraction { pos: (i32, i32, i32), reason: String },
    #[error("Write rejected at {pos:?}: {reason}")]
    PlacementIo { pos: (i32, i32, i32), reason: String },
    #[error("Invalid structure id '{0}'")]
    InvalidId(String),
    #[error("Failed to load structure: {0}")]
    StructureLoad(String),
    #[error("Structure '{0}' not found")]
    NotFound(String),
    #[error("Structure file {path} is not valid: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StructureError {
    pub fn extraction(pos: (i32, i32, i32), reason: impl Into<String>) -> Self {
        StructureError::Extraction {
            pos,
            reason: reason.into(),
        }
    }

    pub fn placement_io(pos: (i32, i32, i32), reason: impl Into<String>) -> Self {
        StructureError::PlacementIo {
            pos,
            reason: reason.into(),
        }
    }

    /// True for errors that describe one voxel or entity rather than the whole call.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            StructureError::Extraction { .. } | StructureError::PlacementIo { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StructureError>;
