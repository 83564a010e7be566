//! Error types for the viewer core

use thiserror::Error;

/// Failure reported by a GPU layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpuError {
    #[error("buffer allocation failed: {0}")]
    Buffer(String),

    #[error("shader program error: {0}")]
    Program(String),

    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("malformed mesh: {0}")]
    InvalidMesh(String),
}

/// Main error type for viewer operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("mesh build failed: {0}")]
    MeshBuild(String),

    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    #[error("unknown menu entry: {0}")]
    UnknownMenuEntry(String),
}

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;
