//! Embedded deformation graph for non-rigid surface deformation:
//! - sparse control nodes carrying free 3x3 rotations and translations
//! - rigidity and smoothness residual blocks for an external
//!   Gauss-Newton / Levenberg-Marquardt solver
//! - piecewise mapping of full-resolution positions and normals
//! - sample simplification and mesh-file helpers for graph construction

pub mod asset;
pub mod graph;
pub mod mapping;
pub mod prelude;

pub use graph::node::{Node, NodeId};
pub use graph::DeformationGraph;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sample parse error: {0}")]
    SampleParse(String),

    #[error("model parse error: {0}")]
    ModelParse(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
