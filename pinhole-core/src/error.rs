//! Error types for pinhole

use thiserror::Error;

use crate::controller::{CamEvent, Deflection};

/// Main error type for pinhole operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Unknown shape name: '{0}'")]
    UnknownShape(String),

    #[error("Duplicate transition: {trigger:?} already defined for state {state:?}")]
    DuplicateTransition { state: Deflection, trigger: CamEvent },

    #[error("Invalid edge ({0}, {1}) for a shape with {2} vertices")]
    InvalidEdge(usize, usize, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid time step: {0}")]
    InvalidTimeStep(f64),
}

/// Result type alias for pinhole operations
pub type Result<T> = std::result::Result<T, Error>;
