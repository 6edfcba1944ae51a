//! Pinhole Core Library - camera model, wireframe shapes and projection
//!
//! This library holds the simulation and projection logic: a pinhole camera
//! flown by per-axis input state machines, platonic solids, and the
//! painter's-order projection of a world onto a 2D screen.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod solids;
pub mod transform;
pub mod world;

// Re-export commonly used types
pub use camera::Camera;
pub use config::{CameraConfig, Config, ControlsConfig, DisplayConfig, Placement};
pub use controller::{Axis, CamEvent, CameraController, Deflection};
pub use error::{Error, Result};
pub use geometry::{Color, Edge, Shape};
pub use projection::{Frame, Projector, Segment};
pub use solids::Solid;
pub use transform::Turn;
pub use world::World;
