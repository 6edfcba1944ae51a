/// Vector rotations and the camera's turn state
use nalgebra::{Rotation3, Unit, Vector3};

use crate::error::{Error, Result};

/// Vectors shorter than this are treated as zero
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Angular displacement of the camera (in degrees)
///
/// `yaw` turns about image_y, `pitch` about image_x and `roll` about the
/// orientation, applied in that order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Turn {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Turn {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            roll: self.roll * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.yaw == 0.0 && self.pitch == 0.0 && self.roll == 0.0
    }
}

/// Normalize `v`, failing on (near) zero length
pub fn try_normalize(v: &Vector3<f64>) -> Result<Vector3<f64>> {
    v.try_normalize(DEGENERATE_EPSILON).ok_or_else(|| {
        Error::DegenerateGeometry(format!("cannot normalize near-zero vector {:?}", v.as_slice()))
    })
}

/// Rotate `v` by `degrees` about an arbitrary `axis` (right-hand rule)
pub fn rotate_about(v: &Vector3<f64>, axis: &Vector3<f64>, degrees: f64) -> Result<Vector3<f64>> {
    if degrees == 0.0 {
        return Ok(*v);
    }
    let axis = Unit::try_new(*axis, DEGENERATE_EPSILON).ok_or_else(|| {
        Error::DegenerateGeometry(format!("rotation axis {:?} has no direction", axis.as_slice()))
    })?;
    Ok(Rotation3::from_axis_angle(&axis, degrees.to_radians()) * v)
}

/// Rotate `v` about the world X, then Y, then Z axes (in degrees)
///
/// Three sequential single-axis rotations, not one combined rotation, so the
/// order of the components matters.
pub fn rotate_xyz(v: &Vector3<f64>, degrees: &Vector3<f64>) -> Vector3<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.x.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.y.to_radians());
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.z.to_radians());

    rz * (ry * (rx * v))
}
