/// Pinhole camera: aperture, image-plane basis and focal length
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::transform::{rotate_about, try_normalize, Turn};

/// Tolerance used when validating a caller-supplied basis
const BASIS_TOLERANCE: f64 = 1e-9;

/// Camera modelled as a pinhole in front of a finite image plane
///
/// `image_x` and `image_y` are unit length, orthogonal, and span the image
/// plane. `orientation` is the plane's normal, cached from
/// `normalize(image_y × image_x)` after every basis mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    aperture: Point3<f64>,
    image_x: Vector3<f64>,
    image_y: Vector3<f64>,
    orientation: Vector3<f64>,
    focal_length: f64,
    /// Linear velocity in world units per second
    pub velocity: Vector3<f64>,
    /// Angular velocity in degrees per second
    pub angular_velocity: Turn,
}

impl Camera {
    /// Default basis looking down +X, with screen-right along -Y and screen-up along +Z
    pub fn new(aperture: Point3<f64>, focal_length: f64) -> Result<Self> {
        Self::with_basis(
            aperture,
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            focal_length,
        )
    }

    pub fn with_basis(
        aperture: Point3<f64>,
        image_x: Vector3<f64>,
        image_y: Vector3<f64>,
        focal_length: f64,
    ) -> Result<Self> {
        if !(focal_length.is_finite() && focal_length > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "focal length must be positive, got {focal_length}"
            )));
        }
        if (image_x.norm() - 1.0).abs() > BASIS_TOLERANCE
            || (image_y.norm() - 1.0).abs() > BASIS_TOLERANCE
            || image_x.dot(&image_y).abs() > BASIS_TOLERANCE
        {
            return Err(Error::InvalidConfig(
                "image_x and image_y must be orthonormal".to_string(),
            ));
        }

        Ok(Self {
            aperture,
            image_x,
            image_y,
            orientation: calculate_orientation(&image_x, &image_y)?,
            focal_length,
            velocity: Vector3::zeros(),
            angular_velocity: Turn::zero(),
        })
    }

    pub fn aperture(&self) -> &Point3<f64> {
        &self.aperture
    }

    pub fn image_x(&self) -> &Vector3<f64> {
        &self.image_x
    }

    pub fn image_y(&self) -> &Vector3<f64> {
        &self.image_y
    }

    /// Forward direction, normal to the image plane
    pub fn orientation(&self) -> &Vector3<f64> {
        &self.orientation
    }

    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    pub fn move_by(&mut self, displacement: &Vector3<f64>) {
        self.aperture += displacement;
    }

    /// Turn the camera by yaw, then pitch, then roll
    ///
    /// Yaw spins image_x about the current image_y, pitch spins image_y about
    /// the yawed image_x, and roll spins both about the orientation derived
    /// from the yawed and pitched basis. Nothing is committed unless every
    /// step succeeds.
    pub fn rotate(&mut self, turn: &Turn) -> Result<()> {
        if turn.is_zero() {
            return Ok(());
        }

        let image_x = rotate_about(&self.image_x, &self.image_y, turn.yaw)?;
        let image_y = rotate_about(&self.image_y, &image_x, turn.pitch)?;
        let orientation = calculate_orientation(&image_x, &image_y)?;

        let image_x = rotate_about(&image_x, &orientation, turn.roll)?;
        let image_y = rotate_about(&image_y, &orientation, turn.roll)?;
        let orientation = calculate_orientation(&image_x, &image_y)?;

        self.image_x = image_x;
        self.image_y = image_y;
        self.orientation = orientation;
        Ok(())
    }

    /// Integrate both velocities over `dt` seconds
    pub fn update(&mut self, dt: f64) -> Result<()> {
        let displacement = self.velocity * dt;
        let turn = self.angular_velocity.scaled(dt);
        self.move_by(&displacement);
        self.rotate(&turn)
    }
}

fn calculate_orientation(image_x: &Vector3<f64>, image_y: &Vector3<f64>) -> Result<Vector3<f64>> {
    try_normalize(&image_y.cross(image_x))
}
