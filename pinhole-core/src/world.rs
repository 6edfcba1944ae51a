/// The simulated scene: one camera and the shapes it looks at
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::geometry::Shape;

#[derive(Debug, Clone)]
pub struct World {
    camera: Camera,
    shapes: Vec<Shape>,
}

impl World {
    pub fn new(camera: Camera, shapes: Vec<Shape>) -> Self {
        Self { camera, shapes }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    /// Step every shape, then the camera, by `dt` seconds
    pub fn update(&mut self, dt: f64) -> Result<()> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(Error::InvalidTimeStep(dt));
        }

        for shape in &mut self.shapes {
            shape.update(dt);
        }
        self.camera.update(dt)
    }
}
