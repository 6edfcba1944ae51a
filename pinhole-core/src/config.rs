/// Startup configuration: display, camera, controls and the initial scene
use nalgebra::Point3;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::solids::{make_shape, Solid};
use crate::world::World;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Virtual screen size in pixels; the surface scales it to fit
    pub width: f64,
    pub height: f64,
    pub target_frame_rate: f64,
    pub background: Color,
    pub ui_color: Color,
    pub crosshair_size: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 720.0,
            target_frame_rate: 100.0,
            background: Color::DEEP_SPACE,
            ui_color: Color::WHITE,
            crosshair_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub aperture: Point3<f64>,
    pub focal_length: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aperture: Point3::origin(),
            focal_length: 360.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlsConfig {
    /// Degrees of turn per pixel of mouse motion
    pub look_sensitivity: f64,
    /// World units per second
    pub speed: f64,
    /// Degrees per second
    pub roll_speed: f64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            look_sensitivity: 0.1,
            speed: 400.0,
            roll_speed: 90.0,
        }
    }
}

/// A solid to place in the scene at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub solid: Solid,
    pub position: Point3<f64>,
    /// Circumscribed sphere radius
    pub radius: f64,
    pub color: Color,
}

impl Placement {
    pub fn new(solid: Solid, position: Point3<f64>, radius: f64, color: Color) -> Self {
        Self {
            solid,
            position,
            radius,
            color,
        }
    }
}

/// One of each solid in a row in front of the default camera
pub fn default_scene() -> Vec<Placement> {
    vec![
        Placement::new(Solid::Tetrahedron, Point3::new(600.0, -600.0, 0.0), 100.0, Color::RED),
        Placement::new(Solid::Cube, Point3::new(600.0, -300.0, 0.0), 100.0, Color::BLUE),
        Placement::new(Solid::Octahedron, Point3::new(600.0, 0.0, 0.0), 100.0, Color::GREEN),
        Placement::new(Solid::Dodecahedron, Point3::new(600.0, 300.0, 0.0), 100.0, Color::YELLOW),
        Placement::new(Solid::Icosahedron, Point3::new(600.0, 600.0, 0.0), 100.0, Color::CYAN),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub display: DisplayConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub scene: Vec<Placement>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            scene: default_scene(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("display width", self.display.width),
            ("display height", self.display.height),
            ("target frame rate", self.display.target_frame_rate),
            ("focal length", self.camera.focal_length),
            ("speed", self.controls.speed),
            ("roll speed", self.controls.roll_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("look sensitivity", self.controls.look_sensitivity),
            ("crosshair size", self.display.crosshair_size),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!("{name} must not be negative, got {value}")));
            }
        }

        if let Some(placement) = self.scene.iter().find(|p| !(p.radius.is_finite() && p.radius > 0.0)) {
            return Err(Error::InvalidConfig(format!(
                "{} radius must be positive, got {}",
                placement.solid, placement.radius
            )));
        }
        if !self.camera.aperture.coords.iter().all(|c| c.is_finite())
            || self.scene.iter().any(|p| !p.position.coords.iter().all(|c| c.is_finite()))
        {
            return Err(Error::InvalidConfig("positions must be finite".to_string()));
        }

        Ok(())
    }

    /// Validate, then build the camera and every placed solid
    pub fn build_world(&self) -> Result<World> {
        self.validate()?;

        let camera = Camera::new(self.camera.aperture, self.camera.focal_length)?;
        let shapes = self
            .scene
            .iter()
            .map(|p| make_shape(p.solid, p.position, p.radius, p.color))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "built world with {} shapes, camera at {} (focal length {})",
            shapes.len(),
            self.camera.aperture,
            self.camera.focal_length
        );
        Ok(World::new(camera, shapes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let world = config.build_world().unwrap();
        assert_eq!(world.shapes().len(), 5);
        assert_eq!(world.camera().focal_length(), 360.0);
        assert_eq!(world.shapes()[2].center(), &Point3::new(600.0, 0.0, 0.0));
        assert_eq!(world.shapes()[4].color(), Color::CYAN);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = Config::default();
        config.camera.focal_length = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.display.target_frame_rate = -5.0;
        assert!(config.build_world().is_err());

        let mut config = Config::default();
        config.scene[3].radius = f64::NAN;
        assert!(config.build_world().is_err());

        let mut config = Config::default();
        config.controls.look_sensitivity = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scene[0].position = Point3::new(f64::INFINITY, 0.0, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_scene_is_allowed() {
        let config = Config {
            scene: Vec::new(),
            ..Config::default()
        };
        assert!(config.build_world().unwrap().shapes().is_empty());
    }
}
