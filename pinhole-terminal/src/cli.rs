/// Command line arguments
use clap::Parser;
use nalgebra::Point3;
use pinhole_core::{Color, Config, Error, Placement, Solid};

/// Colours handed out to shapes placed from the command line, in order
const PALETTE: [Color; 6] = [
    Color::RED,
    Color::BLUE,
    Color::GREEN,
    Color::YELLOW,
    Color::CYAN,
    Color::MAGENTA,
];

const DEFAULT_RADIUS: f64 = 100.0;

#[derive(Parser, Debug)]
#[command(
    name = "pinhole-terminal",
    about = "Fly a pinhole camera around wireframe platonic solids in the terminal"
)]
pub struct Args {
    /// Virtual screen width in pixels
    #[arg(long)]
    pub width: Option<f64>,

    /// Virtual screen height in pixels
    #[arg(long)]
    pub height: Option<f64>,

    /// Target frames per second
    #[arg(long)]
    pub fps: Option<f64>,

    /// Distance from the aperture to the image plane; larger narrows the view
    #[arg(long)]
    pub focal_length: Option<f64>,

    /// Degrees of turn per pixel of mouse motion
    #[arg(long)]
    pub look_sensitivity: Option<f64>,

    /// Camera speed in world units per second
    #[arg(long)]
    pub speed: Option<f64>,

    /// Camera roll speed in degrees per second
    #[arg(long)]
    pub roll_speed: Option<f64>,

    /// Place a solid, e.g. `cube@600,0,0` or `icosahedron@600,300,0:50`.
    /// Replaces the default scene; may be repeated.
    #[arg(long = "shape", value_name = "NAME@X,Y,Z[:RADIUS]", value_parser = parse_shape)]
    pub shapes: Vec<ShapeArg>,
}

/// A solid requested on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeArg {
    pub solid: Solid,
    pub position: Point3<f64>,
    pub radius: f64,
}

pub fn parse_shape(s: &str) -> Result<ShapeArg, Error> {
    let invalid = || Error::InvalidConfig(format!("expected NAME@X,Y,Z[:RADIUS], got '{s}'"));

    let (name, rest) = s.split_once('@').ok_or_else(invalid)?;
    let solid: Solid = name.parse()?;

    let (coords, radius) = match rest.split_once(':') {
        Some((coords, radius)) => (coords, radius.trim().parse().map_err(|_| invalid())?),
        None => (rest, DEFAULT_RADIUS),
    };
    let coords = coords
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    let [x, y, z] = coords[..] else {
        return Err(invalid());
    };

    Ok(ShapeArg {
        solid,
        position: Point3::new(x, y, z),
        radius,
    })
}

impl Args {
    /// Overlay the given options on the default configuration
    pub fn into_config(self) -> Config {
        let mut config = Config::default();

        if let Some(width) = self.width {
            config.display.width = width;
        }
        if let Some(height) = self.height {
            config.display.height = height;
        }
        if let Some(fps) = self.fps {
            config.display.target_frame_rate = fps;
        }
        if let Some(focal_length) = self.focal_length {
            config.camera.focal_length = focal_length;
        }
        if let Some(look_sensitivity) = self.look_sensitivity {
            config.controls.look_sensitivity = look_sensitivity;
        }
        if let Some(speed) = self.speed {
            config.controls.speed = speed;
        }
        if let Some(roll_speed) = self.roll_speed {
            config.controls.roll_speed = roll_speed;
        }

        if !self.shapes.is_empty() {
            config.scene = self
                .shapes
                .into_iter()
                .zip(PALETTE.iter().cycle())
                .map(|(shape, &color)| Placement::new(shape.solid, shape.position, shape.radius, color))
                .collect();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape() {
        assert_eq!(
            parse_shape("cube@600,0,-5").unwrap(),
            ShapeArg {
                solid: Solid::Cube,
                position: Point3::new(600.0, 0.0, -5.0),
                radius: DEFAULT_RADIUS,
            }
        );
        assert_eq!(parse_shape("octahedron@1, 2, 3:50").unwrap().radius, 50.0);
    }

    #[test]
    fn test_parse_shape_errors() {
        assert_eq!(
            parse_shape("torus@0,0,0"),
            Err(Error::UnknownShape("torus".to_string()))
        );
        assert!(matches!(parse_shape("cube"), Err(Error::InvalidConfig(_))));
        assert!(matches!(parse_shape("cube@1,2"), Err(Error::InvalidConfig(_))));
        assert!(matches!(parse_shape("cube@1,2,x"), Err(Error::InvalidConfig(_))));
        assert!(matches!(parse_shape("cube@1,2,3:big"), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pinhole-terminal"]).unwrap();
        assert_eq!(args.into_config(), Config::default());
    }

    #[test]
    fn test_overrides_and_scene() {
        let args = Args::try_parse_from([
            "pinhole-terminal",
            "--focal-length",
            "720",
            "--fps",
            "30",
            "--shape",
            "cube@300,0,0",
            "--shape",
            "tetrahedron@300,100,0:20",
        ])
        .unwrap();
        let config = args.into_config();

        assert_eq!(config.camera.focal_length, 720.0);
        assert_eq!(config.display.target_frame_rate, 30.0);
        assert_eq!(config.scene.len(), 2);
        assert_eq!(config.scene[0].color, Color::RED);
        assert_eq!(config.scene[1].solid, Solid::Tetrahedron);
        assert_eq!(config.scene[1].radius, 20.0);
    }

    #[test]
    fn test_bad_shape_is_a_parse_error() {
        assert!(Args::try_parse_from(["pinhole-terminal", "--shape", "sphere@0,0,0"]).is_err());
    }
}
