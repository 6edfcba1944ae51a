/// Platonic solid factory
///
/// Vertex tables are the standard Cartesian coordinates of each solid
/// centred on the origin. `make_shape` rescales them to a circumscribed
/// radius and moves them into place.
use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;

use crate::error::{Error, Result};
use crate::geometry::{Color, Edge, Shape};

pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// The five platonic solids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Solid {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
}

impl Solid {
    pub const ALL: [Solid; 5] = [
        Solid::Tetrahedron,
        Solid::Cube,
        Solid::Octahedron,
        Solid::Dodecahedron,
        Solid::Icosahedron,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Solid::Tetrahedron => "tetrahedron",
            Solid::Cube => "cube",
            Solid::Octahedron => "octahedron",
            Solid::Dodecahedron => "dodecahedron",
            Solid::Icosahedron => "icosahedron",
        }
    }

    pub fn unit_vertices(&self) -> Vec<Point3<f64>> {
        let table: Vec<[f64; 3]> = match self {
            Solid::Tetrahedron => vec![
                [-1.0, -1.0, 1.0],
                [-1.0, 1.0, -1.0],
                [1.0, -1.0, -1.0],
                [1.0, 1.0, 1.0],
            ],
            Solid::Cube => vec![
                [-1.0, -1.0, -1.0],
                [-1.0, -1.0, 1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, 1.0, 1.0],
                [1.0, -1.0, -1.0],
                [1.0, -1.0, 1.0],
                [1.0, 1.0, -1.0],
                [1.0, 1.0, 1.0],
            ],
            Solid::Octahedron => vec![
                [-1.0, 0.0, 0.0],
                [0.0, -1.0, 0.0],
                [0.0, 0.0, -1.0],
                [0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
            ],
            Solid::Dodecahedron => {
                const P: f64 = GOLDEN_RATIO;
                const Q: f64 = 1.0 / GOLDEN_RATIO;
                vec![
                    [-P, 0.0, -Q],
                    [-P, 0.0, Q],
                    [-1.0, -1.0, -1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                    [-1.0, 1.0, 1.0],
                    [-Q, -P, 0.0],
                    [-Q, P, 0.0],
                    [0.0, -Q, -P],
                    [0.0, -Q, P],
                    [0.0, Q, -P],
                    [0.0, Q, P],
                    [Q, -P, 0.0],
                    [Q, P, 0.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                    [P, 0.0, -Q],
                    [P, 0.0, Q],
                ]
            }
            Solid::Icosahedron => {
                const P: f64 = GOLDEN_RATIO;
                vec![
                    [-P, 0.0, -1.0],
                    [-P, 0.0, 1.0],
                    [-1.0, -P, 0.0],
                    [-1.0, P, 0.0],
                    [0.0, -1.0, -P],
                    [0.0, -1.0, P],
                    [0.0, 1.0, -P],
                    [0.0, 1.0, P],
                    [1.0, -P, 0.0],
                    [1.0, P, 0.0],
                    [P, 0.0, -1.0],
                    [P, 0.0, 1.0],
                ]
            }
        };

        table.into_iter().map(|[x, y, z]| Point3::new(x, y, z)).collect()
    }

    pub fn edges(&self) -> Vec<Edge> {
        let table: &[Edge] = match self {
            Solid::Tetrahedron => &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
            Solid::Cube => &[
                (0, 1), (0, 2), (0, 4), (1, 3), (1, 5), (2, 3),
                (2, 6), (3, 7), (4, 5), (4, 6), (5, 7), (6, 7),
            ],
            Solid::Octahedron => &[
                (0, 1), (0, 2), (0, 3), (0, 4), (1, 2), (1, 3),
                (1, 5), (2, 4), (2, 5), (3, 4), (3, 5), (4, 5),
            ],
            Solid::Dodecahedron => &[
                (0, 1), (0, 2), (0, 4), (1, 3), (1, 5), (2, 6),
                (2, 8), (3, 6), (3, 9), (4, 7), (4, 10), (5, 7),
                (5, 11), (6, 12), (7, 13), (8, 10), (8, 14), (9, 11),
                (9, 15), (10, 16), (11, 17), (12, 14), (12, 15), (13, 16),
                (13, 17), (14, 18), (15, 19), (16, 18), (17, 19), (18, 19),
            ],
            Solid::Icosahedron => &[
                (0, 1), (0, 2), (0, 3), (0, 4), (0, 6), (1, 2),
                (1, 3), (1, 5), (1, 7), (2, 4), (2, 5), (2, 8),
                (3, 6), (3, 7), (3, 9), (4, 6), (4, 8), (4, 10),
                (5, 7), (5, 8), (5, 11), (6, 9), (6, 10), (7, 9),
                (7, 11), (8, 10), (8, 11), (9, 10), (9, 11), (10, 11),
            ],
        };

        table.to_vec()
    }
}

impl fmt::Display for Solid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Solid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Solid::ALL
            .into_iter()
            .find(|solid| solid.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownShape(s.to_string()))
    }
}

/// Build `solid` with its circumscribed sphere of `radius` centred at `position`
pub fn make_shape(solid: Solid, position: Point3<f64>, radius: f64, color: Color) -> Result<Shape> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "{solid} radius must be positive, got {radius}"
        )));
    }

    let mut shape = Shape::new(Point3::origin(), solid.unit_vertices(), solid.edges(), color)?;

    let farthest = shape
        .vertices()
        .iter()
        .map(|v| v.coords.norm())
        .fold(0.0, f64::max);
    shape.scale_about_center(radius / farthest);
    shape.move_by(&position.coords);

    log::debug!("made {solid} at {position} with radius {radius}");
    Ok(shape)
}

/// Same as [`make_shape`], looking the solid up by name first
pub fn make_named_shape(
    name: &str,
    position: Point3<f64>,
    radius: f64,
    color: Color,
) -> Result<Shape> {
    make_shape(name.parse()?, position, radius, color)
}
