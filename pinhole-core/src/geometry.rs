/// Wireframe shapes and their display colour
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::transform::rotate_xyz;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const DEEP_SPACE: Color = Color::rgb(10, 10, 20);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A pair of vertex indices joined by a drawn line
pub type Edge = (usize, usize);

/// A wireframe polytope that can translate and spin about its centre
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    center: Point3<f64>,
    vertices: Vec<Point3<f64>>,
    edges: Vec<Edge>,
    color: Color,
    /// Linear velocity in world units per second
    pub velocity: Vector3<f64>,
    /// Angular velocity in degrees per second about world X, Y and Z
    pub angular_velocity: Vector3<f64>,
}

impl Shape {
    /// Create a shape, checking every edge against the vertex list
    pub fn new(
        center: Point3<f64>,
        vertices: Vec<Point3<f64>>,
        edges: Vec<Edge>,
        color: Color,
    ) -> Result<Self> {
        if let Some(&(i, j)) = edges
            .iter()
            .find(|&&(i, j)| i == j || i >= vertices.len() || j >= vertices.len())
        {
            return Err(Error::InvalidEdge(i, j, vertices.len()));
        }

        Ok(Self {
            center,
            vertices,
            edges,
            color,
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        })
    }

    /// Rotation pivot, not necessarily the centroid
    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn move_by(&mut self, displacement: &Vector3<f64>) {
        for vertex in &mut self.vertices {
            *vertex += displacement;
        }
        self.center += displacement;
    }

    /// Spin every vertex about the centre by X, then Y, then Z degrees
    pub fn rotate(&mut self, degrees: &Vector3<f64>) {
        if *degrees == Vector3::zeros() {
            return;
        }
        let center = self.center;
        for vertex in &mut self.vertices {
            *vertex = center + rotate_xyz(&(*vertex - center), degrees);
        }
    }

    /// Push every vertex away from (or towards) the centre by `factor`
    pub fn scale_about_center(&mut self, factor: f64) {
        let center = self.center;
        for vertex in &mut self.vertices {
            *vertex = center + (*vertex - center) * factor;
        }
    }

    /// Integrate both velocities over `dt` seconds
    pub fn update(&mut self, dt: f64) {
        let displacement = self.velocity * dt;
        let spin = self.angular_velocity * dt;
        self.move_by(&displacement);
        self.rotate(&spin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Shape {
        Shape::new(
            Point3::new(10.0, 0.0, 0.0),
            vec![
                Point3::new(11.0, 1.0, 0.0),
                Point3::new(9.0, 1.0, 0.0),
                Point3::new(9.0, -1.0, 0.0),
                Point3::new(11.0, -1.0, 0.0),
            ],
            vec![(0, 1), (1, 2), (2, 3), (3, 0)],
            Color::RED,
        )
        .unwrap()
    }

    fn assert_vertices_eq(a: &Shape, b: &Shape) {
        assert_relative_eq!(*a.center(), *b.center(), epsilon = 1e-9);
        for (va, vb) in a.vertices().iter().zip(b.vertices()) {
            assert_relative_eq!(*va, *vb, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_edges_rejected() {
        let vertices = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        let out_of_range = Shape::new(Point3::origin(), vertices.clone(), vec![(0, 2)], Color::RED);
        assert_eq!(out_of_range, Err(Error::InvalidEdge(0, 2, 2)));

        let self_loop = Shape::new(Point3::origin(), vertices.clone(), vec![(1, 1)], Color::RED);
        assert_eq!(self_loop, Err(Error::InvalidEdge(1, 1, 2)));

        // Repeated edges are allowed
        let repeated = Shape::new(Point3::origin(), vertices, vec![(0, 1), (1, 0)], Color::RED);
        assert!(repeated.is_ok());
    }

    #[test]
    fn test_move_round_trip() {
        let original = square();
        let mut shape = square();
        let d = Vector3::new(3.5, -2.0, 100.0);
        shape.move_by(&d);
        assert_relative_eq!(*shape.center(), Point3::new(13.5, -2.0, 100.0));
        shape.move_by(&-d);
        assert_vertices_eq(&shape, &original);
    }

    #[test]
    fn test_rotate_about_center() {
        let mut shape = square();
        shape.rotate(&Vector3::new(0.0, 0.0, 90.0));
        assert_relative_eq!(*shape.center(), Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(shape.vertices()[0], Point3::new(9.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(shape.vertices()[1], Point3::new(9.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_mixed_axis_rotation_is_not_undone_by_negation() {
        let original = square();
        let spin = Vector3::new(90.0, 90.0, 0.0);

        let mut naive = square();
        naive.rotate(&spin);
        naive.rotate(&-spin);
        let drift = (naive.vertices()[0] - original.vertices()[0]).norm();
        assert!(drift > 1e-3, "naive inverse unexpectedly round-tripped");

        // Undoing Y first, then X, restores the shape
        let mut reversed = square();
        reversed.rotate(&spin);
        reversed.rotate(&Vector3::new(0.0, -90.0, 0.0));
        reversed.rotate(&Vector3::new(-90.0, 0.0, 0.0));
        assert_vertices_eq(&reversed, &original);
    }

    #[test]
    fn test_scale_about_center() {
        let mut shape = square();
        shape.scale_about_center(2.0);
        assert_relative_eq!(shape.vertices()[0], Point3::new(12.0, 2.0, 0.0));
        assert_relative_eq!(*shape.center(), Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_update() {
        let mut shape = square();
        shape.velocity = Vector3::new(2.0, 0.0, 0.0);
        shape.angular_velocity = Vector3::new(0.0, 0.0, 180.0);
        shape.update(0.5);

        assert_relative_eq!(*shape.center(), Point3::new(11.0, 0.0, 0.0));
        // Moved by +1 in x, then a quarter turn about the new centre
        assert_relative_eq!(shape.vertices()[0], Point3::new(10.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
