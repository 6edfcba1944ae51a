/// Perspective projection through the pinhole camera
use nalgebra::{Point2, Point3, Vector2};

use crate::camera::Camera;
use crate::geometry::{Color, Shape};
use crate::world::World;

/// A screen-space line to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub color: Color,
    /// Rank of the owning shape in draw order; higher layers draw on top
    pub layer: usize,
}

/// Everything the surface needs to draw one frame of the world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Segments in painter's order, farthest shape first
    pub segments: Vec<Segment>,
    /// Shapes skipped because a vertex was at or behind the aperture
    pub culled: usize,
}

/// Maps world geometry onto a screen of fixed pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    screen_center: Vector2<f64>,
}

impl Projector {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            screen_center: Vector2::new(width / 2.0, height / 2.0),
        }
    }

    /// Project a world point to screen pixels
    ///
    /// Returns `None` when the point is not strictly in front of the
    /// aperture plane.
    pub fn project_point(&self, camera: &Camera, point: &Point3<f64>) -> Option<Point2<f64>> {
        let rel = point - camera.aperture();

        // orientation is unit length, so this is the distance along the view axis
        let dist = rel.dot(camera.orientation());
        if !(dist.is_finite() && dist > 0.0) {
            return None;
        }

        // similar triangles onto the plane at focal_length from the aperture
        let scaled = rel * (camera.focal_length() / dist);
        let x = scaled.dot(camera.image_x());
        let y = scaled.dot(camera.image_y());
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }

        // screen rows grow downwards
        Some(Point2::new(x, -y) + self.screen_center)
    }

    /// Project every vertex of `shape`, or nothing if any vertex is clipped
    pub fn project_shape(&self, camera: &Camera, shape: &Shape) -> Option<Vec<Point2<f64>>> {
        shape
            .vertices()
            .iter()
            .map(|vertex| self.project_point(camera, vertex))
            .collect()
    }

    /// Indices of `shapes`, farthest centre first along the view axis
    pub fn depth_order(&self, camera: &Camera, shapes: &[Shape]) -> Vec<usize> {
        let depths: Vec<f64> = shapes
            .iter()
            .map(|shape| (shape.center() - camera.aperture()).dot(camera.orientation()))
            .collect();

        let mut order: Vec<usize> = (0..shapes.len()).collect();
        order.sort_by(|&a, &b| depths[b].total_cmp(&depths[a]));
        order
    }

    /// Build the painter's-order line list for the whole world
    pub fn project_world(&self, world: &World) -> Frame {
        let camera = world.camera();
        let shapes = world.shapes();
        let mut frame = Frame::default();

        for (layer, index) in self.depth_order(camera, shapes).into_iter().enumerate() {
            let shape = &shapes[index];
            let Some(points) = self.project_shape(camera, shape) else {
                frame.culled += 1;
                continue;
            };

            frame
                .segments
                .extend(shape.edges().iter().map(|&(i, j)| Segment {
                    from: points[i],
                    to: points[j],
                    color: shape.color(),
                    layer,
                }));
        }

        if frame.culled > 0 {
            log::trace!("{} of {} shapes behind the aperture", frame.culled, shapes.len());
        }
        frame
    }
}
