//! Axis-aligned rectangle in the z = 0 plane

use super::{Geometry, GeometrySource};

const NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Rectangle spanning the corners `(x1, y1)` and `(x2, y2)`
///
/// Callers guarantee `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Lower-left x
    pub x1: f32,
    /// Lower-left y
    pub y1: f32,
    /// Upper-right x
    pub x2: f32,
    /// Upper-right y
    pub y2: f32,
}

impl Rectangle {
    /// Create a rectangle from its two corners
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width along x
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height along y
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    fn tex_coords(s: f32, t: f32) -> Vec<[f32; 2]> {
        vec![[0.0, t], [s, t], [0.0, 0.0], [s, 0.0]]
    }
}

impl GeometrySource for Rectangle {
    fn generate(&self) -> Geometry {
        let mut geometry = Geometry::with_capacity(4, 2);
        let tex_coords = Self::tex_coords(1.0, 1.0);
        let corners = [
            [self.x1, self.y1, 0.0],
            [self.x2, self.y1, 0.0],
            [self.x1, self.y2, 0.0],
            [self.x2, self.y2, 0.0],
        ];
        for (corner, tex_coord) in corners.into_iter().zip(tex_coords) {
            geometry.push_vertex(corner, NORMAL, tex_coord);
        }
        geometry.indices.extend([[0, 1, 2], [1, 3, 2]]);
        geometry
    }

    fn scaled_tex_coords(&self, length_s: f32, length_t: f32) -> Option<Vec<[f32; 2]>> {
        Some(Self::tex_coords(self.width() / length_s, self.height() / length_t))
    }
}
