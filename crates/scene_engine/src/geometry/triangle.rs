//! Triangle from three explicit points

use super::{normalize_or, Geometry, GeometrySource};
use crate::foundation::math::Vec3;

/// Triangle with vertices in counter-clockwise order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub p1: [f32; 3],
    /// Second vertex
    pub p2: [f32; 3],
    /// Third vertex
    pub p3: [f32; 3],
}

impl Triangle {
    /// Create a triangle from three points
    pub const fn new(p1: [f32; 3], p2: [f32; 3], p3: [f32; 3]) -> Self {
        Self { p1, p2, p3 }
    }

    fn points(&self) -> [Vec3; 3] {
        [self.p1, self.p2, self.p3].map(Vec3::from)
    }

    /// Unnormalized face normal `(p2 - p1) x (p3 - p1)`
    pub fn cross(&self) -> Vec3 {
        let [p1, p2, p3] = self.points();
        (p2 - p1).cross(&(p3 - p1))
    }

    /// Whether the three points are (nearly) collinear
    pub fn is_degenerate(&self) -> bool {
        self.cross().norm() <= f32::EPSILON
    }

    /// Texture coordinates laid out from the true side lengths
    ///
    /// The first side lies along s; the third vertex is placed using the
    /// angle at the first vertex.
    fn tex_coords(&self, length_s: f32, length_t: f32) -> Vec<[f32; 2]> {
        let [p1, p2, p3] = self.points();
        let a = (p2 - p1).norm();
        let b = (p3 - p2).norm();
        let c = (p1 - p3).norm();

        let cos_alpha = if a * c > 0.0 {
            ((a * a - b * b + c * c) / (2.0 * a * c)).clamp(-1.0, 1.0)
        } else {
            1.0
        };
        let sin_alpha = (1.0 - cos_alpha * cos_alpha).sqrt();

        vec![
            [0.0, 0.0],
            [a / length_s, 0.0],
            [c * cos_alpha / length_s, c * sin_alpha / length_t],
        ]
    }
}

impl GeometrySource for Triangle {
    fn generate(&self) -> Geometry {
        let normal = normalize_or(self.cross(), [0.0, 0.0, 1.0]);
        let mut geometry = Geometry::with_capacity(3, 1);
        for (point, tex_coord) in [self.p1, self.p2, self.p3]
            .into_iter()
            .zip(self.tex_coords(1.0, 1.0))
        {
            geometry.push_vertex(point, normal, tex_coord);
        }
        geometry.indices.push([0, 1, 2]);
        geometry
    }

    fn scaled_tex_coords(&self, length_s: f32, length_t: f32) -> Option<Vec<[f32; 2]>> {
        Some(self.tex_coords(length_s, length_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_face_normal() {
        let triangle = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]);
        let geometry = triangle.generate();

        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.indices, vec![[0, 1, 2]]);
        for normal in &geometry.normals {
            assert_relative_eq!(normal[1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_right_triangle_tex_coords() {
        let triangle = Triangle::new([0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 4.0, 0.0]);
        let tex_coords = triangle.scaled_tex_coords(1.0, 2.0).unwrap();

        assert_relative_eq!(tex_coords[1][0], 3.0, epsilon = 1e-5);
        assert_relative_eq!(tex_coords[2][0], 0.0, epsilon = 1e-5);
        assert_relative_eq!(tex_coords[2][1], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_detection() {
        let collinear = Triangle::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        assert!(collinear.is_degenerate());

        let proper = Triangle::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(!proper.is_degenerate());
    }
}
