//! Latitude/longitude sphere centered at the origin

use super::{subdivisions, Geometry, GeometrySource};
use crate::foundation::math::constants::{PI, TAU};

/// Sphere with `slices` meridian divisions and `stacks` parallel divisions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Radius
    pub radius: f32,
    /// Subdivisions around z
    pub slices: u32,
    /// Subdivisions from pole to pole
    pub stacks: u32,
}

impl Sphere {
    /// Create a sphere
    pub const fn new(radius: f32, slices: u32, stacks: u32) -> Self {
        Self {
            radius,
            slices,
            stacks,
        }
    }
}

impl GeometrySource for Sphere {
    fn generate(&self) -> Geometry {
        let slices = subdivisions(self.slices);
        let stacks = subdivisions(self.stacks);
        let ring = slices + 1;
        let mut geometry = Geometry::for_grid(slices, stacks);

        for stack in 0..=stacks {
            let t = stack as f32 / stacks as f32;
            let (sin_phi, cos_phi) = (PI * t).sin_cos();

            for slice in 0..=slices {
                let s = slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = (TAU * s).sin_cos();
                let normal = [sin_phi * cos_theta, sin_phi * sin_theta, cos_phi];
                let position = normal.map(|component| component * self.radius);
                geometry.push_vertex(position, normal, [s, t]);
            }
        }

        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * ring + slice;
                let b = a + ring;
                geometry.indices.push([a, b, a + 1]);
                geometry.indices.push([a + 1, b, b + 1]);
            }
        }

        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_counts() {
        let geometry = Sphere::new(2.0, 10, 6).generate();
        assert_eq!(geometry.vertex_count(), 11 * 7);
        assert_eq!(geometry.triangle_count(), 2 * 10 * 6);
    }

    #[test]
    fn test_vertices_on_surface() {
        let geometry = Sphere::new(2.5, 7, 5).generate();
        for (vertex, normal) in geometry.vertices.iter().zip(&geometry.normals) {
            let length = vertex.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert_relative_eq!(length, 2.5, epsilon = 1e-5);
            for axis in 0..3 {
                assert_relative_eq!(normal[axis] * 2.5, vertex[axis], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_poles() {
        let geometry = Sphere::new(1.0, 4, 2).generate();
        assert_relative_eq!(geometry.vertices[0][2], 1.0, epsilon = 1e-6);
        assert_relative_eq!(geometry.vertices.last().unwrap()[2], -1.0, epsilon = 1e-6);
    }
}
