//! Tapered cylinder along +z

use super::{normalize_or, subdivisions, Geometry, GeometrySource};
use crate::foundation::math::{constants::TAU, utils::lerp, Vec3};

/// Open cylinder from radius `base` at z = 0 to radius `top` at z = `height`
///
/// The lateral surface only; caps are not generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Radius at z = 0
    pub base: f32,
    /// Radius at z = height
    pub top: f32,
    /// Length along z
    pub height: f32,
    /// Subdivisions around z
    pub slices: u32,
    /// Subdivisions along z
    pub stacks: u32,
}

impl Cylinder {
    /// Create a cylinder
    pub const fn new(base: f32, top: f32, height: f32, slices: u32, stacks: u32) -> Self {
        Self {
            base,
            top,
            height,
            slices,
            stacks,
        }
    }
}

impl GeometrySource for Cylinder {
    fn generate(&self) -> Geometry {
        let slices = subdivisions(self.slices);
        let stacks = subdivisions(self.stacks);
        let ring = slices + 1;
        let mut geometry = Geometry::for_grid(slices, stacks);

        for stack in 0..=stacks {
            let t = stack as f32 / stacks as f32;
            let radius = lerp(self.base, self.top, t);
            let z = self.height * t;

            for slice in 0..=slices {
                let s = slice as f32 / slices as f32;
                let (sin, cos) = (TAU * s).sin_cos();
                let normal = normalize_or(
                    Vec3::new(self.height * cos, self.height * sin, self.base - self.top),
                    [cos, sin, 0.0],
                );
                geometry.push_vertex([radius * cos, radius * sin, z], normal, [s, 1.0 - t]);
            }
        }

        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * ring + slice;
                let b = a + ring;
                geometry.indices.push([a, a + 1, b]);
                geometry.indices.push([a + 1, b + 1, b]);
            }
        }

        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_cylinder_counts() {
        let geometry = Cylinder::new(1.0, 1.0, 2.0, 12, 4).generate();
        assert_eq!(geometry.vertex_count(), 13 * 5);
        assert_eq!(geometry.triangle_count(), 2 * 12 * 4);
    }

    #[test]
    fn test_straight_cylinder_normals_are_radial() {
        let geometry = Cylinder::new(1.0, 1.0, 2.0, 8, 1).generate();
        for (vertex, normal) in geometry.vertices.iter().zip(&geometry.normals) {
            assert_relative_eq!(normal[0], vertex[0], epsilon = 1e-5);
            assert_relative_eq!(normal[1], vertex[1], epsilon = 1e-5);
            assert_relative_eq!(normal[2], 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_cone_normal_tilts_up() {
        let geometry = Cylinder::new(1.0, 0.0, 1.0, 4, 1).generate();

        let normal = geometry.normals[0];
        assert_relative_eq!(normal[0], FRAC_1_SQRT_2, epsilon = 1e-5);
        assert_relative_eq!(normal[1], 0.0, epsilon = 1e-5);
        assert_relative_eq!(normal[2], FRAC_1_SQRT_2, epsilon = 1e-5);

        // Apex ring collapses to the axis
        let apex = geometry.vertices[5];
        assert_relative_eq!(apex[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(apex[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_outward_winding() {
        let geometry = Cylinder::new(1.0, 1.0, 1.0, 16, 2).generate();
        for &[a, b, c] in &geometry.indices {
            let p = |i: u32| Vec3::from(geometry.vertices[i as usize]);
            let face = (p(b) - p(a)).cross(&(p(c) - p(a)));
            let centroid = (p(a) + p(b) + p(c)) / 3.0;
            let radial = Vec3::new(centroid.x, centroid.y, 0.0);
            assert!(face.dot(&radial) > 0.0);
        }
    }
}
