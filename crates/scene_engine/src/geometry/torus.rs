//! Torus around the z axis

use super::{subdivisions, Geometry, GeometrySource};
use crate::foundation::math::constants::TAU;

/// Torus with tube radius `inner` swept at distance `outer` from the axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Torus {
    /// Tube radius
    pub inner: f32,
    /// Distance from the z axis to the tube center
    pub outer: f32,
    /// Subdivisions around the tube
    pub slices: u32,
    /// Subdivisions around the z axis
    pub loops: u32,
}

impl Torus {
    /// Create a torus
    pub const fn new(inner: f32, outer: f32, slices: u32, loops: u32) -> Self {
        Self {
            inner,
            outer,
            slices,
            loops,
        }
    }
}

impl GeometrySource for Torus {
    fn generate(&self) -> Geometry {
        let slices = subdivisions(self.slices);
        let loops = subdivisions(self.loops);
        let ring = slices + 1;
        let mut geometry = Geometry::for_grid(slices, loops);

        // phi sweeps the major circle, theta the tube
        for lp in 0..=loops {
            let phi = TAU * lp as f32 / loops as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            for slice in 0..=slices {
                let theta = TAU * slice as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let distance = self.outer + self.inner * cos_theta;

                geometry.push_vertex(
                    [sin_phi * distance, cos_phi * distance, self.inner * sin_theta],
                    [sin_phi * cos_theta, cos_phi * cos_theta, sin_theta],
                    [1.0 - theta / TAU, 1.0 - phi / TAU],
                );
            }
        }

        for lp in 0..loops {
            for slice in 0..slices {
                let a = lp * ring + slice;
                let b = a + ring;
                geometry.indices.push([a, a + 1, b]);
                geometry.indices.push([a + 1, b + 1, b]);
            }
        }

        geometry
    }
}
