//! Rational tensor-product Bezier patch

use super::{
    normalize_or, Geometry, GeometryError, GeometrySource, MAX_PATCH_DEGREE, MAX_SUBDIVISIONS,
};
use crate::foundation::math::{
    bezier::{bernstein, bernstein_derivative},
    Vec3,
};

/// Bezier surface sampled on a uniform `(parts_u + 1) x (parts_v + 1)` grid
///
/// Control points are homogeneous `[x, y, z, w]` stored u-major:
/// `control_points[u][v]`. The degrees follow from the grid shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    parts_u: u32,
    parts_v: u32,
    control_points: Vec<Vec<[f32; 4]>>,
}

/// Surface point and partial derivatives at one parameter pair
struct Sample {
    point: Vec3,
    du: Vec3,
    dv: Vec3,
}

impl Patch {
    /// Create a patch from a rectangular control grid
    pub fn new(
        parts_u: u32,
        parts_v: u32,
        control_points: Vec<Vec<[f32; 4]>>,
    ) -> Result<Self, GeometryError> {
        if parts_u == 0 {
            return Err(GeometryError::ZeroSubdivision("parts_u"));
        }
        if parts_v == 0 {
            return Err(GeometryError::ZeroSubdivision("parts_v"));
        }
        for (name, parts) in [("parts_u", parts_u), ("parts_v", parts_v)] {
            if parts > MAX_SUBDIVISIONS {
                return Err(GeometryError::ExcessiveSubdivision {
                    name,
                    limit: MAX_SUBDIVISIONS,
                });
            }
        }
        let columns = control_points
            .first()
            .map(Vec::len)
            .ok_or_else(|| GeometryError::InvalidControlGrid("no rows".into()))?;
        if columns == 0 {
            return Err(GeometryError::InvalidControlGrid("empty row".into()));
        }
        if let Some(row) = control_points.iter().position(|row| row.len() != columns) {
            return Err(GeometryError::InvalidControlGrid(format!(
                "row {row} has {} points, expected {columns}",
                control_points[row].len()
            )));
        }
        for (direction, points) in [("u", control_points.len()), ("v", columns)] {
            if points > MAX_PATCH_DEGREE + 1 {
                return Err(GeometryError::ExcessiveDegree {
                    direction,
                    degree: points - 1,
                    limit: MAX_PATCH_DEGREE,
                });
            }
        }

        Ok(Self {
            parts_u,
            parts_v,
            control_points,
        })
    }

    /// Degree along u
    pub fn degree_u(&self) -> usize {
        self.control_points.len() - 1
    }

    /// Degree along v
    pub fn degree_v(&self) -> usize {
        self.control_points[0].len() - 1
    }

    /// Subdivisions along u
    pub const fn parts_u(&self) -> u32 {
        self.parts_u
    }

    /// Subdivisions along v
    pub const fn parts_v(&self) -> u32 {
        self.parts_v
    }

    /// Control grid, u-major
    pub fn control_points(&self) -> &[Vec<[f32; 4]>] {
        &self.control_points
    }

    /// Evaluate the surface position at `(u, v)`
    pub fn evaluate(&self, u: f32, v: f32) -> [f32; 3] {
        let point = self.sample(u, v).point;
        [point.x, point.y, point.z]
    }

    fn sample(&self, u: f32, v: f32) -> Sample {
        let (degree_u, degree_v) = (self.degree_u(), self.degree_v());

        let mut weight = 0.0;
        let mut weight_du = 0.0;
        let mut weight_dv = 0.0;
        let mut numerator = Vec3::zeros();
        let mut numerator_du = Vec3::zeros();
        let mut numerator_dv = Vec3::zeros();

        for (i, row) in self.control_points.iter().enumerate() {
            let bu = bernstein(degree_u, i, u);
            let dbu = bernstein_derivative(degree_u, i, u);
            for (j, &[x, y, z, w]) in row.iter().enumerate() {
                let bv = bernstein(degree_v, j, v);
                let dbv = bernstein_derivative(degree_v, j, v);
                let weighted = Vec3::new(x, y, z) * w;

                weight += bu * bv * w;
                weight_du += dbu * bv * w;
                weight_dv += bu * dbv * w;
                numerator += weighted * (bu * bv);
                numerator_du += weighted * (dbu * bv);
                numerator_dv += weighted * (bu * dbv);
            }
        }

        if weight.abs() <= f32::EPSILON {
            return Sample {
                point: numerator,
                du: numerator_du,
                dv: numerator_dv,
            };
        }

        let point = numerator / weight;
        Sample {
            point,
            du: (numerator_du - point * weight_du) / weight,
            dv: (numerator_dv - point * weight_dv) / weight,
        }
    }
}

impl GeometrySource for Patch {
    fn generate(&self) -> Geometry {
        let (parts_u, parts_v) = (self.parts_u, self.parts_v);
        let row = parts_v + 1;
        let mut geometry = Geometry::for_grid(parts_u, parts_v);

        for i in 0..=parts_u {
            let u = i as f32 / parts_u as f32;
            for j in 0..=parts_v {
                let v = j as f32 / parts_v as f32;
                let Sample { point, du, dv } = self.sample(u, v);
                let normal = normalize_or(du.cross(&dv), [0.0, 0.0, 1.0]);
                geometry.push_vertex([point.x, point.y, point.z], normal, [u, 1.0 - v]);
            }
        }

        for i in 0..parts_u {
            for j in 0..parts_v {
                let a = i * row + j;
                let b = a + row;
                geometry.indices.push([a, b, a + 1]);
                geometry.indices.push([a + 1, b, b + 1]);
            }
        }

        geometry
    }
}
