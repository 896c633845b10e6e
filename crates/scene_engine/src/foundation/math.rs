//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph, the geometry
//! generators and the composer.

pub use nalgebra::{Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Coordinate axis used by rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Parse an axis name (`x`, `y` or `z`)
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            _ => None,
        }
    }

    /// Unit vector along this axis
    pub fn unit(self) -> Unit<Vec3> {
        match self {
            Self::X => Vec3::x_axis(),
            Self::Y => Vec3::y_axis(),
            Self::Z => Vec3::z_axis(),
        }
    }

    /// Lowercase axis name
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Bernstein basis used to evaluate Bezier curves and surfaces
pub mod bezier {
    /// Binomial coefficient `n choose k` as a float
    pub fn binomial(n: usize, k: usize) -> f32 {
        if k > n {
            return 0.0;
        }
        let k = k.min(n - k);
        (0..k).fold(1.0, |acc, i| acc * (n - i) as f32 / (i + 1) as f32)
    }

    /// Bernstein polynomial `B(i, n)` evaluated at `t`
    pub fn bernstein(n: usize, i: usize, t: f32) -> f32 {
        if i > n {
            return 0.0;
        }
        binomial(n, i) * t.powi(i as i32) * (1.0 - t).powi((n - i) as i32)
    }

    /// First derivative of `B(i, n)` with respect to `t`
    pub fn bernstein_derivative(n: usize, i: usize, t: f32) -> f32 {
        if n == 0 {
            return 0.0;
        }
        let left = if i == 0 { 0.0 } else { bernstein(n - 1, i - 1, t) };
        let right = if i == n { 0.0 } else { bernstein(n - 1, i, t) };
        n as f32 * (left - right)
    }
}

/// Extension trait for Mat4 with the affine operations scene documents use
pub trait Mat4Ext {
    /// Rotation matrix around a coordinate axis (radians)
    fn rotation(axis: Axis, angle: f32) -> Mat4;

    /// Post-multiply by a translation
    fn translated(&self, offset: &Vec3) -> Mat4;

    /// Post-multiply by a rotation around a coordinate axis (radians)
    fn rotated(&self, axis: Axis, angle: f32) -> Mat4;

    /// Post-multiply by a non-uniform scale
    fn scaled(&self, factors: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation(axis: Axis, angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&axis.unit(), angle)
    }

    fn translated(&self, offset: &Vec3) -> Mat4 {
        self * Mat4::new_translation(offset)
    }

    fn rotated(&self, axis: Axis, angle: f32) -> Mat4 {
        self * Mat4::rotation(axis, angle)
    }

    fn scaled(&self, factors: &Vec3) -> Mat4 {
        self * Mat4::new_nonuniform_scaling(factors)
    }
}
