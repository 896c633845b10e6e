//! Scene cameras

use crate::foundation::math::{Mat4, Vec3};
use nalgebra::Point3;

/// Camera declared in the views block
#[derive(Debug, Clone, PartialEq)]
pub enum Camera {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        angle: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
        /// Eye position
        from: Vec3,
        /// Look-at target
        to: Vec3,
    },
    /// Orthographic projection
    Orthographic {
        /// Left plane
        left: f32,
        /// Right plane
        right: f32,
        /// Top plane
        top: f32,
        /// Bottom plane
        bottom: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
        /// Eye position
        from: Vec3,
        /// Look-at target
        to: Vec3,
        /// Up vector
        up: Vec3,
    },
}

impl Camera {
    /// Eye position
    pub const fn eye(&self) -> &Vec3 {
        match self {
            Self::Perspective { from, .. } | Self::Orthographic { from, .. } => from,
        }
    }

    /// Look-at target
    pub const fn target(&self) -> &Vec3 {
        match self {
            Self::Perspective { to, .. } | Self::Orthographic { to, .. } => to,
        }
    }

    /// Up vector; perspective cameras always use +y
    pub fn up(&self) -> Vec3 {
        match self {
            Self::Perspective { .. } => Vec3::y(),
            Self::Orthographic { up, .. } => *up,
        }
    }

    /// Near and far plane distances
    pub const fn clip_range(&self) -> (f32, f32) {
        match self {
            Self::Perspective { near, far, .. } | Self::Orthographic { near, far, .. } => (*near, *far),
        }
    }

    /// Right-handed view matrix looking from `from` to `to`
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(*self.eye()),
            &Point3::from(*self.target()),
            &self.up(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::Perspective {
            angle: 0.5,
            near: 0.1,
            far: 100.0,
            from: Vec3::new(0.0, 0.0, 10.0),
            to: Vec3::zeros(),
        };

        let eye = camera.view_matrix().transform_point(&Point3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-5);
        assert_eq!(camera.clip_range(), (0.1, 100.0));
        assert_eq!(camera.up(), Vec3::y());
    }
}
