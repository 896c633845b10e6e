//! Omni and spot lights

use super::material::Color;
use crate::foundation::math::{Vec3, Vec4};

/// Constant, linear and quadratic attenuation factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    /// Constant term
    pub constant: f32,
    /// Linear term
    pub linear: f32,
    /// Quadratic term
    pub quadratic: f32,
}

impl Attenuation {
    /// Create attenuation factors, checking the single-term rule
    ///
    /// Exactly one term must be 1 and the other two must be 0.
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Result<Self, &'static str> {
        let terms = [constant, linear, quadratic];
        if terms.iter().filter(|&&t| t != 0.0).count() > 1 {
            return Err("only one attenuation value can be nonzero");
        }
        if !terms.contains(&1.0) {
            return Err("one attenuation value needs to be 1");
        }
        Ok(Self {
            constant,
            linear,
            quadratic,
        })
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

/// Light-specific parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Point or directional light
    Omni,
    /// Cone light
    Spot {
        /// Cutoff angle in degrees
        angle: f32,
        /// Falloff exponent
        exponent: f32,
        /// Point the cone aims at
        target: Vec3,
    },
}

/// Light declared in the lights block
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Whether the light starts switched on
    pub enabled: bool,
    /// Omni or spot parameters
    pub kind: LightKind,
    /// Homogeneous position; `w = 0` is a direction
    pub location: Vec4,
    /// Ambient color
    pub ambient: Color,
    /// Diffuse color
    pub diffuse: Color,
    /// Specular color
    pub specular: Color,
    /// Distance attenuation
    pub attenuation: Attenuation,
}

impl Light {
    /// Document tag for this light's kind
    pub const fn tag(&self) -> &'static str {
        match self.kind {
            LightKind::Omni => "omni",
            LightKind::Spot { .. } => "spot",
        }
    }

    /// Whether the location is a direction rather than a point
    pub fn is_directional(&self) -> bool {
        self.location.w == 0.0
    }

    /// Normalized spot direction, if this is a spot light at a finite position
    pub fn spot_direction(&self) -> Option<Vec3> {
        match &self.kind {
            LightKind::Spot { target, .. } => (target - self.location.xyz()).try_normalize(f32::EPSILON),
            LightKind::Omni => None,
        }
    }
}
