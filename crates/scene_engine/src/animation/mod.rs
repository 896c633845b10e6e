//! Keyframe animation model
//!
//! An animation is a timeline of keyframes, each holding a translation,
//! per-axis rotation angles and a scale. Keyframes are kept sorted by
//! strictly increasing instant. Playback interpolation is left to callers;
//! this module only stores the data and answers which keyframe is active.

use crate::foundation::math::{utils::deg_to_rad, Axis, Mat4, Mat4Ext, Vec3};
use std::cmp::Ordering;
use thiserror::Error;

/// Problems with a keyframe sequence
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Animation without keyframes
    #[error("animation '{0}' has no keyframes")]
    Empty(String),

    /// Instants not strictly increasing
    #[error("animation '{id}': keyframe {index} at instant {instant} does not follow instant {previous}")]
    NonIncreasing {
        /// Animation id
        id: String,
        /// Position of the offending keyframe
        index: usize,
        /// Instant of the keyframe before it
        previous: f32,
        /// Offending instant
        instant: f32,
    },
}

/// One pose on an animation timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Time of this pose
    pub instant: f32,
    /// Translation
    pub translation: Vec3,
    /// Rotation angles in degrees around x, y and z
    pub rotation: Vec3,
    /// Scale factors
    pub scale: Vec3,
}

impl Keyframe {
    /// Identity pose at `instant`
    pub fn new(instant: f32) -> Self {
        Self {
            instant,
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Builder pattern: set translation
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Builder pattern: set rotation angles in degrees
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Pose matrix `T * Rz * Ry * Rx * S`
    ///
    /// Points are scaled first, rotated about x, then y, then z, and
    /// finally translated.
    pub fn matrix(&self) -> Mat4 {
        Mat4::identity()
            .translated(&self.translation)
            .rotated(Axis::Z, deg_to_rad(self.rotation.z))
            .rotated(Axis::Y, deg_to_rad(self.rotation.y))
            .rotated(Axis::X, deg_to_rad(self.rotation.x))
            .scaled(&self.scale)
    }
}

/// Ordered keyframe timeline
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeAnimation {
    id: String,
    keyframes: Vec<Keyframe>,
}

impl KeyframeAnimation {
    /// Create an animation, checking that it is non-empty and strictly increasing in time
    pub fn new(id: impl Into<String>, keyframes: Vec<Keyframe>) -> Result<Self, AnimationError> {
        let id = id.into();
        if keyframes.is_empty() {
            return Err(AnimationError::Empty(id));
        }

        for (index, pair) in keyframes.windows(2).enumerate() {
            // NaN instants fail this comparison too
            if pair[1].instant.partial_cmp(&pair[0].instant) != Some(Ordering::Greater) {
                return Err(AnimationError::NonIncreasing {
                    id,
                    index: index + 1,
                    previous: pair[0].instant,
                    instant: pair[1].instant,
                });
            }
        }

        Ok(Self { id, keyframes })
    }

    /// Animation id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Keyframes in instant order
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Number of keyframes
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false; empty animations are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// First and last instant
    pub fn span(&self) -> (f32, f32) {
        let first = self.keyframes.first().map_or(0.0, |k| k.instant);
        let last = self.keyframes.last().map_or(0.0, |k| k.instant);
        (first, last)
    }

    /// Time between the first and last keyframe
    pub fn duration(&self) -> f32 {
        let (first, last) = self.span();
        last - first
    }

    /// Latest keyframe whose instant is at or before `time`
    ///
    /// Times before the first keyframe clamp to the first keyframe.
    pub fn keyframe_at(&self, time: f32) -> Option<&Keyframe> {
        let after = self.keyframes.partition_point(|k| k.instant <= time);
        self.keyframes.get(after.saturating_sub(1))
    }

    /// Pose matrix of the keyframe active at `time`
    pub fn matrix_at(&self, time: f32) -> Mat4 {
        self.keyframe_at(time).map_or_else(Mat4::identity, Keyframe::matrix)
    }
}
