//! # Scene Engine
//!
//! A declarative scene-graph engine: scene documents are parsed into entity
//! tables, checked for reference cycles, and drawn by walking the component
//! graph against a pluggable render target.
//!
//! ## Features
//!
//! - **Document parsing**: ten-block `<sxs>` scene documents with detailed errors
//! - **Geometry**: rectangle, triangle, cylinder, sphere, torus and Bezier patch generators
//! - **Animation**: keyframe timelines with validated ordering
//! - **Composition**: iterative traversal with material, texture and transform inheritance
//! - **Background loading**: scene files read off the calling thread
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = SceneLoader::new(SceneConfig::default());
//!     let graph = loader.load_blocking("checkers.xml")?;
//!
//!     let mut composer = SceneComposer::new(&graph);
//!     let mut target = RecordingRenderer::new();
//!     let stats = composer.render(&mut target, &FrameState::default(), &NoAnimation)?;
//!     println!("{} draws", stats.draws);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod animation;
pub mod config;
pub mod document;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{Keyframe, KeyframeAnimation},
        config::{Config, SceneConfig},
        foundation::math::{Mat4, Vec3, Vec4},
        geometry::{Geometry, GeometrySource, Primitive, Shape},
        render::{GeometryHandle, RecordingRenderer, RenderError, RenderTarget, TargetId},
        scene::{
            AnimationSource, Component, FrameState, NoAnimation, RenderStats, SceneComposer,
            SceneError, SceneGraph, SceneLoader, SceneResult,
        },
    };
}
