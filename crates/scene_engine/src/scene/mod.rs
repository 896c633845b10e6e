//! Scene graph
//!
//! Loading a scene runs in three stages:
//!
//! ```text
//! document text
//!      ↓  parser (one module per block)
//! SceneBuilder (entity tables)
//!      ↓  child checks + cycle validation
//! SceneGraph (read-only)
//!      ↓  SceneComposer, once per frame
//! RenderTarget
//! ```
//!
//! Components own nothing but ids; the tables own every entity, so the
//! reference graph can be checked for cycles without fighting ownership.

mod camera;
mod component;
mod composer;
mod error;
mod graph;
mod light;
mod loader;
mod material;
pub mod parser;
mod table;
mod texture;
pub mod validator;

pub use camera::Camera;
pub use component::{Component, Highlight, MaterialRef, TransformSpec};
pub use composer::{AnimationSource, FrameState, NoAnimation, RenderStats, SceneComposer};
pub use error::{SceneError, SceneResult};
pub use graph::{Ambient, SceneBuilder, SceneGraph};
pub use light::{Attenuation, Light, LightKind};
pub use loader::{PendingScene, SceneLoader};
pub use material::{Color, Material};
pub use parser::{parse_scene, parse_str};
pub use table::Table;
pub use texture::{Texture, TextureBinding, TextureRef};

#[cfg(test)]
mod tests;
