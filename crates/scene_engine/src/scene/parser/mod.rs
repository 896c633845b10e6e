//! Scene document parser
//!
//! Turns a `<sxs>` document into a validated [`SceneGraph`]. The ten
//! top-level blocks are looked up by name; a block out of its canonical
//! position only produces a warning, a missing block aborts the load.
//! Each block has its own module and writes into a shared
//! [`SceneBuilder`]; building the graph checks child references and
//! rejects cycles.

mod animations;
mod appearance;
pub mod attributes;
mod components;
mod lights;
mod primitives;
mod transforms;
mod views;

use crate::config::SceneConfig;
use crate::document::{parse_document, Element};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::{SceneBuilder, SceneGraph};
use attributes as attr;

/// Document root tag
pub const ROOT_TAG: &str = "sxs";

/// Top-level blocks in canonical order
pub const BLOCKS: [&str; 10] = [
    "scene",
    "views",
    "ambient",
    "lights",
    "textures",
    "materials",
    "transformations",
    "primitives",
    "animations",
    "components",
];

/// Parse document text into a scene graph
pub fn parse_str(src: &str, config: &SceneConfig) -> SceneResult<SceneGraph> {
    let root = parse_document(src)?;
    parse_scene(&root, config)
}

/// Parse an already-read document tree into a scene graph
pub fn parse_scene(root: &Element, config: &SceneConfig) -> SceneResult<SceneGraph> {
    if root.name() != ROOT_TAG {
        return Err(SceneError::RootTag(root.name().to_string()));
    }

    let blocks = locate_blocks(root)?;
    let [scene, views, ambient, lights, textures, materials, transformations, primitives, animations, components] =
        blocks;

    let mut builder = parse_scene_block(scene)?;
    views::parse(views, &mut builder)?;
    appearance::parse_ambient(ambient, &mut builder)?;
    lights::parse(lights, &mut builder, config.max_enabled_lights)?;
    appearance::parse_textures(textures, &mut builder)?;
    appearance::parse_materials(materials, &mut builder)?;
    transforms::parse(transformations, &mut builder)?;
    primitives::parse(primitives, &mut builder)?;
    animations::parse(animations, &mut builder)?;
    components::parse(components, &mut builder)?;

    let graph = builder.build()?;
    log::info!(
        "Scene parsed: {} components, {} primitives, root '{}'",
        graph.components().len(),
        graph.primitives().len(),
        graph.root()
    );
    Ok(graph)
}

/// Find every required block, warning about any out of canonical order
fn locate_blocks(root: &Element) -> SceneResult<[&Element; 10]> {
    for child in root.children() {
        if !BLOCKS.contains(&child.name()) {
            log::warn!("unknown tag <{}> in <{ROOT_TAG}>", child.name());
        }
    }

    let mut found = Vec::with_capacity(BLOCKS.len());
    for (expected, name) in BLOCKS.into_iter().enumerate() {
        let index = root.position_of(name).ok_or(SceneError::MissingBlock(name))?;
        if index != expected {
            log::warn!("tag <{name}> out of order");
        }
        found.push(&root.children()[index]);
    }

    found
        .try_into()
        .map_err(|_| SceneError::invalid(ROOT_TAG, "block lookup failed"))
}

fn parse_scene_block(block: &Element) -> SceneResult<SceneBuilder> {
    let root = attr::string(block, "root", "scene")?;

    let axis_length = match attr::optional_float(block, "axis_length", "scene") {
        Ok(Some(length)) => length,
        Ok(None) => {
            log::warn!("no axis_length defined for scene; assuming 1");
            1.0
        }
        Err(err) => {
            log::warn!("{err}; assuming 1");
            1.0
        }
    };

    log::debug!("Parsed scene");
    Ok(SceneBuilder::new(root).with_axis_length(axis_length))
}
