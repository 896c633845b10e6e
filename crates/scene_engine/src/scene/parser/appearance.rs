//! `<ambient>`, `<textures>` and `<materials>` blocks

use super::attributes as attr;
use crate::document::Element;
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::{Ambient, SceneBuilder};
use crate::scene::material::{Color, Material};
use crate::scene::texture::Texture;

/// Material channels in their required order
const CHANNELS: [&str; 4] = ["emission", "ambient", "diffuse", "specular"];

pub(super) fn parse_ambient(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    let context = "ambient";
    builder.ambient = Ambient {
        ambient: attr::color(attr::child(block, "ambient", context)?, "ambient illumination")?,
        background: attr::color(attr::child(block, "background", context)?, "background color")?,
    };

    for child in block.children() {
        if !matches!(child.name(), "ambient" | "background") {
            log::warn!("unknown tag <{}> in <ambient>", child.name());
        }
    }

    log::debug!("Parsed ambient");
    Ok(())
}

pub(super) fn parse_textures(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    for entry in block.children() {
        if entry.name() != "texture" {
            log::warn!("unknown tag <{}> in <textures>", entry.name());
            continue;
        }

        let id = attr::id(entry, "texture")?;
        if matches!(id, "none" | "inherit") {
            return Err(SceneError::invalid(attr::context("texture", id), "reserved texture id"));
        }
        let file = attr::string(entry, "file", &attr::context("texture", id))?;
        builder.add_texture(Texture::new(id, file))?;
    }

    if builder.textures.is_empty() {
        return Err(SceneError::invalid("textures", "no textures defined"));
    }

    log::debug!("Parsed textures");
    Ok(())
}

pub(super) fn parse_materials(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    for entry in block.children() {
        if entry.name() != "material" {
            log::warn!("unknown tag <{}> in <materials>", entry.name());
            continue;
        }

        let id = attr::id(entry, "material")?;
        if builder.materials.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "material",
                id: id.to_string(),
            });
        }
        if id == "inherit" {
            return Err(SceneError::invalid(attr::context("material", id), "reserved material id"));
        }
        let material = parse_material(entry, &attr::context("material", id))?;
        builder.add_material(id, material)?;
    }

    if builder.materials.is_empty() {
        return Err(SceneError::invalid("materials", "no materials defined"));
    }

    log::debug!("Parsed materials");
    Ok(())
}

fn parse_material(entry: &Element, context: &str) -> SceneResult<Material> {
    let shininess = attr::float(entry, "shininess", context)?;

    let children = entry.children();
    let mut colors = [Color::default(); 4];
    for (position, (slot, channel)) in colors.iter_mut().zip(CHANNELS).enumerate() {
        let element = children.get(position).filter(|child| child.name() == channel).ok_or_else(|| {
            SceneError::invalid(context, format!("tag {} in material has to be {channel}", position + 1))
        })?;
        *slot = attr::color(element, context)?;
    }
    if children.len() > CHANNELS.len() {
        log::warn!("{context}: ignoring {} extra tag(s)", children.len() - CHANNELS.len());
    }

    let [emission, ambient, diffuse, specular] = colors;
    Ok(Material {
        shininess,
        emission,
        ambient,
        diffuse,
        specular,
    })
}
