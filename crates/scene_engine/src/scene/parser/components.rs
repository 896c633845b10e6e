//! `<components>` block
//!
//! A bad component does not stop the block: its error is recorded and
//! parsing moves on, so one load reports every broken component at once.
//! Duplicate ids still abort immediately. Child components may be
//! referenced before they are declared; those links are checked when the
//! scene is built.

use super::attributes as attr;
use super::transforms;
use crate::document::Element;
use crate::scene::component::{Component, Highlight, MaterialRef, TransformSpec};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;
use crate::scene::material::Color;
use crate::scene::texture::{TextureBinding, TextureRef};

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    let mut failures = Vec::new();

    for entry in block.children() {
        if entry.name() != "component" {
            log::warn!("unknown tag <{}> in <components>", entry.name());
            continue;
        }

        let id = attr::id(entry, "component")?;
        if builder.components.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "component",
                id: id.to_string(),
            });
        }

        match parse_component(entry, id, builder).and_then(|component| builder.add_component(component)) {
            Ok(()) => {}
            Err(err) => {
                log::error!("{err}");
                failures.push(err);
            }
        }
    }

    if !failures.is_empty() {
        return Err(SceneError::InvalidComponents(failures));
    }

    log::debug!("Parsed components");
    Ok(())
}

fn parse_component(entry: &Element, id: &str, builder: &SceneBuilder) -> SceneResult<Component> {
    let context = attr::context("component", id);

    let mut component = Component::new(id)
        .with_transform(parse_transform(attr::child(entry, "transformation", &context)?, builder, &context)?)
        .with_materials(parse_materials(attr::child(entry, "materials", &context)?, &context)?)
        .with_texture(parse_texture(attr::child(entry, "texture", &context)?, &context)?);

    for child in attr::child(entry, "children", &context)?.children() {
        match child.name() {
            "primitiveref" => component = component.with_primitive(attr::string(child, "id", &context)?),
            "componentref" => component = component.with_child(attr::string(child, "id", &context)?),
            other => log::warn!("unknown tag <{other}> in children of {context}"),
        }
    }

    if let Some(animation) = entry.child("animation") {
        component = component.with_animation(attr::string(animation, "id", &context)?);
    }
    if let Some(highlighted) = entry.child("highlighted") {
        component = component.with_highlight(parse_highlight(highlighted, &context)?);
    }

    for child in entry.children() {
        if !matches!(
            child.name(),
            "transformation" | "materials" | "texture" | "children" | "animation" | "highlighted"
        ) {
            log::warn!("unknown tag <{}> in {context}", child.name());
        }
    }

    Ok(component)
}

fn parse_transform(element: &Element, builder: &SceneBuilder, context: &str) -> SceneResult<TransformSpec> {
    let Some(reference) = element.child("transformationref") else {
        return Ok(TransformSpec::Inline(transforms::operations(element, context)?));
    };

    if element.children().len() > 1 {
        return Err(SceneError::invalid(
            context,
            "a transformationref cannot be combined with other transformations",
        ));
    }
    let id = attr::string(reference, "id", context)?;
    let matrix = *builder.transformations.require(id, context)?;
    Ok(TransformSpec::Reference {
        id: id.to_string(),
        matrix,
    })
}

fn parse_materials(element: &Element, context: &str) -> SceneResult<Vec<MaterialRef>> {
    let mut materials = Vec::new();
    for child in element.children() {
        if child.name() != "material" {
            log::warn!("unknown tag <{}> in materials of {context}", child.name());
            continue;
        }
        materials.push(MaterialRef::from_id(attr::string(child, "id", context)?));
    }

    if materials.is_empty() {
        return Err(SceneError::invalid(context, "at least one material must be listed"));
    }
    Ok(materials)
}

fn parse_texture(element: &Element, context: &str) -> SceneResult<TextureRef> {
    let binding = TextureBinding::from_id(attr::string(element, "id", context)?);
    let length_s = attr::optional_float(element, "length_s", context)?;
    let length_t = attr::optional_float(element, "length_t", context)?;
    let has_lengths = length_s.is_some() || length_t.is_some();

    Ok(match binding {
        TextureBinding::Named(_) => {
            let length_s = length_s.ok_or_else(|| SceneError::attribute(context, "length_s", "missing"))?;
            let length_t = length_t.ok_or_else(|| SceneError::attribute(context, "length_t", "missing"))?;
            TextureRef {
                binding,
                length_s: Some(length_s),
                length_t: Some(length_t),
            }
        }
        TextureBinding::Inherit => {
            if has_lengths {
                log::warn!("{context}: inherited texture should not set length_s/length_t; overriding parent lengths");
            }
            TextureRef {
                binding,
                length_s,
                length_t,
            }
        }
        TextureBinding::None => {
            if has_lengths {
                log::warn!("{context}: length_s/length_t ignored on 'none' texture");
            }
            TextureRef::none()
        }
    })
}

fn parse_highlight(element: &Element, context: &str) -> SceneResult<Highlight> {
    let enabled = match attr::boolean(element, "enabled") {
        Some(Ok(enabled)) => enabled,
        Some(Err(raw)) => {
            log::warn!("{context}: unable to parse highlight 'enabled' value '{raw}'; assuming enabled");
            true
        }
        None => true,
    };

    Ok(Highlight {
        enabled,
        color: Color::new(
            attr::unit_float(element, "r", context)?,
            attr::unit_float(element, "g", context)?,
            attr::unit_float(element, "b", context)?,
            1.0,
        ),
        scale: attr::float(element, "scale_h", context)?,
    })
}
