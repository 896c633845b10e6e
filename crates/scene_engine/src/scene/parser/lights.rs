//! `<lights>` block

use super::attributes as attr;
use crate::document::Element;
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;
use crate::scene::light::{Attenuation, Light, LightKind};

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder, max_enabled: usize) -> SceneResult<()> {
    for entry in block.children() {
        if !matches!(entry.name(), "omni" | "spot") {
            log::warn!("unknown tag <{}> in <lights>", entry.name());
            continue;
        }

        let id = attr::id(entry, "light")?;
        if builder.lights.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "light",
                id: id.to_string(),
            });
        }
        let light = parse_light(entry, &attr::context("light", id))?;
        builder.add_light(id, light)?;
    }

    if builder.lights.is_empty() {
        return Err(SceneError::invalid("lights", "at least one light must be defined"));
    }

    let enabled = builder.lights.values().filter(|light| light.enabled).count();
    if enabled > max_enabled {
        log::warn!("too many lights enabled ({enabled}); only {max_enabled} can be active at once");
    }

    log::debug!("Parsed lights");
    Ok(())
}

fn parse_light(entry: &Element, context: &str) -> SceneResult<Light> {
    let enabled = match attr::boolean(entry, "enabled") {
        Some(Ok(enabled)) => enabled,
        Some(Err(raw)) => {
            log::warn!("{context}: unable to parse 'enabled' value '{raw}'; assuming enabled");
            true
        }
        None => {
            log::warn!("{context}: no 'enabled' value; assuming enabled");
            true
        }
    };

    let location = attr::vec4(attr::child(entry, "location", context)?, context)?;
    let ambient = attr::color(attr::child(entry, "ambient", context)?, context)?;
    let diffuse = attr::color(attr::child(entry, "diffuse", context)?, context)?;
    let specular = attr::color(attr::child(entry, "specular", context)?, context)?;

    let attenuation = {
        let element = attr::child(entry, "attenuation", context)?;
        let constant = attr::float(element, "constant", context)?;
        let linear = attr::float(element, "linear", context)?;
        let quadratic = attr::float(element, "quadratic", context)?;
        Attenuation::new(constant, linear, quadratic).map_err(|reason| SceneError::invalid(context, reason))?
    };

    let kind = if entry.name() == "spot" {
        LightKind::Spot {
            angle: attr::float(entry, "angle", context)?,
            exponent: attr::float(entry, "exponent", context)?,
            target: attr::vec3(attr::child(entry, "target", context)?, context)?,
        }
    } else {
        LightKind::Omni
    };

    for child in entry.children() {
        if !matches!(
            child.name(),
            "location" | "ambient" | "diffuse" | "specular" | "attenuation" | "target"
        ) {
            log::warn!("unknown tag <{}> in {context}", child.name());
        }
    }

    Ok(Light {
        enabled,
        kind,
        location,
        ambient,
        diffuse,
        specular,
        attenuation,
    })
}
