//! `<animations>` block
//!
//! Each keyframe lists exactly five operations in a fixed order:
//! translation, rotation about z, rotation about y, rotation about x, scale.

use super::attributes as attr;
use crate::animation::{Keyframe, KeyframeAnimation};
use crate::document::Element;
use crate::foundation::math::{Axis, Vec3};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;

const ROTATIONS: [(usize, Axis, &str); 3] = [(1, Axis::Z, "second"), (2, Axis::Y, "third"), (3, Axis::X, "fourth")];

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    for entry in block.children() {
        if entry.name() != "keyframeanim" {
            log::warn!("unknown tag <{}> in <animations>", entry.name());
            continue;
        }

        let id = attr::id(entry, "animation")?;
        if builder.animations.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "animation",
                id: id.to_string(),
            });
        }

        let context = attr::context("animation", id);
        let keyframes = entry
            .children()
            .iter()
            .map(|keyframe| parse_keyframe(keyframe, &context))
            .collect::<SceneResult<Vec<_>>>()?;
        builder.add_animation(KeyframeAnimation::new(id, keyframes)?)?;
    }

    log::debug!("Parsed animations");
    Ok(())
}

fn parse_keyframe(element: &Element, context: &str) -> SceneResult<Keyframe> {
    let instant = attr::float(element, "instant", context)?;

    let ops = element.children();
    if ops.len() != 5 {
        return Err(SceneError::invalid(
            context,
            format!("keyframe at {instant} has {} transformations, expected 5", ops.len()),
        ));
    }

    if ops[0].name() != "translation" {
        return Err(SceneError::invalid(context, "translation must be the first transformation"));
    }
    let translation = attr::vec3(&ops[0], context)?;

    let mut rotation = Vec3::zeros();
    for (index, axis, position) in ROTATIONS {
        let op = &ops[index];
        if op.name() != "rotation" || attr::axis(op, context)? != axis {
            return Err(SceneError::invalid(
                context,
                format!("rotation {} must be the {position} transformation", axis.name()),
            ));
        }
        let angle = attr::float(op, "angle", context)?;
        match axis {
            Axis::X => rotation.x = angle,
            Axis::Y => rotation.y = angle,
            Axis::Z => rotation.z = angle,
        }
    }

    if ops[4].name() != "scale" {
        return Err(SceneError::invalid(context, "scale must be the fifth transformation"));
    }
    let scale = Vec3::new(
        attr::float(&ops[4], "sx", context)?,
        attr::float(&ops[4], "sy", context)?,
        attr::float(&ops[4], "sz", context)?,
    );

    Ok(Keyframe::new(instant)
        .with_translation(translation)
        .with_rotation(rotation)
        .with_scale(scale))
}
