//! `<transformations>` block and inline transform operations

use super::attributes as attr;
use crate::document::Element;
use crate::foundation::math::{utils::deg_to_rad, Mat4, Mat4Ext};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    for entry in block.children() {
        if entry.name() != "transformation" {
            log::warn!("unknown tag <{}> in <transformations>", entry.name());
            continue;
        }

        let id = attr::id(entry, "transformation")?;
        if builder.transformations.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "transformation",
                id: id.to_string(),
            });
        }
        let matrix = operations(entry, &attr::context("transformation", id))?;
        builder.add_transformation(id, matrix)?;
    }

    log::debug!("Parsed transformations");
    Ok(())
}

/// Compose `translate`, `rotate` and `scale` children in document order
///
/// Each operation post-multiplies the accumulated matrix, so the last
/// operation listed is the first applied to a point.
pub(super) fn operations(element: &Element, context: &str) -> SceneResult<Mat4> {
    element.children().iter().try_fold(Mat4::identity(), |matrix, op| {
        Ok(match op.name() {
            "translate" => matrix.translated(&attr::vec3(op, context)?),
            "scale" => matrix.scaled(&attr::vec3(op, context)?),
            "rotate" => {
                let axis = attr::axis(op, context)?;
                let angle = attr::float(op, "angle", context)?;
                matrix.rotated(axis, deg_to_rad(angle))
            }
            other => {
                log::warn!("unknown transformation <{other}> in {context}");
                matrix
            }
        })
    })
}
