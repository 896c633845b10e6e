//! `<views>` block
//!
//! Unlike most entries, a malformed camera is dropped with a warning
//! instead of failing the load, as long as one valid camera remains and
//! the default names one of them.

use super::attributes as attr;
use crate::document::Element;
use crate::foundation::math::{utils::deg_to_rad, Vec3};
use crate::scene::camera::Camera;
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;

const CONTEXT: &str = "views";

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    let mut declared = 0usize;

    for entry in block.children() {
        if !matches!(entry.name(), "perspective" | "ortho") {
            log::warn!("unknown tag <{}> in <views>", entry.name());
            continue;
        }
        declared += 1;

        let id = attr::id(entry, "camera")?;
        let context = attr::context("camera", id);
        match parse_camera(entry, &context) {
            Ok(camera) => builder.add_camera(id, camera)?,
            Err(err) => log::warn!("{err}; camera dropped"),
        }
    }

    if declared == 0 {
        return Err(SceneError::invalid(CONTEXT, "No cameras in scene"));
    }
    if builder.cameras.is_empty() {
        return Err(SceneError::invalid(CONTEXT, "no valid camera remains"));
    }

    let default = block
        .attribute("default")
        .ok_or_else(|| SceneError::attribute(CONTEXT, "default", "No default camera"))?;
    if !builder.cameras.contains(default) {
        return Err(SceneError::unknown(CONTEXT, "camera", default));
    }
    builder.set_default_camera(default);

    log::debug!("Parsed cameras");
    Ok(())
}

fn parse_camera(entry: &Element, context: &str) -> SceneResult<Camera> {
    let near = attr::float(entry, "near", context)?;
    let far = attr::float(entry, "far", context)?;

    let mut from = None;
    let mut to = None;
    let mut up = None;
    for child in entry.children() {
        match child.name() {
            "from" => from = Some(attr::vec3(child, context)?),
            "to" => to = Some(attr::vec3(child, context)?),
            "up" if entry.name() == "ortho" => up = Some(attr::vec3(child, context)?),
            other => log::warn!("unknown tag <{other}> in {context}"),
        }
    }
    let (Some(from), Some(to)) = (from, to) else {
        return Err(SceneError::invalid(context, "missing from or to"));
    };

    if entry.name() == "perspective" {
        Ok(Camera::Perspective {
            angle: deg_to_rad(attr::float(entry, "angle", context)?),
            near,
            far,
            from,
            to,
        })
    } else {
        Ok(Camera::Orthographic {
            left: attr::float(entry, "left", context)?,
            right: attr::float(entry, "right", context)?,
            top: attr::float(entry, "top", context)?,
            bottom: attr::float(entry, "bottom", context)?,
            near,
            far,
            from,
            to,
            up: up.unwrap_or_else(Vec3::y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn parse_views(src: &str) -> SceneResult<SceneBuilder> {
        let block = parse_document(src).unwrap();
        let mut builder = SceneBuilder::new("root");
        parse(&block, &mut builder).map(|()| builder)
    }

    #[test]
    fn test_both_kinds() {
        let builder = parse_views(
            r#"<views default="top">
                <perspective id="main" near="0.1" far="500" angle="45">
                    <from x="10" y="10" z="10"/><to x="0" y="0" z="0"/>
                </perspective>
                <ortho id="top" near="0.1" far="100" left="-5" right="5" top="5" bottom="-5">
                    <from x="0" y="10" z="0"/><to x="0" y="0" z="0"/><up x="0" y="0" z="1"/>
                </ortho>
            </views>"#,
        )
        .unwrap();

        assert_eq!(builder.cameras.len(), 2);
        assert_eq!(builder.default_camera.as_deref(), Some("top"));
        match builder.cameras.get("main").unwrap() {
            Camera::Perspective { angle, .. } => {
                approx::assert_relative_eq!(*angle, std::f32::consts::FRAC_PI_4)
            }
            other => panic!("expected perspective, got {other:?}"),
        }
        assert_eq!(builder.cameras.get("top").unwrap().up(), Vec3::z());
    }

    #[test]
    fn test_camera_without_target_is_dropped() {
        let builder = parse_views(
            r#"<views default="good">
                <perspective id="good" near="0.1" far="500" angle="45">
                    <from x="1" y="1" z="1"/><to x="0" y="0" z="0"/>
                </perspective>
                <perspective id="blind" near="0.1" far="500" angle="45">
                    <from x="1" y="1" z="1"/>
                </perspective>
                <perspective id="broken" near="abc" far="500" angle="45">
                    <from x="1" y="1" z="1"/><to x="0" y="0" z="0"/>
                </perspective>
            </views>"#,
        )
        .unwrap();

        assert_eq!(builder.cameras.ids().collect::<Vec<_>>(), vec!["good"]);
    }

    #[test]
    fn test_default_must_name_valid_camera() {
        let err = parse_views(
            r#"<views default="blind">
                <perspective id="good" near="0.1" far="500" angle="45">
                    <from x="1" y="1" z="1"/><to x="0" y="0" z="0"/>
                </perspective>
                <perspective id="blind" near="0.1" far="500" angle="45"/>
            </views>"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::UnknownReference { kind: "camera", .. }));
    }

    #[test]
    fn test_no_cameras_or_default() {
        assert!(parse_views(r#"<views default="x"/>"#).is_err());

        let err = parse_views(
            r#"<views>
                <perspective id="good" near="0.1" far="500" angle="45">
                    <from x="1" y="1" z="1"/><to x="0" y="0" z="0"/>
                </perspective>
            </views>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("No default camera"));
    }
}
