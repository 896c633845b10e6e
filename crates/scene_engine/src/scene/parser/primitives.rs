//! `<primitives>` block

use super::attributes as attr;
use crate::document::Element;
use crate::geometry::{Cylinder, Patch, Primitive, Rectangle, Shape, Sphere, Torus, Triangle};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::graph::SceneBuilder;

const KINDS: [&str; 6] = ["rectangle", "triangle", "cylinder", "sphere", "torus", "patch"];

pub(super) fn parse(block: &Element, builder: &mut SceneBuilder) -> SceneResult<()> {
    for entry in block.children() {
        if entry.name() != "primitive" {
            log::warn!("unknown tag <{}> in <primitives>", entry.name());
            continue;
        }

        let id = attr::id(entry, "primitive")?;
        if builder.primitives.contains(id) {
            return Err(SceneError::DuplicateId {
                kind: "primitive",
                id: id.to_string(),
            });
        }

        let context = attr::context("primitive", id);
        let [shape] = entry.children() else {
            return Err(SceneError::invalid(
                context,
                format!("there must be exactly 1 primitive type ({})", KINDS.join(", ")),
            ));
        };
        builder.add_primitive(Primitive::new(id, parse_shape(shape, &context)?))?;
    }

    log::debug!("Parsed primitives");
    Ok(())
}

fn parse_shape(shape: &Element, context: &str) -> SceneResult<Shape> {
    let float = |name: &str| attr::float(shape, name, context);
    let count = |name: &str| attr::count(shape, name, context);

    Ok(match shape.name() {
        "rectangle" => {
            let (x1, y1) = (float("x1")?, float("y1")?);
            let (x2, y2) = (float("x2")?, float("y2")?);
            if x2 <= x1 {
                return Err(SceneError::attribute(context, "x2", format!("{x2} must exceed x1 = {x1}")));
            }
            if y2 <= y1 {
                return Err(SceneError::attribute(context, "y2", format!("{y2} must exceed y1 = {y1}")));
            }
            Shape::Rectangle(Rectangle::new(x1, y1, x2, y2))
        }
        "triangle" => {
            let point = |n: u8| -> SceneResult<[f32; 3]> {
                Ok([
                    float(format!("x{n}").as_str())?,
                    float(format!("y{n}").as_str())?,
                    float(format!("z{n}").as_str())?,
                ])
            };
            let triangle = Triangle::new(point(1)?, point(2)?, point(3)?);
            if triangle.is_degenerate() {
                return Err(SceneError::invalid(context, "triangle points are collinear"));
            }
            Shape::Triangle(triangle)
        }
        "cylinder" => Shape::Cylinder(Cylinder::new(
            float("base")?,
            float("top")?,
            float("height")?,
            count("slices")?,
            count("stacks")?,
        )),
        "sphere" => Shape::Sphere(Sphere::new(float("radius")?, count("slices")?, count("stacks")?)),
        "torus" => Shape::Torus(Torus::new(
            float("inner")?,
            float("outer")?,
            count("slices")?,
            count("loops")?,
        )),
        "patch" => Shape::Patch(parse_patch(shape, context)?),
        other => {
            return Err(SceneError::invalid(
                context,
                format!("unknown primitive type <{other}>, expected one of {}", KINDS.join(", ")),
            ))
        }
    })
}

fn parse_patch(shape: &Element, context: &str) -> SceneResult<Patch> {
    let degree_u = attr::degree(shape, "degree_u", context)?;
    let degree_v = attr::degree(shape, "degree_v", context)?;
    let parts_u = attr::count(shape, "parts_u", context)?;
    let parts_v = attr::count(shape, "parts_v", context)?;

    let points: Vec<&Element> = shape
        .children()
        .iter()
        .filter(|child| {
            let known = child.name() == "controlpoint";
            if !known {
                log::warn!("unknown tag <{}> in {context}", child.name());
            }
            known
        })
        .collect();

    let expected = (degree_u + 1) * (degree_v + 1);
    if points.len() != expected {
        return Err(SceneError::invalid(
            context,
            format!("wrong number of control points: expected {expected}, found {}", points.len()),
        ));
    }

    let mut grid = Vec::with_capacity(degree_u + 1);
    for row in points.chunks(degree_v + 1) {
        let row = row
            .iter()
            .map(|point| {
                let xyz = attr::vec3(point, context)?;
                let w = attr::optional_float(point, "w", context)?.unwrap_or(1.0);
                if w <= 0.0 {
                    return Err(SceneError::attribute(context, "w", format!("{w} must be positive")));
                }
                Ok([xyz.x, xyz.y, xyz.z, w])
            })
            .collect::<SceneResult<Vec<_>>>()?;
        grid.push(row);
    }

    Patch::new(parts_u, parts_v, grid).map_err(|err| SceneError::invalid(context, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse_document;

    fn parse_one(body: &str) -> SceneResult<Primitive> {
        let block =
            parse_document(&format!(r#"<primitives><primitive id="p">{body}</primitive></primitives>"#)).unwrap();
        let mut builder = SceneBuilder::new("root");
        parse(&block, &mut builder)?;
        Ok(builder.primitives.get("p").unwrap().clone())
    }

    #[test]
    fn test_rectangle_example() {
        let primitive = parse_one(r#"<rectangle x1="0" y1="0" x2="2" y2="3"/>"#).unwrap();
        assert_eq!(primitive.geometry().vertex_count(), 4);
        assert_eq!(primitive.geometry().triangle_count(), 2);
    }

    #[test]
    fn test_rectangle_corners_must_be_ordered() {
        let err = parse_one(r#"<rectangle x1="2" y1="0" x2="1" y2="3"/>"#).unwrap_err();
        assert!(matches!(err, SceneError::InvalidAttribute { ref attribute, .. } if attribute == "x2"));
    }

    #[test]
    fn test_torus_counts() {
        let primitive = parse_one(r#"<torus inner="0.5" outer="2" slices="10" loops="20"/>"#).unwrap();
        assert_eq!(primitive.geometry().vertex_count(), 21 * 11);
        assert_eq!(primitive.geometry().triangle_count(), 2 * 20 * 10);
    }

    #[test]
    fn test_counts_must_be_integers() {
        assert!(parse_one(r#"<sphere radius="1" slices="8.5" stacks="4"/>"#).is_err());
        assert!(parse_one(r#"<sphere radius="1" slices="0" stacks="4"/>"#).is_err());
        assert!(parse_one(r#"<cylinder base="1" top="1" height="abc" slices="8" stacks="4"/>"#).is_err());
    }

    #[test]
    fn test_exactly_one_shape() {
        assert!(parse_one("").is_err());
        assert!(parse_one(r#"<sphere radius="1" slices="8" stacks="4"/><sphere radius="1" slices="8" stacks="4"/>"#)
            .is_err());
        assert!(parse_one(r#"<cube size="1"/>"#).is_err());
    }

    #[test]
    fn test_collinear_triangle_rejected() {
        let err = parse_one(r#"<triangle x1="0" y1="0" z1="0" x2="1" y2="1" z2="1" x3="2" y3="2" z3="2"/>"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_patch_grid() {
        let primitive = parse_one(
            r#"<patch degree_u="1" parts_u="3" degree_v="0" parts_v="2">
                <controlpoint x="0" y="0" z="0"/>
                <controlpoint x="1" y="0" z="0"/>
            </patch>"#,
        )
        .unwrap();
        match primitive.shape() {
            Shape::Patch(patch) => {
                assert_eq!((patch.degree_u(), patch.degree_v()), (1, 0));
                assert_eq!(patch.control_points()[1][0], [1.0, 0.0, 0.0, 1.0]);
            }
            other => panic!("expected patch, got {other:?}"),
        }
        assert_eq!(primitive.geometry().vertex_count(), 4 * 3);

        let err = parse_one(
            r#"<patch degree_u="1" parts_u="3" degree_v="1" parts_v="2">
                <controlpoint x="0" y="0" z="0"/>
            </patch>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("wrong number of control points"));
    }

    #[test]
    fn test_oversized_counts_rejected() {
        let err = parse_one(r#"<torus inner="0.5" outer="2" slices="4294967295" loops="1"/>"#).unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidAttribute { ref context, ref attribute, .. }
                if context == "primitive 'p'" && attribute == "slices"
        ));
        assert!(parse_one(r#"<sphere radius="1" slices="8" stacks="1025"/>"#).is_err());
        assert!(parse_one(r#"<cylinder base="1" top="1" height="1" slices="99999999" stacks="1"/>"#).is_err());
        assert!(parse_one(r#"<sphere radius="1" slices="1024" stacks="1"/>"#).is_ok());
    }

    #[test]
    fn test_oversized_patch_degree_rejected() {
        let err = parse_one(
            r#"<patch degree_u="9223372036854775807" parts_u="3" degree_v="1" parts_v="2">
                <controlpoint x="0" y="0" z="0"/>
            </patch>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidAttribute { ref context, ref attribute, .. }
                if context == "primitive 'p'" && attribute == "degree_u"
        ));
    }
}
