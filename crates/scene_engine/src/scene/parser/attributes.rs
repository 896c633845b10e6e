//! Typed attribute access with scene error reporting
//!
//! Every helper takes a `context` naming the entity being parsed (for
//! example `light 'sun'`) so failures point at the offending entry.

use crate::document::Element;
use crate::foundation::math::{Axis, Vec3, Vec4};
use crate::geometry::{MAX_PATCH_DEGREE, MAX_SUBDIVISIONS};
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::material::Color;

/// `kind 'id'` label used in error messages
pub fn context(kind: &str, id: &str) -> String {
    format!("{kind} '{id}'")
}

/// The `id` attribute of an entity element
pub fn id<'e>(element: &'e Element, kind: &'static str) -> SceneResult<&'e str> {
    match element.attribute("id") {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(SceneError::MissingId {
            kind,
            line: element.line(),
        }),
    }
}

/// Required string attribute
pub fn string<'e>(element: &'e Element, name: &str, context: &str) -> SceneResult<&'e str> {
    element
        .attribute(name)
        .ok_or_else(|| SceneError::attribute(context, name, "missing"))
}

/// Required finite float attribute
pub fn float(element: &Element, name: &str, context: &str) -> SceneResult<f32> {
    optional_float(element, name, context)?
        .ok_or_else(|| SceneError::attribute(context, name, "missing"))
}

/// Optional float attribute; present but malformed is still an error
pub fn optional_float(element: &Element, name: &str, context: &str) -> SceneResult<Option<f32>> {
    element
        .attribute(name)
        .map(|raw| {
            raw.trim()
                .parse::<f32>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| SceneError::attribute(context, name, format!("'{raw}' is not a number")))
        })
        .transpose()
}

/// Required integer attribute
pub fn integer(element: &Element, name: &str, context: &str) -> SceneResult<i64> {
    let raw = string(element, name, context)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SceneError::attribute(context, name, format!("'{raw}' is not an integer")))
}

/// Required subdivision count in `1..=MAX_SUBDIVISIONS`
pub fn count(element: &Element, name: &str, context: &str) -> SceneResult<u32> {
    let value = integer(element, name, context)?;
    u32::try_from(value)
        .ok()
        .filter(|count| (1..=MAX_SUBDIVISIONS).contains(count))
        .ok_or_else(|| {
            SceneError::attribute(context, name, format!("{value} must be between 1 and {MAX_SUBDIVISIONS}"))
        })
}

/// Required polynomial degree in `0..=MAX_PATCH_DEGREE`
pub fn degree(element: &Element, name: &str, context: &str) -> SceneResult<usize> {
    let value = integer(element, name, context)?;
    usize::try_from(value)
        .ok()
        .filter(|&degree| degree <= MAX_PATCH_DEGREE)
        .ok_or_else(|| {
            SceneError::attribute(context, name, format!("{value} must be between 0 and {MAX_PATCH_DEGREE}"))
        })
}

/// Optional boolean attribute accepting `true`/`false`/`1`/`0`
///
/// Returns `Err(raw)` for a present but unrecognized value.
pub fn boolean<'e>(element: &'e Element, name: &str) -> Option<Result<bool, &'e str>> {
    element.attribute(name).map(|raw| match raw.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(raw),
    })
}

/// `x`, `y`, `z` attributes
pub fn vec3(element: &Element, context: &str) -> SceneResult<Vec3> {
    Ok(Vec3::new(
        float(element, "x", context)?,
        float(element, "y", context)?,
        float(element, "z", context)?,
    ))
}

/// `x`, `y`, `z`, `w` attributes
pub fn vec4(element: &Element, context: &str) -> SceneResult<Vec4> {
    let xyz = vec3(element, context)?;
    Ok(Vec4::new(xyz.x, xyz.y, xyz.z, float(element, "w", context)?))
}

/// A color component in [0, 1]
pub fn unit_float(element: &Element, name: &str, context: &str) -> SceneResult<f32> {
    let value = float(element, name, context)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SceneError::attribute(context, name, format!("{value} is outside [0, 1]")))
    }
}

/// `r`, `g`, `b`, `a` attributes, each in [0, 1]
pub fn color(element: &Element, context: &str) -> SceneResult<Color> {
    Ok(Color::new(
        unit_float(element, "r", context)?,
        unit_float(element, "g", context)?,
        unit_float(element, "b", context)?,
        unit_float(element, "a", context)?,
    ))
}

/// `axis` attribute, one of `x`, `y`, `z`
pub fn axis(element: &Element, context: &str) -> SceneResult<Axis> {
    let raw = string(element, "axis", context)?;
    Axis::parse(raw.trim())
        .ok_or_else(|| SceneError::attribute(context, "axis", format!("'{raw}' is not one of x, y, z")))
}

/// Required child element
pub fn child<'e>(element: &'e Element, name: &'static str, context: &str) -> SceneResult<&'e Element> {
    element.child(name).ok_or_else(|| SceneError::MissingElement {
        context: context.to_string(),
        element: name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> Element {
        Element::new("thing")
            .with_attribute("id", "t1")
            .with_attribute("f", " 2.5 ")
            .with_attribute("bad", "abc")
            .with_attribute("inf", "inf")
            .with_attribute("n", "4")
            .with_attribute("zero", "0")
            .with_attribute("neg", "-1")
            .with_attribute("r", "1.5")
            .with_attribute("axis", "y")
            .with_attribute("on", "true")
            .with_attribute("odd", "maybe")
            .with_attribute("huge", "4294967295")
            .with_attribute("i64max", "9223372036854775807")
            .with_attribute("limit", "1024")
    }

    #[test]
    fn test_numbers() {
        let e = element();
        assert_eq!(float(&e, "f", "thing 't1'").unwrap(), 2.5);
        assert!(float(&e, "bad", "ctx").is_err());
        assert!(float(&e, "inf", "ctx").is_err());
        assert!(float(&e, "missing", "ctx").is_err());
        assert_eq!(optional_float(&e, "missing", "ctx").unwrap(), None);
        assert!(optional_float(&e, "bad", "ctx").is_err());
    }

    #[test]
    fn test_counts_and_degrees() {
        let e = element();
        assert_eq!(count(&e, "n", "ctx").unwrap(), 4);
        assert!(count(&e, "zero", "ctx").is_err());
        assert!(count(&e, "f", "ctx").is_err());
        assert_eq!(degree(&e, "zero", "ctx").unwrap(), 0);
        assert!(degree(&e, "neg", "ctx").is_err());
    }

    #[test]
    fn test_counts_and_degrees_are_bounded() {
        let e = element();
        assert_eq!(count(&e, "limit", "ctx").unwrap(), MAX_SUBDIVISIONS);
        let err = count(&e, "huge", "torus 'ring'").unwrap_err();
        assert!(matches!(err, SceneError::InvalidAttribute { ref attribute, .. } if attribute == "huge"));
        assert!(err.to_string().contains("must be between 1 and 1024"));
        assert!(count(&e, "i64max", "ctx").is_err());

        assert!(degree(&e, "i64max", "ctx").is_err());
        assert!(degree(&e, "limit", "ctx").is_err());
        assert_eq!(degree(&e, "n", "ctx").unwrap(), 4);
    }

    #[test]
    fn test_error_names_entity_and_attribute() {
        let err = float(&element(), "bad", "light 'sun'").unwrap_err();
        assert_eq!(
            err.to_string(),
            "light 'sun': unable to parse 'bad': 'abc' is not a number"
        );
    }

    #[test]
    fn test_misc() {
        let e = element();
        assert_eq!(id(&e, "thing").unwrap(), "t1");
        assert!(matches!(
            id(&Element::new("thing"), "thing"),
            Err(SceneError::MissingId { kind: "thing", .. })
        ));
        assert!(unit_float(&e, "r", "ctx").is_err());
        assert_eq!(axis(&e, "ctx").unwrap(), Axis::Y);
        assert_eq!(boolean(&e, "on"), Some(Ok(true)));
        assert_eq!(boolean(&e, "odd"), Some(Err("maybe")));
        assert_eq!(boolean(&e, "missing"), None);
    }
}
