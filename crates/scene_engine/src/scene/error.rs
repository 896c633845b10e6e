//! Scene loading and rendering errors

use std::path::PathBuf;

use thiserror::Error;

use crate::animation::AnimationError;
use crate::document::DocumentError;
use crate::render::RenderError;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Fatal scene errors
///
/// Any of these aborts a load; the partially parsed document is discarded.
/// Minor problems are logged as warnings instead and never surface here.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Scene file could not be read
    #[error("failed to read scene file {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Markup is not well formed
    #[error("malformed scene document: {0}")]
    Document(#[from] DocumentError),

    /// Root element is not `<sxs>`
    #[error("root tag <sxs> missing (found <{0}>)")]
    RootTag(String),

    /// One of the ten top-level blocks is absent
    #[error("tag <{0}> missing")]
    MissingBlock(&'static str),

    /// Entity without an `id` attribute
    #[error("no ID defined for {kind} (line {line})")]
    MissingId {
        /// Entity kind, e.g. `material`
        kind: &'static str,
        /// Source line of the entity
        line: usize,
    },

    /// Second entity with an id already present in its table
    #[error("ID must be unique for each {kind} (conflict: ID = {id})")]
    DuplicateId {
        /// Table kind, e.g. `material`
        kind: &'static str,
        /// Conflicting id
        id: String,
    },

    /// Required attribute absent or unparsable
    #[error("{context}: unable to parse '{attribute}': {reason}")]
    InvalidAttribute {
        /// Entity being parsed, e.g. `light 'sun'`
        context: String,
        /// Attribute name
        attribute: String,
        /// What was wrong with it
        reason: String,
    },

    /// Required child element absent
    #[error("{context}: missing <{element}>")]
    MissingElement {
        /// Entity being parsed
        context: String,
        /// Missing child tag
        element: &'static str,
    },

    /// Structural rule violated
    #[error("{context}: {reason}")]
    Invalid {
        /// Entity being parsed
        context: String,
        /// Violated rule
        reason: String,
    },

    /// Reference to an id that is not defined
    #[error("{context}: no {kind} defined with ID = {id}")]
    UnknownReference {
        /// Entity holding the reference
        context: String,
        /// Kind of the referenced entity
        kind: &'static str,
        /// Referenced id
        id: String,
    },

    /// One or more components failed to parse
    #[error("{} invalid component(s): {}", .0.len(), join_errors(.0))]
    InvalidComponents(Vec<SceneError>),

    /// Keyframe sequence rejected
    #[error(transparent)]
    Animation(#[from] AnimationError),

    /// Component graph contains a cycle
    #[error("Scene graph contains cycle")]
    CycleDetected,

    /// Renderer collaborator failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Loader thread ended without delivering a result
    #[error("scene loader for {0} stopped before delivering a result")]
    LoadAborted(PathBuf),
}

impl SceneError {
    /// Shorthand for [`SceneError::InvalidAttribute`]
    pub fn attribute(
        context: impl Into<String>,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            context: context.into(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SceneError::Invalid`]
    pub fn invalid(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SceneError::UnknownReference`]
    pub fn unknown(context: impl Into<String>, kind: &'static str, id: impl Into<String>) -> Self {
        Self::UnknownReference {
            context: context.into(),
            kind,
            id: id.into(),
        }
    }
}

fn join_errors(errors: &[SceneError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_message_names_id() {
        let err = SceneError::DuplicateId {
            kind: "material",
            id: "wood".into(),
        };
        assert_eq!(
            err.to_string(),
            "ID must be unique for each material (conflict: ID = wood)"
        );
    }

    #[test]
    fn test_component_errors_are_joined() {
        let err = SceneError::InvalidComponents(vec![
            SceneError::MissingElement {
                context: "component 'a'".into(),
                element: "texture",
            },
            SceneError::unknown("component 'b'", "primitive", "cube"),
        ]);
        let message = err.to_string();
        assert!(message.starts_with("2 invalid component(s)"));
        assert!(message.contains("component 'a': missing <texture>"));
        assert!(message.contains("no primitive defined with ID = cube"));
    }
}
