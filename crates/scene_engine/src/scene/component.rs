//! Scene graph nodes

use super::material::Color;
use super::texture::TextureRef;
use crate::foundation::math::Mat4;

/// Material slot of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialRef {
    /// Use the parent's resolved material
    Inherit,
    /// Use the material with this id
    Named(String),
}

impl MaterialRef {
    /// Interpret an id, recognizing the `inherit` sentinel
    pub fn from_id(id: &str) -> Self {
        if id == "inherit" {
            Self::Inherit
        } else {
            Self::Named(id.to_string())
        }
    }
}

/// Local transform of a component
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    /// Inline translate/rotate/scale operations, already composed
    Inline(Mat4),
    /// A named transformation from the transformations block
    Reference {
        /// Referenced transformation id
        id: String,
        /// The referenced matrix, resolved at parse time
        matrix: Mat4,
    },
}

impl TransformSpec {
    /// The local matrix
    pub const fn matrix(&self) -> &Mat4 {
        match self {
            Self::Inline(matrix) | Self::Reference { matrix, .. } => matrix,
        }
    }
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self::Inline(Mat4::identity())
    }
}

/// Highlight overlay requested by a component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    /// Whether the overlay is active
    pub enabled: bool,
    /// Overlay color (alpha unused)
    pub color: Color,
    /// Pulse scale factor
    pub scale: f32,
}

/// A node of the scene graph
///
/// Children are referenced by id only; the components table owns every node.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Component id
    pub id: String,
    /// Local transform
    pub transform: TransformSpec,
    /// Materials to cycle through; never empty
    pub materials: Vec<MaterialRef>,
    /// Texture request
    pub texture: TextureRef,
    /// Animation id, if animated
    pub animation: Option<String>,
    /// Highlight overlay, if declared
    pub highlight: Option<Highlight>,
    /// Primitives drawn by this node
    pub primitives: Vec<String>,
    /// Child component ids
    pub children: Vec<String>,
}

impl Component {
    /// Create a node with an identity transform, inherited material and texture, and no children
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transform: TransformSpec::default(),
            materials: vec![MaterialRef::Inherit],
            texture: TextureRef::inherit(),
            animation: None,
            highlight: None,
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder pattern: add a child component
    pub fn with_child(mut self, id: impl Into<String>) -> Self {
        self.children.push(id.into());
        self
    }

    /// Builder pattern: add a primitive
    pub fn with_primitive(mut self, id: impl Into<String>) -> Self {
        self.primitives.push(id.into());
        self
    }

    /// Builder pattern: replace the materials list
    pub fn with_materials(mut self, materials: Vec<MaterialRef>) -> Self {
        self.materials = materials;
        self
    }

    /// Builder pattern: set the texture request
    pub fn with_texture(mut self, texture: TextureRef) -> Self {
        self.texture = texture;
        self
    }

    /// Builder pattern: set the local transform
    pub fn with_transform(mut self, transform: TransformSpec) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: set the animation id
    pub fn with_animation(mut self, id: impl Into<String>) -> Self {
        self.animation = Some(id.into());
        self
    }

    /// Builder pattern: set the highlight overlay
    pub fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Material slot selected by a global material index
    pub fn material_at(&self, index: usize) -> Option<&MaterialRef> {
        if self.materials.is_empty() {
            None
        } else {
            self.materials.get(index % self.materials.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_cycling() {
        let component = Component::new("piece").with_materials(vec![
            MaterialRef::from_id("red"),
            MaterialRef::from_id("inherit"),
            MaterialRef::from_id("blue"),
        ]);

        let picked: Vec<_> = (0..5).map(|i| component.material_at(i).cloned()).collect();
        assert_eq!(
            picked,
            vec![
                Some(MaterialRef::Named("red".into())),
                Some(MaterialRef::Inherit),
                Some(MaterialRef::Named("blue".into())),
                Some(MaterialRef::Named("red".into())),
                Some(MaterialRef::Inherit),
            ]
        );
    }

    #[test]
    fn test_empty_materials() {
        let component = Component::new("bare").with_materials(Vec::new());
        assert!(component.material_at(3).is_none());
    }
}
