//! The loaded scene: every entity table plus the designated root

use std::collections::BTreeSet;

use super::camera::Camera;
use super::component::{Component, MaterialRef};
use super::error::{SceneError, SceneResult};
use super::light::Light;
use super::material::{Color, Material};
use super::table::Table;
use super::texture::{Texture, TextureBinding};
use super::validator;
use crate::animation::KeyframeAnimation;
use crate::foundation::math::Mat4;
use crate::geometry::Primitive;

/// Global ambient light and clear color
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ambient {
    /// Global ambient light
    pub ambient: Color,
    /// Background clear color
    pub background: Color,
}

/// A validated, cycle-free scene
///
/// Built once per load and never mutated afterwards; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    root: String,
    axis_length: f32,
    default_camera: Option<String>,
    cameras: Table<Camera>,
    ambient: Ambient,
    lights: Table<Light>,
    textures: Table<Texture>,
    materials: Table<Material>,
    transformations: Table<Mat4>,
    primitives: Table<Primitive>,
    animations: Table<KeyframeAnimation>,
    components: Table<Component>,
}

impl SceneGraph {
    /// Id of the root component
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Length of the reference axes
    pub const fn axis_length(&self) -> f32 {
        self.axis_length
    }

    /// Id of the active camera
    pub fn default_camera_id(&self) -> Option<&str> {
        self.default_camera.as_deref()
    }

    /// The active camera
    pub fn default_camera(&self) -> Option<&Camera> {
        self.default_camera.as_deref().and_then(|id| self.cameras.get(id))
    }

    /// Ambient and background colors
    pub const fn ambient(&self) -> &Ambient {
        &self.ambient
    }

    /// Camera table
    pub const fn cameras(&self) -> &Table<Camera> {
        &self.cameras
    }

    /// Light table
    pub const fn lights(&self) -> &Table<Light> {
        &self.lights
    }

    /// Texture table
    pub const fn textures(&self) -> &Table<Texture> {
        &self.textures
    }

    /// Material table
    pub const fn materials(&self) -> &Table<Material> {
        &self.materials
    }

    /// Named transformation table
    pub const fn transformations(&self) -> &Table<Mat4> {
        &self.transformations
    }

    /// Primitive table
    pub const fn primitives(&self) -> &Table<Primitive> {
        &self.primitives
    }

    /// Animation table
    pub const fn animations(&self) -> &Table<KeyframeAnimation> {
        &self.animations
    }

    /// Component table
    pub const fn components(&self) -> &Table<Component> {
        &self.components
    }

    /// Look up a component
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Ids of components reachable from the root, sorted
    pub fn reachable(&self) -> BTreeSet<&str> {
        let mut seen = BTreeSet::new();
        let mut pending = vec![self.root.as_str()];
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(component) = self.components.get(id) {
                pending.extend(component.children.iter().map(String::as_str));
            }
        }
        seen
    }
}

/// Mutable scene under construction
///
/// Entities are added block by block. References from components to
/// primitives, materials, textures and animations must already resolve
/// when the component is added; child components are only checked by
/// [`SceneBuilder::build`], which also rejects cycles.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    pub(crate) root: String,
    pub(crate) axis_length: f32,
    pub(crate) default_camera: Option<String>,
    pub(crate) cameras: Table<Camera>,
    pub(crate) ambient: Ambient,
    pub(crate) lights: Table<Light>,
    pub(crate) textures: Table<Texture>,
    pub(crate) materials: Table<Material>,
    pub(crate) transformations: Table<Mat4>,
    pub(crate) primitives: Table<Primitive>,
    pub(crate) animations: Table<KeyframeAnimation>,
    pub(crate) components: Table<Component>,
}

impl SceneBuilder {
    /// Start a scene rooted at component `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            axis_length: 1.0,
            default_camera: None,
            cameras: Table::new("camera"),
            ambient: Ambient::default(),
            lights: Table::new("light"),
            textures: Table::new("texture"),
            materials: Table::new("material"),
            transformations: Table::new("transformation"),
            primitives: Table::new("primitive"),
            animations: Table::new("animation"),
            components: Table::new("component"),
        }
    }

    /// Builder pattern: set the reference axis length
    pub fn with_axis_length(mut self, axis_length: f32) -> Self {
        self.axis_length = axis_length;
        self
    }

    /// Add a camera
    pub fn add_camera(&mut self, id: impl Into<String>, camera: Camera) -> SceneResult<()> {
        self.cameras.insert(id, camera)
    }

    /// Designate the active camera
    pub fn set_default_camera(&mut self, id: impl Into<String>) {
        self.default_camera = Some(id.into());
    }

    /// Add a light
    pub fn add_light(&mut self, id: impl Into<String>, light: Light) -> SceneResult<()> {
        self.lights.insert(id, light)
    }

    /// Add a texture
    pub fn add_texture(&mut self, texture: Texture) -> SceneResult<()> {
        self.textures.insert(texture.id.clone(), texture)
    }

    /// Add a material
    pub fn add_material(&mut self, id: impl Into<String>, material: Material) -> SceneResult<()> {
        self.materials.insert(id, material)
    }

    /// Add a named transformation
    pub fn add_transformation(&mut self, id: impl Into<String>, matrix: Mat4) -> SceneResult<()> {
        self.transformations.insert(id, matrix)
    }

    /// Add a primitive
    pub fn add_primitive(&mut self, primitive: Primitive) -> SceneResult<()> {
        self.primitives.insert(primitive.id().to_string(), primitive)
    }

    /// Add an animation
    pub fn add_animation(&mut self, animation: KeyframeAnimation) -> SceneResult<()> {
        self.animations.insert(animation.id().to_string(), animation)
    }

    /// Add a component after checking its non-child references
    pub fn add_component(&mut self, component: Component) -> SceneResult<()> {
        self.check_references(&component)?;
        self.components.insert(component.id.clone(), component)
    }

    /// Check that a component's primitives, materials, texture and animation exist
    pub fn check_references(&self, component: &Component) -> SceneResult<()> {
        let context = format!("component '{}'", component.id);

        for id in &component.primitives {
            self.primitives.require(id, context.as_str())?;
        }
        for material in &component.materials {
            if let MaterialRef::Named(id) = material {
                self.materials.require(id, context.as_str())?;
            }
        }
        if let TextureBinding::Named(id) = &component.texture.binding {
            self.textures.require(id, context.as_str())?;
        }
        if let Some(id) = &component.animation {
            self.animations.require(id, context.as_str())?;
        }
        Ok(())
    }

    /// Check the root and child references, reject cycles, and freeze the scene
    pub fn build(self) -> SceneResult<SceneGraph> {
        if !self.components.contains(&self.root) {
            return Err(SceneError::unknown("scene root", "component", self.root));
        }

        let mut dangling: Vec<SceneError> = self
            .components
            .values()
            .flat_map(|component| {
                component
                    .children
                    .iter()
                    .filter(|child| !self.components.contains(child))
                    .map(move |child| {
                        SceneError::unknown(format!("component '{}'", component.id), "component", child)
                    })
            })
            .collect();
        if !dangling.is_empty() {
            dangling.sort_by_key(ToString::to_string);
            return Err(SceneError::InvalidComponents(dangling));
        }

        validator::validate(&self.components)?;

        Ok(SceneGraph {
            root: self.root,
            axis_length: self.axis_length,
            default_camera: self.default_camera,
            cameras: self.cameras,
            ambient: self.ambient,
            lights: self.lights,
            textures: self.textures,
            materials: self.materials,
            transformations: self.transformations,
            primitives: self.primitives,
            animations: self.animations,
            components: self.components,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rectangle, Shape};
    use crate::scene::TextureRef;

    fn builder() -> SceneBuilder {
        let mut builder = SceneBuilder::new("root");
        builder
            .add_primitive(Primitive::new("quad", Shape::Rectangle(Rectangle::new(0.0, 0.0, 1.0, 1.0))))
            .unwrap();
        builder.add_material("wood", Material::default()).unwrap();
        builder
    }

    #[test]
    fn test_build_simple_scene() {
        let mut builder = builder();
        builder
            .add_component(
                Component::new("root")
                    .with_primitive("quad")
                    .with_materials(vec![MaterialRef::from_id("wood")])
                    .with_child("leaf"),
            )
            .unwrap();
        builder.add_component(Component::new("leaf")).unwrap();
        builder.add_component(Component::new("orphan")).unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(graph.root(), "root");
        assert_eq!(graph.components().len(), 3);
        assert_eq!(graph.reachable().into_iter().collect::<Vec<_>>(), vec!["leaf", "root"]);
    }

    #[test]
    fn test_unknown_primitive_rejected_on_add() {
        let mut builder = builder();
        let err = builder
            .add_component(Component::new("root").with_primitive("cube"))
            .unwrap_err();
        assert_eq!(err.to_string(), "component 'root': no primitive defined with ID = cube");
    }

    #[test]
    fn test_unknown_texture_rejected_on_add() {
        let mut builder = builder();
        let err = builder
            .add_component(Component::new("root").with_texture(TextureRef::named("marble", 1.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownReference { kind: "texture", .. }));
    }

    #[test]
    fn test_missing_root() {
        let mut builder = builder();
        builder.add_component(Component::new("other")).unwrap();
        assert!(matches!(
            builder.build(),
            Err(SceneError::UnknownReference { kind: "component", ref id, .. }) if id == "root"
        ));
    }

    #[test]
    fn test_dangling_child() {
        let mut builder = builder();
        builder
            .add_component(Component::new("root").with_child("ghost"))
            .unwrap();
        match builder.build() {
            Err(SceneError::InvalidComponents(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].to_string().contains("ghost"));
            }
            other => panic!("expected dangling child error, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_rejected() {
        let mut builder = builder();
        builder.add_component(Component::new("root").with_child("a")).unwrap();
        builder.add_component(Component::new("a").with_child("root")).unwrap();
        assert!(matches!(builder.build(), Err(SceneError::CycleDetected)));
    }
}
