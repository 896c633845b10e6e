//! Scene composer
//!
//! Walks the component graph from a root and drives a [`RenderTarget`]:
//! each node pushes its local transform (times its animation matrix),
//! resolves its effective material and texture against its parent's,
//! sets its highlight overlay, and draws its primitives before its
//! children are visited. The walk uses an explicit stack.
//!
//! Material cycling is driven by [`FrameState::material_index`], passed
//! in per call, so a frame renders the same way regardless of how many
//! frames came before it.

use std::borrow::Cow;
use std::collections::HashMap;

use super::component::MaterialRef;
use super::error::{SceneError, SceneResult};
use super::graph::SceneGraph;
use super::material::Material;
use super::texture::{Texture, TextureBinding};
use crate::foundation::math::Mat4;
use crate::render::{AppliedTexture, GeometryHandle, HighlightOverlay, RenderTarget, TargetId, TransformScope};

/// Per-frame inputs to a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameState {
    /// Global material index; a node with N materials uses `index % N`
    pub material_index: usize,
}

impl FrameState {
    /// Frame state with the given material index
    pub const fn with_material_index(material_index: usize) -> Self {
        Self { material_index }
    }
}

/// Counters for one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Components visited
    pub components: usize,
    /// Draw calls issued
    pub draws: usize,
    /// Geometry uploads performed
    pub uploads: usize,
}

/// Supplies the current animation matrix for an animation id
///
/// Playback timing lives outside the composer; the composer only multiplies
/// whatever matrix the source reports onto the node's local transform.
pub trait AnimationSource {
    /// Current matrix for `animation_id`, or `None` to leave the node unanimated
    fn animation_matrix(&self, animation_id: &str) -> Option<Mat4>;
}

/// Animation source that never animates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

impl AnimationSource for NoAnimation {
    fn animation_matrix(&self, _animation_id: &str) -> Option<Mat4> {
        None
    }
}

impl AnimationSource for HashMap<String, Mat4> {
    fn animation_matrix(&self, animation_id: &str) -> Option<Mat4> {
        self.get(animation_id).copied()
    }
}

/// Texture resolved for a node
#[derive(Debug, Clone, Copy)]
struct ResolvedTexture<'g> {
    texture: &'g Texture,
    length_s: f32,
    length_t: f32,
}

/// Appearance a node passes down to its children
#[derive(Debug, Clone, Copy, Default)]
struct Appearance<'g> {
    /// `None` means the default material
    material: Option<&'g Material>,
    texture: Option<ResolvedTexture<'g>>,
}

enum Step<'g> {
    Enter { id: &'g str, inherited: Appearance<'g> },
    Exit,
}

/// Upload cache key lengths; `None` for shapes whose coordinates ignore them
type LengthKey = Option<(u32, u32)>;

/// Renders a [`SceneGraph`] into a [`RenderTarget`]
///
/// Uploaded geometry is cached per primitive (and per texture repeat
/// lengths for planar shapes), so repeated frames only issue draws. The
/// cache belongs to one target at a time; rendering into another target
/// drops it and uploads again.
pub struct SceneComposer<'g> {
    graph: &'g SceneGraph,
    uploads: HashMap<&'g str, HashMap<LengthKey, GeometryHandle>>,
    uploaded_to: Option<TargetId>,
    default_material: Material,
}

impl<'g> SceneComposer<'g> {
    /// Create a composer for `graph`
    pub fn new(graph: &'g SceneGraph) -> Self {
        Self {
            graph,
            uploads: HashMap::new(),
            uploaded_to: None,
            default_material: Material::default(),
        }
    }

    /// The scene being rendered
    pub const fn graph(&self) -> &'g SceneGraph {
        self.graph
    }

    /// Forget cached uploads, e.g. after the target lost its resources
    pub fn invalidate_uploads(&mut self) {
        self.uploads.clear();
        self.uploaded_to = None;
    }

    /// Point the upload cache at `target`, dropping handles from any other
    fn bind_target(&mut self, target: TargetId) {
        if self.uploaded_to != Some(target) {
            if self.uploaded_to.is_some() {
                log::debug!("Render target changed, discarding {} cached uploads", self.uploads.len());
            }
            self.uploads.clear();
            self.uploaded_to = Some(target);
        }
    }

    /// Render the whole scene from its root
    pub fn render<R: RenderTarget + ?Sized>(
        &mut self,
        target: &mut R,
        frame: &FrameState,
        animations: &dyn AnimationSource,
    ) -> SceneResult<RenderStats> {
        let graph = self.graph;
        self.render_from(graph.root(), target, frame, animations)
    }

    /// Render the subgraph rooted at component `root_id`
    pub fn render_from<R: RenderTarget + ?Sized>(
        &mut self,
        root_id: &str,
        target: &mut R,
        frame: &FrameState,
        animations: &dyn AnimationSource,
    ) -> SceneResult<RenderStats> {
        let graph = self.graph;
        let root = graph
            .components()
            .get(root_id)
            .map(|component| component.id.as_str())
            .ok_or_else(|| SceneError::unknown("render", "component", root_id))?;

        self.bind_target(target.target_id());
        let mut stats = RenderStats::default();
        let mut scope = TransformScope::new(target);
        let mut stack = vec![Step::Enter {
            id: root,
            inherited: Appearance::default(),
        }];

        while let Some(step) = stack.pop() {
            let (id, inherited) = match step {
                Step::Exit => {
                    scope.pop();
                    continue;
                }
                Step::Enter { id, inherited } => (id, inherited),
            };

            let component = graph
                .component(id)
                .ok_or_else(|| SceneError::unknown("render", "component", id))?;
            stats.components += 1;

            let mut local = *component.transform.matrix();
            if let Some(animation) = &component.animation {
                if let Some(matrix) = animations.animation_matrix(animation) {
                    local *= matrix;
                }
            }
            scope.push(&local);

            let appearance = self.resolve(component, inherited, frame)?;
            let target = scope.target();
            target.apply_material(appearance.material.unwrap_or(&self.default_material))?;
            target.apply_texture(
                appearance
                    .texture
                    .map(|t| AppliedTexture::new(t.texture, t.length_s, t.length_t)),
            )?;
            target.set_highlight(component.highlight.as_ref().and_then(HighlightOverlay::from_highlight))?;

            for primitive_id in &component.primitives {
                let handle = self.upload(target, primitive_id, appearance.texture, &mut stats)?;
                log::trace!("Draw {primitive_id} in {id}");
                target.draw_indexed(handle)?;
                stats.draws += 1;
            }

            stack.push(Step::Exit);
            stack.extend(component.children.iter().rev().map(|child| Step::Enter {
                id: child.as_str(),
                inherited: appearance,
            }));
        }

        Ok(stats)
    }

    fn resolve(
        &self,
        component: &'g super::Component,
        inherited: Appearance<'g>,
        frame: &FrameState,
    ) -> SceneResult<Appearance<'g>> {
        let graph = self.graph;
        let context = || format!("component '{}'", component.id);

        let material = match component.material_at(frame.material_index) {
            Some(MaterialRef::Named(id)) => Some(graph.materials().require(id, context())?),
            Some(MaterialRef::Inherit) | None => inherited.material,
        };

        let texture = match &component.texture.binding {
            TextureBinding::None => None,
            TextureBinding::Inherit => inherited.texture.map(|parent| {
                let (length_s, length_t) = component
                    .texture
                    .lengths()
                    .unwrap_or((parent.length_s, parent.length_t));
                ResolvedTexture {
                    length_s,
                    length_t,
                    ..parent
                }
            }),
            TextureBinding::Named(id) => {
                let (length_s, length_t) = component.texture.lengths().unwrap_or((1.0, 1.0));
                Some(ResolvedTexture {
                    texture: graph.textures().require(id, context())?,
                    length_s,
                    length_t,
                })
            }
        };

        Ok(Appearance { material, texture })
    }

    fn upload<R: RenderTarget + ?Sized>(
        &mut self,
        target: &mut R,
        primitive_id: &'g str,
        texture: Option<ResolvedTexture<'g>>,
        stats: &mut RenderStats,
    ) -> SceneResult<GeometryHandle> {
        let graph = self.graph;
        let primitive = graph.primitives().require(primitive_id, "render")?;

        let lengths = texture
            .filter(|_| primitive.uses_tex_scale())
            .map(|t| (t.length_s, t.length_t));
        let key = lengths.map(|(s, t)| (s.to_bits(), t.to_bits()));

        if let Some(handle) = self.uploads.get(primitive_id).and_then(|cached| cached.get(&key)) {
            return Ok(*handle);
        }

        let geometry = match lengths {
            Some((s, t)) => Cow::Owned(primitive.geometry_with_tex_scale(s, t)),
            None => Cow::Borrowed(primitive.geometry()),
        };
        let handle = target.upload_geometry(&geometry)?;
        log::debug!("Uploaded {primitive_id} ({} triangles)", geometry.triangle_count());
        stats.uploads += 1;

        self.uploads.entry(primitive_id).or_default().insert(key, handle);
        Ok(handle)
    }
}
