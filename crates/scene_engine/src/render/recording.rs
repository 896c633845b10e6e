//! Headless render target that records every call

use super::{
    AppliedTexture, GeometryHandle, HighlightOverlay, RenderError, RenderResult, RenderTarget, TargetId,
};
use crate::foundation::math::Mat4;
use crate::geometry::Geometry;
use crate::scene::Material;

/// One call made on a [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Geometry uploaded
    Upload {
        /// Handle returned
        handle: GeometryHandle,
        /// Vertex count of the upload
        vertices: usize,
        /// Triangle count of the upload
        triangles: usize,
        /// Total buffer size in bytes
        bytes: usize,
    },
    /// Material applied
    Material(Material),
    /// Texture applied (`None` means untextured)
    Texture(Option<(String, f32, f32)>),
    /// Transform pushed
    PushTransform(Mat4),
    /// Transform popped
    PopTransform,
    /// Highlight set or cleared
    Highlight(Option<HighlightOverlay>),
    /// Geometry drawn
    Draw(GeometryHandle),
}

/// Snapshot of the render state at a draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Geometry drawn
    pub handle: GeometryHandle,
    /// Composed transform
    pub world: Mat4,
    /// Material current at the draw
    pub material: Option<Material>,
    /// Texture id and repeat lengths current at the draw
    pub texture: Option<(String, f32, f32)>,
    /// Highlight current at the draw
    pub highlight: Option<HighlightOverlay>,
}

/// Render target that keeps a command log and the state at each draw
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    id: TargetId,
    commands: Vec<RenderCommand>,
    draws: Vec<DrawCall>,
    geometries: Vec<Geometry>,
    stack: Vec<Mat4>,
    material: Option<Material>,
    texture: Option<(String, f32, f32)>,
    highlight: Option<HighlightOverlay>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// State snapshots of every draw, in order
    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Uploaded geometry for a handle
    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        usize::try_from(handle.0)
            .ok()
            .and_then(|index| self.geometries.get(index))
    }

    /// Number of uploads so far
    pub fn upload_count(&self) -> usize {
        self.geometries.len()
    }

    /// Number of transforms currently pushed
    pub fn transform_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current composed transform
    pub fn current_transform(&self) -> Mat4 {
        self.stack.last().copied().unwrap_or_else(Mat4::identity)
    }

    /// Forget recorded commands and draws, keeping uploads
    pub fn clear_log(&mut self) {
        self.commands.clear();
        self.draws.clear();
    }
}

impl RenderTarget for RecordingRenderer {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn upload_geometry(&mut self, geometry: &Geometry) -> RenderResult<GeometryHandle> {
        if !geometry.is_consistent() {
            return Err(RenderError::ResourceCreationFailed(
                "index out of range or attribute arrays differ in length".into(),
            ));
        }
        let handle = GeometryHandle(self.geometries.len() as u64);
        let bytes = geometry.vertex_bytes().len()
            + geometry.normal_bytes().len()
            + geometry.tex_coord_bytes().len()
            + geometry.index_bytes().len();
        self.commands.push(RenderCommand::Upload {
            handle,
            vertices: geometry.vertex_count(),
            triangles: geometry.triangle_count(),
            bytes,
        });
        self.geometries.push(geometry.clone());
        Ok(handle)
    }

    fn apply_material(&mut self, material: &Material) -> RenderResult<()> {
        self.commands.push(RenderCommand::Material(material.clone()));
        self.material = Some(material.clone());
        Ok(())
    }

    fn apply_texture(&mut self, texture: Option<AppliedTexture<'_>>) -> RenderResult<()> {
        let texture = texture.map(|t| (t.id.to_string(), t.length_s, t.length_t));
        self.commands.push(RenderCommand::Texture(texture.clone()));
        self.texture = texture;
        Ok(())
    }

    fn push_transform(&mut self, matrix: &Mat4) {
        let world = self.current_transform() * matrix;
        self.commands.push(RenderCommand::PushTransform(*matrix));
        self.stack.push(world);
    }

    fn pop_transform(&mut self) {
        self.commands.push(RenderCommand::PopTransform);
        self.stack.pop();
    }

    fn set_highlight(&mut self, highlight: Option<HighlightOverlay>) -> RenderResult<()> {
        self.commands.push(RenderCommand::Highlight(highlight));
        self.highlight = highlight;
        Ok(())
    }

    fn draw_indexed(&mut self, handle: GeometryHandle) -> RenderResult<()> {
        if self.geometry(handle).is_none() {
            return Err(RenderError::UnknownHandle(handle));
        }
        self.commands.push(RenderCommand::Draw(handle));
        self.draws.push(DrawCall {
            handle,
            world: self.current_transform(),
            material: self.material.clone(),
            texture: self.texture.clone(),
            highlight: self.highlight,
        });
        Ok(())
    }
}
