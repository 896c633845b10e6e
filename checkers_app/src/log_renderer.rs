//! Render target that reports through the logger
//!
//! Stands in for a GPU backend: it hands out handles, tracks the
//! transform stack depth and logs what a real backend would submit.

use std::collections::HashMap;

use scene_engine::foundation::math::Mat4;
use scene_engine::geometry::Geometry;
use scene_engine::render::{
    AppliedTexture, GeometryHandle, HighlightOverlay, RenderError, RenderResult, RenderTarget, TargetId,
};
use scene_engine::scene::Material;

/// Totals for the calls since the last [`LogRenderer::end_frame`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameTotals {
    /// Draw calls
    pub draws: usize,
    /// Triangles submitted
    pub triangles: usize,
    /// Deepest transform nesting
    pub max_depth: usize,
}

/// Logging render target
#[derive(Debug, Default)]
pub struct LogRenderer {
    id: TargetId,
    triangles: HashMap<GeometryHandle, usize>,
    next_handle: u64,
    depth: usize,
    frame: FrameTotals,
}

impl LogRenderer {
    /// Create a renderer with nothing uploaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of geometries uploaded
    pub fn uploaded(&self) -> usize {
        self.triangles.len()
    }

    /// Close the current frame and return its totals
    pub fn end_frame(&mut self) -> FrameTotals {
        let totals = std::mem::take(&mut self.frame);
        log::info!(
            "Frame: {} draws, {} triangles, max depth {}",
            totals.draws,
            totals.triangles,
            totals.max_depth
        );
        totals
    }
}

impl RenderTarget for LogRenderer {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn upload_geometry(&mut self, geometry: &Geometry) -> RenderResult<GeometryHandle> {
        if !geometry.is_consistent() {
            return Err(RenderError::ResourceCreationFailed("inconsistent geometry buffers".into()));
        }
        let handle = GeometryHandle(self.next_handle);
        self.next_handle += 1;
        self.triangles.insert(handle, geometry.triangle_count());

        log::debug!(
            "Upload {handle:?}: {} vertices, {} triangles, {} index bytes",
            geometry.vertex_count(),
            geometry.triangle_count(),
            geometry.index_bytes().len()
        );
        Ok(handle)
    }

    fn apply_material(&mut self, material: &Material) -> RenderResult<()> {
        log::trace!("Material: shininess {}", material.shininess);
        Ok(())
    }

    fn apply_texture(&mut self, texture: Option<AppliedTexture<'_>>) -> RenderResult<()> {
        match texture {
            Some(texture) => log::trace!(
                "Texture: {} ({}) repeat {}x{}",
                texture.id,
                texture.file,
                texture.length_s,
                texture.length_t
            ),
            None => log::trace!("Texture: none"),
        }
        Ok(())
    }

    fn push_transform(&mut self, _matrix: &Mat4) {
        self.depth += 1;
        self.frame.max_depth = self.frame.max_depth.max(self.depth);
    }

    fn pop_transform(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn set_highlight(&mut self, highlight: Option<HighlightOverlay>) -> RenderResult<()> {
        if let Some(highlight) = highlight {
            log::trace!("Highlight: {:?} x{}", highlight.color, highlight.scale);
        }
        Ok(())
    }

    fn draw_indexed(&mut self, handle: GeometryHandle) -> RenderResult<()> {
        let triangles = *self.triangles.get(&handle).ok_or(RenderError::UnknownHandle(handle))?;
        self.frame.draws += 1;
        self.frame.triangles += triangles;
        log::trace!("Draw {handle:?} at depth {}", self.depth);
        Ok(())
    }
}
