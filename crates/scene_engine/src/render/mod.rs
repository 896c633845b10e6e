//! Renderer collaborator interface
//!
//! The scene composer never talks to a graphics API directly. It drives a
//! [`RenderTarget`]: upload geometry once, then per node apply material and
//! texture, push the node's transform, draw, and pop. Backends implement
//! the trait; [`RecordingRenderer`] is a headless implementation that keeps
//! a command log.

mod recording;

pub use recording::{DrawCall, RecordingRenderer, RenderCommand};

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::foundation::math::Mat4;
use crate::geometry::Geometry;
use crate::scene::{Highlight, Material, Texture};

/// Errors reported by a render target
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Resource creation or upload failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// A draw or state change failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),

    /// Unknown geometry handle
    #[error("Unknown geometry handle {0:?}")]
    UnknownHandle(GeometryHandle),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Opaque handle to uploaded geometry
///
/// Only meaningful to the target that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Identity of a render target, unique within the process
///
/// Caches of [`GeometryHandle`]s remember the target they uploaded to and
/// start over when handed a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

impl TargetId {
    /// Allocate a fresh identity
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Texture state handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedTexture<'a> {
    /// Texture id
    pub id: &'a str,
    /// Image path
    pub file: &'a str,
    /// Repeat length along s
    pub length_s: f32,
    /// Repeat length along t
    pub length_t: f32,
}

impl<'a> AppliedTexture<'a> {
    /// Bind `texture` with the given repeat lengths
    pub fn new(texture: &'a Texture, length_s: f32, length_t: f32) -> Self {
        Self {
            id: &texture.id,
            file: &texture.file,
            length_s,
            length_t,
        }
    }
}

/// Highlight overlay parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightOverlay {
    /// Overlay color
    pub color: [f32; 3],
    /// Pulse scale factor
    pub scale: f32,
}

impl HighlightOverlay {
    /// Overlay for an enabled highlight, `None` when disabled
    pub fn from_highlight(highlight: &Highlight) -> Option<Self> {
        highlight.enabled.then(|| Self {
            color: [highlight.color.r, highlight.color.g, highlight.color.b],
            scale: highlight.scale,
        })
    }
}

/// The renderer capability the scene composer drives
pub trait RenderTarget {
    /// Identity that scopes this target's geometry handles
    fn target_id(&self) -> TargetId;

    /// Upload buffers and return a handle for later draws
    fn upload_geometry(&mut self, geometry: &Geometry) -> RenderResult<GeometryHandle>;

    /// Make `material` current
    fn apply_material(&mut self, material: &Material) -> RenderResult<()>;

    /// Make `texture` current, or draw untextured for `None`
    fn apply_texture(&mut self, texture: Option<AppliedTexture<'_>>) -> RenderResult<()>;

    /// Multiply `matrix` onto the current transform, saving the previous one
    fn push_transform(&mut self, matrix: &Mat4);

    /// Restore the transform saved by the matching push
    fn pop_transform(&mut self);

    /// Set or clear the highlight overlay for following draws
    fn set_highlight(&mut self, highlight: Option<HighlightOverlay>) -> RenderResult<()>;

    /// Draw previously uploaded geometry with the current state
    fn draw_indexed(&mut self, handle: GeometryHandle) -> RenderResult<()>;
}

/// Scoped transform pushes on a render target
///
/// Every push made through the scope is popped when the scope is dropped,
/// including on early returns, so the target's transform stack is restored
/// on all exit paths.
pub struct TransformScope<'a, R: RenderTarget + ?Sized> {
    target: &'a mut R,
    depth: usize,
}

impl<'a, R: RenderTarget + ?Sized> TransformScope<'a, R> {
    /// Open a scope on `target`
    pub fn new(target: &'a mut R) -> Self {
        Self { target, depth: 0 }
    }

    /// Push a transform that will be popped by this scope
    pub fn push(&mut self, matrix: &Mat4) {
        self.target.push_transform(matrix);
        self.depth += 1;
    }

    /// Pop the most recent push made through this scope
    pub fn pop(&mut self) {
        if self.depth > 0 {
            self.target.pop_transform();
            self.depth -= 1;
        }
    }

    /// Number of pushes still open
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The wrapped target, for non-transform calls
    pub fn target(&mut self) -> &mut R {
        &mut *self.target
    }
}

impl<R: RenderTarget + ?Sized> Drop for TransformScope<'_, R> {
    fn drop(&mut self) {
        while self.depth > 0 {
            self.pop();
        }
    }
}
