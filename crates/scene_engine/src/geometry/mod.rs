//! Parametric primitive geometry
//!
//! Every primitive kind a scene document can declare is a small parameter
//! set that synthesizes its own buffers through [`GeometrySource`]. The
//! [`Shape`] enum dispatches over the kinds and [`Primitive`] pairs a shape
//! with the buffers generated for it at construction.
//!
//! Buffers are index-parallel: `normals[i]` and `tex_coords[i]` belong to
//! `vertices[i]`, and every index triple references a valid vertex.

mod cylinder;
mod patch;
mod rectangle;
mod sphere;
mod torus;
mod triangle;

pub use cylinder::Cylinder;
pub use patch::Patch;
pub use rectangle::Rectangle;
pub use sphere::Sphere;
pub use torus::Torus;
pub use triangle::Triangle;

use thiserror::Error;

/// Largest subdivision count along one parameter direction
///
/// Generators clamp larger counts; the scene parser rejects them.
pub const MAX_SUBDIVISIONS: u32 = 1024;

/// Largest patch degree along one parameter direction
pub const MAX_PATCH_DEGREE: usize = 16;

/// Invalid shape parameters detected while building a shape in code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Control-point grid is empty or ragged
    #[error("invalid control grid: {0}")]
    InvalidControlGrid(String),

    /// A subdivision count is zero
    #[error("{0} must be at least 1")]
    ZeroSubdivision(&'static str),

    /// A subdivision count exceeds [`MAX_SUBDIVISIONS`]
    #[error("{name} must be at most {limit}")]
    ExcessiveSubdivision {
        /// Parameter name, e.g. `parts_u`
        name: &'static str,
        /// Largest accepted count
        limit: u32,
    },

    /// The control grid is larger than [`MAX_PATCH_DEGREE`] allows
    #[error("degree {degree} along {direction} exceeds {limit}")]
    ExcessiveDegree {
        /// `u` or `v`
        direction: &'static str,
        /// Degree implied by the grid
        degree: usize,
        /// Largest accepted degree
        limit: usize,
    },
}

/// Clamp a requested subdivision count into `1..=MAX_SUBDIVISIONS`
pub(crate) fn subdivisions(count: u32) -> u32 {
    count.clamp(1, MAX_SUBDIVISIONS)
}

/// Triangle-list buffers ready for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    /// Vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Unit normals, one per vertex
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates, one per vertex
    pub tex_coords: Vec<[f32; 2]>,
    /// Triangles as vertex-index triples
    pub indices: Vec<[u32; 3]>,
}

impl Geometry {
    /// Create empty buffers with room for `vertices` vertices and `triangles` triangles
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles),
        }
    }

    /// Create empty buffers for a `columns` by `rows` quad grid with duplicated seam vertices
    pub(crate) fn for_grid(columns: u32, rows: u32) -> Self {
        let (columns, rows) = (columns as usize, rows as usize);
        Self::with_capacity((columns + 1) * (rows + 1), 2 * columns * rows)
    }

    /// Append one vertex with its normal and texture coordinate
    pub fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) {
        self.vertices.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Check the buffer invariants: parallel attribute arrays and in-range indices
    pub fn is_consistent(&self) -> bool {
        let count = self.vertices.len();
        self.normals.len() == count
            && self.tex_coords.len() == count
            && self
                .indices
                .iter()
                .flatten()
                .all(|&index| (index as usize) < count)
    }

    /// Indices flattened into a plain triangle list
    pub fn flat_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().flatten().copied()
    }

    /// Vertex positions as raw bytes
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Normals as raw bytes
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Texture coordinates as raw bytes
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    /// Index triples as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Something that can synthesize renderable buffers from its parameters
pub trait GeometrySource {
    /// Generate vertex, normal, texture-coordinate and index buffers
    fn generate(&self) -> Geometry;

    /// Texture coordinates for a texture repeating every `length_s` by `length_t` units
    ///
    /// `None` means the shape keeps its parametric coordinates regardless of
    /// the repeat lengths.
    fn scaled_tex_coords(&self, _length_s: f32, _length_t: f32) -> Option<Vec<[f32; 2]>> {
        None
    }
}

/// The closed set of primitive kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle in the z = 0 plane
    Rectangle(Rectangle),
    /// Triangle from three explicit points
    Triangle(Triangle),
    /// Tapered cylinder along +z
    Cylinder(Cylinder),
    /// Latitude/longitude sphere
    Sphere(Sphere),
    /// Torus around the z axis
    Torus(Torus),
    /// Rational Bezier patch
    Patch(Patch),
}

impl Shape {
    /// Document tag name of this kind
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::Triangle(_) => "triangle",
            Self::Cylinder(_) => "cylinder",
            Self::Sphere(_) => "sphere",
            Self::Torus(_) => "torus",
            Self::Patch(_) => "patch",
        }
    }

    fn source(&self) -> &dyn GeometrySource {
        match self {
            Self::Rectangle(shape) => shape,
            Self::Triangle(shape) => shape,
            Self::Cylinder(shape) => shape,
            Self::Sphere(shape) => shape,
            Self::Torus(shape) => shape,
            Self::Patch(shape) => shape,
        }
    }
}

impl GeometrySource for Shape {
    fn generate(&self) -> Geometry {
        self.source().generate()
    }

    fn scaled_tex_coords(&self, length_s: f32, length_t: f32) -> Option<Vec<[f32; 2]>> {
        self.source().scaled_tex_coords(length_s, length_t)
    }
}

/// A named shape together with the buffers generated for it
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    id: String,
    shape: Shape,
    geometry: Geometry,
}

impl Primitive {
    /// Create a primitive, generating its geometry once
    pub fn new(id: impl Into<String>, shape: Shape) -> Self {
        let geometry = shape.generate();
        debug_assert!(geometry.is_consistent());
        Self {
            id: id.into(),
            shape,
            geometry,
        }
    }

    /// Primitive identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Shape parameters
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Generated buffers
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Regenerate only the texture coordinates for the given repeat lengths
    ///
    /// Vertex, normal and index buffers are left untouched.
    pub fn update_tex_coords(&mut self, length_s: f32, length_t: f32) {
        if let Some(tex_coords) = self.shape.scaled_tex_coords(length_s, length_t) {
            self.geometry.tex_coords = tex_coords;
        }
    }

    /// Copy of the geometry with texture coordinates for the given repeat lengths
    pub fn geometry_with_tex_scale(&self, length_s: f32, length_t: f32) -> Geometry {
        let mut geometry = self.geometry.clone();
        if let Some(tex_coords) = self.shape.scaled_tex_coords(length_s, length_t) {
            geometry.tex_coords = tex_coords;
        }
        geometry
    }

    /// Whether the repeat lengths change this primitive's texture coordinates
    pub fn uses_tex_scale(&self) -> bool {
        self.shape.scaled_tex_coords(1.0, 1.0).is_some()
    }
}

/// Normalize `v`, falling back to `fallback` for (near) zero vectors
pub(crate) fn normalize_or(v: crate::foundation::math::Vec3, fallback: [f32; 3]) -> [f32; 3] {
    v.try_normalize(1e-12).map_or(fallback, |n| [n.x, n.y, n.z])
}
