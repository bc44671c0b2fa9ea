//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! The fill tessellator hands its triangles to a [`TriangleBuilder`]. The
//! simplest builder is a `Vec<Triangle>`. To feed a GPU, the
//! [`BuffersBuilder`] writes into a pair of vertex and index vectors
//! ([`VertexBuffers`]) and delegates the creation of each vertex to a
//! [`VertexConstructor`].
//!
//! Vertices are never shared between triangles: every vertex of a curve
//! triangle carries its own Loop-Blinn coordinates. The constructor receives
//! a [`CurveVertex`] with:
//!
//! * the position,
//! * the canonical `uv` coordinates, `(0, 0)`, `(1/2, 0)` and `(1, 1)` for the
//!   three vertices of a curve triangle and `(0, 0)` otherwise,
//! * the kind of the triangle, from which the shader derives the sign of the
//!   coverage test,
//! * the fill id.
//!
//! ## Example
//!
//! ```
//! use quill_tessellation::{BuffersBuilder, CurveVertex, FillOptions, FillTessellator};
//! use quill_tessellation::{TriangleKind, VertexBuffers};
//! use quill_tessellation::path::{FillId, FillStyles, Path};
//! use quill_tessellation::math::point;
//!
//! #[derive(Copy, Clone, Debug)]
//! struct GpuVertex {
//!     position: [f32; 2],
//!     uv: [f32; 2],
//!     sign: f32,
//! }
//!
//! let mut builder = Path::builder();
//! builder.set_fills(FillStyles::new(FillId(1), FillId::NONE));
//! builder.begin(point(0.0, 0.0));
//! builder.quadratic_bezier_to(point(1.0, 1.0), point(0.0, 2.0));
//! builder.line_to(point(-1.0, 2.0));
//! builder.close();
//! let path = builder.build();
//!
//! let mut buffers: VertexBuffers<GpuVertex, u16> = VertexBuffers::new();
//! let mut tessellator = FillTessellator::new();
//! tessellator.tessellate_path(
//!     &path,
//!     FillId(1),
//!     &FillOptions::default(),
//!     &mut BuffersBuilder::new(&mut buffers, |v: CurveVertex| GpuVertex {
//!         position: v.position.to_array(),
//!         uv: v.uv,
//!         sign: match v.kind {
//!             TriangleKind::Fill => 0.0,
//!             TriangleKind::CurveInner => 1.0,
//!             TriangleKind::CurveOuter => -1.0,
//!         },
//!     }),
//! ).unwrap();
//!
//! assert_eq!(buffers.vertices.len(), buffers.indices.len());
//! assert_eq!(buffers.indices.len() % 3, 0);
//! ```

use crate::error::GeometryBuilderError;
use crate::math::Point;
use crate::trapezoid::{Triangle, TriangleKind};
use crate::{FillId, Index, VertexId};

use std::convert::From;
use std::ops::Add;

/// Canonical Loop-Blinn coordinates of the vertices of a curve triangle.
pub const CURVE_UVS: [[f32; 2]; 3] = [[0.0, 0.0], [0.5, 0.0], [1.0, 1.0]];

/// An interface separating the tessellator from the way its output is stored.
pub trait TriangleBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    fn end_geometry(&mut self) {}

    /// Adds a triangle.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, triangle: &Triangle) -> Result<(), GeometryBuilderError>;

    /// Called instead of end_geometry if an error occurred.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}
}

/// Collects the triangles as they are.
impl TriangleBuilder for Vec<Triangle> {
    fn add_triangle(&mut self, triangle: &Triangle) -> Result<(), GeometryBuilderError> {
        self.push(*triangle);
        Ok(())
    }
}

/// A vertex of an output triangle, as passed to a `VertexConstructor`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CurveVertex {
    pub position: Point,
    pub uv: [f32; 2],
    pub kind: TriangleKind,
    pub fill: FillId,
}

impl CurveVertex {
    /// The three vertices of a triangle, in order.
    pub fn from_triangle(triangle: &Triangle) -> [CurveVertex; 3] {
        let uv = |i: usize| {
            if triangle.kind.is_curve() {
                CURVE_UVS[i]
            } else {
                [0.0, 0.0]
            }
        };
        let vertex = |i: usize| CurveVertex {
            position: triangle.vertices[i],
            uv: uv(i),
            kind: triangle.kind,
            fill: triangle.fill,
        };

        [vertex(0), vertex(1), vertex(2)]
    }

    /// Whether the vertex belongs to a curve triangle.
    #[inline]
    pub fn is_curve(&self) -> bool {
        self.kind.is_curve()
    }
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    pub fn new() -> Self {
        VertexBuffers::with_capacity(256, 256)
    }

    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// A trait specifying how to create vertex values.
pub trait VertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: CurveVertex) -> OutputVertex;
}

impl<F, OutputVertex> VertexConstructor<OutputVertex> for F
where
    F: Fn(CurveVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: CurveVertex) -> OutputVertex {
        self(vertex)
    }
}

/// A simple vertex constructor that just takes the position.
pub struct Positions;

impl VertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: CurveVertex) -> Point {
        vertex.position
    }
}

/// A temporary view on a `VertexBuffers` object which facilitates the
/// population of vertex and index data.
///
/// Indices refer to the position of the vertices in the buffer, plus an
/// optional offset.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: Index,
    first_index: Index,
    vertex_offset: Index,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as Index;
        let first_index = buffers.indices.len() as Index;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_offset: 0,
            vertex_constructor: ctor,
        }
    }

    pub fn with_vertex_offset(mut self, offset: Index) -> Self {
        self.vertex_offset = offset;

        self
    }

    pub fn buffers<'a, 'b: 'a>(&'b self) -> &'a VertexBuffers<OutputVertex, OutputIndex> {
        self.buffers
    }
}

/// A `BuffersBuilder` that only stores positions.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point, u16, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point, u16>) -> SimpleBuffersBuilder {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> TriangleBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
    Ctor: VertexConstructor<OutputVertex>,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as Index;
        self.first_index = self.buffers.indices.len() as Index;
    }

    fn add_triangle(&mut self, triangle: &Triangle) -> Result<(), GeometryBuilderError> {
        let base = self.buffers.vertices.len();
        if base + self.vertex_offset as usize + 2 > OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }

        let vertices = CurveVertex::from_triangle(triangle);
        for vertex in &vertices {
            if !vertex.position.x.is_finite() || !vertex.position.y.is_finite() {
                return Err(GeometryBuilderError::InvalidVertex);
            }
        }

        let first = VertexId::from_usize(base) + self.vertex_offset;
        for (i, vertex) in vertices.iter().enumerate() {
            self.buffers
                .vertices
                .push(self.vertex_constructor.new_vertex(*vertex));
            self.buffers.indices.push((first + i as u32).into());
        }

        Ok(())
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }
}

/// A triangle builder that does not output any geometry.
///
/// Mostly useful for testing.
pub struct NoOutput {
    num_triangles: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput { num_triangles: 0 }
    }

    /// The number of triangles received since `begin_geometry`.
    pub fn num_triangles(&self) -> u32 {
        self.num_triangles
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.num_triangles = 0;
    }

    fn add_triangle(&mut self, _: &Triangle) -> Result<(), GeometryBuilderError> {
        if self.num_triangles == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.num_triangles += 1;

        Ok(())
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the tessellator can't represent more than u32::MAX
/// indices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u8 {
    const MAX: usize = u8::MAX as usize;
}
impl MaxIndex for i8 {
    const MAX: usize = i8::MAX as usize;
}
impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for i16 {
    const MAX: usize = i16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for i32 {
    const MAX: usize = i32::MAX as usize;
}
// The tessellator internally uses u32 indices so we can't have more than u32::MAX
impl MaxIndex for u64 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for i64 {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}
impl MaxIndex for isize {
    const MAX: usize = u32::MAX as usize;
}

#[cfg(test)]
use crate::math::point;

#[test]
fn curve_vertices() {
    let triangle = Triangle {
        vertices: [point(0.0, 0.0), point(1.0, 1.0), point(0.0, 2.0)],
        kind: TriangleKind::CurveOuter,
        fill: FillId(4),
    };

    let vertices = CurveVertex::from_triangle(&triangle);
    assert_eq!(vertices[0].uv, [0.0, 0.0]);
    assert_eq!(vertices[1].uv, [0.5, 0.0]);
    assert_eq!(vertices[2].uv, [1.0, 1.0]);
    assert_eq!(vertices[1].position, point(1.0, 1.0));
    assert!(vertices.iter().all(|v| v.is_curve() && v.fill == FillId(4)));

    let fill = Triangle {
        kind: TriangleKind::Fill,
        ..triangle
    };
    assert!(CurveVertex::from_triangle(&fill)
        .iter()
        .all(|v| v.uv == [0.0, 0.0] && !v.is_curve()));
}

#[test]
fn buffers_builder_offsets() {
    let triangle = Triangle {
        vertices: [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
        kind: TriangleKind::Fill,
        fill: FillId(1),
    };

    let mut buffers: VertexBuffers<Point, u16> = VertexBuffers::new();
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_triangle(&triangle).unwrap();
        builder.add_triangle(&triangle).unwrap();
        builder.end_geometry();
    }
    assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5]);

    // A second builder starts after the existing vertices.
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_triangle(&triangle).unwrap();
        builder.end_geometry();
    }
    assert_eq!(&buffers.indices[6..], &[6, 7, 8]);
    assert_eq!(buffers.vertices.len(), 9);

    // Aborting drops what was added since begin_geometry.
    {
        let mut builder = simple_builder(&mut buffers);
        builder.begin_geometry();
        builder.add_triangle(&triangle).unwrap();
        builder.abort_geometry();
    }
    assert_eq!(buffers.vertices.len(), 9);
    assert_eq!(buffers.indices.len(), 9);
}

#[test]
fn too_many_vertices() {
    let triangle = Triangle {
        vertices: [point(0.0, 0.0), point(1.0, 0.0), point(0.0, 1.0)],
        kind: TriangleKind::Fill,
        fill: FillId(1),
    };

    let mut buffers: VertexBuffers<Point, u8> = VertexBuffers::new();
    let mut builder = BuffersBuilder::new(&mut buffers, Positions);
    builder.begin_geometry();
    for _ in 0..85 {
        builder.add_triangle(&triangle).unwrap();
    }
    assert_eq!(
        builder.add_triangle(&triangle),
        Err(GeometryBuilderError::TooManyVertices)
    );
}
