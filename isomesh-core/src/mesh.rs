//! Non-indexed surface mesh produced by isosurface extraction

use crate::point::*;

/// Number of floats stored per vertex (x, y, z)
pub const FLOATS_PER_VERTEX: usize = 3;

/// Number of floats stored per triangle (3 vertices)
pub const FLOATS_PER_TRIANGLE: usize = 3 * FLOATS_PER_VERTEX;

/// A flat, non-indexed triangle mesh.
///
/// Positions are stored as consecutive `x, y, z` floats and every three
/// vertices form one triangle. There is no connectivity buffer, so vertices
/// shared between adjacent triangles are duplicated, and no per-vertex
/// normals are carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMesh {
    positions: Vec<f32>,
}

impl SurfaceMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    /// Create an empty mesh with room for `floats` position components
    pub fn with_capacity(floats: usize) -> Self {
        Self {
            positions: Vec::with_capacity(floats),
        }
    }

    /// Wrap an existing flat position buffer.
    ///
    /// Trailing floats that do not complete a triangle are kept in the buffer
    /// but ignored by [`triangles`](Self::triangles).
    pub fn from_positions(positions: Vec<f32>) -> Self {
        Self { positions }
    }

    /// Append one vertex
    #[inline]
    pub fn push_vertex(&mut self, vertex: Point3f) {
        self.positions.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);
    }

    /// Append every float of `other` after this mesh's own
    pub fn append(&mut self, other: &mut SurfaceMesh) {
        self.positions.append(&mut other.positions);
    }

    /// Flat position buffer
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Hand the position buffer to the consumer
    pub fn into_positions(self) -> Vec<f32> {
        self.positions
    }

    /// Raw bytes of the position buffer, ready for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_VERTEX
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_TRIANGLE
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reserved capacity in floats
    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Iterate over vertex positions in emission order
    pub fn vertices(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.positions
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|v| Point3f::new(v[0], v[1], v[2]))
    }

    /// Iterate over triangles in emission order
    pub fn triangles(&self) -> impl Iterator<Item = [Point3f; 3]> + '_ {
        self.positions.chunks_exact(FLOATS_PER_TRIANGLE).map(|t| {
            [
                Point3f::new(t[0], t[1], t[2]),
                Point3f::new(t[3], t[4], t[5]),
                Point3f::new(t[6], t[7], t[8]),
            ]
        })
    }

    /// Calculate face normals from triangle winding.
    ///
    /// The mesh carries no normals, so consumers that need lighting derive
    /// them here. Degenerate triangles get a zero vector.
    pub fn face_normals(&self) -> Vec<Vector3f> {
        self.triangles()
            .map(|[v0, v1, v2]| {
                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1
                    .cross(&edge2)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3f::zeros)
            })
            .collect()
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<Bounds3f> {
        let mut vertices = self.vertices();
        let first = vertices.next()?;

        Some(vertices.fold((first, first), |(mut min, mut max), p| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
            (min, max)
        }))
    }
}
