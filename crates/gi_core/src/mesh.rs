//! Triangle mesh representation produced by mesh import.
//!
//! A mesh is just vertex positions plus triangle indices. The renderer turns
//! every triangle into its own primitive; nothing here knows about materials
//! or camera space.

use gi_math::Vec3;

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh from positions and triangle indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Create a mesh from polygon faces, fan-triangulating anything with more
    /// than three vertices.
    ///
    /// Faces with fewer than three vertices are dropped.
    pub fn from_polygons(positions: Vec<Vec3>, faces: &[Vec<u32>]) -> Self {
        let indices = triangulate(faces);
        Self { positions, indices }
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Extract triangle vertices as `[v0, v1, v2]` triplets.
    ///
    /// Triangles referencing vertices that don't exist are skipped with a
    /// warning.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            // Bounds check
            if i0 >= self.positions.len()
                || i1 >= self.positions.len()
                || i2 >= self.positions.len()
            {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            }

            triangles.push([self.positions[i0], self.positions[i1], self.positions[i2]]);
        }

        triangles
    }
}

/// Fan triangulation: polygon [0, 1, 2, 3, ... n-1] becomes
/// (0,1,2), (0,2,3), ... (0,n-2,n-1).
fn triangulate(faces: &[Vec<u32>]) -> Vec<u32> {
    let mut indices = Vec::with_capacity(faces.len() * 3);

    for face in faces {
        if face.len() < 3 {
            continue;
        }
        for i in 1..(face.len() - 1) {
            indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
        }
    }

    indices
}
