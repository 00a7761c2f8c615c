//! Source meshes handed to the section pipeline.

use roadsect_math::{Aabb3, Point3, Tolerance};

use crate::error::{Result, SectionError};
use crate::types::{Color, SurfaceKind, Triangle};

/// A named, classified triangle soup with its bounding box.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    /// Display name of the source entity.
    pub name: String,
    /// Surface classification.
    pub kind: SurfaceKind,
    /// Display colour for section lines.
    pub color: Color,
    triangles: Vec<Triangle>,
    bounds: Aabb3,
}

impl SurfaceMesh {
    /// Create a mesh from triangles.
    ///
    /// Rejects triangles with two vertices closer than `tol`. Pass the
    /// tolerance the sections are built with (`SectionContext::tolerance`).
    pub fn new(
        name: impl Into<String>,
        kind: SurfaceKind,
        color: Color,
        triangles: Vec<Triangle>,
        tol: &Tolerance,
    ) -> Result<Self> {
        if let Some(index) = triangles
            .iter()
            .position(|tri| tri.has_coincident_vertices(tol))
        {
            return Err(SectionError::DegenerateTriangle { index });
        }

        let mut bounds = Aabb3::empty();
        for tri in &triangles {
            bounds.include_point(&tri.v0);
            bounds.include_point(&tri.v1);
            bounds.include_point(&tri.v2);
        }

        Ok(Self {
            name: name.into(),
            kind,
            color,
            triangles,
            bounds,
        })
    }

    /// Create a mesh from flat render buffers.
    ///
    /// `vertices` is `[x0, y0, z0, x1, ...]` and `indices` holds three
    /// vertex indices per triangle.
    pub fn from_indexed(
        name: impl Into<String>,
        kind: SurfaceKind,
        color: Color,
        vertices: &[f32],
        indices: &[u32],
        tol: &Tolerance,
    ) -> Result<Self> {
        let num_vertices = vertices.len() / 3;
        let vertex = |i: u32| -> Result<Point3> {
            let i = i as usize;
            if i >= num_vertices {
                return Err(SectionError::IndexOutOfRange {
                    index: i,
                    len: num_vertices,
                });
            }
            Ok(Point3::new(
                vertices[i * 3] as f64,
                vertices[i * 3 + 1] as f64,
                vertices[i * 3 + 2] as f64,
            ))
        };

        let triangles = indices
            .chunks_exact(3)
            .map(|tri| Ok(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)))
            .collect::<Result<Vec<_>>>()?;

        Self::new(name, kind, color, triangles, tol)
    }

    /// Triangles of the mesh.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Bounding box of all vertices.
    pub fn bounds(&self) -> &Aabb3 {
        &self.bounds
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }
}

/// Combined bounding box of a mesh list.
pub fn meshes_bounds(meshes: &[SurfaceMesh]) -> Aabb3 {
    let mut bounds = Aabb3::empty();
    for mesh in meshes {
        bounds.include_box(mesh.bounds());
    }
    bounds
}
