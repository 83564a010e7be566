/// Indexed triangle meshes and a few built-in shapes
use std::rc::Rc;

use nalgebra::{Point3, Vector3};

use crate::error::{GpuError, Result};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// Zero-argument mesh factory attached to a menu entry
pub type MeshBuilder = Rc<dyn Fn() -> Result<Mesh>>;

/// Wrap a closure as a [`MeshBuilder`]
pub fn mesh_builder<F>(build: F) -> MeshBuilder
where
    F: Fn() -> Result<Mesh> + 'static,
{
    Rc::new(build)
}

/// Face normal of a counter-clockwise triangle
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1.cross(&edge2).normalize()
}

/// A triangle mesh: flat vertex list plus triangle indices into it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check that indices form whole triangles over existing vertices
    pub fn validate(&self) -> std::result::Result<(), GpuError> {
        if self.indices.len() % 3 != 0 {
            return Err(GpuError::InvalidMesh(format!(
                "{} indices do not form whole triangles",
                self.indices.len()
            )));
        }
        let vertex_count = self.vertices.len();
        match self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            Some(index) => Err(GpuError::InvalidMesh(format!(
                "index {index} out of range for {vertex_count} vertices"
            ))),
            None => Ok(()),
        }
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Append a flat-shaded convex polygon, fanned from its first corner.
    /// Winding is flipped if needed so the normal points away from `interior`.
    pub fn add_face(&mut self, corners: &[Point3<f32>], interior: &Point3<f32>) {
        if corners.len() < 3 {
            return;
        }
        let mut corners = corners.to_vec();
        let mut normal = face_normal(&corners[0], &corners[1], &corners[2]);
        if normal.dot(&(corners[0] - interior)) < 0.0 {
            corners.reverse();
            normal = -normal;
        }

        let base = self.vertices.len() as u32;
        self.vertices
            .extend(corners.iter().map(|&position| Vertex { position, normal }));
        for i in 1..corners.len() as u32 - 1 {
            self.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }

    /// Append another mesh, re-basing its indices
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Axis-aligned bounds, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }

    /// Move the mesh so its bounding box is centered on the origin
    pub fn centered(mut self) -> Self {
        if let Some((min, max)) = self.bounds() {
            let center = nalgebra::center(&min, &max);
            self.translate(-center.coords);
        }
        self
    }

    /// Axis-aligned cube with edge length `size`, centered on the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = Point3::new;
        let faces = [
            [p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)],
            [p(h, -h, -h), p(-h, -h, -h), p(-h, h, -h), p(h, h, -h)],
            [p(-h, h, h), p(h, h, h), p(h, h, -h), p(-h, h, -h)],
            [p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)],
            [p(h, -h, h), p(h, -h, -h), p(h, h, -h), p(h, h, h)],
            [p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)],
        ];

        let mut mesh = Self::new();
        for face in &faces {
            mesh.add_face(face, &Point3::origin());
        }
        mesh
    }

    pub fn tetrahedron(size: f32) -> Self {
        let s = size / 2.0;
        let corners = [
            Point3::new(s, s, s),
            Point3::new(-s, -s, s),
            Point3::new(-s, s, -s),
            Point3::new(s, -s, -s),
        ];
        let mut mesh = Self::new();
        for skip in 0..corners.len() {
            let face: Vec<_> = (0..corners.len())
                .filter(|&i| i != skip)
                .map(|i| corners[i])
                .collect();
            mesh.add_face(&face, &Point3::origin());
        }
        mesh
    }

    pub fn octahedron(size: f32) -> Self {
        let r = size / 2.0;
        let mut mesh = Self::new();
        for sx in [-r, r] {
            for sy in [-r, r] {
                for sz in [-r, r] {
                    let face = [
                        Point3::new(sx, 0.0, 0.0),
                        Point3::new(0.0, sy, 0.0),
                        Point3::new(0.0, 0.0, sz),
                    ];
                    mesh.add_face(&face, &Point3::origin());
                }
            }
        }
        mesh
    }

    /// Cubes stacked along +Y, each level smaller than the one below
    pub fn tower(levels: usize, base: f32) -> Self {
        let mut mesh = Self::new();
        let mut y = 0.0;
        for level in 0..levels {
            let size = base * (1.0 - level as f32 / (levels as f32 + 1.0));
            let mut block = Self::cube(size);
            block.translate(Vector3::new(0.0, y + size / 2.0, 0.0));
            mesh.merge(&block);
            y += size;
        }
        mesh
    }

    /// `n`³ small cubes on a regular grid
    pub fn lattice(n: usize, spacing: f32) -> Self {
        let mut mesh = Self::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let mut block = Self::cube(spacing / 2.0);
                    block.translate(Vector3::new(i as f32, j as f32, k as f32) * spacing);
                    mesh.merge(&block);
                }
            }
        }
        mesh
    }
}
