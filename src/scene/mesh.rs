use thiserror::Error;

use crate::{
    bvh::{BuildError, BvhStatistics, BvhTree},
    geometry::{FloatType, Ray, Triangle, WorldBox, WorldPoint, WorldVector},
};

use super::{Bounded, HitRecord, Hitable, primitives::TrianglePrimitive};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("Failed to build mesh hierarchy: {0}")]
    Bvh(#[from] BuildError),

    #[error("Face {face} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// Indexed triangle mesh with its own hierarchy over the faces.
/// Hits report the mesh payload, [`Mesh::hit_face`] gives the face index instead.
#[derive(Clone, Debug)]
pub struct Mesh<P> {
    faces: Vec<TrianglePrimitive<usize>>,
    tree: BvhTree,
    payload: P,
}

impl<P> Mesh<P> {
    pub fn new(
        vertices: &[WorldPoint],
        faces: impl IntoIterator<Item = Triangle<usize>>,
        payload: P,
    ) -> Result<Mesh<P>, MeshError> {
        let faces = faces
            .into_iter()
            .enumerate()
            .map(|(face, indices)| {
                if let Some(index) = indices.iter().find(|i| **i >= vertices.len()) {
                    return Err(MeshError::VertexIndexOutOfRange {
                        face,
                        index: *index,
                        vertex_count: vertices.len(),
                    });
                }
                Ok(TrianglePrimitive::new(indices.map(|i| vertices[*i]), face))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tree = BvhTree::build(&faces)?;

        Ok(Mesh {
            faces,
            tree,
            payload,
        })
    }

    /// Regular icosahedron inscribed in a sphere.
    pub fn icosahedron(
        center: WorldPoint,
        radius: FloatType,
        payload: P,
    ) -> Result<Mesh<P>, MeshError> {
        let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
        let vertices: Vec<WorldPoint> = [
            (-1.0, phi, 0.0),
            (1.0, phi, 0.0),
            (-1.0, -phi, 0.0),
            (1.0, -phi, 0.0),
            (0.0, -1.0, phi),
            (0.0, 1.0, phi),
            (0.0, -1.0, -phi),
            (0.0, 1.0, -phi),
            (phi, 0.0, -1.0),
            (phi, 0.0, 1.0),
            (-phi, 0.0, -1.0),
            (-phi, 0.0, 1.0),
        ]
        .into_iter()
        .map(|(x, y, z)| center + WorldVector::new(x, y, z).normalize() * radius)
        .collect();

        #[rustfmt::skip]
        let faces = [
            [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
            [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
            [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
            [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
        ];

        Mesh::new(&vertices, faces.map(Triangle::from), payload)
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[TrianglePrimitive<usize>] {
        &self.faces
    }

    pub fn statistics(&self) -> BvhStatistics {
        self.tree.statistics()
    }

    /// Closest hit, with the index of the face as payload.
    pub fn hit_face(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord<usize>> {
        self.tree.hit(&self.faces, ray, t_min, t_max)
    }
}

impl<P: Clone> Hitable<P> for Mesh<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        self.hit_face(ray, t_min, t_max)
            .map(|hit| hit.map_payload(|_| self.payload.clone()))
    }
}

impl<P> Bounded for Mesh<P> {
    fn bound(&self) -> &WorldBox {
        self.tree.bound()
    }
}
