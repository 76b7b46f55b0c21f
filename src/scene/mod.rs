mod hitable_list;
mod mesh;
pub mod primitives;
mod shape;

pub use hitable_list::HitableList;
pub use mesh::{Mesh, MeshError};
pub use shape::Shape;

use std::sync::Arc;

use crate::{
    bvh::{BuildError, BvhStatistics, BvhTree},
    geometry::{FloatType, Ray, WorldBox, WorldPoint, WorldVector},
};
use primitives::Plane;

/// Closest-hit result of a ray query.
/// Only meaningful together with the hit signal it was returned with,
/// a default constructed record does not mean "no hit".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitRecord<P> {
    /// Ray parameter of the hit, in multiples of the ray direction
    pub time: FloatType,
    pub point: WorldPoint,
    /// Surface normal at the hit, not necessarily of unit length
    pub normal: WorldVector,
    /// Caller supplied data identifying what was hit
    pub payload: P,
}

impl<P> HitRecord<P> {
    pub fn map_payload<P2>(self, f: impl FnOnce(P) -> P2) -> HitRecord<P2> {
        HitRecord {
            time: self.time,
            point: self.point,
            normal: self.normal,
            payload: f(self.payload),
        }
    }
}

/// Anything a ray can be intersected with.
pub trait Hitable<P> {
    /// Nearest hit with time strictly inside `(t_min, t_max)`.
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>>;

    /// In-place variant of [`Hitable::hit`]: overwrites `record` and returns true on a hit,
    /// leaves `record` untouched otherwise.
    fn hit_into(
        &self,
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
        record: &mut HitRecord<P>,
    ) -> bool {
        match self.hit(ray, t_min, t_max) {
            Some(hit) => {
                *record = hit;
                true
            }
            None => false,
        }
    }
}

/// Object with a precomputed axis aligned bounding box.
pub trait Bounded {
    fn bound(&self) -> &WorldBox;
}

/// Hitable that can be placed into a BVH.
pub trait BoundedHitable<P>: Hitable<P> + Bounded {}

impl<P, T: Hitable<P> + Bounded + ?Sized> BoundedHitable<P> for T {}

impl<P, H: Hitable<P> + ?Sized> Hitable<P> for &H {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        (**self).hit(ray, t_min, t_max)
    }
}

impl<P, H: Hitable<P> + ?Sized> Hitable<P> for Box<H> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        (**self).hit(ray, t_min, t_max)
    }
}

impl<P, H: Hitable<P> + ?Sized> Hitable<P> for Arc<H> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        (**self).hit(ray, t_min, t_max)
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn bound(&self) -> &WorldBox {
        (**self).bound()
    }
}

impl<T: Bounded + ?Sized> Bounded for Box<T> {
    fn bound(&self) -> &WorldBox {
        (**self).bound()
    }
}

impl<T: Bounded + ?Sized> Bounded for Arc<T> {
    fn bound(&self) -> &WorldBox {
        (**self).bound()
    }
}

/// Top level collection: bounded shapes in a BVH, plus unbounded planes that are always tested.
#[derive(Clone, Debug)]
pub struct Scene<P> {
    shapes: Vec<Shape<P>>,
    tree: Option<BvhTree>,
    planes: HitableList<Plane<P>>,
}

impl<P> Scene<P> {
    pub fn new(shapes: Vec<Shape<P>>, planes: Vec<Plane<P>>) -> Result<Scene<P>, BuildError> {
        let tree = if shapes.is_empty() {
            None
        } else {
            Some(BvhTree::build(&shapes)?)
        };

        Ok(Scene {
            shapes,
            tree,
            planes: HitableList::from(planes),
        })
    }

    pub fn shapes(&self) -> &[Shape<P>] {
        &self.shapes
    }

    pub fn planes(&self) -> &HitableList<Plane<P>> {
        &self.planes
    }

    /// Statistics of the top level hierarchy, `None` for scenes without bounded shapes.
    pub fn statistics(&self) -> Option<BvhStatistics> {
        self.tree.as_ref().map(BvhTree::statistics)
    }

    pub fn print_tree(&self) {
        match &self.tree {
            Some(tree) => tree.print_tree(),
            None => println!("(no bounded shapes)"),
        }
    }
}

impl<P: Clone> Hitable<P> for Scene<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        let bvh_hit = self
            .tree
            .as_ref()
            .and_then(|tree| tree.hit(&self.shapes, ray, t_min, t_max));
        let t_max = bvh_hit.as_ref().map_or(t_max, |hit| hit.time);

        self.planes.hit(ray, t_min, t_max).or(bvh_hit)
    }
}
