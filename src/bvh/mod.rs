mod building;
mod statistics;
mod traversal;

use index_vec::IndexVec;
use thiserror::Error;

use crate::{
    geometry::{FloatType, Ray, WorldBox},
    scene::{Bounded, HitRecord, Hitable},
};

pub use statistics::BvhStatistics;

/// Binary bounding volume hierarchy over an external slice of primitives.
///
/// The tree only stores indices into the primitive slice it was built from,
/// the primitives themselves are passed again at query time. This keeps the tree
/// free of lifetimes so that it can be stored right next to the primitives it indexes
/// (see [`crate::scene::Mesh`]). [`Bvh`] bundles the two together for the borrowed case.
#[derive(Clone, Debug)]
pub struct BvhTree {
    root: NodeIdx,
    nodes: IndexVec<NodeIdx, BvhNode>,
    primitive_count: usize,
}

#[derive(Clone, Debug)]
enum BvhNode {
    Leaf {
        bound: WorldBox,
        primitives: Vec<PrimitiveIdx>,
    },
    Inner {
        bound: WorldBox,
        left: NodeIdx,
        right: NodeIdx,
    },
}

impl BvhNode {
    fn bound(&self) -> &WorldBox {
        match self {
            BvhNode::Leaf { bound, .. } | BvhNode::Inner { bound, .. } => bound,
        }
    }
}

impl Default for BvhNode {
    fn default() -> Self {
        BvhNode::Leaf {
            bound: WorldBox::empty(),
            primitives: Vec::new(),
        }
    }
}

index_vec::define_index_type! {
    struct NodeIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

index_vec::define_index_type! {
    struct PrimitiveIdx = u32;
    IMPL_RAW_CONVERSIONS = true;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Can't build a hierarchy without primitives")]
    NoPrimitives,

    #[error("Too many primitives for a hierarchy: {0}")]
    TooManyPrimitives(usize),
}

impl BvhTree {
    /// Bounding box of everything in the tree.
    pub fn bound(&self) -> &WorldBox {
        self.nodes[self.root].bound()
    }

    /// Number of primitives the tree was built over.
    /// Queries must be given a slice of exactly this length.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Hierarchy together with the primitives it was built over.
#[derive(Clone, Debug)]
pub struct Bvh<'a, T> {
    tree: BvhTree,
    primitives: &'a [T],
}

impl<'a, T: Bounded> Bvh<'a, T> {
    pub fn new(primitives: &'a [T]) -> Result<Bvh<'a, T>, BuildError> {
        Ok(Bvh {
            tree: BvhTree::build(primitives)?,
            primitives,
        })
    }
}

impl<'a, T> Bvh<'a, T> {
    pub fn tree(&self) -> &BvhTree {
        &self.tree
    }

    pub fn primitives(&self) -> &'a [T] {
        self.primitives
    }

    pub fn statistics(&self) -> BvhStatistics {
        self.tree.statistics()
    }
}

impl<P, T: Hitable<P>> Hitable<P> for Bvh<'_, T> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        self.tree.hit(self.primitives, ray, t_min, t_max)
    }
}

impl<T> Bounded for Bvh<'_, T> {
    fn bound(&self) -> &WorldBox {
        self.tree.bound()
    }
}
