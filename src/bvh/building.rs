use index_vec::IndexVec;
use tracing::{Level, debug};

use crate::{
    geometry::{WorldBox, WorldPoint, WorldVector},
    scene::Bounded,
};

use super::{BuildError, BvhNode, BvhTree, NodeIdx, PrimitiveIdx};

impl BvhTree {
    /// Builds the hierarchy over bounding boxes of `primitives`.
    /// Indices stored in the tree refer to positions in this slice.
    pub fn build<T: Bounded>(primitives: &[T]) -> Result<BvhTree, BuildError> {
        Self::from_bounds(primitives.iter().map(|p| p.bound().clone()).collect())
    }

    /// Builds the hierarchy directly from per-primitive bounding boxes.
    pub fn from_bounds(bounds: Vec<WorldBox>) -> Result<BvhTree, BuildError> {
        if bounds.is_empty() {
            return Err(BuildError::NoPrimitives);
        }
        // Each leaf holds at least one primitive, so a binary tree needs at most 2P - 1 nodes
        let max_node_count = bounds
            .len()
            .checked_mul(2)
            .map(|n| n - 1)
            .filter(|n| *n <= u32::MAX as usize)
            .ok_or(BuildError::TooManyPrimitives(bounds.len()))?;

        let centroids: Vec<WorldPoint> = bounds.iter().map(WorldBox::center).collect();

        let mut builder = Builder {
            bounds: &bounds,
            centroids: &centroids,
            nodes: IndexVec::with_capacity(max_node_count),
        };
        let root = builder.build_recursive(
            (0..bounds.len()).map(PrimitiveIdx::new).collect(),
            true,
        );
        let mut nodes = builder.nodes;
        nodes.raw.shrink_to_fit();

        let tree = BvhTree {
            root,
            nodes,
            primitive_count: bounds.len(),
        };

        if tracing::enabled!(Level::DEBUG) {
            let stats = tree.statistics();
            debug!(
                primitives = tree.primitive_count,
                nodes = stats.node_count,
                leaves = stats.leaf_count,
                max_depth = stats.depth.max,
                "built bvh"
            );
        }

        Ok(tree)
    }
}

struct Builder<'a> {
    bounds: &'a [WorldBox],
    centroids: &'a [WorldPoint],
    nodes: IndexVec<NodeIdx, BvhNode>,
}

impl Builder<'_> {
    fn build_recursive(&mut self, indices: Vec<PrimitiveIdx>, should_subdivide: bool) -> NodeIdx {
        // Create placeholder node that will be overwritten later,
        // this keeps the parent before its children in the arena
        let node_index = self.nodes.push(BvhNode::default());
        let bound = WorldBox::union_of(indices.iter().map(|i| &self.bounds[i.index()]));

        let node = match self.split(&indices, &bound, should_subdivide) {
            Some((left, right)) => {
                let left_should_subdivide = left.len() != indices.len();
                let right_should_subdivide = right.len() != indices.len();
                BvhNode::Inner {
                    left: self.build_recursive(left, left_should_subdivide),
                    right: self.build_recursive(right, right_should_subdivide),
                    bound,
                }
            }
            None => BvhNode::Leaf {
                bound,
                primitives: indices,
            },
        };

        self.nodes[node_index] = node;
        node_index
    }

    /// Partitions indices by the mean centroid along the longest axis of `bound`.
    /// Returns `None` if the node should stay a leaf.
    fn split(
        &self,
        indices: &[PrimitiveIdx],
        bound: &WorldBox,
        should_subdivide: bool,
    ) -> Option<(Vec<PrimitiveIdx>, Vec<PrimitiveIdx>)> {
        if !should_subdivide || indices.len() <= 1 {
            return None;
        }

        let axis = bound.biggest_axis().index();
        let split_point = indices
            .iter()
            .map(|i| self.centroids[i.index()].coords)
            .sum::<WorldVector>()
            / indices.len() as f32;

        // Ties go right
        let (left, right): (Vec<_>, Vec<_>) = indices
            .iter()
            .copied()
            .partition(|i| self.centroids[i.index()][axis] < split_point[axis]);

        if left.is_empty() || right.is_empty() {
            None
        } else {
            Some((left, right))
        }
    }
}
