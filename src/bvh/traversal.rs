use assert2::debug_assert;

use crate::{
    geometry::{FloatType, Ray},
    scene::{HitRecord, Hitable},
};

use super::{BvhNode, BvhTree, NodeIdx};

impl BvhTree {
    /// Finds the closest hit with time inside `(t_min, t_max)`.
    /// `primitives` must be the same slice (or an equally ordered one) that the tree was built from.
    pub(crate) fn hit<P, T: Hitable<P>>(
        &self,
        primitives: &[T],
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord<P>> {
        debug_assert!(primitives.len() == self.primitive_count);

        if !(t_min < t_max) {
            return None;
        }

        self.hit_node(self.root, primitives, ray, t_min, t_max)
    }

    fn hit_node<P, T: Hitable<P>>(
        &self,
        index: NodeIdx,
        primitives: &[T],
        ray: &Ray,
        t_min: FloatType,
        t_max: FloatType,
    ) -> Option<HitRecord<P>> {
        let node = &self.nodes[index];
        if !node.bound().hit(ray, t_min, t_max) {
            return None;
        }

        match node {
            BvhNode::Leaf {
                primitives: ids, ..
            } => {
                let mut closest = None;
                let mut t_max = t_max;
                for id in ids {
                    if let Some(hit) = primitives[id.index()].hit(ray, t_min, t_max) {
                        t_max = hit.time;
                        closest = Some(hit);
                    }
                }
                closest
            }
            BvhNode::Inner { left, right, .. } => {
                let left_hit = self.hit_node(*left, primitives, ray, t_min, t_max);
                // Anything in the right subtree must beat the left hit to matter
                let narrowed_t_max = left_hit.as_ref().map_or(t_max, |hit| hit.time);
                let right_hit = self.hit_node(*right, primitives, ray, t_min, narrowed_t_max);

                match (left_hit, right_hit) {
                    (Some(l), Some(r)) => {
                        debug_assert!(r.time <= l.time);
                        Some(r)
                    }
                    (l, r) => l.or(r),
                }
            }
        }
    }
}
