use crate::geometry::{FloatType, Ray};

use super::{HitRecord, Hitable};

/// Unstructured collection, tests every member.
/// Used for the few objects that don't have a bounding box.
#[derive(Clone, Debug)]
pub struct HitableList<H>(Vec<H>);

impl<H> HitableList<H> {
    pub fn new() -> HitableList<H> {
        HitableList(Vec::new())
    }

    pub fn push(&mut self, hitable: H) {
        self.0.push(hitable);
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<H> Default for HitableList<H> {
    fn default() -> Self {
        HitableList::new()
    }
}

impl<H> From<Vec<H>> for HitableList<H> {
    fn from(value: Vec<H>) -> Self {
        HitableList(value)
    }
}

impl<P, H: Hitable<P>> Hitable<P> for HitableList<H> {
    fn hit(&self, ray: &Ray, t_min: FloatType, mut t_max: FloatType) -> Option<HitRecord<P>> {
        if !(t_min < t_max) {
            return None;
        }

        let mut closest = None;
        for hitable in &self.0 {
            if let Some(hit) = hitable.hit(ray, t_min, t_max) {
                t_max = hit.time;
                closest = Some(hit);
            }
        }
        closest
    }
}
