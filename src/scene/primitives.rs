use crate::geometry::{
    EPSILON, FloatType, Ray, Triangle, WorldBox, WorldPoint, WorldVector,
};

use super::{Bounded, HitRecord, Hitable};

#[derive(Clone, Debug)]
pub struct Sphere<P> {
    center: WorldPoint,
    radius: FloatType,
    bound: WorldBox,
    payload: P,
}

impl<P> Sphere<P> {
    pub fn new(center: WorldPoint, radius: FloatType, payload: P) -> Sphere<P> {
        let r_vec = WorldVector::repeat(radius.abs());
        Sphere {
            center,
            radius,
            bound: WorldBox::new(center - r_vec, center + r_vec),
            payload,
        }
    }

    pub fn center(&self) -> &WorldPoint {
        &self.center
    }

    pub fn radius(&self) -> FloatType {
        self.radius
    }
}

impl<P: Clone> Hitable<P> for Sphere<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        let oc = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let b = oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;
        let discriminant = b * b - a * c;

        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrt_disc = discriminant.sqrt();
        let t1 = (-b - sqrt_disc) / a;
        let t2 = (-b + sqrt_disc) / a;

        let t = [t1, t2].into_iter().find(|t| t_min < *t && *t < t_max)?;
        let point = ray.point_at(t);

        Some(HitRecord {
            time: t,
            point,
            normal: (point - self.center) / self.radius,
            payload: self.payload.clone(),
        })
    }
}

impl<P> Bounded for Sphere<P> {
    fn bound(&self) -> &WorldBox {
        &self.bound
    }
}

/// Single two sided triangle.
#[derive(Clone, Debug)]
pub struct TrianglePrimitive<P> {
    triangle: Triangle<WorldPoint>,
    bound: WorldBox,
    payload: P,
}

impl<P> TrianglePrimitive<P> {
    pub fn new(triangle: Triangle<WorldPoint>, payload: P) -> TrianglePrimitive<P> {
        TrianglePrimitive {
            bound: triangle.bounding_box(),
            triangle,
            payload,
        }
    }

    pub fn triangle(&self) -> &Triangle<WorldPoint> {
        &self.triangle
    }
}

impl<P: Clone> Hitable<P> for TrianglePrimitive<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        let (t, _uv) = self.triangle.intersect(ray)?;
        if !(t_min < t && t < t_max) {
            return None;
        }

        Some(HitRecord {
            time: t,
            point: ray.point_at(t),
            normal: self.triangle.normal(),
            payload: self.payload.clone(),
        })
    }
}

impl<P> Bounded for TrianglePrimitive<P> {
    fn bound(&self) -> &WorldBox {
        &self.bound
    }
}

/// Infinite plane. Has no bounding box and therefore can't be placed into a BVH.
#[derive(Clone, Debug)]
pub struct Plane<P> {
    point: WorldPoint,
    normal: WorldVector,
    payload: P,
}

impl<P> Plane<P> {
    /// Plane through `point`, the normal is reported as given in hits.
    pub fn new(point: WorldPoint, normal: WorldVector, payload: P) -> Plane<P> {
        Plane {
            point,
            normal,
            payload,
        }
    }
}

impl<P: Clone> Hitable<P> for Plane<P> {
    fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> Option<HitRecord<P>> {
        let denominator = self.normal.dot(&ray.direction);
        if denominator.abs() < EPSILON * self.normal.norm() * ray.direction.norm() {
            return None;
        }

        let t = (self.point - ray.origin).dot(&self.normal) / denominator;
        if !(t_min < t && t < t_max) {
            return None;
        }

        Some(HitRecord {
            time: t,
            point: ray.point_at(t),
            normal: self.normal,
            payload: self.payload.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};

    fn test_sphere() -> Sphere<u32> {
        Sphere::new([1.0, 2.0, 3.0].into(), 1.0, 42)
    }

    #[test]
    fn direct_hit_through_center() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = test_sphere().hit(&ray, 0.0, f32::INFINITY));

        assert!((h.time - 2.0).abs() < 1e-6);
        assert!(h.payload == 42);
        assert!((h.normal - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-6);
    }

    #[test]
    fn unit_sphere_at_origin() {
        let sphere = Sphere::new(WorldPoint::origin(), 1.0, ());
        let ray = Ray::new([0.0, 0.0, 5.0].into(), [0.0, 0.0, -1.0].into());
        let_assert!(Some(h) = sphere.hit(&ray, 0.0, f32::INFINITY));

        assert!(h.time == 4.0);
        assert!(h.point == WorldPoint::new(0.0, 0.0, 1.0));
        assert!(h.normal == WorldVector::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn unnormalized_direction_scales_time() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 4.0].into());
        let_assert!(Some(h) = test_sphere().hit(&ray, 0.0, f32::INFINITY));

        assert!((h.time - 0.5).abs() < 1e-6);
        assert!((h.point - WorldPoint::new(1.0, 2.0, 2.0)).norm() < 1e-6);
    }

    #[test]
    fn grazing_hit() {
        let ray = Ray::new([2.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = test_sphere().hit(&ray, 0.0, f32::INFINITY));
        assert!((h.time - 3.0).abs() < 1e-6);
    }

    #[test]
    fn narrow_miss() {
        let ray = Ray::new([2.0, 2.01, 0.0].into(), [0.0, 0.0, 1.0].into());
        assert!(test_sphere().hit(&ray, 0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn inside_hits_far_side() {
        let ray = Ray::new([1.0, 2.0, 3.0].into(), [0.0, 0.0, 1.0].into());
        let_assert!(Some(h) = test_sphere().hit(&ray, 1e-4, f32::INFINITY));
        assert!((h.time - 1.0).abs() < 1e-6);
    }

    #[test]
    fn time_window_is_exclusive() {
        let ray = Ray::new([1.0, 2.0, 0.0].into(), [0.0, 0.0, 1.0].into());
        assert!(test_sphere().hit(&ray, 0.0, 2.0).is_none());
        let_assert!(Some(h) = test_sphere().hit(&ray, 2.0, 10.0));
        assert!((h.time - 4.0).abs() < 1e-6);
    }

    #[test]
    fn sphere_bound() {
        let b = test_sphere().bound().clone();
        assert!(b.min == WorldPoint::new(0.0, 1.0, 2.0));
        assert!(b.max == WorldPoint::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn triangle_hit_reports_geometric_normal() {
        let triangle = TrianglePrimitive::new(
            Triangle::new(
                WorldPoint::new(0.0, 0.0, 0.0),
                WorldPoint::new(2.0, 0.0, 0.0),
                WorldPoint::new(0.0, 2.0, 0.0),
            ),
            "tri",
        );
        let ray = Ray::new([0.5, 0.5, 3.0].into(), [0.0, 0.0, -1.0].into());
        let_assert!(Some(h) = triangle.hit(&ray, 0.0, f32::INFINITY));

        assert!((h.time - 3.0).abs() < 1e-6);
        assert!(h.normal == WorldVector::new(0.0, 0.0, 4.0));
        assert!(h.payload == "tri");
        assert!(triangle.hit(&ray, 0.0, 3.0).is_none());
        assert!(triangle.bound().hit(&ray, 0.0, f32::INFINITY));
    }

    #[test]
    fn plane_hit_and_parallel_miss() {
        let plane = Plane::new(WorldPoint::new(0.0, -1.0, 0.0), WorldVector::new(0.0, 2.0, 0.0), 1u8);

        let down = Ray::new([3.0, 4.0, -7.0].into(), [0.0, -1.0, 0.0].into());
        let_assert!(Some(h) = plane.hit(&down, 0.0, f32::INFINITY));
        assert!((h.time - 5.0).abs() < 1e-6);
        assert!(h.normal == WorldVector::new(0.0, 2.0, 0.0));

        let up = Ray::new([3.0, 4.0, -7.0].into(), [0.0, 1.0, 0.0].into());
        assert!(plane.hit(&up, 0.0, f32::INFINITY).is_none());

        let parallel = Ray::new([3.0, 4.0, -7.0].into(), [1.0, 0.0, 0.0].into());
        assert!(plane.hit(&parallel, 0.0, f32::INFINITY).is_none());
    }
}
