use super::{BarycentricCoordinates, EPSILON, FloatType, Ray, Triangle, WorldPoint};

impl Triangle<WorldPoint> {
    /// Calculates ray intersection with the (two sided) triangle.
    /// Returns distance along the ray and barycentric uv coordinates of the hit,
    /// `None` if the ray misses or is (nearly) parallel to the triangle plane.
    /// Adapted from https://en.wikipedia.org/wiki/M%C3%B6ller%E2%80%93Trumbore_intersection_algorithm#Rust_implementation
    pub fn intersect(&self, ray: &Ray) -> Option<(FloatType, BarycentricCoordinates<FloatType>)> {
        let [e1, e2] = self.edges();

        let ray_cross_e2 = ray.direction.cross(&e2);
        let det = e1.dot(&ray_cross_e2);

        if det.abs() < EPSILON * ray.direction.norm() * e1.norm().max(e2.norm()) {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self[0];
        let u = inv_det * s.dot(&ray_cross_e2);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let s_cross_e1 = s.cross(&e1);
        let v = inv_det * ray.direction.dot(&s_cross_e1);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * e2.dot(&s_cross_e1);
        Some((t, BarycentricCoordinates { u, v }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::WorldVector;
    use assert2::{assert, let_assert};
    use test_case::test_case;

    fn test_triangle() -> Triangle<WorldPoint> {
        Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(4.0, 0.0, 0.0),
            WorldPoint::new(0.0, 4.0, 0.0),
        )
    }

    #[test_case(1.0, 1.0, 5.0, -1.0 ; "from_front")]
    #[test_case(1.0, 1.0, -5.0, 1.0 ; "from_back")]
    #[test_case(1.0, 1.0, 10.0, -2.0 ; "long_direction")]
    fn hits(x: f32, y: f32, z: f32, dz: f32) {
        let ray = Ray::new(WorldPoint::new(x, y, z), WorldVector::new(0.0, 0.0, dz));
        let_assert!(Some((t, uv)) = test_triangle().intersect(&ray));

        assert!((t - 5.0).abs() < 1e-5);
        assert!((uv.u - 0.25).abs() < 1e-5);
        assert!((uv.v - 0.25).abs() < 1e-5);
        assert!((ray.point_at(t) - WorldPoint::new(x, y, 0.0)).norm() < 1e-5);
    }

    #[test_case(-0.5, 1.0 ; "outside_u")]
    #[test_case(1.0, -0.5 ; "outside_v")]
    #[test_case(3.0, 3.0 ; "outside_hypotenuse")]
    fn misses(x: f32, y: f32) {
        let ray = Ray::new(WorldPoint::new(x, y, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(test_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let ray = Ray::new(WorldPoint::new(-1.0, 1.0, 0.0), WorldVector::new(1.0, 0.0, 0.0));
        assert!(test_triangle().intersect(&ray).is_none());
    }

    #[test]
    fn degenerate_triangle_misses() {
        let sliver = Triangle::new(
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(1.0, 1.0, 1.0),
            WorldPoint::new(2.0, 2.0, 2.0),
        );
        let ray = Ray::new(WorldPoint::new(1.0, 1.0, 5.0), WorldVector::new(0.0, 0.0, -1.0));
        assert!(sliver.intersect(&ray).is_none());
    }

    #[test]
    fn behind_origin_reports_negative_time() {
        let ray = Ray::new(WorldPoint::new(1.0, 1.0, -5.0), WorldVector::new(0.0, 0.0, -1.0));
        let_assert!(Some((t, _)) = test_triangle().intersect(&ray));
        assert!((t + 5.0).abs() < 1e-5);
    }
}
