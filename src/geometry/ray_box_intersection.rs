use crate::geometry::{FloatType, Ray, WorldBox};

impl WorldBox {
    /// Slab test: narrows the interval `[t_min, t_max]` to the part of the ray inside the box.
    /// Returns `None` as soon as the interval becomes empty (`t_min >= t_max`).
    pub fn clip(
        &self,
        ray: &Ray,
        mut t_min: FloatType,
        mut t_max: FloatType,
    ) -> Option<(FloatType, FloatType)> {
        for axis in 0..3 {
            // The multiplication is NAN if the ray is starting on the slab bounding plane
            // and is parallel to it. In this case we blend to +-infinity, so that the range
            // becomes infinite
            let t1 = (self.min[axis] - ray.origin[axis]) * ray.inv_direction[axis];
            let t2 = (self.max[axis] - ray.origin[axis]) * ray.inv_direction[axis];
            let t1 = if t1.is_nan() { FloatType::NEG_INFINITY } else { t1 };
            let t2 = if t2.is_nan() { FloatType::INFINITY } else { t2 };

            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));

            if t_min >= t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Does the ray pass through the box somewhere within `(t_min, t_max)`?
    pub fn hit(&self, ray: &Ray, t_min: FloatType, t_max: FloatType) -> bool {
        self.clip(ray, t_min, t_max).is_some()
    }
}

#[cfg(test)]
pub mod test {
    use assert2::assert;
    use proptest::prop_assume;
    use test_case::{test_case, test_matrix};
    use test_strategy::proptest;

    use crate::geometry::{
        Ray, WorldBox, WorldPoint, WorldVector,
        test::{nonzero_world_vector, world_box, world_point},
    };

    fn test_box() -> WorldBox {
        WorldBox::new([5.0, 5.0, 5.0].into(), [10.0, 10.0, 10.0].into())
    }

    /// Checks cases when the ray hits the box, including some corner cases.
    #[test_matrix(
        [5.0, 7.0, 10.0],
        [5.0, 7.0, 10.0],
        [5.0, 7.0, 10.0],
        [-1.0, 0.0, 2.0],
        [-1.0, 0.0, 2.0],
        [-1.0, 0.0, 2.0],
        [-10.0, -1.0, 0.0, 2.0, 5.0, 20.0]
    )]
    fn hit(px: f32, py: f32, pz: f32, dx: f32, dy: f32, dz: f32, origin_pos: f32) {
        if dx == 0.0 && dy == 0.0 && dz == 0.0 {
            return;
        }

        let b = test_box();

        let p = WorldPoint::new(px, py, pz);
        let d = WorldVector::new(dx, dy, dz);
        let temp_r = Ray::new(p, d);
        let origin = temp_r.point_at(origin_pos);
        let r = Ray::new(origin, d);

        let Some((t1, t2)) = b.clip(&r, f32::NEG_INFINITY, f32::INFINITY) else {
            // Grazing a corner or edge gives a zero length interval, which counts as a miss
            let on_surface = point_is_on_box_surface(&p, &b);
            assert!(on_surface, "{p:?} is inside {b:?}, the ray must hit");
            return;
        };

        let p1 = r.point_at(t1);
        let p2 = r.point_at(t2);

        assert!(point_is_on_box_surface(&p1, &b), "{p1:?} must be on {b:?}");
        assert!(point_is_on_box_surface(&p2, &b), "{p2:?} must be on {b:?}");
    }

    /// Just a manual example of ray grazing along an edge.
    #[test]
    fn hit_along_edge() {
        let b = test_box();

        let r = Ray::new(
            WorldPoint::new(5.0, 5.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        assert!(b.clip(&r, f32::NEG_INFINITY, f32::INFINITY) == Some((5.0, 10.0)));
        assert!(b.hit(&r, 0.0, f32::INFINITY));
    }

    #[test]
    fn direction_length_scales_times() {
        let b = test_box();
        let r = Ray::new(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 2.0),
        );

        assert!(b.clip(&r, 0.0, f32::INFINITY) == Some((2.5, 5.0)));
    }

    #[test]
    fn pointing_away_misses() {
        let b = test_box();
        let r = Ray::new(WorldPoint::origin(), WorldVector::new(-1.0, -1.0, -1.0));

        assert!(b.clip(&r, f32::NEG_INFINITY, f32::INFINITY) == Some((-10.0, -5.0)));
        assert!(!b.hit(&r, 0.0, f32::INFINITY));
    }

    #[test_case(0.0, 4.0, false ; "interval_before_box")]
    #[test_case(4.0, 6.0, true ; "interval_overlaps_entry")]
    #[test_case(6.0, 7.0, true ; "interval_inside")]
    #[test_case(11.0, 20.0, false ; "interval_after_box")]
    #[test_case(6.0, 6.0, false ; "empty_interval")]
    #[test_case(8.0, 6.0, false ; "inverted_interval")]
    fn interval_limits(t_min: f32, t_max: f32, expected: bool) {
        let b = test_box();
        let r = Ray::new(
            WorldPoint::new(7.0, 7.0, 0.0),
            WorldVector::new(0.0, 0.0, 1.0),
        );

        assert!(b.hit(&r, t_min, t_max) == expected);
    }

    /// Rays that lie parallel to one axis and start outside the corresponding slab
    /// must miss, even if they move toward the box on other axes or remain unchanged.
    #[test_case( 0.0,  7.0,  7.0,   0.0, 1.0, 0.0,   0.0 ; "low_x_parallel_miss")]
    #[test_case(12.0,  7.0,  7.0,   0.0, 1.0, 0.0,   0.0 ; "high_x_parallel_miss")]
    #[test_case( 7.0,  0.0,  7.0,   1.0, 0.0, 0.0,   0.0 ; "low_y_parallel_miss")]
    #[test_case( 7.0, 12.0,  7.0,   1.0, 0.0, 0.0,   0.0 ; "high_y_parallel_miss")]
    #[test_case( 7.0,  7.0,  0.0,   1.0, 0.0, 0.0,   0.0 ; "low_z_parallel_miss")]
    #[test_case( 7.0,  7.0, 12.0,   1.0, 0.0, 0.0,   0.0 ; "high_z_parallel_miss")]
    #[test_case( 0.0,  5.0,  7.0,   1.0, 0.0, 1.0,   0.0 ; "corner_miss")]
    #[test_case( 0.0,  0.0,  0.0,  -1.0, 1.0, 1.0,   0.0 ; "corner_miss2")]
    fn only_misses(px: f32, py: f32, pz: f32, dx: f32, dy: f32, dz: f32, origin_pos: f32) {
        let b = test_box();

        let p = WorldPoint::new(px, py, pz);
        let d = WorldVector::new(dx, dy, dz);
        let temp_r = Ray::new(p, d);
        let origin = temp_r.point_at(origin_pos);
        let r = Ray::new(origin, d);

        assert!(b.clip(&r, f32::NEG_INFINITY, f32::INFINITY) == None);
        assert!(!b.hit(&r, 0.0, f32::INFINITY));
    }

    /// A ray aimed at the center of a box from outside always hits it.
    #[proptest]
    fn ray_towards_center_hits(
        #[strategy(world_box())] b: WorldBox,
        #[strategy(world_point())] origin: WorldPoint,
    ) {
        let direction = b.center() - origin;
        prop_assume!(!b.contains_point(&origin) && direction.norm() > 1e-3);
        let r = Ray::new(origin, direction);
        // Thin boxes can degenerate into a zero length interval
        let b = b.padded(1e-2);

        assert!(b.hit(&r, 0.0, f32::INFINITY));
    }

    /// Reversing the ray swaps and negates the interval.
    #[proptest]
    fn reversed_ray_mirrors_interval(
        #[strategy(world_box())] b: WorldBox,
        #[strategy(world_point())] origin: WorldPoint,
        #[strategy(nonzero_world_vector())] direction: WorldVector,
    ) {
        let forward = b.clip(&Ray::new(origin, direction), f32::NEG_INFINITY, f32::INFINITY);
        let backward = b.clip(&Ray::new(origin, -direction), f32::NEG_INFINITY, f32::INFINITY);

        assert!(forward.map(|(a, b)| (-b, -a)) == backward);
    }

    fn point_is_on_box_surface(p: &WorldPoint, b: &WorldBox) -> bool {
        const TOLERANCE: f32 = 1e-3;

        // Check if point is within the box's bounds (inclusive, with tolerance)
        let inside_x = p.x >= b.min.x - TOLERANCE && p.x <= b.max.x + TOLERANCE;
        let inside_y = p.y >= b.min.y - TOLERANCE && p.y <= b.max.y + TOLERANCE;
        let inside_z = p.z >= b.min.z - TOLERANCE && p.z <= b.max.z + TOLERANCE;

        if !(inside_x && inside_y && inside_z) {
            return false; // outside the box entirely
        }

        // Check if the point lies on any of the six faces (within tolerance)
        let on_x_face = (p.x - b.min.x).abs() <= TOLERANCE || (p.x - b.max.x).abs() <= TOLERANCE;
        let on_y_face = (p.y - b.min.y).abs() <= TOLERANCE || (p.y - b.max.y).abs() <= TOLERANCE;
        let on_z_face = (p.z - b.min.z).abs() <= TOLERANCE || (p.z - b.max.z).abs() <= TOLERANCE;

        on_x_face || on_y_face || on_z_face
    }
}
