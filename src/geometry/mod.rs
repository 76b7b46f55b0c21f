mod aabb;
mod ray_box_intersection;
mod ray_triangle_intersection;
mod triangle;

pub use aabb::AABB;
pub use triangle::{BarycentricCoordinates, Triangle};

use nalgebra::{Point2, Point3, Vector2, Vector3};

pub type FloatType = f32;

/// Tolerance for near-zero determinants and thin boxes.
pub const EPSILON: FloatType = 1e-6;

pub type ScreenPoint = Point2<u32>;
pub type ScreenSize = Vector2<u32>;
pub type ScreenBlock = AABB<ScreenPoint>;

pub type WorldPoint = Point3<FloatType>;
pub type WorldVector = Vector3<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not necessarily normalized.
    /// Hit times are expressed in multiples of this vector.
    pub direction: WorldVector,

    /// Componentwise inverse of the ray direction
    /// Zeros in direction get turned into positive infinity regardless of the sign of the zero
    pub inv_direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        let inv_direction = direction.map(|x| if x == 0.0 { FloatType::INFINITY } else { 1.0 / x });

        Ray {
            origin,
            direction,
            inv_direction,
        }
    }

    pub fn point_at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use assert2::assert;
    use proptest::prelude::*;

    fn simple_float() -> BoxedStrategy<f32> {
        (-10_000i32..10_000i32).prop_map(|n| n as f32 * 1e-3).boxed()
    }

    pub fn world_point() -> impl Strategy<Value = WorldPoint> {
        (simple_float(), simple_float(), simple_float())
            .prop_map(|(x, y, z)| WorldPoint::new(x, y, z))
    }

    pub fn nonzero_world_vector() -> impl Strategy<Value = WorldVector> {
        (simple_float(), simple_float(), simple_float()).prop_filter_map(
            "vector is zero",
            |(x, y, z)| {
                let vector = WorldVector::new(x, y, z);
                if vector.norm() < 1e-3 {
                    None
                } else {
                    Some(vector)
                }
            },
        )
    }

    pub fn world_box() -> impl Strategy<Value = WorldBox> {
        (world_point(), world_point()).prop_map(|(a, b)| WorldBox::from_points([&a, &b]).unwrap())
    }

    #[test]
    fn ray_keeps_direction_length() {
        let ray = Ray::new(WorldPoint::new(1.0, 2.0, 3.0), WorldVector::new(0.0, 0.0, -2.0));
        assert!(ray.direction == WorldVector::new(0.0, 0.0, -2.0));
        assert!(ray.point_at(1.5) == WorldPoint::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn ray_inverse_direction_of_zero_is_infinite() {
        let ray = Ray::new(WorldPoint::origin(), WorldVector::new(0.0, -0.0, 4.0));
        assert!(ray.inv_direction.x == f32::INFINITY);
        assert!(ray.inv_direction.y == f32::INFINITY);
        assert!(ray.inv_direction.z == 0.25);
    }

    #[test]
    fn axis_indices() {
        let indices: Vec<usize> = Axis::ALL.iter().map(|a| a.index()).collect();
        assert!(indices == vec![0, 1, 2]);
    }
}
