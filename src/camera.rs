use assert2::assert;
use bon::bon;
use nalgebra::Unit;

use crate::geometry::{EPSILON, FloatType, Ray, ScreenPoint, ScreenSize, WorldPoint, WorldVector};

/// Pinhole camera.
/// Screen coordinates start in the top left corner, x goes right and y goes down.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    center: WorldPoint,

    resolution: ScreenSize,

    up: Unit<WorldVector>,
    right: Unit<WorldVector>,
    /// Direction towards the top left corner of the image, for a film at distance 1
    film_origin_offset: WorldVector,

    /// Distance between pixels on the film
    pixel_pitch: FloatType,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        center: WorldPoint,
        forward: WorldVector,
        up: WorldVector,
        resolution: ScreenSize,
        vertical_fov: FloatType, // degrees
    ) -> Self {
        let forward = Unit::try_new(forward, EPSILON).expect("Forward vector must be non-zero");
        let up = Unit::try_new(up, EPSILON).expect("Up vector must be non-zero");
        let right = Unit::try_new(forward.cross(&up), EPSILON)
            .expect("`up` and `forward` must be linearly independent");
        let up = Unit::new_normalize(right.cross(&forward));

        assert!(resolution.x > 0);
        assert!(resolution.y > 0);
        assert!(vertical_fov > 0.0 && vertical_fov < 180.0);

        let film_height = 2.0 * (vertical_fov.to_radians() / 2.0).tan();
        let pixel_pitch = film_height / (resolution.y as FloatType);
        let film_origin_uv = resolution.cast::<FloatType>() * pixel_pitch / 2.0;
        let film_origin_offset = forward.as_ref() - right.as_ref() * film_origin_uv.x
            + up.as_ref() * film_origin_uv.y;

        Camera {
            center,

            resolution,

            up,
            right,
            film_origin_offset,
            pixel_pitch,
        }
    }
}

impl Camera {
    pub fn get_resolution(&self) -> ScreenSize {
        self.resolution
    }

    /// Samples a new ray from the camera, uniformly distributed over the given image pixel.
    pub fn sample_ray(&self, point: &ScreenPoint, rng: &mut impl rand::Rng) -> Ray {
        self.film_ray(
            point.x as FloatType + rng.random_range(0.0..1.0),
            point.y as FloatType + rng.random_range(0.0..1.0),
        )
    }

    pub fn pixel_center_ray(&self, point: &ScreenPoint) -> Ray {
        self.film_ray(point.x as FloatType + 0.5, point.y as FloatType + 0.5)
    }

    fn film_ray(&self, film_u: FloatType, film_v: FloatType) -> Ray {
        let direction = self.film_origin_offset + self.right.as_ref() * (film_u * self.pixel_pitch)
            - self.up.as_ref() * (film_v * self.pixel_pitch);
        Ray::new(self.center, direction)
    }
}
