use image::RgbaImage;
use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    geometry::{FloatType, Ray, ScreenBlock, ScreenPoint},
    scene::Hitable as _,
    screen_block::ScreenBlockExt as _,
    util::Rgba,
};

use super::machinery::RenderState;

/// Per-thread rendering state.
pub(super) struct Worker {
    rng: SmallRng,
}

impl Worker {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn render_tile<P: Clone>(
        &mut self,
        state: &RenderState<P>,
        tile: &ScreenBlock,
        buffer: &mut RgbaImage,
    ) {
        let sample_count = state.settings.sample_count.get();
        for point in tile.internal_points() {
            let mut pixel_sum = Rgba::new(0.0, 0.0, 0.0, 0.0);
            for _i in 0..sample_count {
                pixel_sum += self.render_sample(state, &point);
            }
            let pixel = pixel_sum * (1.0 / sample_count as f32);

            let buffer_position = point - tile.min;
            buffer.put_pixel(buffer_position.x, buffer_position.y, color_to_image(pixel));
        }
    }

    fn render_sample<P: Clone>(&mut self, state: &RenderState<P>, point: &ScreenPoint) -> Rgba {
        let ray = state.camera.sample_ray(point, &mut self.rng);

        match state.scene.hit(&ray, 0.0, FloatType::INFINITY) {
            Some(hit) => (state.shader)(&state.scene, &ray, &hit),
            None => background(&ray),
        }
    }
}

/// Sky gradient, white at the horizon, blue up.
pub fn background(ray: &Ray) -> Rgba {
    let t = 0.5 * (ray.direction.normalize().y + 1.0);
    Rgba::new(1.0 - 0.5 * t, 1.0 - 0.3 * t, 1.0, 1.0)
}

/// Maps a 0-1 f32 rgba pixel to pixel type compatible with module image.
pub fn color_to_image(color: Rgba) -> image::Rgba<u8> {
    image::Rgba([color.r, color.g, color.b, color.a].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8))
}
