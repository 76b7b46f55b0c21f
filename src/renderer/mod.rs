mod machinery;
mod worker;

use std::num::NonZeroU32;

use crate::{
    geometry::Ray,
    scene::{HitRecord, Scene},
    util::Rgba,
};

pub use crate::renderer::machinery::{RenderProgress, render};

#[derive(Copy, Clone, Debug)]
pub struct RenderSettings {
    pub tile_size: NonZeroU32,
    pub sample_count: NonZeroU32,
}

/// Turns a camera ray hit into a color.
pub type Shader<P> = dyn Fn(&Scene<P>, &Ray, &HitRecord<P>) -> Rgba + Send + Sync;
