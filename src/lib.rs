pub mod bvh;
mod camera;
pub mod geometry;
mod renderer;
pub mod scene;
mod screen_block;
mod util;

pub use crate::renderer::{RenderProgress, RenderSettings, Shader, render};
pub use bvh::{BuildError, Bvh, BvhStatistics, BvhTree};
pub use camera::Camera;
pub use scene::{Bounded, BoundedHitable, HitRecord, Hitable, Scene};
pub use util::{Rgba, Stats};
