mod stats;

pub use stats::Stats;

pub type Rgba = rgb::RGBA<f32>;
