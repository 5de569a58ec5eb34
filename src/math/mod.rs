mod color;
mod rng;

pub use color::hsv_to_rgb;
pub use rng::SplitMix64;
