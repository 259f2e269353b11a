//! Input trail: pointer samples → decaying trail points → touch bitmap.
//!
//! The bitmap is a low-resolution distortion map, not a displayed image.
//! Its channel layout is an internal contract with the surface shader and is
//! defined once, in [`codec`].

pub mod codec;

mod bitmap;
mod buffer;
mod point;

pub use bitmap::TouchBitmap;
pub use buffer::{TrailBuffer, TrailParams};
pub use point::{envelope, TrailPoint};

/// Side length of the touch bitmap, in texels.
pub const CANVAS_SIZE: u32 = 64;

/// Lifetime ceiling of a trail point, in ticks.
pub const MAX_AGE: u32 = 64;

/// Squared-distance gain applied to input speed when deriving force.
pub const FORCE_GAIN: f32 = 20_000.0;

/// Upper bound on a point's force.
pub const FORCE_CAP: f32 = 2.0;
