//! Coordinate and geometry types shared across the trail, surface and runtime.
//!
//! Two spaces are in play:
//! - host pixels (logical, DPI-aware, origin top-left, +Y down)
//! - surface-normalized space, `[0, 1]²`, same orientation as host pixels
//!
//! `Rect::normalize_point` is the only conversion between them.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgb;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::{PhysicalSize, Viewport};
