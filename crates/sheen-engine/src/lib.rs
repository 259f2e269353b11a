//! Sheen engine crate.
//!
//! A touch-reactive procedural background: pointer trails rasterized into a
//! small touch bitmap, a full-viewport shader surface that the bitmap
//! distorts, and the render loop tying both to a window or a headless host.

pub mod controller;
pub mod coords;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod surface;
pub mod time;
pub mod trail;
pub mod window;
