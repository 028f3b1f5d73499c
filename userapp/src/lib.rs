//! Pieces of the framebuffer test program that do not touch a device.

pub mod colorbars;
pub mod mode;
pub mod pixel;

pub use colorbars::{band_index, draw, BARS};
pub use mode::{negotiate, target_mode};
pub use pixel::{PixelFormat, Rgba};
