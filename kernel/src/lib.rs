//! R-Car memory framebuffer driver.
//!
//! Publishes the fixed 480x272 RGB888 scanout window at physical
//! `0x5800_0000` as an fbdev framebuffer. Kernel services are reached
//! through [`host::Host`], so the library tests run on the build machine
//! against a simulated host while the driver itself stays `no_std`.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod logging;

pub mod display;
pub mod error;
pub mod host;
pub mod module;
pub mod params;
pub mod platform;

#[cfg(test)]
mod sim;

pub use display::rcar_mem_fb::{check_var, probe, remove, DRIVER_NAME};
pub use display::{FbInfo, FbOps};
pub use error::{Errno, KResult};
pub use host::Host;
pub use module::RcarMemFbModule;
