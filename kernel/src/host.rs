//! Kernel services the driver depends on.
//!
//! Everything the driver asks of the running kernel goes through [`Host`]:
//! printk, `request_mem_region`, `memremap`, the fbdev core and the platform
//! bus. Device matching, drawing helpers and the framebuffer device node all
//! live on the other side of this trait.

use alloc::boxed::Box;
use core::fmt;
use core::ptr::NonNull;

use crate::display::FbInfo;
use crate::error::KResult;
use crate::logging::LogLevel;
use crate::platform::{DeviceHandle, PlatformDriver};

/// A physical address window.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PhysRegion {
    pub start: usize,
    pub len: usize,
}

impl PhysRegion {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// One past the last byte.
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn overlaps(&self, other: &PhysRegion) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

/// Caching mode for `memremap`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MemremapFlags {
    /// `MEMREMAP_WB`: the region is ordinary RAM.
    WriteBack,
}

pub trait Host: Sized {
    /// printk. `dev` is set for the `dev_*` family.
    fn log(&self, level: LogLevel, dev: Option<&DeviceHandle>, args: fmt::Arguments<'_>);

    /// Claim `region` for `name`; `false` if any part is already claimed.
    fn request_mem_region(&self, region: PhysRegion, name: &'static str) -> bool;
    fn release_mem_region(&self, region: PhysRegion);

    /// Map `region` into the kernel address space. The mapping is at least
    /// `region.len` bytes.
    fn memremap(&self, region: PhysRegion, flags: MemremapFlags) -> Option<NonNull<u8>>;
    /// Undo a [`Host::memremap`].
    fn memunmap(&self, addr: NonNull<u8>);

    fn framebuffer_alloc(&self, parent: &DeviceHandle) -> Option<Box<FbInfo>>;
    fn framebuffer_release(&self, info: Box<FbInfo>);
    /// Create the device node; fills in `info.node` on success.
    fn register_framebuffer(&self, info: &mut FbInfo) -> KResult;
    fn unregister_framebuffer(&self, info: &mut FbInfo);

    fn platform_device_alloc(&self, name: &'static str, id: i32) -> Option<DeviceHandle>;
    fn platform_device_add(&self, dev: &DeviceHandle) -> KResult;
    /// Drop a device that was allocated but never added.
    fn platform_device_put(&self, dev: DeviceHandle);
    /// Remove an added device, unbinding its driver first.
    fn platform_device_unregister(&self, dev: DeviceHandle);

    /// Register `drv` and probe every matching device already on the bus.
    fn platform_driver_register(&self, drv: PlatformDriver<Self>) -> KResult;
    fn platform_driver_unregister(&self, drv: &PlatformDriver<Self>);

    fn platform_set_drvdata(&self, dev: &DeviceHandle, data: Box<FbInfo>);
    /// Hand the driver data back to the driver, leaving none behind.
    fn platform_take_drvdata(&self, dev: &DeviceHandle) -> Option<Box<FbInfo>>;
}
