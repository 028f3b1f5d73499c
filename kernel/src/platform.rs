//! Platform bus vocabulary: device handles and driver descriptors.

use core::fmt::Write;

use crate::error::KResult;
use crate::host::Host;

/// Device id meaning "only one instance", the device is named without a suffix.
pub const PLATFORM_DEVID_NONE: i32 = -1;

pub const DEV_NAME_LEN: usize = 32;

/// Host-side platform device. Not `Clone`: the reference is given back to
/// the host by `platform_device_put` or `platform_device_unregister`.
#[derive(Debug, Eq, PartialEq)]
pub struct DeviceHandle {
    name: heapless::String<DEV_NAME_LEN>,
    base_len: usize,
    id: i32,
}

impl DeviceHandle {
    /// Builds the device name the way the platform bus does: `name` for
    /// [`PLATFORM_DEVID_NONE`], `name.id` otherwise. `None` if it doesn't fit.
    pub fn new(name: &str, id: i32) -> Option<Self> {
        let mut full = heapless::String::new();
        full.push_str(name).ok()?;
        if id != PLATFORM_DEVID_NONE {
            write!(full, ".{}", id).ok()?;
        }
        Some(Self {
            name: full,
            base_len: name.len(),
            id,
        })
    }

    /// Full device name, e.g. `rcar-mem-fb` or `rcar-mem-fb.0`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Name-based matching, the only kind a platform driver without an id
    /// table gets.
    pub fn matches(&self, driver_name: &str) -> bool {
        &self.name[..self.base_len] == driver_name
    }
}

/// `struct platform_driver`: callbacks the host invokes when it binds or
/// unbinds a matching device.
pub struct PlatformDriver<H> {
    pub name: &'static str,
    pub probe: fn(&H, &DeviceHandle) -> KResult,
    pub remove: fn(&H, &DeviceHandle),
}

impl<H> Clone for PlatformDriver<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for PlatformDriver<H> {}

impl<H: Host> PlatformDriver<H> {
    pub fn matches(&self, dev: &DeviceHandle) -> bool {
        dev.matches(self.name)
    }
}
