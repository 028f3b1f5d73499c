//! Module init/exit.
//!
//! The board has no device tree node for the window, so the module creates
//! the platform device itself and then registers the driver that binds to
//! it. The device handle lives in [`RcarMemFbModule`] instead of a static.

use crate::display::rcar_mem_fb::{driver, DRIVER_NAME};
use crate::error::{Errno, KResult};
use crate::host::Host;
use crate::logging::set_log_level;
use crate::params;
use crate::platform::{DeviceHandle, PlatformDriver, PLATFORM_DEVID_NONE};
use crate::{pr_err, pr_warn};

/// A loaded module: one platform device plus the driver bound to it.
/// Unload with [`RcarMemFbModule::exit`].
pub struct RcarMemFbModule<'h, H: Host> {
    host: &'h H,
    device: DeviceHandle,
    driver: PlatformDriver<H>,
}

impl<'h, H: Host> RcarMemFbModule<'h, H> {
    pub fn init(host: &'h H, params: &str) -> KResult<Self> {
        let parsed = params::parse(params);
        for rejected in &parsed.rejected {
            pr_warn!(host, "rcar-mem-fb: ignoring {}", rejected);
        }
        if let Some(level) = parsed.params.loglevel {
            set_log_level(level);
        }

        let Some(device) = host.platform_device_alloc(DRIVER_NAME, PLATFORM_DEVID_NONE) else {
            pr_err!(host, "Failed to allocate platform device");
            return Err(Errno::ENOMEM);
        };

        if let Err(err) = host.platform_device_add(&device) {
            pr_err!(host, "Failed to add platform device");
            host.platform_device_put(device);
            return Err(err);
        }

        let driver = driver::<H>();
        if let Err(err) = host.platform_driver_register(driver) {
            pr_err!(host, "Failed to register platform driver");
            host.platform_device_unregister(device);
            return Err(err);
        }

        Ok(Self {
            host,
            device,
            driver,
        })
    }

    pub fn device(&self) -> &DeviceHandle {
        &self.device
    }

    /// Device first, so remove runs while the driver is still registered.
    pub fn exit(self) {
        let Self {
            host,
            device,
            driver,
        } = self;
        host.platform_device_unregister(device);
        host.platform_driver_unregister(&driver);
    }
}
