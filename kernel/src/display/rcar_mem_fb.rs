//! Memory-backed framebuffer for the R-Car display window.
//!
//! The display controller scans out a fixed 480x272 RGB888 buffer at
//! physical `0x5800_0000`. The driver only claims that window, zeroes it and
//! publishes it through the fbdev core; all drawing goes through the host's
//! generic cfb helpers.

use alloc::boxed::Box;

use uapi::{
    fix_id, FbBitfield, FbFixScreeninfo, FbVarScreeninfo, FB_ACCEL_NONE, FB_ACTIVATE_NOW,
    FB_TYPE_PACKED_PIXELS, FB_VISUAL_TRUECOLOR, FB_VMODE_NONINTERLACED,
};

use super::{Drawing, FbInfo, FbOps, FBINFO_DEFAULT};
use crate::error::{Errno, KResult};
use crate::host::{Host, MemremapFlags, PhysRegion};
use crate::platform::{DeviceHandle, PlatformDriver};
use crate::{dev_dbg, dev_err, dev_info, dev_warn};

pub const DRIVER_NAME: &str = "rcar-mem-fb";

pub const WIDTH: u32 = 480;
pub const HEIGHT: u32 = 272;
pub const BPP: u32 = 24; // RGB888
pub const LINE_LENGTH: u32 = WIDTH * 3;

pub const FB_START: usize = 0x5800_0000;
pub const FB_SIZE: usize = (WIDTH * HEIGHT * BPP / 8) as usize;
pub const FB_REGION: PhysRegion = PhysRegion::new(FB_START, FB_SIZE);

static RCAR_MEM_FB_OPS: FbOps = FbOps {
    check_var,
    drawing: Drawing::Cfb,
};

pub const fn fix_screeninfo() -> FbFixScreeninfo {
    let mut fix = FbFixScreeninfo::zeroed();
    fix.id = fix_id(DRIVER_NAME);
    fix.smem_start = FB_START;
    fix.smem_len = FB_SIZE as u32;
    fix.type_ = FB_TYPE_PACKED_PIXELS;
    fix.visual = FB_VISUAL_TRUECOLOR;
    fix.xpanstep = 0;
    fix.ypanstep = 0;
    fix.ywrapstep = 0;
    fix.accel = FB_ACCEL_NONE;
    fix.line_length = LINE_LENGTH;
    fix
}

pub const fn var_screeninfo() -> FbVarScreeninfo {
    let mut var = FbVarScreeninfo::zeroed();
    var.xres = WIDTH;
    var.yres = HEIGHT;
    var.xres_virtual = WIDTH;
    var.yres_virtual = HEIGHT;
    var.bits_per_pixel = BPP;
    var.red = FbBitfield::new(16, 8);
    var.green = FbBitfield::new(8, 8);
    var.blue = FbBitfield::new(0, 8);
    var.activate = FB_ACTIVATE_NOW;
    // Physical size unknown (-1).
    var.height = u32::MAX;
    var.width = u32::MAX;
    var.vmode = FB_VMODE_NONINTERLACED;
    var
}

/// Only the native resolution and depth are accepted.
pub fn check_var(var: &FbVarScreeninfo, _info: &FbInfo) -> KResult {
    if var.xres != WIDTH || var.yres != HEIGHT || var.bits_per_pixel != BPP {
        return Err(Errno::EINVAL);
    }
    Ok(())
}

pub fn driver<H: Host>() -> PlatformDriver<H> {
    PlatformDriver {
        name: DRIVER_NAME,
        probe: probe::<H>,
        remove: remove::<H>,
    }
}

pub fn probe<H: Host>(host: &H, dev: &DeviceHandle) -> KResult {
    if !host.request_mem_region(FB_REGION, DRIVER_NAME) {
        dev_err!(host, dev, "Cannot request memory region");
        return Err(Errno::EBUSY);
    }

    let info = match setup_framebuffer(host, dev) {
        Ok(info) => info,
        Err(err) => {
            host.release_mem_region(FB_REGION);
            return Err(err);
        }
    };

    let node = info.node;
    host.platform_set_drvdata(dev, info);
    dev_info!(
        host,
        dev,
        "fb{}: R-Car memory fb device registered successfully",
        node
    );
    Ok(())
}

/// Allocate and fill in the fb_info, then map and register it. Releases the
/// fb_info on failure; the memory region stays with the caller.
fn setup_framebuffer<H: Host>(host: &H, dev: &DeviceHandle) -> KResult<Box<FbInfo>> {
    let mut info = host.framebuffer_alloc(dev).ok_or(Errno::ENOMEM)?;

    info.fix = fix_screeninfo();
    info.var = var_screeninfo();
    info.fbops = Some(&RCAR_MEM_FB_OPS);
    info.flags = FBINFO_DEFAULT;

    if let Err(err) = map_and_register(host, dev, &mut info) {
        host.framebuffer_release(info);
        return Err(err);
    }
    Ok(info)
}

/// Unmaps again if registration fails.
fn map_and_register<H: Host>(host: &H, dev: &DeviceHandle, info: &mut FbInfo) -> KResult {
    // The window is ordinary RAM, so a cached mapping rather than ioremap.
    let Some(base) = host.memremap(FB_REGION, MemremapFlags::WriteBack) else {
        dev_err!(host, dev, "Cannot map framebuffer memory");
        return Err(Errno::ENOMEM);
    };

    info.screen_base = Some(base);
    // SAFETY: memremap returned a fresh mapping of FB_REGION, which is
    // smem_len bytes long, and nothing else references it yet.
    if let Some(screen) = unsafe { info.screen_mut() } {
        screen.fill(0);
    }

    if let Err(err) = host.register_framebuffer(info) {
        dev_err!(host, dev, "Cannot register framebuffer");
        info.screen_base = None;
        host.memunmap(base);
        return Err(err);
    }
    Ok(())
}

/// Tear down in reverse probe order. The mapping came from `memremap`, so it
/// goes back through `memunmap`.
pub fn remove<H: Host>(host: &H, dev: &DeviceHandle) {
    let Some(mut info) = host.platform_take_drvdata(dev) else {
        dev_warn!(host, dev, "remove called without a bound framebuffer");
        return;
    };

    let node = info.node;
    host.unregister_framebuffer(&mut info);
    if let Some(base) = info.screen_base.take() {
        host.memunmap(base);
    }
    host.framebuffer_release(info);
    host.release_mem_region(FB_REGION);
    dev_dbg!(host, dev, "fb{}: removed", node);
}
