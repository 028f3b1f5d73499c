pub mod rcar_mem_fb;

use core::fmt;
use core::ptr::NonNull;

use uapi::{FbFixScreeninfo, FbVarScreeninfo};

use crate::error::KResult;

pub const FBINFO_DEFAULT: u32 = 0;

/// Who renders console drawing requests.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Drawing {
    /// The host's generic `cfb_fillrect`, `cfb_copyarea` and `cfb_imageblit`,
    /// working directly on `screen_base`.
    Cfb,
}

/// `struct fb_ops`, reduced to the hooks this driver fills in.
pub struct FbOps {
    /// Validate a mode before the fbdev core applies it.
    pub check_var: fn(&FbVarScreeninfo, &FbInfo) -> KResult,
    pub drawing: Drawing,
}

/// `struct fb_info`: allocated by the host, filled in by the driver.
pub struct FbInfo {
    pub fix: FbFixScreeninfo,
    pub var: FbVarScreeninfo,
    pub fbops: Option<&'static FbOps>,
    pub flags: u32,
    /// Kernel mapping of pixel memory, `fix.smem_len` bytes.
    pub screen_base: Option<NonNull<u8>>,
    /// Minor of `/dev/fbN`, `-1` until registered.
    pub node: i32,
}

impl FbInfo {
    pub const fn new() -> Self {
        Self {
            fix: FbFixScreeninfo::zeroed(),
            var: FbVarScreeninfo::zeroed(),
            fbops: None,
            flags: FBINFO_DEFAULT,
            screen_base: None,
            node: -1,
        }
    }

    /// Run the driver's `check_var`, accepting anything when it has none.
    pub fn check_var(&self, var: &FbVarScreeninfo) -> KResult {
        match self.fbops {
            Some(ops) => (ops.check_var)(var, self),
            None => Ok(()),
        }
    }

    /// Pixel memory.
    ///
    /// # Safety
    /// `screen_base` must still be mapped for `fix.smem_len` bytes and not be
    /// aliased mutably elsewhere for the returned lifetime.
    pub unsafe fn screen_mut(&mut self) -> Option<&mut [u8]> {
        let base = self.screen_base?;
        Some(core::slice::from_raw_parts_mut(
            base.as_ptr(),
            self.fix.smem_len as usize,
        ))
    }
}

impl fmt::Debug for FbInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FbInfo")
            .field("id", &self.fix.id())
            .field("node", &self.node)
            .field("xres", &self.var.xres)
            .field("yres", &self.var.yres)
            .field("bits_per_pixel", &self.var.bits_per_pixel)
            .field("has_ops", &self.fbops.is_some())
            .field("screen_base", &self.screen_base)
            .finish()
    }
}

impl Default for FbInfo {
    fn default() -> Self {
        Self::new()
    }
}
