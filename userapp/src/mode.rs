//! Requesting the panel geometry from the framebuffer.

use std::io;

use uapi::FbVarScreeninfo;
use usys::ScreenInfo;

pub const TARGET_XRES: u32 = 480;
pub const TARGET_YRES: u32 = 272;

/// `base` with the visible and virtual resolution set to the panel size.
/// Everything else, bit depth included, is carried over.
pub fn target_mode(base: &FbVarScreeninfo) -> FbVarScreeninfo {
    let mut var = *base;
    var.xres = TARGET_XRES;
    var.yres = TARGET_YRES;
    var.xres_virtual = TARGET_XRES;
    var.yres_virtual = TARGET_YRES;
    var
}

/// Switch to the panel geometry, retrying once from `original` if the
/// first request is refused. `on_fallback` sees the first error before
/// the retry. Returns the mode the driver applied; an error is the
/// failure of the retry.
pub fn negotiate<S, F>(fb: &S, original: &FbVarScreeninfo, on_fallback: F) -> io::Result<FbVarScreeninfo>
where
    S: ScreenInfo,
    F: FnOnce(&io::Error),
{
    let mut var = target_mode(original);
    match fb.put_var_screeninfo(&mut var) {
        Ok(()) => return Ok(var),
        Err(err) => on_fallback(&err),
    }

    let mut var = target_mode(original);
    fb.put_var_screeninfo(&mut var)?;
    Ok(var)
}
