//! Userspace side of the fbdev interface: open the device node, exchange
//! screen info through ioctls and map pixel memory.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use memmap::{MmapMut, MmapOptions};
use uapi::ioctl::{FBIOGET_FSCREENINFO, FBIOGET_VSCREENINFO, FBIOPUT_VSCREENINFO};
use uapi::{FbFixScreeninfo, FbVarScreeninfo};

pub const DEFAULT_DEVICE: &str = "/dev/fb0";

/* ---------- screen info ioctls ---------- */

/// The three screen-info requests every fbdev driver answers.
pub trait ScreenInfo {
    fn var_screeninfo(&self) -> io::Result<FbVarScreeninfo>;
    fn fix_screeninfo(&self) -> io::Result<FbFixScreeninfo>;
    /// Ask for a new mode. On success the kernel writes back the mode it
    /// actually applied.
    fn put_var_screeninfo(&self, var: &mut FbVarScreeninfo) -> io::Result<()>;
}

/// An open `/dev/fbN`.
#[derive(Debug)]
pub struct Framebuffer {
    file: File,
    path: PathBuf,
}

impl Framebuffer {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Map `len` bytes of pixel memory shared and writable. Unmapped on drop.
    pub fn map(&self, len: usize) -> io::Result<MmapMut> {
        // SAFETY: the mapping aliases device memory that other processes
        // and the console may also write; callers only store plain bytes.
        unsafe { MmapOptions::new().len(len).map_mut(&self.file) }
    }

    /// # Safety
    /// `arg` must point to the structure `request` reads or writes.
    unsafe fn ioctl<T>(&self, request: u32, arg: *mut T) -> io::Result<()> {
        if libc::ioctl(self.file.as_raw_fd(), request as _, arg) == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl ScreenInfo for Framebuffer {
    fn var_screeninfo(&self) -> io::Result<FbVarScreeninfo> {
        let mut var = FbVarScreeninfo::zeroed();
        // SAFETY: FBIOGET_VSCREENINFO fills a fb_var_screeninfo.
        unsafe { self.ioctl(FBIOGET_VSCREENINFO, &mut var) }?;
        Ok(var)
    }

    fn fix_screeninfo(&self) -> io::Result<FbFixScreeninfo> {
        let mut fix = FbFixScreeninfo::zeroed();
        // SAFETY: FBIOGET_FSCREENINFO fills a fb_fix_screeninfo.
        unsafe { self.ioctl(FBIOGET_FSCREENINFO, &mut fix) }?;
        Ok(fix)
    }

    fn put_var_screeninfo(&self, var: &mut FbVarScreeninfo) -> io::Result<()> {
        // SAFETY: FBIOPUT_VSCREENINFO reads and writes back a fb_var_screeninfo.
        unsafe { self.ioctl(FBIOPUT_VSCREENINFO, var) }
    }
}
