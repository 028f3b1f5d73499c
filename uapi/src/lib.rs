//! Linux fbdev userspace ABI (`include/uapi/linux/fb.h`), shared by the
//! driver and the userspace test program.

#![no_std]

use bytemuck::{Pod, Zeroable};

pub mod ioctl {
    pub const FBIOGET_VSCREENINFO: u32 = 0x4600; // get(&mut fb_var_screeninfo)
    pub const FBIOPUT_VSCREENINFO: u32 = 0x4601; // put(&mut fb_var_screeninfo), written back
    pub const FBIOGET_FSCREENINFO: u32 = 0x4602; // get(&mut fb_fix_screeninfo)
}

pub const FB_TYPE_PACKED_PIXELS: u32 = 0;
pub const FB_VISUAL_TRUECOLOR: u32 = 2;
pub const FB_ACCEL_NONE: u32 = 0;
pub const FB_ACTIVATE_NOW: u32 = 0;
pub const FB_VMODE_NONINTERLACED: u32 = 0;

/// Length of the `id` field of [`FbFixScreeninfo`].
pub const FB_ID_LEN: usize = 16;

/// Position of one color channel inside a pixel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

impl FbBitfield {
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length, msb_right: 0 }
    }
}

/// `struct fb_var_screeninfo`: the user-changeable part of the mode.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct FbVarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    /// Physical height in mm, `u32::MAX` when unknown.
    pub height: u32,
    /// Physical width in mm, `u32::MAX` when unknown.
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

impl FbVarScreeninfo {
    pub const fn zeroed() -> Self {
        Self {
            xres: 0,
            yres: 0,
            xres_virtual: 0,
            yres_virtual: 0,
            xoffset: 0,
            yoffset: 0,
            bits_per_pixel: 0,
            grayscale: 0,
            red: FbBitfield::new(0, 0),
            green: FbBitfield::new(0, 0),
            blue: FbBitfield::new(0, 0),
            transp: FbBitfield::new(0, 0),
            nonstd: 0,
            activate: 0,
            height: 0,
            width: 0,
            accel_flags: 0,
            pixclock: 0,
            left_margin: 0,
            right_margin: 0,
            upper_margin: 0,
            lower_margin: 0,
            hsync_len: 0,
            vsync_len: 0,
            sync: 0,
            vmode: 0,
            rotate: 0,
            colorspace: 0,
            reserved: [0; 4],
        }
    }

    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    /// Bytes covered by the visible area, packed with no line padding.
    #[inline]
    pub const fn screen_size(&self) -> usize {
        self.xres as usize * self.yres as usize * self.bits_per_pixel as usize / 8
    }
}

impl Default for FbVarScreeninfo {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// `struct fb_fix_screeninfo`: the part of the mode the driver owns.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Zeroable)]
pub struct FbFixScreeninfo {
    pub id: [u8; FB_ID_LEN],
    /// Physical start of pixel memory (`unsigned long`).
    pub smem_start: usize,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: usize,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FbFixScreeninfo {
    pub const fn zeroed() -> Self {
        Self {
            id: [0; FB_ID_LEN],
            smem_start: 0,
            smem_len: 0,
            type_: 0,
            type_aux: 0,
            visual: 0,
            xpanstep: 0,
            ypanstep: 0,
            ywrapstep: 0,
            line_length: 0,
            mmio_start: 0,
            mmio_len: 0,
            accel: 0,
            capabilities: 0,
            reserved: [0; 2],
        }
    }

    /// The id up to its first NUL. Invalid UTF-8 yields an empty string.
    pub fn id(&self) -> &str {
        let len = self.id.iter().position(|&b| b == 0).unwrap_or(FB_ID_LEN);
        core::str::from_utf8(&self.id[..len]).unwrap_or("")
    }
}

impl Default for FbFixScreeninfo {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Build a NUL-padded `id` field. Names longer than 15 bytes are truncated
/// so the field stays NUL-terminated.
pub const fn fix_id(name: &str) -> [u8; FB_ID_LEN] {
    let bytes = name.as_bytes();
    let mut id = [0u8; FB_ID_LEN];
    let mut i = 0;
    while i < bytes.len() && i < FB_ID_LEN - 1 {
        id[i] = bytes[i];
        i += 1;
    }
    id
}

const _: () = assert!(core::mem::size_of::<FbBitfield>() == 12);
const _: () = assert!(core::mem::size_of::<FbVarScreeninfo>() == 160);
#[cfg(target_pointer_width = "64")]
const _: () = assert!(core::mem::size_of::<FbFixScreeninfo>() == 80);
#[cfg(target_pointer_width = "32")]
const _: () = assert!(core::mem::size_of::<FbFixScreeninfo>() == 68);
