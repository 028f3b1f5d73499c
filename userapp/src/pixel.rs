//! Packing RGBA components into the pixel layout a framebuffer reports.

use uapi::FbVarScreeninfo;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Channel positions taken from the variable screen info at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormat {
    red: u32,
    green: u32,
    blue: u32,
    transp: Option<u32>,
    bytes_per_pixel: usize,
}

impl PixelFormat {
    pub fn from_var(var: &FbVarScreeninfo) -> Self {
        Self {
            red: var.red.offset,
            green: var.green.offset,
            blue: var.blue.offset,
            transp: (var.transp.length > 0).then_some(var.transp.offset),
            bytes_per_pixel: var.bytes_per_pixel(),
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    pub fn pack(&self, color: Rgba) -> u32 {
        let mut value = shift(color.r, self.red) | shift(color.g, self.green) | shift(color.b, self.blue);
        if let Some(offset) = self.transp {
            value |= shift(color.a, offset);
        }
        value
    }

    /// Store `value` into the first `bytes_per_pixel` bytes of `dst`,
    /// low-order bytes first on little-endian hosts.
    pub fn store(&self, value: u32, dst: &mut [u8]) {
        let bytes = value.to_ne_bytes();
        let n = self.bytes_per_pixel.min(bytes.len()).min(dst.len());
        dst[..n].copy_from_slice(&bytes[..n]);
    }
}

// Offsets past the word drop the channel instead of overflowing.
fn shift(component: u8, offset: u32) -> u32 {
    u32::from(component).checked_shl(offset).unwrap_or(0)
}
