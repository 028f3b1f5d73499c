//! Seven vertical color bars across the visible area.

use uapi::FbVarScreeninfo;

use crate::pixel::{PixelFormat, Rgba};

/// Bar colors left to right, red first. Components are stored per channel
/// rather than as a packed `0xAARRGGBB` word, so the leftmost bar is red on
/// every layout; a packed table unpacked with the wrong shifts shows blue there.
pub const BARS: [Rgba; 7] = [
    Rgba::opaque(0xff, 0x00, 0x00), // red
    Rgba::opaque(0x00, 0xff, 0x00), // green
    Rgba::opaque(0x00, 0x00, 0xff), // blue
    Rgba::opaque(0xff, 0xff, 0x00), // yellow
    Rgba::opaque(0xff, 0x00, 0xff), // magenta
    Rgba::opaque(0x00, 0xff, 0xff), // cyan
    Rgba::opaque(0xff, 0xff, 0xff), // white
];

/// Bar index for column `x`. Columns past the last full bar belong to it.
pub fn band_index(x: usize, width: usize) -> usize {
    let bar_width = (width / BARS.len()).max(1);
    (x / bar_width).min(BARS.len() - 1)
}

/// Paint the bars into `buf`, laid out as `xres * yres` packed pixels.
/// Pixels that would fall outside `buf` are skipped.
pub fn draw(buf: &mut [u8], var: &FbVarScreeninfo) {
    let fmt = PixelFormat::from_var(var);
    let bpp = fmt.bytes_per_pixel();
    if bpp == 0 {
        return;
    }
    let width = var.xres as usize;
    let height = var.yres as usize;

    let row: Vec<u32> = (0..width).map(|x| fmt.pack(BARS[band_index(x, width)])).collect();
    for y in 0..height {
        for (x, &value) in row.iter().enumerate() {
            let at = (x + y * width) * bpp;
            match buf.get_mut(at..at + bpp) {
                Some(dst) => fmt.store(value, dst),
                None => return,
            }
        }
    }
}
