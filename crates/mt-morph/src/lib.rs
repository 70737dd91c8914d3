//! Binary morphology and skeletonization.
//!
//! Pixels are treated as binary with threshold `> 0`.
//! Outputs are `0` or `255` in `u8`.
//!
//! Morphology uses a square structuring element of side `2 * radius + 1`,
//! applied as two separable 1D passes. Pixels outside the image count as
//! unset, so erosion eats inwards from the image border.

mod thin;

use mt_core::{Image, ImageView};

pub use thin::{cleanup_blocks, thin_zhang_suen};

pub fn erode_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    square_filter(src, radius, true)
}

pub fn dilate_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    square_filter(src, radius, false)
}

/// Erosion followed by dilation: removes specks narrower than the element.
pub fn open_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    let eroded = erode_binary_u8(src, radius);
    dilate_binary_u8(&eroded.as_view(), radius)
}

/// Dilation followed by erosion: fills holes narrower than the element.
pub fn close_binary_u8(src: &ImageView<'_, u8>, radius: usize) -> Image<u8> {
    let dilated = dilate_binary_u8(src, radius);
    erode_binary_u8(&dilated.as_view(), radius)
}

fn square_filter(src: &ImageView<'_, u8>, radius: usize, all: bool) -> Image<u8> {
    let (w, h) = (src.width(), src.height());
    let mut horiz = Image::new_fill(w, h, 0u8);
    if w == 0 || h == 0 {
        return horiz;
    }

    let hd = horiz.data_mut();
    for y in 0..h {
        let row = src.row(y);
        for x in 0..w {
            hd[y * w + x] = window_hit(x, radius, w, all, |i| row[i] != 0);
        }
    }

    let mut out = Image::new_fill(w, h, 0u8);
    let od = out.data_mut();
    let hd = horiz.data();
    for y in 0..h {
        for x in 0..w {
            od[y * w + x] = window_hit(y, radius, h, all, |j| hd[j * w + x] != 0);
        }
    }

    out
}

#[inline]
fn window_hit(
    center: usize,
    radius: usize,
    len: usize,
    all: bool,
    set: impl Fn(usize) -> bool,
) -> u8 {
    let lo = center as isize - radius as isize;
    let hi = center + radius;
    if all && (lo < 0 || hi >= len) {
        return 0;
    }

    let mut range = (lo.max(0) as usize)..=hi.min(len - 1);
    let hit = if all {
        range.all(&set)
    } else {
        range.any(&set)
    };
    if hit { 255 } else { 0 }
}
