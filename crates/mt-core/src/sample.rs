use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Bilinear sample at `(x, y)` in pixel-center coordinates.
///
/// Uses the floor-based 2x2 neighborhood. Empty images return the constant
/// border value, or `0.0` for clamped borders.
pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    border: &BorderMode<f32>,
) -> f32 {
    if img.width() == 0 || img.height() == 0 {
        return match border {
            BorderMode::Constant(v) => *v,
            BorderMode::Clamp => 0.0,
        };
    }

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at(img, x0, y0, border);
    let p10 = sample_at(img, x0 + 1, y0, border);
    let p01 = sample_at(img, x0, y0 + 1, border);
    let p11 = sample_at(img, x0 + 1, y0 + 1, border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

fn sample_at<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    border: &BorderMode<f32>,
) -> f32 {
    let mapped = map_index(x, img.width(), border).zip(map_index(y, img.height(), border));
    match (mapped, border) {
        // SAFETY: `map_index` only returns indices in `[0, len)`.
        (Some((xi, yi)), _) => unsafe { (*img.get_unchecked(xi, yi)).into() },
        (None, BorderMode::Constant(c)) => *c,
        (None, BorderMode::Clamp) => 0.0,
    }
}
