//! Mask classification: RGBA pixels to track occupancy.
//!
//! A mask image is painted by hand, so "track" can be expressed through
//! transparency, brightness or a dedicated colour. [`ClassificationRule`]
//! selects the decision rule; thresholds are always caller-supplied.

use mt_core::{Error, OccupancyField, PixelBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LumaPolarity {
    /// Track is brighter than the threshold.
    Bright,
    /// Track is darker than the threshold.
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// Track iff `alpha > threshold`.
    AlphaThreshold { threshold: u8 },
    /// Rec.601 luma compared against `threshold`; alpha is ignored.
    LuminanceThreshold { threshold: u8, polarity: LumaPolarity },
    /// Track iff every RGBA channel is within `tolerance` of `color`.
    ExactColor { color: [u8; 4], tolerance: u8 },
}

impl Default for ClassificationRule {
    fn default() -> Self {
        Self::AlphaThreshold { threshold: 127 }
    }
}

impl ClassificationRule {
    pub fn is_track(&self, rgba: [u8; 4]) -> bool {
        match *self {
            Self::AlphaThreshold { threshold } => rgba[3] > threshold,
            Self::LuminanceThreshold {
                threshold,
                polarity,
            } => {
                let y = luma(rgba);
                match polarity {
                    LumaPolarity::Bright => y > threshold,
                    LumaPolarity::Dark => y < threshold,
                }
            }
            Self::ExactColor { color, tolerance } => rgba
                .iter()
                .zip(color)
                .all(|(&c, target)| c.abs_diff(target) <= tolerance),
        }
    }
}

pub fn luma(rgba: [u8; 4]) -> u8 {
    let [r, g, b, _] = rgba;
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

pub fn classify(buffer: &PixelBuffer, rule: &ClassificationRule) -> Result<OccupancyField, Error> {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let expected = width * height * mt_core::CHANNELS;
    if buffer.as_bytes().len() != expected {
        return Err(Error::SizeMismatch {
            expected,
            actual: buffer.as_bytes().len(),
        });
    }

    let flags: Vec<bool> = buffer.pixels().map(|px| rule.is_track(px)).collect();
    let field = OccupancyField::from_bools(width, height, |x, y| flags[y * width + x]);
    log::debug!(
        "classified {}x{} mask with {:?}: {} track pixels",
        width,
        height,
        rule,
        field.count()
    );

    Ok(field)
}

#[cfg(test)]
mod tests {
    use mt_core::{Error, PixelBuffer};

    use crate::{ClassificationRule, LumaPolarity, classify, luma};

    fn two_by_two() -> PixelBuffer {
        PixelBuffer::from_rgba8(
            2,
            2,
            vec![
                0, 0, 0, 0, // transparent
                255, 255, 255, 255, // white
                10, 20, 30, 200, // dark, mostly opaque
                250, 0, 0, 255, // red
            ],
        )
        .expect("valid buffer")
    }

    #[test]
    fn alpha_threshold_is_strict() {
        let field = classify(
            &two_by_two(),
            &ClassificationRule::AlphaThreshold { threshold: 200 },
        )
        .expect("classify");

        assert!(!field.is_track(0, 0));
        assert!(field.is_track(1, 0));
        assert!(!field.is_track(0, 1));
        assert!(field.is_track(1, 1));
    }

    #[test]
    fn luminance_polarities() {
        let buf = two_by_two();
        let bright = classify(
            &buf,
            &ClassificationRule::LuminanceThreshold {
                threshold: 128,
                polarity: LumaPolarity::Bright,
            },
        )
        .expect("classify");
        assert_eq!(bright.count(), 1);
        assert!(bright.is_track(1, 0));

        let dark = classify(
            &buf,
            &ClassificationRule::LuminanceThreshold {
                threshold: 128,
                polarity: LumaPolarity::Dark,
            },
        )
        .expect("classify");
        assert_eq!(dark.count(), 3);
        assert_eq!(luma([255, 255, 255, 0]), 255);
        assert_eq!(luma([250, 0, 0, 255]), 74);
    }

    #[test]
    fn exact_color_with_tolerance() {
        let buf = two_by_two();
        let exact = ClassificationRule::ExactColor {
            color: [255, 0, 0, 255],
            tolerance: 0,
        };
        assert_eq!(classify(&buf, &exact).expect("classify").count(), 0);

        let loose = ClassificationRule::ExactColor {
            color: [255, 0, 0, 255],
            tolerance: 5,
        };
        let field = classify(&buf, &loose).expect("classify");
        assert_eq!(field.count(), 1);
        assert!(field.is_track(1, 1));
    }

    #[test]
    fn zero_area_buffer_is_rejected() {
        let buf = PixelBuffer::from_fn(3, 0, |_, _| [255; 4]);
        assert_eq!(
            classify(&buf, &ClassificationRule::default()),
            Err(Error::EmptyImage {
                width: 3,
                height: 0
            })
        );
    }
}
