use crate::Error;

pub const CHANNELS: usize = 4;

/// Decoded RGBA8 raster, row-major, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Error> {
        let expected = checked_len(width, height)?;
        if pixels.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn new_fill(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, Error> {
        let len = checked_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a buffer pixel by pixel in row-major order.
    ///
    /// Unlike the byte constructors this never fails: the length is correct by
    /// construction and a zero width or height yields an empty buffer. Such a
    /// buffer is still rejected with [`Error::EmptyImage`] by every consumer
    /// that needs pixels, starting with mask classification.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.pixels
            .chunks_exact(CHANNELS)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let px = &self.pixels[i..i + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.pixels[i..i + CHANNELS].copy_from_slice(&rgba);
                true
            }
            None => false,
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

fn checked_len(width: u32, height: u32) -> Result<usize, Error> {
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage {
            width: width as usize,
            height: height as usize,
        });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: 0,
        })
}

#[cfg(test)]
mod tests {
    use super::PixelBuffer;
    use crate::Error;

    #[test]
    fn rejects_empty_and_short_buffers() {
        assert_eq!(
            PixelBuffer::from_rgba8(0, 4, Vec::new()),
            Err(Error::EmptyImage {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            PixelBuffer::from_rgba8(2, 2, vec![0; 15]),
            Err(Error::SizeMismatch {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn fill_get_put() {
        let mut buf = PixelBuffer::new_fill(3, 2, [1, 2, 3, 4]).expect("valid size");
        assert_eq!(buf.as_bytes().len(), 24);
        assert_eq!(buf.get(2, 1), Some([1, 2, 3, 4]));

        assert!(buf.put(1, 1, [9, 9, 9, 255]));
        assert!(!buf.put(3, 0, [0; 4]));
        assert_eq!(buf.get(1, 1), Some([9, 9, 9, 255]));
        assert_eq!(buf.get(0, 2), None);
        assert_eq!(buf.pixels().filter(|px| px[3] == 255).count(), 1);
    }

    #[test]
    fn from_fn_is_row_major() {
        let buf = PixelBuffer::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert_eq!(buf.as_bytes().len(), 24);
        assert_eq!(buf.get(2, 0), Some([2, 0, 0, 255]));
        assert_eq!(&buf.as_bytes()[12..16], &[0, 1, 0, 255]);
    }

    #[test]
    fn from_fn_allows_zero_area() {
        let mut calls = 0;
        let buf = PixelBuffer::from_fn(0, 10, |_, _| {
            calls += 1;
            [255; 4]
        });

        assert_eq!(calls, 0);
        assert_eq!((buf.width(), buf.height()), (0, 10));
        assert!(buf.as_bytes().is_empty());
        assert_eq!(buf.get(0, 0), None);
    }
}
