//! Foundational types for mask-to-track conversion.
//!
//! ## Coordinates
//! Geometry uses pixel-center coordinates: integer `(x, y)` is the center of
//! pixel column `x`, row `y`, with `y` growing downwards. Bilinear sampling
//! uses the floor-based 2x2 neighborhood in the same convention.
//!
//! ## Buffers
//! [`PixelBuffer`] holds decoded RGBA8 bytes as handed over by an image
//! codec. [`OccupancyField`] is the binary track/background classification
//! derived from it. [`Image`] and [`ImageView`] are the generic raster
//! containers both are built on.

mod border;
mod error;
mod geom;
mod image;
mod occupancy;
mod pixel;
mod sample;

pub use border::{BorderMode, map_index};
pub use error::Error;
pub use geom::{Point2f, Polyline2f, Vec2f, project_on_segment, segment_intersection};
pub use image::{Image, ImageView};
pub use occupancy::{BACKGROUND, OccupancyField, TRACK};
pub use pixel::{CHANNELS, PixelBuffer};
pub use sample::sample_bilinear_f32;
