//! Umbrella crate for the `masktrack` workspace.
//!
//! Re-exports every stage crate and adds the host entry points:
//! - [`extract_track`]: decoded RGBA mask to validated [`TrackModel`],
//! - [`render_track`]: [`TrackModel`] back to an RGBA buffer,
//! - [`parse_track`] and [`serialize_track`]: the track JSON format.
//!
//! Image file decoding and encoding stay with the caller; see the `mt-cli`
//! crate for a PNG front end.

pub use mt_core::*;
pub use mt_mask::*;
pub use mt_morph::*;
pub use mt_raster::*;
pub use mt_skeleton::*;
pub use mt_track::*;

/// Loads and validates a track from JSON bytes.
pub fn parse_track(bytes: &[u8]) -> Result<TrackModel, TrackError> {
    from_json_slice(bytes)
}

/// Writes a track as pretty-printed JSON.
pub fn serialize_track(model: &TrackModel) -> Result<Vec<u8>, TrackError> {
    to_json_vec(model)
}
