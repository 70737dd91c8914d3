//! Track model, builder, JSON schema and the mask-to-track pipeline.
//!
//! [`extract_track`] chains the stages:
//! - classify mask pixels into an occupancy field (optionally denoised),
//! - thin the field to a skeleton and build its pixel graph,
//! - select the longest closed loop,
//! - smooth, resample and measure it into a [`TrackModel`].
//!
//! A [`TrackModel`] can only be built through [`TrackModel::new`], which
//! checks every structural rule; [`from_json_slice`] goes through the same
//! path, so a loaded track is as trustworthy as an extracted one.

mod build;
mod config;
mod error;
mod extract;
mod json;
mod model;

pub use build::{BuiltTrack, WIDTH_MARCH_STEP, build_track};
pub use config::{RuleKind, TrackConfig};
pub use error::{Invariant, TrackError};
pub use extract::{Extraction, extract_track};
pub use json::{
    PointDocument, SizeDocument, StartLineDocument, TrackDocument, WidthDocument, from_document,
    from_json_slice, to_document, to_json_vec,
};
pub use model::{MIN_TRACK_POINTS, StartLine, TrackModel, TrackSize, TrackWidth};
