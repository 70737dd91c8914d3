use mt_skeleton::CycleSearchError;
use thiserror::Error;

/// A structural rule a [`TrackModel`](crate::TrackModel) must satisfy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Invariant {
    #[error("size must be non-zero, got {width}x{height}")]
    EmptySize { width: u32, height: u32 },

    #[error("a closed track needs at least {min} points, got {len}")]
    TooFewPoints { len: usize, min: usize },

    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },

    #[error("per-point width has {actual} entries for {expected} points")]
    WidthLengthMismatch { expected: usize, actual: usize },

    #[error("width at {index} must be finite and positive, got {width}")]
    NonPositiveWidth { index: usize, width: f32 },

    #[error("checkpoint {position} refers to point {value}, but the track has {len} points")]
    CheckpointOutOfRange {
        position: usize,
        value: usize,
        len: usize,
    },

    #[error("checkpoint {position} ({value}) does not increase on the previous one ({previous})")]
    CheckpointNotIncreasing {
        position: usize,
        value: usize,
        previous: usize,
    },

    #[error("start line index {index} is out of range for {len} points")]
    StartIndexOutOfRange { index: usize, len: usize },

    #[error("start line angle must be finite, got {angle}")]
    NonFiniteStartAngle { angle: f32 },
}

/// Everything that can stop a mask from becoming a track, or a track
/// document from loading.
#[derive(Error, Debug)]
pub enum TrackError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] mt_core::Error),

    #[error("mask contains no closed loop")]
    NoClosedLoop,

    #[error("loop search gave up after {steps} steps; raise maxCycleSearchSteps")]
    CycleSearchExhausted { steps: usize },

    #[error("track length {length:.1}px is below the minimum of {min:.1}px")]
    TrackTooSmall { length: f32, min: f32 },

    #[error("track pinches to {width:.2}px at point {index}")]
    DegenerateWidth { index: usize, width: f32 },

    #[error("schema validation failed: {0}")]
    SchemaValidation(#[from] Invariant),

    #[error("malformed track JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CycleSearchError> for TrackError {
    fn from(err: CycleSearchError) -> Self {
        match err {
            CycleSearchError::NoCycle => Self::NoClosedLoop,
            CycleSearchError::Exhausted { steps } => Self::CycleSearchExhausted { steps },
        }
    }
}
