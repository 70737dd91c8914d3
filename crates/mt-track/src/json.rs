//! Track JSON schema.
//!
//! ```json
//! {
//!   "size": {"width": 100, "height": 100},
//!   "points": [{"x": 84.5, "y": 49.5}],
//!   "width": 10.0,
//!   "checkpoints": [0, 16],
//!   "startLine": {"index": 0, "angle": 1.5708}
//! }
//! ```
//!
//! `width` is either a number or one number per point.

use mt_core::Point2f;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::model::{StartLine, TrackModel, TrackSize, TrackWidth};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDocument {
    pub size: SizeDocument,
    pub points: Vec<PointDocument>,
    pub width: WidthDocument,
    pub checkpoints: Vec<usize>,
    pub start_line: StartLineDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDocument {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDocument {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidthDocument {
    Uniform(f32),
    PerPoint(Vec<f32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartLineDocument {
    pub index: usize,
    pub angle: f32,
}

pub fn to_document(model: &TrackModel) -> TrackDocument {
    let size = model.size();
    let start = model.start_line();
    TrackDocument {
        size: SizeDocument {
            width: size.width,
            height: size.height,
        },
        points: model
            .points()
            .iter()
            .map(|p| PointDocument { x: p.x, y: p.y })
            .collect(),
        width: match model.width() {
            TrackWidth::Uniform(w) => WidthDocument::Uniform(*w),
            TrackWidth::PerPoint(ws) => WidthDocument::PerPoint(ws.clone()),
        },
        checkpoints: model.checkpoints().to_vec(),
        start_line: StartLineDocument {
            index: start.index,
            angle: start.angle,
        },
    }
}

/// Validates a parsed document into a model.
pub fn from_document(doc: TrackDocument) -> Result<TrackModel, TrackError> {
    TrackModel::new(
        TrackSize {
            width: doc.size.width,
            height: doc.size.height,
        },
        doc.points.iter().map(|p| Point2f::new(p.x, p.y)).collect(),
        match doc.width {
            WidthDocument::Uniform(w) => TrackWidth::Uniform(w),
            WidthDocument::PerPoint(ws) => TrackWidth::PerPoint(ws),
        },
        doc.checkpoints,
        StartLine {
            index: doc.start_line.index,
            angle: doc.start_line.angle,
        },
    )
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_json_vec(model: &TrackModel) -> Result<Vec<u8>, TrackError> {
    Ok(serde_json::to_vec_pretty(&to_document(model))?)
}

pub fn from_json_slice(bytes: &[u8]) -> Result<TrackModel, TrackError> {
    let doc: TrackDocument = serde_json::from_slice(bytes)?;
    from_document(doc)
}
