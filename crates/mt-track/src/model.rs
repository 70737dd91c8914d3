use mt_core::{Point2f, Polyline2f};

use crate::error::{Invariant, TrackError};

/// Fewest points that still describe a closed polygon.
pub const MIN_TRACK_POINTS: usize = 3;

/// Size of the image a track was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackWidth {
    Uniform(f32),
    /// One width per centerline point.
    PerPoint(Vec<f32>),
}

impl TrackWidth {
    /// Width at point `i`. Out-of-range indices read as zero.
    pub fn at(&self, i: usize) -> f32 {
        match self {
            Self::Uniform(w) => *w,
            Self::PerPoint(ws) => ws.get(i).copied().unwrap_or(0.0),
        }
    }

    pub fn mean(&self) -> f32 {
        match self {
            Self::Uniform(w) => *w,
            Self::PerPoint(ws) if ws.is_empty() => 0.0,
            Self::PerPoint(ws) => ws.iter().sum::<f32>() / ws.len() as f32,
        }
    }
}

/// Where a lap begins: a point index and the direction of travel in radians
/// (`atan2(dy, dx)` in image coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartLine {
    pub index: usize,
    pub angle: f32,
}

/// A validated closed race track.
///
/// The centerline is closed: the last point connects back to the first.
/// Instances only come out of [`TrackModel::new`], which checks every
/// structural rule, so holders never see a half-valid track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackModel {
    size: TrackSize,
    points: Vec<Point2f>,
    width: TrackWidth,
    checkpoints: Vec<usize>,
    start_line: StartLine,
}

impl TrackModel {
    pub fn new(
        size: TrackSize,
        points: Vec<Point2f>,
        width: TrackWidth,
        checkpoints: Vec<usize>,
        start_line: StartLine,
    ) -> Result<Self, TrackError> {
        validate(size, &points, &width, &checkpoints, start_line)?;
        Ok(Self {
            size,
            points,
            width,
            checkpoints,
            start_line,
        })
    }

    pub fn size(&self) -> TrackSize {
        self.size
    }

    pub fn points(&self) -> &[Point2f] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn width(&self) -> &TrackWidth {
        &self.width
    }

    pub fn width_at(&self, i: usize) -> f32 {
        self.width.at(i)
    }

    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    pub fn start_line(&self) -> StartLine {
        self.start_line
    }

    pub fn polyline(&self) -> Polyline2f {
        Polyline2f::new(self.points.clone())
    }

    pub fn closed_length(&self) -> f32 {
        self.polyline().closed_length()
    }

    /// Structural fields must match exactly; floats may differ by `eps`,
    /// relative to their magnitude once it exceeds one.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        let close = |a: f32, b: f32| (a - b).abs() <= eps * a.abs().max(b.abs()).max(1.0);

        if self.size != other.size
            || self.checkpoints != other.checkpoints
            || self.start_line.index != other.start_line.index
            || self.points.len() != other.points.len()
            || !close(self.start_line.angle, other.start_line.angle)
        {
            return false;
        }

        let points_close = self
            .points
            .iter()
            .zip(&other.points)
            .all(|(a, b)| close(a.x, b.x) && close(a.y, b.y));

        let widths_close = match (&self.width, &other.width) {
            (TrackWidth::Uniform(a), TrackWidth::Uniform(b)) => close(*a, *b),
            (TrackWidth::PerPoint(a), TrackWidth::PerPoint(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(*x, *y))
            }
            _ => false,
        };

        points_close && widths_close
    }
}

fn validate(
    size: TrackSize,
    points: &[Point2f],
    width: &TrackWidth,
    checkpoints: &[usize],
    start_line: StartLine,
) -> Result<(), Invariant> {
    if size.width == 0 || size.height == 0 {
        return Err(Invariant::EmptySize {
            width: size.width,
            height: size.height,
        });
    }

    let len = points.len();
    if len < MIN_TRACK_POINTS {
        return Err(Invariant::TooFewPoints {
            len,
            min: MIN_TRACK_POINTS,
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(Invariant::NonFinitePoint { index });
    }

    let positive = |w: f32| w.is_finite() && w > 0.0;
    match width {
        TrackWidth::Uniform(w) if !positive(*w) => {
            return Err(Invariant::NonPositiveWidth {
                index: 0,
                width: *w,
            });
        }
        TrackWidth::PerPoint(ws) => {
            if ws.len() != len {
                return Err(Invariant::WidthLengthMismatch {
                    expected: len,
                    actual: ws.len(),
                });
            }
            if let Some(index) = ws.iter().position(|&w| !positive(w)) {
                return Err(Invariant::NonPositiveWidth {
                    index,
                    width: ws[index],
                });
            }
        }
        TrackWidth::Uniform(_) => {}
    }

    for (position, &value) in checkpoints.iter().enumerate() {
        if value >= len {
            return Err(Invariant::CheckpointOutOfRange {
                position,
                value,
                len,
            });
        }
        if position > 0 && value <= checkpoints[position - 1] {
            return Err(Invariant::CheckpointNotIncreasing {
                position,
                value,
                previous: checkpoints[position - 1],
            });
        }
    }

    if start_line.index >= len {
        return Err(Invariant::StartIndexOutOfRange {
            index: start_line.index,
            len,
        });
    }
    if !start_line.angle.is_finite() {
        return Err(Invariant::NonFiniteStartAngle {
            angle: start_line.angle,
        });
    }

    Ok(())
}
