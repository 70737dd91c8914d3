use mt_core::{BorderMode, OccupancyField, Point2f, Polyline2f, TRACK, Vec2f, sample_bilinear_f32};

use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::model::{MIN_TRACK_POINTS, StartLine, TrackModel, TrackSize, TrackWidth};

/// Distance between samples when marching out to the track edge, in pixels.
pub const WIDTH_MARCH_STEP: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct BuiltTrack {
    pub model: TrackModel,
    /// Self-intersections resolved by cutting off the shorter loop.
    pub trimmed_loops: usize,
}

/// Turns an ordered pixel cycle into a [`TrackModel`].
///
/// The cycle is smoothed, resampled to `resample_point_count` points evenly
/// spaced by arc length and cleared of self-intersections. Widths are
/// measured against `field` along each point's normal.
pub fn build_track(
    cycle: &[Point2f],
    field: &OccupancyField,
    cfg: &TrackConfig,
) -> Result<BuiltTrack, TrackError> {
    let mut points = cycle.to_vec();
    let window = cfg.smoothing_window | 1;
    for _ in 0..cfg.smoothing_passes {
        points = smooth_closed(&points, window);
    }

    ensure_length(&points, cfg.min_track_length)?;
    let n = cfg.resample_point_count;
    let mut points = resample_closed(&points, n);

    let mut trimmed_loops = 0;
    while let Some((i, j, x)) = Polyline2f::new(points.clone()).first_self_intersection() {
        if trimmed_loops == n {
            log::warn!("giving up on self-intersections after {n} trims");
            break;
        }

        let mut kept = keep_longer_loop(&points, i, j, x);
        orient_positive(&mut kept);
        ensure_length(&kept, cfg.min_track_length)?;
        points = resample_closed(&kept, n);
        trimmed_loops += 1;
    }
    if trimmed_loops > 0 {
        log::warn!("trimmed {trimmed_loops} self-intersecting loop(s) from the centerline");
    }

    let tangents = tangents_closed(&points);
    let widths: Vec<f32> = points
        .iter()
        .zip(&tangents)
        .map(|(&p, t)| measure_width(field, p, t.perp()))
        .collect();

    if let Some((index, &width)) = widths
        .iter()
        .enumerate()
        .find(|&(_, &w)| w < cfg.min_width || w <= 0.0)
    {
        return Err(TrackError::DegenerateWidth { index, width });
    }

    let checkpoints = place_checkpoints(&points, cfg.checkpoint_count);
    let start_line = StartLine {
        index: 0,
        angle: tangents[0].angle(),
    };
    let width = if cfg.uniform_width {
        TrackWidth::Uniform(widths.iter().sum::<f32>() / widths.len() as f32)
    } else {
        TrackWidth::PerPoint(widths)
    };

    let size = TrackSize {
        width: field.width() as u32,
        height: field.height() as u32,
    };
    let model = TrackModel::new(size, points, width, checkpoints, start_line)?;

    log::debug!(
        "built track: {} points, length {:.1}px, mean width {:.2}px, {} checkpoints",
        model.len(),
        model.closed_length(),
        model.width().mean(),
        model.checkpoints().len()
    );

    Ok(BuiltTrack {
        model,
        trimmed_loops,
    })
}

fn ensure_length(points: &[Point2f], min: f32) -> Result<(), TrackError> {
    let length = Polyline2f::new(points.to_vec()).closed_length();
    if points.len() < MIN_TRACK_POINTS || length <= 0.0 || length < min {
        return Err(TrackError::TrackTooSmall { length, min });
    }
    Ok(())
}

/// Centered moving average over a closed sequence. `window` should be odd.
fn smooth_closed(points: &[Point2f], window: usize) -> Vec<Point2f> {
    let n = points.len();
    let half = (window / 2).min(n.saturating_sub(1) / 2);
    if half == 0 {
        return points.to_vec();
    }

    let count = (2 * half + 1) as f32;
    (0..n)
        .map(|i| {
            let (sx, sy) = (0..=2 * half)
                .map(|k| points[(i + n + k - half) % n])
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            Point2f::new(sx / count, sy / count)
        })
        .collect()
}

/// `n` points spaced evenly along the closed polygon, starting at `points[0]`.
fn resample_closed(points: &[Point2f], n: usize) -> Vec<Point2f> {
    let len = points.len();
    let total = Polyline2f::new(points.to_vec()).closed_length();
    if len < 2 || total <= 0.0 || n == 0 {
        return points.to_vec();
    }

    let step = total / n as f32;
    let mut out = Vec::with_capacity(n);
    let mut seg = 0;
    let mut seg_start = 0.0_f32;
    let mut seg_len = points[0].distance(points[1 % len]);

    for k in 0..n {
        let target = k as f32 * step;
        while seg_start + seg_len < target && seg + 1 < len {
            seg_start += seg_len;
            seg += 1;
            seg_len = points[seg].distance(points[(seg + 1) % len]);
        }

        let t = if seg_len > 0.0 {
            ((target - seg_start) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(points[seg].lerp(points[(seg + 1) % len], t));
    }

    out
}

/// Splits the polygon at the crossing of edges `i` and `j` and returns the
/// longer of the two loops.
fn keep_longer_loop(points: &[Point2f], i: usize, j: usize, x: Point2f) -> Vec<Point2f> {
    let inner: Vec<Point2f> = std::iter::once(x)
        .chain(points[i + 1..=j].iter().copied())
        .collect();
    let outer: Vec<Point2f> = points[..=i]
        .iter()
        .copied()
        .chain(std::iter::once(x))
        .chain(points[j + 1..].iter().copied())
        .collect();

    let inner_len = Polyline2f::new(inner.clone()).closed_length();
    let outer_len = Polyline2f::new(outer.clone()).closed_length();
    if inner_len > outer_len { inner } else { outer }
}

/// Reverses direction if needed, keeping the first point in place.
fn orient_positive(points: &mut [Point2f]) {
    if points.len() > 2 && Polyline2f::new(points.to_vec()).signed_area() < 0.0 {
        points[1..].reverse();
    }
}

fn tangents_closed(points: &[Point2f]) -> Vec<Vec2f> {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[(i + n - 1) % n]).normalize())
        .collect()
}

/// Full width across `p`: distance to the edge along `normal` plus the
/// distance along `-normal`.
fn measure_width(field: &OccupancyField, p: Point2f, normal: Vec2f) -> f32 {
    let view = field.as_view();
    let border = BorderMode::Constant(0.0);
    let level = TRACK as f32 * 0.5;
    let max_dist = (field.width() as f32).hypot(field.height() as f32);

    let sample = |d: f32, dir: Vec2f| {
        let q = p + dir * d;
        sample_bilinear_f32(&view, q.x, q.y, &border)
    };

    let half = |dir: Vec2f| {
        let mut prev_d = 0.0;
        let mut prev_v = sample(0.0, dir);
        if prev_v < level {
            return 0.0;
        }

        let mut d = WIDTH_MARCH_STEP;
        while d <= max_dist {
            let v = sample(d, dir);
            if v < level {
                let t = (prev_v - level) / (prev_v - v);
                return prev_d + t * (d - prev_d);
            }
            prev_d = d;
            prev_v = v;
            d += WIDTH_MARCH_STEP;
        }
        max_dist
    };

    half(normal) + half(-normal)
}

/// `count` indices at uniform arc-length targets `k * L / count`, snapped to
/// the nearest point and kept strictly increasing.
fn place_checkpoints(points: &[Point2f], count: usize) -> Vec<usize> {
    let n = points.len();
    if n == 0 || count == 0 {
        return Vec::new();
    }
    let count = count.min(n);

    let mut arc = Vec::with_capacity(n);
    let mut acc = 0.0_f32;
    for i in 0..n {
        arc.push(acc);
        acc += points[i].distance(points[(i + 1) % n]);
    }
    let total = acc;

    let mut out: Vec<usize> = Vec::with_capacity(count);
    for k in 0..count {
        let target = k as f32 * total / count as f32;
        let nearest = arc
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
            .map(|(i, _)| i)
            .unwrap_or(0);

        let lo = out.last().map_or(0, |&prev| prev + 1);
        let hi = n - (count - k);
        out.push(nearest.clamp(lo, hi));
    }

    out
}
