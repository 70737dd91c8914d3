//! Track rasterization: the inverse of mask extraction.
//!
//! A pixel belongs to the track when its centre lies within the locally
//! interpolated half-width of the closed centerline, i.e. when the signed
//! distance `min over segments (distance - half_width)` is `<= 0`.
//!
//! Each segment only touches the pixels inside its bounding box grown by its
//! half-width, so cost scales with track area rather than image area times
//! point count.

use mt_core::{Image, PixelBuffer, Point2f, project_on_segment};
use mt_track::TrackModel;

/// Colours and edge treatment for [`render_track_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStyle {
    pub track: [u8; 4],
    pub background: [u8; 4],
    /// Blend edge pixels by coverage `clamp(0.5 - sd, 0, 1)` instead of a
    /// hard `sd <= 0` cut.
    pub antialias: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            track: [255, 255, 255, 255],
            background: [0, 0, 0, 0],
            antialias: false,
        }
    }
}

/// Renders opaque white track on transparent black, sized like the image the
/// track came from.
pub fn render_track(model: &TrackModel) -> PixelBuffer {
    render_track_with(model, &RenderStyle::default())
}

pub fn render_track_with(model: &TrackModel, style: &RenderStyle) -> PixelBuffer {
    let sd = signed_distance(model);
    let size = model.size();

    let mut covered = 0usize;
    let buf = PixelBuffer::from_fn(size.width, size.height, |x, y| {
        let d = sd
            .get(x as usize, y as usize)
            .copied()
            .unwrap_or(f32::INFINITY);
        if d <= 0.0 {
            covered += 1;
        }

        if style.antialias {
            blend(style.background, style.track, (0.5 - d).clamp(0.0, 1.0))
        } else if d <= 0.0 {
            style.track
        } else {
            style.background
        }
    });

    log::debug!(
        "rendered {}x{} track: {covered} track pixels",
        size.width,
        size.height
    );
    buf
}

/// Signed distance to the track edge at every pixel centre; negative inside.
///
/// Pixels farther than one pixel outside every segment's reach stay at
/// `f32::INFINITY`.
pub fn signed_distance(model: &TrackModel) -> Image<f32> {
    let size = model.size();
    let (w, h) = (size.width as usize, size.height as usize);
    let mut sd = Image::new_fill(w, h, f32::INFINITY);
    let points = model.points();
    let n = points.len();

    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (points[i], points[j]);
        let ha = model.width_at(i) * 0.5;
        let hb = model.width_at(j) * 0.5;
        let reach = ha.max(hb) + 1.0;

        let Some((xs, ys)) = clip_box(a, b, reach, w, h) else {
            continue;
        };

        for y in ys {
            for x in xs.clone() {
                let (t, dist) = project_on_segment(Point2f::new(x as f32, y as f32), a, b);
                let v = dist - (ha + (hb - ha) * t);
                if let Some(cell) = sd.get_mut(x, y)
                    && v < *cell
                {
                    *cell = v;
                }
            }
        }
    }

    sd
}

type PixelRange = std::ops::RangeInclusive<usize>;

/// Pixel ranges covering segment `ab` grown by `reach`, clipped to the image.
fn clip_box(a: Point2f, b: Point2f, reach: f32, w: usize, h: usize) -> Option<(PixelRange, PixelRange)> {
    let x0 = (a.x.min(b.x) - reach).floor().max(0.0);
    let y0 = (a.y.min(b.y) - reach).floor().max(0.0);
    let x1 = (a.x.max(b.x) + reach).ceil().min(w as f32 - 1.0);
    let y1 = (a.y.max(b.y) + reach).ceil().min(h as f32 - 1.0);
    if !(x0 <= x1 && y0 <= y1) {
        return None;
    }
    Some((x0 as usize..=x1 as usize, y0 as usize..=y1 as usize))
}

fn blend(bg: [u8; 4], fg: [u8; 4], coverage: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for c in 0..4 {
        let v = bg[c] as f32 + (fg[c] as f32 - bg[c] as f32) * coverage;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use mt_core::{PixelBuffer, Point2f};
    use mt_mask::{ClassificationRule, classify};
    use mt_track::{StartLine, TrackConfig, TrackModel, TrackSize, TrackWidth, extract_track};

    use super::{RenderStyle, render_track, render_track_with, signed_distance};

    fn ring_mask() -> PixelBuffer {
        PixelBuffer::from_fn(100, 100, |x, y| {
            let d = ((x as f32 - 49.5).powi(2) + (y as f32 - 49.5).powi(2)).sqrt();
            if d > 30.0 && d < 40.0 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 0]
            }
        })
    }

    fn square_track() -> TrackModel {
        TrackModel::new(
            TrackSize {
                width: 40,
                height: 40,
            },
            vec![
                Point2f::new(10.0, 10.0),
                Point2f::new(30.0, 10.0),
                Point2f::new(30.0, 30.0),
                Point2f::new(10.0, 30.0),
            ],
            TrackWidth::Uniform(4.0),
            vec![0, 2],
            StartLine {
                index: 0,
                angle: 0.0,
            },
        )
        .expect("valid")
    }

    #[test]
    fn signed_distance_is_negative_inside() {
        let sd = signed_distance(&square_track());

        assert!((sd.get(20, 10).copied().unwrap_or(f32::NAN) + 2.0).abs() < 1e-5);
        assert!((sd.get(20, 13).copied().unwrap_or(f32::NAN) - 1.0).abs() < 1e-5);
        assert_eq!(sd.get(20, 20).copied(), Some(f32::INFINITY));
    }

    #[test]
    fn style_controls_colours_and_edges() {
        let model = square_track();

        let plain = render_track(&model);
        assert_eq!(plain.get(20, 12), Some([255, 255, 255, 255]));
        assert_eq!(plain.get(20, 13), Some([0, 0, 0, 0]));

        let style = RenderStyle {
            track: [200, 0, 0, 255],
            background: [0, 0, 80, 255],
            antialias: true,
        };
        let aa = render_track_with(&model, &style);
        assert_eq!(aa.get(20, 10), Some([200, 0, 0, 255]));
        assert_eq!(aa.get(20, 20), Some([0, 0, 80, 255]));

        let edge = aa.get(20, 12).expect("in bounds");
        assert_eq!(edge, [100, 0, 40, 255]);
    }

    #[test]
    fn ring_round_trip_stays_within_two_percent() {
        let mask = ring_mask();
        let ex = extract_track(&mask, &TrackConfig::default()).expect("track");
        let rendered = render_track(&ex.track);

        let rule = ClassificationRule::AlphaThreshold { threshold: 127 };
        let before = classify(&mask, &rule).expect("classify");
        let after = classify(&rendered, &rule).expect("classify");
        let diff = before.disagreement(&after).expect("same size");
        assert!(diff <= 0.02, "disagreement {diff}");
    }

    #[test]
    fn re_extraction_matches_point_by_point() {
        let cfg = TrackConfig::default();
        let first = extract_track(&ring_mask(), &cfg).expect("track").track;
        let second = extract_track(&render_track(&first), &cfg).expect("track").track;

        let n = first.len();
        assert_eq!(second.len(), n);
        let (a, b) = (first.points(), second.points());

        // Pair points after the cyclic shift that best lines up the two starts.
        let shift = (0..n)
            .min_by(|&i, &j| a[0].distance(b[i]).total_cmp(&a[0].distance(b[j])))
            .unwrap_or(0);
        let gaps: Vec<f32> = (0..n).map(|i| a[i].distance(b[(i + shift) % n])).collect();
        let worst = gaps.iter().copied().fold(0.0, f32::max);
        let mean = gaps.iter().sum::<f32>() / n as f32;

        // Thinning an even-width band may settle one pixel off its centre, so a
        // few points move just over a pixel while the average stays far below.
        assert!(worst <= 1.5, "worst pointwise gap {worst}");
        assert!(mean <= 0.5, "mean pointwise gap {mean}");

        let outline = first.polyline();
        for p in b {
            let d = outline.closed_distance(*p);
            assert!(d <= 1.0 + 1e-3, "point {p:?} is {d}px off the first outline");
        }
    }
}
