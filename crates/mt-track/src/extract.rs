use mt_core::{OccupancyField, PixelBuffer};
use mt_mask::classify;
use mt_morph::{close_binary_u8, open_binary_u8, thin_zhang_suen};
use mt_skeleton::{build_skeleton_graph, select_longest_cycle};

use crate::build::build_track;
use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::model::TrackModel;

/// A track extracted from a mask, with advisory notes on how clean the mask
/// was.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub track: TrackModel,
    /// More than one loop was found, or the search budget ran out.
    pub ambiguous: bool,
    pub candidate_loops: usize,
    /// `1.0` for a single loop; otherwise the chosen loop's share of the
    /// combined length of it and the runner-up.
    pub confidence: f32,
    pub trimmed_loops: usize,
}

/// Runs the whole mask-to-track pipeline on a decoded RGBA buffer.
pub fn extract_track(buffer: &PixelBuffer, cfg: &TrackConfig) -> Result<Extraction, TrackError> {
    cfg.validate()?;

    let mut field = classify(buffer, &cfg.rule())?;
    if cfg.denoise_radius > 0 {
        let opened = open_binary_u8(&field.as_view(), cfg.denoise_radius);
        let closed = close_binary_u8(&opened.as_view(), cfg.denoise_radius);
        field = OccupancyField::from_mask(&closed);
    }
    log::debug!(
        "occupancy {}x{}: {} track pixels",
        field.width(),
        field.height(),
        field.count()
    );
    if field.is_empty() {
        return Err(TrackError::NoClosedLoop);
    }

    let skeleton = thin_zhang_suen(&field.as_view());
    let skeleton_pixels = skeleton.data().iter().filter(|&&v| v != 0).count();
    log::debug!("skeleton: {skeleton_pixels} pixels");
    if skeleton_pixels == 0 {
        return Err(TrackError::NoClosedLoop);
    }
    if (skeleton_pixels as f32) < cfg.min_track_length {
        return Err(TrackError::TrackTooSmall {
            length: skeleton_pixels as f32,
            min: cfg.min_track_length,
        });
    }

    let graph = build_skeleton_graph(&skeleton.as_view(), &cfg.skeleton_graph_config());
    let selection = select_longest_cycle(&graph, &cfg.cycle_search_config())?;

    let ambiguous = selection.is_ambiguous();
    let confidence = selection.confidence();
    if ambiguous {
        log::warn!(
            "mask has {} candidate loops{}; using the longest ({:.1}px, confidence {:.2})",
            selection.candidates,
            if selection.exhausted { " (search incomplete)" } else { "" },
            selection.length,
            confidence
        );
    }

    let built = build_track(&selection.points, &field, cfg)?;

    Ok(Extraction {
        track: built.model,
        ambiguous,
        candidate_loops: selection.candidates,
        confidence,
        trimmed_loops: built.trimmed_loops,
    })
}

#[cfg(test)]
mod tests {
    use mt_core::PixelBuffer;
    use mt_skeleton::CycleSearchError;

    use super::extract_track;
    use crate::config::TrackConfig;
    use crate::error::TrackError;
    use crate::model::TrackWidth;

    const INK: [u8; 4] = [255, 255, 255, 255];

    fn paint(width: u32, height: u32, mut f: impl FnMut(f32, f32) -> bool) -> PixelBuffer {
        let mut buf = PixelBuffer::new_fill(width, height, [0, 0, 0, 0]).expect("buffer");
        for y in 0..height {
            for x in 0..width {
                if f(x as f32, y as f32) {
                    buf.put(x, y, INK);
                }
            }
        }
        buf
    }

    fn ring(cx: f32, cy: f32, inner: f32, outer: f32) -> impl Fn(f32, f32) -> bool {
        move |x, y| {
            let d = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            d > inner && d < outer
        }
    }

    #[test]
    fn ring_mask_extracts_single_loop() {
        let buf = paint(100, 100, ring(49.5, 49.5, 30.0, 40.0));
        let ex = extract_track(&buf, &TrackConfig::default()).expect("track");

        assert!(!ex.ambiguous);
        assert_eq!(ex.candidate_loops, 1);
        assert_eq!(ex.confidence, 1.0);
        assert_eq!(ex.trimmed_loops, 0);

        let m = &ex.track;
        assert_eq!(m.len(), 128);
        assert_eq!(m.checkpoints().len(), 8);
        assert!(m.checkpoints().windows(2).all(|w| w[0] < w[1]));
        assert!(m.polyline().first_self_intersection().is_none());

        let TrackWidth::PerPoint(ws) = m.width() else {
            panic!("expected per-point widths");
        };
        assert!(ws.iter().all(|w| (w - 10.0).abs() <= 1.0), "{ws:?}");
        for p in m.points() {
            let r = ((p.x - 49.5).powi(2) + (p.y - 49.5).powi(2)).sqrt();
            assert!((r - 35.0).abs() < 1.5, "centerline radius {r}");
        }
    }

    #[test]
    fn empty_mask_has_no_loop() {
        let buf = paint(40, 40, |_, _| false);
        assert!(matches!(
            extract_track(&buf, &TrackConfig::default()),
            Err(TrackError::NoClosedLoop)
        ));
    }

    #[test]
    fn speck_is_too_small() {
        let buf = paint(50, 50, |x, y| (20.0..23.0).contains(&x) && (20.0..23.0).contains(&y));
        assert!(matches!(
            extract_track(&buf, &TrackConfig::default()),
            Err(TrackError::TrackTooSmall { .. })
        ));
    }

    #[test]
    fn open_stroke_has_no_loop() {
        let buf = paint(80, 20, |x, y| (10.0..70.0).contains(&x) && (8.0..13.0).contains(&y));
        assert!(matches!(
            extract_track(&buf, &TrackConfig::default()),
            Err(TrackError::NoClosedLoop)
        ));
    }

    #[test]
    fn two_rings_pick_the_larger_and_flag_ambiguity() {
        let big = ring(90.5, 40.5, 25.0, 35.0);
        let small = ring(20.5, 40.5, 8.0, 14.0);
        let buf = paint(140, 80, |x, y| big(x, y) || small(x, y));

        let ex = extract_track(&buf, &TrackConfig::default()).expect("track");
        assert!(ex.ambiguous);
        assert_eq!(ex.candidate_loops, 2);
        assert!(ex.confidence > 0.5 && ex.confidence < 1.0);
        assert!(ex.track.points().iter().all(|p| p.x > 50.0));
    }

    #[test]
    fn denoise_clears_salt_before_thinning() {
        let track = ring(49.5, 49.5, 30.0, 40.0);
        let buf = paint(100, 100, |x, y| {
            track(x, y) || (x as u32 % 17 == 3 && y as u32 % 13 == 5)
        });
        let cfg = TrackConfig {
            denoise_radius: 1,
            ..TrackConfig::default()
        };

        let ex = extract_track(&buf, &cfg).expect("track");
        assert_eq!(ex.candidate_loops, 1);
        assert!(!ex.ambiguous);
    }

    #[test]
    fn cycle_search_failures_keep_their_cause() {
        assert!(matches!(
            TrackError::from(CycleSearchError::NoCycle),
            TrackError::NoClosedLoop
        ));
        let err = TrackError::from(CycleSearchError::Exhausted { steps: 7 });
        assert!(matches!(err, TrackError::CycleSearchExhausted { steps: 7 }));
        assert!(err.to_string().contains("maxCycleSearchSteps"));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let buf = paint(100, 100, ring(49.5, 49.5, 30.0, 40.0));
        let cfg = TrackConfig {
            checkpoint_count: 0,
            ..TrackConfig::default()
        };
        assert!(matches!(extract_track(&buf, &cfg), Err(TrackError::InvalidConfig(_))));
    }
}
