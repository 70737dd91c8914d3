use masktrack::{
    ClassificationRule, Error, Invariant, PixelBuffer, TrackConfig, TrackError, TrackWidth,
    classify, extract_track, parse_track, render_track, serialize_track,
};

const INK: [u8; 4] = [255, 255, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

fn ring_mask(size: u32, inner: f32, outer: f32) -> PixelBuffer {
    let c = (size as f32 - 1.0) * 0.5;
    PixelBuffer::from_fn(size, size, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
        if d > inner && d < outer { INK } else { CLEAR }
    })
}

#[test]
fn ring_scenario_matches_expected_track() {
    let cfg = TrackConfig::default();
    let ex = extract_track(&ring_mask(100, 30.0, 40.0), &cfg).expect("track");

    assert_eq!(ex.candidate_loops, 1);
    assert!(!ex.ambiguous);
    assert_eq!(ex.track.checkpoints().len(), cfg.checkpoint_count);
    assert_eq!(ex.track.size().width, 100);

    let mean = ex.track.width().mean();
    assert!((mean - 10.0).abs() <= 1.0, "mean width {mean}");
}

#[test]
fn json_round_trip_through_host_api() {
    let track = extract_track(&ring_mask(100, 30.0, 40.0), &TrackConfig::default())
        .expect("track")
        .track;

    let bytes = serialize_track(&track).expect("serialize");
    let back = parse_track(&bytes).expect("parse");
    assert!(track.approx_eq(&back, 1e-6));
    assert_eq!(back.checkpoints(), track.checkpoints());
}

#[test]
fn render_back_agrees_with_mask() {
    let mask = ring_mask(100, 30.0, 40.0);
    let track = extract_track(&mask, &TrackConfig::default()).expect("track").track;
    let rendered = render_track(&track);

    assert_eq!((rendered.width(), rendered.height()), (100, 100));
    let rule = ClassificationRule::default();
    let a = classify(&mask, &rule).expect("classify");
    let b = classify(&rendered, &rule).expect("classify");
    assert!(a.disagreement(&b).expect("same size") <= 0.02);
}

#[test]
fn dark_ink_on_white_with_luminance_rule() {
    let mask = ring_mask(100, 30.0, 40.0);
    let inverted = PixelBuffer::from_fn(100, 100, |x, y| match mask.get(x, y) {
        Some(px) if px[3] == 255 => [20, 20, 20, 255],
        _ => [250, 250, 250, 255],
    });
    let cfg: TrackConfig =
        serde_json::from_str(r#"{"classificationRule": "luminanceDark", "uniformWidth": true}"#)
            .expect("config");

    let ex = extract_track(&inverted, &cfg).expect("track");
    assert!(matches!(ex.track.width(), TrackWidth::Uniform(w) if (w - 10.0).abs() <= 1.0));
}

#[test]
fn degenerate_masks_fail_with_typed_errors() {
    let cfg = TrackConfig::default();

    let empty = PixelBuffer::from_fn(64, 64, |_, _| CLEAR);
    assert!(matches!(extract_track(&empty, &cfg), Err(TrackError::NoClosedLoop)));

    let speck = PixelBuffer::from_fn(64, 64, |x, y| {
        if (30..33).contains(&x) && (30..33).contains(&y) { INK } else { CLEAR }
    });
    assert!(matches!(extract_track(&speck, &cfg), Err(TrackError::TrackTooSmall { .. })));

    let zero = PixelBuffer::from_fn(0, 10, |_, _| INK);
    assert!(matches!(
        extract_track(&zero, &cfg),
        Err(TrackError::InvalidImage(Error::EmptyImage { width: 0, height: 10 }))
    ));
}

#[test]
fn parse_reports_json_and_schema_failures() {
    assert!(matches!(parse_track(b"not json"), Err(TrackError::Parse(_))));

    let doc = br#"{
        "size": {"width": 10, "height": 10},
        "points": [{"x": 1, "y": 1}, {"x": 8, "y": 1}, {"x": 4, "y": 8}],
        "width": 2.0,
        "checkpoints": [0, 3],
        "startLine": {"index": 0, "angle": 0.0}
    }"#;
    match parse_track(doc) {
        Err(TrackError::SchemaValidation(Invariant::CheckpointOutOfRange { value, len, .. })) => {
            assert_eq!((value, len), (3, 3));
        }
        other => panic!("unexpected {other:?}"),
    }
}
