use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mt_core::Point2f;
use mt_raster::{RenderStyle, render_track_with};
use mt_track::{StartLine, TrackModel, TrackSize, TrackWidth};

fn synthetic_track(width: u32, height: u32, n: usize) -> TrackModel {
    let cx = width as f32 * 0.5;
    let cy = height as f32 * 0.5;
    let points: Vec<Point2f> = (0..n)
        .map(|i| {
            let a = i as f32 / n as f32 * std::f32::consts::TAU;
            let r = cy * (0.7 + 0.1 * (3.0 * a).sin());
            Point2f::new(cx + 1.4 * r * a.cos(), cy + r * a.sin())
        })
        .collect();
    let widths = (0..n).map(|i| 18.0 + 6.0 * (i as f32 * 0.1).cos()).collect();

    TrackModel::new(
        TrackSize { width, height },
        points,
        TrackWidth::PerPoint(widths),
        (0..8).map(|k| k * n / 8).collect(),
        StartLine {
            index: 0,
            angle: 0.0,
        },
    )
    .expect("valid track")
}

fn bench_render(c: &mut Criterion) {
    let model = synthetic_track(1280, 1024, 512);

    c.bench_function("render_track_1280x1024_512pts", |b| {
        b.iter(|| {
            let buf = render_track_with(black_box(&model), &RenderStyle::default());
            black_box(buf);
        });
    });

    let aa = RenderStyle {
        antialias: true,
        ..RenderStyle::default()
    };
    c.bench_function("render_track_aa_1280x1024_512pts", |b| {
        b.iter(|| {
            let buf = render_track_with(black_box(&model), &aa);
            black_box(buf);
        });
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
