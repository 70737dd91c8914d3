use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mt_core::Image;
use mt_morph::{open_binary_u8, thin_zhang_suen};

fn synthetic_ring(width: usize, height: usize) -> Image<u8> {
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    let outer = cx.min(cy) * 0.9;
    let inner = outer * 0.8;
    Image::from_fn(width, height, |x, y| {
        let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
        if d > inner && d < outer { 255 } else { 0 }
    })
}

fn bench_thin(c: &mut Criterion) {
    let img = synthetic_ring(512, 512);
    let view = img.as_view();

    c.bench_function("thin_zhang_suen_ring_512", |b| {
        b.iter(|| {
            let skel = thin_zhang_suen(black_box(&view));
            black_box(skel);
        });
    });
}

fn bench_open(c: &mut Criterion) {
    let img = synthetic_ring(512, 512);
    let view = img.as_view();

    c.bench_function("open_binary_u8_r2_512", |b| {
        b.iter(|| {
            let out = open_binary_u8(black_box(&view), 2);
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_thin, bench_open);
criterion_main!(benches);
