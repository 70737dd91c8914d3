//! Example: extract a track from a synthetic ring mask and render it back.
//!
//! Paints a filled ring (optionally squashed into an ellipse and sprinkled
//! with specks), runs the mask-to-track pipeline, writes the track JSON and
//! reports how closely the re-rendered track matches the painted mask.
//! Per-stage timing is printed to stdout.
//!
//! Run from the workspace root:
//!   cargo run -p masktrack --example ring -- --help
//!   cargo run -p masktrack --example ring -- --out ring.json

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use masktrack::{
    ClassificationRule, PixelBuffer, TrackConfig, classify, extract_track, render_track,
    serialize_track,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Extract a track from a synthetic ring mask")]
struct Args {
    /// Square image size in pixels
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Inner radius of the ring
    #[arg(long, default_value_t = 70.0)]
    inner: f32,

    /// Outer radius of the ring
    #[arg(long, default_value_t = 100.0)]
    outer: f32,

    /// Horizontal stretch; values above 1 give an oval
    #[arg(long, default_value_t = 1.0)]
    stretch: f32,

    /// Paint a one-pixel speck every N pixels (0 disables)
    #[arg(long, default_value_t = 0)]
    speck_every: u32,

    /// Radius of the open/close denoise pass
    #[arg(long, default_value_t = 0)]
    denoise: usize,

    /// Output JSON path
    #[arg(long, default_value = "ring_track.json")]
    out: String,
}

fn paint_ring(args: &Args) -> PixelBuffer {
    let c = (args.size as f32 - 1.0) * 0.5;
    PixelBuffer::from_fn(args.size, args.size, |x, y| {
        let dx = (x as f32 - c) / args.stretch;
        let dy = y as f32 - c;
        let d = (dx * dx + dy * dy).sqrt();
        let speck = args.speck_every > 0 && (x * 31 + y * 17) % args.speck_every == 0;
        if (d > args.inner && d < args.outer) || speck {
            [255, 255, 255, 255]
        } else {
            [0, 0, 0, 0]
        }
    })
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let mask = paint_ring(&args);
    println!(
        "painted {}x{} ring: r=({:.1}, {:.1}), stretch={:.2}",
        args.size, args.size, args.inner, args.outer, args.stretch
    );

    let cfg = TrackConfig {
        denoise_radius: args.denoise,
        ..TrackConfig::default()
    };

    let t0 = Instant::now();
    let ex = extract_track(&mask, &cfg).context("extracting track from ring mask")?;
    let extract_ms = t0.elapsed().as_secs_f64() * 1e3;

    let track = &ex.track;
    println!(
        "track: {} points, length {:.1}px, mean width {:.2}px, {} checkpoints ({extract_ms:.2} ms)",
        track.len(),
        track.closed_length(),
        track.width().mean(),
        track.checkpoints().len()
    );
    println!(
        "loops: {} candidate(s), ambiguous={}, confidence={:.2}, trimmed={}",
        ex.candidate_loops, ex.ambiguous, ex.confidence, ex.trimmed_loops
    );

    let t0 = Instant::now();
    let rendered = render_track(track);
    let render_ms = t0.elapsed().as_secs_f64() * 1e3;

    let rule = ClassificationRule::default();
    let before = classify(&mask, &rule).context("classifying mask")?;
    let after = classify(&rendered, &rule).context("classifying rendered track")?;
    let diff = before.disagreement(&after).unwrap_or(1.0);
    println!(
        "render back: {:.2}% pixels differ ({render_ms:.2} ms)",
        diff * 100.0
    );

    let bytes = serialize_track(track).context("serializing track")?;
    std::fs::write(&args.out, bytes).with_context(|| format!("writing {}", args.out))?;
    println!("track written to {}", args.out);
    Ok(())
}
