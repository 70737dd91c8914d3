use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::RgbaImage;
use masktrack::{
    PixelBuffer, RenderStyle, RuleKind, TrackConfig, extract_track, parse_track,
    render_track_with, serialize_track,
};

#[derive(Parser, Debug)]
#[command(name = "masktrack")]
#[command(about = "Convert painted track masks to track JSON and back")]
struct Cli {
    /// Log pipeline stages (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a track from a mask image
    #[command(name = "convert")]
    Convert(ConvertArgs),
    /// Render a track JSON file to an image
    #[command(name = "render")]
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
struct ConvertArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    /// JSON file with extraction settings; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides `threshold` from the config
    #[arg(long)]
    threshold: Option<u8>,
    /// Overrides `classificationRule` from the config
    #[arg(long, value_enum)]
    rule: Option<RuleArg>,
}

#[derive(Args, Debug, Clone)]
struct RenderArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, required = true)]
    out: PathBuf,
    #[arg(long, default_value_t = false)]
    antialias: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum RuleArg {
    Alpha,
    Luminance,
    LuminanceDark,
    ExactColor,
}

impl From<RuleArg> for RuleKind {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Alpha => RuleKind::Alpha,
            RuleArg::Luminance => RuleKind::Luminance,
            RuleArg::LuminanceDark => RuleKind::LuminanceDark,
            RuleArg::ExactColor => RuleKind::ExactColor,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.cmd {
        Command::Convert(args) => run_convert(args),
        Command::Render(args) => run_render(args),
    }
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => read_config(path)?,
        None => TrackConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        cfg.threshold = threshold;
    }
    if let Some(rule) = args.rule {
        cfg.classification_rule = rule.into();
    }

    let t0 = Instant::now();
    let mask = load_rgba(&args.input)?;
    let decode_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    let ex = extract_track(&mask, &cfg)
        .with_context(|| format!("extracting track from {}", args.input.display()))?;
    let extract_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    let bytes = serialize_track(&ex.track).context("serializing track")?;
    fs::write(&args.out, bytes).with_context(|| format!("writing json {}", args.out.display()))?;
    let encode_ms = elapsed_ms(t0);

    if ex.ambiguous {
        log::warn!(
            "{} candidate loops in {}; kept the longest (confidence {:.2})",
            ex.candidate_loops,
            args.input.display(),
            ex.confidence
        );
    }
    log::info!(
        "{} -> {}: {} points, {} checkpoints",
        args.input.display(),
        args.out.display(),
        ex.track.len(),
        ex.track.checkpoints().len()
    );
    log::info!("timings: decode {decode_ms:.2} ms, extract {extract_ms:.2} ms, encode {encode_ms:.2} ms");
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<()> {
    let t0 = Instant::now();
    let data = fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let track =
        parse_track(&data).with_context(|| format!("parsing track {}", args.input.display()))?;
    let decode_ms = elapsed_ms(t0);

    let style = RenderStyle {
        antialias: args.antialias,
        ..RenderStyle::default()
    };
    let t0 = Instant::now();
    let buf = render_track_with(&track, &style);
    let render_ms = elapsed_ms(t0);

    let t0 = Instant::now();
    save_rgba(&args.out, buf)?;
    let encode_ms = elapsed_ms(t0);

    log::info!("{} -> {}", args.input.display(), args.out.display());
    log::info!("timings: decode {decode_ms:.2} ms, render {render_ms:.2} ms, encode {encode_ms:.2} ms");
    Ok(())
}

fn read_config(path: &Path) -> Result<TrackConfig> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: TrackConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

fn load_rgba(path: &Path) -> Result<PixelBuffer> {
    let rgba = image::open(path)
        .with_context(|| format!("opening input image {}", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();

    PixelBuffer::from_rgba8(w, h, rgba.into_raw())
        .with_context(|| format!("constructing pixel buffer from {}", path.display()))
}

fn save_rgba(path: &Path, buf: PixelBuffer) -> Result<()> {
    let (w, h) = (buf.width(), buf.height());
    let img = RgbaImage::from_raw(w, h, buf.into_bytes())
        .context("constructing RgbaImage from raw bytes")?;
    img.save(path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn elapsed_ms(t0: Instant) -> f64 {
    t0.elapsed().as_secs_f64() * 1e3
}
