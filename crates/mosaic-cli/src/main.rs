//! mosaic - headless mosaic driver
//!
//! Builds a mosaic from image files on an offscreen canvas, replays a pan
//! script through the same input path a host would use, and writes the
//! final frame as PNG.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use mosaic_engine::canvas::CanvasElement;
use mosaic_engine::media::ImageSource;
use mosaic_engine::{Mosaic, MosaicConfig, MosaicError, StrategyKind, TileStyle};
use tracing_subscriber::EnvFilter;

mod script;

use script::Step;

#[derive(Parser)]
#[command(name = "mosaic")]
#[command(author, version, about = "Render a pannable image mosaic to PNG")]
#[command(long_about = "
Lays out the given images as an endless mosaic, replays the scripted input
and saves what the canvas shows afterwards.

Examples:
  mosaic a.png b.jpg -o out.png
  mosaic *.png --item-width 160 --item-height 120 --gap 8 --radius 12 -o out.png
  mosaic *.png --strategy wrap --redundancy 2 --step pan:-75,0 --step wheel:240 -o out.png
  mosaic *.png --step drag:400,300,250,120 --step resize:1024x768 -o out.png
  mosaic *.png --step ratio:2 --step pan:0,-40 -o retina.png
")]
struct Cli {
    /// Input images, repeated cyclically across cells
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output PNG
    #[arg(short, long, default_value = "mosaic.png")]
    output: PathBuf,

    /// Canvas width (CSS pixels)
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Canvas height (CSS pixels)
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Cell width
    #[arg(long, default_value_t = mosaic_engine::DEFAULT_ITEM_SIZE)]
    item_width: f32,

    /// Cell height
    #[arg(long, default_value_t = mosaic_engine::DEFAULT_ITEM_SIZE)]
    item_height: f32,

    /// Spacing between cells
    #[arg(long, default_value_t = mosaic_engine::DEFAULT_GAP)]
    gap: f32,

    /// Corner radius (0 = square)
    #[arg(long, default_value_t = 0.0)]
    radius: f32,

    /// Recycling strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Patch)]
    strategy: StrategyArg,

    /// Border cells kept around the viewport (wrap strategy)
    #[arg(long, default_value_t = 1)]
    redundancy: usize,

    /// Lock horizontal panning
    #[arg(long)]
    lock_x: bool,

    /// Lock vertical panning
    #[arg(long)]
    lock_y: bool,

    /// Scripted input: pan:DX,DY | drag:X0,Y0,X1,Y1 | wheel:DY | resize:WxH | ratio:R
    #[arg(long = "step")]
    steps: Vec<Step>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Patch,
    Wrap,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Patch => StrategyKind::Patch,
            StrategyArg::Wrap => StrategyKind::Wrap,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let canvas = CanvasElement::new(cli.width, cli.height)
        .and_then(|c| c.with_pixel_ratio(cli.pixel_ratio))
        .context("invalid canvas size")?;

    let style = TileStyle::new(cli.item_width, cli.item_height)
        .with_gap(cli.gap)
        .with_radius(cli.radius);
    let config = MosaicConfig::new(cli.inputs.iter().cloned().map(ImageSource::from))
        .with_style(style)
        .with_strategy(cli.strategy.into())
        .with_redundancy(cli.redundancy)
        .with_axis_locks(cli.lock_x, cli.lock_y)
        .on_ready(|mosaic| {
            tracing::info!(
                "First frame: {} tiles in {}x{} cells",
                mosaic.tile_count(),
                mosaic.column_capacity(),
                mosaic.row_capacity()
            );
        });

    let mut mosaic = Mosaic::new(canvas, config)?;

    for step in &cli.steps {
        run_step(&mut mosaic, step).with_context(|| format!("step {step:?} failed"))?;
    }

    let Some(pixmap) = mosaic.canvas().context_2d_ref().and_then(|ctx| ctx.pixmap()) else {
        bail!("canvas has no drawable backing store");
    };
    pixmap
        .save_png(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    tracing::info!(
        "Wrote {} ({}x{} px, {} tiles drawn)",
        cli.output.display(),
        pixmap.width(),
        pixmap.height(),
        mosaic.last_stats().drawn
    );

    mosaic.destroy();
    Ok(())
}

fn run_step(mosaic: &mut Mosaic, step: &Step) -> Result<(), MosaicError> {
    tracing::debug!("Step {:?}", step);
    match *step {
        Step::Pan { dx, dy } => return mosaic.pan(dx, dy),
        Step::PixelRatio { ratio } => return mosaic.observe_pixel_ratio(ratio),
        _ => {}
    }
    for event in step.events() {
        mosaic.handle_event(event)?;
    }
    Ok(())
}
