use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{ Parser, ValueEnum };
use log::{ error, info, LevelFilter };

use whitted::consts::OUT_FILE;
use whitted::description;
use whitted::parallel::{ Pixel, PreviewSink, RenderConfig, TraceOrder };

#[derive(Copy, Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Order {
    Linear,
    Progressive,
}

impl From<Order> for TraceOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Linear => TraceOrder::Linear,
            Order::Progressive => TraceOrder::Progressive,
        }
    }
}

/// Renders a JSON scene description with a Whitted ray tracer.
#[derive(Parser, Debug)]
#[clap(name = "whitted", version, about)]
struct Args {
    /// Scene description (JSON)
    #[clap(value_parser)]
    scene: PathBuf,

    /// Output image (plain PPM)
    #[clap(short, long, value_parser, default_value = OUT_FILE)]
    output: PathBuf,

    /// Order in which pixels are traced
    #[clap(long, value_enum, default_value = "progressive")]
    order: Order,

    /// Number of trace workers (defaults to a quarter of the hardware threads)
    #[clap(short, long, value_parser)]
    workers: Option<usize>,

    /// Logging level
    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Logs the shading of one pixel, given as X,Y (needs --log-level trace)
    #[clap(long, value_parser = parse_pixel)]
    debug_pixel: Option<(usize, usize)>,
}

fn parse_pixel(s: &str) -> Result<(usize, usize), String> {
    let (x, y) = s.split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let coord = |c: &str| c.trim().parse::<usize>().map_err(|e| e.to_string());

    Ok((coord(x)?, coord(y)?))
}

/// Logs render progress every tenth of the image.
struct ProgressLog {
    total: usize,
    drawn: usize,
    next: usize,
    start: Instant,
}

impl ProgressLog {
    fn new(total: usize) -> ProgressLog {
        ProgressLog { total: total.max(1), drawn: 0, next: 10, start: Instant::now() }
    }
}

impl PreviewSink for ProgressLog {
    fn draw_pixels(&mut self, pixels: &[Pixel]) {
        self.drawn += pixels.len();

        let percent = self.drawn * 100 / self.total;
        if percent >= self.next {
            info!("{:>3}% ({:.1}s)", percent, self.start.elapsed().as_secs_f64());
            self.next = percent / 10 * 10 + 10;
        }
    }

    fn end_render(&mut self) {
        info!("render complete");
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut scene = description::load(&args.scene)?;
    if args.debug_pixel.is_some() {
        scene.config.debug_pixel = args.debug_pixel;
    }

    let config = RenderConfig {
        workers: args.workers,
        order: args.order.into(),
        ..Default::default()
    };

    let mut progress = ProgressLog::new(scene.camera.width * scene.camera.height);
    scene.raytrace_with(&config, &mut progress)?;

    scene.camera.canvas.save(&args.output)?;
    info!("saved render to {}", args.output.display());

    Ok(())
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
