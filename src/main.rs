//! Spectro Demo
//!
//! Renders a synthetic chirp as an ASCII waterfall in the terminal.
//!
//! The pipeline runs on a worker thread and records pixel operations into a
//! render queue; the main thread replays them onto a bitmap and prints it.

use std::env;
use std::sync::OnceLock;
use std::thread;

use anyhow::{bail, Context};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use debug_spectro::config::{ColorMode, DisplayConfig};
use debug_spectro::display::{SpectralProducer, StreamingDisplay};
use debug_spectro::render::{BitmapSurface, QueuedSurface};
use debug_spectro::trace::TraceFlags;

const SHADES: &[u8] = b" .:-=+*#%@";
const CHUNK: usize = 64;
const AMPLITUDE: f64 = 2000.0;

static TELEMETRY_INIT: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    TELEMETRY_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("debug_spectro=info,spectro_demo=info"))
            .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::INFO.into()));

        if let Err(err) = fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .try_init()
        {
            eprintln!("[telemetry] failed to initialise tracing subscriber: {err}");
        }
    });
}

struct Options {
    config: DisplayConfig,
    lines: usize,
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.with_context(|| format!("{flag} requires an argument"))?;
    value
        .parse()
        .with_context(|| format!("invalid value for {flag}: {value}"))
}

const USAGE: &str = "\
Usage:
  spectro-demo [options]

Options:
  --samples <n>     Transform size, power of two in 4..=2048 (default 64)
  --depth <n>       Lines kept on screen (default 24)
  --range <n>       Magnitude mapped to full intensity (default 1000)
  --rate <n>        Samples between lines, 0 = N/8 (default 0)
  --trace <code>    Trace pattern 0..15 (default 0)
  --dot <w>x<h>     Dot size in pixels (default 1x1)
  --lines <n>       Lines to render (default 48)
  --log             Enable log-scale intensity
  -h, --help        Show this help
";

fn usage() {
    eprintln!("{USAGE}");
}

fn parse_args() -> anyhow::Result<Option<Options>> {
    let mut config = DisplayConfig::default()
        .with_sample_count(64)
        .with_depth(24)
        .with_range(1000);
    let mut lines = 48;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--samples" => {
                config = config.with_sample_count(parse_number("--samples", args.next())?)
            }
            "--depth" => config = config.with_depth(parse_number("--depth", args.next())?),
            "--range" => config = config.with_range(parse_number("--range", args.next())?),
            "--rate" => config = config.with_rate(parse_number("--rate", args.next())?),
            "--trace" => {
                let code: u8 = parse_number("--trace", args.next())?;
                if code > 15 {
                    bail!("trace pattern must be in 0..=15, got {code}");
                }
                config = config.with_trace(TraceFlags::from_pattern(code));
            }
            "--dot" => {
                let value = args.next().context("--dot requires an argument")?;
                let (x, y) = value
                    .split_once('x')
                    .with_context(|| format!("dot size must look like 2x2, got {value}"))?;
                config = config.with_dot_size(
                    parse_number("--dot", Some(x.to_string()))?,
                    parse_number("--dot", Some(y.to_string()))?,
                );
            }
            "--lines" => lines = parse_number("--lines", args.next())?,
            "--log" => config = config.with_log_scale(true),
            "--help" | "-h" => {
                usage();
                return Ok(None);
            }
            _ => {
                usage();
                bail!("unknown argument: {arg}");
            }
        }
    }

    let normalized = config.normalized();
    if normalized.sample_count != config.sample_count {
        warn!(
            requested = config.sample_count,
            used = normalized.sample_count,
            "sample count adjusted"
        );
    }
    Ok(Some(Options {
        config: normalized,
        lines,
    }))
}

/// Linear chirp sweeping from DC to just below Nyquist
fn chirp(total: usize) -> Vec<i32> {
    let mut phase = 0.0f64;
    (0..total)
        .map(|i| {
            let frequency = 0.5 * i as f64 / total as f64;
            phase += std::f64::consts::TAU * frequency;
            (AMPLITUDE * phase.sin()).round() as i32
        })
        .collect()
}

fn shade(pixel: u32) -> char {
    let intensity = (pixel & 0xFF) as usize;
    SHADES[intensity * (SHADES.len() - 1) / 255] as char
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let Some(Options { config, lines }) = parse_args()? else {
        return Ok(());
    };

    let producer = SpectralProducer::new(&config);
    let translate = |value: u32, _mode: ColorMode| value & 0xFF;
    let mut display = StreamingDisplay::new(config, producer, translate);
    let (width, height) = display.surface_size();
    info!(
        width,
        height,
        sample_count = config.sample_count,
        pattern = config.trace.pattern(),
        "rendering chirp"
    );

    let total = config.sample_count + lines.saturating_sub(1) * config.effective_rate();
    let samples = chirp(total);

    let mut queued = QueuedSurface::new();
    let queue = queued.handle();
    let worker = thread::spawn(move || -> anyhow::Result<usize> {
        let mut drawn = 0;
        for block in samples.chunks(CHUNK) {
            drawn += display.feed(block, &mut queued)?;
        }
        Ok(drawn)
    });

    let drawn = match worker.join() {
        Ok(result) => result?,
        Err(_) => bail!("render worker panicked"),
    };

    let mut bitmap = BitmapSurface::new(width, height, config.background);
    let applied = queue
        .drain_into(&mut bitmap)
        .context("replaying render queue")?;
    info!(lines = drawn, commands = applied, "render complete");

    for y in 0..bitmap.height() {
        let row: String = (0..bitmap.width())
            .filter_map(|x| bitmap.pixel(x, y))
            .map(shade)
            .collect();
        println!("{row}");
    }
    Ok(())
}
