//! Streaming Displays
//!
//! A [`StreamingDisplay`] ties one [`IntensityProducer`] strategy to the shared
//! trace processor and pixel adapter. Each draw cycle runs to completion:
//! samples go in, every value of a ready line advances the logical cursor and
//! only then is handed to the renderer, so a slow or failing renderer never
//! desynchronizes the cursor from the data stream.

pub mod producer;

pub use producer::{IntensityProducer, SampleProducer, SpectralProducer};

use tracing::{debug, trace, warn};

use crate::config::DisplayConfig;
use crate::render::{ColorTranslator, PixelPlotAdapter, RenderError, RenderSurface};
use crate::trace::{TraceFlags, TraceGeometry, TracePatternProcessor};
use crate::Result;

/// One live display: producer strategy + cursor + pixel adapter
pub struct StreamingDisplay<P, C> {
    config: DisplayConfig,
    producer: P,
    processor: TracePatternProcessor,
    adapter: PixelPlotAdapter<C>,
    lines_drawn: u64,
}

impl<P: IntensityProducer, C: ColorTranslator> StreamingDisplay<P, C> {
    /// Create a display from a normalized configuration
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`DisplayConfig::validate`].
    pub fn new(config: DisplayConfig, mut producer: P, translator: C) -> Self {
        assert_valid(&config);
        producer.reconfigure(&config);
        let adapter = PixelPlotAdapter::new(&config, translator);
        let mut display = StreamingDisplay {
            config,
            producer,
            processor: TracePatternProcessor::new(config.trace),
            adapter,
            lines_drawn: 0,
        };
        display.size_surface();
        display
    }

    /// Current configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Producer strategy
    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Logical cursor state
    pub fn processor(&self) -> &TracePatternProcessor {
        &self.processor
    }

    /// Pixel adapter
    pub fn adapter(&self) -> &PixelPlotAdapter<C> {
        &self.adapter
    }

    /// Lines drawn since the last reconfiguration
    pub fn lines_drawn(&self) -> u64 {
        self.lines_drawn
    }

    /// Logical surface dimensions
    pub fn geometry(&self) -> TraceGeometry {
        TraceGeometry::for_display(
            self.producer.line_length(),
            self.config.depth,
            self.config.trace,
        )
    }

    /// Pixel surface dimensions the host must allocate
    pub fn surface_size(&self) -> (u32, u32) {
        self.adapter.surface_size(self.geometry())
    }

    /// Feed a block of samples, drawing every line that becomes ready
    ///
    /// Short or empty blocks are fine; they just delay the next line. Every
    /// sample is consumed even if the renderer fails part-way, and the first
    /// renderer error is returned after the block is done.
    pub fn feed<S: RenderSurface + ?Sized>(
        &mut self,
        samples: &[i32],
        surface: &mut S,
    ) -> Result<usize> {
        let mut drawn = 0;
        let mut first_error: Option<RenderError> = None;

        for &sample in samples {
            if !self.producer.push(sample) {
                continue;
            }
            let outcome = draw_line(
                &mut self.processor,
                &self.adapter,
                self.producer.values(),
                surface,
            );
            drawn += 1;
            self.lines_drawn += 1;
            if let Err(err) = outcome {
                warn!(%err, line = self.lines_drawn, "renderer failed during draw cycle");
                first_error.get_or_insert(err);
            }
        }

        trace!(samples = samples.len(), drawn, "feed complete");
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(drawn),
        }
    }

    /// Apply a new configuration
    ///
    /// Discards any partial sample window, rebuilds transform tables when the
    /// sample count changed, and resets the cursor to the start corner.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`DisplayConfig::validate`].
    pub fn reconfigure(&mut self, config: DisplayConfig) {
        assert_valid(&config);
        self.config = config;
        self.producer.reconfigure(&config);
        self.adapter.reconfigure(&config);
        self.processor.set_flags(config.trace);
        self.lines_drawn = 0;
        self.size_surface();
        debug!(
            sample_count = config.sample_count,
            pattern = config.trace.pattern(),
            "display reconfigured"
        );
    }

    /// Change the transform size (bin window resets to all bins)
    ///
    /// Out-of-range values are normalized like any other setter here.
    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.reconfigure(self.config.with_sample_count(sample_count).normalized());
    }

    /// Change the magnitude range
    pub fn set_range(&mut self, range: u32) {
        self.reconfigure(self.config.with_range(range).normalized());
    }

    /// Change the trace direction
    pub fn set_trace(&mut self, trace: TraceFlags) {
        self.reconfigure(self.config.with_trace(trace).normalized());
    }

    /// Change the dot size
    pub fn set_dot_size(&mut self, x: u32, y: u32) {
        self.reconfigure(self.config.with_dot_size(x, y).normalized());
    }

    /// Toggle the log-scale remap
    pub fn set_log_scale(&mut self, enabled: bool) {
        self.reconfigure(self.config.with_log_scale(enabled).normalized());
    }

    /// Drop accumulated samples and restart the cursor at the start corner
    pub fn reset(&mut self) {
        self.producer.reset();
        self.processor.reset();
        self.lines_drawn = 0;
        self.size_surface();
    }

    fn size_surface(&mut self) {
        let geometry = self.geometry();
        let (width, height) = self.adapter.surface_size(geometry);
        trace!(width, height, "surface sized");
        self.processor.set_geometry(geometry.width, geometry.height);
    }
}

fn assert_valid(config: &DisplayConfig) {
    if let Err(err) = config.validate() {
        panic!("display configuration must be normalized by the caller: {err}");
    }
}

/// Step the cursor once per value and hand each cell to the adapter
///
/// The cursor advances for every value regardless of renderer failures.
fn draw_line<C: ColorTranslator, S: RenderSurface + ?Sized>(
    processor: &mut TracePatternProcessor,
    adapter: &PixelPlotAdapter<C>,
    values: &[u32],
    surface: &mut S,
) -> std::result::Result<(), RenderError> {
    let mut first_error = None;
    for &value in values {
        let Some(step) = processor.step() else {
            break;
        };
        if let Err(err) = adapter.apply(surface, &step, value) {
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
