//! Intensity Producers
//!
//! The per-display-type half of the pipeline. A producer turns incoming
//! samples into lines of plot values; the shared cursor and pixel adapter do
//! the rest.

use tracing::{debug, trace};

use crate::config::DisplayConfig;
use crate::spectral::{IntensityMapper, SampleBuffer, SpectralTransform, Spectrum};

/// Strategy producing plot values for a streaming display
pub trait IntensityProducer {
    /// Values per line (cells along the primary axis)
    fn line_length(&self) -> u32;

    /// Consume one sample; returns true when a new line is ready in [`values`]
    ///
    /// [`values`]: IntensityProducer::values
    fn push(&mut self, sample: i32) -> bool;

    /// The most recent line of plot values (intensity plus phase bits)
    fn values(&self) -> &[u32];

    /// Adopt a new configuration, discarding any partial state
    fn reconfigure(&mut self, config: &DisplayConfig);

    /// Discard accumulated samples
    fn reset(&mut self);
}

/// Sample window → spectrum → per-bin intensities
#[derive(Debug, Clone)]
pub struct SpectralProducer {
    buffer: SampleBuffer,
    transform: SpectralTransform,
    mapper: IntensityMapper,
    window: Vec<i32>,
    spectrum: Spectrum,
    values: Vec<u32>,
    first_bin: usize,
    last_bin: usize,
    rate: usize,
    since_draw: usize,
}

impl SpectralProducer {
    /// Create a producer sized to `config`
    pub fn new(config: &DisplayConfig) -> Self {
        let mut producer = SpectralProducer {
            buffer: SampleBuffer::new(config.sample_count),
            transform: SpectralTransform::new(config.sample_count),
            mapper: IntensityMapper::new(config),
            window: Vec::new(),
            spectrum: Spectrum::default(),
            values: Vec::new(),
            first_bin: 0,
            last_bin: 0,
            rate: 1,
            since_draw: 0,
        };
        producer.reconfigure(config);
        producer
    }

    /// Sample ring feeding the transform
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// Full spectrum of the last completed window
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    /// Transform size N
    pub fn sample_count(&self) -> usize {
        self.transform.sample_count()
    }

    fn draw(&mut self) {
        self.buffer.snapshot_into(&mut self.window);
        self.transform.transform_into(&self.window, &mut self.spectrum);

        self.values.clear();
        for bin in self.first_bin..=self.last_bin {
            let phase = self.spectrum.phases.get(bin).copied().unwrap_or(0);
            let magnitude = self.spectrum.magnitudes[bin];
            self.values.push(self.mapper.map_bin(magnitude, phase));
        }
        trace!(bins = self.values.len(), "spectrum ready");
    }
}

impl IntensityProducer for SpectralProducer {
    fn line_length(&self) -> u32 {
        (self.last_bin - self.first_bin + 1) as u32
    }

    fn push(&mut self, sample: i32) -> bool {
        self.buffer.push(sample);
        self.since_draw += 1;
        if self.buffer.is_window_full() && self.since_draw >= self.rate {
            self.since_draw = 0;
            self.draw();
            true
        } else {
            false
        }
    }

    fn values(&self) -> &[u32] {
        &self.values
    }

    fn reconfigure(&mut self, config: &DisplayConfig) {
        let sample_count = config.sample_count;
        if sample_count != self.transform.sample_count() {
            self.transform.prepare(sample_count);
            self.buffer = SampleBuffer::new(sample_count);
        }
        self.transform.set_magnitude_shift(config.magnitude_shift);
        self.transform.set_rounding(config.rounding);
        self.transform.set_phase_bits(config.color_mode.phase_bits());
        self.mapper = IntensityMapper::new(config);
        self.window = vec![0; sample_count];

        assert!(
            config.first_bin <= config.last_bin && config.last_bin < sample_count / 2,
            "bin window {}..={} outside spectrum of {} bins",
            config.first_bin,
            config.last_bin,
            sample_count / 2
        );
        self.first_bin = config.first_bin;
        self.last_bin = config.last_bin;
        self.rate = config.effective_rate();
        self.reset();

        debug!(
            sample_count,
            first_bin = self.first_bin,
            last_bin = self.last_bin,
            rate = self.rate,
            "spectral producer configured"
        );
    }

    fn reset(&mut self) {
        self.buffer.reset();
        self.since_draw = 0;
        self.values.clear();
        self.spectrum.magnitudes.clear();
        self.spectrum.phases.clear();
    }
}

/// One sample → one cell, for bitmap and strip-chart style displays
///
/// Negative samples map to zero intensity.
#[derive(Debug, Clone)]
pub struct SampleProducer {
    mapper: IntensityMapper,
    line_length: u32,
    values: [u32; 1],
}

impl SampleProducer {
    /// Create a producer with `line_length` cells per line
    ///
    /// # Panics
    ///
    /// Panics if `line_length` is zero.
    pub fn new(config: &DisplayConfig, line_length: u32) -> Self {
        assert!(line_length >= 1, "line length must be positive");
        SampleProducer {
            mapper: IntensityMapper::new(config),
            line_length,
            values: [0],
        }
    }
}

impl IntensityProducer for SampleProducer {
    fn line_length(&self) -> u32 {
        self.line_length
    }

    fn push(&mut self, sample: i32) -> bool {
        let raw = sample.max(0) as u32;
        self.values[0] = self.mapper.map_bin(raw, 0);
        true
    }

    fn values(&self) -> &[u32] {
        &self.values
    }

    fn reconfigure(&mut self, config: &DisplayConfig) {
        self.mapper = IntensityMapper::new(config);
        self.reset();
    }

    fn reset(&mut self) {
        self.values = [0];
    }
}
