//! Real-Time Spectral Visualization Core
//!
//! Built for microcontroller debug terminals. Turns raw signed samples streamed
//! from a debug link into pixels on a waterfall/spectrum surface with bit-exact
//! fixed-point arithmetic on every platform. The cursor/scroll state machine
//! used here is shared by every streaming display family, not just spectral
//! ones.
//!
//! # Pipeline
//! - [`spectral::SampleBuffer`]: ring of the most recent N samples
//! - [`spectral::SpectralTransform`]: Hann window + radix-2 fixed-point transform
//! - [`spectral::IntensityMapper`]: magnitude → 8-bit intensity (range, log, clamp)
//! - [`trace::TracePatternProcessor`]: logical cursor, wrap and scroll decisions
//! - [`render::PixelPlotAdapter`]: logical cells → pixel rectangles
//!
//! Logical coordinates (bins × depth) never carry dot size; only the adapter
//! multiplies by it.
//!
//! # Quick start
//! ```no_run
//! use debug_spectro::config::{ColorMode, DisplayConfig};
//! use debug_spectro::display::{SpectralProducer, StreamingDisplay};
//! use debug_spectro::render::BitmapSurface;
//!
//! let config = DisplayConfig::default()
//!     .with_sample_count(256)
//!     .with_range(1000)
//!     .with_dot_size(2, 2)
//!     .normalized();
//! let producer = SpectralProducer::new(&config);
//! let translate = |value: u32, _mode: ColorMode| value & 0xFF;
//! let mut display = StreamingDisplay::new(config, producer, translate);
//!
//! let (width, height) = display.surface_size();
//! let mut surface = BitmapSurface::new(width, height, 0);
//! let samples: Vec<i32> = (0..1024).map(|i| ((i % 16) as i32 - 8) * 100).collect();
//! display.feed(&samples, &mut surface).unwrap();
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod constants; // Fixed-point scales and limits
pub mod display; // Producer strategies + draw cycle
pub mod render; // Pixel space: adapter, surfaces, render queue
pub mod spectral; // Sample ring, transform, intensity mapping
pub mod trace; // Logical cursor state machine

use render::RenderError;

/// Error types for the visualization core
#[derive(thiserror::Error, Debug)]
pub enum SpectroError {
    /// Invalid configuration (reported by caller-side validation)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A renderer call failed during a draw cycle
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for SpectroError {
    /// Converts a String into `SpectroError::Other`.
    ///
    /// Prefer `SpectroError::ConfigError(msg)` when the failure is about the
    /// display configuration, so callers can tell the two apart.
    fn from(msg: String) -> Self {
        SpectroError::Other(msg)
    }
}

impl From<&str> for SpectroError {
    /// Converts a string slice into `SpectroError::Other`.
    fn from(msg: &str) -> Self {
        SpectroError::Other(msg.to_string())
    }
}

/// Result type for visualization operations
pub type Result<T> = std::result::Result<T, SpectroError>;

// Public API exports
pub use config::{ColorMode, DisplayConfig};
pub use display::{IntensityProducer, SampleProducer, SpectralProducer, StreamingDisplay};
pub use render::{
    BitmapSurface, ColorTranslator, PixelPlotAdapter, PixelRect, QueuedSurface, RenderCommand,
    RenderQueue, RenderSurface,
};
pub use spectral::{IntensityMapper, RoundingPolicy, SampleBuffer, SpectralTransform, Spectrum};
pub use trace::{
    LogicalDelta, LogicalPos, TraceFlags, TraceGeometry, TracePatternProcessor, TraceState,
    TraceStep,
};
