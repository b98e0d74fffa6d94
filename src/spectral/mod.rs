//! Spectral Producer Components
//!
//! Everything between raw samples and per-bin intensities:
//! - [`SampleBuffer`]: ring of the most recent N samples
//! - [`SpectralTransform`]: windowed fixed-point transform
//! - [`IntensityMapper`]: magnitude → 8-bit intensity
//! - [`RoundingPolicy`]: tie-breaking shared by the transform and the mapper

pub mod buffer;
pub mod intensity;
pub mod rounding;
pub mod transform;

pub use buffer::SampleBuffer;
pub use intensity::IntensityMapper;
pub use rounding::RoundingPolicy;
pub use transform::{SpectralTransform, Spectrum};
