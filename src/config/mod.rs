//! Display Configuration
//!
//! The configuration record a host builds once per display (usually from the
//! parsed `SAMPLES`/`RANGE`/`TRACE`/... directives) and hands to the core by
//! reference. The core never edits it piecemeal: a change is a new record
//! passed through a reconfiguration call.
//!
//! [`DisplayConfig::normalized`] is the caller-side normalization step; the
//! core treats an un-normalized record as a programmer error.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DEPTH, DEFAULT_RANGE, DEFAULT_SAMPLES, HSV16_PHASE_BITS, MAX_MAGNITUDE_SHIFT,
    MAX_SAMPLES, MAX_SURFACE_EXTENT, MIN_SAMPLES,
};
use crate::spectral::RoundingPolicy;
use crate::trace::TraceFlags;
use crate::{Result, SpectroError};

/// Color interpretation of plotted values
///
/// The core only uses the mode to decide whether phase bits are needed; the
/// actual color translation belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// 8-bit luminance
    Luma8,
    /// 8-bit luminance, white base
    Luma8W,
    /// 8-bit luminance, extended palette
    #[default]
    Luma8X,
    /// 8-bit hue/brightness
    Hsv8,
    /// 8-bit hue/brightness, white base
    Hsv8W,
    /// 8-bit hue/brightness, extended palette
    Hsv8X,
    /// Phase as hue over 8-bit brightness
    Hsv16,
    /// Phase as hue over 8-bit brightness, white base
    Hsv16W,
    /// Phase as hue over 8-bit brightness, extended palette
    Hsv16X,
}

impl ColorMode {
    /// Phase bits merged above the intensity for this mode
    pub fn phase_bits(self) -> u8 {
        match self {
            ColorMode::Hsv16 | ColorMode::Hsv16W | ColorMode::Hsv16X => HSV16_PHASE_BITS,
            _ => 0,
        }
    }
}

/// Configuration record for one streaming display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Transform size N (power of two in `[4, 2048]`)
    pub sample_count: usize,
    /// First bin drawn
    pub first_bin: usize,
    /// Last bin drawn (inclusive)
    pub last_bin: usize,
    /// History lines retained on the surface
    pub depth: u32,
    /// Magnitude mapped to full intensity
    pub range: u32,
    /// Samples between spectra once the window is full (0 = N/8)
    pub rate: usize,
    /// Trace direction bits
    pub trace: TraceFlags,
    /// Pixels per logical cell along X
    pub dot_size_x: u32,
    /// Pixels per logical cell along Y
    pub dot_size_y: u32,
    /// Log-scale intensity remap
    pub log_scale: bool,
    /// Magnitude gain as a right shift of the denominator (0..=11)
    pub magnitude_shift: u8,
    /// Color interpretation of plotted values
    pub color_mode: ColorMode,
    /// Color used to clear strips exposed by scrolling
    pub background: u32,
    /// Optional explicit noise floor (off by default)
    pub noise_floor: Option<u32>,
    /// Tie-breaking for magnitude and intensity rounding
    pub rounding: RoundingPolicy,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            sample_count: DEFAULT_SAMPLES,
            first_bin: 0,
            last_bin: DEFAULT_SAMPLES / 2 - 1,
            depth: DEFAULT_DEPTH,
            range: DEFAULT_RANGE,
            rate: 0,
            trace: TraceFlags::default(),
            dot_size_x: 1,
            dot_size_y: 1,
            log_scale: false,
            magnitude_shift: 0,
            color_mode: ColorMode::default(),
            background: 0,
            noise_floor: None,
            rounding: RoundingPolicy::default(),
        }
    }
}

impl DisplayConfig {
    /// Set the transform size; also resets the bin window to all bins
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self.first_bin = 0;
        self.last_bin = (sample_count / 2).saturating_sub(1);
        self
    }

    /// Restrict drawing to bins `first..=last`
    pub fn with_bins(mut self, first: usize, last: usize) -> Self {
        self.first_bin = first;
        self.last_bin = last;
        self
    }

    /// Set the history depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the magnitude range
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    /// Set the update rate in samples (0 = N/8)
    pub fn with_rate(mut self, rate: usize) -> Self {
        self.rate = rate;
        self
    }

    /// Set the trace flags
    pub fn with_trace(mut self, trace: TraceFlags) -> Self {
        self.trace = trace;
        self
    }

    /// Set the dot size
    pub fn with_dot_size(mut self, x: u32, y: u32) -> Self {
        self.dot_size_x = x;
        self.dot_size_y = y;
        self
    }

    /// Enable or disable the log-scale remap
    pub fn with_log_scale(mut self, enabled: bool) -> Self {
        self.log_scale = enabled;
        self
    }

    /// Set the magnitude shift
    pub fn with_magnitude_shift(mut self, shift: u8) -> Self {
        self.magnitude_shift = shift;
        self
    }

    /// Set the color mode
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Set the scroll background color
    pub fn with_background(mut self, background: u32) -> Self {
        self.background = background;
        self
    }

    /// Set or clear the explicit noise floor
    pub fn with_noise_floor(mut self, floor: Option<u32>) -> Self {
        self.noise_floor = floor;
        self
    }

    /// Set the rounding policy
    pub fn with_rounding(mut self, rounding: RoundingPolicy) -> Self {
        self.rounding = rounding;
        self
    }

    /// Number of bins per spectrum, `N/2`
    pub fn bins_per_spectrum(&self) -> usize {
        self.sample_count / 2
    }

    /// Number of bins drawn per spectrum
    pub fn drawn_bins(&self) -> usize {
        self.last_bin.saturating_sub(self.first_bin) + 1
    }

    /// Samples between spectra once the window is full
    pub fn effective_rate(&self) -> usize {
        let rate = if self.rate == 0 {
            self.sample_count / 8
        } else {
            self.rate
        };
        rate.clamp(1, self.sample_count.max(1))
    }

    /// Clamp every field into its valid domain
    ///
    /// The sample count is clamped to `[4, 2048]` and rounded down to a power
    /// of two; range, depth and dot sizes become at least 1; the magnitude
    /// shift is capped at 11; the bin window is ordered and kept inside `N/2`.
    /// A window covering every bin of the requested count still covers every
    /// bin once the count is adjusted.
    pub fn normalized(mut self) -> Self {
        let requested = self.sample_count;
        let full_window =
            self.first_bin == 0 && self.last_bin == (requested / 2).saturating_sub(1);

        let clamped = requested.clamp(MIN_SAMPLES, MAX_SAMPLES);
        self.sample_count = 1 << (usize::BITS - 1 - clamped.leading_zeros());

        let last_possible = self.bins_per_spectrum() - 1;
        if full_window {
            self.last_bin = last_possible;
        } else if self.first_bin > self.last_bin {
            std::mem::swap(&mut self.first_bin, &mut self.last_bin);
        }
        self.last_bin = self.last_bin.min(last_possible);
        self.first_bin = self.first_bin.min(self.last_bin);

        self.range = self.range.max(1);
        self.depth = self.depth.max(1);
        self.dot_size_x = self.dot_size_x.max(1);
        self.dot_size_y = self.dot_size_y.max(1);
        self.magnitude_shift = self.magnitude_shift.min(MAX_MAGNITUDE_SHIFT);
        self
    }

    /// Check that the record is already normalized
    pub fn validate(&self) -> Result<()> {
        let n = self.sample_count;
        if !n.is_power_of_two() || !(MIN_SAMPLES..=MAX_SAMPLES).contains(&n) {
            return Err(SpectroError::ConfigError(format!(
                "sample count {n} is not a power of two in [{MIN_SAMPLES}, {MAX_SAMPLES}]"
            )));
        }
        if self.first_bin > self.last_bin || self.last_bin >= n / 2 {
            return Err(SpectroError::ConfigError(format!(
                "bin window {}..={} outside 0..{}",
                self.first_bin,
                self.last_bin,
                n / 2
            )));
        }
        if self.range == 0 {
            return Err(SpectroError::ConfigError("range must be positive".into()));
        }
        if self.depth == 0 {
            return Err(SpectroError::ConfigError("depth must be positive".into()));
        }
        if self.dot_size_x == 0 || self.dot_size_y == 0 {
            return Err(SpectroError::ConfigError(format!(
                "dot size {}x{} must be positive",
                self.dot_size_x, self.dot_size_y
            )));
        }
        let cells = self.drawn_bins().max(self.depth as usize) as u64;
        let dot = self.dot_size_x.max(self.dot_size_y) as u64;
        if cells * dot > MAX_SURFACE_EXTENT as u64 {
            return Err(SpectroError::ConfigError(format!(
                "{cells} cells at dot size {}x{} exceed {MAX_SURFACE_EXTENT} pixels per axis",
                self.dot_size_x, self.dot_size_y
            )));
        }
        if self.magnitude_shift > MAX_MAGNITUDE_SHIFT {
            return Err(SpectroError::ConfigError(format!(
                "magnitude shift {} exceeds {MAX_MAGNITUDE_SHIFT}",
                self.magnitude_shift
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(DisplayConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sample_count_rounds_down_and_clamps() {
        let cases = [(1, 4), (4, 4), (5, 4), (1000, 512), (1024, 1024), (100_000, 2048)];
        for (requested, expected) in cases {
            let config = DisplayConfig::default()
                .with_sample_count(requested)
                .normalized();
            assert_eq!(config.sample_count, expected, "requested {requested}");
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_undersized_request_keeps_every_bin() {
        for requested in 0..=3 {
            let config = DisplayConfig::default()
                .with_sample_count(requested)
                .normalized();
            assert_eq!(config.sample_count, 4, "requested {requested}");
            assert_eq!((config.first_bin, config.last_bin), (0, 1));
            assert_eq!(config.drawn_bins(), 2);
        }

        let config = DisplayConfig::default().with_sample_count(1000).normalized();
        assert_eq!((config.first_bin, config.last_bin), (0, 255));
    }

    #[test]
    fn test_partial_window_survives_adjustment() {
        let config = DisplayConfig::default()
            .with_sample_count(100)
            .with_bins(0, 20)
            .normalized();
        assert_eq!(config.sample_count, 64);
        assert_eq!((config.first_bin, config.last_bin), (0, 20));
    }

    #[test]
    fn test_normalize_clamps_positive_fields() {
        let config = DisplayConfig::default()
            .with_range(0)
            .with_depth(0)
            .with_dot_size(0, 0)
            .with_magnitude_shift(30)
            .normalized();
        assert_eq!(config.range, 1);
        assert_eq!(config.depth, 1);
        assert_eq!((config.dot_size_x, config.dot_size_y), (1, 1));
        assert_eq!(config.magnitude_shift, MAX_MAGNITUDE_SHIFT);
    }

    #[test]
    fn test_bin_window_is_ordered_and_bounded() {
        let config = DisplayConfig::default()
            .with_sample_count(16)
            .with_bins(12, 3)
            .normalized();
        assert_eq!((config.first_bin, config.last_bin), (3, 7));
        assert_eq!(config.drawn_bins(), 5);
    }

    #[test]
    fn test_validate_reports_violations() {
        let mut config = DisplayConfig::default();
        config.sample_count = 48;
        assert!(matches!(config.validate(), Err(SpectroError::ConfigError(_))));

        let config = DisplayConfig::default().with_range(0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("range"));

        let config = DisplayConfig::default().with_dot_size(2, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_pixel_extent() {
        let config = DisplayConfig::default()
            .with_depth(1 << 20)
            .with_dot_size(1024, 1);
        assert!(config.validate().is_ok());

        let config = DisplayConfig::default()
            .with_depth(1 << 20)
            .with_dot_size(1, 4096);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pixels per axis"));

        let config = DisplayConfig::default().with_depth(u32::MAX);
        assert!(config.validate().is_err());

        let config = DisplayConfig::default().with_dot_size(u32::MAX, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_rate() {
        let config = DisplayConfig::default().with_sample_count(64);
        assert_eq!(config.effective_rate(), 8);
        assert_eq!(config.with_rate(1000).effective_rate(), 64);
        assert_eq!(config.with_rate(3).effective_rate(), 3);
        assert_eq!(
            DisplayConfig::default().with_sample_count(4).effective_rate(),
            1
        );
    }

    #[test]
    fn test_hsv16_requests_phase_bits() {
        assert_eq!(ColorMode::Hsv16X.phase_bits(), 8);
        assert_eq!(ColorMode::Hsv8.phase_bits(), 0);
        assert_eq!(ColorMode::Luma8X.phase_bits(), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "sample_count": 64,
            "last_bin": 31,
            "range": 100,
            "rounding": "half_away_from_zero"
        }"#;
        let config: DisplayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.sample_count, 64);
        assert_eq!(config.range, 100);
        assert_eq!(config.rounding, RoundingPolicy::HalfAwayFromZero);
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.trace, TraceFlags::HORIZONTAL);
        assert!(config.validate().is_ok());
    }
}
