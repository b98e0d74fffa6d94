//! Intensity Mapping
//!
//! Maps a raw bin magnitude onto an 8-bit pixel intensity. Range clamping
//! happens before scaling; the optional log remap and the final `* 255 / range`
//! scale both use the configured rounding policy. Phase bits, when a color mode
//! needs them, are ORed in above the intensity afterwards.

use super::RoundingPolicy;
use crate::config::DisplayConfig;
use crate::constants::{INTENSITY_BITS, INTENSITY_MAX};

/// Magnitude → pixel intensity mapping for one display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityMapper {
    range: u32,
    log_scale: bool,
    rounding: RoundingPolicy,
    noise_floor: Option<u32>,
    phase_bits: u8,
}

impl IntensityMapper {
    /// Build a mapper from a display configuration
    pub fn new(config: &DisplayConfig) -> Self {
        IntensityMapper {
            range: config.range.max(1),
            log_scale: config.log_scale,
            rounding: config.rounding,
            noise_floor: config.noise_floor,
            phase_bits: config.color_mode.phase_bits(),
        }
    }

    /// Effective range (never below 1)
    pub fn range(&self) -> u32 {
        self.range
    }

    /// Phase bits merged by [`IntensityMapper::compose`]
    pub fn phase_bits(&self) -> u8 {
        self.phase_bits
    }

    /// Map a raw magnitude to `0..=255`
    pub fn map(&self, raw: u32) -> u8 {
        let raw = match self.noise_floor {
            Some(floor) if raw <= floor => 0,
            _ => raw,
        };
        let range = self.range as u64;
        let clamped = (raw as u64).min(range);

        let value = if self.log_scale {
            let remapped =
                ((clamped + 1) as f64).log2() / ((range + 1) as f64).log2() * range as f64;
            (self.rounding.round(remapped) as u64).min(range)
        } else {
            clamped
        };

        self.rounding
            .div_round(value * INTENSITY_MAX as u64, range)
            .min(INTENSITY_MAX as u64) as u8
    }

    /// Merge a quantized phase above the intensity bits
    pub fn compose(&self, intensity: u8, phase: u32) -> u32 {
        if self.phase_bits == 0 {
            intensity as u32
        } else {
            let mask = if self.phase_bits >= 32 {
                u32::MAX
            } else {
                (1u32 << self.phase_bits) - 1
            };
            ((phase & mask) << INTENSITY_BITS) | intensity as u32
        }
    }

    /// Map a magnitude and merge its phase in one step
    pub fn map_bin(&self, raw: u32, phase: u32) -> u32 {
        self.compose(self.map(raw), phase)
    }
}
