//! Fixed-Point Spectral Transform
//!
//! Integer radix-2 transform:
//!
//! - Hann window scaled by `0x1000` (`(1 - cos(2πi/N)) * 0x1000`)
//! - twiddles scaled by `0x1000`, stored in bit-reversed order
//! - butterflies multiply in 128-bit and truncate toward zero on `/ 0x1000`
//! - natural-order input, bit-reversed output
//! - magnitude `round(hypot(re, im) / (0x800 << log2(N) >> shift))`
//!
//! Table coefficients are rounded ties-to-even so they come out identical on
//! every platform.

use std::f64::consts::PI;

use tracing::debug;

use super::RoundingPolicy;
use crate::constants::{FIXED_ONE, MAGNITUDE_BASE, MAX_MAGNITUDE_SHIFT, MAX_SAMPLES, MIN_SAMPLES};

/// Per-bin output of one transform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spectrum {
    /// Bin magnitudes, `N/2` entries
    pub magnitudes: Vec<u32>,
    /// Quantized bin phases, empty unless phase bits are enabled
    pub phases: Vec<u32>,
}

/// Windowed fixed-point transform sized to one sample count
#[derive(Clone)]
pub struct SpectralTransform {
    /// log2(N)
    exponent: u32,
    window: Vec<i64>,
    /// Twiddle cosines, bit-reversed order, `N/2` entries
    cos: Vec<i64>,
    /// Twiddle sines (forward sign), bit-reversed order
    sin: Vec<i64>,
    real: Vec<i64>,
    imag: Vec<i64>,
    magnitude_shift: u8,
    phase_bits: u8,
    rounding: RoundingPolicy,
}

impl SpectralTransform {
    /// Create a transform with tables for `sample_count`
    ///
    /// # Panics
    ///
    /// See [`SpectralTransform::prepare`].
    pub fn new(sample_count: usize) -> Self {
        let mut transform = SpectralTransform {
            exponent: 0,
            window: Vec::new(),
            cos: Vec::new(),
            sin: Vec::new(),
            real: Vec::new(),
            imag: Vec::new(),
            magnitude_shift: 0,
            phase_bits: 0,
            rounding: RoundingPolicy::default(),
        };
        transform.prepare(sample_count);
        transform
    }

    /// Rebuild window and twiddle tables for `sample_count`
    ///
    /// # Panics
    ///
    /// Panics unless `sample_count` is a power of two in `[4, 2048]`.
    pub fn prepare(&mut self, sample_count: usize) {
        assert!(
            sample_count.is_power_of_two() && (MIN_SAMPLES..=MAX_SAMPLES).contains(&sample_count),
            "sample count {sample_count} is not a power of two in [{MIN_SAMPLES}, {MAX_SAMPLES}]"
        );

        let exponent = sample_count.trailing_zeros();
        let n = sample_count as f64;
        let fixed_one = FIXED_ONE as f64;
        let table_round = |value: f64| value.round_ties_even() as i64;

        self.window = (0..sample_count)
            .map(|i| table_round((1.0 - (i as f64 / n * PI * 2.0).cos()) * fixed_one))
            .collect();

        let half = sample_count / 2;
        self.cos = Vec::with_capacity(half);
        self.sin = Vec::with_capacity(half);
        for i in 0..half {
            let theta = reverse_bits(i, exponent) as f64 * PI / n;
            self.cos.push(table_round(theta.cos() * fixed_one));
            self.sin.push(table_round(-theta.sin() * fixed_one));
        }

        self.real = vec![0; sample_count];
        self.imag = vec![0; sample_count];
        self.exponent = exponent;

        debug!(sample_count, exponent, "spectral tables prepared");
    }

    /// Transform size N
    pub fn sample_count(&self) -> usize {
        1 << self.exponent
    }

    /// Number of output bins, `N/2`
    pub fn bin_count(&self) -> usize {
        self.sample_count() / 2
    }

    /// Set the magnitude shift (clamped to `0..=11`)
    pub fn set_magnitude_shift(&mut self, shift: u8) {
        self.magnitude_shift = shift.min(MAX_MAGNITUDE_SHIFT);
    }

    /// Set the number of phase bits to produce (0 disables phase, max 32)
    pub fn set_phase_bits(&mut self, bits: u8) {
        self.phase_bits = bits.min(32);
    }

    /// Set the rounding policy for magnitudes and phases
    pub fn set_rounding(&mut self, rounding: RoundingPolicy) {
        self.rounding = rounding;
    }

    /// Rounding policy in use
    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Magnitude denominator, `0x800 << log2(N) >> shift`
    pub fn denominator(&self) -> i64 {
        (MAGNITUDE_BASE << self.exponent) >> self.magnitude_shift
    }

    /// Transform a block and return `N/2` bin magnitudes
    pub fn transform(&mut self, samples: &[i32]) -> Vec<u32> {
        let mut spectrum = Spectrum::default();
        self.transform_into(samples, &mut spectrum);
        spectrum.magnitudes
    }

    /// Transform a block into a caller-provided spectrum (no allocation once sized)
    ///
    /// # Panics
    ///
    /// Panics if `samples.len()` differs from the prepared sample count.
    pub fn transform_into(&mut self, samples: &[i32], spectrum: &mut Spectrum) {
        let n = self.sample_count();
        assert_eq!(samples.len(), n, "transform expects exactly {n} samples");

        for (i, &sample) in samples.iter().enumerate() {
            self.real[i] = sample as i64 * self.window[i];
            self.imag[i] = 0;
        }

        self.butterflies();

        let bins = self.bin_count();
        spectrum.magnitudes.clear();
        spectrum.phases.clear();
        for k in 0..bins {
            let slot = reverse_bits(k, self.exponent);
            let (re, im) = (self.real[slot], self.imag[slot]);
            spectrum.magnitudes.push(self.bin_magnitude(re, im));
            if self.phase_bits > 0 {
                spectrum.phases.push(self.bin_phase(re, im));
            }
        }
    }

    /// Scaled, rounded magnitude of one complex bin
    pub fn bin_magnitude(&self, re: i64, im: i64) -> u32 {
        let magnitude = (re as f64).hypot(im as f64) / self.denominator() as f64;
        self.rounding.round_u32(magnitude)
    }

    /// Bin angle as a 32-bit turn, truncated to the configured phase bits
    pub fn bin_phase(&self, re: i64, im: i64) -> u32 {
        let turn = (im as f64).atan2(re as f64) / (PI * 2.0) * 4_294_967_296.0;
        let angle = (self.rounding.round(turn) as i64 & 0xFFFF_FFFF) as u32;
        if self.phase_bits == 0 {
            0
        } else {
            ((angle as u64) >> (32 - self.phase_bits as u32)) as u32
        }
    }

    fn butterflies(&mut self) {
        let n = self.sample_count();
        let scale = FIXED_ONE as i128;
        let mut half = n >> 1;
        let mut groups = 1;

        while half != 0 {
            for group in 0..groups {
                let cos = self.cos[group] as i128;
                let sin = self.sin[group] as i128;
                let base = group * (half << 1);

                for a in base..base + half {
                    let b = a + half;
                    let bx = self.real[b] as i128;
                    let by = self.imag[b] as i128;
                    let rx = ((bx * cos - by * sin) / scale) as i64;
                    let ry = ((bx * sin + by * cos) / scale) as i64;
                    let ax = self.real[a];
                    let ay = self.imag[a];
                    self.real[a] = ax + rx;
                    self.imag[a] = ay + ry;
                    self.real[b] = ax - rx;
                    self.imag[b] = ay - ry;
                }
            }
            half >>= 1;
            groups <<= 1;
        }
    }
}

impl std::fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("sample_count", &self.sample_count())
            .field("magnitude_shift", &self.magnitude_shift)
            .field("phase_bits", &self.phase_bits)
            .field("rounding", &self.rounding)
            .finish_non_exhaustive()
    }
}

#[inline]
fn reverse_bits(value: usize, bits: u32) -> usize {
    ((value as u32).reverse_bits() >> (32 - bits)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HSV16_PHASE_BITS;

    /// Amplitude-`amp` cosine landing on bin `bin`
    fn tone(n: usize, bin: usize, amp: f64) -> Vec<i32> {
        (0..n)
            .map(|i| (amp * (PI * 2.0 * bin as f64 * i as f64 / n as f64).cos()).round() as i32)
            .collect()
    }

    #[test]
    fn test_minimum_size_builds_and_yields_two_bins() {
        let mut transform = SpectralTransform::new(4);
        assert_eq!(transform.bin_count(), 2);
        assert_eq!(transform.transform(&[1, -1, 1, -1]).len(), 2);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_prepare_rejects_non_power_of_two() {
        SpectralTransform::new(24);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_prepare_rejects_oversize() {
        SpectralTransform::new(4096);
    }

    #[test]
    fn test_window_shape() {
        let transform = SpectralTransform::new(8);
        assert_eq!(transform.window[0], 0);
        assert_eq!(transform.window[4], 2 * FIXED_ONE);
        assert_eq!(transform.window[2], FIXED_ONE);
        assert_eq!(transform.window[1], transform.window[7]);
    }

    #[test]
    fn test_eight_point_tone_is_exact() {
        // Window zeros fall on the tone's zero crossings, so nothing is approximated
        let mut transform = SpectralTransform::new(8);
        let magnitudes = transform.transform(&tone(8, 2, 100.0));
        assert_eq!(magnitudes, vec![0, 50, 100, 50]);
    }

    #[test]
    fn test_tone_amplitude_maps_to_bin_value() {
        let mut transform = SpectralTransform::new(256);
        let magnitudes = transform.transform(&tone(256, 20, 1000.0));
        let peak = magnitudes
            .iter()
            .enumerate()
            .max_by_key(|&(_, m)| *m)
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 20);
        assert!((magnitudes[20] as i64 - 1000).abs() <= 3, "{}", magnitudes[20]);
        assert!((magnitudes[19] as i64 - 500).abs() <= 3, "{}", magnitudes[19]);
        assert!(magnitudes[40] <= 1);
    }

    #[test]
    fn test_magnitude_shift_scales_up() {
        let mut transform = SpectralTransform::new(64);
        let samples = tone(64, 8, 100.0);
        let base = transform.transform(&samples)[8];
        transform.set_magnitude_shift(3);
        let shifted = transform.transform(&samples)[8];
        assert!((shifted as i64 - base as i64 * 8).abs() <= 8, "{base} vs {shifted}");
    }

    #[test]
    fn test_magnitude_shift_is_clamped() {
        let mut transform = SpectralTransform::new(4);
        transform.set_magnitude_shift(40);
        assert_eq!(transform.denominator(), (MAGNITUDE_BASE << 2) >> MAX_MAGNITUDE_SHIFT);
    }

    #[test]
    fn test_half_magnitude_rounds_to_even() {
        let mut transform = SpectralTransform::new(4);
        let denominator = transform.denominator();
        let two_and_half = denominator * 5 / 2;
        let three_and_half = denominator * 7 / 2;

        assert_eq!(transform.bin_magnitude(two_and_half, 0), 2);
        assert_eq!(transform.bin_magnitude(three_and_half, 0), 4);
        assert_eq!(transform.bin_magnitude(0, -two_and_half), 2);

        transform.set_rounding(RoundingPolicy::HalfAwayFromZero);
        assert_eq!(transform.bin_magnitude(two_and_half, 0), 3);
        assert_eq!(transform.bin_magnitude(denominator / 2, 0), 1);
    }

    #[test]
    fn test_phases_only_when_requested() {
        let mut transform = SpectralTransform::new(16);
        let mut spectrum = Spectrum::default();
        transform.transform_into(&tone(16, 2, 50.0), &mut spectrum);
        assert!(spectrum.phases.is_empty());

        transform.set_phase_bits(HSV16_PHASE_BITS);
        transform.transform_into(&tone(16, 2, 50.0), &mut spectrum);
        assert_eq!(spectrum.phases.len(), 8);
        assert!(spectrum.phases.iter().all(|&p| p < 256));
    }

    #[test]
    fn test_phase_quantization() {
        let mut transform = SpectralTransform::new(8);
        transform.set_phase_bits(8);
        // Quarter turn
        assert_eq!(transform.bin_phase(0, 100), 64);
        // Half turn wraps to the top of the range
        assert_eq!(transform.bin_phase(-100, 0), 128);
        // Negative quarter turn
        assert_eq!(transform.bin_phase(0, -100), 192);
        assert_eq!(transform.bin_phase(100, 0), 0);
    }

    #[test]
    fn test_prepare_resizes_tables() {
        let mut transform = SpectralTransform::new(8);
        transform.prepare(16);
        assert_eq!(transform.sample_count(), 16);
        assert_eq!(transform.transform(&[0; 16]).len(), 8);
    }
}
