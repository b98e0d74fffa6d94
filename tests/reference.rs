//! Fixed-point transform against a floating-point FFT

use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use debug_spectro::spectral::SpectralTransform;

/// Same window and scaling as the fixed-point path, in `f64`
fn reference_magnitudes(samples: &[i32]) -> Vec<f64> {
    let n = samples.len();
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let window = 1.0 - (2.0 * PI * i as f64 / n as f64).cos();
            Complex::new(s as f64 * window, 0.0)
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    buffer[..n / 2]
        .iter()
        .map(|bin| bin.norm() * 2.0 / n as f64)
        .collect()
}

fn tones(n: usize, parts: &[(f64, f64)]) -> Vec<i32> {
    (0..n)
        .map(|i| {
            parts
                .iter()
                .map(|&(cycles, amp)| amp * (2.0 * PI * cycles * i as f64 / n as f64).sin())
                .sum::<f64>()
                .round() as i32
        })
        .collect()
}

fn assert_close(samples: &[i32]) {
    let mut transform = SpectralTransform::new(samples.len());
    let fixed = transform.transform(samples);
    let reference = reference_magnitudes(samples);
    let peak = reference.iter().cloned().fold(0.0, f64::max);
    let tolerance = 2.0 + peak * 0.01;

    for (bin, (&got, &want)) in fixed.iter().zip(&reference).enumerate() {
        assert!(
            (got as f64 - want).abs() <= tolerance,
            "n={} bin {bin}: fixed {got}, reference {want:.2}",
            samples.len()
        );
    }
}

#[test]
fn test_matches_reference_for_every_size() {
    let mut n = 4;
    while n <= 2048 {
        let bin = (n / 8).max(1) as f64;
        assert_close(&tones(n, &[(bin, 1000.0), (bin * 2.5, 300.0)]));
        n <<= 1;
    }
}

#[test]
fn test_reference_scale_is_tone_amplitude() {
    // (1 - cos) has unit mean, so a bin-centred tone reads back its amplitude
    let reference = reference_magnitudes(&tones(64, &[(8.0, 1000.0)]));
    assert_abs_diff_eq!(reference[8], 1000.0, epsilon = 1.0);
    assert_abs_diff_eq!(reference[7], 500.0, epsilon = 1.0);
    assert_abs_diff_eq!(reference[20], 0.0, epsilon = 1.0);
}

#[test]
fn test_dc_and_silence() {
    assert_close(&[0; 64]);
    assert_close(&[500; 64]);
}

#[test]
fn test_full_scale_square_wave() {
    let samples: Vec<i32> = (0..512)
        .map(|i| if (i / 16) % 2 == 0 { 30_000 } else { -30_000 })
        .collect();
    assert_close(&samples);
}

proptest! {
    #[test]
    fn fixed_point_tracks_float_reference(
        exponent in 3u32..11,
        cycles_a in 0.0f64..0.5,
        cycles_b in 0.0f64..0.5,
        amp_a in 0.0f64..4000.0,
        amp_b in 0.0f64..4000.0,
    ) {
        let n = 1usize << exponent;
        let samples = tones(
            n,
            &[(cycles_a * n as f64, amp_a), (cycles_b * n as f64, amp_b)],
        );
        assert_close(&samples);
    }
}
