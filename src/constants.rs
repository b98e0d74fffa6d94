//! Pipeline Constants
//!
//! Fixed-point scales and configuration limits shared by the transform,
//! the intensity mapper and configuration normalization.

/// Smallest supported transform size
pub const MIN_SAMPLES: usize = 4;

/// Largest supported transform size
pub const MAX_SAMPLES: usize = 2048;

/// Transform size used when none is configured
pub const DEFAULT_SAMPLES: usize = 512;

/// History rows/columns retained by default
pub const DEFAULT_DEPTH: u32 = 256;

/// Default magnitude range (full positive `i32` span)
pub const DEFAULT_RANGE: u32 = i32::MAX as u32;

/// Fractional bits of the window and twiddle tables
pub const FIXED_POINT_BITS: u32 = 12;

/// Fixed-point unity (`0x1000`) for window and twiddle coefficients
pub const FIXED_ONE: i64 = 1 << FIXED_POINT_BITS;

/// Base scale of the magnitude denominator: `0x800 << log2(N) >> shift`
///
/// With a Hann window this makes a full-scale tone of amplitude `A` report a
/// bin magnitude of `A` when the magnitude shift is zero.
pub const MAGNITUDE_BASE: i64 = 0x800;

/// Largest magnitude shift that keeps the denominator at least 1
pub const MAX_MAGNITUDE_SHIFT: u8 = 11;

/// Largest intensity value produced by the mapper
pub const INTENSITY_MAX: u32 = 255;

/// Bits occupied by the intensity inside a composed pixel value
pub const INTENSITY_BITS: u32 = 8;

/// Largest pixel extent along either surface axis
///
/// Keeps dot-scaled positions and scroll shifts inside `i32`.
pub const MAX_SURFACE_EXTENT: u32 = i32::MAX as u32;

/// Phase resolution used by the 16-bit HSV color modes
pub const HSV16_PHASE_BITS: u8 = 8;
