//! Trace Direction Flags
//!
//! Selects the primary axis of cursor advance, the direction along each axis,
//! and whether reaching the far edge scrolls the surface or wraps.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Trace direction configuration bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TraceFlags: u8 {
        /// X advances per cell, Y per line (clear = Y per cell, X per line)
        const HORIZONTAL = 0x01;
        /// X runs right-to-left
        const REVERSE_X = 0x02;
        /// Y runs bottom-to-top
        const REVERSE_Y = 0x04;
        /// Scroll the surface at the primary edge instead of wrapping
        const SCROLL = 0x08;
        /// Plot single pixels instead of dot-sized cells
        const SPARSE = 0x10;
    }
}

impl TraceFlags {
    /// Convert a legacy `TRACE 0..15` code
    ///
    /// | code | primary      | secondary    |
    /// |------|--------------|--------------|
    /// | 0    | left→right   | top→bottom   |
    /// | 1    | right→left   | top→bottom   |
    /// | 2    | left→right   | bottom→top   |
    /// | 3    | right→left   | bottom→top   |
    /// | 4    | top→bottom   | left→right   |
    /// | 5    | bottom→top   | left→right   |
    /// | 6    | top→bottom   | right→left   |
    /// | 7    | bottom→top   | right→left   |
    ///
    /// Adding 8 enables scrolling. Bits above 0x0F are ignored.
    pub fn from_pattern(code: u8) -> Self {
        let mut flags = TraceFlags::empty();
        let reverse_primary = code & 0x01 != 0;
        let reverse_secondary = code & 0x02 != 0;

        if code & 0x04 == 0 {
            flags |= TraceFlags::HORIZONTAL;
            flags.set(TraceFlags::REVERSE_X, reverse_primary);
            flags.set(TraceFlags::REVERSE_Y, reverse_secondary);
        } else {
            flags.set(TraceFlags::REVERSE_Y, reverse_primary);
            flags.set(TraceFlags::REVERSE_X, reverse_secondary);
        }
        flags.set(TraceFlags::SCROLL, code & 0x08 != 0);
        flags
    }

    /// Legacy `TRACE` code for these flags (the sparse bit has no code)
    pub fn pattern(&self) -> u8 {
        let (reverse_primary, reverse_secondary) = if self.is_horizontal() {
            (self.contains(TraceFlags::REVERSE_X), self.contains(TraceFlags::REVERSE_Y))
        } else {
            (self.contains(TraceFlags::REVERSE_Y), self.contains(TraceFlags::REVERSE_X))
        };

        let mut code = 0;
        if reverse_primary {
            code |= 0x01;
        }
        if reverse_secondary {
            code |= 0x02;
        }
        if !self.is_horizontal() {
            code |= 0x04;
        }
        if self.scrolls() {
            code |= 0x08;
        }
        code
    }

    /// Check if X is the primary (per-cell) axis
    pub fn is_horizontal(&self) -> bool {
        self.contains(TraceFlags::HORIZONTAL)
    }

    /// Check if the surface scrolls at the primary edge
    pub fn scrolls(&self) -> bool {
        self.contains(TraceFlags::SCROLL)
    }

    /// Check if plotted cells ignore dot size
    pub fn is_sparse(&self) -> bool {
        self.contains(TraceFlags::SPARSE)
    }
}

impl Default for TraceFlags {
    fn default() -> Self {
        TraceFlags::HORIZONTAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_zero_is_plain_horizontal() {
        assert_eq!(TraceFlags::from_pattern(0), TraceFlags::HORIZONTAL);
    }

    #[test]
    fn test_vertical_patterns_clear_horizontal() {
        for code in 4..8 {
            assert!(!TraceFlags::from_pattern(code).is_horizontal(), "code {code}");
        }
    }

    #[test]
    fn test_pattern_round_trips_for_all_codes() {
        for code in 0..16u8 {
            assert_eq!(TraceFlags::from_pattern(code).pattern(), code);
        }
    }

    #[test]
    fn test_vertical_reverse_bits_follow_axis() {
        // 5: bottom→top along the primary (Y) axis
        let flags = TraceFlags::from_pattern(5);
        assert!(flags.contains(TraceFlags::REVERSE_Y));
        assert!(!flags.contains(TraceFlags::REVERSE_X));

        // 6: right→left along the secondary (X) axis
        let flags = TraceFlags::from_pattern(6);
        assert!(flags.contains(TraceFlags::REVERSE_X));
        assert!(!flags.contains(TraceFlags::REVERSE_Y));
    }

    #[test]
    fn test_scroll_bit() {
        assert!(TraceFlags::from_pattern(8).scrolls());
        assert!(!TraceFlags::from_pattern(7).scrolls());
        assert!(TraceFlags::from_pattern(0x1F).scrolls());
    }
}
