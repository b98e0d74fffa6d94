//! Logical → Pixel Adapter
//!
//! Converts logical cursor positions and scroll deltas into pixel rectangles
//! and pixel shifts. Dot-size multiplication happens here and nowhere else.

use super::{ColorTranslator, PixelRect, RenderError, RenderSurface};
use crate::config::{ColorMode, DisplayConfig};
use crate::constants::MAX_SURFACE_EXTENT;
use crate::trace::{LogicalDelta, LogicalPos, TraceGeometry, TraceStep};

/// Pixel-space plotter for one display
#[derive(Debug, Clone)]
pub struct PixelPlotAdapter<C> {
    dot_size_x: u32,
    dot_size_y: u32,
    sparse: bool,
    color_mode: ColorMode,
    background: u32,
    translator: C,
}

impl<C: ColorTranslator> PixelPlotAdapter<C> {
    /// Create an adapter for a configuration and a color translator
    pub fn new(config: &DisplayConfig, translator: C) -> Self {
        let mut adapter = PixelPlotAdapter {
            dot_size_x: 1,
            dot_size_y: 1,
            sparse: false,
            color_mode: config.color_mode,
            background: config.background,
            translator,
        };
        adapter.reconfigure(config);
        adapter
    }

    /// Pick up dot size, sparse flag, color mode and background
    pub fn reconfigure(&mut self, config: &DisplayConfig) {
        assert!(
            config.dot_size_x >= 1 && config.dot_size_y >= 1,
            "dot size must be at least 1x1"
        );
        assert!(
            config.dot_size_x <= MAX_SURFACE_EXTENT && config.dot_size_y <= MAX_SURFACE_EXTENT,
            "dot size {}x{} exceeds {MAX_SURFACE_EXTENT} pixels",
            config.dot_size_x,
            config.dot_size_y
        );
        self.dot_size_x = config.dot_size_x;
        self.dot_size_y = config.dot_size_y;
        self.sparse = config.trace.is_sparse();
        self.color_mode = config.color_mode;
        self.background = config.background;
    }

    /// Dot size as `(x, y)`
    pub fn dot_size(&self) -> (u32, u32) {
        (self.dot_size_x, self.dot_size_y)
    }

    /// Pixel dimensions of a logical surface
    ///
    /// # Panics
    ///
    /// Panics if either axis exceeds [`MAX_SURFACE_EXTENT`] pixels.
    pub fn surface_size(&self, geometry: TraceGeometry) -> (u32, u32) {
        (
            pixel_extent(geometry.width, self.dot_size_x),
            pixel_extent(geometry.height, self.dot_size_y),
        )
    }

    /// Pixel rectangle covered by a logical cell
    pub fn pixel_rect(&self, pos: LogicalPos) -> PixelRect {
        let (width, height) = if self.sparse {
            (1, 1)
        } else {
            (self.dot_size_x, self.dot_size_y)
        };
        PixelRect {
            x: pos.x * self.dot_size_x,
            y: pos.y * self.dot_size_y,
            width,
            height,
        }
    }

    /// Pixel shift for a logical scroll delta
    pub fn pixel_delta(&self, delta: LogicalDelta) -> (i32, i32) {
        (
            delta.dx * self.dot_size_x as i32,
            delta.dy * self.dot_size_y as i32,
        )
    }

    /// Plot one cell with the translated color of `value`
    pub fn plot<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        pos: LogicalPos,
        value: u32,
    ) -> Result<(), RenderError> {
        let color = self.translator.translate(value, self.color_mode);
        surface.plot(self.pixel_rect(pos), color)
    }

    /// Shift the surface by a logical delta and clear the exposed strip
    pub fn scroll<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        delta: LogicalDelta,
    ) -> Result<(), RenderError> {
        let (dx, dy) = self.pixel_delta(delta);
        surface.scroll_surface(dx, dy, self.background)
    }

    /// Apply a cursor step: pending scroll first, then the plot
    ///
    /// The plot is attempted even if the scroll fails; the first error wins.
    pub fn apply<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        step: &TraceStep,
        value: u32,
    ) -> Result<(), RenderError> {
        let scrolled = match step.scroll {
            Some(delta) => self.scroll(surface, delta),
            None => Ok(()),
        };
        let plotted = self.plot(surface, step.position, value);
        scrolled.and(plotted)
    }
}

fn pixel_extent(cells: u32, dot: u32) -> u32 {
    match cells.checked_mul(dot) {
        Some(extent) if extent <= MAX_SURFACE_EXTENT => extent,
        _ => panic!("{cells} cells at dot size {dot} exceed {MAX_SURFACE_EXTENT} pixels"),
    }
}
