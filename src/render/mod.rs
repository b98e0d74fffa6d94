//! Pixel Space
//!
//! The renderer-facing side of the pipeline. [`PixelPlotAdapter`] is the only
//! component that knows about dot size; everything upstream of it works in
//! logical cells.
//!
//! Downstream collaborators are expressed as traits:
//! - [`RenderSurface`]: `plot` and `scroll_surface` on the host's bitmap
//! - [`ColorTranslator`]: pure `(value, mode) -> color`

pub mod adapter;
pub mod bitmap;
pub mod queue;

pub use adapter::PixelPlotAdapter;
pub use bitmap::BitmapSurface;
pub use queue::{QueuedSurface, RenderCommand, RenderQueue};

use crate::config::ColorMode;

/// Pixel rectangle on the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Errors reported by render surfaces
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Rectangle does not fit the surface
    #[error("rect {width}x{height} at ({x}, {y}) outside {surface_width}x{surface_height}")]
    OutOfBounds {
        /// Left edge
        x: u32,
        /// Top edge
        y: u32,
        /// Rectangle width
        width: u32,
        /// Rectangle height
        height: u32,
        /// Surface width
        surface_width: u32,
        /// Surface height
        surface_height: u32,
    },

    /// The command queue is at capacity
    #[error("render queue full ({0} commands pending)")]
    QueueFull(usize),

    /// Backend-specific failure
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Destination of plot and scroll operations
///
/// Implementations may apply commands immediately or queue them, but must
/// apply them in the order they were issued.
pub trait RenderSurface {
    /// Fill a rectangle with a color
    fn plot(&mut self, rect: PixelRect, color: u32) -> Result<(), RenderError>;

    /// Shift the surface content by `(dx, dy)` pixels and clear the exposed
    /// strip to `background`
    fn scroll_surface(&mut self, dx: i32, dy: i32, background: u32) -> Result<(), RenderError>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn plot(&mut self, rect: PixelRect, color: u32) -> Result<(), RenderError> {
        (**self).plot(rect, color)
    }

    fn scroll_surface(&mut self, dx: i32, dy: i32, background: u32) -> Result<(), RenderError> {
        (**self).scroll_surface(dx, dy, background)
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn plot(&mut self, rect: PixelRect, color: u32) -> Result<(), RenderError> {
        (**self).plot(rect, color)
    }

    fn scroll_surface(&mut self, dx: i32, dy: i32, background: u32) -> Result<(), RenderError> {
        (**self).scroll_surface(dx, dy, background)
    }
}

/// Pure color translation supplied by the host
pub trait ColorTranslator {
    /// Translate a plotted value (intensity plus optional phase bits) to a color
    fn translate(&self, value: u32, mode: ColorMode) -> u32;
}

impl<F> ColorTranslator for F
where
    F: Fn(u32, ColorMode) -> u32,
{
    fn translate(&self, value: u32, mode: ColorMode) -> u32 {
        self(value, mode)
    }
}
