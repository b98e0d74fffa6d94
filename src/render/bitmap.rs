//! In-Memory Bitmap Surface
//!
//! A plain `u32` pixel buffer implementing [`RenderSurface`]. Hosts without a
//! native bitmap can render into it and blit the pixels themselves.

use super::{PixelRect, RenderError, RenderSurface};

/// Row-major `u32` pixel buffer
#[derive(Clone, PartialEq, Eq)]
pub struct BitmapSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl BitmapSurface {
    /// Create a surface filled with `background`
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        BitmapSurface {
            width,
            height,
            pixels: vec![background; width as usize * height as usize],
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, if inside
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Row-major pixel data
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Resize, discarding content
    pub fn resize(&mut self, width: u32, height: u32, background: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, background);
    }

    /// Fill the whole surface
    pub fn clear(&mut self, background: u32) {
        self.pixels.fill(background);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl RenderSurface for BitmapSurface {
    fn plot(&mut self, rect: PixelRect, color: u32) -> Result<(), RenderError> {
        let right = rect.x as u64 + rect.width as u64;
        let bottom = rect.y as u64 + rect.height as u64;
        if right > self.width as u64 || bottom > self.height as u64 {
            return Err(RenderError::OutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                surface_width: self.width,
                surface_height: self.height,
            });
        }

        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            self.pixels[start..start + rect.width as usize].fill(color);
        }
        Ok(())
    }

    fn scroll_surface(&mut self, dx: i32, dy: i32, background: u32) -> Result<(), RenderError> {
        let width = self.width as i64;
        let height = self.height as i64;
        let (dx, dy) = (dx as i64, dy as i64);

        if dx.abs() >= width || dy.abs() >= height {
            self.clear(background);
            return Ok(());
        }

        let source = self.pixels.clone();
        for y in 0..height {
            let from_y = y - dy;
            for x in 0..width {
                let from_x = x - dx;
                let value = if (0..width).contains(&from_x) && (0..height).contains(&from_y) {
                    source[(from_y * width + from_x) as usize]
                } else {
                    background
                };
                self.pixels[(y * width + x) as usize] = value;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for BitmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_fills_rect() {
        let mut surface = BitmapSurface::new(4, 4, 0);
        surface
            .plot(
                PixelRect {
                    x: 1,
                    y: 2,
                    width: 2,
                    height: 2,
                },
                7,
            )
            .unwrap();
        assert_eq!(surface.pixel(1, 2), Some(7));
        assert_eq!(surface.pixel(2, 3), Some(7));
        assert_eq!(surface.pixel(0, 2), Some(0));
        assert_eq!(surface.pixels().iter().filter(|&&p| p == 7).count(), 4);
    }

    #[test]
    fn test_plot_outside_is_rejected() {
        let mut surface = BitmapSurface::new(4, 4, 0);
        let result = surface.plot(
            PixelRect {
                x: 3,
                y: 0,
                width: 2,
                height: 1,
            },
            1,
        );
        assert!(matches!(result, Err(RenderError::OutOfBounds { .. })));
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_scroll_left_clears_right_strip() {
        let mut surface = BitmapSurface::new(3, 1, 0);
        for x in 0..3 {
            surface
                .plot(
                    PixelRect {
                        x,
                        y: 0,
                        width: 1,
                        height: 1,
                    },
                    x + 1,
                )
                .unwrap();
        }
        surface.scroll_surface(-1, 0, 9).unwrap();
        assert_eq!(surface.pixels(), &[2, 3, 9]);
    }

    #[test]
    fn test_scroll_down_clears_top_strip() {
        let mut surface = BitmapSurface::new(1, 3, 0);
        surface
            .plot(
                PixelRect {
                    x: 0,
                    y: 0,
                    width: 1,
                    height: 1,
                },
                5,
            )
            .unwrap();
        surface.scroll_surface(0, 2, 8).unwrap();
        assert_eq!(surface.pixels(), &[8, 8, 5]);
    }

    #[test]
    fn test_scroll_beyond_surface_clears_everything() {
        let mut surface = BitmapSurface::new(2, 2, 1);
        surface.scroll_surface(5, 0, 4).unwrap();
        assert!(surface.pixels().iter().all(|&p| p == 4));
    }

    #[test]
    fn test_resize_keeps_dimensions_consistent() {
        let mut surface = BitmapSurface::new(2, 2, 0);
        surface.resize(5, 3, 6);
        assert_eq!(surface.pixels().len(), 15);
        assert_eq!(surface.pixel(4, 2), Some(6));
        assert_eq!(surface.pixel(5, 0), None);
    }
}
