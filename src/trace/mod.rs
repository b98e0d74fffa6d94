//! Trace Pattern Processing
//!
//! Owns the logical cursor of a streaming display surface. Positions are in
//! logical cells (bin × depth for spectral displays, time × channel for
//! others) and never in pixels; dot size only enters at plot time.
//!
//! The processor advances one cell per value along the primary axis. At the
//! far edge it either wraps to the start of the line and moves one cell along
//! the secondary axis, or (scroll mode) stays at the edge and hands a scroll
//! delta to the next step.

pub mod flags;

pub use flags::TraceFlags;

use tracing::trace;

/// Logical dimensions of a trace surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceGeometry {
    /// Cells along X
    pub width: u32,
    /// Cells along Y
    pub height: u32,
}

impl TraceGeometry {
    /// Create a geometry from logical width and height
    pub fn new(width: u32, height: u32) -> Self {
        TraceGeometry { width, height }
    }

    /// Geometry for a display with `line_length` cells per line and `depth` lines
    ///
    /// Horizontal-primary traces lay lines out along X; vertical-primary
    /// traces swap the assignment. This is the only place the swap happens.
    pub fn for_display(line_length: u32, depth: u32, flags: TraceFlags) -> Self {
        if flags.is_horizontal() {
            TraceGeometry::new(line_length, depth)
        } else {
            TraceGeometry::new(depth, line_length)
        }
    }

    /// Total number of cells
    pub fn cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if a logical position lies on the surface
    pub fn contains(&self, pos: LogicalPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }
}

/// Logical cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LogicalPos {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl LogicalPos {
    /// Create a position
    pub fn new(x: u32, y: u32) -> Self {
        LogicalPos { x, y }
    }
}

/// Logical scroll delta, one cell along a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogicalDelta {
    /// Horizontal shift in cells
    pub dx: i32,
    /// Vertical shift in cells
    pub dy: i32,
}

/// Processor lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    /// No geometry yet
    Idle,
    /// Cursor advancing within bounds
    Active,
    /// An edge was crossed; a scroll delta waits for the next step
    Scrolling,
}

/// Result of one cursor step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceStep {
    /// Cell to plot for this value
    pub position: LogicalPos,
    /// Scroll to apply before plotting, if an edge was crossed
    pub scroll: Option<LogicalDelta>,
}

/// Logical cursor and scroll decision for a streaming display
#[derive(Debug, Clone)]
pub struct TracePatternProcessor {
    flags: TraceFlags,
    geometry: Option<TraceGeometry>,
    cursor: LogicalPos,
    state: TraceState,
    pending: Option<LogicalDelta>,
    /// Accumulated scroll in cells since the last geometry change
    scroll_offset: (i64, i64),
    steps: u64,
}

impl TracePatternProcessor {
    /// Create an idle processor
    pub fn new(flags: TraceFlags) -> Self {
        TracePatternProcessor {
            flags,
            geometry: None,
            cursor: LogicalPos::default(),
            state: TraceState::Idle,
            pending: None,
            scroll_offset: (0, 0),
            steps: 0,
        }
    }

    /// Current trace flags
    pub fn flags(&self) -> TraceFlags {
        self.flags
    }

    /// Replace the trace flags; returns the processor to `Idle`
    pub fn set_flags(&mut self, flags: TraceFlags) {
        self.flags = flags;
        self.reset();
    }

    /// Size the surface in logical cells and park the cursor at the start corner
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn set_geometry(&mut self, width: u32, height: u32) {
        assert!(
            width >= 1 && height >= 1,
            "trace geometry must be at least 1x1, got {width}x{height}"
        );
        let geometry = TraceGeometry::new(width, height);
        self.geometry = Some(geometry);
        self.cursor = self.start_corner(geometry);
        self.state = TraceState::Active;
        self.pending = None;
        self.scroll_offset = (0, 0);
        self.steps = 0;
        trace!(width, height, pattern = self.flags.pattern(), "trace geometry set");
    }

    /// Current geometry, if sized
    pub fn geometry(&self) -> Option<TraceGeometry> {
        self.geometry
    }

    /// Current lifecycle state
    pub fn state(&self) -> TraceState {
        self.state
    }

    /// Cell the next step will plot, if sized
    pub fn position(&self) -> Option<LogicalPos> {
        self.geometry.map(|_| self.cursor)
    }

    /// Accumulated scroll (cells) since the geometry was set
    pub fn scroll_offset(&self) -> (i64, i64) {
        self.scroll_offset
    }

    /// Number of steps taken since the geometry was set
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Return to `Idle`, forgetting geometry and cursor
    pub fn reset(&mut self) {
        self.geometry = None;
        self.cursor = LogicalPos::default();
        self.state = TraceState::Idle;
        self.pending = None;
        self.scroll_offset = (0, 0);
        self.steps = 0;
    }

    /// Advance by one cell
    ///
    /// Returns the cell for the current value together with any scroll the
    /// renderer must apply first. Returns `None` while `Idle`.
    pub fn step(&mut self) -> Option<TraceStep> {
        let geometry = self.geometry?;

        let scroll = self.pending.take();
        if let Some(delta) = scroll {
            self.scroll_offset.0 += delta.dx as i64;
            self.scroll_offset.1 += delta.dy as i64;
            self.state = TraceState::Active;
        }

        let position = self.cursor;
        self.advance(geometry);
        self.steps += 1;

        Some(TraceStep { position, scroll })
    }

    fn start_corner(&self, geometry: TraceGeometry) -> LogicalPos {
        LogicalPos {
            x: axis_start(geometry.width, self.flags.contains(TraceFlags::REVERSE_X)),
            y: axis_start(geometry.height, self.flags.contains(TraceFlags::REVERSE_Y)),
        }
    }

    fn advance(&mut self, geometry: TraceGeometry) {
        let reverse_x = self.flags.contains(TraceFlags::REVERSE_X);
        let reverse_y = self.flags.contains(TraceFlags::REVERSE_Y);
        let horizontal = self.flags.is_horizontal();

        let (primary, primary_len, primary_rev, secondary, secondary_len, secondary_rev) =
            if horizontal {
                (
                    &mut self.cursor.x,
                    geometry.width,
                    reverse_x,
                    &mut self.cursor.y,
                    geometry.height,
                    reverse_y,
                )
            } else {
                (
                    &mut self.cursor.y,
                    geometry.height,
                    reverse_y,
                    &mut self.cursor.x,
                    geometry.width,
                    reverse_x,
                )
            };

        if let Some(next) = axis_next(*primary, primary_len, primary_rev) {
            *primary = next;
            return;
        }

        if self.flags.scrolls() {
            // Content moves against the direction of travel
            let shift = if primary_rev { 1 } else { -1 };
            let delta = if horizontal {
                LogicalDelta { dx: shift, dy: 0 }
            } else {
                LogicalDelta { dx: 0, dy: shift }
            };
            self.pending = Some(delta);
            self.state = TraceState::Scrolling;
            trace!(dx = delta.dx, dy = delta.dy, "trace edge crossed, scroll pending");
            return;
        }

        *primary = axis_start(primary_len, primary_rev);
        *secondary = axis_next(*secondary, secondary_len, secondary_rev)
            .unwrap_or_else(|| axis_start(secondary_len, secondary_rev));
    }
}

impl Default for TracePatternProcessor {
    fn default() -> Self {
        Self::new(TraceFlags::default())
    }
}

#[inline]
fn axis_start(len: u32, reverse: bool) -> u32 {
    if reverse {
        len - 1
    } else {
        0
    }
}

/// Next coordinate along an axis, or `None` at the far edge
#[inline]
fn axis_next(pos: u32, len: u32, reverse: bool) -> Option<u32> {
    if reverse {
        pos.checked_sub(1)
    } else if pos + 1 < len {
        Some(pos + 1)
    } else {
        None
    }
}
