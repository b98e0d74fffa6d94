//! Ordered Render Queue
//!
//! Lets the pipeline run on the data thread while a UI thread applies pixel
//! operations. Commands are recorded into a shared FIFO and drained in issue
//! order, so the pixel surface replays cursor steps exactly as they happened.
//!
//! # Thread Safety
//! - One producer (the display's draw cycle)
//! - One consumer (the host's render loop)
//! - The FIFO sits behind a `parking_lot::Mutex`; each command is pushed with
//!   the lock held only for the push

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{PixelRect, RenderError, RenderSurface};

/// One recorded renderer call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderCommand {
    /// `plot(rect, color)`
    Plot {
        /// Target rectangle
        rect: PixelRect,
        /// Translated color
        color: u32,
    },
    /// `scroll_surface(dx, dy, background)`
    Scroll {
        /// Horizontal shift in pixels
        dx: i32,
        /// Vertical shift in pixels
        dy: i32,
        /// Fill for the exposed strip
        background: u32,
    },
}

impl RenderCommand {
    /// Replay this command on a surface
    pub fn apply<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> Result<(), RenderError> {
        match *self {
            RenderCommand::Plot { rect, color } => surface.plot(rect, color),
            RenderCommand::Scroll { dx, dy, background } => {
                surface.scroll_surface(dx, dy, background)
            }
        }
    }
}

type SharedQueue = Arc<Mutex<VecDeque<RenderCommand>>>;

/// Producer side: a [`RenderSurface`] that records commands
#[derive(Debug, Clone)]
pub struct QueuedSurface {
    queue: SharedQueue,
    limit: Option<usize>,
}

impl QueuedSurface {
    /// Create an unbounded queue
    pub fn new() -> Self {
        QueuedSurface {
            queue: Arc::new(Mutex::new(VecDeque::new())),
            limit: None,
        }
    }

    /// Create a queue that rejects commands once `limit` are pending
    pub fn bounded(limit: usize) -> Self {
        QueuedSurface {
            queue: Arc::new(Mutex::new(VecDeque::with_capacity(limit))),
            limit: Some(limit),
        }
    }

    /// Consumer handle sharing this queue
    pub fn handle(&self) -> RenderQueue {
        RenderQueue {
            queue: Arc::clone(&self.queue),
        }
    }

    fn enqueue(&self, command: RenderCommand) -> Result<(), RenderError> {
        let mut queue = self.queue.lock();
        if let Some(limit) = self.limit {
            if queue.len() >= limit {
                return Err(RenderError::QueueFull(queue.len()));
            }
        }
        queue.push_back(command);
        Ok(())
    }
}

impl Default for QueuedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for QueuedSurface {
    fn plot(&mut self, rect: PixelRect, color: u32) -> Result<(), RenderError> {
        self.enqueue(RenderCommand::Plot { rect, color })
    }

    fn scroll_surface(&mut self, dx: i32, dy: i32, background: u32) -> Result<(), RenderError> {
        self.enqueue(RenderCommand::Scroll { dx, dy, background })
    }
}

/// Consumer side of a [`QueuedSurface`]
#[derive(Debug, Clone)]
pub struct RenderQueue {
    queue: SharedQueue,
}

impl RenderQueue {
    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Check if no commands are pending
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Take all pending commands in issue order
    pub fn drain(&self) -> Vec<RenderCommand> {
        self.queue.lock().drain(..).collect()
    }

    /// Replay all pending commands on `surface`
    ///
    /// Stops at the first failing command; commands after it stay queued.
    pub fn drain_into<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
    ) -> Result<usize, RenderError> {
        let mut applied = 0;
        loop {
            // Release the lock before touching the surface
            let command = self.queue.lock().pop_front();
            let Some(command) = command else {
                return Ok(applied);
            };
            if let Err(err) = command.apply(surface) {
                self.queue.lock().push_front(command);
                return Err(err);
            }
            applied += 1;
        }
    }
}
