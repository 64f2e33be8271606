use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::core::types::Viewport;

pub const DEFAULT_RESIZE_QUIET_WINDOW: Duration = Duration::from_millis(100);

/// One host resize notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub viewport: Viewport,
    pub at: Instant,
}

/// Trailing-edge debouncer for resize bursts.
///
/// Each recorded event restarts the quiet window. The pending viewport is
/// released once `quiet_window` has elapsed since the most recent event, so a
/// burst of any length yields exactly one release carrying its last viewport.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    quiet_window: Duration,
    pending: Option<ResizeEvent>,
    collapsed: u64,
}

impl Default for ResizeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_QUIET_WINDOW)
    }
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window,
            pending: None,
            collapsed: 0,
        }
    }

    #[must_use]
    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    pub fn set_quiet_window(&mut self, quiet_window: Duration) {
        self.quiet_window = quiet_window;
    }

    pub fn record(&mut self, event: ResizeEvent) {
        if let Some(previous) = self.pending {
            self.collapsed += 1;
            trace!(
                previous_width = previous.viewport.width,
                previous_height = previous.viewport.height,
                width = event.viewport.width,
                height = event.viewport.height,
                "resize collapsed into pending burst"
            );
        }
        // Events delivered out of order never move the deadline backwards.
        let at = self.pending.map_or(event.at, |previous| previous.at.max(event.at));
        self.pending = Some(ResizeEvent { at, ..event });
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Instant at which the pending burst will be released.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|event| event.at + self.quiet_window)
    }

    /// Releases the pending viewport when the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Viewport> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.pending.take().map(|event| event.viewport)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Events absorbed into a later one since creation.
    #[must_use]
    pub fn collapsed_events(&self) -> u64 {
        self.collapsed
    }
}

/// Cloneable handle host callbacks use to report resizes.
///
/// Events are queued and only picked up by the engine on its next poll, so a
/// resize reported while a pass is running never interleaves with it.
#[derive(Debug, Clone, Default)]
pub struct ResizeSignal {
    queue: Rc<RefCell<Vec<ResizeEvent>>>,
}

impl ResizeSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, viewport: Viewport, at: Instant) {
        self.queue.borrow_mut().push(ResizeEvent { viewport, at });
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }

    pub(crate) fn drain(&self) -> Vec<ResizeEvent> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}
