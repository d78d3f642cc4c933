//! In-memory session log.
//!
//! [`LogBuffer`] keeps the most recent events so a front end can show or
//! export them. Install it through [`crate::init`] or add [`LogBuffer::layer`]
//! to a subscriber directly.

use std::{collections::VecDeque, sync::Arc, time::SystemTime};

use parking_lot::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::render::render_event;

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Wall-clock time the event was recorded.
    pub at: SystemTime,
    /// Upper-case level name.
    pub level: String,
    /// Rendered message.
    pub message: String,
}

/// Shared state behind a [`LogBuffer`].
#[derive(Debug)]
struct Ring {
    /// Maximum retained lines.
    capacity: usize,
    /// Oldest first.
    lines: VecDeque<LogLine>,
    /// Lines ever pushed, including evicted ones.
    total: u64,
}

/// Bounded, cloneable log of recent events. Oldest lines are evicted first.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    /// Shared ring.
    inner: Arc<Mutex<Ring>>,
}

impl LogBuffer {
    /// Create a buffer retaining at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Ring {
                capacity: capacity.max(1),
                lines: VecDeque::new(),
                total: 0,
            })),
        }
    }

    /// Append a line, evicting the oldest when full.
    pub fn push(&self, line: LogLine) {
        let mut ring = self.inner.lock();
        if ring.lines.len() == ring.capacity {
            ring.lines.pop_front();
        }
        ring.lines.push_back(line);
        ring.total += 1;
    }

    /// Copy of the retained lines, oldest first.
    pub fn lines(&self) -> Vec<LogLine> {
        self.inner.lock().lines.iter().cloned().collect()
    }

    /// Lines pushed after the first `seen`, as far as they are still retained,
    /// plus the new cursor to pass next time.
    pub fn since(&self, seen: u64) -> (u64, Vec<LogLine>) {
        let ring = self.inner.lock();
        let first = ring.total - ring.lines.len() as u64;
        let skip = usize::try_from(seen.saturating_sub(first)).unwrap_or(usize::MAX);
        (ring.total, ring.lines.iter().skip(skip).cloned().collect())
    }

    /// Number of retained lines.
    pub fn len(&self) -> usize {
        self.inner.lock().lines.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all retained lines.
    pub fn clear(&self) {
        self.inner.lock().lines.clear();
    }

    /// A tracing layer appending to this buffer.
    pub fn layer(self) -> BufferLayer {
        BufferLayer { buffer: self }
    }
}

/// Tracing layer that records every event it sees into a [`LogBuffer`].
#[derive(Debug, Clone)]
pub struct BufferLayer {
    /// Destination.
    buffer: LogBuffer,
}

impl<S> Layer<S> for BufferLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let r = render_event(event);
        self.buffer.push(LogLine {
            at: SystemTime::now(),
            level: r.level,
            message: r.message,
        });
    }
}
