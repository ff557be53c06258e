//! Engine event fan-out with per-subscriber ring buffers.
//!
//! Every subscriber gets its own bounded ring; when a ring overflows the
//! oldest events are dropped and counted in [`EventCursor::lost_count`].
use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use chrome_anim::FrameId;
use chrome_geom::RectPx;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::{
    sync::Notify,
    time::{Instant as TokioInstant, timeout_at},
};

use crate::{notification::NotificationId, notification::NotificationPhase, pin::PinMode};

/// Default per-subscriber event ring capacity.
pub(crate) const DEFAULT_EVENT_CAPACITY: usize = 16_384;

/// Observable state changes published by frames and their notification queues.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ChromeEvent {
    /// A frame was shown and registered with the owner registry.
    FrameShown {
        /// Frame.
        frame: FrameId,
    },
    /// A frame's bounds changed.
    BoundsChanged {
        /// Frame.
        frame: FrameId,
        /// New bounds in screen coordinates.
        bounds: RectPx,
    },
    /// A frame's pin mode changed.
    PinChanged {
        /// Frame.
        frame: FrameId,
        /// New mode.
        mode: PinMode,
    },
    /// A frame was iconified after its minimize animation.
    Iconified {
        /// Frame.
        frame: FrameId,
    },
    /// A frame was restored from the iconified state.
    Restored {
        /// Frame.
        frame: FrameId,
    },
    /// A frame repainted its background after a resize gesture.
    BackgroundRefreshed {
        /// Frame.
        frame: FrameId,
    },
    /// Disposal passed its confirmation step.
    DisposeStarted {
        /// Frame.
        frame: FrameId,
    },
    /// A frame released its surface.
    FrameDisposed {
        /// Frame.
        frame: FrameId,
    },
    /// A notification changed phase.
    Notification {
        /// Frame hosting the notification.
        frame: FrameId,
        /// Notification.
        id: NotificationId,
        /// New phase.
        phase: NotificationPhase,
        /// Milliseconds since the shell context was created.
        at_ms: u64,
    },
}

impl ChromeEvent {
    /// Frame the event concerns.
    pub fn frame(&self) -> FrameId {
        match self {
            Self::FrameShown { frame }
            | Self::BoundsChanged { frame, .. }
            | Self::PinChanged { frame, .. }
            | Self::Iconified { frame }
            | Self::Restored { frame }
            | Self::BackgroundRefreshed { frame }
            | Self::DisposeStarted { frame }
            | Self::FrameDisposed { frame }
            | Self::Notification { frame, .. } => *frame,
        }
    }
}

/// Sequenced ring entry.
struct EventEntry {
    /// Global sequence number.
    seq: u64,
    /// Payload.
    event: ChromeEvent,
}

/// Bounded per-subscriber ring.
struct EventBuffer {
    /// Pending events.
    events: VecDeque<EventEntry>,
    /// Events dropped due to overflow.
    lost_count: u64,
    /// Sequence of the oldest retained event.
    head_seq: u64,
    /// Sequence of the next event to be pushed.
    next_seq: u64,
    /// Ring capacity.
    capacity: usize,
}

impl EventBuffer {
    /// Empty ring starting at `start_seq`.
    fn new(start_seq: u64, capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            lost_count: 0,
            head_seq: start_seq,
            next_seq: start_seq,
            capacity,
        }
    }

    /// Append, evicting the oldest entry when full.
    fn push(&mut self, seq: u64, event: ChromeEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.lost_count = self.lost_count.saturating_add(1);
        }
        self.events.push_back(EventEntry { seq, event });
        self.next_seq = seq.saturating_add(1);
        self.head_seq = self
            .events
            .front()
            .map(|entry| entry.seq)
            .unwrap_or(self.next_seq);
    }

    /// Remove the oldest entry.
    fn pop(&mut self) -> Option<EventEntry> {
        let entry = self.events.pop_front();
        self.head_seq = self
            .events
            .front()
            .map(|entry| entry.seq)
            .unwrap_or(self.next_seq);
        entry
    }
}

/// Shared state of one subscription.
struct StreamInner {
    /// Ring buffer.
    buffer: Mutex<EventBuffer>,
    /// Wakes waiting readers.
    notify: Notify,
    /// Set when the hub is dropped.
    closed: AtomicBool,
}

impl StreamInner {
    /// New open stream.
    fn new(start_seq: u64, capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            buffer: Mutex::new(EventBuffer::new(start_seq, capacity)),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        })
    }

    /// Append an event and wake readers.
    fn push(&self, seq: u64, event: &ChromeEvent) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let mut buffer = self.buffer.lock();
        buffer.push(seq, event.clone());
        drop(buffer);
        self.notify.notify_waiters();
    }

    /// Pop the next event for `cursor`.
    fn try_next(&self, cursor: &mut EventCursor) -> Option<ChromeEvent> {
        let mut buffer = self.buffer.lock();
        cursor.lost_count = buffer.lost_count;
        let entry = buffer.pop()?;
        cursor.next_index = entry.seq.saturating_add(1);
        Some(entry.event)
    }

    /// Close the stream and wake readers.
    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut buffer = self.buffer.lock();
        buffer.events.clear();
        buffer.head_seq = buffer.next_seq;
        drop(buffer);
        self.notify.notify_waiters();
    }

    /// True once closed.
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Cursor tracking progress through a subscription stream.
pub struct EventCursor {
    /// Global sequence number of the next event to consume.
    pub next_index: u64,
    /// Total number of events dropped for this cursor due to overflow.
    pub lost_count: u64,
    /// Subscription state.
    stream: Arc<StreamInner>,
}

impl EventCursor {
    /// Wrap a stream.
    fn new(stream: Arc<StreamInner>, start_index: u64) -> Self {
        Self {
            stream,
            next_index: start_index,
            lost_count: 0,
        }
    }

    /// True when the underlying stream has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stream.is_closed()
    }

    /// Pop the next buffered event without waiting.
    pub fn try_next(&mut self) -> Option<ChromeEvent> {
        let stream = self.stream.clone();
        stream.try_next(self)
    }

    /// Drain every buffered event without waiting.
    pub fn drain(&mut self) -> Vec<ChromeEvent> {
        let mut out = Vec::new();
        while let Some(ev) = self.try_next() {
            out.push(ev);
        }
        out
    }

    /// Await the next event until `deadline`, returning `None` on timeout or close.
    pub async fn next_until(&mut self, deadline: TokioInstant) -> Option<ChromeEvent> {
        let stream = self.stream.clone();
        loop {
            // Register interest before checking, so a push between the check
            // and the await is not missed.
            let notified = stream.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if let Some(event) = stream.try_next(self) {
                return Some(event);
            }
            if stream.is_closed() {
                return None;
            }
            if timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }
}

impl fmt::Debug for EventCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCursor")
            .field("next_index", &self.next_index)
            .field("lost_count", &self.lost_count)
            .finish_non_exhaustive()
    }
}

/// Lightweight event fan-out with per-subscriber ring buffers.
pub(crate) struct EventHub {
    /// Next sequence number.
    seq: AtomicU64,
    /// Per-subscriber ring capacity.
    capacity: usize,
    /// Live subscriptions.
    subscribers: Mutex<Vec<Weak<StreamInner>>>,
}

impl EventHub {
    /// Create a new hub with the given per-subscriber capacity.
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(8);
        Self {
            seq: AtomicU64::new(0),
            capacity,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribe to events published from now on.
    pub(crate) fn subscribe(&self) -> EventCursor {
        let start = self.seq.load(Ordering::SeqCst);
        let stream = StreamInner::new(start, self.capacity);
        self.subscribers.lock().push(Arc::downgrade(&stream));
        EventCursor::new(stream, start)
    }

    /// Publish an event to all subscribers.
    pub(crate) fn publish(&self, event: ChromeEvent) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        let mut stale = false;
        {
            let subscribers = self.subscribers.lock();
            for weak in subscribers.iter() {
                if let Some(stream) = weak.upgrade() {
                    stream.push(seq, &event);
                } else {
                    stale = true;
                }
            }
        }
        if stale {
            self.prune();
        }
    }

    /// Drop subscriptions whose cursors are gone.
    fn prune(&self) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|weak| weak.upgrade().is_some_and(|stream| !stream.is_closed()))
    }
}

impl Drop for EventHub {
    fn drop(&mut self) {
        let subscribers = self.subscribers.lock();
        for weak in subscribers.iter() {
            if let Some(stream) = weak.upgrade() {
                stream.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn shown(n: u64) -> ChromeEvent {
        ChromeEvent::FrameShown { frame: FrameId(n) }
    }

    #[test]
    fn subscribers_see_only_later_events() {
        let hub = EventHub::new(16);
        hub.publish(shown(1));
        let mut c = hub.subscribe();
        hub.publish(shown(2));
        assert_eq!(c.drain(), vec![shown(2)]);
        assert!(c.try_next().is_none());
    }

    #[test]
    fn overflow_drops_oldest_and_counts() {
        let hub = EventHub::new(8);
        let mut c = hub.subscribe();
        for i in 0..10 {
            hub.publish(shown(i));
        }
        let got = c.drain();
        assert_eq!(got.len(), 8);
        assert_eq!(got[0], shown(2));
        assert_eq!(c.lost_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn next_until_times_out_and_closes() {
        let hub = EventHub::new(8);
        let mut c = hub.subscribe();
        let deadline = TokioInstant::now() + Duration::from_millis(20);
        assert!(c.next_until(deadline).await.is_none());
        drop(hub);
        assert!(c.is_closed());
    }
}
