use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::report::publisher::Publisher;
use crate::server::sse::format_sse_event;

/// Frames a subscriber may fall behind by before frames are dropped for it.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// A ready-to-write SSE frame, shared by every subscriber's queue.
pub type Frame = Arc<str>;

struct Subscriber {
    tx: SyncSender<Frame>,
    closed: Arc<AtomicBool>,
}

impl Subscriber {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// A viewer's end of the broadcast: the frame queue, readable through
/// `Deref<Target = Receiver<Frame>>`. Dropping it unsubscribes.
pub struct Subscription {
    rx: Receiver<Frame>,
    closed: Arc<AtomicBool>,
}

impl Deref for Subscription {
    type Target = Receiver<Frame>;

    fn deref(&self) -> &Receiver<Frame> {
        &self.rx
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}

struct Inner {
    subscribers: Vec<Subscriber>,
    /// Latest frame per event name, replayed to new subscribers.
    retained: Vec<(String, Frame)>,
}

/// Fan-out of SSE frames from the training thread to every connected viewer.
///
/// Each subscriber owns a bounded queue. `publish` formats the frame once
/// and offers it to every queue without blocking: a full queue loses that
/// frame, a closed queue is pruned. Training never waits on a viewer.
/// Viewers that left are also pruned on every `subscribe`, so a server that
/// outlives training does not accumulate them.
pub struct Broadcaster {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Broadcaster {
        Broadcaster {
            inner: Mutex::new(Inner { subscribers: Vec::new(), retained: Vec::new() }),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a new viewer. The returned queue already holds the latest
    /// frame of every event published so far.
    pub fn subscribe(&self) -> Subscription {
        let mut inner = self.lock();
        inner.subscribers.retain(|s| !s.is_closed());

        let (tx, rx) = mpsc::sync_channel(self.capacity.max(inner.retained.len()));
        for (_, frame) in &inner.retained {
            let _ = tx.try_send(frame.clone());
        }
        let closed = Arc::new(AtomicBool::new(false));
        inner.subscribers.push(Subscriber { tx, closed: closed.clone() });
        debug!(subscribers = inner.subscribers.len(), "viewer subscribed");
        Subscription { rx, closed }
    }

    /// Viewers still connected.
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|s| !s.is_closed());
        inner.subscribers.len()
    }

    fn broadcast(&self, event: &str, frame: Frame) {
        let mut inner = self.lock();

        match inner.retained.iter_mut().find(|(name, _)| name == event) {
            Some(slot) => slot.1 = frame.clone(),
            None => inner.retained.push((event.to_owned(), frame.clone())),
        }

        inner.subscribers.retain(|s| !s.is_closed() && match s.tx.try_send(frame.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(event, "viewer queue full, frame dropped");
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("viewer gone, unsubscribed");
                false
            }
        });
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Broadcaster::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl Publisher for Broadcaster {
    fn publish(&self, event: &str, json: &str) {
        self.broadcast(event, Arc::from(format_sse_event(event, json)));
    }
}
