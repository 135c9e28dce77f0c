//! In-process change notification.
//!
//! Every committed write publishes a [`StoreEvent`] to all live watchers,
//! replacing the implicit "re-read everything after every save" pattern the
//! original data layer relied on. Consumers subscribe, refresh the views
//! that name the changed collection, and ignore the rest.
//!
//! # Delivery Semantics
//!
//! - Events are published after the write commits, never before.
//! - Each watcher sees events in commit order.
//! - Channels are bounded. A watcher that stops draining its channel is
//!   disconnected rather than allowed to stall writers or grow unbounded.
//!   A disconnected watcher must resubscribe and re-read; the revision
//!   number carried by every event tells it how much it missed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use crate::storage::Collection;
use crate::types::UserId;

/// A change that was committed to the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A collection was rewritten.
    Collection {
        /// The collection that changed.
        collection: Collection,
        /// Store revision after this write.
        revision: u64,
    },
    /// The logged-in user changed.
    Session {
        /// The new session value (`None` after logout).
        user: Option<UserId>,
        /// Store revision after this write.
        revision: u64,
    },
}

impl StoreEvent {
    /// Returns the store revision this event was committed at.
    pub fn revision(&self) -> u64 {
        match self {
            StoreEvent::Collection { revision, .. } => *revision,
            StoreEvent::Session { revision, .. } => *revision,
        }
    }

    /// Returns true if this event is about the given collection.
    pub fn touches(&self, target: Collection) -> bool {
        matches!(self, StoreEvent::Collection { collection, .. } if *collection == target)
    }
}

/// Result of a non-blocking poll on a [`Watcher`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchPoll {
    /// An event was waiting.
    Event(StoreEvent),
    /// No event queued right now.
    Empty,
    /// The channel is gone: the hub dropped this watcher for lagging, or
    /// the database was closed. Resubscribe and re-read.
    Disconnected,
}

impl WatchPoll {
    /// Returns true if the watcher has been disconnected.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, WatchPoll::Disconnected)
    }
}

/// Receiving end of a watch subscription.
///
/// Dropping the watcher unsubscribes it; the hub prunes the dead channel
/// on its next broadcast.
#[derive(Debug)]
pub struct Watcher {
    id: u64,
    receiver: Receiver<StoreEvent>,
}

impl Watcher {
    /// Returns this watcher's hub-assigned id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Blocks until the next event arrives.
    ///
    /// Returns `None` once disconnected (dropped for lagging, or the
    /// database closed).
    pub fn recv(&self) -> Option<StoreEvent> {
        self.receiver.recv().ok()
    }

    /// Polls for an event without blocking.
    pub fn try_recv(&self) -> WatchPoll {
        match self.receiver.try_recv() {
            Ok(event) => WatchPoll::Event(event),
            Err(e) if e.is_disconnected() => WatchPoll::Disconnected,
            Err(_) => WatchPoll::Empty,
        }
    }
}

/// Broadcast hub for store change events.
///
/// Owned by the database facade; every committed write calls
/// [`WatchHub::broadcast`].
#[derive(Debug)]
pub struct WatchHub {
    subscribers: Mutex<Vec<(u64, Sender<StoreEvent>)>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl WatchHub {
    /// Creates a hub whose per-watcher channels hold `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            capacity,
        }
    }

    /// Registers a new watcher.
    pub fn subscribe(&self) -> Watcher {
        let (sender, receiver) = bounded(self.capacity);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock_subscribers().push((id, sender));
        debug!(watcher = id, "Watcher subscribed");
        Watcher { id, receiver }
    }

    /// Returns how many watchers are currently registered.
    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    /// Delivers an event to every live watcher.
    ///
    /// A watcher whose channel is full has stopped draining; it is
    /// disconnected here so one stalled consumer cannot block the rest.
    pub(crate) fn broadcast(&self, event: StoreEvent) {
        let mut subs = self.lock_subscribers();
        subs.retain(|(id, sender)| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(watcher = id, "Watcher lagging, disconnecting");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Sender<StoreEvent>)>> {
        // Broadcast only pushes complete events, so a poisoned lock still
        // holds a consistent subscriber list.
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }
}
