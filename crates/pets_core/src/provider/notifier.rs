//! Change notification registry.
//!
//! # Responsibility
//! - Hand out subscriptions keyed by pets resource.
//! - Deliver a change signal to every subscription overlapping a changed resource.
//!
//! # Invariants
//! - Delivery is synchronous with the write that triggered it.
//! - Dropping a subscription removes it from the registry immediately.
//! - Signals carry no row data; subscribers re-run their query.

use super::uri::PetUri;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type ObserverList = Mutex<Vec<Observer>>;

struct Observer {
    id: u64,
    uri: PetUri,
    sender: Sender<PetUri>,
}

/// Live handle receiving change signals for one resource.
///
/// Dropping it unregisters it from the notifier that issued it.
pub struct ChangeSubscription {
    id: u64,
    uri: PetUri,
    receiver: Receiver<PetUri>,
    registry: Weak<ObserverList>,
}

impl ChangeSubscription {
    /// Resource this subscription observes.
    pub fn uri(&self) -> PetUri {
        self.uri
    }

    /// Returns the next pending change, if any.
    pub fn try_next(&self) -> Option<PetUri> {
        match self.receiver.try_recv() {
            Ok(changed) => Some(changed),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains pending changes and returns whether there was at least one.
    pub fn take_changed(&self) -> bool {
        let mut changed = false;
        while self.try_next().is_some() {
            changed = true;
        }
        changed
    }
}

impl Drop for ChangeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock_observers(&registry).retain(|observer| observer.id != self.id);
        }
    }
}

/// Publish/subscribe registry for pets resources.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Arc<ObserverList>,
    next_id: AtomicU64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest in `uri`.
    pub fn subscribe(&self, uri: PetUri) -> ChangeSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = channel();
        lock_observers(&self.observers).push(Observer { id, uri, sender });
        ChangeSubscription {
            id,
            uri,
            receiver,
            registry: Arc::downgrade(&self.observers),
        }
    }

    /// Signals every subscription overlapping `changed`.
    ///
    /// Returns the number of subscriptions reached.
    pub fn notify(&self, changed: PetUri) -> usize {
        let mut delivered = 0;
        let mut observers = lock_observers(&self.observers);
        observers.retain(|observer| {
            if !observer.uri.overlaps(changed) {
                return true;
            }
            let alive = observer.sender.send(changed).is_ok();
            if alive {
                delivered += 1;
            }
            alive
        });
        debug!(
            "event=change_notify module=provider status=ok uri={} delivered={} observers={}",
            changed,
            delivered,
            observers.len()
        );
        delivered
    }

    /// Number of live subscriptions.
    pub fn observer_count(&self) -> usize {
        lock_observers(&self.observers).len()
    }
}

fn lock_observers(observers: &ObserverList) -> MutexGuard<'_, Vec<Observer>> {
    // A panic while holding the lock leaves the list itself intact.
    observers
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
