//! Typed publish/subscribe queue with deferred delivery.
//!
//! [`EventBus::enqueue`] never calls an observer. Events wait in a FIFO until
//! the next [`EventBus::poll`], which snapshots the queue on entry and hands
//! each snapshotted event to every observer of its type in registration order.
//! Anything enqueued while a poll is delivering (typically by an observer
//! through an [`EventSender`]) waits for the following poll.
//!
//! The queue is a crossbeam channel so that producers living on other threads
//! can enqueue through a cloned [`EventSender`]. The observer table itself is
//! owned by the loop thread.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, trace, warn};
use smallvec::SmallVec;
use std::fmt;

/// Dense tag of an event type.
///
/// Implementors are small enums numbered `0..COUNT`.
pub trait EventKind: Copy + Eq + fmt::Debug {
    /// Number of distinct kinds.
    const COUNT: usize;
    /// Position of this kind in `0..COUNT`.
    fn index(self) -> usize;
}

/// An event that can travel through an [`EventBus`].
pub trait BusEvent: fmt::Debug {
    type Kind: EventKind;
    fn kind(&self) -> Self::Kind;
}

/// Identifier returned by [`EventBus::add_observer`], unique per event kind.
pub type ObserverId = u32;

struct Observer<E> {
    id: ObserverId,
    callback: Box<dyn FnMut(&E)>,
}

/// Cloneable handle that enqueues into an [`EventBus`].
///
/// Observers capture one to raise follow-up events; those are delivered on the
/// next poll. If `E: Send` the handle can be moved to another thread.
pub struct EventSender<E> {
    tx: Sender<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> EventSender<E> {
    /// Enqueue an event. Returns `false` if the bus is gone.
    pub fn send(&self, event: E) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Event queue plus per-kind observer registry.
pub struct EventBus<E: BusEvent> {
    observers: Vec<SmallVec<[Observer<E>; 4]>>,
    next_ids: Vec<ObserverId>,
    tx: Sender<E>,
    rx: Receiver<E>,
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    /// Create a bus with an empty observer list for each of the
    /// `E::Kind::COUNT` kinds.
    pub fn new() -> Self {
        let count = <E::Kind as EventKind>::COUNT;
        let (tx, rx) = unbounded();
        Self {
            observers: (0..count).map(|_| SmallVec::new()).collect(),
            next_ids: vec![0; count],
            tx,
            rx,
        }
    }

    /// Append an event to the pending queue.
    pub fn enqueue(&self, event: E) {
        trace!("enqueue {:?}", event);
        // The receiver lives as long as `self`, so this cannot fail.
        let _ = self.tx.send(event);
    }

    /// Handle that enqueues into this bus.
    pub fn sender(&self) -> EventSender<E> {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Number of events waiting for the next poll.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Register `callback` for events of `kind`.
    pub fn add_observer<F>(&mut self, kind: E::Kind, callback: F) -> ObserverId
    where
        F: FnMut(&E) + 'static,
    {
        let index = kind.index();
        let id = self.next_ids[index];
        self.next_ids[index] += 1;
        self.observers[index].push(Observer {
            id,
            callback: Box::new(callback),
        });
        debug!("observer {} added for {:?}", id, kind);
        id
    }

    /// Remove an observer. Unknown ids are ignored and return `false`.
    pub fn remove_observer(&mut self, kind: E::Kind, id: ObserverId) -> bool {
        let list = &mut self.observers[kind.index()];
        let before = list.len();
        list.retain(|o| o.id != id);
        let removed = list.len() != before;
        if removed {
            debug!("observer {} removed from {:?}", id, kind);
        }
        removed
    }

    /// Number of observers registered for `kind`.
    pub fn observer_count(&self, kind: E::Kind) -> usize {
        self.observers[kind.index()].len()
    }

    /// Deliver everything that was pending when the call started.
    ///
    /// Returns the number of events drained from the queue.
    pub fn poll(&mut self) -> usize {
        let snapshot = self.rx.len();
        if snapshot == 0 {
            return 0;
        }
        let batch: Vec<E> = self.rx.try_iter().take(snapshot).collect();
        for event in batch.iter() {
            let Some(list) = self.observers.get_mut(event.kind().index()) else {
                warn!("event {:?} has a kind outside the bus range", event);
                continue;
            };
            for observer in list.iter_mut() {
                (observer.callback)(event);
            }
        }
        batch.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        A,
        B,
    }

    impl EventKind for Kind {
        const COUNT: usize = 2;
        fn index(self) -> usize {
            self as usize
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Ev {
        A(u32),
        B,
    }

    impl BusEvent for Ev {
        type Kind = Kind;
        fn kind(&self) -> Kind {
            match self {
                Ev::A(_) => Kind::A,
                Ev::B => Kind::B,
            }
        }
    }

    #[test]
    fn test_ids_are_monotonic_per_kind() {
        let mut bus: EventBus<Ev> = EventBus::new();
        assert_eq!(bus.add_observer(Kind::A, |_| {}), 0);
        assert_eq!(bus.add_observer(Kind::A, |_| {}), 1);
        assert_eq!(bus.add_observer(Kind::B, |_| {}), 0);
        assert!(bus.remove_observer(Kind::A, 0));
        assert_eq!(bus.add_observer(Kind::A, |_| {}), 2);
    }

    #[test]
    fn test_enqueue_does_not_deliver() {
        let mut bus: EventBus<Ev> = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.add_observer(Kind::A, move |e| sink.borrow_mut().push(e.clone()));
        bus.enqueue(Ev::A(1));
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.pending(), 1);
        assert_eq!(bus.poll(), 1);
        assert_eq!(*seen.borrow(), vec![Ev::A(1)]);
        assert_eq!(bus.pending(), 0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut bus: EventBus<Ev> = EventBus::new();
        bus.add_observer(Kind::B, |_| {});
        assert!(!bus.remove_observer(Kind::B, 42));
        assert!(!bus.remove_observer(Kind::A, 0));
        assert_eq!(bus.observer_count(Kind::B), 1);
    }

    #[test]
    fn test_poll_empty_returns_zero() {
        let mut bus: EventBus<Ev> = EventBus::new();
        assert_eq!(bus.poll(), 0);
        bus.enqueue(Ev::B);
        assert_eq!(bus.poll(), 1);
        assert_eq!(bus.poll(), 0);
    }
}
