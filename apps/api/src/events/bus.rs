use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tokio::sync::mpsc::{
    self,
    error::{TryRecvError, TrySendError},
    Receiver, Sender, UnboundedReceiver, UnboundedSender,
};
use uuid::Uuid;

use crate::domain::auction::events::AuctionEvent;

type Subscribers = HashMap<Uuid, Sink>;

/// Sending half of one subscriber queue
enum Sink {
    Unbounded(UnboundedSender<AuctionEvent>),
    /// Capped queue; the subscriber is cut off once it is full
    Bounded {
        sender: Sender<AuctionEvent>,
        overflowed: Arc<AtomicBool>,
    },
}

impl Sink {
    /// False when the subscriber must be pruned
    fn deliver(&self, event: &AuctionEvent) -> bool {
        match self {
            Sink::Unbounded(sender) => sender.send(event.clone()).is_ok(),
            Sink::Bounded { sender, overflowed } => match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    overflowed.store(true, Ordering::Release);
                    false
                }
                Err(TrySendError::Closed(_)) => false,
            },
        }
    }
}

/// Receiving half of one subscriber queue
enum Queue {
    Unbounded(UnboundedReceiver<AuctionEvent>),
    Bounded(Receiver<AuctionEvent>),
}

impl Queue {
    async fn recv(&mut self) -> Option<AuctionEvent> {
        match self {
            Queue::Unbounded(receiver) => receiver.recv().await,
            Queue::Bounded(receiver) => receiver.recv().await,
        }
    }

    fn try_recv(&mut self) -> Result<AuctionEvent, TryRecvError> {
        match self {
            Queue::Unbounded(receiver) => receiver.try_recv(),
            Queue::Bounded(receiver) => receiver.try_recv(),
        }
    }

    fn len(&self) -> usize {
        match self {
            Queue::Unbounded(receiver) => receiver.len(),
            Queue::Bounded(receiver) => receiver.len(),
        }
    }

    fn close(&mut self) {
        match self {
            Queue::Unbounded(receiver) => receiver.close(),
            Queue::Bounded(receiver) => receiver.close(),
        }
    }
}

/// In-process publish/subscribe hub for auction events
///
/// Every subscriber owns an independent queue, so a slow consumer never
/// blocks the publisher or any other subscriber. Events are delivered in
/// publish order to the subscribers registered at publish time; nothing is
/// replayed to late subscribers.
///
/// Cloning the bus yields another handle to the same subscriber set.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber that will see every event published from now on
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.register(Sink::Unbounded(sender), Queue::Unbounded(receiver), None)
    }

    /// Registers a subscriber whose queue holds at most `max_backlog` events
    ///
    /// A publish that finds the queue full detaches the subscriber; it can
    /// still drain what was queued, and [`Subscription::overflowed`] reports
    /// the cut-off.
    pub fn subscribe_with_limit(&self, max_backlog: usize) -> Subscription {
        let (sender, receiver) = mpsc::channel(max_backlog.max(1));
        let overflowed = Arc::new(AtomicBool::new(false));
        self.register(
            Sink::Bounded {
                sender,
                overflowed: Arc::clone(&overflowed),
            },
            Queue::Bounded(receiver),
            Some(overflowed),
        )
    }

    /// Fans `event` out to every registered subscriber
    ///
    /// Subscribers whose receiving half is gone, or whose capped queue is
    /// full, are pruned.
    pub fn publish(&self, event: AuctionEvent) {
        let mut subscribers = self.lock();
        subscribers.retain(|id, sink| {
            let delivered = sink.deliver(&event);
            if !delivered {
                tracing::debug!(subscriber = %id, "pruning event bus subscriber");
            }
            delivered
        });

        tracing::trace!(
            event_type = event.event_type(),
            subscribers = subscribers.len(),
            "event published"
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn register(&self, sink: Sink, queue: Queue, overflowed: Option<Arc<AtomicBool>>) -> Subscription {
        let id = Uuid::new_v4();
        self.lock().insert(id, sink);

        tracing::debug!(subscriber = %id, "event bus subscriber registered");

        Subscription {
            id,
            queue,
            overflowed,
            bus: Arc::downgrade(&self.subscribers),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        lock_subscribers(&self.subscribers)
    }
}

// A panic while holding the lock cannot leave the map half-updated, so a
// poisoned lock is still safe to use.
fn lock_subscribers(subscribers: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    subscribers
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Receive-only handle on one subscriber queue
///
/// Dropping the handle unsubscribes it; [`Subscription::unsubscribe`] does the
/// same explicitly and reports how many queued events were discarded.
pub struct Subscription {
    id: Uuid,
    queue: Queue,
    overflowed: Option<Arc<AtomicBool>>,
    bus: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Waits for the next event
    ///
    /// Returns `None` once the subscription has been detached from the bus
    /// and its queue is empty.
    pub async fn recv(&mut self) -> Option<AuctionEvent> {
        self.queue.recv().await
    }

    /// Returns the next queued event without waiting
    pub fn try_recv(&mut self) -> Option<AuctionEvent> {
        match self.queue.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Number of events queued but not yet received
    pub fn backlog(&self) -> usize {
        self.queue.len()
    }

    /// True once a capped subscription was cut off for falling behind
    pub fn overflowed(&self) -> bool {
        self.overflowed
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Detaches from the bus and discards everything still queued
    pub fn unsubscribe(mut self) -> usize {
        self.detach();
        self.queue.close();

        let mut discarded = 0;
        while self.queue.try_recv().is_ok() {
            discarded += 1;
        }

        tracing::debug!(subscriber = %self.id, discarded, "event bus subscriber removed");
        discarded
    }

    fn detach(&mut self) {
        if let Some(subscribers) = self.bus.upgrade() {
            lock_subscribers(&subscribers).remove(&self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
