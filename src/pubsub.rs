use crossbeam_channel::{unbounded, Sender};
use std::thread;

/// Publish/subscribe fan-out over per-subscriber event channels.
///
/// Each subscriber owns an unbounded channel drained by its own thread;
/// `publish` delivers a message to every live subscriber in subscription
/// order, and delivery per subscriber is in-order. `shutdown` closes all
/// event channels and joins the receiver threads.
#[derive(Debug, Default)]
pub struct Bus {
    subscribers: Vec<Subscriber>,
}

#[derive(Debug)]
struct Subscriber {
    id: usize,
    events: Sender<String>,
    handle: thread::JoinHandle<()>,
}

impl Bus {
    /// A bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and spawn its receiver thread.
    ///
    /// `on_event` is invoked on the subscriber's thread with the
    /// subscriber's id and each message, in delivery order. Returns the
    /// subscriber's 1-based id.
    pub fn subscribe<F>(&mut self, on_event: F) -> usize
    where
        F: FnMut(usize, &str) + Send + 'static,
    {
        let id = self.subscribers.len() + 1;
        let (events, inbox) = unbounded::<String>();
        let handle = thread::spawn(move || {
            let mut on_event = on_event;
            for event in inbox {
                on_event(id, &event);
            }
        });
        self.subscribers.push(Subscriber { id, events, handle });
        id
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `message` to every subscriber.
    pub fn publish(&self, message: &str) {
        for subscriber in &self.subscribers {
            if subscriber.events.send(message.to_owned()).is_err() {
                // Only reachable if the receiver thread panicked.
                tracing::warn!(id = subscriber.id, "subscriber dropped its inbox");
            }
        }
    }

    /// Close every event channel and join the receiver threads.
    ///
    /// All messages published before the call are still delivered.
    pub fn shutdown(self) {
        let mut handles = Vec::with_capacity(self.subscribers.len());
        for Subscriber { id, events, handle } in self.subscribers {
            drop(events);
            handles.push((id, handle));
        }
        for (id, handle) in handles {
            if handle.join().is_err() {
                tracing::warn!(id, "subscriber thread panicked");
            }
        }
    }
}
