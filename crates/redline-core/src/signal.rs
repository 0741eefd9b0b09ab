//! Resize and visibility signals from the host environment
//!
//! The host owns a [`SignalHub`] and emits a [`ViewportSignal`] whenever the
//! diff container changes size or becomes visible. Each viewport holds a
//! [`Subscription`]; dropping it removes the listener from the hub.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::mpsc;

/// Measurement event for a diff container
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    /// Container was resized to `height`
    Resized { height: f64 },
    /// Container was shown or hidden. Hidden containers report zero height.
    VisibilityChanged { visible: bool, height: f64 },
}

impl ViewportSignal {
    /// Height the viewport should adopt after this signal
    pub fn measured_height(self) -> f64 {
        match self {
            ViewportSignal::Resized { height } => height,
            ViewportSignal::VisibilityChanged { visible: true, height } => height,
            ViewportSignal::VisibilityChanged { visible: false, .. } => 0.0,
        }
    }
}

type Listeners = BTreeMap<u64, mpsc::Sender<ViewportSignal>>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Listeners,
}

/// Broadcasts viewport signals to every live subscription
#[derive(Clone, Default)]
pub struct SignalHub {
    inner: Rc<RefCell<HubInner>>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. The returned guard unsubscribes on drop.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.insert(id, tx);
        tracing::debug!(id, "viewport listener subscribed");
        Subscription {
            id,
            receiver: rx,
            hub: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver a signal to all listeners, pruning any whose receiver is gone
    pub fn emit(&self, signal: ViewportSignal) {
        let mut inner = self.inner.borrow_mut();
        inner
            .listeners
            .retain(|_, tx| tx.send(signal).is_ok());
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Live listener registration, released when dropped
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<ViewportSignal>,
    hub: Weak<RefCell<HubInner>>,
}

impl Subscription {
    /// Drain pending signals in arrival order
    pub fn drain(&self) -> Vec<ViewportSignal> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.remove(&self.id);
            tracing::debug!(id = self.id, "viewport listener released");
        }
    }
}
