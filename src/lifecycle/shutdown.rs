//! Shutdown coordination.
//!
//! A single "stopping" flag lives in a `watch` channel, so a listener that
//! subscribes after the trigger still observes it.

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide shutdown flag. Cheap to clone; all clones share the flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }

    /// Raise the flag and return how many listeners were still waiting on it.
    pub fn trigger(&self) -> usize {
        let already = self.tx.send_replace(true);
        let listeners = self.tx.receiver_count();
        if !already {
            tracing::info!(listeners, "Shutdown triggered");
        }
        listeners
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to long-running tasks such as the HTTP server.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once shutdown is triggered, or when every [`Shutdown`] handle is gone.
    pub async fn recv(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
