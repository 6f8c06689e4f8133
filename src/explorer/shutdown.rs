//! Cooperative cancellation for an exploration session.

use std::time::Duration;

use tokio::sync::watch;

/// Sending half, held by whoever may stop the session (e.g. a Ctrl-C handler)
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Ask the session to stop at its next checkpoint
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half, checked by the explorer every iteration and while sleeping
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Sleep for `duration` unless shutdown is triggered first.
    ///
    /// Returns `false` if the sleep was cut short. A dropped trigger can never
    /// fire, so the full duration is slept in that case.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_triggered() {
            return false;
        }

        let triggered = async {
            if self.rx.wait_for(|stop| *stop).await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = triggered => false,
        }
    }
}
