//! Mount/teardown lifecycle shared by the builder and its collaborators
//!
//! Teardown is a one-way latch. In-flight awaits raced through
//! [`Lifecycle::guard`] resolve to `None` as soon as it flips, so nothing
//! writes state after the view is gone.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable teardown latch
#[derive(Debug, Clone)]
pub struct Lifecycle {
    tx: Arc<watch::Sender<bool>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Flip the latch; every guarded await is abandoned
    pub fn teardown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_torn_down(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once teardown has happened
    pub async fn torn_down(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|down| *down).await;
    }

    /// Run `fut` unless teardown happens first
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_torn_down() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.torn_down() => None,
            out = fut => Some(out),
        }
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
