//! Single-owner result collection.
//!
//! Workers never touch a shared list. Each one holds a clone of an mpsc
//! sender and a single collector task owns the buffer. The collector
//! finishes once every sender has been dropped.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Collects values sent by any number of producers.
#[derive(Debug)]
pub struct ResultCollector<T> {
    handle: JoinHandle<Vec<T>>,
}

impl<T: Send + 'static> ResultCollector<T> {
    /// Spawn the collector task and return the sender producers clone.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> (Self, mpsc::UnboundedSender<T>) {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut collected = Vec::new();
            while let Some(value) = receiver.recv().await {
                collected.push(value);
            }
            collected
        });
        (Self { handle }, sender)
    }

    /// Wait for every sender to be dropped and return what was collected,
    /// in arrival order.
    pub async fn finish(self) -> Result<Vec<T>, JoinError> {
        self.handle.await
    }
}
