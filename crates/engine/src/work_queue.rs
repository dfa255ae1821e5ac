//! Shared work queue for pool workers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// FIFO queue shared by every worker of a pool.
///
/// Cloning hands out another handle to the same queue. The lock is only held
/// for a push or pop, never across an `.await`.
#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Arc<Mutex<VecDeque<T>>>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> WorkQueue<T> {
    /// Create a queue pre-loaded with `items`, in order.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items.into_iter().collect())),
        }
    }

    /// Take the next item, or `None` once the queue is drained.
    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    pub fn push(&self, item: T) {
        self.lock().push_back(item);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A worker that panicked cannot leave the deque half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
