use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use tokio::sync::oneshot;

/// Correlation table mapping an in-flight request id to the caller waiting on
/// its callback.
///
/// Insertion happens at request start; removal happens exactly once, when the
/// callback is delivered. Access is serialized through the inner lock so the
/// table can be shared with the vendor queue's delivery context, whatever
/// thread that is.
pub struct PendingRequests<T> {
    inner: Mutex<HashMap<String, oneshot::Sender<T>>>,
}

impl<T> PendingRequests<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a waiter for `request_id` and returns the receiving half.
    ///
    /// A previous waiter under the same id is dropped, which resolves its
    /// receiver with a cancellation error.
    pub fn insert(&self, request_id: &str) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        self.lock().insert(request_id.to_owned(), tx);
        rx
    }

    /// Delivers `value` to the waiter for `request_id`, removing the entry.
    ///
    /// Returns false when no waiter was registered, either because the
    /// callback was already delivered or the request was never started. The
    /// entry is removed even if the waiter has since been abandoned.
    pub fn complete(&self, request_id: &str, value: T) -> bool {
        match self.lock().remove(request_id) {
            Some(tx) => {
                // Send only fails if the receiver was dropped; the cleanup
                // already happened either way.
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, request_id: &str) -> bool {
        self.lock().contains_key(request_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, oneshot::Sender<T>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for PendingRequests<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_exactly_once_and_removes_entry() {
        let table: PendingRequests<u32> = PendingRequests::new();
        let rx = table.insert("r1");

        assert!(table.contains("r1"));
        assert!(table.complete("r1", 7));
        assert!(!table.contains("r1"));
        assert_eq!(rx.await.unwrap(), 7);

        // Second delivery finds no waiter.
        assert!(!table.complete("r1", 8));
    }

    #[tokio::test]
    async fn test_unknown_id_is_ignored() {
        let table: PendingRequests<u32> = PendingRequests::new();
        assert!(!table.complete("never-started", 1));
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_reinsert_cancels_previous_waiter() {
        let table: PendingRequests<u32> = PendingRequests::new();
        let first = table.insert("r1");
        let second = table.insert("r1");

        assert_eq!(table.len(), 1);
        assert!(first.await.is_err());
        assert!(table.complete("r1", 9));
        assert_eq!(second.await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_abandoned_waiter_still_cleans_up() {
        let table: PendingRequests<u32> = PendingRequests::new();
        let rx = table.insert("r1");
        drop(rx);

        assert!(table.complete("r1", 1));
        assert!(table.is_empty());
    }
}
