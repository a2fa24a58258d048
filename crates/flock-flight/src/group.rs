//! Per-key coalescing of concurrent async computations.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, trace};

/// Completion slot of an in-flight call: `None` until the leader publishes.
type Outcome<T, E> = Option<Result<T, E>>;

/// Collapses concurrent calls for the same key into a single execution.
///
/// The first caller for a key becomes the leader and runs its computation.
/// Callers that arrive while that call is in flight wait for it and receive
/// a clone of its result, without running their own computation. Once the
/// result is published the call is forgotten, so the next caller for that
/// key starts a fresh execution. Nothing is cached.
pub struct Group<T, E> {
    /// In-flight calls. Only held for map lookups, never across an await.
    calls: Mutex<HashMap<String, watch::Receiver<Outcome<T, E>>>>,
}

enum Role<T, E> {
    Leader(watch::Sender<Outcome<T, E>>),
    Follower(watch::Receiver<Outcome<T, E>>),
}

impl<T, E> Group<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` for `key` unless a call for `key` is already in flight, in
    /// which case wait for that call and return its result.
    ///
    /// Every caller that joins the same call observes the same `Ok` value
    /// or the same error. There is no timeout: a follower returns only once
    /// the leader's computation finishes.
    ///
    /// If the leader's future is dropped or panics before finishing, its
    /// followers are released and retry; one of them becomes the new leader
    /// and runs its own `f`.
    pub async fn work<F, Fut>(&self, key: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let tx = loop {
            let mut rx = match self.join_or_lead(key) {
                Role::Leader(tx) => break tx,
                Role::Follower(rx) => rx,
            };

            trace!(key, "joining in-flight call");
            let outcome = match rx.wait_for(Option::is_some).await {
                Ok(done) => (*done).clone(),
                Err(_) => None,
            };
            if let Some(result) = outcome {
                return result;
            }
            debug!(key, "in-flight call abandoned by its leader, retrying");
        };

        let call = Call {
            calls: &self.calls,
            key,
            tx,
        };
        let result = f().await;
        call.complete(&result);
        result
    }

    /// Number of calls currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().expect("call map lock poisoned").len()
    }

    fn join_or_lead(&self, key: &str) -> Role<T, E> {
        let mut calls = self.calls.lock().expect("call map lock poisoned");
        if let Some(rx) = calls.get(key) {
            return Role::Follower(rx.clone());
        }
        let (tx, rx) = watch::channel(None);
        calls.insert(key.to_owned(), rx);
        Role::Leader(tx)
    }
}

impl<T, E> Default for Group<T, E>
where
    T: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Group<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let in_flight = self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Group")
            .field("in_flight", &in_flight)
            .finish_non_exhaustive()
    }
}

/// The leader's registration in the call map.
///
/// Dropping it without calling [`complete`](Call::complete) unregisters the
/// call and closes the channel, which wakes followers so they can retry.
struct Call<'a, T, E> {
    calls: &'a Mutex<HashMap<String, watch::Receiver<Outcome<T, E>>>>,
    key: &'a str,
    tx: watch::Sender<Outcome<T, E>>,
}

impl<T, E> Call<'_, T, E>
where
    T: Clone,
    E: Clone,
{
    /// Publish the result and unregister the call in one critical section.
    fn complete(&self, result: &Result<T, E>) {
        let mut calls = self.calls.lock().expect("call map lock poisoned");
        self.tx.send_replace(Some(result.clone()));
        calls.remove(self.key);
    }
}

impl<T, E> Drop for Call<'_, T, E> {
    fn drop(&mut self) {
        if self.tx.borrow().is_some() {
            return;
        }
        // Still registered: nobody else can insert under this key until
        // we remove it.
        if let Ok(mut calls) = self.calls.lock() {
            calls.remove(self.key);
        }
    }
}
