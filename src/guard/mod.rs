//! Per-key deduplication of concurrent work.
//!
//! A [`ProducerGuard`] makes sure that, for any key, at most one producer
//! runs at a time. Callers arriving while a producer is running for their key
//! wait for it and share its outcome instead of running their own.

mod adaptive;
mod sharded;
mod single;
mod slot;

pub use adaptive::{AdaptiveStrategy, EscalationPolicy, GuardStats, ThresholdPolicy};
pub use sharded::ShardedStrategy;
pub use single::SingleLockStrategy;
pub use slot::Slot;

use std::{
    collections::HashMap,
    hash::Hash,
    sync::Arc,
    time::{Duration, Instant},
};

use log::trace;
use thiserror::Error;

use slot::Outcome;

#[derive(Error, Debug)]
pub enum GuardError<E> {
    #[error("Producer re-entered the guard with a key it is already producing")]
    ReentrantGuardViolation,
    #[error("Producer failed: {0}")]
    ProducerFailure(Arc<E>),
    #[error("Producer panicked before publishing a result")]
    ProducerAbandoned,
    #[error("Timed out waiting for the in-flight producer")]
    Timeout,
}

/// Result of registering a call with a strategy.
pub enum Admission<V, E> {
    /// No call was in flight; the caller must run the producer.
    Leader(Arc<Slot<V, E>>),
    /// Another call is in flight; the caller waits on its slot.
    Follower(Arc<Slot<V, E>>),
}

/// Bookkeeping of in-flight calls.
pub trait GuardStrategy<K, V, E>: Send + Sync {
    fn admit(&self, key: &K) -> Admission<V, E>;

    /// Forgets `slot` once its outcome is published. A slot that is no longer
    /// registered for `key` is ignored.
    fn release(&self, key: &K, slot: &Arc<Slot<V, E>>);

    fn in_flight(&self) -> usize;
}

fn admit_in<K, V, E>(table: &mut HashMap<K, Arc<Slot<V, E>>>, key: &K) -> Admission<V, E>
where
    K: Eq + Hash + Clone,
{
    if let Some(slot) = table.get(key) {
        return Admission::Follower(slot.clone());
    }
    let slot = Arc::new(Slot::new());
    table.insert(key.clone(), slot.clone());
    Admission::Leader(slot)
}

fn release_in<K, V, E>(table: &mut HashMap<K, Arc<Slot<V, E>>>, key: &K, slot: &Arc<Slot<V, E>>)
where
    K: Eq + Hash,
{
    if table
        .get(key)
        .is_some_and(|current| Arc::ptr_eq(current, slot))
    {
        table.remove(key);
    }
}

pub struct ProducerGuard<K, V, E> {
    strategy: Box<dyn GuardStrategy<K, V, E>>,
}

impl<K, V, E> ProducerGuard<K, V, E>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + 'static,
    E: Send + Sync + 'static,
{
    pub fn new(strategy: impl GuardStrategy<K, V, E> + 'static) -> Self {
        ProducerGuard {
            strategy: Box::new(strategy),
        }
    }

    /// One lock over the whole key table.
    pub fn single_lock() -> Self {
        Self::new(SingleLockStrategy::new())
    }

    /// A sharded per-key table.
    pub fn sharded() -> Self {
        Self::new(ShardedStrategy::new())
    }

    /// Starts single-lock and escalates to a sharded table under load.
    pub fn adaptive() -> Self {
        Self::adaptive_with(ThresholdPolicy::default())
    }

    pub fn adaptive_with(policy: impl EscalationPolicy + 'static) -> Self {
        Self::new(AdaptiveStrategy::new(policy))
    }

    /// Runs `producer` unless a call for `key` is already in flight, in which
    /// case this call waits for that one and returns its outcome.
    ///
    /// Producers must not call back into the guard with the key they are
    /// producing; doing so fails with [`GuardError::ReentrantGuardViolation`].
    pub fn run_exclusive<F>(&self, key: K, producer: F) -> Result<V, GuardError<E>>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.run(key, None, producer)
    }

    /// Like [`run_exclusive`](Self::run_exclusive), but a caller that has to
    /// wait gives up after `timeout`. A caller that runs the producer itself
    /// is not limited.
    pub fn run_exclusive_timeout<F>(
        &self,
        key: K,
        timeout: Duration,
        producer: F,
    ) -> Result<V, GuardError<E>>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.run(key, Some(Instant::now() + timeout), producer)
    }

    pub fn in_flight(&self) -> usize {
        self.strategy.in_flight()
    }

    fn run<F>(&self, key: K, deadline: Option<Instant>, producer: F) -> Result<V, GuardError<E>>
    where
        F: FnOnce() -> Result<V, E>,
    {
        match self.strategy.admit(&key) {
            Admission::Leader(slot) => {
                let mut completion = Completion {
                    strategy: self.strategy.as_ref(),
                    key: &key,
                    slot: &slot,
                    published: false,
                };
                let outcome = match producer() {
                    Ok(value) => Outcome::Value(value),
                    Err(error) => Outcome::Failure(Arc::new(error)),
                };
                let result = outcome.to_result();
                completion.publish(outcome);
                result
            }
            Admission::Follower(slot) => {
                if slot.is_owned_by_current_thread() {
                    return Err(GuardError::ReentrantGuardViolation);
                }
                trace!("Joining an in-flight producer");
                slot.wait(deadline)
            }
        }
    }
}

/// Publishes the outcome and frees the key, also when the producer unwinds.
struct Completion<'a, K, V, E> {
    strategy: &'a dyn GuardStrategy<K, V, E>,
    key: &'a K,
    slot: &'a Arc<Slot<V, E>>,
    published: bool,
}

impl<K, V, E> Completion<'_, K, V, E> {
    fn publish(&mut self, outcome: Outcome<V, E>) {
        self.slot.publish(outcome);
        self.strategy.release(self.key, self.slot);
        self.published = true;
    }
}

impl<K, V, E> Drop for Completion<'_, K, V, E> {
    fn drop(&mut self) {
        if !self.published {
            self.publish(Outcome::Abandoned);
        }
    }
}
