use std::{
    collections::HashMap,
    hash::Hash,
    sync::{
        atomic::{AtomicU8, AtomicUsize, Ordering},
        Arc,
    },
};

use log::debug;
use parking_lot::Mutex;

use super::{admit_in, release_in, Admission, GuardStrategy, ShardedStrategy, Slot};

const SINGLE: u8 = 0;
const DRAINING: u8 = 1;
const SHARDED: u8 = 2;

/// Load observed by an [`AdaptiveStrategy`] while it still uses one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardStats {
    /// Keys in flight, including the one just admitted.
    pub in_flight_keys: usize,
    /// How often a caller found the lock already taken.
    pub contended_acquisitions: usize,
}

/// Decides when an [`AdaptiveStrategy`] switches to a per-key table.
pub trait EscalationPolicy: Send + Sync {
    fn should_escalate(&self, stats: &GuardStats) -> bool;
}

/// Escalates once either threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPolicy {
    pub max_keys: usize,
    pub max_contention: usize,
}

impl ThresholdPolicy {
    pub const DEFAULT_MAX_KEYS: usize = 64;
    pub const DEFAULT_MAX_CONTENTION: usize = 32;

    pub fn new(max_keys: usize, max_contention: usize) -> Self {
        ThresholdPolicy {
            max_keys,
            max_contention,
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_KEYS, Self::DEFAULT_MAX_CONTENTION)
    }
}

impl EscalationPolicy for ThresholdPolicy {
    fn should_escalate(&self, stats: &GuardStats) -> bool {
        stats.in_flight_keys >= self.max_keys || stats.contended_acquisitions >= self.max_contention
    }
}

impl<F> EscalationPolicy for F
where
    F: Fn(&GuardStats) -> bool + Send + Sync,
{
    fn should_escalate(&self, stats: &GuardStats) -> bool {
        self(stats)
    }
}

/// Starts with one lock and moves to a [`ShardedStrategy`] once the policy
/// asks for it. The switch is one-way.
///
/// After escalation, keys still in flight in the single-lock table are
/// drained there: callers for those keys keep joining them, all other keys go
/// to the sharded table. Once the old table is empty the single lock is no
/// longer taken at all.
pub struct AdaptiveStrategy<K, V, E, P = ThresholdPolicy> {
    mode: AtomicU8,
    contention: AtomicUsize,
    single: Mutex<HashMap<K, Arc<Slot<V, E>>>>,
    sharded: ShardedStrategy<K, V, E>,
    policy: P,
}

impl<K: Eq + Hash, V, E, P> AdaptiveStrategy<K, V, E, P> {
    pub fn new(policy: P) -> Self {
        AdaptiveStrategy {
            mode: AtomicU8::new(SINGLE),
            contention: AtomicUsize::new(0),
            single: Mutex::new(HashMap::new()),
            sharded: ShardedStrategy::new(),
            policy,
        }
    }

    pub fn is_escalated(&self) -> bool {
        self.mode.load(Ordering::Acquire) != SINGLE
    }
}

impl<K, V, E, P> GuardStrategy<K, V, E> for AdaptiveStrategy<K, V, E, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send,
    E: Send + Sync,
    P: EscalationPolicy,
{
    fn admit(&self, key: &K) -> Admission<V, E> {
        if self.mode.load(Ordering::Acquire) == SHARDED {
            return self.sharded.admit(key);
        }
        let mut table = match self.single.try_lock() {
            Some(table) => table,
            None => {
                self.contention.fetch_add(1, Ordering::Relaxed);
                self.single.lock()
            }
        };
        // Mode changes happen under the lock, so this read is authoritative.
        if self.mode.load(Ordering::Acquire) != SINGLE {
            if let Some(slot) = table.get(key) {
                return Admission::Follower(slot.clone());
            }
            return self.sharded.admit(key);
        }

        let admission = admit_in(&mut table, key);
        if let Admission::Leader(_) = admission {
            let stats = GuardStats {
                in_flight_keys: table.len(),
                contended_acquisitions: self.contention.load(Ordering::Relaxed),
            };
            if self.policy.should_escalate(&stats) {
                debug!(
                    "Escalating producer guard to a per-key table ({} keys in flight, {} contended acquisitions)",
                    stats.in_flight_keys, stats.contended_acquisitions
                );
                self.mode.store(DRAINING, Ordering::Release);
            }
        }
        admission
    }

    fn release(&self, key: &K, slot: &Arc<Slot<V, E>>) {
        if self.mode.load(Ordering::Acquire) == SHARDED {
            return self.sharded.release(key, slot);
        }
        let mut table = self.single.lock();
        if table.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            release_in(&mut table, key, slot);
            if table.is_empty() && self.mode.load(Ordering::Acquire) == DRAINING {
                debug!("Producer guard drained its single-lock table");
                self.mode.store(SHARDED, Ordering::Release);
            }
        } else {
            drop(table);
            self.sharded.release(key, slot);
        }
    }

    fn in_flight(&self) -> usize {
        let single = if self.mode.load(Ordering::Acquire) == SHARDED {
            0
        } else {
            self.single.lock().len()
        };
        single + self.sharded.in_flight()
    }
}
