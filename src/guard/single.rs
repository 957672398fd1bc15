use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use super::{admit_in, release_in, Admission, GuardStrategy, Slot};

/// Every key shares one mutex. Cheap while few keys are in flight.
pub struct SingleLockStrategy<K, V, E> {
    table: Mutex<HashMap<K, Arc<Slot<V, E>>>>,
}

impl<K, V, E> SingleLockStrategy<K, V, E> {
    pub fn new() -> Self {
        SingleLockStrategy {
            table: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V, E> Default for SingleLockStrategy<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> GuardStrategy<K, V, E> for SingleLockStrategy<K, V, E>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send,
    E: Send + Sync,
{
    fn admit(&self, key: &K) -> Admission<V, E> {
        admit_in(&mut self.table.lock(), key)
    }

    fn release(&self, key: &K, slot: &Arc<Slot<V, E>>) {
        release_in(&mut self.table.lock(), key, slot)
    }

    fn in_flight(&self) -> usize {
        self.table.lock().len()
    }
}
