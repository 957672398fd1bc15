use std::{hash::Hash, sync::Arc};

use dashmap::{mapref::entry::Entry, DashMap};

use super::{Admission, GuardStrategy, Slot};

/// Keys are spread over the shards of a [`DashMap`], so unrelated keys rarely
/// touch the same lock. Entries are removed as soon as their call completes.
pub struct ShardedStrategy<K, V, E> {
    table: DashMap<K, Arc<Slot<V, E>>>,
}

impl<K: Eq + Hash, V, E> ShardedStrategy<K, V, E> {
    pub fn new() -> Self {
        ShardedStrategy {
            table: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V, E> Default for ShardedStrategy<K, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, E> GuardStrategy<K, V, E> for ShardedStrategy<K, V, E>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send,
    E: Send + Sync,
{
    fn admit(&self, key: &K) -> Admission<V, E> {
        match self.table.entry(key.clone()) {
            Entry::Occupied(entry) => Admission::Follower(entry.get().clone()),
            Entry::Vacant(entry) => {
                let slot = Arc::new(Slot::new());
                entry.insert(slot.clone());
                Admission::Leader(slot)
            }
        }
    }

    fn release(&self, key: &K, slot: &Arc<Slot<V, E>>) {
        self.table
            .remove_if(key, |_, current| Arc::ptr_eq(current, slot));
    }

    fn in_flight(&self) -> usize {
        self.table.len()
    }
}
