use std::{
    sync::Arc,
    thread::{self, ThreadId},
    time::Instant,
};

use parking_lot::{Condvar, Mutex};

use super::GuardError;

#[derive(Debug)]
pub(crate) enum Outcome<V, E> {
    Value(V),
    Failure(Arc<E>),
    Abandoned,
}

impl<V: Clone, E> Outcome<V, E> {
    pub(crate) fn to_result(&self) -> Result<V, GuardError<E>> {
        match self {
            Outcome::Value(value) => Ok(value.clone()),
            Outcome::Failure(error) => Err(GuardError::ProducerFailure(error.clone())),
            Outcome::Abandoned => Err(GuardError::ProducerAbandoned),
        }
    }
}

enum State<V, E> {
    Running { waiters: usize },
    Done(Outcome<V, E>),
}

/// One in-flight call: the thread running the producer and whoever joined it.
pub struct Slot<V, E> {
    owner: ThreadId,
    state: Mutex<State<V, E>>,
    ready: Condvar,
}

impl<V, E> Slot<V, E> {
    /// A running slot owned by the current thread.
    pub fn new() -> Self {
        Slot {
            owner: thread::current().id(),
            state: Mutex::new(State::Running { waiters: 0 }),
            ready: Condvar::new(),
        }
    }

    pub fn is_owned_by_current_thread(&self) -> bool {
        self.owner == thread::current().id()
    }

    /// Number of callers currently blocked on this slot.
    pub fn waiters(&self) -> usize {
        match &*self.state.lock() {
            State::Running { waiters } => *waiters,
            State::Done(_) => 0,
        }
    }

    pub(crate) fn publish(&self, outcome: Outcome<V, E>) {
        *self.state.lock() = State::Done(outcome);
        self.ready.notify_all();
    }
}

impl<V: Clone, E> Slot<V, E> {
    /// Blocks until the outcome is published or `deadline` passes. A waiter
    /// that times out leaves without disturbing the producer or other waiters.
    pub(crate) fn wait(&self, deadline: Option<Instant>) -> Result<V, GuardError<E>> {
        let mut state = self.state.lock();
        if let State::Running { waiters } = &mut *state {
            *waiters += 1;
        }
        loop {
            if let State::Done(outcome) = &*state {
                return outcome.to_result();
            }
            match deadline {
                None => self.ready.wait(&mut state),
                Some(deadline) => {
                    if self.ready.wait_until(&mut state, deadline).timed_out() {
                        match &mut *state {
                            State::Done(outcome) => return outcome.to_result(),
                            State::Running { waiters } => {
                                *waiters -= 1;
                                return Err(GuardError::Timeout);
                            }
                        }
                    }
                }
            }
        }
    }
}

impl<V, E> Default for Slot<V, E> {
    fn default() -> Self {
        Self::new()
    }
}
