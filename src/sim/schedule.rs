//! Deferred task queue
//!
//! Continuations wake at a simulated time and run on the tick thread, earliest
//! first (insertion order breaks ties). Each carries a `Token` naming what it
//! belongs to; once that owner is gone the task is cancelled instead of run.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Scope a deferred task is tied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Valid while the phase entered at this epoch is current
    Phase(u64),
    /// Valid for the run started with this session id
    Session(u64),
    /// Valid while this activation of the entity is alive
    Entity { id: EntityId, generation: u32 },
}

/// A task waiting for its wake time
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pub wake_at: f64,
    pub token: Token,
    pub task: T,
    seq: u64,
}

impl<T> PartialEq for Deferred<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Deferred<T> {}

impl<T> PartialOrd for Deferred<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Deferred<T> {
    // Reversed so the max-heap pops the earliest wake time first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .wake_at
            .total_cmp(&self.wake_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Wake-time ordered queue of deferred tasks
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    heap: BinaryHeap<Deferred<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` to run once the clock reaches `wake_at`
    pub fn schedule(&mut self, wake_at: f64, token: Token, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Deferred {
            wake_at,
            token,
            task,
            seq,
        });
    }

    /// Remove and return the earliest task due at `now`
    pub fn pop_due(&mut self, now: f64) -> Option<Deferred<T>> {
        if self.heap.peek()?.wake_at <= now {
            self.heap.pop()
        } else {
            None
        }
    }

    /// Drop every task whose token matches. Returns how many were dropped.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&Token) -> bool) -> usize {
        let before = self.heap.len();
        self.heap.retain(|d| !pred(&d.token));
        before - self.heap.len()
    }

    pub fn next_wake(&self) -> Option<f64> {
        self.heap.peek().map(|d| d.wake_at)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
