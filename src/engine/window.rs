//! Fixed-capacity FIFO of recent observations.

use crate::engine::observation::Observation;
use std::collections::VecDeque;

/// Most recent observations of one session, oldest first.
#[derive(Debug, Clone)]
pub struct ObservationWindow {
    capacity: usize,
    buffer: VecDeque<Observation>,
}

impl ObservationWindow {
    /// Creates an empty window. A zero capacity is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends an observation, evicting the oldest when full.
    pub fn push(&mut self, observation: Observation) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(observation);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterates the current contents in insertion order.
    ///
    /// The iterator is `Clone`, so a consumer can walk it more than once.
    pub fn snapshot(&self) -> impl Iterator<Item = &Observation> + Clone + '_ {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
