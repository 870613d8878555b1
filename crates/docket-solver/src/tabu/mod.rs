//! Tabu memory over reverse-move signatures.

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::fmt::Debug;

use docket_core::{Move, Signature};

/// Bounded FIFO of `(meeting, dimension, old value)` signatures.
///
/// Every accepted reposition records its reverse signatures, so the next
/// moves cannot set those dimensions straight back. A candidate is tabu when
/// any of its own signatures is remembered.
///
/// # Example
///
/// ```
/// use docket_core::{Dimension, Signature};
/// use docket_solver::TabuMemory;
///
/// let mut tabu = TabuMemory::new(2);
/// let sig = Signature { meeting: 3, dimension: Dimension::Judge, value: 1 };
/// tabu.record([sig]);
/// assert!(tabu.contains(&sig));
/// ```
#[derive(Clone)]
pub struct TabuMemory {
    capacity: usize,
    entries: VecDeque<Signature>,
}

impl Debug for TabuMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabuMemory")
            .field("capacity", &self.capacity)
            .field("len", &self.entries.len())
            .finish()
    }
}

impl TabuMemory {
    /// Creates an empty memory remembering at most `capacity` signatures.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Remembers signatures, evicting the oldest beyond capacity.
    pub fn record(&mut self, signatures: impl IntoIterator<Item = Signature>) {
        if self.capacity == 0 {
            return;
        }
        for sig in signatures {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(sig);
        }
    }

    /// Records the reverse signatures of an accepted move.
    pub fn record_move(&mut self, mv: &Move) {
        self.record(mv.reverse_signatures());
    }

    pub fn contains(&self, signature: &Signature) -> bool {
        self.entries.contains(signature)
    }

    /// True when any dimension the move sets is currently forbidden.
    pub fn is_tabu(&self, mv: &Move) -> bool {
        mv.signatures().iter().any(|sig| self.contains(sig))
    }

    /// Aspiration: a tabu move is admitted when it would set a new best.
    pub fn aspires(current_total: i64, delta: i64, best_total: i64) -> bool {
        current_total + delta < best_total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
