//! Priority queue with `O(log n)` invalidation and rekeying over live
//! contractions, ordered by ascending error.
//!
//! Wraps the `priority_queue` crate the same way `node_contraction.rs`'s
//! contraction loop does: it already maintains an internal item -> heap-slot
//! map, so `remove`/`change_priority` are true `O(log n)` operations keyed
//! directly on the [`ContractionHandle`] — no separate generation counter
//! is needed to detect staleness.
use std::cmp::Reverse;

use priority_queue::PriorityQueue as ExtPriorityQueue;

use crate::constants::Real;
use crate::contraction::ContractionHandle;

/// Total ordering wrapper over [`Real`] so it can serve as a
/// `priority_queue` priority. NaN compares equal to itself and sorts below
/// every other value; quadric errors are never NaN in a well-formed
/// contraction (`build_contraction` rejects non-finite errors), so this is
/// purely a defensive fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ErrorKey(Real);

impl Eq for ErrorKey {}

impl PartialOrd for ErrorKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Min-heap over live contractions, keyed by [`ContractionHandle`].
pub struct ContractionQueue {
    queue: ExtPriorityQueue<ContractionHandle, Reverse<ErrorKey>>,
}

impl ContractionQueue {
    pub fn new() -> Self {
        ContractionQueue {
            queue: ExtPriorityQueue::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Inserts `handle` with the given `error`. If `handle` is already
    /// present its priority is updated instead (matches `PriorityQueue::push`).
    pub fn push(&mut self, handle: ContractionHandle, error: Real) {
        self.queue.push(handle, Reverse(ErrorKey(error)));
    }

    /// Removes and returns the handle with the smallest error, or `None` if
    /// the queue is empty.
    pub fn pop_min(&mut self) -> Option<(ContractionHandle, Real)> {
        self.queue.pop().map(|(handle, Reverse(ErrorKey(error)))| (handle, error))
    }

    /// Marks `handle`'s slot invalid by removing it outright; `O(log n)`.
    /// Returns `true` if the handle was present.
    pub fn invalidate(&mut self, handle: ContractionHandle) -> bool {
        self.queue.remove(&handle).is_some()
    }

    /// Rekeys `handle`'s slot to a new error in place, reusing the same
    /// queue slot instead of popping and re-pushing during neighborhood
    /// rewiring. Returns `true` if the handle was present.
    pub fn rekey(&mut self, handle: ContractionHandle, error: Real) -> bool {
        self.queue.change_priority(&handle, Reverse(ErrorKey(error))).is_some()
    }
}

impl Default for ContractionQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_ascending_error_order() {
        let mut q = ContractionQueue::new();
        q.push(0, 5.0);
        q.push(1, 1.0);
        q.push(2, 3.0);

        assert_eq!(q.pop_min(), Some((1, 1.0)));
        assert_eq!(q.pop_min(), Some((2, 3.0)));
        assert_eq!(q.pop_min(), Some((0, 5.0)));
        assert_eq!(q.pop_min(), None);
    }

    #[test]
    fn invalidate_removes_slot() {
        let mut q = ContractionQueue::new();
        q.push(0, 1.0);
        q.push(1, 2.0);
        assert!(q.invalidate(0));
        assert_eq!(q.pop_min(), Some((1, 2.0)));
        assert!(q.is_empty());
    }

    #[test]
    fn rekey_changes_pop_order() {
        let mut q = ContractionQueue::new();
        q.push(0, 1.0);
        q.push(1, 2.0);
        assert!(q.rekey(0, 5.0));
        assert_eq!(q.pop_min(), Some((1, 2.0)));
        assert_eq!(q.pop_min(), Some((0, 5.0)));
    }
}
