//! Bounded top-N selection
//!
//! Retains the N largest items seen across an arbitrarily long stream in
//! O(N) memory. Backed by a binary min-heap so the smallest retained item is
//! inspectable in O(1) and replaceable in O(log N).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Anything rankable by a byte size.
pub trait Sizeable {
    /// Size in bytes used for ranking.
    fn size(&self) -> u64;
}

/// Heap entry ordered by size alone; payloads never participate in the
/// comparison, so ties between equal sizes stay unordered.
#[derive(Debug, Clone)]
struct BySize<T>(T);

impl<T: Sizeable> PartialEq for BySize<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.size() == other.0.size()
    }
}

impl<T: Sizeable> Eq for BySize<T> {}

impl<T: Sizeable> PartialOrd for BySize<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Sizeable> Ord for BySize<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.size().cmp(&other.0.size())
    }
}

/// Fixed-capacity selector for the largest items in a stream.
///
/// Below capacity every offered item is kept. At capacity an item displaces
/// the current minimum only when its size is strictly greater; equal-sized
/// items are discarded. Capacity zero never retains anything.
#[derive(Debug, Clone)]
pub struct BoundedTopN<T: Sizeable> {
    capacity: usize,
    heap: BinaryHeap<Reverse<BySize<T>>>,
}

impl<T: Sizeable> BoundedTopN<T> {
    /// Create a selector retaining at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Offer one item. O(log capacity).
    pub fn add(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(BySize(item)));
            return;
        }
        if let Some(mut min) = self.heap.peek_mut() {
            if item.size() > min.0 .0.size() {
                // PeekMut sifts the replacement down on drop.
                *min = Reverse(BySize(item));
            }
        }
    }

    /// Number of items currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing has been retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Size of the smallest retained item, if any.
    pub fn min_size(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.0.size())
    }

    /// Consume the selector and materialize its items, largest first.
    pub fn into_sorted_desc(self) -> Vec<T> {
        let mut items: Vec<T> = self
            .heap
            .into_iter()
            .map(|Reverse(BySize(item))| item)
            .collect();
        items.sort_by(|a, b| b.size().cmp(&a.size()));
        items
    }
}
