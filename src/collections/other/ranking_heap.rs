//! `RankingHeap`: a fixed-capacity binary max-heap.
//!
//! Array-backed and 0-indexed: `parent(k) = (k - 1) / 2`,
//! `left(k) = 2k + 1`, `right(k) = 2k + 2`. The capacity is chosen up
//! front and never grows; pushing into a full heap is an error.
//!
//! [`heap_sort`] is a separate in-place entry point that reuses the same
//! sift-down over an arbitrary slice.

use core::fmt;

use thiserror::Error;

/// Error returned on heap misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `push` on a heap already holding `capacity` items.
    #[error("heap overflow: capacity {capacity} reached")]
    Overflow {
        /// Fixed heap capacity.
        capacity: usize,
    },
    /// `pop` or `top` on an empty heap.
    #[error("heap underflow: heap is empty")]
    Underflow,
}

#[inline]
fn parent(k: usize) -> usize {
    (k - 1) / 2
}

#[inline]
fn left(k: usize) -> usize {
    2 * k + 1
}

#[inline]
fn right(k: usize) -> usize {
    2 * k + 2
}

/// Restores the max-heap property below `node` within `data[..len]`.
fn sift_down<T: Ord>(data: &mut [T], len: usize, mut node: usize) {
    loop {
        let l = left(node);
        if l >= len {
            break;
        }
        let r = right(node);
        let mut greater = l;
        if r < len && data[l] < data[r] {
            greater = r;
        }
        if data[node] < data[greater] {
            data.swap(node, greater);
            node = greater;
        } else {
            break;
        }
    }
}

/// Sorts `data` ascending in place.
///
/// Builds a max-heap bottom-up from the last parent to the root, then
/// repeatedly moves the root behind the shrinking unsorted prefix.
/// \(O(n \log n)\), not stable.
pub fn heap_sort<T: Ord>(data: &mut [T]) {
    let n = data.len();
    for k in (0..n / 2).rev() {
        sift_down(data, n, k);
    }
    for end in (1..n).rev() {
        data.swap(0, end);
        sift_down(data, end, 0);
    }
}

/// A max-heap whose capacity is fixed at construction.
pub struct RankingHeap<T> {
    data: Vec<T>,
    capacity: usize,
}

impl<T: Ord> RankingHeap<T> {
    /// Creates an empty heap able to hold `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the number of items in the heap.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes an item.
    ///
    /// # Errors
    /// [`HeapError::Overflow`] if the heap is full; the item is dropped.
    pub fn push(&mut self, item: T) -> Result<(), HeapError> {
        if self.data.len() == self.capacity {
            return Err(HeapError::Overflow {
                capacity: self.capacity,
            });
        }
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
        Ok(())
    }

    /// Removes and returns the greatest item.
    ///
    /// # Errors
    /// [`HeapError::Underflow`] if the heap is empty.
    pub fn pop(&mut self) -> Result<T, HeapError> {
        if self.data.is_empty() {
            return Err(HeapError::Underflow);
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let item = self.data.pop().ok_or(HeapError::Underflow)?;
        let len = self.data.len();
        sift_down(&mut self.data, len, 0);
        Ok(item)
    }

    /// Returns the greatest item without removing it.
    ///
    /// # Errors
    /// [`HeapError::Underflow`] if the heap is empty.
    pub fn top(&self) -> Result<&T, HeapError> {
        self.data.first().ok_or(HeapError::Underflow)
    }

    /// Pops every item, greatest first.
    pub fn drain_sorted(&mut self) -> impl Iterator<Item = T> + '_ {
        core::iter::from_fn(move || self.pop().ok())
    }

    /// Sorts `data` ascending in place. See [`heap_sort`].
    pub fn heap_sort(data: &mut [T]) {
        heap_sort(data);
    }

    fn sift_up(&mut self, mut node: usize) {
        while node > 0 {
            let p = parent(node);
            if self.data[p] < self.data[node] {
                self.data.swap(p, node);
                node = p;
            } else {
                break;
            }
        }
    }
}

impl<T> RankingHeap<T> {
    /// Iterates over all items in heap order (not sorted).
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for RankingHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingHeap")
            .field("len", &self.data.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_heap_basic() {
        let mut heap = RankingHeap::with_capacity(4);
        heap.push(1).unwrap();
        heap.push(5).unwrap();
        heap.push(2).unwrap();
        heap.push(10).unwrap();

        assert_eq!(heap.top(), Ok(&10));
        assert_eq!(heap.pop(), Ok(10));
        assert_eq!(heap.top(), Ok(&5));
        assert_eq!(heap.pop(), Ok(5));
        assert_eq!(heap.pop(), Ok(2));
        assert_eq!(heap.pop(), Ok(1));
        assert_eq!(heap.pop(), Err(HeapError::Underflow));
        assert_eq!(heap.top(), Err(HeapError::Underflow));
    }

    #[test]
    fn test_overflow_keeps_contents() {
        let mut heap = RankingHeap::with_capacity(2);
        heap.push(3).unwrap();
        heap.push(7).unwrap();
        assert_eq!(heap.push(9), Err(HeapError::Overflow { capacity: 2 }));
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.top(), Ok(&7));
    }

    #[test]
    fn test_zero_capacity() {
        let mut heap: RankingHeap<u8> = RankingHeap::with_capacity(0);
        assert!(heap.is_empty());
        assert_eq!(heap.push(1), Err(HeapError::Overflow { capacity: 0 }));
        assert_eq!(heap.pop(), Err(HeapError::Underflow));
    }

    #[test]
    fn test_drain_sorted_with_duplicates() {
        let data = vec![4, 1, 4, 9, 0, 9, 3];
        let mut heap = RankingHeap::with_capacity(data.len());
        for &x in &data {
            heap.push(x).unwrap();
        }
        let drained: Vec<_> = heap.drain_sorted().collect();
        assert_eq!(drained, vec![9, 9, 4, 4, 3, 1, 0]);
        assert!(heap.is_empty());
        // Capacity is reusable after draining.
        heap.push(5).unwrap();
        assert_eq!(heap.top(), Ok(&5));
    }

    #[test]
    fn test_heap_property_in_storage() {
        let mut heap = RankingHeap::with_capacity(16);
        for x in [5, 3, 8, 1, 9, 2, 7, 6, 4, 0] {
            heap.push(x).unwrap();
        }
        let items: Vec<_> = heap.iter().copied().collect();
        for k in 1..items.len() {
            assert!(items[parent(k)] >= items[k]);
        }
    }

    #[test]
    fn test_heap_sort_small_inputs() {
        let mut empty: [i32; 0] = [];
        heap_sort(&mut empty);

        let mut one = [42];
        heap_sort(&mut one);
        assert_eq!(one, [42]);

        let mut two = [2, 1];
        RankingHeap::heap_sort(&mut two);
        assert_eq!(two, [1, 2]);

        let mut words = ["pear", "apple", "fig", "apple"];
        heap_sort(&mut words);
        assert_eq!(words, ["apple", "apple", "fig", "pear"]);
    }
}
