//! Fixed-capacity max-heap keyed on distance.
//!
//! Holds the best `capacity` candidates seen so far during a k-nearest
//! search; its maximum is the current pruning radius.

use std::cmp::{Ord, Ordering, PartialOrd};
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::median::cmp_scalar;
use crate::metric::Scalar;

struct HeapElem<F: Scalar, T> {
    dist: F,
    item: T
}

impl<F: Scalar, T> PartialOrd for HeapElem<F, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<F: Scalar, T> PartialEq for HeapElem<F, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<F: Scalar, T> Eq for HeapElem<F, T> {
}

impl<F: Scalar, T> Ord for HeapElem<F, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_scalar(&self.dist, &other.dist)
    }
}

pub struct BoundedMaxHeap<F: Scalar, T> {
    heap: BinaryHeap<HeapElem<F, T>>,
    capacity: usize
}

impl<F: Scalar, T> BoundedMaxHeap<F, T> {
    pub fn new(capacity: usize) -> Self {
        BoundedMaxHeap { heap: BinaryHeap::with_capacity(capacity + 1), capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Insert an entry, evicting the furthest one if that overflows the heap.
    ///
    /// Among equal distances, which entry is evicted is unspecified.
    pub fn push(&mut self, dist: F, item: T) {
        self.heap.push(HeapElem { dist, item });
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    pub fn pop_max(&mut self) -> Result<(F, T)> {
        self.heap.pop().map(|e| (e.dist, e.item)).ok_or(Error::EmptyHeap)
    }

    pub fn peek_max(&self) -> Result<F> {
        self.heap.peek().map(|e| e.dist).ok_or(Error::EmptyHeap)
    }

    /// Entries in ascending order of distance.
    pub fn into_sorted_vec(self) -> Vec<(F, T)> {
        self.heap.into_sorted_vec().into_iter().map(|e| (e.dist, e.item)).collect()
    }

    /// Entries in arbitrary order.
    pub fn into_vec(self) -> Vec<(F, T)> {
        self.heap.into_vec().into_iter().map(|e| (e.dist, e.item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedMaxHeap;
    use crate::error::Error;

    #[test]
    fn empty_heap_errors() {
        let mut h: BoundedMaxHeap<f64, ()> = BoundedMaxHeap::new(3);
        assert_eq!(h.peek_max(), Err(Error::EmptyHeap));
        assert!(h.pop_max().is_err());
        assert!(h.is_empty());
    }

    #[test]
    fn keeps_smallest_k() {
        let mut h = BoundedMaxHeap::new(3);
        for (i, d) in [5.0, 1.0, 4.0, 2.0, 8.0, 3.0].iter().enumerate() {
            h.push(*d, i);
            assert!(h.len() <= 3);
        }
        assert!(h.is_full());
        assert_eq!(h.peek_max(), Ok(3.0));
        assert_eq!(h.into_sorted_vec(), vec![(1.0, 1), (2.0, 3), (3.0, 5)]);
    }

    #[test]
    fn pop_in_descending_order() {
        let mut h = BoundedMaxHeap::new(10);
        for d in [0.5f32, 0.25, 0.75] {
            h.push(d, d.to_string());
        }
        assert_eq!(h.pop_max().map(|e| e.0), Ok(0.75));
        assert_eq!(h.pop_max().map(|e| e.0), Ok(0.5));
        assert_eq!(h.pop_max().map(|e| e.1), Ok("0.25".to_string()));
        assert_eq!(h.pop_max(), Err(Error::EmptyHeap));
    }
}
