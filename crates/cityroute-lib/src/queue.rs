//! Indexed binary min-heap with decrease-key.
//!
//! Every key's heap slot is tracked in a side map that is updated on each
//! swap, so `decrease_key` and `contains` never scan the heap.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct IndexedMinQueue<K> {
    heap: Vec<(K, f64)>,
    slots: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> IndexedMinQueue<K> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    /// Current priority of a queued key.
    pub fn priority(&self, key: K) -> Option<f64> {
        self.slots.get(&key).map(|&slot| self.heap[slot].1)
    }

    /// Lowest entry without removing it.
    pub fn peek(&self) -> Option<(K, f64)> {
        self.heap.first().copied()
    }

    /// Queue a new key. Returns `false`, leaving the queue untouched, when
    /// the key is already present.
    pub fn insert(&mut self, key: K, priority: f64) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        let slot = self.heap.len();
        self.heap.push((key, priority));
        self.slots.insert(key, slot);
        self.sift_up(slot);
        true
    }

    /// Remove and return the entry with the lowest priority.
    pub fn extract_min(&mut self) -> Option<(K, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (key, priority) = self.heap.pop()?;
        self.slots.remove(&key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((key, priority))
    }

    /// Lower a queued key's priority. Returns `true` only when the priority
    /// actually decreased.
    pub fn decrease_key(&mut self, key: K, priority: f64) -> bool {
        let Some(&slot) = self.slots.get(&key) else {
            return false;
        };
        if priority >= self.heap[slot].1 {
            return false;
        }
        self.heap[slot].1 = priority;
        self.sift_up(slot);
        true
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.heap[slot].1 >= self.heap[parent].1 {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < len && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].0, a);
        self.slots.insert(self.heap[b].0, b);
    }
}

impl<K: Copy + Eq + Hash> Default for IndexedMinQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
