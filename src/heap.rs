//! Binary min-heap whose ordering key is supplied on every call.
//!
//! `std::collections::BinaryHeap` freezes an item's priority when it is
//! pushed. The shortest-path engine instead orders cell IDs by a distance table
//! it keeps mutating, so the key function here is passed to `push` and
//! `pop_min` and always reads the current value. Pushing the same item twice is
//! allowed.

/// Min-heap over `T`, ordered by a caller-supplied key
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert an item in O(log n)
    pub fn push<K, F>(&mut self, item: T, key: F)
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.items.push(item);
        self.sift_up(self.items.len() - 1, &key);
    }

    /// Remove and return the item with the smallest current key,
    /// or `None` when the heap is empty
    pub fn pop_min<K, F>(&mut self, key: F) -> Option<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        let last = self.items.pop()?;
        if self.items.is_empty() {
            return Some(last);
        }
        let root = std::mem::replace(&mut self.items[0], last);
        self.sift_down(0, &key);
        Some(root)
    }

    fn less<K, F>(&self, a: usize, b: usize, key: &F) -> bool
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        key(&self.items[a]) < key(&self.items[b])
    }

    fn sift_up<K, F>(&mut self, mut index: usize, key: &F)
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent, key) {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down<K, F>(&mut self, mut index: usize, key: &F)
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < self.items.len() && self.less(left, smallest, key) {
                smallest = left;
            }
            if right < self.items.len() && self.less(right, smallest, key) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_key_order() {
        let mut heap = MinHeap::new();
        for value in [5, 1, 4, 2, 3, 0] {
            heap.push(value, |&v| v);
        }
        let mut drained = Vec::new();
        while let Some(value) = heap.pop_min(|&v| v) {
            drained.push(value);
        }
        assert_eq!(drained, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_pop_returns_none() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.pop_min(|&v| v), None);
    }

    #[test]
    fn test_key_reads_live_state() {
        // Items are indices into a distance table that changes between calls.
        let mut distances = vec![10.0, 20.0, 30.0];
        let mut heap = MinHeap::new();
        for id in 0..3 {
            heap.push(id, |&i: &usize| distances[i]);
        }

        // Relax item 2 and push it again, as Dijkstra does.
        distances[2] = 1.0;
        heap.push(2, |&i: &usize| distances[i]);

        assert_eq!(heap.pop_min(|&i: &usize| distances[i]), Some(2));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut heap = MinHeap::new();
        heap.push(7, |&v| v);
        heap.push(7, |&v| v);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.pop_min(|&v| v), Some(7));
        assert_eq!(heap.pop_min(|&v| v), Some(7));
        assert!(heap.is_empty());
    }
}
