use crate::memory::VertexId;

const NOT_QUEUED: usize = usize::MAX;

#[derive(Clone, Copy)]
struct Slot {
    key: f32,
    pos: usize,
    generation: u32,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            key: f32::INFINITY,
            pos: NOT_QUEUED,
            generation: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// IndirectHeap
// ---------------------------------------------------------------------------

/// Binary min-heap of vertex ids with O(log n) decrease-key.
///
/// Every id knows its position in the heap, so a key can be lowered in place
/// instead of pushing duplicates. Equal keys pop the smaller id first. Like
/// [`SearchMemory`](crate::SearchMemory), the position table is invalidated
/// by a generation bump, so [`reset`](Self::reset) does not touch it.
pub struct IndirectHeap {
    heap: Vec<VertexId>,
    slots: Vec<Slot>,
    generation: u32,
}

impl Default for IndirectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl IndirectHeap {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: Vec::new(),
            generation: 1,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut heap = Self::new();
        heap.reset(capacity);
        heap
    }

    /// Empty the heap and make room for ids `0..capacity`.
    pub fn reset(&mut self, capacity: usize) {
        self.heap.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            for slot in &mut self.slots {
                slot.generation = 0;
            }
            self.generation = 1;
        }
        if self.slots.len() < capacity {
            self.slots.resize(capacity, Slot::default());
            self.heap.reserve(capacity);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether `v` is currently in the heap.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.live(v).is_some_and(|s| s.pos != NOT_QUEUED)
    }

    /// Current key of a queued id.
    #[inline]
    pub fn key(&self, v: VertexId) -> Option<f32> {
        self.live(v).filter(|s| s.pos != NOT_QUEUED).map(|s| s.key)
    }

    /// Ids currently queued, in heap order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.heap.iter().copied()
    }

    /// Insert `v` with `key`, or move it to `key` if it is already queued.
    ///
    /// Despite the name a larger key is accepted too; the element then sinks
    /// to its new place.
    pub fn decrease_key(&mut self, v: VertexId, key: f32) {
        if v >= self.slots.len() {
            self.slots.resize(v + 1, Slot::default());
        }
        let generation = self.generation;
        let slot = &mut self.slots[v];
        if slot.generation != generation {
            *slot = Slot {
                generation,
                ..Slot::default()
            };
        }
        let old = slot.key;
        slot.key = key;
        if slot.pos == NOT_QUEUED {
            let pos = self.heap.len();
            slot.pos = pos;
            self.heap.push(v);
            self.sift_up(pos);
        } else {
            let pos = slot.pos;
            if key < old {
                self.sift_up(pos);
            } else {
                self.sift_down(pos);
            }
        }
    }

    /// Id with the smallest key, without removing it.
    #[inline]
    pub fn peek_min(&self) -> Option<VertexId> {
        self.heap.first().copied()
    }

    /// Remove and return the id with the smallest key.
    pub fn pop_min(&mut self) -> Option<VertexId> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let min = self.heap.pop()?;
        self.slots[min].pos = NOT_QUEUED;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    #[inline]
    fn live(&self, v: VertexId) -> Option<&Slot> {
        self.slots.get(v).filter(|s| s.generation == self.generation)
    }

    /// Heap order: key, then id.
    #[inline]
    fn less(&self, a: VertexId, b: VertexId) -> bool {
        let (ka, kb) = (self.slots[a].key, self.slots[b].key);
        ka.total_cmp(&kb).then(a.cmp(&b)).is_lt()
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slots[self.heap[i]].pos = i;
        self.slots[self.heap[j]].pos = j;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(self.heap[pos], self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < n && self.less(self.heap[right], self.heap[left]) {
                child = right;
            }
            if !self.less(self.heap[child], self.heap[pos]) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(h: &mut IndirectHeap) -> Vec<VertexId> {
        std::iter::from_fn(|| h.pop_min()).collect()
    }

    #[test]
    fn pops_in_key_order() {
        let mut h = IndirectHeap::with_capacity(6);
        for (v, k) in [(0, 5.0), (1, 1.0), (2, 4.0), (3, 2.0), (4, 3.0)] {
            h.decrease_key(v, k);
        }
        assert_eq!(h.len(), 5);
        assert_eq!(h.peek_min(), Some(1));
        assert_eq!(drain(&mut h), vec![1, 3, 4, 2, 0]);
        assert!(h.is_empty());
        assert_eq!(h.pop_min(), None);
    }

    #[test]
    fn decrease_key_moves_element_up() {
        let mut h = IndirectHeap::with_capacity(4);
        h.decrease_key(0, 1.0);
        h.decrease_key(1, 2.0);
        h.decrease_key(2, 3.0);
        h.decrease_key(2, 0.5);
        assert_eq!(h.len(), 3);
        assert_eq!(h.key(2), Some(0.5));
        assert_eq!(drain(&mut h), vec![2, 0, 1]);
    }

    #[test]
    fn larger_key_sinks() {
        let mut h = IndirectHeap::with_capacity(3);
        h.decrease_key(0, 1.0);
        h.decrease_key(1, 2.0);
        h.decrease_key(2, 3.0);
        h.decrease_key(0, 10.0);
        assert_eq!(drain(&mut h), vec![1, 2, 0]);
    }

    #[test]
    fn equal_keys_pop_smaller_id_first() {
        let mut h = IndirectHeap::with_capacity(8);
        for v in [5, 2, 7, 0, 3] {
            h.decrease_key(v, 1.0);
        }
        assert_eq!(drain(&mut h), vec![0, 2, 3, 5, 7]);
    }

    #[test]
    fn reset_empties_and_reuses() {
        let mut h = IndirectHeap::with_capacity(4);
        h.decrease_key(1, 1.0);
        h.decrease_key(3, 2.0);
        assert!(h.contains(3));
        h.reset(4);
        assert!(h.is_empty());
        assert!(!h.contains(3));
        assert_eq!(h.key(1), None);
        h.decrease_key(3, 7.0);
        assert_eq!(h.pop_min(), Some(3));
    }

    #[test]
    fn popped_ids_are_not_contained() {
        let mut h = IndirectHeap::with_capacity(2);
        h.decrease_key(0, 1.0);
        h.decrease_key(1, 2.0);
        assert_eq!(h.pop_min(), Some(0));
        assert!(!h.contains(0));
        assert!(h.contains(1));
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn grows_on_demand() {
        let mut h = IndirectHeap::new();
        h.decrease_key(10, 1.0);
        h.decrease_key(4, 0.5);
        assert_eq!(drain(&mut h), vec![4, 10]);
    }
}
