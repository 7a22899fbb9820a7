//! Binary min-heap over arena handles with tracked positions.
//!
//! Entries are owned by a [`SlotArena`]; the heap's backing array holds only
//! [`SlotId`]s. Every entry records its own slot in the backing array (see
//! [`HeapEntry::heap_index`]) so that after an access the engine can restore
//! heap order at that position with a single sift instead of a re-heapify.
//!
//! ```text
//!   order: [ id_4 | id_0 | id_2 | id_7 | id_1 ]      arena[id_0].heap_index == 1
//!             0      1      2      3      4          arena[id_7].heap_index == 3
//! ```

use crate::arena::{SlotArena, SlotId};
use crate::error::{ensure_invariant, InvariantError};

/// An entry that can live in an [`IndexedHeap`].
pub(crate) trait HeapEntry {
    /// Position of this entry in the heap's backing array.
    fn heap_index(&self) -> usize;

    fn set_heap_index(&mut self, index: usize);

    /// Strict "evict before" ordering. Must be a strict weak order.
    fn precedes(&self, other: &Self) -> bool;
}

#[derive(Debug)]
pub(crate) struct IndexedHeap<T> {
    arena: SlotArena<T>,
    order: Vec<SlotId>,
}

impl<T: HeapEntry> IndexedHeap<T> {
    pub(crate) fn new() -> Self {
        IndexedHeap {
            arena: SlotArena::new(),
            order: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id)
    }

    /// Handle of the minimum entry.
    #[inline]
    pub(crate) fn peek(&self) -> Option<SlotId> {
        self.order.first().copied()
    }

    pub(crate) fn push(&mut self, mut value: T) -> SlotId {
        let index = self.order.len();
        value.set_heap_index(index);
        let id = self.arena.insert(value);
        self.order.push(id);
        self.sift_up(index);
        id
    }

    /// Removes and returns the minimum entry.
    pub(crate) fn pop(&mut self) -> Option<T> {
        let id = self.peek()?;
        self.remove(id)
    }

    /// Removes an arbitrary entry by handle.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        let index = self.arena.get(id)?.heap_index();
        let last = self.order.len() - 1;
        self.swap(index, last);
        self.order.pop();
        if index < self.order.len() {
            self.fix_at(index);
        }
        self.arena.remove(id)
    }

    /// Applies `f` to the entry and restores heap order at its position.
    pub(crate) fn update<R>(&mut self, id: SlotId, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let entry = self.arena.get_mut(id)?;
        let result = f(entry);
        let index = entry.heap_index();
        self.fix_at(index);
        Some(result)
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.order.clear();
    }

    /// Iterates over entries in backing-array order (not priority order).
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.order
            .iter()
            .filter_map(|&id| self.arena.get(id).map(|entry| (id, entry)))
    }

    /// Yields handles in the exact order successive `pop`s would return them,
    /// without mutating the heap.
    ///
    /// The heap is walked best-first: the frontier starts at the root and each
    /// yielded position admits its two children. Taking `k` items costs
    /// O(k²) comparisons, which is cheap for the small batches GDSF evicts.
    pub(crate) fn ascending(&self) -> Ascending<'_, T> {
        Ascending {
            heap: self,
            frontier: if self.order.is_empty() { Vec::new() } else { vec![0] },
        }
    }

    fn entry_at(&self, index: usize) -> Option<&T> {
        self.order.get(index).and_then(|&id| self.arena.get(id))
    }

    fn less(&self, a: usize, b: usize) -> bool {
        match (self.entry_at(a), self.entry_at(b)) {
            (Some(x), Some(y)) => x.precedes(y),
            _ => false,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.order.swap(a, b);
        let (id_a, id_b) = (self.order[a], self.order[b]);
        if let Some(entry) = self.arena.get_mut(id_a) {
            entry.set_heap_index(a);
        }
        if let Some(entry) = self.arena.get_mut(id_b) {
            entry.set_heap_index(b);
        }
    }

    fn fix_at(&mut self, index: usize) {
        if !self.sift_down(index) {
            self.sift_up(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
    }

    /// Returns `true` if the entry moved.
    fn sift_down(&mut self, start: usize) -> bool {
        let len = self.order.len();
        let mut index = start;
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, index) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
        index > start
    }

    /// Verifies positions, back-references and the heap property.
    pub(crate) fn check(&self) -> Result<(), InvariantError> {
        ensure_invariant!(
            self.order.len() == self.arena.len(),
            "heap array holds {} handles but arena holds {} entries",
            self.order.len(),
            self.arena.len()
        );
        for (index, &id) in self.order.iter().enumerate() {
            let entry = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("heap slot {index} is stale")))?;
            ensure_invariant!(
                entry.heap_index() == index,
                "entry at heap slot {} records index {}",
                index,
                entry.heap_index()
            );
            if index > 0 {
                ensure_invariant!(
                    !self.less(index, (index - 1) / 2),
                    "heap order violated at slot {}",
                    index
                );
            }
        }
        Ok(())
    }
}

impl<T: HeapEntry> Default for IndexedHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Ascending<'a, T> {
    heap: &'a IndexedHeap<T>,
    frontier: Vec<usize>,
}

impl<T: HeapEntry> Iterator for Ascending<'_, T> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let mut best = 0;
        for candidate in 1..self.frontier.len() {
            if self
                .heap
                .less(self.frontier[candidate], self.frontier[best])
            {
                best = candidate;
            }
        }
        if best >= self.frontier.len() {
            return None;
        }
        let index = self.frontier.swap_remove(best);
        let len = self.heap.order.len();
        for child in [2 * index + 1, 2 * index + 2] {
            if child < len {
                self.frontier.push(child);
            }
        }
        self.heap.order.get(index).copied()
    }
}
