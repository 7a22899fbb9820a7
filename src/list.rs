//! Doubly linked recency list over a slot arena.
//!
//! Nodes live in a [`SlotArena`] and link to each other by [`SlotId`], so the
//! LRU engine can hold a handle to any node and splice it to the front in O(1)
//! without raw pointers.
//!
//! ```text
//!   head (most recent)                              tail (least recent)
//!      │                                                   │
//!      ▼                                                   ▼
//!   [id_3] ◄──► [id_1] ◄──► [id_7] ◄──► ... ◄──► [id_2]
//! ```
//!
//! `add` pushes at the head and `remove_last` pops from the tail.

use crate::arena::{SlotArena, SlotId};
use crate::error::{ensure_invariant, InvariantError};

#[derive(Debug)]
struct Node<T> {
    val: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Arena-backed doubly linked list, most recently added at the head.
#[derive(Debug)]
pub(crate) struct List<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> List<T> {
    pub(crate) fn new() -> Self {
        List {
            arena: SlotArena::new(),
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.val)
    }

    /// Adds a value at the head of the list and returns its handle.
    pub(crate) fn add(&mut self, val: T) -> SlotId {
        let id = self.arena.insert(Node {
            val,
            prev: None,
            next: None,
        });
        self.attach_front(id);
        id
    }

    /// Moves the node to the head of the list. Returns `false` for a stale handle.
    pub(crate) fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        if !self.arena.contains(id) {
            return None;
        }
        self.detach(id);
        self.arena.remove(id).map(|node| node.val)
    }

    /// Removes the last (least recently used) node.
    pub(crate) fn remove_last(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates from head (most recent) to tail (least recent).
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn detach(&mut self, id: SlotId) {
        let (prev, next) = match self.arena.get(id) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head.and_then(|h| self.arena.get_mut(h)) {
            Some(head_node) => head_node.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    /// Walks the links and verifies they agree with the arena.
    pub(crate) fn check(&self) -> Result<(), InvariantError> {
        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;

        while let Some(id) = current {
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("list links to free slot {}", id.index())))?;
            ensure_invariant!(
                node.prev == prev,
                "slot {} has a broken back link",
                id.index()
            );
            count += 1;
            ensure_invariant!(count <= self.len(), "list contains a cycle");
            prev = Some(id);
            current = node.next;
        }

        ensure_invariant!(self.tail == prev, "list tail does not match last node");
        ensure_invariant!(
            count == self.len(),
            "list reaches {} nodes but arena holds {}",
            count,
            self.len()
        );
        Ok(())
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.arena.get(id)?;
        self.current = node.next;
        Some((id, &node.val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &List<i32>) -> Vec<i32> {
        list.iter().map(|(_, v)| *v).collect()
    }

    #[test]
    fn test_add_items() {
        let mut list = List::new();
        assert_eq!(list.len(), 0);

        list.add(1);
        list.add(2);
        list.add(3);

        assert_eq!(list.len(), 3);
        assert_eq!(values(&list), vec![3, 2, 1]);
        list.check().unwrap();
    }

    #[test]
    fn test_move_to_front() {
        let mut list = List::new();
        let a = list.add(1);
        let _b = list.add(2);
        let c = list.add(3);

        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec![1, 3, 2]);

        // Moving the head is a no-op
        assert!(list.move_to_front(a));
        assert_eq!(values(&list), vec![1, 3, 2]);

        list.remove(c);
        assert!(!list.move_to_front(c));
        list.check().unwrap();
    }

    #[test]
    fn test_remove_last() {
        let mut list = List::new();
        list.add(1);
        list.add(2);
        list.add(3);

        assert_eq!(list.remove_last(), Some(1));
        assert_eq!(list.remove_last(), Some(2));
        assert_eq!(list.remove_last(), Some(3));
        assert_eq!(list.remove_last(), None);
        assert_eq!(list.len(), 0);
        list.check().unwrap();
    }

    #[test]
    fn test_remove_middle() {
        let mut list = List::new();
        let _a = list.add(1);
        let b = list.add(2);
        let _c = list.add(3);

        assert_eq!(list.remove(b), Some(2));
        assert_eq!(list.remove(b), None);
        assert_eq!(values(&list), vec![3, 1]);
        assert!(!list.move_to_front(b));
        list.check().unwrap();
    }

    #[test]
    fn test_get_mut_and_clear() {
        let mut list = List::new();
        let a = list.add(1);
        *list.get_mut(a).unwrap() = 10;
        assert_eq!(values(&list), vec![10]);

        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.get_mut(a).is_none());
        list.check().unwrap();

        list.add(4);
        assert_eq!(values(&list), vec![4]);
    }
}
