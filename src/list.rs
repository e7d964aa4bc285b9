//! A singly linked, position-indexed sequence container.
//!
//! Nodes live in an internal arena (a vector of slots with a free-index
//! stack) and point at each other by slot index instead of by owning
//! pointer. This keeps the structure in safe Rust while preserving the
//! usual linked-list shape: a head, a tail, and O(1) insertion at both
//! ends. Removed slots are recycled before the arena grows.

use std::fmt;
use std::ops;

/// Failure kinds reported by [`LinkedList`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// A positional operation was given an index outside the valid range,
    /// or a search scanned the whole list without finding a match.
    InvalidIndex,
    /// `clear` was called on a list that is already empty.
    AlreadyEmpty,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::InvalidIndex => write!(f, "invalid index"),
            ListError::AlreadyEmpty => write!(f, "list is already empty"),
        }
    }
}

impl std::error::Error for ListError {}

struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// A singly linked list with front/back insertion and zero-based
/// positional access.
///
/// Failing operations leave the list untouched: either the whole
/// insert/remove completes and the length updates, or nothing changes and
/// a [`ListError`] is returned.
///
/// Two deliberate strictness quirks are kept from the behavior this
/// container reproduces:
/// - [`insert_at`](LinkedList::insert_at) rejects an empty list even for
///   position 0 (use [`push_front`](LinkedList::push_front) or
///   [`push_back`](LinkedList::push_back) for the first element);
/// - [`clear`](LinkedList::clear) is not idempotent and fails on an empty
///   list.
pub struct LinkedList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> LinkedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of elements currently in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` as the new last element.
    pub fn push_back(&mut self, value: T) {
        let idx = self.alloc(value);
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => {
                debug_assert!(self.head.is_none());
                self.head = Some(idx);
            }
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Inserts `value` as the new first element.
    pub fn push_front(&mut self, value: T) {
        let old_head = self.head;
        let idx = self.alloc(value);
        self.node_mut(idx).next = old_head;
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
    }

    /// Inserts `value` so that it ends up at index `position`.
    ///
    /// `position == 0` behaves like [`push_front`](LinkedList::push_front)
    /// and `position == len` like [`push_back`](LinkedList::push_back),
    /// except that inserting into an empty list is rejected outright.
    pub fn insert_at(&mut self, value: T, position: usize) -> Result<(), ListError> {
        if self.is_empty() || position > self.len {
            return Err(ListError::InvalidIndex);
        }
        if position == 0 {
            self.push_front(value);
        } else if position == self.len {
            self.push_back(value);
        } else {
            let prev = self.index_of(position - 1);
            let next = self.node(prev).next;
            let idx = self.alloc(value);
            self.node_mut(idx).next = next;
            self.node_mut(prev).next = Some(idx);
            self.len += 1;
        }
        Ok(())
    }

    /// Removes and returns the element at `position`.
    pub fn remove_at(&mut self, position: usize) -> Result<T, ListError> {
        if position >= self.len {
            return Err(ListError::InvalidIndex);
        }
        let removed = if position == 0 {
            let idx = self.head.expect("non-empty list has a head");
            self.head = self.node(idx).next;
            if self.head.is_none() {
                self.tail = None;
            }
            idx
        } else {
            let prev = self.index_of(position - 1);
            let idx = self
                .node(prev)
                .next
                .expect("every position below len has a node");
            let next = self.node(idx).next;
            self.node_mut(prev).next = next;
            if next.is_none() {
                self.tail = Some(prev);
            }
            idx
        };
        self.len -= 1;
        Ok(self.release(removed))
    }

    /// Releases every node and resets the list to the empty state.
    ///
    /// Fails with [`ListError::AlreadyEmpty`] when there is nothing to
    /// clear.
    pub fn clear(&mut self) -> Result<(), ListError> {
        if self.is_empty() {
            return Err(ListError::AlreadyEmpty);
        }
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
        Ok(())
    }

    /// Returns a copy of the element at `position`.
    pub fn get(&self, position: usize) -> Result<T, ListError>
    where
        T: Clone,
    {
        if position >= self.len {
            return Err(ListError::InvalidIndex);
        }
        Ok(self.node(self.index_of(position)).value.clone())
    }

    /// Returns a copy of the first element matching `predicate`, scanning
    /// front to back and stopping at the first hit.
    pub fn find<P>(&self, mut predicate: P) -> Result<T, ListError>
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .find(|value| predicate(*value))
            .cloned()
            .ok_or(ListError::InvalidIndex)
    }

    /// Returns the zero-based index of the first element matching
    /// `predicate`.
    pub fn find_index<P>(&self, predicate: P) -> Result<usize, ListError>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter()
            .position(predicate)
            .ok_or(ListError::InvalidIndex)
    }

    /// Invokes `action` once per element, front to back.
    pub fn for_each<F>(&self, action: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(action);
    }

    /// Front-to-back iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        let node = Node { value, next: None };
        match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) -> T {
        let node = self.slots[idx].take().expect("released slot holds a live node");
        self.free.push(idx);
        node.value
    }

    fn node(&self, idx: usize) -> &Node<T> {
        self.slots[idx].as_ref().expect("linked slot holds a live node")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        self.slots[idx].as_mut().expect("linked slot holds a live node")
    }

    /// Slot index of the node at `position`. Caller guarantees
    /// `position < len`.
    fn index_of(&self, position: usize) -> usize {
        debug_assert!(position < self.len);
        let mut idx = self.head.expect("non-empty list has a head");
        for _ in 0..position {
            idx = self
                .node(idx)
                .next
                .expect("chain covers every position below len");
        }
        idx
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> ops::Index<usize> for LinkedList<T> {
    type Output = T;

    /// Panics when `position` is out of range, like `Vec` indexing.
    /// Use [`get`](LinkedList::get) for a fallible lookup.
    fn index(&self, position: usize) -> &T {
        assert!(
            position < self.len,
            "index out of bounds: the len is {} but the index is {}",
            self.len,
            position
        );
        &self.node(self.index_of(position)).value
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator returned by [`LinkedList::iter`].
pub struct Iter<'a, T> {
    list: &'a LinkedList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let idx = self.cursor?;
        let node = self.list.node(idx);
        self.cursor = node.next;
        Some(&node.value)
    }
}
