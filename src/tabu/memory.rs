//! Short-term search memory: the tabu list and the rollback stack.
//!
//! Both are owned by a single run; nothing is shared between runs.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Bounded FIFO set of recently visited solutions.
///
/// Membership is O(1); the queue keeps insertion order for eviction.
///
/// # Examples
///
/// ```
/// use u_fjsp::tabu::TabuList;
///
/// let mut tabu = TabuList::new(2);
/// tabu.push("a");
/// tabu.push("b");
/// tabu.push("a"); // already present, no-op
/// tabu.push("c"); // evicts "a"
/// assert!(!tabu.contains(&"a"));
/// assert_eq!(tabu.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TabuList<T> {
    queue: VecDeque<T>,
    members: HashSet<T>,
    capacity: usize,
}

impl<T: Clone + Eq + Hash> TabuList<T> {
    /// Creates an empty list holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity.min(1024)),
            members: HashSet::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Appends `item` unless present, evicting the oldest entries beyond
    /// capacity.
    pub fn push(&mut self, item: T) {
        if self.members.contains(&item) {
            return;
        }
        self.members.insert(item.clone());
        self.queue.push_back(item);
        while self.queue.len() > self.capacity {
            self.pop_oldest();
        }
    }

    /// Removes and returns the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<T> {
        let item = self.queue.pop_front()?;
        self.members.remove(&item);
        Some(item)
    }

    /// Removes `item` if present; returns whether it was.
    pub fn remove(&mut self, item: &T) -> bool {
        if !self.members.remove(item) {
            return false;
        }
        if let Some(pos) = self.queue.iter().position(|x| x == item) {
            self.queue.remove(pos);
        }
        true
    }

    /// Whether `item` is tabu.
    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.members.contains(item)
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// De-duplicating LIFO history of accepted solutions, popped when the
/// search stagnates.
#[derive(Debug, Clone)]
pub struct RollbackStack<T> {
    stack: Vec<T>,
    members: HashSet<T>,
}

impl<T: Clone + Eq + Hash> Default for RollbackStack<T> {
    fn default() -> Self {
        Self {
            stack: Vec::new(),
            members: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> RollbackStack<T> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `item` unless it is already on the stack.
    pub fn push(&mut self, item: T) {
        if self.members.insert(item.clone()) {
            self.stack.push(item);
        }
    }

    /// Pops the most recently pushed entry.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.stack.pop()?;
        self.members.remove(&item);
        Some(item)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabu_list_fifo_eviction() {
        let mut tabu = TabuList::new(3);
        for i in 0..5 {
            tabu.push(i);
            assert!(tabu.len() <= 3);
        }
        assert!(!tabu.contains(&0));
        assert!(!tabu.contains(&1));
        assert!(tabu.contains(&2) && tabu.contains(&3) && tabu.contains(&4));
        assert_eq!(tabu.pop_oldest(), Some(2));
    }

    #[test]
    fn test_tabu_list_ignores_duplicates() {
        let mut tabu = TabuList::new(3);
        tabu.push(1);
        tabu.push(2);
        tabu.push(1);
        assert_eq!(tabu.len(), 2);
        // 1 keeps its original age
        assert_eq!(tabu.pop_oldest(), Some(1));
    }

    #[test]
    fn test_tabu_list_remove() {
        let mut tabu = TabuList::new(4);
        tabu.push("x");
        tabu.push("y");
        tabu.push("z");
        assert!(tabu.remove(&"y"));
        assert!(!tabu.remove(&"y"));
        assert!(!tabu.contains(&"y"));
        assert_eq!(tabu.len(), 2);
        assert_eq!(tabu.pop_oldest(), Some("x"));
        assert_eq!(tabu.pop_oldest(), Some("z"));
        assert_eq!(tabu.pop_oldest(), None);
        assert!(tabu.is_empty());
    }

    #[test]
    fn test_tabu_list_zero_capacity_keeps_nothing() {
        let mut tabu = TabuList::new(0);
        tabu.push(1);
        assert!(tabu.is_empty());
        assert!(!tabu.contains(&1));
        assert_eq!(tabu.capacity(), 0);
    }

    #[test]
    fn test_rollback_stack_lifo_dedup() {
        let mut stack = RollbackStack::new();
        stack.push('a');
        stack.push('b');
        stack.push('a');
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some('b'));
        assert_eq!(stack.pop(), Some('a'));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_rollback_stack_allows_repush_after_pop() {
        let mut stack = RollbackStack::new();
        stack.push(1);
        assert_eq!(stack.pop(), Some(1));
        stack.push(1);
        assert_eq!(stack.len(), 1);
    }
}
