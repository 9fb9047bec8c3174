use std::fmt;

use serde::{Deserialize, Serialize};

/// Append-only arena.
/// Slots are handed out sequentially and never freed,
/// so a slot also records creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<T> {
    pool: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArenaSlot(u32);

impl ArenaSlot {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ArenaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { pool: Vec::new() }
    }

    /// Allocate a value whose construction needs to know its own slot.
    pub fn alloc_with<F>(&mut self, make: F) -> ArenaSlot
    where
        F: FnOnce(ArenaSlot) -> T,
    {
        let slot = ArenaSlot(self.pool.len() as u32);
        self.pool.push(make(slot));
        slot
    }

    pub fn get(&self, slot: ArenaSlot) -> Option<&T> {
        self.pool.get(slot.index())
    }

    pub fn get_mut(&mut self, slot: ArenaSlot) -> Option<&mut T> {
        self.pool.get_mut(slot.index())
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.pool
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_sequential() {
        let mut arena = Arena::new();
        let a = arena.alloc_with(|_| "a");
        let b = arena.alloc_with(|_| "b");
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn alloc_with_sees_its_slot() {
        let mut arena = Arena::new();
        arena.alloc_with(|_| 10u32);
        let slot = arena.alloc_with(|slot| slot.raw() * 100);
        assert_eq!(arena.get(slot), Some(&100));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = Arena::new();
        let slot = arena.alloc_with(|_| vec![1]);
        if let Some(value) = arena.get_mut(slot) {
            value.push(2);
        }
        assert_eq!(arena.get(slot), Some(&vec![1, 2]));
        assert_eq!(arena.get(ArenaSlot::new(9)), None);
    }
}
