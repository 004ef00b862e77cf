//! Insertion-ordered entity storage with stable handles
//!
//! Entities get a monotonically increasing id on insertion, so the backing
//! `Vec` stays sorted by id and iteration order is deterministic. Removal only
//! marks an entry dead; dead entries are skipped by every accessor and dropped
//! by [`Registry::purge`] at the end of a tick. That makes removal safe while a
//! collision pass is still walking the same registry.

use serde::{Deserialize, Serialize};

/// Stable reference to an entity in a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub u32);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<T> {
    id: u32,
    alive: bool,
    value: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry<T> {
    entries: Vec<Entry<T>>,
    next_id: u32,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an entity at the end of the iteration order
    pub fn insert(&mut self, value: T) -> Handle {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            alive: true,
            value,
        });
        Handle(id)
    }

    fn index_of(&self, handle: Handle) -> Option<usize> {
        self.entries.binary_search_by_key(&handle.0, |e| e.id).ok()
    }

    /// Mark an entity dead. Returns `true` only for the call that killed it;
    /// unknown or already-dead handles are a no-op.
    pub fn remove(&mut self, handle: Handle) -> bool {
        match self.index_of(handle) {
            Some(i) if self.entries[i].alive => {
                self.entries[i].alive = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_alive(&self, handle: Handle) -> bool {
        self.index_of(handle)
            .is_some_and(|i| self.entries[i].alive)
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.index_of(handle)
            .map(|i| &self.entries[i])
            .filter(|e| e.alive)
            .map(|e| &e.value)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let i = self.index_of(handle)?;
        let entry = &mut self.entries[i];
        if entry.alive {
            Some(&mut entry.value)
        } else {
            None
        }
    }

    /// Live entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.entries
            .iter()
            .filter(|e| e.alive)
            .map(|e| (Handle(e.id), &e.value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle, &mut T)> {
        self.entries
            .iter_mut()
            .filter(|e| e.alive)
            .map(|e| (Handle(e.id), &mut e.value))
    }

    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.alive).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop dead entries, returning how many were dropped
    pub fn purge(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.alive);
        before - self.entries.len()
    }
}
