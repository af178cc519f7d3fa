//! Append-only arena
//!
//! Backing store for the document tree. Nodes are never freed while the
//! document lives, so a slot index is stable for the arena's lifetime.
//! Every handle is stamped with the id of the arena that issued it, so a
//! handle taken from one document is rejected by another instead of silently
//! aliasing an unrelated node.
//! Zero external dependencies.

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

/// A handle into an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    pub arena: u32,
    pub index: u32,
}

pub struct Arena<T> {
    id: u32,
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            items: Vec::new(),
        }
    }

    /// The stamp carried by every handle this arena hands out.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn allocate(&mut self, value: T) -> Handle {
        let index = self.items.len() as u32;
        self.items.push(value);
        Handle {
            arena: self.id,
            index,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        if handle.arena != self.id {
            return None;
        }
        self.items.get(handle.index as usize)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if handle.arena != self.id {
            return None;
        }
        self.items.get_mut(handle.index as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
