//! Identity pool.
//!
//! Maps each distinct handle to a small integer, assigned in first-observed
//! order starting at 1. Id 0 stands for an absent reference. Ids are never
//! reused and entries are never removed, so an id handed out once stays valid
//! for the lifetime of the pool.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::error::{Violation, WriteError};

#[derive(Debug)]
pub struct IdPool<T> {
    ids: FxHashMap<T, usize>,
    /// Entry `k - 1` holds the handle with id `k`.
    order: Vec<T>,
    name: &'static str,
}

impl<T: Copy + Eq + Hash> IdPool<T> {
    /// Create an empty pool; `name` identifies it in error messages.
    pub fn new(name: &'static str) -> Self {
        IdPool {
            ids: FxHashMap::default(),
            order: Vec::new(),
            name,
        }
    }

    /// Id for a possibly-absent handle; `None` is always 0.
    pub fn id_for(&mut self, item: Option<T>) -> usize {
        item.map_or(0, |item| self.id(item))
    }

    /// Id for `item`, assigning the next one on first sight.
    pub fn id(&mut self, item: T) -> usize {
        if let Some(&id) = self.ids.get(&item) {
            return id;
        }
        self.order.push(item);
        let id = self.order.len();
        self.ids.insert(item, id);
        id
    }

    /// Register `item` without using its id.
    #[inline]
    pub fn record(&mut self, item: T) {
        self.id(item);
    }

    /// Id already assigned to `item`, if any.
    pub fn lookup(&self, item: T) -> Option<usize> {
        self.ids.get(&item).copied()
    }

    /// Inverse of [`id_for`](Self::id_for): 0 gives `None`.
    #[track_caller]
    pub fn ptr_for(&self, id: usize) -> Result<Option<T>, WriteError> {
        if id == 0 {
            return Ok(None);
        }
        self.get(id).map(Some).ok_or_else(|| {
            WriteError::invariant(Violation::IdOutOfRange {
                pool: self.name,
                id,
                len: self.len(),
            })
        })
    }

    /// Handle with id `id`, for `1..=len()`.
    pub fn get(&self, id: usize) -> Option<T> {
        id.checked_sub(1).and_then(|slot| self.order.get(slot)).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `(id, handle)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + '_ {
        self.order.iter().enumerate().map(|(slot, &item)| (slot + 1, item))
    }
}

#[cfg(test)]
mod tests;
