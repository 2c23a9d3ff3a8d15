//! Typed arenas and handles.
//!
//! Every IR entity lives in an [`Arena`] owned by the IR snapshot and is
//! referenced everywhere else by a [`Handle`]. Handles are 4-byte slot
//! indices tagged with the arena's element type, so a handle into the type
//! arena can never be passed where a value handle is expected.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Slot index into an [`Arena<T>`].
///
/// `Copy`, `Eq`, `Ord` and `Hash` are implemented by hand so that they do not
/// require the same traits on `T`.
#[repr(transparent)]
pub struct Handle<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Create a handle from a raw slot index.
    ///
    /// The handle is not checked against any arena; lookups with a handle
    /// that was never allocated return `None`.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.raw
    }

    /// Get the slot as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.raw as usize
    }
}

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Handle<T> {}

impl<T> PartialOrd for Handle<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Handle<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Handle<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.raw)
    }
}

/// Append-only storage addressed by [`Handle`].
#[derive(Clone, Debug)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `item` and return its handle.
    ///
    /// # Panics
    ///
    /// Panics if the arena already holds `u32::MAX` items.
    pub fn alloc(&mut self, item: T) -> Handle<T> {
        let raw = u32::try_from(self.items.len())
            .unwrap_or_else(|_| panic!("arena size exceeds u32::MAX"));
        self.items.push(item);
        Handle::new(raw)
    }

    /// Look up an item, `None` if the handle was not allocated here.
    #[inline]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Whether `handle` addresses an allocated slot.
    #[inline]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        handle.index() < self.items.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over `(handle, item)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.items.iter().enumerate().map(|(slot, item)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "arena slots are bounded by u32::MAX in alloc"
            )]
            let raw = slot as u32;
            (Handle::new(raw), item)
        })
    }
}
