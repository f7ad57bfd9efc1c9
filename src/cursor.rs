//! Cursor: a copyable logical position inside a `ChainHashMap`.

use crate::chain_hash_map::ChainHashMap;
use slotmap::DefaultKey;

/// A position in a map's traversal order: one entry, or the end.
///
/// Cursors hold no borrow of the map. They name an entry by bucket index
/// and arena key and carry the epoch of the bucket array they were taken
/// from. Every rebuild (grow, shrink, `clear`) starts a new epoch, after
/// which older cursors are stale. Erasing the entry a cursor names makes
/// that cursor stale too; generational arena keys guarantee it never
/// resolves to a different entry afterwards.
///
/// Accessors take the map explicitly and return `None` for `end()` and
/// for stale cursors. Mutability follows the map borrow, so one cursor
/// type serves both read-only and mutable access.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    pub(crate) bucket: usize,
    pub(crate) slot: Option<DefaultKey>,
    pub(crate) epoch: u64,
}

impl Cursor {
    pub(crate) fn new(bucket: usize, slot: Option<DefaultKey>, epoch: u64) -> Self {
        Cursor {
            bucket,
            slot,
            epoch,
        }
    }

    /// True for the canonical one-past-the-last position.
    pub fn is_end(&self) -> bool {
        self.slot.is_none()
    }

    /// Bucket index this cursor sits in. `end()` reports the last bucket.
    pub fn bucket(&self) -> usize {
        self.bucket
    }

    pub fn key<'a, K, V, S>(&self, map: &'a ChainHashMap<K, V, S>) -> Option<&'a K> {
        map.cursor_entry(*self).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a ChainHashMap<K, V, S>) -> Option<&'a V> {
        map.cursor_entry(*self).map(|(_, v)| v)
    }

    pub fn entry<'a, K, V, S>(&self, map: &'a ChainHashMap<K, V, S>) -> Option<(&'a K, &'a V)> {
        map.cursor_entry(*self)
    }

    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut ChainHashMap<K, V, S>) -> Option<&'a mut V> {
        map.cursor_value_mut(*self)
    }

    /// Step to the next entry in traversal order, skipping empty buckets,
    /// or to `map.end()` after the last entry.
    ///
    /// # Panics
    ///
    /// Panics when called on `end()` or on a stale cursor.
    pub fn advance<K, V, S>(&mut self, map: &ChainHashMap<K, V, S>) {
        *self = map.cursor_successor(*self);
    }
}
