//! Chain: one bucket's entries, a doubly linked list threaded through
//! arena slots.
//!
//! Entries live in a generational `SlotMap`; links are arena keys, so
//! unlinking is O(1) given a key and no chain ever holds a reference into
//! the arena.

use core::borrow::Borrow;
use slotmap::{DefaultKey, SlotMap};

pub(crate) type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

#[derive(Clone, Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Computed once on insert; rebuilds never call back into `K: Hash`.
    pub(crate) hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<DefaultKey> {
        self.next
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Chain {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    len: usize,
}

impl Chain {
    #[inline]
    pub(crate) fn head(&self) -> Option<DefaultKey> {
        self.head
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Link the already-stored entry `k` after the current tail.
    pub(crate) fn push_back<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let old_tail = self.tail;
        if let Some(e) = slots.get_mut(k) {
            e.prev = old_tail;
            e.next = None;
        }
        match old_tail.and_then(|t| slots.get_mut(t)) {
            Some(t) => t.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
        self.len += 1;
    }

    /// Detach `k` from this chain, leaving the entry in the arena. The
    /// relative order of the remaining entries is unchanged.
    pub(crate) fn unlink<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let Some(e) = slots.get_mut(k) else {
            return;
        };
        let (prev, next) = (e.prev.take(), e.next.take());
        match prev.and_then(|p| slots.get_mut(p)) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| slots.get_mut(n)) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// Linear scan for an entry whose cached hash and key both match.
    pub(crate) fn find<K, V, Q>(&self, slots: &Slots<K, V>, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.keys(slots)
            .find(|&k| slots.get(k).is_some_and(|e| e.hash == hash && e.key.borrow() == q))
    }

    pub(crate) fn keys<'a, K, V>(&self, slots: &'a Slots<K, V>) -> ChainKeys<'a, K, V> {
        ChainKeys {
            slots,
            cur: self.head,
        }
    }
}

/// Arena keys of one chain, head to tail.
pub(crate) struct ChainKeys<'a, K, V> {
    slots: &'a Slots<K, V>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for ChainKeys<'a, K, V> {
    type Item = DefaultKey;

    fn next(&mut self) -> Option<DefaultKey> {
        let k = self.cur?;
        self.cur = self.slots.get(k).and_then(|e| e.next);
        Some(k)
    }
}
