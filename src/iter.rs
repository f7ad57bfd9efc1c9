//! Iterators over `ChainHashMap`, all in cursor order: bucket index,
//! then chain order within a bucket.

use crate::chain::{Chain, Entry, Slots};
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SecondaryMap};

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    buckets: &'a [Chain],
    slots: &'a Slots<K, V>,
    next_bucket: usize,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Chain], slots: &'a Slots<K, V>, first_bucket: usize) -> Self {
        Self {
            buckets,
            slots,
            next_bucket: first_bucket,
            cur: None,
            remaining: slots.len(),
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            slots: self.slots,
            next_bucket: self.next_bucket,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let e = self.slots.get(k)?;
                self.cur = e.next();
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            self.cur = self.buckets.get(self.next_bucket)?.head();
            self.next_bucket += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)`.
///
/// Exclusive entry borrows are split out of the arena up front into a
/// secondary map and handed out one at a time as the chains are walked.
pub struct IterMut<'a, K, V> {
    buckets: &'a [Chain],
    entries: SecondaryMap<DefaultKey, &'a mut Entry<K, V>>,
    next_bucket: usize,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Chain], slots: &'a mut Slots<K, V>, first_bucket: usize) -> Self {
        let mut entries = SecondaryMap::with_capacity(slots.len());
        for (k, e) in slots.iter_mut() {
            entries.insert(k, e);
        }
        Self {
            buckets,
            entries,
            next_bucket: first_bucket,
            cur: None,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cur {
                let e = self.entries.remove(k)?;
                self.cur = e.next();
                return Some((&e.key, &mut e.value));
            }
            self.cur = self.buckets.get(self.next_bucket)?.head();
            self.next_bucket += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.entries.len(), Some(self.entries.len()))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)`.
pub struct IntoIter<K, V> {
    slots: Slots<K, V>,
    order: std::vec::IntoIter<DefaultKey>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(slots: Slots<K, V>, order: Vec<DefaultKey>) -> Self {
        Self {
            slots,
            order: order.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let slots = &mut self.slots;
        self.order
            .find_map(|k| slots.remove(k))
            .map(|e| (e.key, e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(inner: IterMut<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}
