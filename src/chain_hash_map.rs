//! ChainHashMap: bucket array of chains, resize policy, cursor protocol.

use crate::chain::{Chain, Entry, Slots};
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::policy::{self, ResizePolicy};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use slotmap::DefaultKey;
use std::collections::hash_map::RandomState;
use tracing::trace;

/// A hash map resolving collisions by separate chaining.
///
/// Keys hash into `bucket_count` buckets; each bucket is an insertion
/// ordered chain. After every insert and erase the configured
/// [`ResizePolicy`] may double or halve the bucket count, rebuilding the
/// whole bucket array in one O(n) pass.
///
/// Inserting an existing key leaves the stored value untouched.
pub struct ChainHashMap<K, V, S = RandomState> {
    hasher: S,
    policy: ResizePolicy,
    buckets: Vec<Chain>,
    slots: Slots<K, V>,
    // Lower bound on the first non-empty bucket.
    first_bucket: usize,
    epoch: u64,
}

impl<K, V> ChainHashMap<K, V, RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self::with_policy_and_hasher(policy, RandomState::new())
    }
}

impl<K, V, S: Default> Default for ChainHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> ChainHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_policy_and_hasher(ResizePolicy::default(), hasher)
    }

    pub fn with_policy_and_hasher(policy: ResizePolicy, hasher: S) -> Self {
        Self {
            hasher,
            policy,
            buckets: vec![Chain::default()],
            slots: Slots::new(),
            first_bucket: 0,
            epoch: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        policy::load(self.len(), self.bucket_count())
    }

    /// Drop every entry and return to a single empty bucket. Outstanding
    /// cursors become stale.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.buckets.clear();
        self.buckets.push(Chain::default());
        self.first_bucket = 0;
        self.epoch = self.epoch.wrapping_add(1);
        trace!(epoch = self.epoch, "Cleared map.");
    }

    /// Cursor at the first entry in traversal order, or `end()`.
    pub fn begin(&self) -> Cursor {
        self.first_live_from(self.first_bucket)
    }

    /// The canonical end position: last bucket, past its last entry.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.buckets.len() - 1, None, self.epoch)
    }

    /// Remove the entry at `cursor` in O(1) and return it, then apply the
    /// resize policy. `end()` and stale cursors yield `None`.
    pub fn remove_at(&mut self, cursor: Cursor) -> Option<(K, V)> {
        let (b, k) = self.resolve(cursor)?;
        self.buckets[b].unlink(&mut self.slots, k);
        let entry = self.slots.remove(k)?;
        self.rebalance();
        Some((entry.key, entry.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.buckets, &self.slots, self.first_bucket)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&self.buckets, &mut self.slots, self.first_bucket)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn first_live_from(&self, start: usize) -> Cursor {
        self.buckets
            .iter()
            .enumerate()
            .skip(start)
            .find_map(|(b, chain)| chain.head().map(|k| Cursor::new(b, Some(k), self.epoch)))
            .unwrap_or_else(|| self.end())
    }

    /// Bucket and arena key named by a live cursor of the current epoch.
    fn resolve(&self, cursor: Cursor) -> Option<(usize, DefaultKey)> {
        if cursor.epoch != self.epoch {
            return None;
        }
        let k = cursor.slot?;
        let entry = self.slots.get(k)?;
        (self.bucket_of(entry.hash) == cursor.bucket).then_some((cursor.bucket, k))
    }

    pub(crate) fn cursor_entry(&self, cursor: Cursor) -> Option<(&K, &V)> {
        let (_, k) = self.resolve(cursor)?;
        self.slots.get(k).map(|e| (&e.key, &e.value))
    }

    pub(crate) fn cursor_value_mut(&mut self, cursor: Cursor) -> Option<&mut V> {
        let (_, k) = self.resolve(cursor)?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    pub(crate) fn cursor_successor(&self, cursor: Cursor) -> Cursor {
        assert!(
            cursor.epoch == self.epoch,
            "stale cursor: bucket array was rebuilt"
        );
        let Some(k) = cursor.slot else {
            panic!("cannot advance a cursor past the end");
        };
        let Some(entry) = self.slots.get(k) else {
            panic!("stale cursor: entry was erased");
        };
        match entry.next() {
            Some(next) => Cursor::new(cursor.bucket, Some(next), self.epoch),
            None => self.first_live_from(cursor.bucket + 1),
        }
    }

    /// Append a new entry to bucket `b`; no load check.
    fn link_new(&mut self, b: usize, entry: Entry<K, V>) -> DefaultKey {
        let k = self.slots.insert(entry);
        self.buckets[b].push_back(&mut self.slots, k);
        self.first_bucket = self.first_bucket.min(b);
        k
    }

    fn rebalance(&mut self) {
        let target = self.policy.target_buckets(self.len(), self.buckets.len());
        if target != self.buckets.len() {
            self.rebuild(target);
        }
    }

    /// Relink every entry into a fresh array of `target` chains using the
    /// cached hashes. Arena storage and keys survive; cursors do not.
    fn rebuild(&mut self, target: usize) {
        let from = self.buckets.len();
        let order: Vec<DefaultKey> = self
            .buckets
            .iter()
            .flat_map(|chain| chain.keys(&self.slots))
            .collect();

        self.buckets.clear();
        self.buckets.resize(target, Chain::default());
        self.first_bucket = target;
        for k in order {
            let b = self.bucket_of(self.slots[k].hash);
            self.buckets[b].push_back(&mut self.slots, k);
            self.first_bucket = self.first_bucket.min(b);
        }
        self.epoch = self.epoch.wrapping_add(1);

        debug_assert_eq!(
            self.buckets.iter().map(Chain::len).sum::<usize>(),
            self.slots.len()
        );
        trace!(from, to = target, len = self.slots.len(), "Rebuilt bucket array.");
    }
}

impl<K, V, S> ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn locate<Q>(&self, q: &Q) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let b = self.bucket_of(hash);
        self.buckets[b].find(&self.slots, hash, q).map(|k| (b, k))
    }

    /// Insert `key -> value` unless an equal key is already present, in
    /// which case the map is left unchanged and both arguments are dropped.
    pub fn insert(&mut self, key: K, value: V) {
        let hash = self.make_hash(&key);
        let b = self.bucket_of(hash);
        if self.buckets[b].find(&self.slots, hash, &key).is_some() {
            return;
        }
        self.link_new(b, Entry::new(key, value, hash));
        self.rebalance();
    }

    /// Remove the entry for `q` if present. Absent keys are a no-op.
    pub fn erase<Q>(&mut self, q: &Q)
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let cursor = self.find(q);
        let _ = self.remove_at(cursor);
    }

    /// Cursor at the entry for `q`, or `end()` when absent.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.locate(q) {
            Some((b, k)) => Cursor::new(b, Some(k), self.epoch),
            None => self.end(),
        }
    }

    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, k) = self.locate(q)?;
        self.slots.get(k).map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, k) = self.locate(q)?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.locate(q).is_some()
    }

    /// Value for `key`, inserting `V::default()` first when absent.
    pub fn get_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let hash = self.make_hash(&key);
        let b = self.bucket_of(hash);
        let k = match self.buckets[b].find(&self.slots, hash, &key) {
            Some(k) => k,
            None => {
                let k = self.link_new(b, Entry::new(key, V::default(), hash));
                // A rebuild relinks chains but keeps arena keys, so `k` stays valid.
                self.rebalance();
                k
            }
        };
        &mut self.slots[k].value
    }
}

impl<K, V, S> Clone for ChainHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            hasher: self.hasher.clone(),
            policy: self.policy,
            buckets: self.buckets.clone(),
            slots: self.slots.clone(),
            first_bucket: self.first_bucket,
            epoch: self.epoch,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.hasher.clone_from(&source.hasher);
        self.policy = source.policy;
        self.buckets.clone_from(&source.buckets);
        self.slots.clone_from(&source.slots);
        self.first_bucket = source.first_bucket;
        // Cursors taken from `self` before the copy must not resolve.
        self.epoch = self.epoch.max(source.epoch).wrapping_add(1);
    }
}

impl<K, V, S> fmt::Debug for ChainHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl<K, V, S> Eq for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, Q, V, S> Index<&Q> for ChainHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics with "key not found" when `key` is absent.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ChainHashMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for ChainHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order: Vec<DefaultKey> = self
            .buckets
            .iter()
            .flat_map(|chain| chain.keys(&self.slots))
            .collect();
        IntoIter::new(self.slots, order)
    }
}
