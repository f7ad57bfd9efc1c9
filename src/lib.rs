//! chain-hashmap: a single-threaded, separately chained hash map with an
//! explicit resize policy and copyable cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a chaining hash table whose resize behaviour and traversal
//!   protocol are precise enough to test edge cases deterministically.
//! - Layers:
//!   - Arena: a generational `SlotMap` owns every entry (key, value,
//!     cached hash, chain links).
//!   - Chain: per-bucket doubly linked list threaded through arena keys;
//!     append, scan by key, O(1) unlink by key.
//!   - ChainHashMap<K, V, S>: bucket array of chains plus `ResizePolicy`;
//!     public keyed API, cursors and iterators.
//!
//! Constraints
//! - Keys are unique; inserting an existing key is a silent no-op and
//!   the stored value wins.
//! - After every insert/erase, `len / bucket_count` lies within the
//!   policy thresholds whenever more than one bucket exists.
//! - Bucket count starts at 1, doubles on growth, halves on shrink,
//!   never drops below 1. At most one rebuild per insert/erase.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash; bucket selection during a rebuild
//!   uses the stored hash, so `K: Hash` runs exactly once per insert
//!   attempt and never during a rebuild.
//!
//! Cursors
//! - A `Cursor` is `(bucket, arena key, epoch)`, never a reference. A
//!   rebuild keeps arena keys but starts a new epoch, so every older
//!   cursor reads as stale. Erasing an entry stales only cursors naming
//!   it; generational keys prevent reuse from aliasing.
//! - Stale and end cursors read as `None`; advancing them panics.
//!
//! Notes and non-goals
//! - No internal synchronization; the map is `Send`/`Sync` exactly when
//!   its contents and hasher are, and mutation requires `&mut`.
//! - No open addressing, no custom allocators.

mod chain;
mod chain_hash_map;
mod chain_hash_map_proptest;
mod cursor;
mod error;
mod iter;
mod policy;

// Public surface
pub use chain_hash_map::ChainHashMap;
pub use cursor::Cursor;
pub use error::{Error, Result};
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use policy::{ResizePolicy, GROWTH_FACTOR};
