// ChainHashMap public API suite.
//
// Each test documents the behavior being verified. Core invariants:
// - Uniqueness: inserting a present key never overwrites its value.
// - Insert-on-miss: only `get_or_default` inserts on a read path.
// - Resize: load factor stays within policy after every insert/erase.
// - Traversal: begin..end visits every live entry exactly once, in an
//   order that is stable while the map is unmodified.
// - Copies: clones are deep and independent.
use chain_hashmap::{ChainHashMap, Error, ResizePolicy};
use std::collections::BTreeSet;

fn walk<K: Clone, V: Clone>(m: &ChainHashMap<K, V>) -> Vec<(K, V)> {
    let mut out = Vec::new();
    let mut c = m.begin();
    while c != m.end() {
        let (k, v) = c.entry(m).expect("live cursor");
        out.push((k.clone(), v.clone()));
        c.advance(m);
    }
    out
}

// Test: the worked scenario from the container's documentation.
// Verifies: sizes, erase visibility, stable traversal, insert-on-miss.
#[test]
fn insert_erase_traverse_scenario() {
    let mut m: ChainHashMap<i32, String> = ChainHashMap::new();
    m.insert(1, "a".to_string());
    m.insert(2, "b".to_string());
    m.insert(3, "c".to_string());
    assert_eq!(m.len(), 3);

    m.erase(&2);
    assert_eq!(m.len(), 2);
    assert_eq!(m.find(&2), m.end());

    let first = walk(&m);
    let as_set: BTreeSet<_> = first.iter().cloned().collect();
    let expected: BTreeSet<_> = [(1, "a".to_string()), (3, "c".to_string())].into();
    assert_eq!(as_set, expected);
    assert_eq!(walk(&m), first, "traversal order must be stable");

    let v = m.get_or_default(4);
    assert!(v.is_empty());
    assert_eq!(m.len(), 3);
}

// Test: distinct keys are all findable and counted once.
#[test]
fn distinct_inserts_are_all_found() {
    let mut m = ChainHashMap::new();
    for i in 0..1_000u64 {
        m.insert(i.wrapping_mul(0x9e37_79b9_7f4a_7c15), i);
    }
    assert_eq!(m.len(), 1_000);
    for i in 0..1_000u64 {
        let c = m.find(&i.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        assert_eq!(c.value(&m), Some(&i));
    }
}

// Test: first insert wins.
#[test]
fn insert_does_not_overwrite() {
    let mut m = ChainHashMap::new();
    m.insert("k", 1);
    m.insert("k", 2);
    assert_eq!(m.at(&"k"), Ok(&1));
    assert_eq!(m.len(), 1);
}

// Test: mutation through the `get_or_default` reference is observable.
#[test]
fn get_or_default_reference_is_live() {
    let mut m: ChainHashMap<String, i32> = ChainHashMap::new();
    *m.get_or_default("hits".to_string()) += 1;
    *m.get_or_default("hits".to_string()) += 1;
    assert_eq!(m.at("hits"), Ok(&2));
    assert_eq!(m["hits"], 2);
}

// Test: erase then reinsert round-trip picks up the new value.
#[test]
fn erase_then_reinsert_uses_new_value() {
    let mut m = ChainHashMap::new();
    m.insert("k".to_string(), 1);
    m.erase("k");
    assert!(m.find("k").is_end());
    assert_eq!(m.at("k"), Err(Error::KeyNotFound));
    m.insert("k".to_string(), 2);
    assert_eq!(m.at("k"), Ok(&2));
}

// Test: misses are no-ops everywhere except `at`.
#[test]
fn missing_keys_are_no_ops() {
    let mut m: ChainHashMap<u8, u8> = [(1, 1)].into();
    m.erase(&9);
    assert_eq!(m.len(), 1);
    assert_eq!(m.find(&9), m.end());
    assert!(m.get(&9).is_none());
    assert!(m.get_mut(&9).is_none());
    assert_eq!(m.at(&9), Err(Error::KeyNotFound));
    assert_eq!(m.len(), 1, "at() must not insert");
    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
}

// Test: the load factor stays in [0.25, 0.75] once more than one bucket
// exists, through growth and full drain.
#[test]
fn load_factor_invariant_through_grow_and_drain() {
    let mut m = ChainHashMap::new();
    let check = |m: &ChainHashMap<u32, u32>| {
        if m.bucket_count() > 1 {
            assert!((0.25..=0.75).contains(&m.load_factor()), "{}", m.load_factor());
        }
    };
    for i in 0..2_000 {
        m.insert(i, i);
        check(&m);
    }
    assert!(m.bucket_count().is_power_of_two());
    for i in 0..2_000 {
        m.erase(&i);
        check(&m);
    }
    assert_eq!(m.bucket_count(), 1);
}

// Test: construction from iterators and arrays applies the insert rule
// to duplicates.
#[test]
fn range_and_list_construction_keep_first_duplicate() {
    let from_iter: ChainHashMap<&str, i32> = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
    assert_eq!(from_iter.len(), 2);
    assert_eq!(from_iter["a"], 1);

    let from_array = ChainHashMap::from([("a", 1), ("b", 2), ("a", 3)]);
    assert_eq!(from_array, from_iter);

    let mut extended = ChainHashMap::new();
    extended.extend([("b", 20), ("c", 30)]);
    extended.extend(from_iter.iter().map(|(k, v)| (*k, *v)));
    assert_eq!(extended["b"], 20);
    assert_eq!(extended.len(), 3);
}

// Test: copies are independent of the original.
#[test]
fn clone_then_mutate_leaves_original() {
    let original: ChainHashMap<String, Vec<u8>> =
        [("x".to_string(), vec![1]), ("y".to_string(), vec![2])].into();
    let mut copy = original.clone();
    copy.get_mut("x").unwrap().push(9);
    copy.erase("y");
    copy.insert("z".to_string(), vec![]);
    assert_eq!(original["x"], vec![1u8]);
    assert!(original.contains_key("y"));
    assert!(!original.contains_key("z"));
    assert_eq!(copy.len(), 2);
}

// Test: moving out leaves a usable empty map behind.
#[test]
fn take_transfers_entries() {
    let mut src: ChainHashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    let dst = std::mem::take(&mut src);
    assert_eq!(dst.len(), 100);
    assert!(src.is_empty());
    assert_eq!(src.begin(), src.end());
}

// Test: `clear` discards entries and resets the bucket array.
#[test]
fn clear_resets_to_initial_state() {
    let mut m: ChainHashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.bucket_count(), 1);
    assert_eq!(m.begin(), m.end());
    m.insert(1, 1);
    assert_eq!(m.len(), 1);
}

// Test: configured policy and hasher are exposed unchanged.
#[test]
fn policy_and_hasher_accessors() {
    let policy = ResizePolicy::new(0.1, 0.5).unwrap();
    let hasher = std::collections::hash_map::RandomState::new();
    let m: ChainHashMap<u32, u32> = ChainHashMap::with_policy_and_hasher(policy, hasher.clone());
    assert_eq!(m.policy(), policy);
    use std::hash::BuildHasher;
    assert_eq!(m.hasher().hash_one(7u32), hasher.hash_one(7u32));

    match ResizePolicy::new(0.6, 1.0) {
        Err(Error::InvalidLoadFactors { min, max }) => {
            assert_eq!((min, max), (0.6, 1.0));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

// Test: iterator adaptors agree with one another and with `len`.
#[test]
fn iterators_agree() {
    let mut m: ChainHashMap<u32, u32> = (0..64).map(|i| (i, i * 2)).collect();
    let pairs: Vec<(u32, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
    let keys: Vec<u32> = m.keys().copied().collect();
    let values: Vec<u32> = m.values().copied().collect();
    assert_eq!(pairs.len(), m.len());
    assert_eq!(keys, pairs.iter().map(|p| p.0).collect::<Vec<_>>());
    assert_eq!(values, pairs.iter().map(|p| p.1).collect::<Vec<_>>());

    for (_, v) in &mut m {
        *v += 1;
    }
    for (k, v) in &m {
        assert_eq!(*v, k * 2 + 1);
    }
    let owned: Vec<(u32, u32)> = m.into_iter().collect();
    assert_eq!(owned.iter().map(|p| p.0).collect::<Vec<_>>(), keys);
}
