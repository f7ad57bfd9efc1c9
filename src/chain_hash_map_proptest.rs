#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so they can use
// crate-private helpers and run against a hasher that forces collisions.

use crate::chain_hash_map::ChainHashMap;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::policy::ResizePolicy;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    GetOrDefault(usize, i32),
    Erase(usize),
    Find(usize),
    At(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let at_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::GetOrDefault(i, d)),
            4 => idx.clone().prop_map(Op::Erase),
            2 => idx.clone().prop_map(Op::Find),
            2 => prop_oneof![at_pool.prop_map(|s: String| s), "[a-z]{0,5}".prop_map(|s| s)]
                .prop_map(Op::At),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Replays `ops` on the map and a std HashMap model, checking after each
// step:
// - first insert wins; `get_or_default` inserts a default only on miss;
// - `find`/`at` parity with the model, `at` never inserts;
// - cursor traversal visits each live entry exactly once;
// - cursors taken before an erase never resolve again;
// - `len` parity and the load factor stays within policy.
fn run_scenario<S>(
    mut sut: ChainHashMap<Key, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut stale: Vec<Cursor> = Vec::new();
    let policy = sut.policy();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key_from(pool, i);
                sut.insert(k.clone(), v);
                model.entry(k).or_insert(v);
            }
            Op::GetOrDefault(i, d) => {
                let k = key_from(pool, i);
                let v = sut.get_or_default(k.clone());
                *v = v.wrapping_add(d);
                let mv = model.entry(k).or_default();
                *mv = mv.wrapping_add(d);
            }
            Op::Erase(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.is_end(), !model.contains_key(&k));
                sut.erase(&k);
                model.remove(&k);
                prop_assert!(sut.find(&k).is_end());
                if !c.is_end() {
                    stale.push(c);
                }
            }
            Op::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                match model.get(&k) {
                    Some(mv) => {
                        prop_assert_eq!(c.key(&sut), Some(&k));
                        prop_assert_eq!(c.value(&sut), Some(mv));
                    }
                    None => prop_assert_eq!(c, sut.end()),
                }
            }
            Op::At(s) => {
                let before = sut.len();
                match model.iter().find(|(k, _)| k.0 == s) {
                    Some((_, mv)) => prop_assert_eq!(sut.at(s.as_str()), Ok(mv)),
                    None => prop_assert_eq!(sut.at(s.as_str()), Err(Error::KeyNotFound)),
                }
                prop_assert_eq!(sut.len(), before);
            }
            Op::Mutate(i, d) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                if let Some(v) = c.value_mut(&mut sut) {
                    *v = v.wrapping_add(d);
                    let mv = model.get_mut(&k).expect("model has live key");
                    *mv = mv.wrapping_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            Op::Iterate => {
                let mut seen = BTreeSet::new();
                let mut c = sut.begin();
                while c != sut.end() {
                    let (k, v) = c.entry(&sut).expect("live cursor resolves");
                    prop_assert_eq!(model.get(k), Some(v));
                    prop_assert!(seen.insert(k.clone()), "entry visited twice");
                    c.advance(&sut);
                }
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(seen, m_keys);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), 1);
            }
        }

        for c in &stale {
            prop_assert!(c.entry(&sut).is_none(), "stale cursor resolved");
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        if sut.bucket_count() > 1 {
            let lf = sut.load_factor();
            prop_assert!(lf >= policy.min_load_factor(), "load {} too low", lf);
            prop_assert!(lf <= policy.max_load_factor(), "load {} too high", lf);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::new(), &pool, ops)?;
    }
}

// Constant hasher: every key shares one chain, stressing equality
// resolution and in-chain unlinking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

// Arbitrary valid policies, including a zero lower bound.
fn arb_policy() -> impl Strategy<Value = ResizePolicy> {
    (0.05f64..4.0, 0.0f64..=0.5).prop_map(|(max, ratio)| {
        ResizePolicy::new(max * ratio, max).expect("ratio <= 0.5 keeps the gap")
    })
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_custom_policy(policy in arb_policy(), (pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::with_policy(policy), &pool, ops)?;
    }
}

// Hash one value so Key and &str agree; guards the Borrow contract the
// lookups rely on.
#[test]
fn key_and_str_hash_alike() {
    let s = std::collections::hash_map::RandomState::new();
    let mut a = s.build_hasher();
    Key("abc".into()).hash(&mut a);
    let mut b = s.build_hasher();
    "abc".hash(&mut b);
    assert_eq!(a.finish(), b.finish());
}
