#![cfg(test)]

// Property tests for ChainSet kept inside the crate so they can check the
// table's internal invariants after every operation.

use crate::chain_set::ChainSet;
use crate::growth::GrowthPolicy;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    TryInsert(usize),
    Erase(usize),
    Take(usize),
    Find(usize),
    Contains(String),
    Clear,
    Iterate,
    CloneEq,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Insert),
            2 => idx.clone().prop_map(OpI::TryInsert),
            2 => idx.clone().prop_map(OpI::Erase),
            1 => idx.clone().prop_map(OpI::Take),
            2 => idx.clone().prop_map(OpI::Find),
            2 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::CloneEq),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_policy() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![
        Just(GrowthPolicy::Loose),
        Just(GrowthPolicy::default()),
        (0.25f32..4.0).prop_map(GrowthPolicy::MaxLoadFactor),
    ]
}

// Drives one scenario against a std HashSet model.
// Invariants exercised after every op:
// - insert/try_insert report insertion exactly when the model lacked the key.
// - erase/take remove exactly the keys the model holds.
// - find/count/contains agree with the model.
// - iteration yields the model's key set once each.
// - capacity only grows, except that clear resets it to N.
// - every entry sits in the bucket its stored hash selects.
fn run<S, const N: usize>(
    mut sut: ChainSet<Key, S, N>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashSet<Key> = HashSet::new();
    for op in ops {
        let cap_before = sut.capacity();
        let mut cleared = false;
        match op {
            OpI::Insert(i) => {
                let k = key_from(pool, i);
                let fresh = !model.contains(&k);
                let (c, inserted) = sut.insert(k.clone());
                prop_assert_eq!(inserted, fresh);
                prop_assert_eq!(c.get(), Some(&k));
                model.insert(k);
            }
            OpI::TryInsert(i) => {
                let k = key_from(pool, i);
                let fresh = !model.contains(&k);
                match sut.try_insert(k.clone()) {
                    Ok(c) => {
                        prop_assert!(fresh);
                        prop_assert_eq!(c.get(), Some(&k));
                    }
                    Err(e) => {
                        prop_assert!(!fresh);
                        prop_assert_eq!(e.into_key(), k.clone());
                    }
                }
                model.insert(k);
            }
            OpI::Erase(i) => {
                let k = key_from(pool, i);
                let expected = usize::from(model.remove(&k));
                prop_assert_eq!(sut.erase(&k), expected);
            }
            OpI::Take(i) => {
                let k = key_from(pool, i);
                let expected = model.take(&k);
                prop_assert_eq!(sut.take(k.0.as_str()), expected);
            }
            OpI::Find(i) => {
                let k = key_from(pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.is_end(), !model.contains(&k));
                prop_assert_eq!(c == sut.end(), !model.contains(&k));
                if let Some(found) = c.get() {
                    prop_assert_eq!(found, &k);
                }
            }
            OpI::Contains(s) => {
                let present = model.contains(s.as_str());
                prop_assert_eq!(sut.contains(s.as_str()), present);
                prop_assert_eq!(sut.count(s.as_str()), usize::from(present));
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                cleared = true;
            }
            OpI::Iterate => {
                let seen: Vec<Key> = sut.iter().cloned().collect();
                let unique: BTreeSet<Key> = seen.iter().cloned().collect();
                prop_assert_eq!(seen.len(), unique.len(), "iteration repeated a key");
                let m_keys: BTreeSet<Key> = model.iter().cloned().collect();
                prop_assert_eq!(unique, m_keys);
            }
            OpI::CloneEq => {
                let copy = sut.clone();
                prop_assert!(copy == sut);
                prop_assert!(copy.capacity() >= N);
                copy.assert_consistent();
            }
        }

        if cleared {
            prop_assert_eq!(sut.capacity(), N);
        } else {
            prop_assert!(sut.capacity() >= cap_before, "capacity shrank");
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.begin() == sut.end(), model.is_empty());
        sut.assert_consistent();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), policy in arb_policy()) {
        let sut: ChainSet<Key> = ChainSet::with_policy(policy);
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_single_bucket_start((pool, ops) in arb_scenario(), policy in arb_policy()) {
        let sut: ChainSet<Key, ConstBuildHasher, 1> =
            ChainSet::with_hasher_and_policy(ConstBuildHasher, policy);
        run(sut, &pool, ops)?;
    }
}

// Constant hasher: every key collides, stressing chain walks and unlinking.
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

// Property: the set built from any key sequence holds exactly the distinct
// keys, and iteration visits each of them once.
proptest! {
    #[test]
    fn prop_uniqueness(keys in proptest::collection::vec(0u16..200, 0..400)) {
        let set: ChainSet<u16> = keys.iter().copied().collect();
        let distinct: BTreeSet<u16> = keys.iter().copied().collect();
        prop_assert_eq!(set.len(), distinct.len());
        let seen: Vec<u16> = set.iter().copied().collect();
        prop_assert_eq!(seen.len(), distinct.len());
        prop_assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), distinct);
        set.assert_consistent();
    }
}
