// ChainSet property tests (public API).
//
// Property 1: equality does not depend on history.
//  - Two sets holding the same keys, built in different orders, with
//    different initial capacities and growth policies, compare equal.
//
// Property 2: iteration completeness across growth.
//  - After every insert (including those that trigger a rebuild) the keys
//    visited from begin() to end() are exactly the keys with count == 1.
//
// Property 3: erase/reinsert.
//  - Erasing an absent key returns 0 and leaves len alone; erasing then
//    reinserting restores membership without duplicating the key.
use chain_set::{ChainSet, GrowthPolicy};
use hashbrown::hash_map::DefaultHashBuilder;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn arb_policy() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![
        Just(GrowthPolicy::Loose),
        Just(GrowthPolicy::default()),
        (0.25f32..4.0).prop_map(GrowthPolicy::MaxLoadFactor),
    ]
}

fn walk<S, const N: usize>(s: &ChainSet<u32, S, N>) -> Vec<u32> {
    let mut out = Vec::new();
    let mut c = s.begin();
    while c != s.end() {
        out.push(*c.get().unwrap());
        c.advance();
    }
    out
}

// Property 1: content equality independent of insertion order and layout.
proptest! {
    #[test]
    fn prop_equality_independent_of_history(
        keys in proptest::collection::vec(0u32..500, 0..200),
        shuffle_seed in any::<u64>(),
        p1 in arb_policy(),
        p2 in arb_policy(),
    ) {
        let mut a: ChainSet<u32> = ChainSet::with_policy(p1);
        a.extend(keys.iter().copied());

        // Deterministic shuffle from the seed.
        let mut shuffled = keys.clone();
        let mut s = shuffle_seed | 1;
        for i in (1..shuffled.len()).rev() {
            s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (s >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }
        let mut b: ChainSet<u32, DefaultHashBuilder, 1> = ChainSet::with_policy(p2);
        b.extend(shuffled.iter().copied());

        prop_assert!(a == b);
        prop_assert!(b == a);

        // One extra key on either side breaks equality.
        let extra = 1_000;
        b.insert(extra);
        prop_assert!(a != b);
        a.insert(extra);
        prop_assert!(a == b);
    }
}

// Property 2: every key with count == 1 is visited exactly once, after
// every insert, whether or not it triggered growth.
proptest! {
    #[test]
    fn prop_iteration_complete_across_growth(
        keys in proptest::collection::vec(any::<u32>(), 1..150),
        policy in arb_policy(),
    ) {
        let mut s: ChainSet<u32> = ChainSet::with_policy(policy);
        let mut model = BTreeSet::new();
        let mut last_cap = s.capacity();
        for k in keys {
            s.insert(k);
            model.insert(k);
            prop_assert!(s.capacity() >= last_cap);
            last_cap = s.capacity();

            let walked = walk(&s);
            prop_assert_eq!(walked.len(), model.len());
            let walked_set: BTreeSet<u32> = walked.iter().copied().collect();
            prop_assert_eq!(&walked_set, &model);
            for k in &model {
                prop_assert_eq!(s.count(k), 1);
            }
            prop_assert_eq!(s.iter().copied().collect::<Vec<_>>(), walked);
        }
    }
}

// Property 3: erase/reinsert idempotence.
proptest! {
    #[test]
    fn prop_erase_reinsert(
        keys in proptest::collection::vec(0u32..64, 1..80),
        probes in proptest::collection::vec(0u32..128, 1..40),
    ) {
        let mut s: ChainSet<u32> = keys.iter().copied().collect();
        let distinct: BTreeSet<u32> = keys.iter().copied().collect();
        for p in probes {
            let len = s.len();
            if distinct.contains(&p) {
                prop_assert_eq!(s.erase(&p), 1);
                prop_assert_eq!(s.count(&p), 0);
                prop_assert_eq!(s.erase(&p), 0);
                prop_assert_eq!(s.len(), len - 1);
                prop_assert!(s.insert(p).1);
                prop_assert!(!s.insert(p).1);
                prop_assert_eq!(s.count(&p), 1);
                prop_assert_eq!(s.len(), len);
            } else {
                prop_assert_eq!(s.erase(&p), 0);
                prop_assert_eq!(s.len(), len);
                prop_assert!(s.find(&p).is_end());
            }
        }
    }
}
