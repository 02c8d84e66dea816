#![cfg(test)]

// Property tests for the map façade and the engine kept inside the crate
// so they can reach internals without feature gates.

use crate::policy::target_length;
use crate::ChainMap;
use proptest::prelude::*;
use std::collections::HashMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, the pool shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    RetainEven,
    Clear,
    ShrinkToFit,
    Reserve(usize),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> String {
    pool[i].clone()
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            Just(OpI::RetainEven),
            Just(OpI::Clear),
            Just(OpI::ShrinkToFit),
            (0usize..40).prop_map(OpI::Reserve),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - insert/remove/get/contains parity with the model after every op.
// - `len` parity, and `len == iter().count()` whenever we iterate.
// - The capacity is always zero or a power of two, and after an explicit
//   shrink it sits exactly where the resize policy puts it.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ChainMap<String, i32> = ChainMap::new();
        let mut model: HashMap<String, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.remove(&k), model.remove(&k));
                }
                OpI::Get(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(s.as_str()));
                }
                OpI::RetainEven => {
                    sut.retain(|_, v| v % 2 == 0);
                    model.retain(|_, v| *v % 2 == 0);
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
                OpI::ShrinkToFit => {
                    sut.shrink_to_fit();
                    prop_assert_eq!(
                        sut.capacity(),
                        target_length(model.len(), sut.capacity())
                    );
                }
                OpI::Reserve(extra) => {
                    let before = sut.capacity();
                    sut.reserve(extra);
                    prop_assert!(sut.capacity() >= before);
                    prop_assert!(sut.capacity() >= sut.len() + extra || extra == 0);
                }
                OpI::Iterate => {
                    prop_assert_eq!(sut.iter().count(), model.len());
                    for (k, v) in sut.iter() {
                        prop_assert_eq!(model.get(k), Some(v));
                    }
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            let cap = sut.capacity();
            prop_assert!(cap == 0 || cap.is_power_of_two(), "cap={}", cap);
            prop_assert!(cap >= sut.len() || cap == 0);
        }
    }
}

// Property: a cursor sweep that removes an arbitrary subset leaves exactly
// the complement behind, still findable, while `len` matches a full
// iteration at every point.
proptest! {
    #[test]
    fn prop_cursor_removal_subset(
        keys in proptest::collection::btree_set(0u32..200, 0..60),
        mask in any::<u64>(),
    ) {
        let mut sut: ChainMap<u32, u32> = keys.iter().map(|&k| (k, k * 3)).collect();
        let expected_len = keys.len();
        prop_assert_eq!(sut.len(), expected_len);

        // Drop every key whose low-6-bit slice of `mask` is set, using the
        // façade's cursor-backed retain.
        let dropped: Vec<u32> = keys
            .iter()
            .copied()
            .filter(|k| mask & (1 << (k % 64)) != 0)
            .collect();
        sut.retain(|k, _| mask & (1 << (k % 64)) == 0);

        prop_assert_eq!(sut.len(), expected_len - dropped.len());
        prop_assert_eq!(sut.iter().count(), sut.len());
        for k in &keys {
            if dropped.contains(k) {
                prop_assert!(sut.get(k).is_none());
            } else {
                prop_assert_eq!(sut.get(k), Some(&(k * 3)));
            }
        }
    }
}
