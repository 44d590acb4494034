#![cfg(test)]

// Property tests for TreeMap kept inside the crate so they can reach the
// cursor internals without feature gates.

use crate::tree_map::TreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Mutate(usize, i32),
    Contains(String),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Get),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against std::collections::BTreeMap.
// Invariants exercised across random operation sequences:
// - insert returns the previous value exactly when the model had the key.
// - `get`/`contains_key` parity, including borrowed `&str` lookups.
// - `remove` of an absent key is a no-op returning `None`.
// - `iter` yields entries in strictly ascending key order, matching the
//   model's entries exactly; reverse iteration is the exact mirror.
// - `len`/`is_empty` parity with the model after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: TreeMap<String, i32> = TreeMap::new();
        let mut model: BTreeMap<String, i32> = BTreeMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.insert(k.clone(), v);
                    let mprev = model.insert(k, v);
                    prop_assert_eq!(prev, mprev);
                }
                OpI::Remove(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.remove(k.as_str()), model.remove(k));
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    prop_assert_eq!(sut.get(k.as_str()), model.get(k));
                    prop_assert_eq!(sut.try_get(k.as_str()).ok(), model.get(k));
                }
                OpI::Mutate(i, d) => {
                    let k = &pool[i];
                    match (sut.get_mut(k.as_str()), model.get_mut(k)) {
                        (Some(v), Some(mv)) => {
                            *v = v.saturating_add(d);
                            *mv = mv.saturating_add(d);
                        }
                        (None, None) => {}
                        _ => prop_assert!(false, "get_mut presence must match model"),
                    }
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(&s));
                }
                OpI::Iterate => {
                    let got: Vec<(&String, &i32)> = sut.iter().collect();
                    let want: Vec<(&String, &i32)> = model.iter().collect();
                    prop_assert_eq!(&got, &want);
                    for w in got.windows(2) {
                        prop_assert!(w[0].0 < w[1].0, "keys must ascend strictly");
                    }
                    let mut rev: Vec<(&String, &i32)> = sut.iter_rev().collect();
                    rev.reverse();
                    prop_assert_eq!(rev, want);
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
            }

            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}

// Property: a forward cursor walk visits exactly the sorted key set, and
// advancing k steps then retreating k steps always lands back on the
// first entry. The retreat path may rebuild the initial spine when it
// crosses the fixed root, which also lands on the first entry, so the
// round trip holds for every k including walks that run off the end.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_cursor_round_trip(keys in proptest::collection::btree_set(0u32..1000, 1..40), extra in 0usize..4) {
        let map: TreeMap<u32, u32> = keys.iter().map(|&k| (k, k)).collect();
        let sorted: Vec<u32> = keys.iter().copied().collect();

        let mut walked = Vec::new();
        let mut c = map.cursor();
        while let Some(k) = c.key(&map) {
            walked.push(*k);
            c.advance(&map);
        }
        prop_assert_eq!(&walked, &sorted);

        for k in 0..=(sorted.len() + extra) {
            let mut c = map.cursor();
            for _ in 0..k {
                c.advance(&map);
            }
            for _ in 0..k {
                c.retreat(&map);
            }
            prop_assert_eq!(c.key(&map), Some(&sorted[0]));
        }
    }
}

// Property: removing through a cursor leaves the cursor on the in-order
// successor and the map equal to the model with that key removed, for
// every possible victim position.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_remove_at_any_position(keys in proptest::collection::btree_set(0u32..1000, 1..30), pick in 0usize..30) {
        let sorted: Vec<u32> = keys.iter().copied().collect();
        let pos = pick % sorted.len();
        let victim = sorted[pos];

        let mut map: TreeMap<u32, u32> = keys.iter().map(|&k| (k, k * 2)).collect();
        let mut c = map.find(&victim);
        map.remove_at(&mut c);

        prop_assert_eq!(c.key(&map), sorted.get(pos + 1));
        let left: Vec<u32> = map.keys().copied().collect();
        let want: Vec<u32> = sorted.iter().copied().filter(|&k| k != victim).collect();
        prop_assert_eq!(left, want);
        prop_assert!(!map.contains_key(&victim));
    }
}
