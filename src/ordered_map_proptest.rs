#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so they can check the
// internal index after every step.

use crate::error::MapError;
use crate::ordered_map::OrderedMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::Hasher;

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

// Pool-indexed keys shrink toward earlier pool entries; raw positions are
// reduced modulo the current length (plus one, to hit the out-of-range path).
#[derive(Clone, Debug)]
enum Op {
    Push(usize, i32),
    PushWith(usize, i32),
    RemoveKey(usize),
    RemoveIndex(usize),
    RemoveFast(usize),
    RenameKey(usize, usize),
    RenameIndex(usize, usize),
    Mutate(usize, i32),
    MutateIndex(usize, i32),
    Contains(String),
    Lookup(usize),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let pos = 0usize..16;
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Push(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::PushWith(i, v)),
            1 => idx.clone().prop_map(Op::RemoveKey),
            1 => pos.clone().prop_map(Op::RemoveIndex),
            1 => pos.clone().prop_map(Op::RemoveFast),
            1 => (idx.clone(), idx.clone()).prop_map(|(a, b)| Op::RenameKey(a, b)),
            1 => (pos.clone(), idx.clone()).prop_map(|(p, b)| Op::RenameIndex(p, b)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => (pos.clone(), any::<i32>()).prop_map(|(p, d)| Op::MutateIndex(p, d)),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            2 => idx.clone().prop_map(Op::Lookup),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn model_find(model: &[(Key, i32)], k: &Key) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

// Property: state-machine equivalence against a Vec<(K, V)> model, which is
// trivially ordered and dense.
// Invariants exercised across random operation sequences:
// - Duplicate pushes and renames onto another entry's key are rejected and
//   leave the map unchanged.
// - Removing by key, by position, or unchecked shifts later positions down.
// - Every failing call returns the matching MapError.
// - After each op: same length, same (key, value) sequence, `index_of`
//   agrees with the model, and the internal index passes `assert_invariants`.
fn run_state_machine<S: BuildHasher>(
    mut sut: OrderedMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(Key, i32)> = Vec::new();

    for op in ops {
        match op {
            Op::Push(i, v) | Op::PushWith(i, v) => {
                let k = key_from(&pool, i);
                let already = model_find(&model, &k).is_some();
                let res = match op {
                    Op::Push(..) => sut.push_back(k.clone(), v).map(|r| *r),
                    _ => sut.push_back_with(k.clone(), || v).map(|r| *r),
                };
                if already {
                    prop_assert_eq!(res, Err(MapError::DuplicateKey));
                } else {
                    prop_assert_eq!(res, Ok(v));
                    model.push((k, v));
                }
            }
            Op::RemoveKey(i) => {
                let k = key_from(&pool, i);
                match model_find(&model, &k) {
                    Some(p) => prop_assert_eq!(sut.remove(&k), Ok(model.remove(p))),
                    None => prop_assert_eq!(sut.remove(&k), Err(MapError::KeyNotFound)),
                }
            }
            Op::RemoveIndex(raw) => {
                let p = raw % (model.len() + 1);
                if p < model.len() {
                    prop_assert_eq!(sut.remove_index(p), Ok(model.remove(p)));
                } else {
                    prop_assert_eq!(
                        sut.remove_index(p),
                        Err(MapError::IndexOutOfRange { index: p, len: model.len() })
                    );
                }
            }
            Op::RemoveFast(raw) => {
                if !model.is_empty() {
                    let p = raw % model.len();
                    let k = model[p].0.clone();
                    prop_assert_eq!(sut.remove_fast(p, k.0.as_str()), model.remove(p));
                }
            }
            Op::RenameKey(a, b) => {
                let old = key_from(&pool, a);
                let new = key_from(&pool, b);
                let res = sut.rename_key(&old, new.clone());
                match (model_find(&model, &old), model_find(&model, &new)) {
                    (None, _) => prop_assert_eq!(res, Err(MapError::KeyNotFound)),
                    (Some(p), Some(q)) if p != q => {
                        prop_assert_eq!(res, Err(MapError::DuplicateKey))
                    }
                    (Some(p), _) => {
                        prop_assert_eq!(res, Ok(()));
                        model[p].0 = new;
                    }
                }
            }
            Op::RenameIndex(raw, b) => {
                let p = raw % (model.len() + 1);
                let new = key_from(&pool, b);
                let res = sut.rename_index(p, new.clone());
                if p >= model.len() {
                    prop_assert_eq!(
                        res,
                        Err(MapError::IndexOutOfRange { index: p, len: model.len() })
                    );
                } else {
                    match model_find(&model, &new) {
                        Some(q) if q != p => prop_assert_eq!(res, Err(MapError::DuplicateKey)),
                        _ => {
                            prop_assert_eq!(res, Ok(()));
                            model[p].0 = new;
                        }
                    }
                }
            }
            Op::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match model_find(&model, &k) {
                    Some(p) => {
                        let v = sut.get_mut(&k).expect("live key resolves");
                        *v = v.wrapping_add(d);
                        model[p].1 = model[p].1.wrapping_add(d);
                    }
                    None => prop_assert_eq!(sut.get_mut(&k).err(), Some(MapError::KeyNotFound)),
                }
            }
            Op::MutateIndex(raw, d) => {
                let p = raw % (model.len() + 1);
                match sut.get_index_mut(p) {
                    Ok(v) => {
                        prop_assert!(p < model.len());
                        *v = v.wrapping_add(d);
                        model[p].1 = model[p].1.wrapping_add(d);
                    }
                    Err(e) => prop_assert_eq!(
                        e,
                        MapError::IndexOutOfRange { index: p, len: model.len() }
                    ),
                }
            }
            Op::Contains(s) => {
                let has_model = model.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Lookup(i) => {
                let k = key_from(&pool, i);
                match model_find(&model, &k) {
                    Some(p) => {
                        prop_assert_eq!(sut.index_of(&k), Ok(p));
                        prop_assert_eq!(sut.get(&k), Ok(&model[p].1));
                        prop_assert_eq!(sut.key_at(p), Ok(&k));
                    }
                    None => {
                        prop_assert_eq!(sut.index_of(&k), Err(MapError::KeyNotFound));
                        prop_assert_eq!(sut.get(&k), Err(MapError::KeyNotFound));
                    }
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let seen: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&seen, &model);
        for (p, (k, _)) in model.iter().enumerate() {
            prop_assert_eq!(sut.index_of(k), Ok(p));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(OrderedMap::<Key, i32, RandomState>::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution
// and renumbering when every entry shares one hash.
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
        run_state_machine(OrderedMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}
