use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rank_tree::balancing::median_first;
use rank_tree::{AugmentedSearchTree, TreeError};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i64> {
    // Smaller than TEST_SIZE so inserts collide and deletes hit.
    -500i64..500i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64, i64),
    Delete(i64),
    Lookup(i64),
    Contains(i64),
    KthSmallest(usize),
    RankOf(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| TreeOp::Insert(k, v)),
        3 => key_strategy().prop_map(TreeOp::Delete),
        2 => key_strategy().prop_map(TreeOp::Lookup),
        1 => key_strategy().prop_map(TreeOp::Contains),
        2 => (0usize..1_100).prop_map(TreeOp::KthSmallest),
        1 => key_strategy().prop_map(TreeOp::RankOf),
    ]
}

fn tree_from(keys: &[i64]) -> AugmentedSearchTree<i64, i64> {
    let mut tree = AugmentedSearchTree::new();
    for &key in keys {
        tree.insert(key, key * 100).unwrap();
    }
    tree
}

// ─── Model-based checks ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays random operations on both the tree and a `BTreeMap` and asserts
    /// identical observable results at every step.
    #[test]
    fn operations_match_btreemap(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: AugmentedSearchTree<i64, i64> = AugmentedSearchTree::new();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(k, v) => {
                    let expected = if model.contains_key(&k) {
                        Err(TreeError::DuplicateKey)
                    } else {
                        model.insert(k, v);
                        Ok(())
                    };
                    prop_assert_eq!(tree.insert(k, v), expected, "insert({}, {})", k, v);
                }
                TreeOp::Delete(k) => {
                    let expected = model.remove_entry(&k).ok_or(TreeError::KeyNotFound);
                    prop_assert_eq!(tree.delete(&k), expected, "delete({})", k);
                }
                TreeOp::Lookup(k) => {
                    prop_assert_eq!(tree.lookup(&k), model.get(&k).ok_or(TreeError::KeyNotFound), "lookup({})", k);
                }
                TreeOp::Contains(k) => {
                    prop_assert_eq!(tree.contains(&k), model.contains_key(&k), "contains({})", k);
                }
                TreeOp::KthSmallest(k) => {
                    let expected = if k == 0 {
                        None
                    } else {
                        model.iter().nth(k - 1)
                    }
                    .ok_or(TreeError::InvalidRank { rank: k, len: model.len() });
                    prop_assert_eq!(tree.kth_smallest(k), expected, "kth_smallest({})", k);
                }
                TreeOp::RankOf(k) => {
                    let expected = model.keys().position(|&key| key == k).map(|index| index + 1).ok_or(TreeError::KeyNotFound);
                    prop_assert_eq!(tree.rank_of(&k), expected, "rank_of({})", k);
                }
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        prop_assert!(tree.iter().eq(model.iter()));
    }

    #[test]
    fn kth_smallest_lists_keys_in_order(keys in proptest::collection::hash_set(key_strategy(), 1..300)) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let tree = tree_from(&keys);

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        let by_rank: Vec<i64> = (1..=tree.len()).map(|k| *tree.kth_smallest(k).unwrap().0).collect();
        prop_assert_eq!(by_rank, sorted);
    }

    #[test]
    fn delete_then_reinsert_keeps_in_order_sequence(
        keys in proptest::collection::hash_set(key_strategy(), 1..300),
        pick in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<i64> = keys.into_iter().collect();
        let mut tree = tree_from(&keys);
        let before: Vec<(i64, i64)> = tree.iter().map(|(k, v)| (*k, *v)).collect();

        let key = keys[pick.index(keys.len())];
        let (removed_key, removed_value) = tree.delete(&key).unwrap();
        prop_assert_eq!(removed_key, key);
        prop_assert!(!tree.contains(&key));
        prop_assert_eq!(tree.len(), keys.len() - 1);

        tree.insert(removed_key, removed_value).unwrap();
        let after: Vec<(i64, i64)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(after, before);
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn seven_key_scenario() {
    let tree = tree_from(&[5, 3, 8, 1, 4, 7, 9]);

    assert_eq!(tree.len(), 7);
    assert_eq!(tree.kth_smallest(1).unwrap(), (&1, &100));
    assert_eq!(tree.kth_smallest(7).unwrap(), (&9, &900));
    assert_eq!(tree.kth_smallest(4).unwrap(), (&5, &500));
    assert_eq!(tree.kth_smallest(0), Err(TreeError::InvalidRank { rank: 0, len: 7 }));
    assert_eq!(tree.kth_smallest(8), Err(TreeError::InvalidRank { rank: 8, len: 7 }));
}

#[test]
fn empty_tree() {
    let mut tree: AugmentedSearchTree<i64, i64> = AugmentedSearchTree::default();

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.lookup(&1), Err(TreeError::KeyNotFound));
    assert_eq!(tree.delete(&1), Err(TreeError::KeyNotFound));
    assert_eq!(tree.kth_smallest(1), Err(TreeError::InvalidRank { rank: 1, len: 0 }));
    assert_eq!(tree.rank_of(&1), Err(TreeError::KeyNotFound));
    assert_eq!(tree.first_key_value(), None);
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn lookup_mut_and_index() {
    let mut tree = tree_from(&[2, 1, 3]);
    *tree.lookup_mut(&2).unwrap() += 1;

    assert_eq!(tree[&2], 201);
    assert_eq!(tree.lookup_mut(&4), Err(TreeError::KeyNotFound));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key() {
    let tree = tree_from(&[2, 1, 3]);
    let _missing: i64 = tree[&4];
}

#[test]
fn borrowed_lookups() {
    let mut tree = AugmentedSearchTree::new();
    tree.insert(String::from("pear"), 3).unwrap();
    tree.insert(String::from("apple"), 1).unwrap();

    assert_eq!(tree.lookup("pear"), Ok(&3));
    assert!(tree.contains("apple"));
    assert_eq!(tree.rank_of("pear"), Ok(2));
    assert_eq!(tree.delete("apple"), Ok((String::from("apple"), 1)));
}

#[test]
fn extremes_clone_and_equality() {
    let tree = tree_from(&[5, 3, 8, 1, 9]);
    assert_eq!(tree.first_key_value(), Some((&1, &100)));
    assert_eq!(tree.last_key_value(), Some((&9, &900)));

    // Same entries, different shape.
    let other = tree_from(&[1, 3, 5, 8, 9]);
    assert_ne!(tree.height(), other.height());
    assert_eq!(tree, other);
    assert_eq!(tree.clone(), tree);
    assert_eq!(format!("{tree:?}"), "{1: 100, 3: 300, 5: 500, 8: 800, 9: 900}");
}

#[test]
fn kth_smallest_within_subtree() {
    let tree = tree_from(&[5, 3, 8, 1, 4, 7, 9]);

    assert_eq!(tree.kth_smallest_in(&3, 1).unwrap().0, &1);
    assert_eq!(tree.kth_smallest_in(&3, 3).unwrap().0, &4);
    assert_eq!(tree.kth_smallest_in(&5, 7).unwrap().0, &9);
    assert_eq!(tree.kth_smallest_in(&1, 2), Err(TreeError::InvalidRank { rank: 2, len: 1 }));
    assert_eq!(tree.kth_smallest_in(&6, 1), Err(TreeError::KeyNotFound));
}

#[test]
fn sorted_insertion_is_deep_but_correct() {
    let keys: Vec<i64> = (0..5_000).collect();
    let mut tree = AugmentedSearchTree::with_capacity(keys.len());
    for &key in &keys {
        tree.insert(key, key).unwrap();
    }

    assert_eq!(tree.height(), keys.len());
    assert_eq!(tree.kth_smallest(1_234).unwrap(), (&1_233, &1_233));
    for key in (0..5_000).step_by(2) {
        tree.delete(&key).unwrap();
    }
    assert_eq!(tree.len(), 2_500);
    assert_eq!(tree.kth_smallest(1).unwrap().0, &1);
}

#[test]
fn median_first_order_is_shallow() {
    let keys: Vec<i64> = (0..4_095).collect();
    let tree = tree_from(&median_first(&keys));

    assert_eq!(tree.height(), 12);
    assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
}
