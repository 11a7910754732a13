use std::collections::BTreeMap;

use bst_map::{BsTree, DefaultBsTree, TreeIterator};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32),
    Erase(u16),
    Balance,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u16..256, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u16..256).prop_map(Op::Erase),
        1 => Just(Op::Balance),
    ]
}

fn build(keys: &[u16]) -> DefaultBsTree<u16, u16> {
    let mut tree = BsTree::new();
    for &k in keys {
        tree.insert(k, k);
    }
    tree
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(op(), 0..200)) {
        let mut tree = BsTree::new();
        let mut model = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let expected = !model.contains_key(&k);
                    model.entry(k).or_insert(v);
                    let (_, inserted) = tree.insert(k, v);
                    prop_assert_eq!(inserted, expected);
                }
                Op::Erase(k) => {
                    prop_assert_eq!(tree.erase(&k), model.remove(&k).is_some());
                    prop_assert!(tree.find(&k).is_end());
                }
                Op::Balance => tree.balance(),
            }
            prop_assert_eq!(tree.verify(), Ok(()));
            prop_assert_eq!(tree.size(), model.len());
        }

        prop_assert!(tree.iter().eq(model.iter()));
    }

    #[test]
    fn prop_traversal_strictly_increasing(keys in prop::collection::vec(any::<u16>(), 0..300)) {
        let tree = build(&keys);
        let walked: Vec<u16> = tree.keys().copied().collect();
        prop_assert!(walked.windows(2).all(|w| w[0] < w[1]));

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn prop_first_insert_wins(key: u16, first: u32, second: u32) {
        let mut tree = BsTree::new();
        prop_assert!(tree.insert(key, first).1);
        prop_assert!(!tree.insert(key, second).1);
        prop_assert_eq!(tree.get(&key), Some(&first));
    }

    #[test]
    fn prop_erase_then_find(keys in prop::collection::vec(any::<u16>(), 1..200), pick: prop::sample::Index) {
        let mut tree = build(&keys);
        let victim = keys[pick.index(keys.len())];
        let size = tree.size();

        prop_assert!(tree.erase(&victim));
        prop_assert!(tree.find(&victim).is_end());
        prop_assert_eq!(tree.size(), size - 1);

        let shape = format!("{:?}", tree);
        prop_assert!(!tree.erase(&victim));
        prop_assert_eq!(tree.size(), size - 1);
        prop_assert_eq!(format!("{:?}", tree), shape);
    }

    #[test]
    fn prop_balance_preserves_contents(keys in prop::collection::vec(any::<u16>(), 0..300)) {
        let mut tree = build(&keys);
        let before: Vec<(u16, u16)> = tree.iter().map(|(k, v)| (*k, *v)).collect();

        tree.balance();
        let after: Vec<(u16, u16)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(before, after);

        let stats = tree.stats();
        prop_assert_eq!(stats.height, stats.min_height());
        prop_assert_eq!(tree.verify(), Ok(()));
    }

    #[test]
    fn prop_copy_is_independent(keys in prop::collection::vec(any::<u16>(), 1..200), extra: u16) {
        let original = build(&keys);
        let mut copy = original.clone();
        prop_assert!(copy.iter().eq(original.iter()));

        let before: Vec<u16> = original.keys().copied().collect();
        copy.erase(&keys[0]);
        copy.insert(extra, 0);
        copy.balance();

        let untouched: Vec<u16> = original.keys().copied().collect();
        prop_assert_eq!(before, untouched);
        prop_assert_eq!(original.verify(), Ok(()));
        prop_assert_eq!(copy.verify(), Ok(()));
    }
}
