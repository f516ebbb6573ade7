extern crate std;

use std::{
    cell::Cell, collections::BTreeSet, ops::Range, prelude::v1::*, ptr::NonNull, rc::Rc,
};

use proptest::prelude::*;

use crate::model::{self, Mode, TestNode};

use super::*;

fn avl(keys: &[u32]) -> AvlTree<TestNode> {
    let mut tree = AvlTree::new();

    for &key in keys {
        tree.insert(TestNode::new(key));
        tree.assert_balanced();
    }

    tree
}

fn plain(keys: &[u32]) -> AvlTree<TestNode> {
    let mut tree = AvlTree::new();

    for &key in keys {
        tree.insert_unbalanced(TestNode::new(key));
        tree.assert_invariants();
    }

    tree
}

fn keys(tree: &AvlTree<TestNode>, order: Order) -> Vec<u32> {
    tree.traverse(order).map(|node| node.key).collect()
}

fn pre_order(tree: &AvlTree<TestNode>) -> Vec<u32> {
    keys(tree, Order::Pre)
}

fn ptr_of(tree: &AvlTree<TestNode>, key: u32) -> NonNull<TestNode> {
    tree.search(&key).expect("item not found").as_ptr()
}

fn insert_find_all(keys: &[u32]) {
    let tree = avl(keys);

    for key in keys {
        let node = tree.get_raw(key).expect("item not found");
        assert_eq!(unsafe { node.as_ref().key() }, key);
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree = avl(keys);

    for key in keys {
        let node = tree.get_raw(key).expect("item not found");
        unsafe { tree.remove_at(node) };
        tree.assert_balanced();
    }

    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(TestNode::new(key));
        tree.assert_balanced();
    }

    for key in keys.iter().rev() {
        assert!(tree.remove(key).is_some());
        tree.assert_balanced();
        assert!(tree.get(key).is_none());
    }

    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all(&[0, 1, 2, 3]);
    insert_remove_all(&[0, 1, 3, 2]);
    insert_remove_all(&[0, 2, 1, 3]);
    insert_remove_all(&[0, 2, 3, 1]);
    insert_remove_all(&[0, 3, 1, 2]);
    insert_remove_all(&[0, 3, 2, 1]);

    insert_remove_all(&[1, 0, 2, 3]);
    insert_remove_all(&[1, 0, 3, 2]);
    insert_remove_all(&[1, 2, 0, 3]);
    insert_remove_all(&[1, 2, 3, 0]);
    insert_remove_all(&[1, 3, 0, 2]);
    insert_remove_all(&[1, 3, 2, 0]);

    insert_remove_all(&[2, 0, 1, 3]);
    insert_remove_all(&[2, 0, 3, 1]);
    insert_remove_all(&[2, 1, 0, 3]);
    insert_remove_all(&[2, 1, 3, 0]);
    insert_remove_all(&[2, 3, 0, 1]);
    insert_remove_all(&[2, 3, 1, 0]);

    insert_remove_all(&[3, 0, 1, 2]);
    insert_remove_all(&[3, 0, 2, 1]);
    insert_remove_all(&[3, 1, 0, 2]);
    insert_remove_all(&[3, 1, 2, 0]);
    insert_remove_all(&[3, 2, 0, 1]);
    insert_remove_all(&[3, 2, 1, 0]);
}

#[test]
fn ascending_insert_rotates_counter_clockwise() {
    let tree = avl(&[10, 20, 30]);

    let root = tree.root().unwrap();
    assert_eq!(*root.key(), 20);
    assert_eq!(root.left().map(|n| *n.key()), Some(10));
    assert_eq!(root.right().map(|n| *n.key()), Some(30));
    assert_eq!(tree.height(Some(root)), 1);
}

#[test]
fn descending_insert_rotates_clockwise() {
    let tree = avl(&[30, 20, 10]);

    let root = tree.root().unwrap();
    assert_eq!(*root.key(), 20);
    assert_eq!(root.left().map(|n| *n.key()), Some(10));
    assert_eq!(root.right().map(|n| *n.key()), Some(30));
}

#[test]
fn double_rotations() {
    // Left-right at the root.
    assert_eq!(pre_order(&avl(&[30, 10, 20])), [20, 10, 30]);
    // Right-left at the root.
    assert_eq!(pre_order(&avl(&[10, 30, 20])), [20, 10, 30]);
}

#[test]
fn rotation_below_the_root() {
    let tree = avl(&[50, 25, 75, 80, 90]);

    // 75 was rotated down under 80; the root stays put.
    assert_eq!(pre_order(&tree), [50, 25, 80, 75, 90]);
    assert_eq!(tree.height(tree.root()), 2);
}

#[test]
fn plain_insert_keeps_arrival_shape() {
    let tree = plain(&[5, 4, 2, 11, 9, 12, 7]);

    assert_eq!(pre_order(&tree), [5, 4, 2, 11, 9, 7, 12]);
    assert_eq!(keys(&tree, Order::In), [2, 4, 5, 7, 9, 11, 12]);
    assert_eq!(keys(&tree, Order::Post), [2, 4, 7, 9, 12, 11, 5]);
    assert_eq!(keys(&tree, Order::BreadthFirst), [5, 4, 11, 2, 9, 12, 7]);
    assert_eq!(tree.height(tree.root()), 3);
}

#[test]
fn plain_insert_routes_duplicates_right() {
    let tree = plain(&[5, 5, 5]);

    assert_eq!(tree.height(tree.root()), 2);
    let root = tree.root().unwrap();
    assert!(root.left().is_none());
    assert_eq!(root.right().and_then(|n| n.right()).map(|n| *n.key()), Some(5));
}

#[test]
fn remove_root_with_two_children_uses_left_maximum() {
    let mut tree = avl(&[10, 5, 15, 3, 7, 12, 20]);

    assert!(tree.remove(&10).is_some());
    tree.assert_balanced();

    assert_eq!(tree.root().map(|n| *n.key()), Some(7));
    assert_eq!(pre_order(&tree), [7, 5, 3, 15, 12, 20]);
    assert!(tree.search(&10).is_none());
}

#[test]
fn node_refs_compare_by_identity() {
    let tree = plain(&[5, 5, 7]);

    let root = tree.root().unwrap();
    assert_eq!(tree.search(&5), Some(root));
    assert_eq!(root.right().and_then(|n| n.parent()), Some(root));

    // Same key, different node.
    let twin = root.right().unwrap();
    assert_eq!(twin.key(), root.key());
    assert_ne!(twin, root);
}

#[test]
fn remove_missing_key_is_a_no_op() {
    let mut tree = avl(&[1, 2, 3]);
    let before = pre_order(&tree);

    assert!(tree.remove(&99).is_none());
    assert!(tree.remove_unbalanced(&99).is_none());

    assert_eq!(pre_order(&tree), before);
    assert_eq!(tree.len(), 3);
}

#[test]
fn remove_from_empty_tree() {
    let mut tree: AvlTree<TestNode> = AvlTree::new();
    assert!(tree.remove(&1).is_none());
    assert!(tree.root().is_none());
}

#[test]
fn plain_remove_leaf() {
    let mut tree = plain(&[5, 4, 2, 11, 9, 12, 7]);

    assert!(tree.remove_unbalanced(&2).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [5, 4, 11, 9, 7, 12]);
}

#[test]
fn plain_remove_only_left_child() {
    let mut tree = plain(&[5, 4, 2, 11, 9, 12, 7]);

    assert!(tree.remove_unbalanced(&4).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [5, 2, 11, 9, 7, 12]);

    assert!(tree.remove_unbalanced(&9).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [5, 2, 11, 7, 12]);
}

#[test]
fn plain_remove_only_right_child() {
    let mut tree = plain(&[1, 2, 3]);

    assert!(tree.remove_unbalanced(&2).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [1, 3]);

    // The root itself has only a right child.
    assert!(tree.remove_unbalanced(&1).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [3]);
    assert!(tree.root().unwrap().parent().is_none());
}

#[test]
fn plain_remove_two_children_replacement_is_child() {
    let mut tree = plain(&[5, 4, 2, 11, 9, 12, 7]);

    // 11's left subtree is taller, and its maximum, 9, is 11's own child.
    assert!(tree.remove_unbalanced(&11).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [5, 4, 2, 9, 7, 12]);
}

#[test]
fn plain_remove_two_children_searches_taller_right() {
    let mut tree = plain(&[5, 4, 2, 11, 9, 12, 7]);

    // The right subtree is taller, so the minimum of the right subtree replaces the root.
    assert!(tree.remove_unbalanced(&5).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [7, 4, 2, 11, 9, 12]);
    assert_eq!(tree.height(tree.root()), 2);
}

#[test]
fn plain_remove_two_children_replacement_has_child() {
    let mut tree = plain(&[10, 5, 15, 3, 7, 6]);

    // 7 replaces 10 and its left child 6 is elevated into 7's old slot.
    assert!(tree.remove_unbalanced(&10).is_some());
    tree.assert_invariants();
    assert_eq!(pre_order(&tree), [7, 5, 3, 6, 15]);
}

#[test]
fn removal_relinks_the_replacement_node() {
    let mut tree = avl(&[10, 5, 15, 3, 7, 12, 20]);
    let seven = ptr_of(&tree, 7);

    tree.remove(&10);

    // The replacement is moved, not copied.
    assert_eq!(tree.root().map(|n| n.as_ptr()), Some(seven));
}

#[test]
fn insert_then_remove_without_rotation_restores_shape() {
    let mut tree = avl(&[2, 1, 3]);
    let before = pre_order(&tree);

    tree.insert(TestNode::new(4));
    assert_eq!(pre_order(&tree), [2, 1, 3, 4]);

    tree.remove(&4);
    tree.assert_balanced();
    assert_eq!(pre_order(&tree), before);
}

#[test]
fn rotation_at_root_preserves_order() {
    let mut tree = plain(&[4, 2, 6, 1, 3, 5, 7]);
    let in_before = keys(&tree, Order::In);
    let pre_before = pre_order(&tree);

    let root = ptr_of(&tree, 4);
    let up = unsafe { tree.rotate_clockwise(root) };

    assert_eq!(unsafe { up.as_ref().key }, 2);
    tree.assert_invariants();
    assert_eq!(tree.root().map(|n| *n.key()), Some(2));
    assert_eq!(keys(&tree, Order::In), in_before);
    assert_ne!(pre_order(&tree), pre_before);
    assert_eq!(pre_order(&tree), [2, 1, 4, 3, 6, 5, 7]);
}

#[test]
fn rotation_below_root_relinks_parent() {
    let mut tree = plain(&[4, 2, 6, 1, 3, 5, 7]);
    let in_before = keys(&tree, Order::In);

    let six = ptr_of(&tree, 6);
    let up = unsafe { tree.rotate_counter_clockwise(six) };

    // Ancestors of a rotation are refreshed by the walk, not the rotation.
    tree.retrace(Some(up), Fixup::HeightsOnly);
    tree.assert_invariants();

    assert_eq!(keys(&tree, Order::In), in_before);
    assert_eq!(pre_order(&tree), [4, 2, 1, 3, 7, 6, 5]);
    assert_eq!(tree.search(&7).and_then(|n| n.parent()).map(|n| *n.key()), Some(4));
}

#[test]
fn first_and_last() {
    let tree = avl(&[8, 3, 9, 1, 5]);

    assert_eq!(tree.first().map(|n| n.key), Some(1));
    assert_eq!(tree.last().map(|n| n.key), Some(9));

    let empty: AvlTree<TestNode> = AvlTree::new();
    assert!(empty.first().is_none());
    assert!(empty.last().is_none());
}

#[test]
fn check_reports_stale_heights() {
    let mut tree = plain(&[4, 2, 6, 5]);

    let six = ptr_of(&tree, 6);
    unsafe { tree.rotate_clockwise(six) };

    // The root's height is unchanged by this rotation.
    tree.assert_invariants();

    unsafe { links_mut(six).set_height(7) };
    assert!(matches!(
        tree.check_invariants(),
        Err(InvariantError::StaleHeight { .. })
    ));
    assert!(tree.check_balanced().is_err());

    unsafe { links_mut(six).set_height(0) };
    tree.assert_invariants();
}

unsafe fn links_mut<'a>(node: NonNull<TestNode>) -> &'a mut Links<TestNode> {
    unsafe { TestNode::links(node).as_mut() }
}

struct CountedNode {
    links: Links<CountedNode>,
    key: u32,
    drops: Rc<Cell<usize>>,
}

impl Drop for CountedNode {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

unsafe impl Linked<Links<CountedNode>> for CountedNode {
    type Handle = Box<CountedNode>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        Box::leak(r).into()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<CountedNode>> {
        let ptr = ptr.as_ptr();
        unsafe { NonNull::new_unchecked(core::ptr::addr_of_mut!((*ptr).links)) }
    }
}

impl TreeNode<Links<CountedNode>> for CountedNode {
    type Key = u32;

    fn key(&self) -> &Self::Key {
        &self.key
    }
}

#[test]
fn every_node_is_released_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let mut tree: AvlTree<CountedNode> = AvlTree::new();

    for key in 0..64 {
        tree.insert(Box::new(CountedNode {
            links: Links::new(),
            key,
            drops: drops.clone(),
        }));
    }

    for (i, key) in (0..64).step_by(3).enumerate() {
        let removed = tree.remove(&key).expect("item not found");
        assert_eq!(removed.key, key);
        // Only the nodes already handed back and dropped have been released.
        assert_eq!(drops.get(), i);
        drop(removed);
    }

    tree.assert_balanced();
    assert_eq!(drops.get(), 22);

    drop(tree);
    assert_eq!(drops.get(), 64);
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

fn height_bound(len: usize) -> f64 {
    1.4405 * ((len + 2) as f64).log2() - 1.0
}

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(Mode::Balanced, ops);
    }

    #[test]
    fn plain_btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(Mode::Plain, ops);
    }

    #[test]
    fn height_stays_logarithmic(keys in proptest::collection::vec(any::<u32>(), 0..2000)) {
        let mut tree: AvlTree<TestNode> = AvlTree::new();

        for (i, &key) in keys.iter().enumerate() {
            tree.insert(TestNode::new(key));

            let height = f64::from(tree.height(tree.root()));
            prop_assert!(height <= height_bound(i + 1), "height {} with {} keys", height, i + 1);
        }

        let in_order = keys_of(&tree);
        prop_assert!(in_order.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn removed_keys_are_gone(
        keys in proptest::collection::btree_set(0u32..5000, 0..300),
        remove_every in 1usize..5,
    ) {
        let keys: Vec<u32> = keys.into_iter().collect();
        let mut tree: AvlTree<TestNode> = AvlTree::new();

        for &key in &keys {
            tree.insert(TestNode::new(key));
        }

        let mut kept = BTreeSet::new();
        for (i, key) in keys.iter().enumerate() {
            if i % remove_every == 0 {
                prop_assert!(tree.remove(key).is_some());
                tree.assert_balanced();
                prop_assert!(tree.search(key).is_none());
            } else {
                kept.insert(*key);
            }
        }

        for key in &keys {
            prop_assert_eq!(tree.contains_key(key), kept.contains(key));
        }
    }

    #[test]
    fn plain_insert_remove_round_trip(
        keys in proptest::collection::btree_set(0u32..1000, 0..100),
        extra in 1000u32..2000,
    ) {
        let mut tree: AvlTree<TestNode> = AvlTree::new();
        for key in keys {
            tree.insert_unbalanced(TestNode::new(key));
        }

        let before = pre_order(&tree);
        tree.insert_unbalanced(TestNode::new(extra));
        prop_assert!(tree.remove_unbalanced(&extra).is_some());

        tree.assert_invariants();
        prop_assert_eq!(pre_order(&tree), before);
    }
}

fn keys_of(tree: &AvlTree<TestNode>) -> Vec<u32> {
    tree.iter().map(|node| node.key).collect()
}
