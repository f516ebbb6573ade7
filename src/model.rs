//! Model-based checking of [`AvlTree`] against [`BTreeMap`], shared by the property tests and the
//! fuzz targets.

extern crate std;

use std::{collections::BTreeMap, prelude::v1::*, ptr::NonNull};

use arbitrary::Arbitrary;
use cordyceps::Linked;
use proptest::strategy::{Just, Strategy};

use crate::{AvlTree, Links, TreeNode};

#[derive(Debug)]
#[repr(C)]
pub struct TestNode {
    pub links: Links<TestNode>,
    pub key: u32,
}

impl TestNode {
    pub fn new(key: u32) -> Box<TestNode> {
        Box::new(TestNode {
            links: Links::new(),
            key,
        })
    }
}

unsafe impl Linked<Links<TestNode>> for TestNode {
    type Handle = Box<TestNode>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        NonNull::new(Box::into_raw(r)).unwrap()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<TestNode>> {
        // SAFETY: Self is #[repr(C)] and `links` is first field
        ptr.cast()
    }
}

impl TreeNode<Links<TestNode>> for TestNode {
    type Key = u32;

    fn key(&self) -> &Self::Key {
        &self.key
    }
}

/// Which pair of mutators the model run drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Arbitrary)]
pub enum Mode {
    /// `insert` and `remove`; the tree must stay balanced after every step.
    Balanced,
    /// `insert_unbalanced` and `remove_unbalanced`.
    Plain,
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Get(ItemValue),
    Remove(ItemValue),
    First,
    Last,
}

impl Op {
    fn finalize(self, present: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(present, item)),
            Op::Get(item) => FinalOp::Get(get_value(present, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(present, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Get(u32),
    Remove(u32),
    First,
    Last,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Get),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::Last),
    ]
}

/// Runs `ops` against both an [`AvlTree`] and a `BTreeMap` multiset, asserting that they agree
/// and that the tree's invariants hold after every step.
pub fn run_btree_equivalence(mode: Mode, ops: Vec<Op>) {
    // Key -> number of copies.
    let mut btree: BTreeMap<u32, usize> = BTreeMap::new();
    let mut avl: AvlTree<TestNode> = AvlTree::new();

    #[inline]
    #[allow(clippy::boxed_local)]
    fn node_key(node: Box<TestNode>) -> u32 {
        node.key
    }

    #[inline]
    fn ref_key(node: &TestNode) -> u32 {
        node.key
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let present: Vec<u32> = btree.keys().copied().collect();
        let final_op = op.finalize(&present);

        match final_op {
            FinalOp::Insert(value) => {
                *btree.entry(value).or_default() += 1;

                match mode {
                    Mode::Balanced => avl.insert(TestNode::new(value)),
                    Mode::Plain => avl.insert_unbalanced(TestNode::new(value)),
                }
            }

            FinalOp::Get(value) => {
                let from_btree = btree.contains_key(&value).then_some(value);
                let from_avl = avl.get(&value).map(ref_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Remove(value) => {
                let from_btree = match btree.get_mut(&value) {
                    Some(count) => {
                        *count -= 1;
                        if *count == 0 {
                            btree.remove(&value);
                        }
                        Some(value)
                    }
                    None => None,
                };

                let from_avl = match mode {
                    Mode::Balanced => avl.remove(&value),
                    Mode::Plain => avl.remove_unbalanced(&value),
                }
                .map(node_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
                assert!(!btree.contains_key(&value) || avl.contains_key(&value));
            }

            FinalOp::First => {
                let from_btree = btree.keys().next().copied();
                let from_avl = avl.first().map(ref_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.keys().next_back().copied();
                let from_avl = avl.last().map(ref_key);

                assert_eq!(from_btree, from_avl, "FinalOp #{op_id}: {final_op:?}");
            }
        }

        match mode {
            Mode::Balanced => avl.assert_balanced(),
            Mode::Plain => avl.assert_invariants(),
        }

        let expected = btree
            .iter()
            .flat_map(|(&key, &count)| std::iter::repeat(key).take(count));
        assert!(expected.eq(avl.iter().map(ref_key)), "FinalOp #{op_id}: {final_op:?}");
        assert_eq!(btree.values().sum::<usize>(), avl.len());
    }
}

#[derive(Clone, Debug)]
pub struct BtreeEquivalenceInput {
    pub mode: Mode,
    pub ops: Vec<Op>,
}

impl<'a> arbitrary::Arbitrary<'a> for BtreeEquivalenceInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        fn op(u: &mut arbitrary::Unstructured<'_>) -> Op {
            Op::arbitrary(u).unwrap_or(Op::First)
        }

        let mode = Mode::arbitrary(u)?;
        let num_ops = u16::arbitrary(u)? % 1000;

        let ops = core::iter::repeat_with(|| op(u))
            .take(num_ops.into())
            .collect();

        Ok(BtreeEquivalenceInput { mode, ops })
    }
}
