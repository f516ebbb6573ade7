extern crate alloc;

use alloc::boxed::Box;
use core::{borrow::Borrow, fmt, marker::PhantomPinned, ptr::NonNull};

use cordyceps::Linked;

use crate::{AvlTree, InvariantError, Links, NodeRef, Order, TreeNode};

/// An ordered set of keys based on an [AVL tree].
///
/// Duplicate keys are kept: inserting a key that is already present adds another node to its
/// right.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
pub struct AvlSet<K: Ord + fmt::Debug> {
    tree: AvlTree<SetNode<K>>,
}

/// A node of an [`AvlSet`], holding a single key.
pub struct SetNode<K> {
    links: Links<SetNode<K>>,
    key: K,
    _unpin: PhantomPinned,
}

impl<K> SetNode<K> {
    fn new(key: K) -> Box<Self> {
        Box::new(SetNode {
            links: Links::new(),
            key,
            _unpin: PhantomPinned,
        })
    }
}

unsafe impl<K> Linked<Links<SetNode<K>>> for SetNode<K> {
    type Handle = Box<Self>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        Box::leak(r).into()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<SetNode<K>>> {
        let ptr = ptr.as_ptr();
        unsafe { NonNull::new_unchecked(core::ptr::addr_of_mut!((*ptr).links)) }
    }
}

impl<K: Ord + fmt::Debug> TreeNode<Links<SetNode<K>>> for SetNode<K> {
    type Key = K;

    fn key(&self) -> &Self::Key {
        &self.key
    }
}

impl<K: Ord + fmt::Debug> AvlSet<K> {
    /// Creates a new, empty `AvlSet`.
    pub const fn new() -> Self {
        Self {
            tree: AvlTree::new(),
        }
    }

    /// Returns `true` if the set contains no keys.
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of keys in the set, counting duplicates.
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns the underlying tree.
    pub fn tree(&self) -> &AvlTree<SetNode<K>> {
        &self.tree
    }

    /// Returns the root node.
    pub fn root(&self) -> Option<NodeRef<'_, SetNode<K>>> {
        self.tree.root()
    }

    /// Returns the height of the subtree rooted at `node`: -1 for `None`, 0 for a leaf.
    pub fn height(&self, node: Option<NodeRef<'_, SetNode<K>>>) -> i32 {
        self.tree.height(node)
    }

    /// Returns `true` if the set contains `key`.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains_key(key)
    }

    /// Returns the node holding `key`.
    #[inline]
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, SetNode<K>>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.search(key)
    }

    /// Returns the minimum key in the set.
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|node| &node.key)
    }

    /// Returns the maximum key in the set.
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|node| &node.key)
    }

    /// Inserts `key`, rebalancing the tree.
    #[inline]
    pub fn insert(&mut self, key: K) {
        self.tree.insert(SetNode::new(key));
    }

    /// Inserts `key` as a plain binary search tree would, without rebalancing.
    #[inline]
    pub fn insert_unbalanced(&mut self, key: K) {
        self.tree.insert_unbalanced(SetNode::new(key));
    }

    /// Removes one occurrence of `key`, rebalancing the tree.
    ///
    /// Returns `false`, leaving the set untouched, if `key` was not present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(key).is_some()
    }

    /// Removes one occurrence of `key` as a plain binary search tree would, without rebalancing.
    #[inline]
    pub fn remove_unbalanced<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove_unbalanced(key).is_some()
    }

    /// Returns the keys in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &K> + Clone + ExactSizeIterator + '_ {
        self.traverse(Order::In)
    }

    /// Returns the keys in the given traversal order.
    #[inline]
    pub fn traverse(
        &self,
        order: Order,
    ) -> impl Iterator<Item = &K> + Clone + ExactSizeIterator + '_ {
        self.tree.traverse(order).map(|node| &node.key)
    }

    /// Clears the set, removing all keys.
    #[inline]
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// See [`AvlTree::check_balanced`].
    pub fn check_balanced(&self) -> Result<(), InvariantError> {
        self.tree.check_balanced()
    }

    /// See [`AvlTree::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.tree.check_invariants()
    }
}

impl<K: Ord + fmt::Debug> Default for AvlSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for AvlSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + fmt::Debug> Extend<K> for AvlSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord + fmt::Debug> FromIterator<K> for AvlSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}
