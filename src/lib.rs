//! An intrusive AVL tree.
//!
//! The tree can also be driven as a plain binary search tree through [`AvlTree::insert_unbalanced`]
//! and [`AvlTree::remove_unbalanced`], which mutate the structure without rotating.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`. A missing subtree has height -1 and a leaf has
//   height 0.
// - The parent of a node `x` is denoted `p(x)`.
// - The balance factor of `x` is `h(left(x)) - h(right(x))`.
//
// The invariants of an AVL tree are:
// 1. In-order traversal yields keys in non-decreasing order. Equal keys descend to the right on
//    insertion.
// 2. Every balance factor is -1, 0 or 1.
// 3. `p(x)` links back to `x` through one of its child slots; the root has no parent.
//
// Heights are cached in each node's links and refreshed bottom-up after every structural change,
// including the unbalanced mutators, so that (1) and (3) hold in either mode and reading a height
// is O(1).

use core::{
    borrow::Borrow, cell::UnsafeCell, cmp::Ordering, fmt, marker::PhantomPinned, mem, ops::Not,
    ptr::NonNull,
};

use cordyceps::Linked;
use log::{debug, trace};

mod debug;
mod error;
mod node_ref;
mod set;
mod traverse;
mod violation;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use error::InvariantError;
pub use node_ref::NodeRef;
pub use set::{AvlSet, SetNode};
pub use traverse::{Order, Traverse};
pub use violation::Violation;

pub trait TreeNode<L>: Linked<L> {
    type Key: Ord + fmt::Debug;

    fn key(&self) -> &Self::Key;
}

/// An intrusive AVL tree.
///
/// The tree owns every node linked into it: nodes enter through [`Linked::into_ptr`] and leave
/// through [`Linked::from_ptr`], either when removed or when the tree is cleared or dropped.
///
/// The tree is not synchronized. Rotations and splices update several links in sequence, so
/// concurrent callers must serialize access externally.
pub struct AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    root: Link<T>,
    len: usize,
}

pub struct Links<T: ?Sized> {
    inner: UnsafeCell<LinksInner<T>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

// What the bottom-up walk does at each ancestor of a structural change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Fixup {
    // Refresh heights and rotate away any AVL violation.
    Rebalance,
    // Refresh heights only.
    HeightsOnly,
}

#[repr(C)]
struct LinksInner<T: ?Sized> {
    parent: Link<T>,
    children: [Link<T>; 2],
    height: i32,
    _unpin: PhantomPinned,
}

pub(crate) type Link<T> = Option<NonNull<T>>;

impl<T> AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    /// Returns a new empty tree.
    pub const fn new() -> AvlTree<T> {
        AvlTree { root: None, len: 0 }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|root| unsafe { NodeRef::new(root) })
    }

    /// Returns the height of the subtree rooted at `node`.
    ///
    /// A missing subtree has height -1 and a leaf has height 0, so `tree.height(tree.root())` is
    /// the height of the whole tree.
    pub fn height(&self, node: Option<NodeRef<'_, T>>) -> i32 {
        node.map(|node| node.height()).unwrap_or(-1)
    }

    /// Returns a reference to a node whose key equals `key`.
    ///
    /// If the tree holds duplicates of `key`, the one nearest the root is returned.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ptr = self.get_raw(key)?;
        unsafe { Some(ptr.as_ref()) }
    }

    /// Returns a handle to a node whose key equals `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, T>>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ptr = self.get_raw(key)?;
        unsafe { Some(NodeRef::new(ptr)) }
    }

    /// Returns `true` if the tree contains a node whose key equals `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_raw(key).is_some()
    }

    pub(crate) fn get_raw<Q>(&self, key: &Q) -> Link<T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            unsafe {
                match key.cmp(cur.as_ref().key().borrow()) {
                    Ordering::Less => opt_cur = T::links(cur).as_ref().left(),
                    Ordering::Equal => return Some(cur),
                    Ordering::Greater => opt_cur = T::links(cur).as_ref().right(),
                }
            }
        }
    }

    /// Returns the minimum element of the tree.
    pub fn first(&self) -> Option<&T> {
        let root = self.root?;

        unsafe {
            let (first, _) = self.extremum_in_subtree(root, Dir::Left);
            Some(first.as_ref())
        }
    }

    /// Returns the maximum element of the tree.
    pub fn last(&self) -> Option<&T> {
        let root = self.root?;

        unsafe {
            let (last, _) = self.extremum_in_subtree(root, Dir::Right);
            Some(last.as_ref())
        }
    }

    /// Returns an iterator over the elements of the tree in ascending key order.
    pub fn iter(&self) -> Traverse<'_, T> {
        Traverse::new(self, Order::In)
    }

    /// Returns an iterator visiting the elements of the tree in the given order.
    ///
    /// The iterator borrows the tree, so the traversal can be restarted by calling this again or
    /// by cloning the iterator before advancing it.
    pub fn traverse(&self, order: Order) -> Traverse<'_, T> {
        Traverse::new(self, order)
    }

    /// Inserts an item into the tree, rebalancing afterwards.
    ///
    /// Items with a key equal to one already present are placed to its right.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn insert(&mut self, item: T::Handle) {
        let ptr = T::into_ptr(item);
        let attached_to = self.link_leaf(ptr);
        self.retrace(attached_to, Fixup::Rebalance);
    }

    /// Inserts an item as a new leaf without rebalancing, as a plain binary search tree would.
    ///
    /// This operation completes in _O(h)_ time, where `h` is the height of the tree.
    pub fn insert_unbalanced(&mut self, item: T::Handle) {
        let ptr = T::into_ptr(item);
        let attached_to = self.link_leaf(ptr);
        self.retrace(attached_to, Fixup::HeightsOnly);
    }

    // Links `ptr` into the tree as a leaf, descending from the root and routing equal keys to the
    // right.
    //
    // Returns the node `ptr` was attached to, or `None` if it became the root.
    fn link_leaf(&mut self, ptr: NonNull<T>) -> Link<T> {
        unsafe {
            let links = T::links(ptr).as_mut();
            links.set_parent(None);
            links.set_left(None);
            links.set_right(None);
            links.set_height(0);
        }

        self.len += 1;

        let Some(mut parent) = self.root else {
            // Tree is empty. Set `ptr` as the root and return.
            self.root = Some(ptr);
            return None;
        };

        // Descend the tree, looking for a free slot on the correct side.
        loop {
            let ordering = unsafe { ptr.as_ref().key().cmp(parent.as_ref().key()) };

            let dir = match ordering {
                Ordering::Less => Dir::Left,
                Ordering::Equal | Ordering::Greater => Dir::Right,
            };

            unsafe {
                let parent_links = T::links(parent).as_mut();
                match parent_links.child(dir) {
                    // Descend.
                    Some(child) => parent = child,

                    // Set `ptr` as child.
                    None => {
                        parent_links.set_child(dir, Some(ptr));
                        T::links(ptr).as_mut().set_parent(Some(parent));
                        return Some(parent);
                    }
                }
            }
        }
    }

    /// Removes a node whose key equals `key`, rebalancing afterwards.
    ///
    /// Returns `None`, leaving the tree untouched, if no such node exists.
    ///
    /// This operation completes in _O(log(n))_ time.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T::Handle>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.get_raw(key) else {
            debug!("remove: key not present, tree unchanged");
            return None;
        };

        unsafe { Some(self.unlink(node, Fixup::Rebalance)) }
    }

    /// Removes a node whose key equals `key` without rebalancing, as a plain binary search tree
    /// would.
    pub fn remove_unbalanced<Q>(&mut self, key: &Q) -> Option<T::Handle>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.get_raw(key) else {
            debug!("remove_unbalanced: key not present, tree unchanged");
            return None;
        };

        unsafe { Some(self.unlink(node, Fixup::HeightsOnly)) }
    }

    /// Removes an arbitrary node from the tree, rebalancing afterwards.
    ///
    /// # Safety
    ///
    /// It is the caller's responsibility to ensure that `node` is an element of `self`, and not any
    /// other tree.
    pub unsafe fn remove_at(&mut self, node: NonNull<T>) -> T::Handle {
        unsafe { self.unlink(node, Fixup::Rebalance) }
    }

    // Unlinks `node` from the tree, walks back up from the point of disturbance and returns
    // ownership of `node`.
    //
    // There are four possible cases:
    //
    // 1. `node` is a leaf. Its parent's slot is cleared and the walk starts at the parent.
    //
    // 2. and 3. `node` has only a left or only a right child. The child is elevated into `node`'s
    //    slot and the walk starts at the child.
    //
    // 4. `node` has two children. The replacement is taken from the taller side (the left side on
    //    a tie): the maximum of the left subtree, or the minimum of the right subtree. The
    //    replacement has no child on the side it was searched towards, so it is first removed from
    //    its own slot as in cases 1-3, then relinked into `node`'s slot, adopting `node`'s
    //    children and parent. The walk starts where the replacement was removed from.
    //
    // # Safety
    //
    // `node` must be an element of `self`.
    unsafe fn unlink(&mut self, node: NonNull<T>, fixup: Fixup) -> T::Handle {
        unsafe {
            let parent = T::links(node).as_ref().parent();
            let left = T::links(node).as_ref().left();
            let right = T::links(node).as_ref().right();

            let disturbed = match (left, right) {
                (None, None) => {
                    self.replace_child_or_set_root(parent, node, None);
                    parent
                }

                (Some(child), None) | (None, Some(child)) => {
                    self.replace_child_or_set_root(parent, node, Some(child));
                    T::links(child).as_mut().set_parent(parent);
                    Some(child)
                }

                (Some(left), Some(right)) => {
                    let dir = if height_of(Some(left)) >= height_of(Some(right)) {
                        Dir::Left
                    } else {
                        Dir::Right
                    };

                    let (subtree, other) = match dir {
                        Dir::Left => (left, right),
                        Dir::Right => (right, left),
                    };

                    let (replacement, replacement_parent) =
                        self.extremum_in_subtree(subtree, !dir);

                    trace!(
                        "replacing {:?} with {:?}",
                        node.as_ref().key(),
                        replacement.as_ref().key()
                    );

                    let disturbed = match replacement_parent {
                        Some(replacement_parent) => {
                            // Elevate the replacement's only possible child into its slot.
                            let orphan = T::links(replacement).as_ref().child(dir);
                            self.replace_child(replacement_parent, replacement, orphan);
                            self.maybe_set_parent(orphan, Some(replacement_parent));

                            T::links(replacement).as_mut().set_child(dir, Some(subtree));
                            T::links(subtree).as_mut().set_parent(Some(replacement));

                            orphan.or(Some(replacement_parent))
                        }

                        // The replacement is `node`'s child and keeps its own `dir` subtree.
                        None => Some(replacement),
                    };

                    T::links(replacement).as_mut().set_child(!dir, Some(other));
                    T::links(other).as_mut().set_parent(Some(replacement));

                    T::links(replacement).as_mut().set_parent(parent);
                    self.replace_child_or_set_root(parent, node, Some(replacement));

                    disturbed
                }
            };

            let links = T::links(node).as_mut();
            links.set_parent(None);
            links.set_left(None);
            links.set_right(None);
            links.set_height(0);

            self.len -= 1;
            self.retrace(disturbed, fixup);

            T::from_ptr(node)
        }
    }

    // Walks from `from` up to the root, refreshing cached heights and, when rebalancing, rotating
    // away the violation found at each ancestor.
    //
    // The walk always runs to the root: heights above a rotation may still have changed.
    fn retrace(&mut self, from: Link<T>, fixup: Fixup) {
        let mut opt_cur = from;

        while let Some(cur) = opt_cur {
            unsafe {
                self.update_height(cur);

                let top = match fixup {
                    Fixup::Rebalance => self.rotate_for(Violation::classify(cur), cur),
                    Fixup::HeightsOnly => cur,
                };

                opt_cur = T::links(top).as_ref().parent();
                if opt_cur.is_none() {
                    self.root = Some(top);
                }
            }
        }
    }

    // Applies the rotations that resolve `violation` at `node`.
    //
    // Returns the node now occupying `node`'s former slot.
    unsafe fn rotate_for(&mut self, violation: Violation, node: NonNull<T>) -> NonNull<T> {
        unsafe {
            if violation != Violation::None {
                trace!("{violation:?} violation at {:?}", node.as_ref().key());
            }

            match violation {
                Violation::None => node,
                Violation::LeftLeft => self.rotate_clockwise(node),
                Violation::RightRight => self.rotate_counter_clockwise(node),
                Violation::LeftRight => {
                    let left = T::links(node)
                        .as_ref()
                        .left()
                        .expect("left-right violation requires a left child");
                    self.rotate_counter_clockwise(left);
                    self.rotate_clockwise(node)
                }
                Violation::RightLeft => {
                    let right = T::links(node)
                        .as_ref()
                        .right()
                        .expect("right-left violation requires a right child");
                    self.rotate_clockwise(right);
                    self.rotate_counter_clockwise(node)
                }
            }
        }
    }

    // Rotates `node` down to the right, promoting its left child. Returns the promoted node.
    pub(crate) unsafe fn rotate_clockwise(&mut self, node: NonNull<T>) -> NonNull<T> {
        unsafe { self.rotate_at(node, Dir::Right) }
    }

    // Rotates `node` down to the left, promoting its right child. Returns the promoted node.
    pub(crate) unsafe fn rotate_counter_clockwise(&mut self, node: NonNull<T>) -> NonNull<T> {
        unsafe { self.rotate_at(node, Dir::Left) }
    }

    // Performs a rotation, moving `down` towards `dir` and its `!dir` child `up` into its place.
    //
    // The heights of `down` and `up` are refreshed; `up`'s ancestors are left to the caller.
    unsafe fn rotate_at(&mut self, down: NonNull<T>, dir: Dir) -> NonNull<T> {
        unsafe {
            let up = T::links(down)
                .as_ref()
                .child(!dir)
                .expect("rotation requires a child to promote");

            trace!(
                "rotating {:?} {}, promoting {:?}",
                down.as_ref().key(),
                match dir {
                    Dir::Right => "clockwise",
                    Dir::Left => "counter-clockwise",
                },
                up.as_ref().key()
            );

            // - `down` becomes the `dir` child of `up`.
            // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
            let across = T::links(up).as_ref().child(dir);
            T::links(down).as_mut().set_child(!dir, across);
            self.maybe_set_parent(across, Some(down));

            T::links(up).as_mut().set_child(dir, Some(down));
            let parent = T::links(down).as_mut().set_parent(Some(up));
            T::links(up).as_mut().set_parent(parent);

            self.replace_child_or_set_root(parent, down, Some(up));

            self.update_height(down);
            self.update_height(up);

            up
        }
    }

    #[inline]
    unsafe fn update_height(&mut self, node: NonNull<T>) {
        unsafe {
            let links = T::links(node).as_mut();
            let height = 1 + height_of(links.left()).max(height_of(links.right()));
            links.set_height(height);
        }
    }

    // Returns the extreme node in the `dir` direction of the subtree rooted at `root`, i.e. the
    // minimum for `Dir::Left` and the maximum for `Dir::Right`.
    //
    // If the subtree root is not the extreme node, also returns the extreme node's parent.
    #[inline]
    unsafe fn extremum_in_subtree(
        &self,
        root: NonNull<T>,
        dir: Dir,
    ) -> (NonNull<T>, Option<NonNull<T>>) {
        let mut parent = None;
        let mut cur = root;

        while let Some(next) = unsafe { T::links(cur).as_ref().child(dir) } {
            parent = Some(cur);
            cur = next;
        }

        (cur, parent)
    }

    unsafe fn maybe_set_parent(&mut self, opt_node: Link<T>, parent: Link<T>) {
        let Some(node) = opt_node else {
            return;
        };

        unsafe { T::links(node).as_mut().set_parent(parent) };
    }

    #[inline]
    unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link<T>,
        old_child: NonNull<T>,
        new_child: Link<T>,
    ) {
        match parent {
            Some(parent) => unsafe { self.replace_child(parent, old_child, new_child) },
            None => self.root = new_child,
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`.
    //
    // `new_child`'s parent pointer is not updated.
    //
    // # Safety
    //
    // The caller must ensure that `old_child` is a child node of `parent`.
    unsafe fn replace_child(
        &mut self,
        parent: NonNull<T>,
        old_child: NonNull<T>,
        new_child: Option<NonNull<T>>,
    ) {
        unsafe {
            let dir = self.which_child(parent, old_child);

            debug_assert_eq!(
                T::links(parent).as_ref().child(dir),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );

            T::links(parent).as_mut().set_child(dir, new_child);
        }
    }

    pub(crate) unsafe fn which_child(&self, parent: NonNull<T>, child: NonNull<T>) -> Dir {
        if unsafe { T::links(parent).as_ref().left() } == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }

    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                // Descend to the minimum node.
                let (cur, parent) = self.extremum_in_subtree(cur, Dir::Left);
                let parent = parent.or_else(|| T::links(cur).as_ref().parent());

                let right = T::links(cur).as_ref().right();

                // Elevate the node's right child (which may be None).
                self.replace_child_or_set_root(parent, cur, right);
                self.maybe_set_parent(right, parent);

                // Drop the node.
                drop(T::from_ptr(cur));
                self.len -= 1;

                // If the node had no right child, climb to the parent. If the node had no parent,
                // the tree is empty.
                opt_cur = right.or(parent);
            }
        }

        debug_assert!(self.root.is_none());
        debug_assert_eq!(self.len(), 0);
    }

    /// Checks the structural invariants that hold in both balanced and unbalanced use: parent
    /// links, key order, cached heights and the element count.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.check(false)
    }

    /// Checks [`check_invariants`](Self::check_invariants) and, additionally, that every node's
    /// balance factor is -1, 0 or 1.
    pub fn check_balanced(&self) -> Result<(), InvariantError> {
        self.check(true)
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if let Err(error) = self.check_invariants() {
            panic!("{error}");
        }
    }

    #[doc(hidden)]
    pub fn assert_balanced(&self) {
        if let Err(error) = self.check_balanced() {
            panic!("{error}");
        }
    }

    // In-order walk over child links only, so that a broken parent link is reported rather than
    // followed.
    fn check(&self, balanced: bool) -> Result<(), InvariantError> {
        if let Some(root) = self.root {
            if let Some(parent) = unsafe { T::links(root).as_ref().parent() } {
                return Err(InvariantError::RootHasParent {
                    root: format!("{:?}", unsafe { root.as_ref().key() }),
                    parent: format!("{:?}", unsafe { parent.as_ref().key() }),
                });
            }
        }

        let mut stack = Vec::new();
        let mut opt_cur = self.root;
        let mut prev: Option<&T::Key> = None;
        let mut count = 0;

        loop {
            while let Some(cur) = opt_cur {
                stack.push(cur);
                opt_cur = unsafe { T::links(cur).as_ref().left() };
            }

            let Some(node) = stack.pop() else {
                break;
            };

            let links = unsafe { T::links(node).as_ref() };
            let key = unsafe { node.as_ref().key() };

            if let Some(prev) = prev {
                if prev > key {
                    return Err(InvariantError::OutOfOrder {
                        before: format!("{prev:?}"),
                        after: format!("{key:?}"),
                    });
                }
            }

            for child in [links.left(), links.right()].into_iter().flatten() {
                let child_parent = unsafe { T::links(child).as_ref().parent() };
                if child_parent != Some(node) {
                    return Err(InvariantError::ParentMismatch {
                        node: format!("{:?}", unsafe { child.as_ref().key() }),
                        expected: format!("{key:?}"),
                    });
                }
            }

            let left_height = height_of(links.left());
            let right_height = height_of(links.right());

            let expected = 1 + left_height.max(right_height);
            if links.height() != expected {
                return Err(InvariantError::StaleHeight {
                    node: format!("{key:?}"),
                    cached: links.height(),
                    actual: expected,
                });
            }

            let balance_factor = left_height - right_height;
            if balanced && balance_factor.abs() > 1 {
                return Err(InvariantError::Unbalanced {
                    node: format!("{key:?}"),
                    balance_factor,
                });
            }

            prev = Some(key);
            count += 1;
            opt_cur = links.right();
        }

        if count != self.len {
            return Err(InvariantError::LenMismatch {
                len: self.len,
                linked: count,
            });
        }

        Ok(())
    }
}

impl<T> Default for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> fmt::Debug for AvlTree<T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|node| node.key())).finish()
    }
}

/// Returns the cached height of the pointed-to node, or -1 for a missing node.
#[inline]
pub(crate) fn height_of<T>(link: Link<T>) -> i32
where
    T: TreeNode<Links<T>> + ?Sized,
{
    match link {
        Some(node) => unsafe { T::links(node).as_ref().height() },
        None => -1,
    }
}

impl<T: ?Sized> Links<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                height: 0,
                _unpin: PhantomPinned,
            }),
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    #[inline]
    fn height(&self) -> i32 {
        unsafe { (*self.inner.get()).height }
    }

    #[inline]
    fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    fn child(&self, dir: Dir) -> Link<T> {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    fn left(&self) -> Link<T> {
        self.child(Dir::Left)
    }

    #[inline]
    fn right(&self) -> Link<T> {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link<T>) -> Link<T> {
        mem::replace(&mut self.inner.get_mut().children[dir as usize], child)
    }

    #[inline]
    fn set_left(&mut self, left: Link<T>) -> Link<T> {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    fn set_right(&mut self, right: Link<T>) -> Link<T> {
        self.set_child(Dir::Right, right)
    }

    #[inline]
    fn set_height(&mut self, height: i32) {
        self.inner.get_mut().height = height;
    }
}

impl<T: ?Sized> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("parent", &self.parent())
            .field("left", &self.left())
            .field("right", &self.right())
            .field("height", &self.height())
            .finish()
    }
}
