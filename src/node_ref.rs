use core::{fmt, marker::PhantomData, ops::Deref, ptr::NonNull};

use crate::{height_of, AvlTree, Links, TreeNode, Violation};

/// A shared handle to a node of an [`AvlTree`], used to inspect the tree's shape.
///
/// Two handles compare equal when they refer to the same node.
pub struct NodeRef<'tree, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    ptr: NonNull<T>,
    phantom: PhantomData<&'tree AvlTree<T>>,
}

impl<'tree, T> NodeRef<'tree, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    // # Safety
    //
    // `ptr` must be linked into a tree that stays borrowed for `'tree`.
    pub(crate) unsafe fn new(ptr: NonNull<T>) -> Self {
        NodeRef {
            ptr,
            phantom: PhantomData,
        }
    }

    #[inline]
    fn links(&self) -> &'tree Links<T> {
        unsafe { T::links(self.ptr).as_ref() }
    }

    #[inline]
    fn wrap(link: Option<NonNull<T>>) -> Option<NodeRef<'tree, T>> {
        link.map(|ptr| unsafe { NodeRef::new(ptr) })
    }

    /// Returns the referenced node.
    pub fn get(&self) -> &'tree T {
        unsafe { self.ptr.as_ref() }
    }

    /// Returns the node's key.
    pub fn key(&self) -> &'tree T::Key {
        self.get().key()
    }

    /// Returns the node's left child.
    pub fn left(&self) -> Option<NodeRef<'tree, T>> {
        Self::wrap(self.links().left())
    }

    /// Returns the node's right child.
    pub fn right(&self) -> Option<NodeRef<'tree, T>> {
        Self::wrap(self.links().right())
    }

    /// Returns the node's parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'tree, T>> {
        Self::wrap(self.links().parent())
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.links().is_leaf()
    }

    /// Returns the height of the subtree rooted at this node. A leaf has height 0.
    pub fn height(&self) -> i32 {
        self.links().height()
    }

    /// Returns `h(left) - h(right)`.
    pub fn balance_factor(&self) -> i32 {
        height_of(self.links().left()) - height_of(self.links().right())
    }

    /// Classifies the AVL violation at this node, if any.
    pub fn violation(&self) -> Violation {
        unsafe { Violation::classify(self.ptr) }
    }

    /// Returns the raw pointer to the node, e.g. for [`AvlTree::remove_at`].
    pub fn as_ptr(&self) -> NonNull<T> {
        self.ptr
    }
}

impl<T> Clone for NodeRef<'_, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> where T: TreeNode<Links<T>> + ?Sized {}

impl<T> PartialEq for NodeRef<'_, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn eq(&self, other: &Self) -> bool {
        core::ptr::addr_eq(self.ptr.as_ptr(), other.ptr.as_ptr())
    }
}

impl<T> Eq for NodeRef<'_, T> where T: TreeNode<Links<T>> + ?Sized {}

impl<'tree, T> Deref for NodeRef<'tree, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> fmt::Debug for NodeRef<'_, T>
where
    T: TreeNode<Links<T>> + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("height", &self.height())
            .finish()
    }
}
