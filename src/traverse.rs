use core::{iter::FusedIterator, marker::PhantomData, ptr::NonNull};
use std::collections::VecDeque;

use crate::{AvlTree, Link, Links, TreeNode};

/// The order in which [`Traverse`] visits the nodes of a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    Pre,
    /// Left subtree, then node, then right subtree. Keys come out in ascending order.
    In,
    /// Left subtree, then right subtree, then node.
    Post,
    /// Level by level from the root, left to right within a level.
    BreadthFirst,
}

#[derive(Copy, Clone)]
enum CameFrom {
    Parent,
    LeftChild,
    RightChild,
}

enum Walk<T: ?Sized> {
    // The depth-first orders follow parent links and need no stack, so a degenerate unbalanced
    // tree is walked in constant space.
    Depth {
        order: Order,
        cur: Link<T>,
        from: CameFrom,
    },
    Breadth {
        queue: VecDeque<NonNull<T>>,
    },
}

impl<T: ?Sized> Clone for Walk<T> {
    fn clone(&self) -> Self {
        match self {
            Walk::Depth { order, cur, from } => Walk::Depth {
                order: *order,
                cur: *cur,
                from: *from,
            },
            Walk::Breadth { queue } => Walk::Breadth {
                queue: queue.clone(),
            },
        }
    }
}

/// An iterator over the nodes of an [`AvlTree`] in a chosen [`Order`].
///
/// Created by [`AvlTree::traverse`] and [`AvlTree::iter`].
pub struct Traverse<'tree, T: TreeNode<Links<T>> + ?Sized> {
    walk: Walk<T>,
    len: usize,
    phantom: PhantomData<&'tree AvlTree<T>>,
}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> Traverse<'tree, T> {
    pub(crate) fn new(tree: &'tree AvlTree<T>, order: Order) -> Self {
        let walk = match order {
            Order::BreadthFirst => Walk::Breadth {
                queue: tree.root.into_iter().collect(),
            },
            order => Walk::Depth {
                order,
                cur: tree.root,
                from: CameFrom::Parent,
            },
        };

        Traverse {
            walk,
            len: tree.len(),
            phantom: PhantomData,
        }
    }
}

impl<T: TreeNode<Links<T>> + ?Sized> Clone for Traverse<'_, T> {
    fn clone(&self) -> Self {
        Traverse {
            walk: self.walk.clone(),
            len: self.len,
            phantom: PhantomData,
        }
    }
}

fn next_depth_first<T: TreeNode<Links<T>> + ?Sized>(
    order: Order,
    cur: &mut Link<T>,
    from: &mut CameFrom,
) -> Link<T> {
    loop {
        let node = (*cur)?;
        let links = unsafe { T::links(node).as_ref() };

        let visit = match *from {
            CameFrom::Parent => {
                // Upon entering a subtree, descend into its left subtree first.
                match links.left() {
                    Some(left) => *cur = Some(left),
                    None => *from = CameFrom::LeftChild,
                }

                order == Order::Pre
            }

            CameFrom::LeftChild => {
                // The left subtree has been exhausted.
                match links.right() {
                    Some(right) => {
                        *cur = Some(right);
                        *from = CameFrom::Parent;
                    }
                    None => *from = CameFrom::RightChild,
                }

                order == Order::In
            }

            CameFrom::RightChild => {
                // Both subtrees have been exhausted, so ascend one level.
                *cur = links.parent();

                if let Some(parent) = *cur {
                    *from = if unsafe { T::links(parent).as_ref().left() } == Some(node) {
                        CameFrom::LeftChild
                    } else {
                        CameFrom::RightChild
                    };
                }

                order == Order::Post
            }
        };

        if visit {
            return Some(node);
        }
    }
}

impl<'tree, T: TreeNode<Links<T>> + ?Sized> Iterator for Traverse<'tree, T> {
    type Item = &'tree T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let node = match &mut self.walk {
            Walk::Depth { order, cur, from } => next_depth_first(*order, cur, from)?,

            Walk::Breadth { queue } => {
                let node = queue.pop_front()?;
                let links = unsafe { T::links(node).as_ref() };
                queue.extend(links.left());
                queue.extend(links.right());
                node
            }
        };

        self.len -= 1;

        Some(unsafe { node.as_ref() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<T: TreeNode<Links<T>> + ?Sized> ExactSizeIterator for Traverse<'_, T> {}

impl<T: TreeNode<Links<T>> + ?Sized> FusedIterator for Traverse<'_, T> {}
