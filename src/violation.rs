use core::ptr::NonNull;

use crate::{height_of, Links, TreeNode};

/// The shape of an AVL violation at a node, naming the rotations that resolve it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    /// The node's balance factor is -1, 0 or 1.
    None,
    /// The left subtree is too tall and leans left. Resolved by one clockwise rotation.
    LeftLeft,
    /// The right subtree is too tall and leans right. Resolved by one counter-clockwise rotation.
    RightRight,
    /// The left subtree is too tall and leans right. Resolved by a counter-clockwise rotation of
    /// the left child followed by a clockwise rotation of the node.
    LeftRight,
    /// The right subtree is too tall and leans left. Resolved by a clockwise rotation of the right
    /// child followed by a counter-clockwise rotation of the node.
    RightLeft,
}

impl Violation {
    /// Classifies `node` from the cached heights of its children and grandchildren.
    ///
    /// When the taller child's subtrees have equal heights, the outer case (`LeftLeft` or
    /// `RightRight`) is chosen so that a single rotation fires.
    ///
    /// # Safety
    ///
    /// `node` must be linked into a live tree whose cached heights are current below `node`.
    pub(crate) unsafe fn classify<T>(node: NonNull<T>) -> Violation
    where
        T: TreeNode<Links<T>> + ?Sized,
    {
        unsafe {
            let links = T::links(node).as_ref();
            let (left, right) = (links.left(), links.right());
            let left_height = height_of(left);
            let right_height = height_of(right);

            if (left_height - right_height).abs() <= 1 {
                return Violation::None;
            }

            if left_height > right_height {
                let left = T::links(left.expect("taller subtree must be present")).as_ref();

                if height_of(left.left()) >= height_of(left.right()) {
                    Violation::LeftLeft
                } else {
                    Violation::LeftRight
                }
            } else {
                let right = T::links(right.expect("taller subtree must be present")).as_ref();

                if height_of(right.right()) >= height_of(right.left()) {
                    Violation::RightRight
                } else {
                    Violation::RightLeft
                }
            }
        }
    }

    /// Returns `true` unless this is [`Violation::None`].
    pub fn is_violation(self) -> bool {
        self != Violation::None
    }
}
