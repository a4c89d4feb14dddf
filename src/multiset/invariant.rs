//! Whole-tree consistency checking.
//!
//! The checker is a debugging aid: it walks every node and reports the first
//! broken invariant. A correct sequence of insertions and removals never
//! produces a violation, so finding one points at a defect in the
//! rebalancing code or at a comparator that is not a total order.

use std::cmp::Ordering;
use std::fmt;

use super::{Node, NodeId, RedBlackTree};

/// A broken structural invariant found by
/// [`RedBlackTree::check_invariants`] or
/// [`OrderedMultiset::check_invariants`](super::OrderedMultiset::check_invariants).
///
/// # Examples
///
/// ```rust
/// use redblack_multiset::multiset::InvariantViolation;
///
/// let violation = InvariantViolation::SizeMismatch { expected: 3, actual: 2 };
/// assert_eq!(
///     format!("{violation}"),
///     "multiset size is 2 but the nodes hold 3 copies"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// The root node has a parent handle.
    RootHasParent,
    /// A red node has a red parent.
    RedViolation {
        /// The red child of a red node.
        node: NodeId,
    },
    /// The two subtrees of a node have different black-heights.
    BlackHeightMismatch {
        /// The node whose subtrees disagree.
        node: NodeId,
        /// Black-height of the left subtree.
        left: usize,
        /// Black-height of the right subtree.
        right: usize,
    },
    /// A value is on the wrong side of one of its ancestors.
    OrderViolation {
        /// The misplaced node.
        node: NodeId,
    },
    /// A value equals one of its ancestors instead of being folded into it.
    DuplicateValue {
        /// The node repeating an ancestor's value.
        node: NodeId,
    },
    /// A linked node holds no copies.
    ZeroMultiplicity {
        /// The empty node.
        node: NodeId,
    },
    /// A node's parent handle does not name the node linking it, or the node
    /// is linked more than once.
    BrokenParentLink {
        /// The inconsistent node.
        node: NodeId,
    },
    /// A link names a slot outside the node arena.
    DanglingHandle {
        /// The handle that resolves to nothing.
        node: NodeId,
    },
    /// Some nodes of the arena cannot be reached from the root.
    UnreachableNodes {
        /// Nodes reached from the root.
        reachable: usize,
        /// Nodes stored in the arena.
        stored: usize,
    },
    /// The multiset's cached size disagrees with the node counts.
    SizeMismatch {
        /// Sum of all node counts.
        expected: usize,
        /// Cached size.
        actual: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => write!(formatter, "root node is red"),
            Self::RootHasParent => write!(formatter, "root node has a parent"),
            Self::RedViolation { node } => {
                write!(formatter, "red node {node} has a red parent")
            }
            Self::BlackHeightMismatch { node, left, right } => write!(
                formatter,
                "node {node} has black-height {left} on the left but {right} on the right"
            ),
            Self::OrderViolation { node } => {
                write!(formatter, "node {node} is out of search-tree order")
            }
            Self::DuplicateValue { node } => {
                write!(formatter, "node {node} repeats the value of an ancestor")
            }
            Self::ZeroMultiplicity { node } => {
                write!(formatter, "node {node} holds no copies")
            }
            Self::BrokenParentLink { node } => {
                write!(formatter, "node {node} has an inconsistent parent link")
            }
            Self::DanglingHandle { node } => {
                write!(formatter, "handle {node} does not name a stored node")
            }
            Self::UnreachableNodes { reachable, stored } => write!(
                formatter,
                "{reachable} of {stored} stored nodes are reachable from the root"
            ),
            Self::SizeMismatch { expected, actual } => write!(
                formatter,
                "multiset size is {actual} but the nodes hold {expected} copies"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Walks `tree` from the root and validates every invariant.
pub(crate) fn check<T: Ord>(tree: &RedBlackTree<T>) -> Result<(), InvariantViolation> {
    let stored = tree.distinct_count();
    let Some(root) = tree.root() else {
        return if stored == 0 {
            Ok(())
        } else {
            Err(InvariantViolation::UnreachableNodes {
                reachable: 0,
                stored,
            })
        };
    };

    let root_node = tree
        .node(root)
        .ok_or(InvariantViolation::DanglingHandle { node: root })?;
    if root_node.parent().is_some() {
        return Err(InvariantViolation::RootHasParent);
    }
    if root_node.is_red() {
        return Err(InvariantViolation::RedRoot);
    }

    let mut checker = Checker {
        tree,
        visited: vec![false; stored],
        reachable: 0,
    };
    checker.subtree(root, None, None, None)?;

    if checker.reachable == stored {
        Ok(())
    } else {
        Err(InvariantViolation::UnreachableNodes {
            reachable: checker.reachable,
            stored,
        })
    }
}

struct Checker<'a, T> {
    tree: &'a RedBlackTree<T>,
    visited: Vec<bool>,
    reachable: usize,
}

impl<'a, T: Ord> Checker<'a, T> {
    /// Validates the subtree rooted at `id` and returns its black-height.
    ///
    /// `lower` and `upper` are the nearest ancestor values the subtree must
    /// stay strictly between.
    fn subtree(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        lower: Option<&'a T>,
        upper: Option<&'a T>,
    ) -> Result<usize, InvariantViolation> {
        let tree = self.tree;
        let node = tree
            .node(id)
            .ok_or(InvariantViolation::DanglingHandle { node: id })?;

        let seen_before = std::mem::replace(&mut self.visited[id.index()], true);
        if seen_before || node.parent() != parent {
            return Err(InvariantViolation::BrokenParentLink { node: id });
        }
        self.reachable += 1;

        if node.multiplicity() == 0 {
            return Err(InvariantViolation::ZeroMultiplicity { node: id });
        }

        let value = node.value();
        if let Some(lower) = lower {
            check_bound(id, value.cmp(lower), Ordering::Greater)?;
        }
        if let Some(upper) = upper {
            check_bound(id, value.cmp(upper), Ordering::Less)?;
        }

        if node.is_red() {
            for child in [node.left(), node.right()].into_iter().flatten() {
                if tree.node(child).is_some_and(Node::is_red) {
                    return Err(InvariantViolation::RedViolation { node: child });
                }
            }
        }

        let left = match node.left() {
            Some(left) => self.subtree(left, Some(id), lower, Some(value))?,
            None => 0,
        };
        let right = match node.right() {
            Some(right) => self.subtree(right, Some(id), Some(value), upper)?,
            None => 0,
        };
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch {
                node: id,
                left,
                right,
            });
        }

        Ok(left + usize::from(node.is_black()))
    }
}

fn check_bound(
    node: NodeId,
    found: Ordering,
    required: Ordering,
) -> Result<(), InvariantViolation> {
    match found {
        Ordering::Equal => Err(InvariantViolation::DuplicateValue { node }),
        ordering if ordering == required => Ok(()),
        _ => Err(InvariantViolation::OrderViolation { node }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multiset::Color;
    use rstest::rstest;

    fn tree_of(values: &[i32]) -> RedBlackTree<i32> {
        let mut tree = RedBlackTree::new();
        for &value in values {
            tree.insert(value);
        }
        tree
    }

    #[rstest]
    fn test_empty_tree_is_valid() {
        let tree: RedBlackTree<i32> = RedBlackTree::new();
        assert_eq!(check(&tree), Ok(()));
    }

    #[rstest]
    fn test_balanced_tree_is_valid() {
        let tree = tree_of(&[5, 2, 8, 1, 9, 3, 7]);
        assert_eq!(check(&tree), Ok(()));
    }

    #[rstest]
    fn test_red_root_is_reported() {
        let mut tree = tree_of(&[5]);
        let root = tree.root().map(NodeId::index);
        if let Some(index) = root {
            tree_node_mut(&mut tree, index).recolor(Color::Red);
        }
        assert_eq!(check(&tree), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_red_red_is_reported() {
        // 2, 1 and 3 are black and 4 hangs red under 3; repainting 3 red
        // leaves two reds in a row.
        let mut tree = tree_of(&[2, 1, 3, 4]);
        let three = tree.find_id(&3);
        if let Some(three) = three {
            tree_node_mut(&mut tree, three.index()).recolor(Color::Red);
        }
        assert!(matches!(
            check(&tree),
            Err(InvariantViolation::RedViolation { .. })
        ));
    }

    #[rstest]
    fn test_black_height_mismatch_is_reported() {
        let mut tree = tree_of(&[2, 1, 3]);
        if let Some(one) = tree.find_id(&1) {
            tree_node_mut(&mut tree, one.index()).recolor(Color::Black);
        }
        assert!(matches!(
            check(&tree),
            Err(InvariantViolation::BlackHeightMismatch { left: 1, right: 0, .. })
        ));
    }

    #[rstest]
    fn test_zero_multiplicity_is_reported() {
        let mut tree = tree_of(&[2, 1, 3]);
        if let Some(three) = tree.find_id(&3) {
            tree_node_mut(&mut tree, three.index()).take_all();
        }
        assert!(matches!(
            check(&tree),
            Err(InvariantViolation::ZeroMultiplicity { .. })
        ));
    }

    #[rstest]
    fn test_violation_display() {
        let violation = InvariantViolation::BlackHeightMismatch {
            node: NodeId::new(4),
            left: 2,
            right: 1,
        };
        assert_eq!(
            format!("{violation}"),
            "node #4 has black-height 2 on the left but 1 on the right"
        );
        assert_eq!(format!("{}", InvariantViolation::RedRoot), "root node is red");
    }

    #[rstest]
    fn test_violation_is_error() {
        let error: Box<dyn std::error::Error> = Box::new(InvariantViolation::RootHasParent);
        assert_eq!(error.to_string(), "root node has a parent");
    }

    fn tree_node_mut(tree: &mut RedBlackTree<i32>, index: usize) -> &mut Node<i32> {
        tree.node_mut_for_tests(NodeId::new(index))
    }
}
