//! In-order traversal.

use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::{NodeId, RedBlackTree, Side};

/// Inline capacity of the traversal stack. The stack never holds more than
/// the tree height, which stays below this for trees of up to 2^16 values.
const INLINE_DEPTH: usize = 32;

/// An iterator over the `(value, multiplicity)` pairs of a tree, in
/// ascending value order.
///
/// Created by [`RedBlackTree::in_order`] and
/// [`OrderedMultiset::in_order`](super::OrderedMultiset::in_order). The
/// traversal keeps an explicit stack of the left spine still to visit, so it
/// never recurses.
#[derive(Clone, Debug)]
pub struct InOrder<'a, T> {
    tree: &'a RedBlackTree<T>,
    stack: SmallVec<[NodeId; INLINE_DEPTH]>,
    remaining: usize,
}

impl<'a, T> InOrder<'a, T> {
    pub(crate) fn new(tree: &'a RedBlackTree<T>) -> Self {
        let mut iterator = Self {
            tree,
            stack: SmallVec::new(),
            remaining: tree.distinct_count(),
        };
        iterator.descend(tree.root());
        iterator
    }

    /// Pushes `start` and every node along its left spine.
    fn descend(&mut self, start: Option<NodeId>) {
        let mut cursor = start;
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.tree.get(id).child(Side::Left);
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = (&'a T, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.get(id);
        self.descend(node.right());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.value(), node.multiplicity()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for InOrder<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for InOrder<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_empty_tree_yields_nothing() {
        let tree: RedBlackTree<i32> = RedBlackTree::new();
        let mut iterator = tree.in_order();
        assert_eq!(iterator.len(), 0);
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_yields_ascending_with_counts() {
        let mut tree = RedBlackTree::new();
        for value in [5, 1, 9, 1, 5, 5, 3] {
            tree.insert(value);
        }
        let entries: Vec<(i32, usize)> = tree
            .in_order()
            .map(|(value, count)| (*value, count))
            .collect();
        assert_eq!(entries, vec![(1, 2), (3, 1), (5, 3), (9, 1)]);
    }

    #[rstest]
    fn test_exact_size_counts_down() {
        let mut tree = RedBlackTree::new();
        for value in 0..10 {
            tree.insert(value);
        }
        let mut iterator = tree.in_order();
        assert_eq!(iterator.len(), 10);
        iterator.next();
        iterator.next();
        assert_eq!(iterator.size_hint(), (8, Some(8)));
    }

    #[rstest]
    fn test_traversal_is_restartable() {
        let mut tree = RedBlackTree::new();
        for value in ["b", "c", "a"] {
            tree.insert(value);
        }
        let first: Vec<_> = tree.in_order().collect();
        let second: Vec<_> = tree.in_order().collect();
        assert_eq!(first, second);
    }
}
