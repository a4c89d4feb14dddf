//! Tree cells and the handles that link them.

use std::fmt;
use std::mem;

use super::Color;

// =============================================================================
// Handles
// =============================================================================

/// A handle to a node stored in a [`RedBlackTree`](super::RedBlackTree).
///
/// Handles are plain indices into the tree's node arena. They stay valid
/// until the next operation that destroys a node; after that a handle may
/// name a different node or none at all.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena index of this handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// Which child link of a node.
///
/// Mirrored fixup cases are written once in terms of a side and its
/// [`opposite`](Side::opposite).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    /// The link to smaller values.
    Left,
    /// The link to greater values.
    Right,
}

impl Side {
    /// Returns the mirrored side.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// One cell of the red-black tree.
///
/// A node represents a distinct value currently stored together with how
/// many copies of it the multiset holds. It carries no tree-wide knowledge:
/// it never inspects other nodes and never triggers rebalancing.
#[derive(Clone, Debug)]
pub struct Node<T> {
    value: T,
    count: usize,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> Node<T> {
    /// Creates a red leaf holding one copy of `value`.
    pub(crate) const fn new(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            count: 1,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    /// Returns the stored value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns how many copies of the value this node represents.
    #[inline]
    #[must_use]
    pub const fn multiplicity(&self) -> usize {
        self.count
    }

    /// Records one more copy of the value.
    #[inline]
    pub(crate) const fn bump(&mut self) {
        self.count += 1;
    }

    /// Removes one copy of the value.
    ///
    /// Returns `true` when no copies are left, meaning the node must be
    /// unlinked from the tree.
    #[inline]
    pub(crate) const fn drop_one(&mut self) -> bool {
        debug_assert!(self.count > 0, "node already has no copies");
        self.count = self.count.saturating_sub(1);
        self.count == 0
    }

    /// Removes every copy of the value and returns how many there were.
    #[inline]
    pub(crate) const fn take_all(&mut self) -> usize {
        let count = self.count;
        self.count = 0;
        count
    }

    /// Exchanges value and count with `other`, leaving colors and links alone.
    pub(crate) const fn swap_payload(&mut self, other: &mut Self) {
        mem::swap(&mut self.value, &mut other.value);
        mem::swap(&mut self.count, &mut other.count);
    }

    /// Returns the color of this node.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns `true` if this node is red.
    #[inline]
    #[must_use]
    pub const fn is_red(&self) -> bool {
        self.color.is_red()
    }

    /// Returns `true` if this node is black.
    #[inline]
    #[must_use]
    pub const fn is_black(&self) -> bool {
        self.color.is_black()
    }

    #[inline]
    pub(crate) const fn recolor(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn toggle_color(&mut self) {
        self.color = self.color.toggled();
    }

    /// Returns the handle of the parent node, or `None` for the root.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the handle of the left child.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Returns the handle of the right child.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Returns the handle of the child on `side`.
    #[inline]
    #[must_use]
    pub const fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    // Raw link setters. The tree pairs every forward link with the matching
    // back-reference, see `RedBlackTree::link`.

    #[inline]
    pub(crate) const fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn set_left(&mut self, left: Option<NodeId>) {
        self.left = left;
    }

    #[inline]
    pub(crate) const fn set_right(&mut self, right: Option<NodeId>) {
        self.right = right;
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.set_left(child),
            Side::Right => self.set_right(child),
        }
    }

    /// Points whichever child link currently names `from` at `to`.
    pub(crate) fn replace_child(&mut self, from: NodeId, to: Option<NodeId>) {
        if self.left == Some(from) {
            self.left = to;
        } else if self.right == Some(from) {
            self.right = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_node_is_red_with_one_copy() {
        let node = Node::new(7, None);
        assert_eq!(node.value(), &7);
        assert_eq!(node.multiplicity(), 1);
        assert_eq!(node.color(), Color::Red);
        assert_eq!(node.parent(), None);
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
    }

    #[rstest]
    fn test_new_node_remembers_parent() {
        let node = Node::new("leaf", Some(NodeId::new(3)));
        assert_eq!(node.parent(), Some(NodeId::new(3)));
    }

    #[rstest]
    fn test_bump_and_drop_one() {
        let mut node = Node::new('x', None);
        node.bump();
        node.bump();
        assert_eq!(node.multiplicity(), 3);

        assert!(!node.drop_one());
        assert!(!node.drop_one());
        assert!(node.drop_one());
        assert_eq!(node.multiplicity(), 0);
    }

    #[rstest]
    fn test_take_all_returns_previous_count() {
        let mut node = Node::new(1, None);
        node.bump();
        assert_eq!(node.take_all(), 2);
        assert_eq!(node.multiplicity(), 0);
    }

    #[rstest]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "node already has no copies")]
    fn test_drop_one_on_empty_node_panics_in_debug() {
        let mut node = Node::new(1, None);
        node.take_all();
        node.drop_one();
    }

    #[rstest]
    fn test_recolor_and_toggle() {
        let mut node = Node::new(1, None);
        node.recolor(Color::Black);
        assert!(node.is_black());
        node.toggle_color();
        assert!(node.is_red());
    }

    #[rstest]
    #[case(Side::Left)]
    #[case(Side::Right)]
    fn test_set_child_matches_child(#[case] side: Side) {
        let mut node = Node::new(1, None);
        node.set_child(side, Some(NodeId::new(9)));
        assert_eq!(node.child(side), Some(NodeId::new(9)));
        assert_eq!(node.child(side.opposite()), None);
    }

    #[rstest]
    fn test_replace_child_only_touches_matching_link() {
        let mut node = Node::new(1, None);
        node.set_left(Some(NodeId::new(1)));
        node.set_right(Some(NodeId::new(2)));

        node.replace_child(NodeId::new(2), Some(NodeId::new(5)));
        assert_eq!(node.left(), Some(NodeId::new(1)));
        assert_eq!(node.right(), Some(NodeId::new(5)));

        node.replace_child(NodeId::new(42), None);
        assert_eq!(node.left(), Some(NodeId::new(1)));
        assert_eq!(node.right(), Some(NodeId::new(5)));
    }

    #[rstest]
    fn test_swap_payload_keeps_links_and_color() {
        let mut first = Node::new(1, None);
        first.set_left(Some(NodeId::new(4)));
        let mut second = Node::new(2, Some(NodeId::new(0)));
        second.recolor(Color::Black);
        second.bump();

        first.swap_payload(&mut second);

        assert_eq!(first.value(), &2);
        assert_eq!(first.multiplicity(), 2);
        assert!(first.is_red());
        assert_eq!(first.left(), Some(NodeId::new(4)));
        assert_eq!(second.value(), &1);
        assert_eq!(second.multiplicity(), 1);
        assert!(second.is_black());
        assert_eq!(second.parent(), Some(NodeId::new(0)));
    }

    #[rstest]
    fn test_side_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
    }

    #[rstest]
    fn test_node_id_display() {
        assert_eq!(format!("{}", NodeId::new(12)), "#12");
    }
}
