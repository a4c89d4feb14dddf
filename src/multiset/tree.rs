//! Arena-backed red-black tree with repetition counts.
//!
//! [`RedBlackTree`] stores one [`Node`] per distinct value and folds equal
//! values into the node's count. Structural changes (creating or destroying
//! a node) are followed by the insertion or deletion fixup, which walks from
//! the mutation point toward the root recoloring and rotating until the
//! invariants hold again:
//!
//! 1. Values are in binary-search-tree order and pairwise distinct
//! 2. The root is black
//! 3. Missing children (`None`) count as black leaves
//! 4. Red nodes have only black children
//! 5. Every path from a node to its leaves has the same number of black nodes
//!
//! These invariants keep the height at most `2 * log2(n + 1)`.

use std::borrow::Borrow;
use std::cmp::Ordering;

use log::{debug, trace};
use smallvec::SmallVec;

use super::invariant::{self, InvariantViolation};
use super::{Color, InOrder, Node, NodeId, Side};

// =============================================================================
// RedBlackTree Definition
// =============================================================================

/// A red-black tree holding values with repetition.
///
/// Nodes are owned by a dense arena and refer to each other through
/// [`NodeId`] handles; the parent handle is a back-reference used only to
/// walk upward during fixups.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `find`         | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `remove_all`   | O(log N)   |
/// | `first`/`last` | O(log N)   |
/// | `in_order`     | O(N)       |
/// | `height`       | O(N)       |
///
/// N is the number of distinct values.
///
/// # Examples
///
/// ```rust
/// use redblack_multiset::multiset::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// for value in 1..=100 {
///     tree.insert(value);
/// }
///
/// assert_eq!(tree.distinct_count(), 100);
/// assert!(tree.height() <= 2 * 7);
/// assert!(tree.check_invariants().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct RedBlackTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
}

impl<T> RedBlackTree<T> {
    /// Creates an empty tree.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Returns `true` if the tree holds no nodes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of distinct values (nodes) in the tree.
    #[inline]
    #[must_use]
    pub const fn distinct_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the handle of the root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Resolves a handle to its node.
    ///
    /// Returns `None` if the handle does not name a node of this tree.
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.index())
    }

    /// Returns the smallest value and its multiplicity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(3);
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.first(), Some((&1, 2)));
    /// assert_eq!(tree.last(), Some((&3, 1)));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<(&T, usize)> {
        self.root
            .map(|root| self.extreme(root, Side::Left))
            .map(|id| self.entry(id))
    }

    /// Returns the largest value and its multiplicity.
    #[must_use]
    pub fn last(&self) -> Option<(&T, usize)> {
        self.root
            .map(|root| self.extreme(root, Side::Right))
            .map(|id| self.entry(id))
    }

    /// Returns an iterator over `(value, multiplicity)` pairs in ascending
    /// value order.
    ///
    /// Every call starts a fresh traversal.
    #[inline]
    #[must_use]
    pub fn in_order(&self) -> InOrder<'_, T> {
        InOrder::new(self)
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    ///
    /// An empty tree has height 0 and a single node has height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut tallest = 0;
        let mut pending: SmallVec<[(NodeId, usize); 64]> = SmallVec::new();
        if let Some(root) = self.root {
            pending.push((root, 1));
        }
        while let Some((id, depth)) = pending.pop() {
            tallest = tallest.max(depth);
            let node = self.get(id);
            for child in [node.left(), node.right()].into_iter().flatten() {
                pending.push((child, depth + 1));
            }
        }
        tallest
    }

    /// Removes every node, releasing the whole arena at once.
    pub fn clear(&mut self) {
        debug!("clearing red-black tree of {} nodes", self.nodes.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Validates every structural invariant of the tree.
    ///
    /// This walks the whole tree and is meant for tests and debugging; no
    /// operation calls it on its own.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        T: Ord,
    {
        invariant::check(self)
    }

    // =========================================================================
    // Arena helpers
    // =========================================================================

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn get_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.index()]
    }

    #[cfg(test)]
    pub(crate) fn node_mut_for_tests(&mut self, id: NodeId) -> &mut Node<T> {
        self.get_mut(id)
    }

    #[inline]
    fn entry(&self, id: NodeId) -> (&T, usize) {
        let node = self.get(id);
        (node.value(), node.multiplicity())
    }

    #[inline]
    fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self.get(id).child(side)
    }

    /// Absent nodes are black leaves.
    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.get(id).is_red())
    }

    #[inline]
    fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    #[inline]
    fn recolor(&mut self, id: NodeId, color: Color) {
        self.get_mut(id).recolor(color);
    }

    /// Follows `side` links from `id` as far as they go.
    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(next) = self.child(id, side) {
            id = next;
        }
        id
    }

    /// Which side of `parent` holds `child`.
    #[inline]
    fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self.get(parent).left() == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Attaches `child` under `parent` on `side`, keeping the back-reference
    /// consistent with the forward link.
    fn link(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        self.get_mut(parent).set_child(side, child);
        if let Some(child) = child {
            self.get_mut(child).set_parent(Some(parent));
        }
    }

    /// Puts `replacement` where `old` hangs: under `old`'s parent, or at the
    /// root. `old`'s own links are left untouched.
    fn transplant(&mut self, old: NodeId, replacement: Option<NodeId>) {
        match self.get(old).parent() {
            None => {
                self.root = replacement;
                if let Some(replacement) = replacement {
                    self.get_mut(replacement).set_parent(None);
                }
            }
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.link(parent, side, replacement);
            }
        }
    }

    /// Rotates around `pivot` so that `pivot` moves down on `direction`.
    ///
    /// `rotate(pivot, Side::Left)` is the classic left rotation: the right
    /// child of `pivot` takes its place, `pivot` becomes that child's left
    /// child, and the child's former left subtree becomes `pivot`'s right
    /// subtree. In-order sequence is preserved.
    fn rotate(&mut self, pivot: NodeId, direction: Side) {
        let Some(raised) = self.child(pivot, direction.opposite()) else {
            return;
        };
        trace!("rotate {direction:?} around {pivot}, raising {raised}");
        let inner = self.child(raised, direction);
        self.link(pivot, direction.opposite(), inner);
        self.transplant(pivot, Some(raised));
        self.link(raised, direction, Some(pivot));
    }

    /// Frees the arena slot of an already unlinked node.
    ///
    /// The last node of the arena moves into the freed slot, so every link
    /// naming it is redirected.
    fn release(&mut self, id: NodeId) {
        let last = NodeId::new(self.nodes.len() - 1);
        self.nodes.swap_remove(id.index());
        if id == last {
            return;
        }
        let moved = self.get(id);
        let (parent, left, right) = (moved.parent(), moved.left(), moved.right());
        match parent {
            None => self.root = Some(id),
            Some(parent) => self.get_mut(parent).replace_child(last, Some(id)),
        }
        for child in [left, right].into_iter().flatten() {
            self.get_mut(child).set_parent(Some(id));
        }
    }
}

impl<T: Ord> RedBlackTree<T> {
    // =========================================================================
    // Search
    // =========================================================================

    /// Returns the node holding a value equal to `value`.
    ///
    /// The value may be any borrowed form of the tree's value type, but the
    /// ordering on the borrowed form must match the ordering on the value
    /// type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert("apple".to_string());
    /// tree.insert("apple".to_string());
    ///
    /// let node = tree.find("apple").unwrap();
    /// assert_eq!(node.multiplicity(), 2);
    /// assert!(tree.find("pear").is_none());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(value).map(|id| self.get(id))
    }

    /// Returns the handle of the node holding a value equal to `value`.
    #[must_use]
    pub fn find_id<Q>(&self, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.get(id);
            cursor = match value.cmp(node.value().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts one copy of `value` and returns its multiplicity afterwards.
    ///
    /// An equal value already in the tree only has its count bumped; no
    /// rebalancing happens in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.insert(5), 1);
    /// assert_eq!(tree.insert(5), 2);
    /// assert_eq!(tree.distinct_count(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> usize {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.get(id);
            side = match value.cmp(node.value()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    let node = self.get_mut(id);
                    node.bump();
                    return node.multiplicity();
                }
            };
            parent = Some(id);
            cursor = node.child(side);
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(value, parent));
        match parent {
            None => self.root = Some(id),
            Some(parent) => self.link(parent, side, Some(id)),
        }
        trace!("created node {id} under {parent:?}");

        self.insert_fixup(id);
        1
    }

    /// Restores the invariants after `node` was linked in red.
    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(mut parent) = self.get(node).parent() {
            if self.get(parent).is_black() {
                break;
            }
            // A red parent is never the root.
            let Some(grandparent) = self.get(parent).parent() else {
                break;
            };
            let parent_side = self.side_of(grandparent, parent);
            let uncle = self.child(grandparent, parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&uncle| self.get(uncle).is_red()) {
                trace!("insert fixup at {node}: red uncle {uncle}, recolor upward");
                self.recolor(parent, Color::Black);
                self.recolor(uncle, Color::Black);
                self.recolor(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(parent, node) != parent_side {
                trace!("insert fixup at {node}: inside grandchild, straighten");
                self.rotate(parent, parent_side);
                (node, parent) = (parent, node);
            }

            trace!("insert fixup at {node}: outside grandchild, rotate {grandparent}");
            self.recolor(parent, Color::Black);
            self.recolor(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
        }

        if let Some(root) = self.root {
            self.recolor(root, Color::Black);
        }
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes one copy of `value`.
    ///
    /// Returns `false` if the value was not present. The node is unlinked
    /// and the tree rebalanced only when its last copy goes away.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    ///
    /// assert!(tree.remove(&1));
    /// assert_eq!(tree.distinct_count(), 1);
    /// assert!(tree.remove(&1));
    /// assert!(tree.is_empty());
    /// assert!(!tree.remove(&1));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(id) = self.find_id(value) else {
            return false;
        };
        if self.get_mut(id).drop_one() {
            self.unlink(id);
        }
        true
    }

    /// Removes every copy of `value` and returns how many were removed.
    ///
    /// Returns 0 if the value was not present.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(id) = self.find_id(value) else {
            return 0;
        };
        let removed = self.get_mut(id).take_all();
        self.unlink(id);
        removed
    }

    /// Splices a node with no copies left out of the tree and frees it.
    fn unlink(&mut self, id: NodeId) {
        let mut target = id;
        let node = self.get(target);
        if let (Some(_), Some(right)) = (node.left(), node.right()) {
            let successor = self.extreme(right, Side::Left);
            self.swap_payload(target, successor);
            target = successor;
        }

        let node = self.get(target);
        let replacement = node.left().or(node.right());
        let parent = node.parent();
        let removed_color = node.color();
        let side = parent.map_or(Side::Left, |parent| self.side_of(parent, target));

        self.transplant(target, replacement);
        trace!("unlinked {removed_color} node {target}, replaced by {replacement:?}");
        if removed_color.is_black() {
            self.remove_fixup(replacement, parent, side);
        }
        self.release(target);
    }

    fn swap_payload(&mut self, first: NodeId, second: NodeId) {
        if let Ok([first, second]) = self
            .nodes
            .get_disjoint_mut([first.index(), second.index()])
        {
            first.swap_payload(second);
        }
    }

    /// Restores the black-height lost on the path through `node`.
    ///
    /// `node` sits on `side` of `parent` and carries an extra black; it may
    /// be `None`, which is why its position is passed explicitly.
    fn remove_fixup(
        &mut self,
        mut node: Option<NodeId>,
        mut parent: Option<NodeId>,
        mut side: Side,
    ) {
        while let Some(current_parent) = parent {
            if self.is_red(node) {
                break;
            }

            let mut sibling = self.child(current_parent, side.opposite());
            if let Some(red_sibling) = sibling.filter(|&sibling| self.get(sibling).is_red()) {
                trace!("remove fixup under {current_parent}: red sibling {red_sibling}");
                self.recolor(red_sibling, Color::Black);
                self.recolor(current_parent, Color::Red);
                self.rotate(current_parent, side);
                sibling = self.child(current_parent, side.opposite());
            }

            // A black-height deficit implies a sibling on the other side.
            debug_assert!(sibling.is_some(), "deficit under {current_parent} without a sibling");
            let Some(mut sibling) = sibling else {
                node = Some(current_parent);
                parent = self.get(current_parent).parent();
                side = parent.map_or(Side::Left, |above| self.side_of(above, current_parent));
                continue;
            };

            let near = self.child(sibling, side);
            let far = self.child(sibling, side.opposite());
            if self.is_black(near) && self.is_black(far) {
                trace!("remove fixup under {current_parent}: black nephews, push deficit up");
                self.get_mut(sibling).toggle_color();
                node = Some(current_parent);
                parent = self.get(current_parent).parent();
                side = parent.map_or(Side::Left, |above| self.side_of(above, current_parent));
                continue;
            }

            if self.is_black(far) {
                trace!("remove fixup under {current_parent}: red near nephew, turn sibling");
                if let Some(near) = near {
                    self.recolor(near, Color::Black);
                }
                self.recolor(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                // The red near nephew was raised into the sibling slot.
                let turned = self.child(current_parent, side.opposite());
                debug_assert!(turned.is_some(), "rotation lost the sibling");
                let Some(turned) = turned else {
                    break;
                };
                sibling = turned;
            }

            trace!("remove fixup under {current_parent}: red far nephew, resolve");
            let parent_color = self.get(current_parent).color();
            self.recolor(sibling, parent_color);
            self.recolor(current_parent, Color::Black);
            if let Some(far) = self.child(sibling, side.opposite()) {
                self.recolor(far, Color::Black);
            }
            self.rotate(current_parent, side);
            node = self.root;
            break;
        }

        if let Some(node) = node {
            self.recolor(node, Color::Black);
        }
    }
}

impl<T> Default for RedBlackTree<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(RedBlackTree<i32>: Send, Sync);
static_assertions::assert_impl_all!(RedBlackTree<String>: Send, Sync);
