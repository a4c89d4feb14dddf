//! The ordered multiset facade.
//!
//! [`OrderedMultiset`] is the collection callers hold. It delegates every
//! operation to a [`RedBlackTree`] and keeps the total number of copies up to
//! date as it goes, so [`size`](OrderedMultiset::size) is O(1).
//!
//! # Examples
//!
//! ```rust
//! use redblack_multiset::multiset::OrderedMultiset;
//!
//! let mut words = OrderedMultiset::new();
//! for word in "the cat saw the other cat".split(' ') {
//!     words.insert(word);
//! }
//!
//! assert_eq!(words.size(), 6);
//! assert_eq!(words.distinct_count(), 4);
//! assert_eq!(words.count_of("cat"), 2);
//! assert_eq!(format!("{words}"), "{cat: 2, other: 1, saw: 1, the: 2}");
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{InOrder, InvariantViolation, Node, RedBlackTree};

// =============================================================================
// OrderedMultiset Definition
// =============================================================================

/// An ordered collection of values with repetition.
///
/// Values must implement `Ord`, and the ordering must be a total order:
/// a comparator that is not transitive or not consistent leaves the tree in
/// an unspecified (but memory-safe) shape. No other bound is needed: values
/// are neither hashed nor cloned.
///
/// # Time Complexity
///
/// | Operation        | Complexity |
/// |------------------|------------|
/// | `new`            | O(1)       |
/// | `insert`         | O(log N)   |
/// | `remove`         | O(log N)   |
/// | `remove_all`     | O(log N)   |
/// | `contains`       | O(log N)   |
/// | `count_of`       | O(log N)   |
/// | `first`/`last`   | O(log N)   |
/// | `size`           | O(1)       |
/// | `distinct_count` | O(1)       |
/// | `is_empty`       | O(1)       |
/// | `in_order`       | O(N)       |
///
/// N is the number of distinct values.
///
/// # Examples
///
/// ```rust
/// use redblack_multiset::multiset::OrderedMultiset;
///
/// let mut multiset = OrderedMultiset::new();
/// for value in [10, 20, 10, 30, 20, 10] {
///     multiset.insert(value);
/// }
///
/// assert_eq!(multiset.size(), 6);
/// assert_eq!(multiset.count_of(&10), 3);
/// assert_eq!(multiset.count_of(&20), 2);
///
/// assert!(multiset.remove(&10));
/// assert!(multiset.remove(&10));
/// assert!(multiset.contains(&10));
/// assert!(multiset.remove(&10));
/// assert!(!multiset.contains(&10));
/// ```
#[derive(Clone)]
pub struct OrderedMultiset<T> {
    /// Tree holding one node per distinct value
    tree: RedBlackTree<T>,
    /// Total number of copies across all nodes
    size: usize,
}

impl<T> OrderedMultiset<T> {
    /// Creates a new empty multiset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let multiset: OrderedMultiset<String> = OrderedMultiset::new();
    /// assert!(multiset.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RedBlackTree::new(),
            size: 0,
        }
    }

    /// Returns the total number of copies, counting repetitions.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of distinct values.
    #[inline]
    #[must_use]
    pub const fn distinct_count(&self) -> usize {
        self.tree.distinct_count()
    }

    /// Returns `true` if the multiset holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns an iterator over `(value, multiplicity)` pairs in ascending
    /// value order.
    ///
    /// The iterator borrows the multiset, so it cannot outlive or interleave
    /// with a mutation. Every call starts a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// multiset.insert('b');
    /// multiset.insert('a');
    /// multiset.insert('b');
    ///
    /// let entries: Vec<(&char, usize)> = multiset.in_order().collect();
    /// assert_eq!(entries, vec![(&'a', 1), (&'b', 2)]);
    /// ```
    #[inline]
    #[must_use]
    pub fn in_order(&self) -> InOrder<'_, T> {
        self.tree.in_order()
    }

    /// Returns the smallest value and its multiplicity.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<(&T, usize)> {
        self.tree.first()
    }

    /// Returns the largest value and its multiplicity.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<(&T, usize)> {
        self.tree.last()
    }

    /// Returns the height of the underlying tree.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the underlying tree.
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> &RedBlackTree<T> {
        &self.tree
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.size = 0;
    }
}

impl<T: Ord> OrderedMultiset<T> {
    /// Inserts one copy of `value` and returns its multiplicity afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// assert_eq!(multiset.insert("x"), 1);
    /// assert_eq!(multiset.insert("x"), 2);
    /// assert_eq!(multiset.size(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> usize {
        let multiplicity = self.tree.insert(value);
        self.size += 1;
        multiplicity
    }

    /// Removes one copy of `value`.
    ///
    /// Returns `false` if the value was not present; that is not an error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// multiset.insert(1);
    ///
    /// assert!(multiset.remove(&1));
    /// assert!(!multiset.remove(&1));
    /// assert!(multiset.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.tree.remove(value);
        if removed {
            self.size -= 1;
        }
        removed
    }

    /// Removes every copy of `value` and returns how many were removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// multiset.insert(7);
    /// multiset.insert(7);
    /// multiset.insert(8);
    ///
    /// assert_eq!(multiset.remove_all(&7), 2);
    /// assert_eq!(multiset.remove_all(&7), 0);
    /// assert_eq!(multiset.size(), 1);
    /// ```
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.tree.remove_all(value);
        self.size -= removed;
        removed
    }

    /// Returns `true` if at least one copy of `value` is present.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find_id(value).is_some()
    }

    /// Returns how many copies of `value` are present, 0 if none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use redblack_multiset::multiset::OrderedMultiset;
    ///
    /// let mut multiset = OrderedMultiset::new();
    /// multiset.insert("a".to_string());
    /// multiset.insert("a".to_string());
    ///
    /// // Can use &str to look up String values
    /// assert_eq!(multiset.count_of("a"), 2);
    /// assert_eq!(multiset.count_of("b"), 0);
    /// ```
    #[must_use]
    pub fn count_of<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(value).map_or(0, Node::multiplicity)
    }

    /// Validates the tree invariants and the cached size.
    ///
    /// Meant for tests and debugging; it walks the whole tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.tree.check_invariants()?;
        let expected: usize = self.in_order().map(|(_, count)| count).sum();
        if expected == self.size {
            Ok(())
        } else {
            Err(InvariantViolation::SizeMismatch {
                expected,
                actual: self.size,
            })
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for OrderedMultiset<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a OrderedMultiset<T> {
    type Item = (&'a T, usize);
    type IntoIter = InOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

/// Two multisets are equal when they hold the same values with the same
/// multiplicities, whatever the shape of their trees.
impl<T: PartialEq> PartialEq for OrderedMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.distinct_count() == other.distinct_count()
            && self.in_order().eq(other.in_order())
    }
}

impl<T: Eq> Eq for OrderedMultiset<T> {}

/// Hashes the size, then every `(value, multiplicity)` pair in value order,
/// so equal multisets hash equally.
impl<T: Hash> Hash for OrderedMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        for (value, count) in self {
            value.hash(state);
            count.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OrderedMultiset<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.in_order()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for OrderedMultiset<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (value, count) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}: {count}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(OrderedMultiset<i32>: Send, Sync, Default, Clone);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::hash_map::DefaultHasher;

    fn multiset_of(values: &[i32]) -> OrderedMultiset<i32> {
        let mut multiset = OrderedMultiset::new();
        for &value in values {
            multiset.insert(value);
        }
        multiset
    }

    fn hash_of(multiset: &OrderedMultiset<i32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        multiset.hash(&mut hasher);
        hasher.finish()
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_multiset() {
        let multiset: OrderedMultiset<i32> = OrderedMultiset::new();
        assert_eq!(format!("{multiset}"), "{}");
    }

    #[rstest]
    fn test_display_sorted_with_counts() {
        let multiset = multiset_of(&[3, 1, 3]);
        assert_eq!(format!("{multiset}"), "{1: 1, 3: 2}");
    }

    #[rstest]
    fn test_debug_as_map() {
        let multiset = multiset_of(&[2, 2]);
        assert_eq!(format!("{multiset:?}"), "{2: 2}");
    }

    // =========================================================================
    // Size Tracking Tests
    // =========================================================================

    #[rstest]
    fn test_size_counts_repetitions() {
        let mut multiset = multiset_of(&[1, 1, 2]);
        assert_eq!(multiset.size(), 3);
        assert_eq!(multiset.distinct_count(), 2);

        multiset.remove(&1);
        assert_eq!(multiset.size(), 2);
        multiset.remove(&5);
        assert_eq!(multiset.size(), 2);
        multiset.remove_all(&2);
        assert_eq!(multiset.size(), 1);
        assert!(multiset.check_invariants().is_ok());
    }

    #[rstest]
    fn test_clear_resets_size() {
        let mut multiset = multiset_of(&[4, 4, 4]);
        multiset.clear();
        assert!(multiset.is_empty());
        assert_eq!(multiset.size(), 0);
        assert!(multiset.check_invariants().is_ok());
    }

    // =========================================================================
    // Equality and Hash Tests
    // =========================================================================

    #[rstest]
    fn test_eq_ignores_insertion_order() {
        let ascending = multiset_of(&[1, 2, 2, 3, 4, 5]);
        let scrambled = multiset_of(&[5, 2, 4, 1, 3, 2]);
        assert_eq!(ascending, scrambled);
        assert_eq!(hash_of(&ascending), hash_of(&scrambled));
    }

    #[rstest]
    #[case(&[1, 2], &[1, 2, 2])]
    #[case(&[1, 2], &[1, 3])]
    #[case(&[], &[1])]
    fn test_ne_when_contents_differ(#[case] left: &[i32], #[case] right: &[i32]) {
        assert_ne!(multiset_of(left), multiset_of(right));
    }

    #[rstest]
    fn test_clone_is_independent() {
        let original = multiset_of(&[1, 2]);
        let mut copy = original.clone();
        copy.insert(3);
        assert_eq!(original.size(), 2);
        assert_eq!(copy.size(), 3);
        assert!(copy.check_invariants().is_ok());
    }

    #[rstest]
    fn test_into_iterator_for_reference() {
        let multiset = multiset_of(&[9, 8, 9]);
        let mut seen = Vec::new();
        for (value, count) in &multiset {
            seen.push((*value, count));
        }
        assert_eq!(seen, vec![(8, 1), (9, 2)]);
    }
}
