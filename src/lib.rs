//! # redblack-multiset
//!
//! An ordered multiset backed by a red-black tree.
//!
//! ## Overview
//!
//! Values are stored once per distinct value together with a repetition
//! count, so inserting the same value many times costs a single node. The
//! tree keeps its height logarithmic through the classic red-black coloring
//! discipline, restored after every structural change by the insertion and
//! deletion fixups.
//!
//! - **[`OrderedMultiset`](multiset::OrderedMultiset)**: the multiset facade
//! - **[`RedBlackTree`](multiset::RedBlackTree)**: the balanced tree and its
//!   rebalancing algorithms
//! - **[`Node`](multiset::Node)**: one tree cell (value, count, color, links)
//!
//! ## Example
//!
//! ```rust
//! use redblack_multiset::prelude::*;
//!
//! let mut multiset = OrderedMultiset::new();
//! for value in [10, 20, 10, 30, 20, 10] {
//!     multiset.insert(value);
//! }
//!
//! assert_eq!(multiset.size(), 6);
//! assert_eq!(multiset.count_of(&10), 3);
//!
//! let entries: Vec<(&i32, usize)> = multiset.in_order().collect();
//! assert_eq!(entries, vec![(&10, 3), (&20, 2), (&30, 1)]);
//! ```
//!
//! ## Logging
//!
//! Structural events (node creation, unlinking, rotations, fixup cases) are
//! reported through the [`log`] facade at `trace` level. Install any `log`
//! backend to see them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use redblack_multiset::prelude::*;
///
/// let multiset: OrderedMultiset<i32> = OrderedMultiset::new();
/// assert!(multiset.is_empty());
/// ```
pub mod prelude {
    pub use crate::multiset::*;
}

pub mod multiset;
