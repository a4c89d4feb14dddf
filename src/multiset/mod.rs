//! Ordered multiset on top of a red-black tree.
//!
//! This module is layered bottom-up:
//!
//! - [`Color`]: the two-state node color
//! - [`Node`]: one tree cell holding a value, its repetition count, its color
//!   and the handles of its parent and children
//! - [`RedBlackTree`]: owns every node in an arena and implements search,
//!   insertion, removal, rotations and the rebalancing fixups
//! - [`OrderedMultiset`]: the multiset facade, tracking the total
//!   multiplicity and implementing the standard traits
//!
//! # Node Ownership
//!
//! Nodes live in a dense `Vec` owned by the tree and refer to each other by
//! [`NodeId`] handles. A parent handle is never an ownership edge, so there
//! are no reference cycles and dropping the tree releases the whole arena at
//! once without recursion.
//!
//! # Examples
//!
//! ```rust
//! use redblack_multiset::multiset::OrderedMultiset;
//!
//! let mut multiset = OrderedMultiset::new();
//! multiset.insert("b");
//! multiset.insert("a");
//! multiset.insert("b");
//!
//! assert_eq!(multiset.count_of("b"), 2);
//! assert!(multiset.remove("b"));
//! assert_eq!(multiset.count_of("b"), 1);
//! assert!(!multiset.remove("z"));
//!
//! // The tree stays valid after every operation
//! assert!(multiset.check_invariants().is_ok());
//! ```

mod color;
mod invariant;
mod iter;
mod node;
mod ordered_multiset;
mod tree;

pub use color::Color;
pub use invariant::InvariantViolation;
pub use iter::InOrder;
pub use node::{Node, NodeId, Side};
pub use ordered_multiset::OrderedMultiset;
pub use tree::RedBlackTree;
