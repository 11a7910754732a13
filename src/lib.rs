//! An ordered map backed by a parent-linked binary search tree.
//!
//! [`BsTree`] is the core container: insert-if-absent, lookup, erase and an
//! explicit [`BsTree::balance`] that rebuilds the tree at minimal height.
//! Iteration goes through [`BstIterator`] cursors that walk in-order
//! successors over parent links. [`BstMap`] layers a `std`-style map API on
//! top.
//!
//! ```
//! use bst_map::BsTree;
//!
//! let mut tree = BsTree::new();
//! for key in [8, 3, 10, 1, 6, 4, 7, 14, 13] {
//!     tree.insert(key, key * 2);
//! }
//! assert!(tree.find(&12) == tree.end());
//!
//! tree.erase(&3);
//! tree.erase(&10);
//! assert_eq!(tree.to_string(), "size: [7] 1 4 6 7 8 13 14 ");
//! ```

pub mod bst_base;
pub mod bst_map;
pub mod error;

pub use bst_base::{
    bst_traits::{from_fn, FnComparator, KeyComparator, ReverseKeyComparator},
    iter::{BstIterator, Iter, TreeIterator},
    tree::BsTree,
    tree_stats::TreeStats,
    DefaultBsTree, DefaultKeyComparator, ReverseBsTree,
};
pub use bst_map::BstMap;
pub use error::InvariantError;
