pub mod bst_traits;
mod deletion;
pub mod iter;
mod node;
pub mod tree;
pub mod tree_stats;

use self::{bst_traits::ReverseKeyComparator, tree::BsTree};

pub use self::bst_traits::DefaultKeyComparator;

pub type DefaultBsTree<K, V> = BsTree<K, V, DefaultKeyComparator<K>>;
pub type ReverseBsTree<K, V> = BsTree<K, V, ReverseKeyComparator<DefaultKeyComparator<K>>>;
