/// Shape summary of a tree, computed by [`BsTree::stats`](super::tree::BsTree::stats).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub size: usize,
    pub leaves: usize,
    pub inner_nodes: usize,
    /// Nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub height: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> usize {
        self.inner_nodes + self.leaves
    }

    /// Smallest height any binary search tree over `size` keys can have,
    /// `ceil(log2(size + 1))`.
    pub fn min_height(&self) -> usize {
        (usize::BITS - self.size.leading_zeros()) as usize
    }

    pub fn is_minimal_height(&self) -> bool {
        self.height == self.min_height()
    }
}

#[cfg(test)]
#[test]
fn test_min_height() {
    let stats = |size| TreeStats {
        size,
        ..TreeStats::new()
    };
    assert_eq!(stats(0).min_height(), 0);
    assert_eq!(stats(1).min_height(), 1);
    assert_eq!(stats(2).min_height(), 2);
    assert_eq!(stats(3).min_height(), 2);
    assert_eq!(stats(7).min_height(), 3);
    assert_eq!(stats(8).min_height(), 4);
    assert_eq!(stats(9).min_height(), 4);
}
