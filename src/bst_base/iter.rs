use std::{fmt::Debug, iter::FusedIterator, marker::PhantomData, ptr::null_mut};

use super::node::{successor, Node};

pub trait TreeIterator<'a, K: 'a, V: 'a>: Clone + Debug {
    fn key(&self) -> &'a K;
    fn value(&self) -> &'a V;
    fn forward(&mut self) -> &mut Self;
    fn equals(&self, other: &Self) -> bool;
    fn is_end(&self) -> bool;
}

/// Cursor on one node of a [`BsTree`](super::tree::BsTree), or on `end`.
///
/// The cursor borrows the tree, so the tree cannot be restructured while it is
/// alive. Two cursors are equal when they reference the same node.
pub struct BstIterator<'a, K, V> {
    curr_node: *mut Node<K, V>,
    _marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> BstIterator<'a, K, V> {
    pub(crate) fn new(node: *mut Node<K, V>) -> Self {
        Self {
            curr_node: node,
            _marker: PhantomData,
        }
    }

    pub(crate) fn end() -> Self {
        Self::new(null_mut())
    }

    #[inline]
    fn curr_node(&self) -> &'a Node<K, V> {
        assert!(!self.curr_node.is_null(), "dereferenced an end iterator");
        unsafe { &*self.curr_node }
    }

    /// Key and value of the referenced entry.
    ///
    /// # Panics
    /// On an `end` iterator.
    pub fn pair(&self) -> (&'a K, &'a V) {
        let n = self.curr_node();
        (&n.key, &n.value)
    }

    /// Non-panicking dereference; `None` on `end`.
    pub fn get(&self) -> Option<(&'a K, &'a V)> {
        if self.curr_node.is_null() {
            None
        } else {
            Some(self.pair())
        }
    }
}

impl<'a, K, V> Clone for BstIterator<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for BstIterator<'a, K, V> {}

impl<'a, K, V> Debug for BstIterator<'a, K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.curr_node.is_null() {
            write!(f, "[end]")
        } else {
            write!(f, "[{:p}]", self.curr_node)
        }
    }
}

impl<'a, K: 'a, V: 'a> TreeIterator<'a, K, V> for BstIterator<'a, K, V> {
    #[inline]
    fn key(&self) -> &'a K {
        &self.curr_node().key
    }

    #[inline]
    fn value(&self) -> &'a V {
        &self.curr_node().value
    }

    /// Moves to the in-order successor.
    ///
    /// # Panics
    /// When already at `end`.
    fn forward(&mut self) -> &mut Self {
        assert!(!self.curr_node.is_null(), "advanced an end iterator");
        self.curr_node = successor(self.curr_node);
        self
    }

    fn equals(&self, other: &Self) -> bool {
        self.curr_node == other.curr_node
    }

    fn is_end(&self) -> bool {
        self.curr_node.is_null()
    }
}

impl<'a, K, V> PartialEq for BstIterator<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.curr_node == other.curr_node
    }
}

impl<'a, K, V> Eq for BstIterator<'a, K, V> {}

/// In-order iterator over `(&K, &V)`.
pub struct Iter<'a, K, V> {
    cursor: BstIterator<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(begin: BstIterator<'a, K, V>, len: usize) -> Self {
        Self {
            cursor: begin,
            remaining: len,
        }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.cursor.get()?;
        self.cursor.forward();
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K: 'a, V: 'a> FusedIterator for Iter<'a, K, V> {}
