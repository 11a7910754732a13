use std::ptr::null_mut;

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A single tree entry.
///
/// `left` and `right` are owned: they come from `Box::into_raw` and are only
/// released by the tree. `parent` never owns and is null for the root.
#[derive(Debug)]
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub parent: *mut Node<K, V>,
    pub left: *mut Node<K, V>,
    pub right: *mut Node<K, V>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, parent: *mut Self) -> *mut Self {
        Box::into_raw(Box::new(Node {
            key,
            value,
            parent,
            left: null_mut(),
            right: null_mut(),
        }))
    }

    /// Reclaims a detached node and returns its payload.
    ///
    /// # Safety
    /// `node` must come from [`Node::new`], must not be reachable from any tree
    /// and must not be freed twice.
    pub unsafe fn into_pair(node: *mut Self) -> (K, V) {
        let n = Box::from_raw(node);
        (n.key, n.value)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_null() && self.right.is_null()
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        (!self.left.is_null()) as usize + (!self.right.is_null()) as usize
    }

    /// The single child of a node with `child_count() == 1`, null for a leaf.
    #[inline]
    pub fn only_child(&self) -> *mut Self {
        debug_assert!(self.child_count() < 2);
        if self.left.is_null() {
            self.right
        } else {
            self.left
        }
    }

    #[inline]
    pub fn child(&self, side: Side) -> *mut Self {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub fn child_mut(&mut self, side: Side) -> &mut *mut Self {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The slot this node occupies in its parent, `None` for the root.
    pub fn side_in_parent(&self) -> Option<Side> {
        if self.parent.is_null() {
            return None;
        }
        let parent = unsafe { &*self.parent };
        if std::ptr::eq(parent.left, self) {
            Some(Side::Left)
        } else {
            debug_assert!(std::ptr::eq(parent.right, self));
            Some(Side::Right)
        }
    }
}

/// Descends `left` links from `node` until there is none.
pub fn leftmost<K, V>(mut node: *mut Node<K, V>) -> *mut Node<K, V> {
    if node.is_null() {
        return node;
    }
    while !unsafe { &*node }.left.is_null() {
        node = unsafe { &*node }.left;
    }
    node
}

/// In-order successor of `node`, or null when `node` holds the greatest key.
pub fn successor<K, V>(node: *mut Node<K, V>) -> *mut Node<K, V> {
    debug_assert!(!node.is_null());
    let n = unsafe { &*node };
    if !n.right.is_null() {
        return leftmost(n.right);
    }

    // climb while we are a right child; the first parent reached from its
    // left side is the answer
    let mut curr = node;
    let mut parent = n.parent;
    while !parent.is_null() && std::ptr::eq(unsafe { &*parent }.right, curr) {
        curr = parent;
        parent = unsafe { &*parent }.parent;
    }
    parent
}
