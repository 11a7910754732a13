use std::{
    fmt::{self, Debug, Display},
    marker::PhantomData,
    mem,
    ptr::null_mut,
};

use super::{
    bst_traits::{DefaultKeyComparator, KeyComparator},
    deletion::{
        plan_successor_swap, DeletionResult, DeletionResultFlags, Linkage, SwapInput, SwapPlan,
        SwapShape,
    },
    iter::{BstIterator, Iter},
    node::{leftmost, successor, Node, Side},
    tree_stats::TreeStats,
};
use crate::error::{InvariantError, Result};

/// An ordered map over an unbalanced binary search tree.
///
/// Keys are unique under the comparator `C`. The tree never rebalances on its
/// own; call [`BsTree::balance`] to rebuild it at minimal height.
pub struct BsTree<K, V, C = DefaultKeyComparator<K>> {
    root_: *mut Node<K, V>,
    size_: usize,
    key_less: C,
    _owns: PhantomData<Box<Node<K, V>>>,
}

// The tree exclusively owns every node reachable from `root_`.
unsafe impl<K: Send, V: Send, C: Send> Send for BsTree<K, V, C> {}
unsafe impl<K: Sync, V: Sync, C: Sync> Sync for BsTree<K, V, C> {}

/// Outcome of descending from the root towards a key.
enum Descent<K, V> {
    Empty,
    Found(*mut Node<K, V>),
    Vacant(*mut Node<K, V>, Side),
}

impl<K: Ord, V> BsTree<K, V> {
    /// Creates an empty tree ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(DefaultKeyComparator::new())
    }
}

impl<K, V, C> BsTree<K, V, C> {
    /// Run [`BsTree::verify`] after every mutation and panic on a violation.
    pub const SELF_VERIFY: bool = cfg!(feature = "self-verify");

    pub fn with_comparator(key_less: C) -> Self {
        Self {
            root_: null_mut(),
            size_: 0,
            key_less,
            _owns: PhantomData,
        }
    }

    pub fn key_comp(&self) -> &C {
        &self.key_less
    }
}

impl<K, V, C: Default> Default for BsTree<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

/// Key descent driven by key_less
impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    #[inline]
    fn key_less(&self, a: &K, b: &K) -> bool {
        self.key_less.less(a, b)
    }

    fn locate(&self, key: &K) -> Descent<K, V> {
        let mut curr = self.root_;
        if curr.is_null() {
            return Descent::Empty;
        }

        loop {
            let node = unsafe { &*curr };
            let side = if self.key_less(key, &node.key) {
                Side::Left
            } else if self.key_comp().greater(key, &node.key) {
                Side::Right
            } else {
                return Descent::Found(curr);
            };

            let child = node.child(side);
            if child.is_null() {
                return Descent::Vacant(curr, side);
            }
            curr = child;
        }
    }

    fn find_node(&self, key: &K) -> *mut Node<K, V> {
        match self.locate(key) {
            Descent::Found(n) => n,
            Descent::Empty | Descent::Vacant(..) => null_mut(),
        }
    }
}

/// Access Functions to the item count
impl<K, V, C> BsTree<K, V, C> {
    pub fn size(&self) -> usize {
        self.size_
    }

    pub fn len(&self) -> usize {
        self.size_
    }

    pub fn empty(&self) -> bool {
        self.root_.is_null()
    }

    pub fn is_empty(&self) -> bool {
        self.empty()
    }
}

/// Ordered traversal
impl<K, V, C> BsTree<K, V, C> {
    /// Cursor on the smallest key, or `end()` when the tree is empty.
    pub fn begin(&self) -> BstIterator<'_, K, V> {
        BstIterator::new(leftmost(self.root_))
    }

    pub fn end(&self) -> BstIterator<'_, K, V> {
        BstIterator::end()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.begin(), self.size_)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

impl<'a, K, V, C> IntoIterator for &'a BsTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Access function querying the tree by descending from the root
impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    /// Locates `key` and returns a cursor on it, or `end()` if it is absent.
    pub fn find(&self, key: &K) -> BstIterator<'_, K, V> {
        BstIterator::new(self.find_node(key))
    }

    /// Mutable lookup: the stored key and a mutable reference to its value.
    pub fn find_mut(&mut self, key: &K) -> Option<(&K, &mut V)> {
        let n = self.find_node(key);
        if n.is_null() {
            return None;
        }
        let node = unsafe { &mut *n };
        Some((&node.key, &mut node.value))
    }

    pub fn exists(&self, key: &K) -> bool {
        !self.find_node(key).is_null()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.exists(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).get()
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find_mut(key).map(|(_, v)| v)
    }
}

/// Insertion
impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    /// Inserts `key` with `value` unless an equivalent key is already present.
    ///
    /// Returns the entry for `key` and whether a new node was allocated. An
    /// existing value is left untouched and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> ((&K, &mut V), bool) {
        let (n, inserted) = self.insert_start(key, value);
        self.self_verify();
        let node = unsafe { &mut *n };
        ((&node.key, &mut node.value), inserted)
    }

    pub fn insert_pair(&mut self, pair: (K, V)) -> ((&K, &mut V), bool) {
        let (key, value) = pair;
        self.insert(key, value)
    }

    /// Builds the entry by conversion, then inserts it.
    pub fn emplace<A, B>(&mut self, key: A, value: B) -> ((&K, &mut V), bool)
    where
        A: Into<K>,
        B: Into<V>,
    {
        self.insert(key.into(), value.into())
    }

    /// The value for `key`, inserting `V::default()` first if it is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let ((_, value), _) = self.insert(key, V::default());
        value
    }

    fn insert_start(&mut self, key: K, value: V) -> (*mut Node<K, V>, bool) {
        match self.locate(&key) {
            Descent::Found(n) => {
                debug_assert!(self.key_comp().equivalent(&key, &unsafe { &*n }.key));
                log::trace!("BsTree::insert key already present at {:p}", n);
                (n, false)
            }
            Descent::Empty => {
                let new_node = Node::new(key, value, null_mut());
                self.root_ = new_node;
                self.size_ += 1;
                log::trace!("BsTree::insert new root {:p}", new_node);
                (new_node, true)
            }
            Descent::Vacant(parent, side) => {
                let new_node = Node::new(key, value, parent);
                *unsafe { &mut *parent }.child_mut(side) = new_node;
                self.size_ += 1;
                log::trace!(
                    "BsTree::insert {:p} as {:?} child of {:p}",
                    new_node,
                    side,
                    parent
                );
                (new_node, true)
            }
        }
    }

    /// Links a detached node back in by the ordinary descent.
    fn attach_node(&mut self, node: *mut Node<K, V>) {
        match self.locate(&unsafe { &*node }.key) {
            Descent::Empty => self.root_ = node,
            Descent::Vacant(parent, side) => {
                unsafe { &mut *node }.parent = parent;
                *unsafe { &mut *parent }.child_mut(side) = node;
            }
            Descent::Found(_) => {
                debug_assert!(false, "reattached a key that is already linked");
                // the comparator no longer orders the keys apart; keep the
                // first one linked and free this node
                log::warn!("BsTree::balance dropped a node its comparator cannot place");
                drop(unsafe { Node::into_pair(node) });
                return;
            }
        }
        self.size_ += 1;
    }
}

/// Erase
impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    /// Removes `key`. Returns `false`, leaving the tree untouched, if it is
    /// absent.
    pub fn erase(&mut self, key: &K) -> bool {
        self.erase_one(key).0.found()
    }

    /// Removes `key` and hands back the stored pair.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.erase_one(key).1
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub(crate) fn erase_one(&mut self, key: &K) -> (DeletionResult, Option<(K, V)>) {
        log::debug!("BsTree::erase_one on tree size {}", self.size());
        let target = self.find_node(key);
        if target.is_null() {
            log::debug!("Could not find key to erase.");
            return (DeletionResult::new(DeletionResultFlags::NotFound), None);
        }

        let old_root = self.root_;
        let mut result = DeletionResult::new(DeletionResultFlags::Ok);

        if unsafe { &*target }.child_count() == 2 {
            let succ = leftmost(unsafe { &*target }.right);
            let shape = self.swap_with_successor(target, succ);
            result |= DeletionResultFlags::Swapped;
            if shape == SwapShape::Adjacent {
                result |= DeletionResultFlags::Adjacent;
            }
        }

        // the target now has at most one child
        if unsafe { &*target }.is_leaf() {
            self.delete_leaf(target);
            result |= DeletionResultFlags::Leaf;
        } else {
            self.delete_node_with_one_child(target);
            result |= DeletionResultFlags::OneChild;
        }

        if self.root_ != old_root {
            result |= DeletionResultFlags::RootChanged;
        }

        log::debug!(
            "Erased node {:p} (flags {:#04x}), tree size now {}",
            target,
            result.flags.bits(),
            self.size()
        );

        let pair = unsafe { Node::into_pair(target) };
        self.self_verify();
        (result, Some(pair))
    }

    /// Points the slot that held a node (a parent's child or the root) at
    /// `replacement`.
    fn replace_child(
        &mut self,
        slot: Option<(*mut Node<K, V>, Side)>,
        replacement: *mut Node<K, V>,
    ) {
        match slot {
            None => self.root_ = replacement,
            Some((parent, side)) => *unsafe { &mut *parent }.child_mut(side) = replacement,
        }
    }

    fn parent_slot(node: *mut Node<K, V>) -> Option<(*mut Node<K, V>, Side)> {
        let n = unsafe { &*node };
        n.side_in_parent().map(|side| (n.parent, side))
    }

    fn delete_leaf(&mut self, leaf: *mut Node<K, V>) {
        debug_assert!(unsafe { &*leaf }.is_leaf());
        let slot = Self::parent_slot(leaf);
        self.replace_child(slot, null_mut());
        unsafe { &mut *leaf }.parent = null_mut();
        self.size_ -= 1;
    }

    fn delete_node_with_one_child(&mut self, node: *mut Node<K, V>) {
        let slot = Self::parent_slot(node);
        let n = unsafe { &mut *node };
        debug_assert_eq!(n.child_count(), 1);

        let child = n.only_child();
        unsafe { &mut *child }.parent = n.parent;
        self.replace_child(slot, child);

        n.parent = null_mut();
        n.left = null_mut();
        n.right = null_mut();
        self.size_ -= 1;
    }

    /// Exchanges the tree positions of a two-children node and its in-order
    /// successor. Payloads stay in their nodes.
    fn swap_with_successor(
        &mut self,
        target: *mut Node<K, V>,
        succ: *mut Node<K, V>,
    ) -> SwapShape {
        let t = unsafe { &*target };
        let s = unsafe { &*succ };
        debug_assert_eq!(t.child_count(), 2);
        debug_assert!(s.left.is_null());
        debug_assert!(self.key_less(&t.key, &s.key));

        let plan = plan_successor_swap(SwapInput {
            target,
            target_parent: Self::parent_slot(target),
            target_left: t.left,
            target_right: t.right,
            successor: succ,
            successor_parent: s.parent,
            successor_right: (!s.right.is_null()).then_some(s.right),
        });

        log::trace!(
            "BsTree::swap_with_successor {:p} <-> {:p} ({:?})",
            target,
            succ,
            plan.shape
        );
        self.apply_swap(target, succ, &plan);
        plan.shape
    }

    fn apply_swap(
        &mut self,
        target: *mut Node<K, V>,
        succ: *mut Node<K, V>,
        plan: &SwapPlan<*mut Node<K, V>>,
    ) {
        fn set_links<K, V>(node: *mut Node<K, V>, links: &Linkage<*mut Node<K, V>>) {
            let n = unsafe { &mut *node };
            n.parent = links.parent.unwrap_or(null_mut());
            n.left = links.left.unwrap_or(null_mut());
            n.right = links.right.unwrap_or(null_mut());
        }

        set_links(target, &plan.target);
        set_links(succ, &plan.successor);

        for &(child, parent) in plan.reparent.iter().flatten() {
            unsafe { &mut *child }.parent = parent;
        }

        if let Some(lower) = plan.lower_slot {
            debug_assert!(unsafe { &*lower }.left == succ);
            unsafe { &mut *lower }.left = target;
        }

        self.replace_child(plan.upper_slot, succ);
    }
}

/// Balancing
impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    /// Rebuilds the tree at minimal height, `ceil(log2(n + 1))`.
    ///
    /// Nodes are collected in order, detached, and reinserted median first.
    /// Every cursor into the tree is invalidated.
    pub fn balance(&mut self) {
        let height_before = self.height();

        let mut nodes = Vec::with_capacity(self.size_);
        let mut n = leftmost(self.root_);
        while !n.is_null() {
            nodes.push(n);
            n = successor(n);
        }
        debug_assert_eq!(nodes.len(), self.size_);

        for &n in &nodes {
            let node = unsafe { &mut *n };
            node.parent = null_mut();
            node.left = null_mut();
            node.right = null_mut();
        }
        self.root_ = null_mut();
        self.size_ = 0;

        if !nodes.is_empty() {
            self.insert_medians(&nodes, 0, nodes.len() - 1);
        }

        log::debug!(
            "BsTree::balance {} nodes, height {} -> {}",
            self.size_,
            height_before,
            self.height()
        );
        self.self_verify();
    }

    /// Inserts the median of `nodes[start..=end]`, then both halves.
    fn insert_medians(&mut self, nodes: &[*mut Node<K, V>], start: usize, end: usize) {
        let mid = start + (end - start) / 2;
        self.attach_node(nodes[mid]);

        if mid > start {
            self.insert_medians(nodes, start, mid - 1);
        }
        if mid < end {
            self.insert_medians(nodes, mid + 1, end);
        }
    }
}

/// node object deallocation
impl<K, V, C> BsTree<K, V, C> {
    /// Removes every entry.
    pub fn clear(&mut self) {
        let root = mem::replace(&mut self.root_, null_mut());
        let size = mem::replace(&mut self.size_, 0);
        if !root.is_null() {
            log::debug!("BsTree::clear releasing {} nodes", size);
        }
        Self::free_subtree(root);
    }

    /// Frees a detached subtree with an explicit stack, so a degenerate
    /// chain cannot overflow the call stack.
    fn free_subtree(root: *mut Node<K, V>) {
        let mut stack = Vec::new();
        if !root.is_null() {
            stack.push(root);
        }

        while let Some(n) = stack.pop() {
            let node = unsafe { Box::from_raw(n) };
            if !node.left.is_null() {
                stack.push(node.left);
            }
            if !node.right.is_null() {
                stack.push(node.right);
            }
        }
    }
}

impl<K, V, C> Drop for BsTree<K, V, C> {
    fn drop(&mut self) {
        self.clear();
        debug_assert!(self.size_ == 0);
    }
}

/// Deep copy: every node is duplicated and parent links point into the copy.
impl<K: Clone, V: Clone, C: Clone> Clone for BsTree<K, V, C> {
    fn clone(&self) -> Self {
        let mut tree = Self::with_comparator(self.key_comp().clone());
        if self.root_.is_null() {
            return tree;
        }

        let src = unsafe { &*self.root_ };
        tree.root_ = Node::new(src.key.clone(), src.value.clone(), null_mut());

        // the copy owns every node linked so far, so a panicking clone() of a
        // key or value frees the partial tree
        let mut stack = vec![(self.root_, tree.root_)];
        while let Some((src, dst)) = stack.pop() {
            let s = unsafe { &*src };
            for side in [Side::Left, Side::Right] {
                let child = s.child(side);
                if child.is_null() {
                    continue;
                }
                let c = unsafe { &*child };
                let copy = Node::new(c.key.clone(), c.value.clone(), dst);
                *unsafe { &mut *dst }.child_mut(side) = copy;
                stack.push((child, copy));
            }
        }

        tree.size_ = self.size_;
        tree
    }
}

/// Statistics and verification
impl<K, V, C> BsTree<K, V, C> {
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::new();
        let mut stack = Vec::new();
        if !self.root_.is_null() {
            stack.push((self.root_, 1));
        }

        while let Some((n, depth)) = stack.pop() {
            let node = unsafe { &*n };
            stats.size += 1;
            stats.height = stats.height.max(depth);
            if node.is_leaf() {
                stats.leaves += 1;
            } else {
                stats.inner_nodes += 1;
            }
            if !node.left.is_null() {
                stack.push((node.left, depth + 1));
            }
            if !node.right.is_null() {
                stack.push((node.right, depth + 1));
            }
        }

        stats
    }

    /// Nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        self.stats().height
    }
}

impl<K, V, C: KeyComparator<K>> BsTree<K, V, C> {
    /// Checks the order invariant, the parent links and the recorded size.
    ///
    /// The walk follows child links only, so it does not trust the parent
    /// links it is checking.
    pub fn verify(&self) -> Result<()> {
        if !self.root_.is_null() && !unsafe { &*self.root_ }.parent.is_null() {
            return Err(InvariantError::RootHasParent);
        }

        let mut stack: Vec<(*mut Node<K, V>, usize)> = Vec::new();
        let mut curr = self.root_;
        let mut depth = 1;
        let mut prev: Option<&K> = None;
        let mut position = 0;

        loop {
            while !curr.is_null() {
                let node = unsafe { &*curr };
                for child in [node.left, node.right] {
                    if !child.is_null() && unsafe { &*child }.parent != curr {
                        return Err(InvariantError::ParentLinkMismatch { depth: depth + 1 });
                    }
                }
                stack.push((curr, depth));
                curr = node.left;
                depth += 1;
            }

            let Some((n, d)) = stack.pop() else {
                break;
            };
            let node = unsafe { &*n };
            if let Some(prev) = prev {
                if self.key_comp().less_equal(&node.key, prev) {
                    return Err(InvariantError::OrderViolation { position });
                }
            }
            prev = Some(&node.key);
            position += 1;
            curr = node.right;
            depth = d + 1;
        }

        if position != self.size_ {
            return Err(InvariantError::SizeMismatch {
                recorded: self.size_,
                counted: position,
            });
        }
        Ok(())
    }

    #[inline]
    fn self_verify(&self) {
        if Self::SELF_VERIFY {
            if let Err(e) = self.verify() {
                panic!("BsTree self-verification failed: {}", e);
            }
        }
    }
}

/// Display
impl<K: Display, V, C> Display for BsTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.root_.is_null() {
            return write!(f, "BST is empty => size: [{}] ", self.size_);
        }

        write!(f, "size: [{}] ", self.size_)?;
        for (key, _) in self.iter() {
            write!(f, "{} ", key)?;
        }
        Ok(())
    }
}

/// Debug
impl<K: Debug, V: Debug, C> Debug for BsTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BsTree size {}", self.size_)?;

        // pre-order, left subtree first
        let mut stack = Vec::new();
        if !self.root_.is_null() {
            stack.push((self.root_, 0usize));
        }
        while let Some((n, depth)) = stack.pop() {
            let node = unsafe { &*n };
            for _ in 0..depth {
                write!(f, "  ")?;
            }
            writeln!(f, "node {:p} {:?} => {:?}", n, node.key, node.value)?;

            if !node.right.is_null() {
                stack.push((node.right, depth + 1));
            }
            if !node.left.is_null() {
                stack.push((node.left, depth + 1));
            }
        }

        Ok(())
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for BsTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.size_ == other.size_ && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for BsTree<K, V, C> {}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::bst_base::iter::TreeIterator;

    fn tree_of(keys: &[u32]) -> BsTree<u32, u32> {
        let mut tree = BsTree::new();
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    fn keys(tree: &BsTree<u32, u32>) -> Vec<u32> {
        tree.keys().copied().collect()
    }

    fn root_key(tree: &BsTree<u32, u32>) -> u32 {
        unsafe { &*tree.root_ }.key
    }

    #[test]
    fn test_erase_leaf_flags() {
        let mut tree = tree_of(&[8, 3, 10]);
        let (result, pair) = tree.erase_one(&3);
        assert_eq!(pair, Some((3, 30)));
        assert!(result.has(DeletionResultFlags::Leaf));
        assert!(!result.has(DeletionResultFlags::Swapped));
        assert!(!result.has(DeletionResultFlags::RootChanged));
        assert_eq!(keys(&tree), [8, 10]);
        tree.verify().unwrap();
    }

    #[test]
    fn test_erase_missing_key_flags() {
        let mut tree = tree_of(&[8, 3, 10]);
        let (result, pair) = tree.erase_one(&4);
        assert!(result.has(DeletionResultFlags::NotFound));
        assert!(pair.is_none());
        assert_eq!(tree.size(), 3);
    }

    #[test]
    fn test_erase_adjacent_successor_flags() {
        //     8
        //   3   10
        //         14
        let mut tree = tree_of(&[8, 3, 10, 14]);
        let (result, _) = tree.erase_one(&8);
        assert!(result.has(DeletionResultFlags::Swapped));
        assert!(result.has(DeletionResultFlags::Adjacent));
        assert!(result.has(DeletionResultFlags::OneChild));
        assert!(result.has(DeletionResultFlags::RootChanged));
        assert_eq!(root_key(&tree), 10);
        assert_eq!(keys(&tree), [3, 10, 14]);
        tree.verify().unwrap();
    }

    #[test]
    fn test_erase_distant_successor_flags() {
        //       8
        //     3    12
        //        10   14
        //          11
        let mut tree = tree_of(&[8, 3, 12, 10, 14, 11]);
        let (result, _) = tree.erase_one(&8);
        assert!(result.has(DeletionResultFlags::Swapped));
        assert!(!result.has(DeletionResultFlags::Adjacent));
        assert!(result.has(DeletionResultFlags::OneChild));
        assert_eq!(root_key(&tree), 10);
        assert_eq!(keys(&tree), [3, 10, 11, 12, 14]);
        tree.verify().unwrap();

        // 11 took 10's old slot under 12
        let twelve = tree.find_node(&12);
        let eleven = tree.find_node(&11);
        assert_eq!(unsafe { &*twelve }.left, eleven);
        assert_eq!(unsafe { &*eleven }.parent, twelve);
    }

    #[test]
    fn test_erase_distant_leaf_successor() {
        let mut tree = tree_of(&[20, 10, 30, 25, 35, 5]);
        let (result, _) = tree.erase_one(&20);
        assert!(result.has(DeletionResultFlags::Swapped));
        assert!(!result.has(DeletionResultFlags::Adjacent));
        assert!(result.has(DeletionResultFlags::Leaf));
        assert_eq!(root_key(&tree), 25);
        tree.verify().unwrap();
    }

    #[test]
    fn test_verify_detects_corruption() {
        let mut tree = tree_of(&[8, 3, 10]);
        let three = tree.find_node(&3);
        unsafe { &mut *three }.parent = null_mut();
        assert_eq!(
            tree.verify(),
            Err(InvariantError::ParentLinkMismatch { depth: 2 })
        );
        unsafe { &mut *three }.parent = tree.root_;

        tree.size_ = 4;
        assert_eq!(
            tree.verify(),
            Err(InvariantError::SizeMismatch {
                recorded: 4,
                counted: 3
            })
        );
        tree.size_ = 3;

        unsafe { &mut *tree.root_ }.key = 1;
        assert_eq!(tree.verify(), Err(InvariantError::OrderViolation { position: 1 }));
        unsafe { &mut *tree.root_ }.key = 8;
        tree.verify().unwrap();
    }

    #[test]
    fn test_balance_reuses_nodes() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        let four = tree.find_node(&4);
        assert_eq!(tree.height(), 7);
        tree.balance();
        assert_eq!(tree.root_, four);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.stats().leaves, 4);
        tree.verify().unwrap();
    }

    #[test]
    fn test_cursor_walk() {
        let tree = tree_of(&[2, 1, 3]);
        let mut it = tree.begin();
        let mut seen = vec![];
        while it != tree.end() {
            seen.push(*it.key());
            it.forward();
        }
        assert_eq!(seen, [1, 2, 3]);
        assert!(it.is_end());
    }

    #[test]
    fn test_self_verify_follows_feature() {
        assert_eq!(BsTree::<u32, u32>::SELF_VERIFY, cfg!(feature = "self-verify"));
    }

    #[cfg(feature = "self-verify")]
    #[test]
    #[should_panic(expected = "BsTree self-verification failed")]
    fn test_self_verify_panics_on_corruption() {
        let mut tree = tree_of(&[8, 3, 10]);
        tree.size_ = 7;
        tree.insert(1, 10);
    }

    /// Orders `u32` normally until the shared flag is raised, then treats
    /// every pair of keys as equivalent.
    #[derive(Clone)]
    struct Collapsing(Rc<Cell<bool>>);

    impl KeyComparator<u32> for Collapsing {
        fn less(&self, lhs: &u32, rhs: &u32) -> bool {
            !self.0.get() && lhs < rhs
        }
    }

    #[test]
    #[cfg_attr(
        debug_assertions,
        should_panic(expected = "reattached a key that is already linked")
    )]
    fn test_balance_with_collapsed_comparator() {
        let collapsed = Rc::new(Cell::new(false));
        let mut tree = BsTree::with_comparator(Collapsing(collapsed.clone()));
        for k in [2u32, 1, 3] {
            tree.insert(k, k);
        }

        collapsed.set(true);
        tree.balance();
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.iter().count(), 1);

        collapsed.set(false);
        tree.verify().unwrap();
    }

    #[test]
    fn test_clone_rebuilds_parent_links() {
        let tree = tree_of(&[8, 3, 10, 1, 6]);
        let copy = tree.clone();
        copy.verify().unwrap();
        assert_ne!(copy.root_, tree.root_);
        assert_eq!(copy.stats(), tree.stats());
    }
}
