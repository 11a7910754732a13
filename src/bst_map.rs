use std::{
    fmt::{self, Debug, Display},
    ops::Index,
};

use crate::bst_base::{
    bst_traits::{DefaultKeyComparator, KeyComparator},
    iter::Iter,
    tree::BsTree,
};

/// Map facade over [`BsTree`] with `std`-style method names.
///
/// Unlike [`BsTree::insert`], [`BstMap::put`] overwrites an existing value.
pub struct BstMap<K, V, C = DefaultKeyComparator<K>> {
    _tree: BsTree<K, V, C>,
}

impl<K: Ord, V> BstMap<K, V> {
    pub fn new() -> Self {
        Self {
            _tree: BsTree::new(),
        }
    }
}

impl<K, V, C> BstMap<K, V, C> {
    pub fn with_comparator(key_less: C) -> Self {
        Self {
            _tree: BsTree::with_comparator(key_less),
        }
    }

    pub fn is_empty(&self) -> bool {
        self._tree.empty()
    }

    pub fn len(&self) -> usize {
        self._tree.size()
    }

    pub fn clear(&mut self) {
        self._tree.clear()
    }

    pub fn height(&self) -> usize {
        self._tree.height()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self._tree.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self._tree.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self._tree.values()
    }

    /// The underlying tree, for cursor-level access.
    pub fn as_tree(&self) -> &BsTree<K, V, C> {
        &self._tree
    }

    pub fn into_tree(self) -> BsTree<K, V, C> {
        self._tree
    }
}

impl<K, V, C: KeyComparator<K>> BstMap<K, V, C> {
    pub fn contains_key(&self, key: &K) -> bool {
        self._tree.exists(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self._tree.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self._tree.get_mut(key)
    }

    /// Inserts or overwrites, returning the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self._tree.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self._tree.insert(key, value);
        None
    }

    /// Inserts only if `key` is absent. Returns whether it was inserted.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        self._tree.insert(key, value).1
    }

    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self._tree.get_or_insert_default(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self._tree.remove(key)
    }

    pub fn balance(&mut self) {
        self._tree.balance()
    }
}

impl<K: Ord, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for BstMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            _tree: self._tree.clone(),
        }
    }
}

impl<K, V, C> From<BsTree<K, V, C>> for BstMap<K, V, C> {
    fn from(tree: BsTree<K, V, C>) -> Self {
        Self { _tree: tree }
    }
}

/// Later pairs overwrite earlier ones with an equivalent key.
impl<K, V, C: KeyComparator<K>> Extend<(K, V)> for BstMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> IntoIterator for &'a BstMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C: KeyComparator<K>> Index<&K> for BstMap<K, V, C> {
    type Output = V;

    /// # Panics
    /// If `key` is not in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found in BstMap")
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for BstMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self._tree == other._tree
    }
}

impl<K: Eq, V: Eq, C> Eq for BstMap<K, V, C> {}

impl<K: Display, V, C> Display for BstMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self._tree, f)
    }
}

impl<K: Debug, V: Debug, C> Debug for BstMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites() {
        let mut map = BstMap::new();
        assert_eq!(map.put(1, "a"), None);
        assert_eq!(map.put(1, "b"), Some("a"));
        assert_eq!(map[&1], "b");
        assert!(!map.try_insert(1, "c"));
        assert_eq!(map.get(&1), Some(&"b"));
    }

    #[test]
    fn test_debug_is_a_map() {
        let map: BstMap<_, _> = [(2, 'b'), (1, 'a')].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: 'a', 2: 'b'}");
    }
}
