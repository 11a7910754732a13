use std::fmt::Debug;
use std::marker::PhantomData;

// Traits bound
pub trait KeyComparator<T> {
    /// Strict weak order: `true` iff `lhs` orders strictly before `rhs`.
    fn less(&self, lhs: &T, rhs: &T) -> bool;

    fn less_equal(&self, lhs: &T, rhs: &T) -> bool {
        !self.less(rhs, lhs)
    }

    fn greater(&self, lhs: &T, rhs: &T) -> bool {
        self.less(rhs, lhs)
    }

    /// Neither key orders before the other.
    fn equivalent(&self, lhs: &T, rhs: &T) -> bool {
        !self.less(lhs, rhs) && !self.less(rhs, lhs)
    }
}

/// Orders keys by their `Ord` implementation.
pub struct DefaultKeyComparator<T> {
    _t: PhantomData<fn(&T)>,
}

impl<T> DefaultKeyComparator<T> {
    pub fn new() -> Self {
        Self { _t: PhantomData }
    }
}

// manual impls: derives would demand the same traits of `T`
impl<T> Clone for DefaultKeyComparator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DefaultKeyComparator<T> {}

impl<T> Default for DefaultKeyComparator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for DefaultKeyComparator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DefaultKeyComparator")
    }
}

impl<T: Ord> KeyComparator<T> for DefaultKeyComparator<T> {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }
}

/// Reverses another comparator.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReverseKeyComparator<C>(pub C);

impl<T, C: KeyComparator<T>> KeyComparator<T> for ReverseKeyComparator<C> {
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        self.0.less(rhs, lhs)
    }
}

/// Adapts a `less`-style closure into a [`KeyComparator`].
///
/// ```
/// use bst_map::{from_fn, BsTree};
///
/// let mut tree = BsTree::with_comparator(from_fn(|a: &i32, b: &i32| a.abs() < b.abs()));
/// tree.insert(-3, ());
/// tree.insert(2, ());
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [2, -3]);
/// ```
#[derive(Clone, Copy)]
pub struct FnComparator<F>(F);

impl<F> Debug for FnComparator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnComparator")
    }
}

impl<T, F> KeyComparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        (self.0)(lhs, rhs)
    }
}

pub fn from_fn<T, F>(less: F) -> FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    FnComparator(less)
}
