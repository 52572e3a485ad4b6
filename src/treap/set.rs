use crate::arena::Handle;
use crate::comparator::{Comparator, NaturalOrder};
use crate::error::{Error, Result};
use crate::treap::tree::Tree;
use rand::{Rng, XorShiftRng};
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented by a treap.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap property. Each
/// node has a key and a priority. The key of any node is greater than all keys in its left
/// subtree and less than all keys occuring in its right subtree. The priority of a node is less
/// than or equal to the priorities of its children. By drawing a fresh random priority for every
/// inserted key, the expected height of the tree is proportional to the logarithm of the number
/// of keys.
///
/// Keys are arranged by a `Comparator` fixed at construction, `NaturalOrder` by default, and
/// priorities are drawn from a generator owned by the set.
///
/// # Examples
///
/// ```
/// use treap_set::TreapSet;
///
/// let mut set = TreapSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.first(), Ok(&0));
/// assert_eq!(set.ceiling(&2), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct TreapSet<T, C = NaturalOrder, R = XorShiftRng> {
    tree: Tree<T>,
    comparator: C,
    rng: R,
}

impl<T> TreapSet<T>
where
    T: Ord,
{
    /// Constructs a new, empty `TreapSet<T>` ordered by `T: Ord`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let set: TreapSet<u32> = TreapSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs a new, empty `TreapSet<T>` with room for `capacity` keys before the node
    /// storage reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::with_capacity(16);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        TreapSet {
            tree: Tree::with_capacity(capacity),
            comparator: NaturalOrder,
            rng: rand::weak_rng(),
        }
    }
}

impl<T, C> TreapSet<T, C>
where
    C: Comparator<T>,
{
    /// Constructs a new, empty `TreapSet<T, C>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.first(), Ok(&2));
    /// ```
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_comparator_and_rng(comparator, rand::weak_rng())
    }
}

impl<T, R> TreapSet<T, NaturalOrder, R>
where
    T: Ord,
    R: Rng,
{
    /// Constructs a new, empty `TreapSet<T>` ordered by `T: Ord` that draws priorities from `rng`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::{SeedableRng, XorShiftRng};
    /// use treap_set::TreapSet;
    ///
    /// let rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    /// let mut set = TreapSet::with_rng(rng);
    /// set.insert(1);
    /// ```
    pub fn with_rng(rng: R) -> Self {
        Self::with_comparator_and_rng(NaturalOrder, rng)
    }
}

impl<T, C, R> TreapSet<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    /// Constructs a new, empty `TreapSet<T, C, R>` ordered by `comparator` that draws priorities
    /// from `rng`.
    pub fn with_comparator_and_rng(comparator: C, rng: R) -> Self {
        TreapSet {
            tree: Tree::new(),
            comparator,
            rng,
        }
    }

    /// Inserts a key into the set. Returns `false` and leaves the set untouched if an equal key
    /// already exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        let TreapSet {
            ref mut tree,
            ref comparator,
            ref mut rng,
        } = self;
        tree.insert(key, comparator, || rng.next_u32())
    }

    /// Removes a key from the set. Returns `true` if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        self.take(key).is_some()
    }

    /// Removes a key from the set and returns the stored key. Returns `None` if the key was not
    /// present.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.take(&1), Some(1));
    /// assert_eq!(set.take(&1), None);
    /// ```
    pub fn take(&mut self, key: &T) -> Option<T> {
        self.tree.remove(key, &self.comparator)
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        self.tree.search(key, &self.comparator).is_some()
    }

    /// Returns the greatest key in the set that is strictly less than `key`. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.lower(&1), None);
    /// assert_eq!(set.lower(&2), Some(&1));
    /// ```
    pub fn lower(&self, key: &T) -> Option<&T> {
        self.key(self.tree.predecessor(key, &self.comparator, false))
    }

    /// Returns the least key in the set that is strictly greater than `key`. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.higher(&0), Some(&1));
    /// assert_eq!(set.higher(&1), None);
    /// ```
    pub fn higher(&self, key: &T) -> Option<&T> {
        self.key(self.tree.successor(key, &self.comparator, false))
    }

    /// Returns the greatest key in the set that is less than or equal to `key`. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.key(self.tree.predecessor(key, &self.comparator, true))
    }

    /// Returns the least key in the set that is greater than or equal to `key`. Returns `None` if
    /// such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceiling(&0), Some(&1));
    /// assert_eq!(set.ceiling(&2), None);
    /// ```
    #[doc(alias = "ceil")]
    pub fn ceiling(&self, key: &T) -> Option<&T> {
        self.key(self.tree.successor(key, &self.comparator, true))
    }

    /// Removes and returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(3);
    /// set.insert(1);
    /// assert_eq!(set.poll_first(), Some(1));
    /// assert_eq!(set.poll_first(), Some(3));
    /// assert_eq!(set.poll_first(), None);
    /// ```
    pub fn poll_first(&mut self) -> Option<T> {
        let handle = self.tree.first()?;
        Some(self.tree.remove_node(handle))
    }

    /// Removes and returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(3);
    /// set.insert(1);
    /// assert_eq!(set.poll_last(), Some(3));
    /// assert_eq!(set.poll_last(), Some(1));
    /// assert_eq!(set.poll_last(), None);
    /// ```
    pub fn poll_last(&mut self) -> Option<T> {
        let handle = self.tree.last()?;
        Some(self.tree.remove_node(handle))
    }

    /// Returns an iterator over the set. The iterator yields keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> TreapSetIter<'_, T, C> {
        TreapSetIter {
            tree: &self.tree,
            comparator: &self.comparator,
            next: self.tree.first(),
            remaining: self.tree.len(),
        }
    }
}

impl<T, C, R> TreapSet<T, C, R> {
    fn key(&self, handle: Option<Handle>) -> Option<&T> {
        handle.map(|handle| self.tree.key(handle))
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// assert!(set.is_empty());
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSuchElement` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::{Error, TreapSet};
    ///
    /// let mut set = TreapSet::new();
    /// assert_eq!(set.first(), Err(Error::NoSuchElement { operation: "first" }));
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.first(), Ok(&1));
    /// ```
    pub fn first(&self) -> Result<&T> {
        self.key(self.tree.first())
            .ok_or(Error::NoSuchElement { operation: "first" })
    }

    /// Returns the maximum key of the set.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSuchElement` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::{Error, TreapSet};
    ///
    /// let mut set = TreapSet::new();
    /// assert_eq!(set.last(), Err(Error::NoSuchElement { operation: "last" }));
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.last(), Ok(&3));
    /// ```
    pub fn last(&self) -> Result<&T> {
        self.key(self.tree.last())
            .ok_or(Error::NoSuchElement { operation: "last" })
    }

    /// Returns the comparator that orders the set.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the number of nodes on the longest path from the root to a leaf. Returns `0` if the
    /// set is empty.
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    /// Returns the mean weight balance of the nodes in the tree, or `None` if the set is empty.
    ///
    /// The weight balance of a node whose subtrees hold `l` and `r` keys is
    /// `2 * (1 + min(l, r)) / (2 + l + r)`. It is `1.0` for a node with two subtrees of the same
    /// size and approaches `0.0` as one subtree becomes empty while the other grows. Random
    /// priorities keep the mean bounded away from zero.
    pub fn mean_weight_balance(&self) -> Option<f64> {
        self.tree.mean_weight_balance()
    }
}

impl<T> Default for TreapSet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, R> Clone for TreapSet<T, C, R>
where
    T: Clone,
    C: Clone,
    R: Clone,
{
    fn clone(&self) -> Self {
        TreapSet {
            tree: self.tree.clone(),
            comparator: self.comparator.clone(),
            rng: self.rng.clone(),
        }
    }
}

impl<T, C, R> fmt::Debug for TreapSet<T, C, R>
where
    T: fmt::Debug,
    C: Comparator<T>,
    R: Rng,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C, R> Extend<T> for TreapSet<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> FromIterator<T> for TreapSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = TreapSet::new();
        set.extend(iter);
        set
    }
}

impl<T, C, R> IntoIterator for TreapSet<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    type Item = T;
    type IntoIter = TreapSetIntoIter<T, C, R>;

    fn into_iter(self) -> Self::IntoIter {
        TreapSetIntoIter { set: self }
    }
}

impl<'a, T, C, R> IntoIterator for &'a TreapSet<T, C, R>
where
    T: 'a,
    C: Comparator<T>,
    R: Rng,
{
    type Item = &'a T;
    type IntoIter = TreapSetIter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `TreapSet<T, C, R>`.
///
/// This iterator yields the keys of the set in ascending order, removing each one from the tree
/// as it goes.
pub struct TreapSetIntoIter<T, C = NaturalOrder, R = XorShiftRng> {
    set: TreapSet<T, C, R>,
}

impl<T, C, R> Iterator for TreapSetIntoIter<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.set.poll_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.set.len(), Some(self.set.len()))
    }
}

impl<T, C, R> ExactSizeIterator for TreapSetIntoIter<T, C, R>
where
    C: Comparator<T>,
    R: Rng,
{
}

/// An iterator for `TreapSet<T, C, R>`.
///
/// Each step looks up the successor of the last yielded key from the root, so a full traversal
/// takes `O(n log n)` expected time. The set cannot be mutated while the iterator is alive.
pub struct TreapSetIter<'a, T, C = NaturalOrder> {
    tree: &'a Tree<T>,
    comparator: &'a C,
    next: Option<Handle>,
    remaining: usize,
}

impl<'a, T, C> TreapSetIter<'a, T, C> {
    /// Removal through an iterator is not supported. Use `TreapSet::remove` once the iterator is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Always returns `Error::UnsupportedOperation`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treap_set::TreapSet;
    ///
    /// let mut set = TreapSet::new();
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// iterator.next();
    /// assert!(iterator.remove().is_err());
    /// ```
    pub fn remove(&mut self) -> Result<T> {
        Err(Error::UnsupportedOperation {
            operation: "removal through an iterator",
        })
    }
}

impl<'a, T, C> Iterator for TreapSetIter<'a, T, C>
where
    C: Comparator<T>,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        let tree = self.tree;
        let key = tree.key(handle);
        self.next = tree.successor(key, self.comparator, false);
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, C> ExactSizeIterator for TreapSetIter<'a, T, C> where C: Comparator<T> {}

#[cfg(test)]
mod tests {
    use super::TreapSet;
    use crate::error::Error;
    use rand::{SeedableRng, XorShiftRng};

    fn seeded() -> TreapSet<u32> {
        let rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
        TreapSet::with_rng(rng)
    }

    fn scenario() -> TreapSet<u32> {
        let mut set = seeded();
        for key in &[5, 3, 8, 1, 4] {
            assert!(set.insert(*key));
            set.tree.assert_invariants(&set.comparator);
        }
        set
    }

    #[test]
    fn test_len_empty() {
        let set: TreapSet<u32> = TreapSet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert() {
        let mut set = seeded();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_duplicate() {
        let mut set = scenario();
        assert!(!set.insert(4));
        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &4, &5, &8]);
        set.tree.assert_invariants(&set.comparator);
    }

    #[test]
    fn test_remove() {
        let mut set = scenario();
        assert!(set.remove(&3));
        assert!(!set.contains(&3));
        assert_eq!(set.len(), 4);
        set.tree.assert_invariants(&set.comparator);
    }

    #[test]
    fn test_iter_in_order() {
        let set = scenario();
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &4, &5, &8]);
        assert_eq!(set.iter().len(), 5);
    }

    #[test]
    fn test_neighbours() {
        let set = scenario();
        assert_eq!(set.floor(&6), Some(&5));
        assert_eq!(set.ceiling(&6), Some(&8));
        assert_eq!(set.lower(&5), Some(&4));
        assert_eq!(set.higher(&5), Some(&8));

        assert_eq!(set.floor(&5), Some(&5));
        assert_eq!(set.ceiling(&5), Some(&5));
        assert_eq!(set.floor(&0), None);
        assert_eq!(set.ceiling(&9), None);
        assert_eq!(set.lower(&1), None);
        assert_eq!(set.higher(&8), None);
    }

    #[test]
    fn test_poll_first_then_last() {
        let mut set = scenario();
        assert_eq!(set.poll_first(), Some(1));
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &4, &5, &8]);
        set.tree.assert_invariants(&set.comparator);

        assert_eq!(set.poll_last(), Some(8));
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&3, &4, &5]);
        set.tree.assert_invariants(&set.comparator);
    }

    #[test]
    fn test_remove_missing() {
        let mut set = scenario();
        assert!(!set.remove(&10));
        assert_eq!(set.len(), 5);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &4, &5, &8]);
    }

    #[test]
    fn test_empty_queries() {
        let mut set = seeded();
        assert_eq!(set.first(), Err(Error::NoSuchElement { operation: "first" }));
        assert_eq!(set.last(), Err(Error::NoSuchElement { operation: "last" }));
        assert_eq!(set.lower(&1), None);
        assert_eq!(set.higher(&1), None);
        assert_eq!(set.floor(&1), None);
        assert_eq!(set.ceiling(&1), None);
        assert_eq!(set.poll_first(), None);
        assert_eq!(set.poll_last(), None);
        assert_eq!(set.iter().next(), None);
        assert_eq!(set.depth(), 0);
        assert_eq!(set.mean_weight_balance(), None);
    }

    #[test]
    fn test_first_last() {
        let set = scenario();
        assert_eq!(set.first(), Ok(&1));
        assert_eq!(set.last(), Ok(&8));
    }

    #[test]
    fn test_clear() {
        let mut set = scenario();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&1));
        assert!(set.insert(1));
        assert_eq!(set.len(), 1);
        set.tree.assert_invariants(&set.comparator);
    }

    #[test]
    fn test_iter_remove_unsupported() {
        let set = scenario();
        let mut iter = set.iter();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(
            iter.remove(),
            Err(Error::UnsupportedOperation {
                operation: "removal through an iterator"
            }),
        );
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_into_iter() {
        let set = scenario();
        let iter = set.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.collect::<Vec<u32>>(), vec![1, 3, 4, 5, 8]);
    }

    #[test]
    fn test_comparator() {
        let mut set = TreapSet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
        set.extend(vec![5, 3, 8, 1, 4]);
        set.tree.assert_invariants(&set.comparator);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&8, &5, &4, &3, &1]);
        assert_eq!(set.first(), Ok(&8));
        assert_eq!(set.lower(&5), Some(&8));
        assert_eq!(set.higher(&5), Some(&4));
        assert_eq!(set.floor(&6), Some(&8));
        assert_eq!(set.ceiling(&6), Some(&5));
        assert_eq!(set.poll_first(), Some(8));
        assert_eq!((set.comparator())(&1, &2), std::cmp::Ordering::Greater);
    }

    #[test]
    fn test_from_iter_and_clone() {
        let set: TreapSet<u32> = vec![3, 1, 2, 3].into_iter().collect();
        assert_eq!(set.len(), 3);

        let mut copy = set.clone();
        assert!(copy.remove(&2));
        assert_eq!(copy.len(), 2);
        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &2, &3]);
        copy.tree.assert_invariants(&copy.comparator);
    }

    #[test]
    fn test_debug() {
        let set = scenario();
        assert_eq!(format!("{:?}", set), "{1, 3, 4, 5, 8}");
    }

    #[test]
    fn test_heap_after_random_operations() {
        let mut set = seeded();
        for i in 0..1000u32 {
            set.insert(i.wrapping_mul(2_654_435_761) % 500);
            if i % 3 == 0 {
                set.remove(&(i % 500));
            }
        }
        set.tree.assert_invariants(&set.comparator);
    }
}
