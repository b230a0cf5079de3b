use core::borrow::Borrow;
use core::ops::Index;

use super::OSRBTreeSet;
use crate::{Error, Rank};

impl<T> OSRBTreeSet<T> {
    /// Returns the zero-based rank of `value` in sorted order, or `None` if
    /// the value is not present.
    ///
    /// The rank is the number of elements in the set that are smaller than
    /// `value`.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeSet;
    ///
    /// let set = OSRBTreeSet::from([1, 2, 3, 4, 5]);
    ///
    /// assert_eq!(set.rank(&3), Some(2));
    /// assert_eq!(set.rank(&6), None);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, value: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.tree.rank(value)
    }

    /// Returns the value at position `index` in sorted order.
    ///
    /// The index is zero-based. Returns `None` if `index` is not below
    /// [`len`](OSRBTreeSet::len).
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeSet;
    ///
    /// let set = OSRBTreeSet::from([10, 20, 30]);
    /// assert_eq!(set.select(1), Some(&20));
    /// assert!(set.select(3).is_none());
    /// ```
    #[must_use]
    pub fn select(&self, index: usize) -> Option<&T> {
        self.tree.select(index)
    }

    /// Returns the value at position `index` in sorted order, or an error
    /// naming the index and the set's length if it is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::{Error, OSRBTreeSet};
    ///
    /// let set = OSRBTreeSet::from(["Hello,", "World!"]);
    /// assert_eq!(set.try_select(0), Ok(&"Hello,"));
    /// assert_eq!(set.try_select(3), Err(Error::IndexOutOfBounds { index: 3, len: 2 }));
    /// ```
    pub fn try_select(&self, index: usize) -> Result<&T, Error> {
        self.tree.select(index).ok_or(Error::IndexOutOfBounds { index, len: self.len() })
    }
}

/// Indexes into the set by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use osrb_tree::OSRBTreeSet;
/// use osrb_tree::Rank;
///
/// let set = OSRBTreeSet::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T> Index<Rank> for OSRBTreeSet<T> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        match self.try_select(rank.0) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}
