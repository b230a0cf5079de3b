/// A zero-based rank into the sorted order of a set.
///
/// # Examples
///
/// ```
/// use osrb_tree::{OSRBTreeSet, Rank};
///
/// let mut set = OSRBTreeSet::new();
/// set.insert("b");
/// set.insert("a");
///
/// assert_eq!(set[Rank(0)], "a");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
