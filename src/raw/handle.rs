use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node slot in the tree's arena.
///
/// Stored as `index + 1` so that `Option<Handle>` costs nothing extra.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The shared terminal node standing in for every empty subtree.
    pub(crate) const SENTINEL: Self = Self::from_index(0);
    /// The super-root; its right child is the true root of the tree.
    pub(crate) const ANCHOR: Self = Self::from_index(1);
    /// Number of reserved slots preceding the first keyed node.
    pub(crate) const RESERVED: usize = 2;

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        // `index + 1` cannot be zero and cannot overflow.
        #[allow(clippy::cast_possible_truncation)]
        Self(NonZero::new((index + 1) as RawHandle).unwrap())
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Position of this node's key in the tree's key storage.
    #[inline]
    pub(crate) const fn key_index(self) -> usize {
        debug_assert!(self.is_keyed(), "`Handle::key_index()` - reserved handle has no key!");
        self.to_index() - Self::RESERVED
    }

    #[inline]
    pub(crate) const fn is_keyed(self) -> bool {
        self.to_index() >= Self::RESERVED
    }
}
