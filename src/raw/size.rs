#[cfg(test)]
type RawSize = u16;
#[cfg(not(test))]
type RawSize = u32;

/// A node count, as stored in a node's left-subtree annotation.
///
/// Never exceeds the number of allocatable handles, so it shares their width.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub(crate) struct Size(RawSize);

impl Size {
    pub(crate) const MAX: usize = super::handle::Handle::MAX;
    pub(crate) const ZERO: Self = Self(0);

    #[inline]
    pub(crate) const fn from_usize(size: usize) -> Self {
        assert!(size <= Self::MAX, "`Size::from_usize()` - `size` > `Size::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self(size as RawSize)
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }

    /// One more node in the subtree.
    #[inline]
    pub(crate) const fn incremented(self) -> Self {
        Self::from_usize(self.to_usize() + 1)
    }

    /// The subtree after `moved` nodes plus their root have left it.
    #[inline]
    pub(crate) const fn without(self, moved: Self) -> Self {
        debug_assert!(moved.to_usize() < self.to_usize(), "`Size::without()` - underflow!");
        Self::from_usize(self.to_usize() - moved.to_usize() - 1)
    }

    /// The subtree after `joined` nodes plus their root have moved into it.
    #[inline]
    pub(crate) const fn with(self, joined: Self) -> Self {
        Self::from_usize(self.to_usize() + joined.to_usize() + 1)
    }
}
