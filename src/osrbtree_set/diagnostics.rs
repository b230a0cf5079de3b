use super::OSRBTreeSet;

impl<T> OSRBTreeSet<T> {
    /// Walks the set in ascending order, handing each element to `emit`, and
    /// returns the depth of the deepest node visited (the root has depth 1).
    ///
    /// Pass a no-op closure to measure depth only; see also
    /// [`height`](OSRBTreeSet::height).
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeSet;
    ///
    /// let set = OSRBTreeSet::from(["World!", "Hello,"]);
    ///
    /// let mut seen = Vec::new();
    /// let depth = set.traverse(|word| seen.push(*word));
    /// assert_eq!(seen, ["Hello,", "World!"]);
    /// assert_eq!(depth, 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n), with O(log n) auxiliary space.
    pub fn traverse<F>(&self, emit: F) -> usize
    where
        F: FnMut(&T),
    {
        self.tree.traverse(emit)
    }

    /// Returns the number of nodes on the longest path from the root to a
    /// leaf, or 0 for an empty set.
    ///
    /// Red-black balancing keeps this at most `2 * log2(len + 1)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeSet;
    ///
    /// let set: OSRBTreeSet<u32> = (0..1000).collect();
    /// assert!(set.height() <= 19);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        self.tree.traverse(|_| {})
    }
}
