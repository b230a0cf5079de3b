use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use log::trace;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node, Side};

// Red-black height is at most `2 * log2(n + 1)`, so 64 inline slots cover
// every tree addressable with 32-bit handles.
const STACK_DEPTH: usize = 64;

type Stack = SmallVec<[Handle; STACK_DEPTH]>;

/// The top-down red-black tree backing `OSRBTreeSet`.
///
/// Node links live in `nodes`; slot 0 is the sentinel and slot 1 the anchor,
/// whose right child is the true root. The key of every other node is held in
/// `keys` at `handle.key_index()`.
#[derive(Clone)]
pub(crate) struct RawOSRBTree<T> {
    /// Arena storing all tree nodes, including the two reserved ones.
    nodes: Arena<Node>,
    /// Keys, in allocation order.
    keys: Vec<T>,
}

/// The last four nodes visited by an insertion descent.
#[derive(Clone, Copy, Debug)]
struct Path {
    x: Handle,
    p: Handle,
    g: Handle,
    gg: Handle,
}

/// Which way `key` leads at each node a split may rotate.
#[derive(Clone, Copy, Debug)]
struct Turns {
    gg: Side,
    g: Side,
    p: Side,
}

impl Path {
    const fn start() -> Self {
        Self {
            x: Handle::ANCHOR,
            p: Handle::ANCHOR,
            g: Handle::ANCHOR,
            gg: Handle::ANCHOR,
        }
    }

    fn advance(&mut self) {
        self.gg = self.g;
        self.g = self.p;
        self.p = self.x;
    }
}

impl<T> RawOSRBTree<T> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_add(Handle::RESERVED));
        let sentinel = nodes.alloc(Node::SENTINEL);
        let anchor = nodes.alloc(Node::ANCHOR);
        debug_assert_eq!(sentinel, Handle::SENTINEL);
        debug_assert_eq!(anchor, Handle::ANCHOR);

        Self {
            nodes,
            keys: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.keys.capacity()
    }

    /// Returns the number of keys in the tree.
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    fn key(&self, handle: Handle) -> &T {
        &self.keys[handle.key_index()]
    }

    #[inline]
    fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    #[inline]
    fn root(&self) -> Handle {
        self.node(Handle::ANCHOR).right()
    }

    fn has_red_children(&self, handle: Handle) -> bool {
        let node = self.node(handle);
        self.node(node.left()).is_red() && self.node(node.right()).is_red()
    }

    /// Returns the key at the far end of the tree on `side`.
    pub(crate) fn extreme(&self, side: Side) -> Option<&T> {
        let mut current = self.root();
        if current == Handle::SENTINEL {
            return None;
        }

        loop {
            let next = self.node(current).child(side);
            if next == Handle::SENTINEL {
                return Some(self.key(current));
            }
            current = next;
        }
    }

    /// Returns the stored key equal to `key`, if any.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root();

        while current != Handle::SENTINEL {
            let node = self.node(current);
            match key.cmp(self.key(current).borrow()) {
                Equal => return Some(self.key(current)),
                Less => current = node.left(),
                Greater => current = node.right(),
            }
        }

        None
    }

    /// Returns the zero-based position of `key` among the stored keys.
    pub(crate) fn rank<Q>(&self, key: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root();
        let mut rank = 0;

        while current != Handle::SENTINEL {
            let node = self.node(current);
            match key.cmp(self.key(current).borrow()) {
                Equal => return Some(rank + node.left_size().to_usize()),
                Less => current = node.left(),
                Greater => {
                    // Everything left of this node, plus the node itself, precedes `key`.
                    rank += node.left_size().to_usize() + 1;
                    current = node.right();
                }
            }
        }

        None
    }

    /// Returns the key at zero-based position `index`.
    pub(crate) fn select(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }

        let mut current = self.root();
        let mut remaining = index;

        while current != Handle::SENTINEL {
            let node = self.node(current);
            let left_size = node.left_size().to_usize();
            match remaining.cmp(&left_size) {
                Equal => return Some(self.key(current)),
                Less => current = node.left(),
                Greater => {
                    remaining -= left_size + 1;
                    current = node.right();
                }
            }
        }

        None
    }

    /// Walks the keys in ascending order, passing each to `emit`.
    ///
    /// Returns the largest depth visited, counting the root as depth 1.
    pub(crate) fn traverse<F>(&self, mut emit: F) -> usize
    where
        F: FnMut(&T),
    {
        let mut stack: SmallVec<[(Handle, usize); STACK_DEPTH]> = SmallVec::new();
        let mut max_depth = 0;
        let mut current = self.root();
        let mut depth = 1;

        loop {
            while current != Handle::SENTINEL {
                max_depth = max_depth.max(depth);
                stack.push((current, depth));
                current = self.node(current).left();
                depth += 1;
            }

            let Some((top, top_depth)) = stack.pop() else {
                break;
            };
            emit(self.key(top));
            current = self.node(top).right();
            depth = top_depth + 1;
        }

        max_depth
    }

    pub(crate) fn iter(&self) -> RawIter<'_, T> {
        let mut iter = RawIter {
            tree: self,
            front: Stack::new(),
            back: Stack::new(),
            remaining: self.len(),
        };
        iter.descend(Side::Left, self.root());
        iter.descend(Side::Right, self.root());
        iter
    }
}

impl<T: Ord> RawOSRBTree<T> {
    /// The side of `node` on which `key` belongs. The anchor has no key and
    /// always leads right, toward the root.
    #[inline]
    fn side_toward(&self, key: &T, node: Handle) -> Side {
        if node.is_keyed() && key < self.key(node) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Compares `key` against the nodes a split at `path.x` may rotate.
    ///
    /// Returns `None` when the parent is black and the split is a plain color
    /// flip.
    fn turns(&self, key: &T, path: &Path) -> Option<Turns> {
        if !self.node(path.p).is_red() {
            return None;
        }

        Some(Turns {
            gg: self.side_toward(key, path.gg),
            g: self.side_toward(key, path.g),
            p: self.side_toward(key, path.p),
        })
    }

    /// Collects the nodes on the way down to `key`'s empty slot where the
    /// path turns left.
    fn left_turns(&self, key: &T) -> Stack {
        let mut turns = Stack::new();
        let mut current = self.root();

        while current != Handle::SENTINEL {
            if key < self.key(current) {
                turns.push(current);
                current = self.node(current).left();
            } else {
                current = self.node(current).right();
            }
        }

        turns
    }

    /// Inserts `key`, returning `false` and leaving the tree untouched if it
    /// is already present.
    ///
    /// Every comparison a step needs is made before that step writes to the
    /// tree, so a panicking `Ord` leaves a valid tree behind.
    pub(crate) fn insert(&mut self, key: T) -> bool {
        // Costs a second search on success, but a duplicate never splits.
        if self.get(&key).is_some() {
            return false;
        }

        let mut path = Path::start();

        while path.x != Handle::SENTINEL {
            path.advance();
            let side = self.side_toward(&key, path.x);
            path.x = self.node(path.x).child(side);

            if self.has_red_children(path.x) {
                let turns = self.turns(&key, &path);
                self.split(&mut path, turns);
            }
        }

        let side = self.side_toward(&key, path.p);
        let left_turns = self.left_turns(&key);
        let turns = self.turns(&key, &path);

        let new = self.nodes.alloc(Node::leaf(Color::Black));
        self.keys.push(key);
        debug_assert_eq!(new.key_index(), self.keys.len() - 1);
        debug_assert_eq!(self.nodes.len(), Handle::RESERVED + self.keys.len());

        self.nodes.get_mut(path.p).set_child(side, new);
        path.x = new;
        self.fix_path(&left_turns);
        self.split(&mut path, turns);

        trace!("inserted {new:?}, len {}", self.len());
        true
    }
}

impl<T> RawOSRBTree<T> {
    /// Rotates the child of `y` on side `toward_c` with that child's own
    /// child on side `toward_gc`, and returns the grandchild that took its
    /// place under `y`.
    fn rotate(&mut self, y: Handle, toward_c: Side, toward_gc: Side) -> Handle {
        let c = self.node(y).child(toward_c);

        let gc = match toward_gc {
            Side::Left => {
                let gc = self.node(c).left();
                let (gc_right, gc_left_size) = {
                    let gc_node = self.node(gc);
                    (gc_node.right(), gc_node.left_size())
                };

                // `c` keeps only what was right of `gc` on its left.
                let c_node = self.nodes.get_mut(c);
                let left_size = c_node.left_size().without(gc_left_size);
                c_node.set_child(Side::Left, gc_right);
                c_node.set_left_size(left_size);

                self.nodes.get_mut(gc).set_child(Side::Right, c);
                gc
            }
            Side::Right => {
                let gc = self.node(c).right();
                let gc_left = self.node(gc).left();
                let c_left_size = self.node(c).left_size();

                self.nodes.get_mut(c).set_child(Side::Right, gc_left);

                // `gc` gains `c` and all of its left subtree.
                let gc_node = self.nodes.get_mut(gc);
                let left_size = gc_node.left_size().with(c_left_size);
                gc_node.set_child(Side::Left, c);
                gc_node.set_left_size(left_size);
                gc
            }
        };

        self.nodes.get_mut(y).set_child(toward_c, gc);
        trace!("rotate under {y:?}: {gc:?} replaces {c:?}");
        gc
    }

    /// Turns `path.x` red and its children black, then removes any red-red
    /// pair this creates with one or two rotations.
    fn split(&mut self, path: &mut Path, turns: Option<Turns>) {
        let x = self.nodes.get_mut(path.x);
        x.set_color(Color::Red);
        let children = [x.left(), x.right()];
        for child in children {
            if child != Handle::SENTINEL {
                self.nodes.get_mut(child).set_color(Color::Black);
            }
        }

        if let Some(turns) = turns {
            self.nodes.get_mut(path.g).set_color(Color::Red);

            if turns.g != turns.p {
                path.p = self.rotate(path.g, turns.g, turns.p);
            }

            path.x = self.rotate(path.gg, turns.gg, turns.g);
            self.nodes.get_mut(path.x).set_color(Color::Black);
        }

        let root = self.root();
        if root != Handle::SENTINEL {
            self.nodes.get_mut(root).set_color(Color::Black);
        }
    }

    /// Counts a freshly linked node into the left-subtree sizes of the nodes
    /// whose left subtree it joined.
    fn fix_path(&mut self, left_turns: &[Handle]) {
        for &handle in left_turns {
            let node = self.nodes.get_mut(handle);
            node.set_left_size(node.left_size().incremented());
        }
    }
}

/// Ascending in-order cursor over a `RawOSRBTree`, walkable from both ends.
pub(crate) struct RawIter<'a, T> {
    tree: &'a RawOSRBTree<T>,
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, T> RawIter<'a, T> {
    // Pushes `from` and its chain of `side` children.
    fn descend(&mut self, side: Side, from: Handle) {
        let stack = match side {
            Side::Left => &mut self.front,
            Side::Right => &mut self.back,
        };
        let mut current = from;
        while current != Handle::SENTINEL {
            stack.push(current);
            current = self.tree.node(current).child(side);
        }
    }

    pub(crate) fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        let top = self.front.pop()?;
        self.remaining -= 1;
        self.descend(Side::Left, tree.node(top).right());
        Some(tree.key(top))
    }

    pub(crate) fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }

        let tree = self.tree;
        let top = self.back.pop()?;
        self.remaining -= 1;
        self.descend(Side::Right, tree.node(top).left());
        Some(tree.key(top))
    }

    pub(crate) const fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> Clone for RawIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    extern crate std;

    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use core::cell::Cell;
    use core::cmp::Ordering;
    use proptest::prelude::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    impl<T: Ord> RawOSRBTree<T> {
        /// Validates every red-black and order-statistic invariant. Panics
        /// with a descriptive message if any is violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();

            let sentinel = self.node(Handle::SENTINEL);
            if sentinel.color() != Color::Black
                || sentinel.left_size().to_usize() != 0
                || sentinel.left() != Handle::SENTINEL
                || sentinel.right() != Handle::SENTINEL
            {
                errors.push(alloc::format!("sentinel was modified: {sentinel:?}"));
            }

            let root = self.root();
            if self.node(root).is_red() {
                errors.push(alloc::format!("root {root:?} is red"));
            }

            let (count, _) = self.validate_node(root, None, None, &mut errors);
            if count != self.len() {
                errors.push(alloc::format!("len mismatch: len={}, reachable={count}", self.len()));
            }
            if self.nodes.len() != self.len() + Handle::RESERVED {
                errors.push(alloc::format!("arena holds {} slots for {} keys", self.nodes.len(), self.len()));
            }

            assert!(errors.is_empty(), "invariants violated:\n{}", errors.join("\n"));
        }

        // Returns the subtree's node count and black height.
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&T>,
            upper: Option<&T>,
            errors: &mut Vec<String>,
        ) -> (usize, usize) {
            if handle == Handle::SENTINEL {
                return (0, 1);
            }

            let node = self.node(handle);
            let key = self.key(handle);
            if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
                errors.push(alloc::format!("key order violated at {handle:?}"));
            }

            if node.is_red() && (self.node(node.left()).is_red() || self.node(node.right()).is_red()) {
                errors.push(alloc::format!("red node {handle:?} has a red child"));
            }

            let (left_count, left_black) = self.validate_node(node.left(), lower, Some(key), errors);
            let (right_count, right_black) = self.validate_node(node.right(), Some(key), upper, errors);

            if node.left_size().to_usize() != left_count {
                errors.push(alloc::format!(
                    "left_size mismatch at {handle:?}: stored={}, actual={left_count}",
                    node.left_size().to_usize()
                ));
            }
            if left_black != right_black {
                errors.push(alloc::format!(
                    "black height mismatch at {handle:?}: left={left_black}, right={right_black}"
                ));
            }

            let own = usize::from(!node.is_red());
            (left_count + right_count + 1, left_black + own)
        }

        fn snapshot(&self) -> Vec<Node> {
            (0..self.nodes.len()).map(|i| self.node(Handle::from_index(i)).clone()).collect()
        }
    }

    fn collect<T: Clone>(tree: &RawOSRBTree<T>) -> Vec<T> {
        let mut keys = Vec::new();
        tree.traverse(|key| keys.push(key.clone()));
        keys
    }

    #[test]
    fn empty_tree() {
        let tree: RawOSRBTree<i32> = RawOSRBTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.rank(&0), None);
        assert_eq!(tree.select(0), None);
        assert_eq!(tree.traverse(|_| {}), 0);
        assert_eq!(tree.extreme(Side::Left), None);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn ascending_five() {
        let mut tree = RawOSRBTree::new();
        for key in 1..=5 {
            assert!(tree.insert(key));
            tree.validate_invariants();
        }

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.rank(&3), Some(2));
        assert_eq!(tree.select(2), Some(&3));
        assert_eq!(collect(&tree), vec![1, 2, 3, 4, 5]);
        assert_eq!(tree.extreme(Side::Left), Some(&1));
        assert_eq!(tree.extreme(Side::Right), Some(&5));
    }

    #[test]
    fn string_keys() {
        let mut tree = RawOSRBTree::new();
        assert!(tree.insert(String::from("World!")));
        assert!(tree.insert(String::from("Hello,")));
        tree.validate_invariants();

        assert_eq!(collect(&tree), vec![String::from("Hello,"), String::from("World!")]);
        assert_eq!(tree.select(0).map(String::as_str), Some("Hello,"));
        assert_eq!(tree.select(1).map(String::as_str), Some("World!"));
        assert_eq!(tree.select(3), None);
        assert_eq!(tree.rank("World!"), Some(1));
    }

    #[test]
    fn duplicate_insert_leaves_structure_untouched() {
        let mut tree = RawOSRBTree::new();
        for key in [50, 20, 80, 10, 30, 70, 90, 25, 35, 5] {
            tree.insert(key);
        }
        let before = tree.snapshot();

        for key in [50, 20, 80, 10, 30, 70, 90, 25, 35, 5] {
            assert!(!tree.insert(key));
        }

        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.len(), 10);
        tree.validate_invariants();
    }

    // A key whose comparisons draw on a shared budget and panic once it runs out.
    #[derive(Debug)]
    struct Fragile {
        value: i32,
        budget: Option<Rc<Cell<usize>>>,
    }

    impl Fragile {
        fn spend(&self) {
            if let Some(budget) = &self.budget {
                let left = budget.get();
                assert!(left > 0, "comparison budget exhausted");
                budget.set(left - 1);
            }
        }
    }

    impl Ord for Fragile {
        fn cmp(&self, other: &Self) -> Ordering {
            self.spend();
            other.spend();
            self.value.cmp(&other.value)
        }
    }

    impl PartialOrd for Fragile {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl PartialEq for Fragile {
        fn eq(&self, other: &Self) -> bool {
            self.cmp(other) == Ordering::Equal
        }
    }

    impl Eq for Fragile {}

    #[test]
    fn panicking_comparison_leaves_tree_valid() {
        let existing = [40, 20, 60, 10, 30, 50, 70];
        let mut panicked = 0;
        let mut inserted = 0;

        for allowance in 0..64 {
            let mut tree = RawOSRBTree::new();
            for value in existing {
                tree.insert(Fragile { value, budget: None });
            }

            let budget = Rc::new(Cell::new(allowance));
            let key = Fragile {
                value: 35,
                budget: Some(Rc::clone(&budget)),
            };
            let outcome = catch_unwind(AssertUnwindSafe(|| tree.insert(key)));
            budget.set(usize::MAX);

            tree.validate_invariants();

            let mut expected: Vec<i32> = existing.to_vec();
            if outcome.is_ok() {
                inserted += 1;
                expected.push(35);
            } else {
                panicked += 1;
            }
            expected.sort_unstable();

            let mut traversed = Vec::new();
            tree.traverse(|key| traversed.push(key.value));
            assert_eq!(traversed, expected, "allowance {allowance}");
            let mut iterated = Vec::new();
            let mut iter = tree.iter();
            while let Some(key) = iter.next() {
                iterated.push(key.value);
            }
            assert_eq!(iterated, expected);
            assert_eq!(tree.len(), expected.len());
            for (index, value) in expected.iter().enumerate() {
                assert_eq!(tree.select(index).map(|key| key.value), Some(*value));
            }
        }

        assert!(panicked > 0 && inserted > 0, "panicked={panicked}, inserted={inserted}");
    }

    #[test]
    fn sequential_inserts_stay_balanced() {
        for ascending in [true, false] {
            let mut tree = RawOSRBTree::new();
            let n = 4096;
            for i in 0..n {
                let key = if ascending { i } else { n - i };
                tree.insert(key);
            }
            tree.validate_invariants();

            // height <= 2 * log2(n + 1)  <=>  2^height <= (n + 1)^2
            let height = tree.traverse(|_| {});
            let nodes = u128::try_from(n).unwrap() + 1;
            assert!(1u128 << height <= nodes * nodes, "height {height} too large for {n} keys");
        }
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let mut tree = RawOSRBTree::new();
        for key in 0..100 {
            tree.insert(key);
        }

        let mut iter = tree.iter();
        let mut seen = Vec::new();
        loop {
            let Some(&front) = iter.next() else { break };
            seen.push(front);
            let Some(&back) = iter.next_back() else { break };
            seen.push(back);
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<_>>());
        assert_eq!(iter.len(), 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_inserts(keys in prop::collection::vec(0i32..1000, 0..500)) {
            let mut tree = RawOSRBTree::new();
            let mut model = BTreeSet::new();

            for key in keys {
                prop_assert_eq!(tree.insert(key), model.insert(key));
                tree.validate_invariants();
            }

            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(collect(&tree), model.iter().copied().collect::<Vec<_>>());
        }

        #[test]
        fn rank_and_select_match_model(keys in prop::collection::vec(-5000i32..5000, 1..400), lookups in prop::collection::vec(-5000i32..5000, 50)) {
            let mut tree = RawOSRBTree::new();
            for &key in &keys {
                tree.insert(key);
            }
            let sorted: Vec<i32> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

            for (index, key) in sorted.iter().enumerate() {
                prop_assert_eq!(tree.select(index), Some(key));
                prop_assert_eq!(tree.rank(key), Some(index));
            }
            prop_assert_eq!(tree.select(sorted.len()), None);

            for lookup in lookups {
                prop_assert_eq!(tree.rank(&lookup), sorted.binary_search(&lookup).ok());
            }
        }
    }
}
