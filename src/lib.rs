//! Order-statistic red-black tree for Rust.
//!
//! This crate provides [`OSRBTreeSet`], an ordered set backed by a red-black
//! tree whose nodes carry the size of their left subtree. On top of the usual
//! ordered-set lookups it answers two O(log n) order-statistic queries:
//!
//! - [`rank`](OSRBTreeSet::rank) - The sorted position of a key
//! - [`select`](OSRBTreeSet::select) - The key at a given sorted position
//! - Indexing by [`Rank`] - e.g., `set[Rank(0)]` for the smallest key
//!
//! # Example
//!
//! ```
//! use osrb_tree::{OSRBTreeSet, Rank};
//!
//! let mut set = OSRBTreeSet::new();
//! assert!(set.insert("World!"));
//! assert!(set.insert("Hello,"));
//! assert!(!set.insert("Hello,"));
//!
//! assert_eq!(set.len(), 2);
//! assert_eq!(set.rank("World!"), Some(1));
//! assert_eq!(set.select(0), Some(&"Hello,"));
//! assert_eq!(set.select(3), None);
//! assert_eq!(set[Rank(1)], "World!");
//! ```
//!
//! # Implementation
//!
//! Insertion is top-down: while descending toward the new leaf, any node with
//! two red children is recolored and, where that creates two reds in a row,
//! rotated into place, so no repair pass back up the tree is needed. A second
//! short descent then counts the new leaf into the left-subtree sizes of the
//! nodes above it.
//!
//! Nodes live in an arena and refer to each other by index. A shared sentinel
//! slot stands for every empty subtree, and an anchor slot sits above the root
//! so that rotations never special-case it. Keys cannot be removed; all nodes
//! are released together when the set is dropped.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod order_statistic;
mod raw;

pub mod osrbtree_set;

pub use error::Error;
pub use order_statistic::Rank;
pub use osrbtree_set::OSRBTreeSet;
