use thiserror::Error;

/// Errors reported by fallible order-statistic queries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// A rank was requested outside `0..len`.
    #[error("rank {index} is out of bounds for a tree of {len} keys")]
    IndexOutOfBounds {
        /// The rank that was requested.
        index: usize,
        /// The number of keys in the tree when the request was made.
        len: usize,
    },
}
