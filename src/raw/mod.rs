mod arena;
mod handle;
mod node;
mod raw_osrbtree;
mod size;

pub(crate) use node::Side;
pub(crate) use raw_osrbtree::{RawIter, RawOSRBTree};
