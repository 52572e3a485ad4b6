//! An ordered set backed by a treap: a binary search tree whose shape is randomized by a priority
//! drawn for every key and kept in heap order by rotations.
//!
//! Besides membership, the set answers ordered neighbour queries (`lower`, `higher`, `floor`,
//! `ceiling`), exposes its extremes (`first`, `last`) and removes them (`poll_first`,
//! `poll_last`), all in expected `O(log n)` time.
//!
//! # Examples
//!
//! ```
//! use treap_set::TreapSet;
//!
//! let mut set: TreapSet<u32> = vec![5, 3, 8, 1, 4].into_iter().collect();
//!
//! assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![1, 3, 4, 5, 8]);
//! assert_eq!(set.floor(&6), Some(&5));
//! assert_eq!(set.higher(&5), Some(&8));
//! assert_eq!(set.poll_first(), Some(1));
//! ```

pub mod arena;
pub mod comparator;
mod error;
pub mod treap;

pub use crate::comparator::{Comparator, NaturalOrder};
pub use crate::error::{Error, Result};
pub use crate::treap::{TreapSet, TreapSetIntoIter, TreapSetIter};
