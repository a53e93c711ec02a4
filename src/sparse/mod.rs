//! Sparse integer sets.
//!
//! This module provides [`SparseIntSet`], a mutable set of `usize` keys with
//! two internal representations:
//!
//! - **Inline**: up to [`INLINE_CAPACITY`] members in a fixed-capacity array
//! - **Trunk table**: an open-addressed hash table of fixed-width bit-vector
//!   trunks, each covering [`TRUNK_BITS`] consecutive keys
//!
//! The switch from inline to table storage happens once, on the insertion
//! that would exceed [`INLINE_CAPACITY`], and is never undone except by
//! [`SparseIntSet::clear`].
//!
//! # Key Layout
//!
//! ```text
//!  key:  [          prefix          | word index | bit index ]
//!                                    <-------- TRUNK_SHIFT ---->
//!                                                <-INT_SHIFT->
//! ```
//!
//! The prefix selects a trunk, the low [`TRUNK_SHIFT`] bits select a bit
//! inside it.
//!
//! # Examples
//!
//! ```rust
//! use trunkset::sparse::SparseIntSet;
//!
//! let mut set: SparseIntSet = (0..=1000).collect();
//! assert!(set.is_upgraded());
//! assert!(set.contains(500));
//! assert!(!set.contains(1001));
//!
//! set.remove(500);
//! assert!(!set.contains(500));
//! assert_eq!(set.len(), 1000);
//! ```

mod iter;
mod layout;
mod set;
mod table;
mod trunk;

pub use iter::Iter;
pub use layout::INLINE_CAPACITY;
pub use layout::INT_MASK;
pub use layout::INT_SHIFT;
pub use layout::MIN_TABLE_CAPACITY;
pub use layout::TRUNK_BITS;
pub use layout::TRUNK_MASK;
pub use layout::TRUNK_SHIFT;
pub use layout::TRUNK_WORDS;
pub use layout::WORD_BITS;
pub use set::SparseIntSet;
