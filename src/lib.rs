//! # trunkset
//!
//! A sparse set of non-negative machine integers.
//!
//! ## Overview
//!
//! [`SparseIntSet`](sparse::SparseIntSet) answers membership, insertion,
//! removal and iteration for `usize` keys while using memory proportional to
//! the number of distinct high-order key prefixes actually present:
//!
//! - **Inline store**: up to [`INLINE_CAPACITY`](sparse::INLINE_CAPACITY)
//!   members live in a fixed array and are scanned linearly
//! - **Trunk table**: past that, members become bits in fixed-width
//!   bit-vector trunks, kept in an open-addressed hash table and threaded on
//!   a traversal chain
//!
//! ## Feature Flags
//!
//! - `tracing`: emit `tracing` events on upgrade, rehash and deep copy
//!   (enabled by default)
//!
//! ## Example
//!
//! ```rust
//! use trunkset::prelude::*;
//!
//! let mut set = SparseIntSet::new();
//! set.insert(7);
//! set.insert(1056);
//! assert!(set.contains(1056));
//! assert_eq!(set.to_string(), "{7, 1056}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use trunkset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::sparse::*;
}

pub mod sparse;
