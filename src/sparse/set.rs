//! Sparse integer set with a one-way inline-to-table upgrade.
//!
//! This module provides [`SparseIntSet`], a mutable set of `usize` keys that
//! starts as a small inline array and upgrades to a hash table of bit-vector
//! trunks once it outgrows [`INLINE_CAPACITY`].
//!
//! # Time Complexity
//!
//! | Operation      | Inline (n <= 34)  | Table                 |
//! |----------------|-------------------|-----------------------|
//! | `insert`       | O(n)              | O(1) amortized        |
//! | `remove`       | O(n)              | O(1) expected         |
//! | `contains`     | O(n)              | O(1) expected         |
//! | `len`          | O(1)              | O(1)                  |
//! | `is_empty`     | O(1)              | O(1)                  |
//! | `iter`         | O(n)              | O(trunks + n)         |
//! | `assign`       | O(n)              | O(trunks + capacity)  |
//!
//! Inline operations scan at most [`INLINE_CAPACITY`] keys, so they are
//! bounded by a constant as well.
//!
//! # State Transitions
//!
//! ```text
//!                insert (n < 34)
//!     Inline ◄─────────────────┐
//!       │  │                   │
//!       │  └───────────────────┘
//!       │ insert of the 35th distinct key
//!       ▼
//!     Table ◄── insert / remove (never downgrades)
//!       │
//!       │ clear
//!       ▼
//!     Inline
//! ```

use std::fmt;

use arrayvec::ArrayVec;

use super::iter::Iter;
use super::layout::{INLINE_CAPACITY, MIN_TABLE_CAPACITY};
use super::table::TrunkTable;

/// Internal representation of the set.
enum Representation {
    Inline(ArrayVec<usize, INLINE_CAPACITY>),
    Table(TrunkTable),
}

/// A set of non-negative integers that stays compact for sparse keys.
///
/// Small sets keep their members in an inline array. The insertion that
/// would exceed [`INLINE_CAPACITY`] members moves every member into a hash
/// table of trunks, each trunk a bit vector over
/// [`TRUNK_BITS`](super::TRUNK_BITS) consecutive keys. Memory then grows with
/// the number of distinct key prefixes rather than with the key range.
///
/// The set is not `Copy`. [`Clone`] and [`assign`](Self::assign) produce
/// deep copies that share no storage with the source.
///
/// # Examples
///
/// ```rust
/// use trunkset::sparse::SparseIntSet;
///
/// let mut set = SparseIntSet::new();
/// for key in [1, 2, 7, 1056] {
///     set.insert(key);
/// }
/// assert!(set.contains(1056));
///
/// set.insert(1044);
/// set.remove(1044);
/// assert!(!set.contains(1044));
///
/// assert!(!set.insert_if_absent_report_presence(888));
/// assert!(set.insert_if_absent_report_presence(888));
///
/// assert_eq!(set.to_sorted_vec(), vec![1, 2, 7, 888, 1056]);
/// ```
pub struct SparseIntSet {
    representation: Representation,
}

static_assertions::assert_not_impl_any!(SparseIntSet: Copy);
static_assertions::assert_impl_all!(SparseIntSet: Send, Sync, Default, Clone);

impl SparseIntSet {
    /// Creates a new empty set.
    ///
    /// No heap memory is allocated until the set upgrades to a trunk table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let set = SparseIntSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            representation: Representation::Inline(ArrayVec::new_const()),
        }
    }

    /// Returns the number of members.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let set: SparseIntSet = [3, 1, 3].into_iter().collect();
    /// assert_eq!(set.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.representation {
            Representation::Inline(members) => members.len(),
            Representation::Table(table) => table.len(),
        }
    }

    /// Returns `true` if the set has no members.
    ///
    /// This holds for a freshly created or defaulted set, for a cleared set,
    /// and for an upgraded set whose members have all been removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::default();
    /// assert!(set.is_empty());
    ///
    /// set.insert(42);
    /// assert!(!set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the set has moved its members into a trunk table.
    #[inline]
    #[must_use]
    pub const fn is_upgraded(&self) -> bool {
        matches!(self.representation, Representation::Table(_))
    }

    /// Returns `true` if `key` is a member.
    ///
    /// # Complexity
    ///
    /// - Inline: linear scan of at most [`INLINE_CAPACITY`] keys
    /// - Table: one probe sequence plus a bit test
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::new();
    /// set.insert(7);
    /// assert!(set.contains(7));
    /// assert!(!set.contains(8));
    /// ```
    #[must_use]
    pub fn contains(&self, key: usize) -> bool {
        match &self.representation {
            Representation::Inline(members) => members.contains(&key),
            Representation::Table(table) => table.contains(key),
        }
    }

    /// Inserts `key`, returning `true` if it was not already a member.
    ///
    /// Inserting the [`INLINE_CAPACITY`]` + 1`-th distinct key upgrades the
    /// set to a trunk table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: usize) -> bool {
        match &mut self.representation {
            Representation::Inline(members) => {
                if members.contains(&key) {
                    return false;
                }
                if members.try_push(key).is_ok() {
                    return true;
                }
                let mut table = Self::upgrade(members);
                let inserted = table.insert(key);
                self.representation = Representation::Table(table);
                inserted
            }
            Representation::Table(table) => table.insert(key),
        }
    }

    /// Moves inline members, in storage order, into a new minimum-size table.
    fn upgrade(members: &ArrayVec<usize, INLINE_CAPACITY>) -> TrunkTable {
        #[cfg(feature = "tracing")]
        tracing::trace!(members = members.len(), "upgrading inline set to trunk table");
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        for &member in members {
            table.insert(member);
        }
        table
    }

    /// Removes `key`, returning `true` if it was a member.
    ///
    /// Inline removal swaps the last member into the vacated slot. An
    /// upgraded set stays upgraded however few members remain.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::new();
    /// set.insert(1);
    /// assert!(set.remove(1));
    /// assert!(!set.remove(1));
    /// assert!(set.is_empty());
    /// ```
    pub fn remove(&mut self, key: usize) -> bool {
        match &mut self.representation {
            Representation::Inline(members) => members
                .iter()
                .position(|&member| member == key)
                .map(|index| members.swap_remove(index))
                .is_some(),
            Representation::Table(table) => table.remove(key),
        }
    }

    /// Inserts `key` if it is absent.
    ///
    /// Returns `true` if `key` was already present, in which case nothing
    /// changes, and `false` if it has just been inserted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::new();
    /// assert!(!set.insert_if_absent_report_presence(888));
    /// assert!(set.insert_if_absent_report_presence(888));
    /// ```
    pub fn insert_if_absent_report_presence(&mut self, key: usize) -> bool {
        !self.insert(key)
    }

    /// Removes `key` if it is present.
    ///
    /// Returns `true` if `key` was absent, in which case nothing changes,
    /// and `false` if it has just been removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let mut set = SparseIntSet::new();
    /// set.insert(5);
    /// assert!(!set.remove_if_present_report_absence(5));
    /// assert!(set.remove_if_present_report_absence(5));
    /// ```
    pub fn remove_if_present_report_absence(&mut self, key: usize) -> bool {
        !self.remove(key)
    }

    /// Removes every member and returns to the empty inline representation,
    /// releasing the trunk table.
    pub fn clear(&mut self) {
        self.representation = Representation::Inline(ArrayVec::new_const());
    }

    /// Makes `self` an independent deep copy of `source`.
    ///
    /// An inline source is copied by value. A table source is copied into a
    /// new table of the same capacity, one fresh trunk per source trunk.
    /// Later changes to either set never show up in the other.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let source: SparseIntSet = (0..100).collect();
    /// let mut copy = SparseIntSet::new();
    /// copy.assign(&source);
    ///
    /// copy.remove(50);
    /// assert!(source.contains(50));
    /// assert!(!copy.contains(50));
    /// ```
    pub fn assign(&mut self, source: &Self) {
        self.representation = match &source.representation {
            Representation::Inline(members) => Representation::Inline(members.clone()),
            Representation::Table(table) => Representation::Table(table.deep_copy()),
        };
    }

    /// Returns an iterator over the members.
    ///
    /// The order is unspecified: inline members come in storage order,
    /// table members trunk by trunk.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trunkset::sparse::SparseIntSet;
    ///
    /// let set: SparseIntSet = [3, 1, 2].into_iter().collect();
    /// let mut members: Vec<usize> = set.iter().collect();
    /// members.sort_unstable();
    /// assert_eq!(members, vec![1, 2, 3]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        match &self.representation {
            Representation::Inline(members) => Iter::inline(members),
            Representation::Table(table) => Iter::table(table.chain()),
        }
    }

    /// Collects the members into an ascending `Vec`.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<usize> {
        let mut members: Vec<usize> = self.iter().collect();
        members.sort_unstable();
        members
    }

    /// Returns `true` if the set is in the Table state with a table of
    /// `capacity` slots.
    #[cfg(test)]
    fn has_table_capacity(&self, capacity: usize) -> bool {
        matches!(&self.representation, Representation::Table(table) if table.capacity() == capacity)
    }
}

impl Default for SparseIntSet {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SparseIntSet {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        copy.assign(self);
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl PartialEq for SparseIntSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|key| other.contains(key))
    }
}

impl Eq for SparseIntSet {}

impl fmt::Debug for SparseIntSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for SparseIntSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for key in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}")?;
        }
        write!(formatter, "}}")
    }
}

impl Extend<usize> for SparseIntSet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl FromIterator<usize> for SparseIntSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a SparseIntSet {
    type Item = usize;
    type IntoIter = Iter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
