//! Open-addressed hash table of trunks.
//!
//! Trunks live in an arena (`Vec<Trunk>`) and are indexed twice:
//!
//! - by the slot array, located by probing from `prefix & mask`
//! - by the traversal chain, a singly linked list threaded through
//!   [`Trunk::next`] with the newest trunk at the head
//!
//! Rehashing rebuilds only the slot array; arena positions and chain links
//! never change.
//!
//! # Probe Sequence
//!
//! ```text
//! h0 = prefix & mask
//! h' = (5 * h + 1) & mask
//! ```
//!
//! With a power-of-two capacity this sequence visits every slot exactly once
//! before repeating.

use super::layout::{MIN_TABLE_CAPACITY, local_offset, prefix_of};
use super::trunk::{Trunk, TrunkId};

const PROBE_EXHAUSTED_PANIC_MESSAGE: &str =
    "trunk table probe visited every slot without finding a match or a free slot";
const OCCUPIED_SLOT_PANIC_MESSAGE: &str = "trunk table placed a trunk into an occupied slot";

#[inline]
const fn next_probe(slot: usize, mask: usize) -> usize {
    slot.wrapping_mul(5).wrapping_add(1) & mask
}

pub(crate) struct TrunkTable {
    trunks: Vec<Trunk>,
    slots: Vec<Option<TrunkId>>,
    mask: usize,
    chain_head: Option<TrunkId>,
    /// Number of set bits across all trunks.
    len: usize,
}

impl TrunkTable {
    /// Creates an empty table with `capacity` slots.
    ///
    /// `capacity` must be a power of two no smaller than
    /// [`MIN_TABLE_CAPACITY`].
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(capacity >= MIN_TABLE_CAPACITY);
        Self {
            trunks: Vec::new(),
            slots: vec![None; capacity],
            mask: capacity - 1,
            chain_head: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.mask + 1
    }

    #[cfg(test)]
    pub(crate) const fn trunk_count(&self) -> usize {
        self.trunks.len()
    }

    /// Locates the trunk for `prefix`, if one has been created.
    pub(crate) fn find_trunk(&self, prefix: usize) -> Option<TrunkId> {
        let mut slot = prefix & self.mask;
        for _ in 0..self.capacity() {
            match self.slots[slot] {
                None => return None,
                Some(id) if self.trunks[id.0].prefix == prefix => return Some(id),
                Some(_) => slot = next_probe(slot, self.mask),
            }
        }
        panic!("{PROBE_EXHAUSTED_PANIC_MESSAGE}");
    }

    /// Returns the trunk for `prefix`, creating and chaining a new one if
    /// needed. May rehash before the new trunk is placed.
    pub(crate) fn get_or_create_trunk(&mut self, prefix: usize) -> TrunkId {
        if let Some(id) = self.find_trunk(prefix) {
            return id;
        }
        if self.must_rehash(self.trunks.len() + 1) {
            self.rehash();
        }
        let id = TrunkId(self.trunks.len());
        self.trunks.push(Trunk::new(prefix, self.chain_head));
        self.chain_head = Some(id);
        self.place(id, prefix);
        id
    }

    /// Growth policy: load factor above 2/3, or fewer than four free slots.
    #[inline]
    pub(crate) const fn must_rehash(&self, new_count: usize) -> bool {
        let capacity = self.capacity();
        new_count * 3 > capacity * 2 || capacity - new_count < 4
    }

    /// Doubles the slot array and re-places every chained trunk.
    pub(crate) fn rehash(&mut self) {
        let new_capacity = self.capacity() * 2;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity,
            trunks = self.trunks.len(),
            "rehashing trunk table"
        );
        self.slots = vec![None; new_capacity];
        self.mask = new_capacity - 1;
        let mut cursor = self.chain_head;
        while let Some(id) = cursor {
            let prefix = self.trunks[id.0].prefix;
            self.place(id, prefix);
            cursor = self.trunks[id.0].next;
        }
    }

    /// Stores `id` in the first free slot on `prefix`'s probe sequence.
    fn place(&mut self, id: TrunkId, prefix: usize) {
        let mut slot = prefix & self.mask;
        for _ in 0..self.capacity() {
            if self.slots[slot].is_none() {
                self.slots[slot] = Some(id);
                return;
            }
            slot = next_probe(slot, self.mask);
        }
        panic!("{OCCUPIED_SLOT_PANIC_MESSAGE}");
    }

    pub(crate) fn contains(&self, key: usize) -> bool {
        self.find_trunk(prefix_of(key))
            .is_some_and(|id| self.trunks[id.0].contains_offset(local_offset(key)))
    }

    /// Returns `true` if `key` was newly inserted.
    pub(crate) fn insert(&mut self, key: usize) -> bool {
        let id = self.get_or_create_trunk(prefix_of(key));
        let inserted = self.trunks[id.0].insert_offset(local_offset(key));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Returns `true` if `key` was present. The trunk is kept even if it
    /// becomes clear.
    pub(crate) fn remove(&mut self, key: usize) -> bool {
        let Some(id) = self.find_trunk(prefix_of(key)) else {
            return false;
        };
        let removed = self.trunks[id.0].remove_offset(local_offset(key));
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Builds an independent copy with the same capacity.
    ///
    /// Source trunks are visited along the chain and each copy is pushed to
    /// the front of the new chain, so the copy's chain runs in the opposite
    /// order.
    pub(crate) fn deep_copy(&self) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            capacity = self.capacity(),
            trunks = self.trunks.len(),
            "copying trunk table"
        );
        let mut copy = Self::with_capacity(self.capacity());
        copy.trunks.reserve_exact(self.trunks.len());
        for source in self.chain() {
            let id = TrunkId(copy.trunks.len());
            let mut trunk = Trunk::new(source.prefix, copy.chain_head);
            trunk.bits = source.bits;
            copy.trunks.push(trunk);
            copy.chain_head = Some(id);
            copy.place(id, source.prefix);
        }
        copy.len = self.len;
        debug_assert_eq!(
            copy.trunks.iter().map(Trunk::population).sum::<usize>(),
            copy.len
        );
        copy
    }

    /// Walks the traversal chain from its head.
    pub(crate) fn chain(&self) -> Chain<'_> {
        Chain {
            trunks: &self.trunks,
            cursor: self.chain_head,
        }
    }
}

/// Traversal-chain walk over a table's trunks.
pub(crate) struct Chain<'a> {
    trunks: &'a [Trunk],
    cursor: Option<TrunkId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Trunk;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let trunks = self.trunks;
        let trunk = &trunks[self.cursor?.0];
        self.cursor = trunk.next;
        Some(trunk)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::layout::{TRUNK_BITS, compose_key};
    use rstest::rstest;

    /// Every chained trunk sits in exactly one slot matching its arena index,
    /// and every occupied slot is on the chain.
    fn validate_table(table: &TrunkTable) {
        assert!(table.capacity().is_power_of_two());
        assert!(table.capacity() >= MIN_TABLE_CAPACITY);

        let chained: Vec<usize> = {
            let mut ids = Vec::new();
            let mut cursor = table.chain_head;
            while let Some(id) = cursor {
                ids.push(id.0);
                cursor = table.trunks[id.0].next;
            }
            ids
        };
        assert_eq!(chained.len(), table.trunks.len(), "chain must reach every trunk");

        let mut slotted: Vec<usize> = table.slots.iter().flatten().map(|id| id.0).collect();
        slotted.sort_unstable();
        let mut expected = chained.clone();
        expected.sort_unstable();
        assert_eq!(slotted, expected, "each trunk must occupy exactly one slot");

        for trunk in table.chain() {
            let found = table.find_trunk(trunk.prefix).expect("chained trunk must be findable");
            assert_eq!(table.trunks[found.0].prefix, trunk.prefix);
        }

        let population: usize = table.trunks.iter().map(Trunk::population).sum();
        assert_eq!(population, table.len());
    }

    #[rstest]
    fn test_next_probe_visits_every_slot() {
        for capacity in [8usize, 16, 64, 1024] {
            let mask = capacity - 1;
            let mut seen = vec![false; capacity];
            let mut slot = 0;
            for _ in 0..capacity {
                assert!(!seen[slot], "slot {slot} revisited for capacity {capacity}");
                seen[slot] = true;
                slot = next_probe(slot, mask);
            }
            assert!(seen.iter().all(|&visited| visited));
        }
    }

    #[rstest]
    fn test_next_probe_sequence_from_zero() {
        let mask = 7;
        let sequence: Vec<usize> = std::iter::successors(Some(0), |&slot| Some(next_probe(slot, mask)))
            .take(8)
            .collect();
        assert_eq!(sequence, vec![0, 1, 6, 7, 4, 5, 2, 3]);
    }

    #[rstest]
    #[case::empty_small_table(8, 1, false)]
    #[case::four_free_slots_left(8, 4, false)]
    #[case::three_free_slots_left(8, 5, true)]
    #[case::under_two_thirds(64, 42, false)]
    #[case::over_two_thirds(64, 43, true)]
    fn test_must_rehash(#[case] capacity: usize, #[case] new_count: usize, #[case] expected: bool) {
        let table = TrunkTable::with_capacity(capacity);
        assert_eq!(table.must_rehash(new_count), expected);
    }

    #[rstest]
    fn test_find_trunk_on_empty_table() {
        let table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        assert_eq!(table.find_trunk(0), None);
        assert_eq!(table.find_trunk(12345), None);
    }

    #[rstest]
    fn test_get_or_create_trunk_is_idempotent() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        let first = table.get_or_create_trunk(9);
        let second = table.get_or_create_trunk(9);
        assert_eq!(first, second);
        assert_eq!(table.trunk_count(), 1);
        validate_table(&table);
    }

    #[rstest]
    fn test_colliding_prefixes_are_probed() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        // All map to slot 0 before probing.
        for prefix in [0, 8, 16] {
            table.get_or_create_trunk(prefix);
        }
        assert_eq!(table.slots[0], Some(TrunkId(0)));
        assert_eq!(table.slots[1], Some(TrunkId(1)));
        assert_eq!(table.slots[6], Some(TrunkId(2)));
        validate_table(&table);
    }

    #[rstest]
    fn test_chain_is_reverse_insertion_order() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        for prefix in [4, 1, 7] {
            table.get_or_create_trunk(prefix);
        }
        let prefixes: Vec<usize> = table.chain().map(|trunk| trunk.prefix).collect();
        assert_eq!(prefixes, vec![7, 1, 4]);
    }

    #[rstest]
    fn test_rehash_keeps_arena_and_chain() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        for prefix in 0..5 {
            table.get_or_create_trunk(prefix);
        }
        // The fifth trunk leaves fewer than four free slots in eight.
        assert_eq!(table.capacity(), 16);
        let before: Vec<usize> = table.chain().map(|trunk| trunk.prefix).collect();

        table.rehash();

        assert_eq!(table.capacity(), 32);
        let after: Vec<usize> = table.chain().map(|trunk| trunk.prefix).collect();
        assert_eq!(before, after);
        validate_table(&table);
    }

    #[rstest]
    fn test_many_trunks_grow_table() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        for prefix in 0..1000 {
            table.insert(prefix * TRUNK_BITS + prefix % 7);
        }
        assert_eq!(table.trunk_count(), 1000);
        assert!(table.capacity() * 2 >= 1000 * 3);
        for prefix in 0..1000 {
            assert!(table.contains(prefix * TRUNK_BITS + prefix % 7));
            assert!(!table.contains(prefix * TRUNK_BITS + 7));
        }
        validate_table(&table);
    }

    #[rstest]
    fn test_insert_and_remove_track_len() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        assert!(table.insert(1056));
        assert!(!table.insert(1056));
        assert_eq!(table.len(), 1);
        assert!(table.remove(1056));
        assert!(!table.remove(1056));
        assert!(!table.remove(99_999));
        assert_eq!(table.len(), 0);
    }

    #[rstest]
    fn test_remove_keeps_clear_trunk() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        table.insert(42);
        table.remove(42);
        assert_eq!(table.trunk_count(), 1);
        assert!(table.chain().all(Trunk::is_clear));
        validate_table(&table);
    }

    #[rstest]
    fn test_deep_copy_is_independent_and_reverses_chain() {
        let mut source = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        for key in [1, TRUNK_BITS + 2, 5 * TRUNK_BITS + 3] {
            source.insert(key);
        }
        let mut copy = source.deep_copy();
        assert_eq!(copy.capacity(), source.capacity());
        assert_eq!(copy.len(), source.len());
        validate_table(&copy);

        let source_order: Vec<usize> = source.chain().map(|trunk| trunk.prefix).collect();
        let mut copy_order: Vec<usize> = copy.chain().map(|trunk| trunk.prefix).collect();
        copy_order.reverse();
        assert_eq!(source_order, copy_order);

        copy.remove(1);
        copy.insert(7);
        assert!(source.contains(1));
        assert!(!source.contains(7));
    }

    #[rstest]
    fn test_trunk_keys_compose_prefix() {
        let mut table = TrunkTable::with_capacity(MIN_TABLE_CAPACITY);
        table.insert(3 * TRUNK_BITS + 10);
        table.insert(3 * TRUNK_BITS + 2);
        let keys: Vec<usize> = table
            .chain()
            .flat_map(|trunk| {
                trunk
                    .ones()
                    .map(move |(word, bit)| compose_key(trunk.prefix, word, bit))
            })
            .collect();
        assert_eq!(keys, vec![3 * TRUNK_BITS + 2, 3 * TRUNK_BITS + 10]);
    }
}
