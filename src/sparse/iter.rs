//! Member iteration for [`SparseIntSet`](super::SparseIntSet).

use std::iter::FusedIterator;

use super::layout::compose_key;
use super::table::Chain;
use super::trunk::TrunkOnes;

/// Iterator over the members of a [`SparseIntSet`](super::SparseIntSet).
///
/// Members are yielded in storage order while the set is inline, and trunk by
/// trunk along the traversal chain once it has upgraded. Neither order is
/// sorted.
///
/// The iterator borrows the set, so the set cannot be mutated while a walk
/// is in progress.
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Inline(std::slice::Iter<'a, usize>),
    Table {
        chain: Chain<'a>,
        current: Option<(usize, TrunkOnes<'a>)>,
    },
}

impl<'a> Iter<'a> {
    pub(crate) fn inline(members: &'a [usize]) -> Self {
        Self {
            inner: IterInner::Inline(members.iter()),
        }
    }

    pub(crate) const fn table(chain: Chain<'a>) -> Self {
        Self {
            inner: IterInner::Table {
                chain,
                current: None,
            },
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Inline(iter) => iter.next().copied(),
            IterInner::Table { chain, current } => loop {
                if let Some((prefix, ones)) = current
                    && let Some((word, bit)) = ones.next()
                {
                    return Some(compose_key(*prefix, word, bit));
                }
                let trunk = chain.next()?;
                *current = Some((trunk.prefix, trunk.ones()));
            },
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Inline(iter) => iter.size_hint(),
            IterInner::Table { .. } => (0, None),
        }
    }
}

impl FusedIterator for Iter<'_> {}
