//! Traversal over a [`ChainTable`](crate::ChainTable): a lazy read-only
//! iterator, and a cursor that can remove the entry it just yielded
//! without reshuffling the rest of the traversal.

use crate::entry::{Link, TableEntry};
use crate::table::ChainTable;
use std::collections::hash_map::RandomState;

/// Lazy iterator over all entries of a table, bucket by bucket and then
/// chain by chain. Yields nothing for an empty table.
pub struct Entries<'a, E> {
    buckets: &'a [Link<E>],
    /// Next bucket the scan has not looked at yet.
    bucket: usize,
    /// Entry queued to be yielded next.
    entry: Option<&'a E>,
}

impl<'a, E: TableEntry> Entries<'a, E> {
    pub(crate) fn new(buckets: &'a [Link<E>]) -> Self {
        let mut iter = Entries {
            buckets,
            bucket: 0,
            entry: None,
        };
        iter.seek();
        iter
    }

    /// Queues the head of the next occupied bucket, if any.
    fn seek(&mut self) {
        while self.bucket < self.buckets.len() {
            let head = self.buckets[self.bucket].as_deref();
            self.bucket += 1;
            if head.is_some() {
                self.entry = head;
                return;
            }
        }
    }
}

impl<'a, E: TableEntry> Iterator for Entries<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        let item = self.entry?;
        self.entry = item.next();
        if self.entry.is_none() {
            self.seek();
        }
        Some(item)
    }
}

/// A traversal that may remove the last-yielded entry.
///
/// Positions are tracked as `(bucket, chain depth)` rather than borrowed
/// entries, so a removal only has to splice and adjust the queued
/// position; not-yet-visited entries keep their relative order.
///
/// [`remove`](Cursor::remove) never rebalances the table — the bucket
/// layout stays fixed for the whole traversal. Callers wanting the shrink
/// run [`ChainTable::rebalance`] once the cursor is dropped.
pub struct Cursor<'a, E, S = RandomState> {
    table: &'a mut ChainTable<E, S>,
    next_pos: Option<(usize, usize)>,
    last_pos: Option<(usize, usize)>,
}

impl<'a, E: TableEntry, S> Cursor<'a, E, S> {
    pub(crate) fn new(table: &'a mut ChainTable<E, S>) -> Self {
        let first = Self::seek(table.buckets(), 0);
        Cursor {
            table,
            next_pos: first,
            last_pos: None,
        }
    }

    /// Position of the first entry in an occupied bucket at or after
    /// `from`.
    fn seek(buckets: &[Link<E>], from: usize) -> Option<(usize, usize)> {
        (from..buckets.len())
            .find(|&bucket| buckets[bucket].is_some())
            .map(|bucket| (bucket, 0))
    }

    fn entry_at(&self, bucket: usize, depth: usize) -> Option<&E> {
        let mut entry = self.table.buckets()[bucket].as_deref();
        for _ in 0..depth {
            entry = entry?.next();
        }
        entry
    }

    /// Yields the queued entry and advances, or `None` once exhausted.
    #[allow(clippy::should_implement_trait)] // lending: the borrow ties to &mut self
    pub fn next(&mut self) -> Option<&E> {
        let (bucket, depth) = self.next_pos?;
        let has_successor = self.entry_at(bucket, depth)?.next().is_some();
        self.next_pos = if has_successor {
            Some((bucket, depth + 1))
        } else {
            Self::seek(self.table.buckets(), bucket + 1)
        };
        self.last_pos = Some((bucket, depth));
        self.entry_at(bucket, depth)
    }

    /// Removes and returns the entry most recently yielded by
    /// [`next`](Cursor::next).
    ///
    /// Returns `None` when there is no current entry: before the first
    /// `next()`, after exhaustion was reached without a yield, or when
    /// called twice in a row.
    pub fn remove(&mut self) -> Option<E> {
        let (bucket, depth) = self.last_pos.take()?;
        let removed = self.table.remove_at(bucket, depth);
        // The queued entry sits one link further down the same chain (or
        // in a later bucket); splicing shifts it up by one.
        if let Some((b, d)) = self.next_pos {
            if b == bucket && d > depth {
                self.next_pos = Some((b, d - 1));
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::{BuildHasher, Hasher};
    use std::collections::BTreeSet;

    struct Pair {
        key: u32,
        value: u32,
        next: Link<Pair>,
    }

    impl TableEntry for Pair {
        type Key = u32;
        type Value = u32;

        fn create(key: u32, value: u32, next: Link<Self>, _hash: u64) -> Self {
            Pair { key, value, next }
        }
        fn key(&self) -> &u32 {
            &self.key
        }
        fn value(&self) -> &u32 {
            &self.value
        }
        fn next(&self) -> Option<&Self> {
            self.next.as_deref()
        }
        fn next_mut(&mut self) -> &mut Link<Self> {
            &mut self.next
        }
        fn into_pair(self) -> (u32, u32) {
            (self.key, self.value)
        }
    }

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        }
    }

    fn filled(n: u32) -> ChainTable<Pair> {
        let mut t = ChainTable::new();
        for k in 0..n {
            t.insert(k, k * 10, true);
        }
        t
    }

    /// Invariant: iteration yields each live entry exactly once, matching
    /// the entry count.
    #[test]
    fn entries_yield_each_entry_once() {
        let t = filled(37);
        let seen: BTreeSet<u32> = t.entries().map(|e| e.key).collect();
        assert_eq!(seen.len(), 37);
        assert_eq!(seen, (0..37).collect());
    }

    /// Invariant: a single-bucket table (all keys colliding) still yields
    /// every chain member.
    #[test]
    fn entries_walk_whole_chain() {
        let mut t: ChainTable<Pair, ConstBuildHasher> = ChainTable::with_hasher(ConstBuildHasher);
        for k in 0..8u32 {
            t.insert(k, k, true);
        }
        assert_eq!(t.entries().count(), 8);
    }

    /// An empty table iterates as empty, repeatedly.
    #[test]
    fn entries_on_empty_table() {
        let t: ChainTable<Pair> = ChainTable::new();
        assert_eq!(t.entries().count(), 0);
        let mut t = t;
        t.insert(1, 1, true);
        t.remove(&1, true);
        assert_eq!(t.entries().count(), 0);
    }

    /// Cursor yields the same population as the read-only iterator and
    /// returns `None` forever once exhausted.
    #[test]
    fn cursor_visits_everything_then_exhausts() {
        let mut t = filled(20);
        let mut cursor = t.cursor();
        let mut seen = BTreeSet::new();
        while let Some(e) = cursor.next() {
            seen.insert(e.key);
        }
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
        assert_eq!(seen, (0..20).collect());
    }

    /// Invariant: `remove` before any `next`, or twice in a row, reports
    /// the illegal state as `None` and leaves the table unchanged.
    #[test]
    fn cursor_remove_requires_a_current_entry() {
        let mut t = filled(3);
        let mut cursor = t.cursor();
        assert!(cursor.remove().is_none());
        cursor.next().expect("first entry");
        assert!(cursor.remove().is_some());
        assert!(cursor.remove().is_none(), "no current entry after removal");
        drop(cursor);
        assert_eq!(t.len(), 2);
    }

    /// Invariant: removing the current entry does not disturb the order or
    /// presence of not-yet-visited entries, including within a collision
    /// chain.
    #[test]
    fn cursor_removal_keeps_remaining_order() {
        let mut t: ChainTable<Pair, ConstBuildHasher> = ChainTable::with_hasher(ConstBuildHasher);
        for k in 0..6u32 {
            t.insert(k, k, false);
        }
        let full_order: Vec<u32> = t.entries().map(|e| e.key).collect();

        let mut cursor = t.cursor();
        let mut visited = Vec::new();
        let mut position = 0usize;
        while let Some(e) = cursor.next() {
            visited.push(e.key);
            if position % 2 == 0 {
                let removed = cursor.remove().expect("current entry");
                assert_eq!(removed.key, *visited.last().unwrap());
            }
            position += 1;
        }
        // Every entry was still visited, in the original order.
        assert_eq!(visited, full_order);
        assert_eq!(t.len(), 3);
    }

    /// The cursor never rebalances: the table length is stable across
    /// cursor removals and only an explicit rebalance shrinks it.
    #[test]
    fn cursor_never_rebalances() {
        let mut t = filled(32);
        let cap = t.capacity();
        let mut cursor = t.cursor();
        while cursor.next().is_some() {
            cursor.remove();
        }
        drop(cursor);
        assert_eq!(t.len(), 0);
        assert_eq!(t.capacity(), cap);
        t.rebalance();
        assert_eq!(t.capacity(), 0);
    }
}
