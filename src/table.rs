//! ChainTable: the hash-table engine. One `Vec` of bucket slots, each the
//! head of a singly linked entry chain, with eager inline resizing in both
//! directions driven by [`policy::target_length`](crate::policy::target_length).

use crate::cursor::{Cursor, Entries};
use crate::entry::{Link, TableEntry};
use crate::policy::{bucket_index, spread, target_length};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// A chained hash table over caller-defined entries.
///
/// `E` supplies storage through the [`TableEntry`] contract; `S` supplies
/// raw hashing. The table length is always zero or a power of two, and the
/// mutating operations accept a `rebalance_after` flag so batch callers
/// (and the cursor) can defer the resize policy.
pub struct ChainTable<E, S = RandomState> {
    table: Vec<Link<E>>,
    size: usize,
    hasher: S,
}

impl<E> ChainTable<E>
where
    E: TableEntry,
    E::Key: Eq + Hash,
{
    /// An empty table with no buckets; the first insert bootstraps it.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<E> Default for ChainTable<E>
where
    E: TableEntry,
    E::Key: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TableEntry, S> ChainTable<E, S> {
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current table length (bucket count), zero when collapsed.
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Drops every entry and nulls every slot. The table length is kept;
    /// call [`rebalance`](Self::rebalance) to collapse it.
    pub fn clear(&mut self) {
        if self.size == 0 {
            return;
        }
        self.size = 0;
        for slot in &mut self.table {
            *slot = None;
        }
    }

    /// Lazy iterator over all entries, bucket by bucket.
    pub fn entries(&self) -> Entries<'_, E> {
        Entries::new(&self.table)
    }

    /// Mutation-safe traversal supporting removal of the last-yielded
    /// entry. See [`Cursor`].
    pub fn cursor(&mut self) -> Cursor<'_, E, S> {
        Cursor::new(self)
    }

    pub(crate) fn buckets(&self) -> &[Link<E>] {
        &self.table
    }

    /// Surrenders the bucket table to an owning iterator.
    pub(crate) fn into_buckets(self) -> Vec<Link<E>> {
        self.table
    }

    /// Splices out the entry at chain depth `depth` of `bucket`. Used by
    /// keyed removal and by the cursor; never rebalances.
    pub(crate) fn remove_at(&mut self, bucket: usize, depth: usize) -> Option<E> {
        let mut link = &mut self.table[bucket];
        for _ in 0..depth {
            match link {
                Some(entry) => link = entry.next_mut(),
                None => return None,
            }
        }
        let mut removed = link.take()?;
        *link = removed.next_mut().take();
        self.size -= 1;
        Some(*removed)
    }
}

impl<E, S> ChainTable<E, S>
where
    E: TableEntry,
    E::Key: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: Vec::new(),
            size: 0,
            hasher,
        }
    }

    fn hash_of<Q>(&self, key: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        spread(self.hasher.hash_one(key))
    }

    fn entry_hash(&self, entry: &E) -> u64 {
        entry
            .cached_hash()
            .unwrap_or_else(|| self.hash_of(entry.key()))
    }

    /// Chain depth of the entry matching `key` within `bucket`, if any.
    fn find_depth<Q>(&self, bucket: usize, key: &Q) -> Option<usize>
    where
        E::Key: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut depth = 0;
        let mut entry = self.table[bucket].as_deref();
        while let Some(e) = entry {
            if e.key().borrow() == key {
                return Some(depth);
            }
            depth += 1;
            entry = e.next();
        }
        None
    }

    /// The entry stored under `key`, or `None`. Does not touch the table
    /// when it is empty.
    pub fn find<Q>(&self, key: &Q) -> Option<&E>
    where
        E::Key: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        if self.size == 0 {
            return None;
        }
        let hash = self.hash_of(key);
        let bucket = bucket_index(hash, self.table.len());
        let mut entry = self.table[bucket].as_deref();
        while let Some(e) = entry {
            if e.key().borrow() == key {
                return Some(e);
            }
            entry = e.next();
        }
        None
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        E::Key: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.find(key).is_some()
    }

    /// Inserts `key -> value` and returns the replaced entry, if any.
    ///
    /// On a key match, a freshly created entry takes over the matched
    /// entry's chain position (carrying its successor); the table never
    /// rebalances on replacement. On growth the new entry becomes its
    /// bucket's head and, when `rebalance_after` is set, the resize policy
    /// runs once afterwards.
    pub fn insert(&mut self, key: E::Key, value: E::Value, rebalance_after: bool) -> Option<E> {
        let hash = self.hash_of(&key);
        if self.table.is_empty() {
            self.resize(1);
            self.size += 1;
            self.table[0] = Some(Box::new(E::create(key, value, None, hash)));
            return None;
        }
        let bucket = bucket_index(hash, self.table.len());
        if let Some(depth) = self.find_depth(bucket, &key) {
            return Some(self.replace_at(bucket, depth, key, value, hash));
        }
        self.size += 1;
        let head = self.table[bucket].take();
        self.table[bucket] = Some(Box::new(E::create(key, value, head, hash)));
        if rebalance_after {
            self.rebalance();
        }
        None
    }

    /// Removes and returns the entry stored under `key`, rebalancing
    /// afterwards when requested.
    pub fn remove<Q>(&mut self, key: &Q, rebalance_after: bool) -> Option<E>
    where
        E::Key: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        if self.size == 0 {
            return None;
        }
        let hash = self.hash_of(key);
        let bucket = bucket_index(hash, self.table.len());
        let depth = self.find_depth(bucket, key)?;
        let removed = self.remove_at(bucket, depth);
        debug_assert!(removed.is_some());
        if rebalance_after {
            self.rebalance();
        }
        removed
    }

    /// Applies the resize policy for the current entry count.
    pub fn rebalance(&mut self) {
        self.resize(target_length(self.size, self.table.len()));
    }

    /// Rebuilds the table at an explicit length, redistributing every
    /// entry into its new bucket. Entries keep their identity; only their
    /// chain links are rewired.
    ///
    /// # Panics
    ///
    /// If `new_length` is neither zero nor a power of two, or if it is
    /// zero while entries are still live. Both checks run before the old
    /// table is touched, so a refused resize loses nothing.
    pub fn resize(&mut self, new_length: usize) {
        assert!(
            new_length == 0 || new_length.is_power_of_two(),
            "table length must be zero or a power of two, got {new_length}"
        );
        if new_length == self.table.len() {
            return;
        }
        assert!(
            new_length != 0 || self.size == 0,
            "cannot collapse a table holding {} entries",
            self.size
        );
        let old = std::mem::take(&mut self.table);
        self.table.resize_with(new_length, || None);
        for head in old {
            let mut chain = head;
            while let Some(mut entry) = chain {
                chain = entry.next_mut().take();
                let hash = self.entry_hash(&entry);
                let bucket = bucket_index(hash, new_length);
                *entry.next_mut() = self.table[bucket].take();
                self.table[bucket] = Some(entry);
            }
        }
    }

    /// Replaces the matched entry at `depth` with a fresh one carrying the
    /// old entry's successor, preserving its chain position.
    fn replace_at(
        &mut self,
        bucket: usize,
        depth: usize,
        key: E::Key,
        value: E::Value,
        hash: u64,
    ) -> E {
        let mut link = &mut self.table[bucket];
        for _ in 0..depth {
            link = link
                .as_mut()
                .expect("chain shorter than matched depth")
                .next_mut();
        }
        let mut old = link.take().expect("matched entry vanished");
        let next = old.next_mut().take();
        *link = Some(Box::new(E::create(key, value, next, hash)));
        *old
    }
}

/// Renders all entries. Diagnostic output only, not a stable format.
impl<E, S> fmt::Debug for ChainTable<E, S>
where
    E: TableEntry,
    E::Key: fmt::Debug,
    E::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|e| (e.key(), e.value())))
            .finish()
    }
}
