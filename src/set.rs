//! ChainSet: a key-only façade over [`ChainTable`]. Its entry carries no
//! separate value at all — the entry *is* the stored element, which is the
//! allocation-saving shape the [`TableEntry`] contract exists for.

use crate::cursor::Entries;
use crate::entry::{Link, TableEntry};
use crate::policy::target_length;
use crate::table::ChainTable;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Key, cached hash, chain link; the value slot is `()`.
pub(crate) struct SetEntry<K> {
    pub(crate) key: K,
    hash: u64,
    next: Link<Self>,
}

impl<K> TableEntry for SetEntry<K> {
    type Key = K;
    type Value = ();

    fn create(key: K, _value: (), next: Link<Self>, hash: u64) -> Self {
        SetEntry { key, hash, next }
    }
    fn key(&self) -> &K {
        &self.key
    }
    fn value(&self) -> &() {
        &()
    }
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }
    fn next_mut(&mut self) -> &mut Link<Self> {
        &mut self.next
    }
    fn into_pair(self) -> (K, ()) {
        (self.key, ())
    }
    fn cached_hash(&self) -> Option<u64> {
        Some(self.hash)
    }
}

/// A hash set that shrinks as elements are removed.
pub struct ChainSet<K, S = RandomState> {
    table: ChainTable<SetEntry<K>, S>,
}

impl<K> ChainSet<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K> Default for ChainSet<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: ChainTable::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Adds an element; returns whether it was newly inserted. Inserting a
    /// present element replaces it (relevant when `K` carries state its
    /// `Eq` ignores) and returns false.
    pub fn insert(&mut self, key: K) -> bool {
        let added = self.table.insert(key, (), false).is_none();
        if self.table.len() > self.table.capacity() {
            self.table.rebalance();
        }
        added
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.contains(key)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.find(key).map(|entry| &entry.key)
    }

    /// Removes an element; returns whether it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.take(key).is_some()
    }

    /// Removes and returns the stored element.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.remove(key, true).map(|entry| entry.key)
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        let wanted = self.len() + additional;
        let target = target_length(wanted, self.capacity());
        if target > self.capacity() {
            self.table.resize(target);
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.table.rebalance();
    }

    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K) -> bool,
    {
        let mut cursor = self.table.cursor();
        while let Some(entry) = cursor.next() {
            if !f(&entry.key) {
                cursor.remove();
            }
        }
        self.table.rebalance();
    }

    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            inner: self.table.entries(),
        }
    }
}

/// Iterator over `&K` in unspecified order.
pub struct Iter<'a, K> {
    inner: Entries<'a, SetEntry<K>>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|entry| &entry.key)
    }
}

/// Owning iterator over `K`.
pub struct IntoIter<K> {
    buckets: std::vec::IntoIter<Link<SetEntry<K>>>,
    chain: Link<SetEntry<K>>,
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        loop {
            if let Some(mut entry) = self.chain.take() {
                self.chain = entry.next_mut().take();
                return Some(entry.into_pair().0);
            }
            self.chain = self.buckets.next()?;
        }
    }
}

impl<K, S> IntoIterator for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter {
            buckets: self.table.into_buckets().into_iter(),
            chain: None,
        }
    }
}

impl<'a, K, S> IntoIterator for &'a ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K, S> Extend<K> for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K, S> FromIterator<K> for ChainSet<K, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::with_hasher(Default::default());
        set.extend(iter);
        set
    }
}

impl<K, S> fmt::Debug for ChainSet<K, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.table.entries().map(|entry| &entry.key))
            .finish()
    }
}
