//! ChainMap: a key/value façade over [`ChainTable`] with a crate-provided
//! entry type that caches the key's spread hash.

use crate::cursor::Entries;
use crate::entry::{Link, TableEntry};
use crate::policy::target_length;
use crate::table::ChainTable;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// The map's entry: key, value, cached hash, chain link. Caching the hash
/// means a table rebuild never re-invokes `K: Hash`.
pub(crate) struct MapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
    next: Link<Self>,
}

impl<K, V> TableEntry for MapEntry<K, V> {
    type Key = K;
    type Value = V;

    fn create(key: K, value: V, next: Link<Self>, hash: u64) -> Self {
        MapEntry {
            key,
            value,
            hash,
            next,
        }
    }
    fn key(&self) -> &K {
        &self.key
    }
    fn value(&self) -> &V {
        &self.value
    }
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }
    fn next_mut(&mut self) -> &mut Link<Self> {
        &mut self.next
    }
    fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
    fn cached_hash(&self) -> Option<u64> {
        Some(self.hash)
    }
}

/// A hash map that shrinks as entries are removed.
///
/// Same lookup contract as `std::collections::HashMap` (borrowed `Q`
/// lookups, pluggable `S: BuildHasher`), but the bucket table follows the
/// crate's grow-*and*-shrink policy, so memory tracks the live contents.
/// Values are updated by reinsertion; there is deliberately no `get_mut`
/// (entries are immutable per version, see [`TableEntry`]).
pub struct ChainMap<K, V, S = RandomState> {
    table: ChainTable<MapEntry<K, V>, S>,
}

impl<K, V> ChainMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for ChainMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainMap<K, V, S>
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

    /// Current bucket count; zero for a collapsed table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Inserts `key -> value`, returning the previous value for the key.
    ///
    /// Grows when the entries outnumber the buckets but never shrinks, so
    /// a [`reserve`](Self::reserve) survives the fill that follows it.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let replaced = self
            .table
            .insert(key, value, false)
            .map(|entry| entry.into_pair().1);
        if self.table.len() > self.table.capacity() {
            self.table.rebalance();
        }
        replaced
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.find(key).map(|entry| &entry.value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.find(key).map(|entry| (&entry.key, &entry.value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.contains(key)
    }

    /// Removes a key, returning its value. The table shrinks eagerly.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.table.remove(key, true).map(TableEntry::into_pair)
    }

    /// Drops all entries but keeps the bucket table; pair with
    /// [`shrink_to_fit`](Self::shrink_to_fit) to release it.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Grows the table so `additional` more entries fit without resizing.
    /// Never shrinks.
    pub fn reserve(&mut self, additional: usize) {
        let wanted = self.len() + additional;
        let target = target_length(wanted, self.capacity());
        if target > self.capacity() {
            self.table.resize(target);
        }
    }

    /// Applies the resize policy immediately, collapsing an emptied map to
    /// zero buckets.
    pub fn shrink_to_fit(&mut self) {
        self.table.rebalance();
    }

    /// Keeps only the entries for which `f` returns true. Runs the resize
    /// policy once at the end.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut cursor = self.table.cursor();
        while let Some(entry) = cursor.next() {
            if !f(&entry.key, &entry.value) {
                cursor.remove();
            }
        }
        self.table.rebalance();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.entries(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }
}

/// Iterator over `(&K, &V)` in unspecified order.
pub struct Iter<'a, K, V> {
    inner: Entries<'a, MapEntry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|entry| (&entry.key, &entry.value))
    }
}

/// Owning iterator over `(K, V)`, draining bucket chains in place.
pub struct IntoIter<K, V> {
    buckets: std::vec::IntoIter<Link<MapEntry<K, V>>>,
    chain: Link<MapEntry<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        loop {
            if let Some(mut entry) = self.chain.take() {
                self.chain = entry.next_mut().take();
                return Some(entry.into_pair());
            }
            self.chain = self.buckets.next()?;
        }
    }
}

impl<K, V, S> IntoIterator for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            buckets: self.table.into_buckets().into_iter(),
            chain: None,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(Default::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> fmt::Debug for ChainMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.fmt(f)
    }
}
