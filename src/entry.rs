//! The entry accessor contract: the engine stores whatever the caller
//! provides, as long as it can read a key, a value, and an owned chain
//! link through this trait.

/// An owned link to the next entry in a bucket chain.
pub type Link<E> = Option<Box<E>>;

/// Capability trait for entries stored in a [`ChainTable`](crate::ChainTable).
///
/// The engine manipulates entries exclusively through these methods, so an
/// entry can be a crate-provided pair (see `ChainMap`), a bare key (see
/// `ChainSet`), or the caller's own value object carrying its key and link
/// inline — saving the per-entry value allocation entirely.
///
/// Contract:
/// - `create` receives the already-spread hash of `key`. An entry that
///   keeps it must return it from [`cached_hash`](TableEntry::cached_hash)
///   so table rebuilds never re-invoke `Key: Hash`.
/// - Entries are immutable per version. On a value update the engine calls
///   `create` again and splices the fresh entry into the old one's chain
///   position; it never writes through [`value`](TableEntry::value).
/// - The `next` link is owned by the entry and only ever rewired by the
///   engine. An entry must not be inserted into two tables.
pub trait TableEntry: Sized {
    type Key;
    type Value;

    /// Builds a new entry. `hash` is the spread hash of `key`.
    fn create(key: Self::Key, value: Self::Value, next: Link<Self>, hash: u64) -> Self;

    fn key(&self) -> &Self::Key;

    fn value(&self) -> &Self::Value;

    /// The successor in this entry's bucket chain.
    fn next(&self) -> Option<&Self>;

    /// Mutable access to the chain link, used by the engine to splice.
    fn next_mut(&mut self) -> &mut Link<Self>;

    /// Decomposes a detached entry back into its key and value.
    fn into_pair(self) -> (Self::Key, Self::Value);

    /// The hash this entry was created with, if the entry stores it.
    /// Returning `None` makes table rebuilds rehash the key instead.
    fn cached_hash(&self) -> Option<u64> {
        None
    }
}
