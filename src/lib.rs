//! chainmap: a single-threaded, low-footprint chained hash table whose
//! entries are caller-defined, so an entry can double as the stored value.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the map/set containers in safe, verifiable layers so each
//!   piece can be reasoned about independently.
//! - Layers:
//!   - policy: pure arithmetic — the grow/shrink table-length rule, the
//!     avalanche hash mix, and the power-of-two bucket mask.
//!   - TableEntry: the capability trait every stored entry supplies (key,
//!     value, owned next link, constructor, optional cached hash). The
//!     engine never assumes a concrete entry layout.
//!   - ChainTable<E, S>: the engine — a `Vec` of singly linked entry
//!     chains with eager, inline resizing in both directions.
//!   - Entries / Cursor: lazy bucket-by-bucket traversal; the cursor
//!     additionally removes the last-yielded entry without disturbing the
//!     not-yet-visited remainder.
//!   - ChainMap<K, V, S> / ChainSet<K, S>: public façades with
//!     crate-provided entry types that cache the key's hash.
//!
//! Constraints
//! - Single-threaded: all mutation goes through `&mut self`; no atomics,
//!   no internal locking.
//! - The table length is always zero or a power of two, and after a
//!   rebalance it stays within `[size, 2 * size]`. The table shrinks as
//!   entries are removed, which keeps the memory footprint proportional
//!   to the live contents rather than to a historical high-water mark.
//! - Entries are immutable per version: updating a key's value splices a
//!   freshly created entry into the old entry's chain position instead of
//!   mutating in place. Callers whose entry type *is* the value rely on
//!   this for exclusive ownership of replaced entries.
//!
//! Why this split?
//! - Localize invariants: the policy functions are pure and testable in
//!   isolation; the engine owns exactly one data structure; the façades
//!   only translate between `(K, V)` pairs and entries.
//! - Clear failure boundaries: the engine only invokes user code via
//!   `K: Hash`/`Eq` during probing and via `TableEntry::create` while the
//!   structure is already consistent.
//!
//! Hasher and rehashing invariants
//! - Hashing uses a pluggable `S: BuildHasher` (default `RandomState`),
//!   followed by a fixed xor-shift avalanche mix that spreads high bits
//!   into the power-of-two mask. The façade entry types store the mixed
//!   hash, so `K: Hash` is never re-invoked when the table is rebuilt.
//!
//! Notes and non-goals
//! - Iteration order is unspecified and changes across resizes.
//! - The cursor is fail-unsafe: mutating the table through the core API
//!   (rather than `Cursor::remove`) mid-traversal leaves the remaining
//!   order undefined. No generation counter is maintained.
//! - No persistence and no stable serialized form; the `Debug` rendering
//!   of the containers is diagnostic output only. (The optional `serde`
//!   feature serializes the *contents*, not the table shape.)

mod cursor;
mod entry;
mod map;
pub mod policy;
mod set;
mod table;
mod table_proptest;

#[cfg(feature = "serde")]
mod serde_impls;

// Public surface
pub use cursor::{Cursor, Entries};
pub use entry::{Link, TableEntry};
pub use map::ChainMap;
pub use set::ChainSet;
pub use table::ChainTable;
