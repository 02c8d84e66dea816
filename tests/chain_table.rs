// ChainTable engine test suite, exercised through the public TableEntry
// contract with a caller-defined entry type.
//
// The entry used here is the "entry doubles as value" shape the engine
// exists for: `Session` is a domain object that carries its own key, its
// payload, the chain link, and the cached hash inline, so storing it in a
// table costs no extra allocation beyond the entry itself.
//
// Core invariants exercised:
// - Capacity follows the resize policy on growth and only moves on
//   removal when a rebalance is requested.
// - A key occupies at most one entry; updates replace in place (chain
//   position preserved) and hand back the previous entry.
// - A full cursor sweep visits each live entry exactly once and its
//   `remove` never disturbs the unvisited remainder.

use chainmap::{ChainTable, Link, TableEntry};

struct Session {
    user: String,
    hits: u32,
    hash: u64,
    next: Link<Session>,
}

impl TableEntry for Session {
    type Key = String;
    type Value = u32;

    fn create(user: String, hits: u32, next: Link<Self>, hash: u64) -> Self {
        Session {
            user,
            hits,
            hash,
            next,
        }
    }
    fn key(&self) -> &String {
        &self.user
    }
    fn value(&self) -> &u32 {
        &self.hits
    }
    fn next(&self) -> Option<&Self> {
        self.next.as_deref()
    }
    fn next_mut(&mut self) -> &mut Link<Self> {
        &mut self.next
    }
    fn into_pair(self) -> (String, u32) {
        (self.user, self.hits)
    }
    fn cached_hash(&self) -> Option<u64> {
        Some(self.hash)
    }
}

fn session_table() -> ChainTable<Session> {
    ChainTable::new()
}

// Scenario: inserting the first five keys with rebalancing drives the
// table length through 0 -> 1 -> 2 -> 4 -> 4 -> 8.
#[test]
fn table_length_transitions() {
    let mut t = session_table();
    assert_eq!(t.capacity(), 0);
    let mut lengths = vec![t.capacity()];
    for k in 1..=5u32 {
        t.insert(format!("user{k}"), k, true);
        lengths.push(t.capacity());
    }
    assert_eq!(lengths, [0, 1, 2, 4, 4, 8]);
}

// Scenario: inserting the same key twice keeps the size at one and the
// lookup observes the latest value.
#[test]
fn same_key_twice() {
    let mut t = session_table();
    assert!(t.insert("a".to_string(), 1, true).is_none());
    let old = t.insert("a".to_string(), 2, true).expect("replaced entry");
    assert_eq!(old.into_pair(), ("a".to_string(), 1));
    assert_eq!(t.len(), 1);
    assert_eq!(t.find("a").map(|s| s.hits), Some(2));
}

// Scenario: removing every entry without rebalancing leaves the table
// length untouched; the explicit rebalance then collapses it to zero.
#[test]
fn removal_defers_shrink_until_rebalance() {
    let mut t = session_table();
    for k in 0..5u32 {
        t.insert(format!("user{k}"), k, true);
    }
    let length = t.capacity();
    for k in 0..5u32 {
        assert!(t.remove(format!("user{k}").as_str(), false).is_some());
        assert_eq!(t.capacity(), length, "length must not move");
    }
    assert_eq!(t.len(), 0);
    t.rebalance();
    assert_eq!(t.capacity(), 0);
}

// Scenario: insert 100 keys, sweep with the cursor removing every entry
// at an even position. Half survive; lookups agree entry by entry.
#[test]
fn cursor_sweep_removes_even_positions() {
    let mut t = session_table();
    for k in 0..100u32 {
        t.insert(format!("user{k}"), k, true);
    }

    let mut removed = Vec::new();
    let mut position = 0usize;
    let mut cursor = t.cursor();
    while let Some(session) = cursor.next() {
        let hits = session.hits;
        if position % 2 == 0 {
            let gone = cursor.remove().expect("current entry");
            assert_eq!(gone.hits, hits);
            removed.push(hits);
        }
        position += 1;
    }
    drop(cursor);

    assert_eq!(position, 100);
    assert_eq!(removed.len(), 50);
    assert_eq!(t.len(), 50);
    for k in 0..100u32 {
        let found = t.find(format!("user{k}").as_str()).is_some();
        assert_eq!(found, !removed.contains(&k), "user{k}");
    }
}

// Size consistency: the entry count always equals what a full iteration
// produces, through a mixed workload.
#[test]
fn len_matches_full_iteration() {
    let mut t = session_table();
    for k in 0..50u32 {
        t.insert(format!("user{k}"), k, true);
        if k % 3 == 0 {
            t.remove(format!("user{}", k / 2).as_str(), true);
        }
        assert_eq!(t.len(), t.entries().count());
    }
}

// Capacity bounds: after any workload followed by a rebalance, the length
// is within [size, 2 * size], or zero for an empty table.
#[test]
fn rebalanced_capacity_bounds() {
    let mut t = session_table();
    for k in 0..200u32 {
        t.insert(format!("user{k}"), k, true);
    }
    for k in 0..150u32 {
        t.remove(format!("user{k}").as_str(), false);
    }
    t.rebalance();
    let (len, cap) = (t.len(), t.capacity());
    assert_eq!(len, 50);
    assert!(cap >= len && cap <= len * 2, "len={len} cap={cap}");

    for k in 0..200u32 {
        t.remove(format!("user{k}").as_str(), false);
    }
    t.rebalance();
    assert_eq!(t.capacity(), 0);
}

// The cached hash is honored across rebuilds: entries stay findable after
// explicit resizes in both directions.
#[test]
fn cached_hash_survives_rebuilds() {
    let mut t = session_table();
    for k in 0..30u32 {
        t.insert(format!("user{k}"), k, true);
    }
    t.resize(512);
    t.resize(32);
    for k in 0..30u32 {
        assert_eq!(t.find(format!("user{k}").as_str()).map(|s| s.hits), Some(k));
    }
}
