//! Global string table backing [`Symbol`](super::Symbol).
//!
//! The table is fully thread-safe: lookups and inserts go through `DashMap`
//! shards keyed with `ahash`, so concurrent parses never block each other on
//! interning. Interned strings are leaked to obtain `'static` references -
//! the table lives for the whole process, strings are never removed, and the
//! total volume of unique identifiers in a compilation is small.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use ahash::RandomState;
use dashmap::DashMap;

/// Global string table instance, initialized on first use.
pub(super) static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table.
pub(super) struct StringTable {
    /// string -> symbol index.
    forward: DashMap<&'static str, u32, RandomState>,

    /// symbol index -> string, for `Symbol::as_str`.
    reverse: DashMap<u32, &'static str, RandomState>,

    /// Next free index.
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            forward: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            reverse: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            next_index: AtomicU32::new(0),
        }
    }

    /// Intern a string, returning its index.
    pub(super) fn intern(&self, string: &str) -> u32 {
        if let Some(index) = self.forward.get(string) {
            return *index;
        }

        // Miss: allocate a 'static copy. A lost race leaks one duplicate
        // allocation but both threads observe the same index.
        let owned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = *self
            .forward
            .entry(owned)
            .or_insert_with(|| self.next_index.fetch_add(1, Ordering::Relaxed));
        self.reverse.entry(index).or_insert(owned);
        index
    }

    /// Look up the string for an index.
    pub(super) fn get(&self, index: u32) -> Option<&'static str> {
        self.reverse.get(&index).map(|s| *s)
    }
}
