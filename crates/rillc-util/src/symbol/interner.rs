//! String interner implementation using DashMap for concurrent access.
//!
//! A single process-wide table maps strings to dense `u32` indices and
//! back. Strings are leaked on first interning to obtain `'static`
//! references; the table lives for the whole process and entries are never
//! removed, so this is safe and avoids lifetime plumbing through every
//! phase of the toolchain.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::LazyLock;

use ahash::RandomState;
use dashmap::DashMap;

use super::Symbol;

/// Global string table instance, initialized on first use.
pub(super) static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table.
///
/// Both directions of the mapping use `DashMap` keyed with `ahash`, so
/// concurrent interning from tests running in parallel never blocks on a
/// global lock.
pub(super) struct StringTable {
    /// string -> index
    map: DashMap<&'static str, u32, RandomState>,

    /// index -> string
    strings: DashMap<u32, &'static str, RandomState>,

    /// Next index to hand out.
    next_index: AtomicU32,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            next_index: AtomicU32::new(0),
        }
    }

    /// Intern `string`, allocating a new entry only on first sight.
    pub(super) fn intern(&self, string: &str) -> Symbol {
        if let Some(index) = self.map.get(string) {
            return Symbol::new(*index);
        }

        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = match self.map.entry(leaked) {
            dashmap::mapref::entry::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                let index = self.next_index.fetch_add(1, Ordering::Relaxed);
                vacant.insert(index);
                self.strings.insert(index, leaked);
                index
            }
        };
        Symbol::new(index)
    }

    /// Look up the string for `index`.
    ///
    /// Panics if `index` was not produced by this table; a `Symbol` can
    /// only be constructed through `intern`, so that cannot happen from
    /// safe code.
    pub(super) fn resolve(&self, index: u32) -> &'static str {
        *self
            .strings
            .get(&index)
            .unwrap_or_else(|| panic!("symbol index {index} not present in string table"))
    }
}
