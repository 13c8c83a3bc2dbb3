//! Negative (and write-only positive) caching of separator/component outcomes.
//!
//! Keyed by a separator's [`EdgeSet::hash`]; each entry records the hashes of component edge
//! sets already known to fail (or succeed) under that separator. Concurrent search workers share
//! one cache behind a single `RwLock`, reading under a shared lock and writing under an
//! exclusive one — the same discipline the original used with a Go `sync.RWMutex`.
//!
//! `CheckPositive` in the original is provably dead: every call site only ever consults negative
//! results before recursing, and nothing ever short-circuits success from the positive side. We
//! keep `add_positive` (so the cache's write path stays symmetric with the original and a future
//! caller could use it) but `check_positive` is intentionally not exposed — see `SPEC_FULL.md`'s
//! resolved Open Questions for why this is preserved rather than "fixed".
use std::collections::HashMap;
use std::sync::RwLock;

use crate::edge::EdgeSet;
use crate::graph::Graph;

#[derive(Default)]
struct CompCache {
    succ: Vec<u64>,
    fail: Vec<u64>,
}

/// Shared negative/positive outcome cache, safe to hand out as `Arc<Cache>` to worker threads.
pub struct Cache {
    entries: RwLock<HashMap<u64, CompCache>>,
}

impl Cache {
    pub fn new() -> Self {
        Cache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// True if any of `comps` is already known to fail to decompose under `sep`.
    pub fn check_negative(&self, sep: &EdgeSet, comps: &[Graph]) -> bool {
        let entries = self.entries.read().expect("cache lock poisoned");
        match entries.get(&sep.hash()) {
            None => false,
            Some(entry) => comps
                .iter()
                .any(|c| entry.fail.contains(&c.edges.hash())),
        }
    }

    pub fn add_negative(&self, sep: &EdgeSet, comp: &Graph) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries
            .entry(sep.hash())
            .or_default()
            .fail
            .push(comp.edges.hash());
    }

    pub fn add_positive(&self, sep: &EdgeSet, comp: &Graph) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries
            .entry(sep.hash())
            .or_default()
            .succ
            .push(comp.edges.hash());
    }
}

impl Default for Cache {
    fn default() -> Self {
        Cache::new()
    }
}
