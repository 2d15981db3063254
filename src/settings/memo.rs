//! Identity-keyed memoization for settings subtrees.
//!
//! The host may rebuild the settings tree on every keystroke. Because the
//! reducer keeps the `Arc` of every signal entry it did not touch, a subtree
//! only needs rebuilding when its source `Arc` changed. `IdentityCache` keys
//! entries by the address of the source allocation plus a small extra key
//! (index, flags), and holds a `Weak` to the source.
//!
//! The `Weak` keeps the allocation (not the value) alive, so an address that
//! is still present in the cache can never be handed out to a different
//! `Arc`. Entries whose source has been dropped are removed by [`prune`].
//!
//! [`prune`]: IdentityCache::prune

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Weak};

struct Entry<T: ?Sized, V> {
    source: Weak<T>,
    value: V,
}

/// Cache from (extra key, source identity) to a derived value
pub struct IdentityCache<K, T: ?Sized, V> {
    entries: HashMap<(K, usize), Entry<T, V>>,
    hits: u64,
    misses: u64,
}

impl<K, T: ?Sized, V> Default for IdentityCache<K, T, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<K, T, V> IdentityCache<K, T, V>
where
    K: Eq + Hash,
    T: ?Sized,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `source`, building it on a miss
    pub fn get_or_insert_with(&mut self, key: K, source: &Arc<T>, build: impl FnOnce() -> V) -> V {
        let slot = (key, address_of(source));
        if let Some(entry) = self.entries.get(&slot) {
            if entry.source.strong_count() > 0 {
                self.hits += 1;
                return entry.value.clone();
            }
        }

        self.misses += 1;
        let value = build();
        self.entries.insert(
            slot,
            Entry {
                source: Arc::downgrade(source),
                value: value.clone(),
            },
        );
        value
    }

    /// Drop entries whose source is gone
    pub fn prune(&mut self) {
        self.entries.retain(|_, entry| entry.source.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[inline]
fn address_of<T: ?Sized>(source: &Arc<T>) -> usize {
    Arc::as_ptr(source) as *const () as usize
}
