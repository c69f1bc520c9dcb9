//! Bounded, insertion-ordered memo tables.
//!
//! Eviction removes the entry that was inserted earliest. `get` does not
//! refresh an entry's position, so this is FIFO rather than LRU: a hot key
//! inserted long ago is still the first to go.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

/// Source-language sentinel used in cache keys when the source is unknown.
pub const AUTO_SOURCE: &str = "auto";

/// Key for one memoised translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    text: String,
    target: String,
    source: String,
}

impl CacheKey {
    pub fn new(text: &str, target: &str, source: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            target: target.to_string(),
            source: source.unwrap_or(AUTO_SOURCE).to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.text, self.target, self.source)
    }
}

struct Entries<K, V> {
    values: HashMap<K, V>,
    order: VecDeque<K>,
}

/// Fixed-capacity map with oldest-inserted eviction.
///
/// Safe to share between tasks; every operation takes a short internal lock
/// and never holds it across an `.await`.
pub struct BoundedCache<K, V> {
    capacity: usize,
    entries: Mutex<Entries<K, V>>,
}

/// Cache of single-text translations.
pub type TranslationCache = BoundedCache<CacheKey, String>;

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A cache holding at most `capacity` entries. A capacity of zero stores
    /// nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries {
                values: HashMap::with_capacity(capacity.min(1024)),
                order: VecDeque::with_capacity(capacity.min(1024)),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries<K, V>> {
        // A panic while holding the lock cannot leave the map half-updated in
        // a way that matters for a memo table, so keep serving.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.lock().values.get(key).cloned()
    }

    /// Insert `value` under `key`.
    ///
    /// Re-inserting an existing key replaces its value but keeps its original
    /// position in the eviction queue. A new key evicts the oldest entry when
    /// the cache is full.
    pub fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut entries = self.lock();
        if let Some(existing) = entries.values.get_mut(&key) {
            *existing = value;
            return;
        }

        while entries.values.len() >= self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.values.remove(&oldest);
                }
                None => break,
            }
        }

        entries.order.push_back(key.clone());
        entries.values.insert(key, value);
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.values.clear();
        entries.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(text: &str) -> CacheKey {
        CacheKey::new(text, "es", None)
    }

    // ==================== CacheKey Tests ====================

    #[test]
    fn test_cache_key_uses_auto_sentinel() {
        assert_eq!(CacheKey::new("Hello", "fr", None).to_string(), "Hello:fr:auto");
        assert_eq!(CacheKey::new("Hello", "fr", Some("en")).to_string(), "Hello:fr:en");
    }

    #[test]
    fn test_cache_key_distinguishes_languages() {
        assert_ne!(CacheKey::new("Hi", "fr", None), CacheKey::new("Hi", "de", None));
        assert_ne!(
            CacheKey::new("Hi", "fr", Some("en")),
            CacheKey::new("Hi", "fr", None)
        );
    }

    // ==================== Basic Operations ====================

    #[test]
    fn test_get_missing_returns_none() {
        let cache = TranslationCache::new(4);
        assert_eq!(cache.get(&key("nothing")), None);
    }

    #[test]
    fn test_put_then_get() {
        let cache = TranslationCache::new(4);
        cache.put(key("Hello"), "Hola".to_string());
        assert_eq!(cache.get(&key("Hello")), Some("Hola".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_empties_cache() {
        let cache = TranslationCache::new(4);
        cache.put(key("a"), "A".to_string());
        cache.put(key("b"), "B".to_string());
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = TranslationCache::new(0);
        cache.put(key("a"), "A".to_string());
        assert!(cache.is_empty());
    }

    // ==================== Eviction Tests ====================

    #[test]
    fn test_overflow_evicts_first_inserted() {
        let cache = TranslationCache::new(3);
        cache.put(key("a"), "A".to_string());
        cache.put(key("b"), "B".to_string());
        cache.put(key("c"), "C".to_string());
        cache.put(key("d"), "D".to_string());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&key("a")), None);
        assert_eq!(cache.get(&key("b")), Some("B".to_string()));
        assert_eq!(cache.get(&key("d")), Some("D".to_string()));
    }

    #[test]
    fn test_get_does_not_refresh_position() {
        let cache = TranslationCache::new(2);
        cache.put(key("a"), "A".to_string());
        cache.put(key("b"), "B".to_string());

        // Reading "a" would save it under LRU; insertion order still evicts it
        assert!(cache.get(&key("a")).is_some());
        cache.put(key("c"), "C".to_string());

        assert_eq!(cache.get(&key("a")), None);
        assert!(cache.get(&key("b")).is_some());
    }

    #[test]
    fn test_reinsert_updates_value_without_evicting() {
        let cache = TranslationCache::new(2);
        cache.put(key("a"), "A".to_string());
        cache.put(key("b"), "B".to_string());
        cache.put(key("a"), "A2".to_string());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key("a")), Some("A2".to_string()));
        assert!(cache.get(&key("b")).is_some());

        // "a" keeps its original (oldest) slot
        cache.put(key("c"), "C".to_string());
        assert_eq!(cache.get(&key("a")), None);
    }

    #[test]
    fn test_generic_cache_works_for_other_values() {
        let cache: BoundedCache<String, u32> = BoundedCache::new(1);
        cache.put("x".to_string(), 1);
        cache.put("y".to_string(), 2);
        assert_eq!(cache.get(&"x".to_string()), None);
        assert_eq!(cache.get(&"y".to_string()), Some(2));
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_n_plus_one_evicts_exactly_first(capacity in 1usize..32) {
            let cache: BoundedCache<usize, usize> = BoundedCache::new(capacity);
            for i in 0..=capacity {
                cache.put(i, i * 10);
            }

            prop_assert_eq!(cache.len(), capacity);
            prop_assert_eq!(cache.get(&0), None);
            for i in 1..=capacity {
                prop_assert_eq!(cache.get(&i), Some(i * 10));
            }
        }

        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 1usize..16,
            keys in proptest::collection::vec(0usize..64, 0..200),
        ) {
            let cache: BoundedCache<usize, usize> = BoundedCache::new(capacity);
            for k in keys {
                cache.put(k, k);
                prop_assert!(cache.len() <= capacity);
            }
        }
    }
}
