use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{AppError, AppResult};

/// Cache keys for recommendation lists, one shape per service variant
///
/// The mock variant keys by name alone, so two users sharing a name but not
/// an age share an entry there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Mock { name: String },
    Hybrid { name: String, age: u32 },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Mock { name } => write!(f, "mock_{}", name),
            CacheKey::Hybrid { name, age } => write!(f, "user_{}_{}", name, age),
        }
    }
}

/// Bounded in-memory key/value store
///
/// When an insert of a new key would exceed `max_size`, every entry is
/// evicted before the insert. There is no time-based expiry.
///
/// All operations take one internal lock, so the evict-then-insert sequence
/// is atomic with respect to other callers.
#[derive(Debug)]
pub struct Cache<T> {
    entries: Mutex<HashMap<String, T>>,
    max_size: usize,
}

impl<T: Clone> Cache<T> {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_size: max_size.max(1),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, T>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a value, overwriting any existing entry for the key
    ///
    /// An absent value is rejected with [`AppError::InvalidArgument`].
    pub fn put(&self, key: impl Into<String>, value: impl Into<Option<T>>) -> AppResult<()> {
        let Some(value) = value.into() else {
            return Err(AppError::InvalidArgument(
                "Cannot cache an absent value".to_string(),
            ));
        };
        let key = key.into();

        let mut entries = self.lock();
        if entries.len() >= self.max_size && !entries.contains_key(&key) {
            tracing::debug!(
                evicted = entries.len(),
                max_size = self.max_size,
                "Cache full, evicting all entries"
            );
            entries.clear();
        }
        entries.insert(key, value);

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<T> {
        self.lock().remove(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl<T: Clone> Default for Cache<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_cache_key_display_mock() {
        let key = CacheKey::Mock {
            name: "Alice".to_string(),
        };
        assert_eq!(format!("{}", key), "mock_Alice");
    }

    #[test]
    fn test_cache_key_display_hybrid() {
        let key = CacheKey::Hybrid {
            name: "Alice".to_string(),
            age: 28,
        };
        assert_eq!(format!("{}", key), "user_Alice_28");
    }

    #[test]
    fn test_put_and_get() {
        let cache: Cache<Vec<i32>> = Cache::new(4);
        cache.put("a", vec![1, 2, 3]).unwrap();
        assert_eq!(cache.get("a"), Some(vec![1, 2, 3]));
        assert!(cache.contains("a"));
    }

    #[test]
    fn test_put_absent_value_rejected() {
        let cache: Cache<Vec<u8>> = Cache::new(4);
        let err = cache.put("a", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_missing_key() {
        let cache: Cache<String> = Cache::unbounded();
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_overwrite_existing_key() {
        let cache: Cache<i32> = Cache::new(4);
        cache.put("a", 1).unwrap();
        cache.put("a", 2).unwrap();
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_insert_at_capacity_evicts_everything() {
        let cache: Cache<i32> = Cache::new(3);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.put("c", 3).unwrap();
        assert_eq!(cache.size(), 3);

        cache.put("d", 4).unwrap();

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get("d"), Some(4));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_overwrite_at_capacity_keeps_entries() {
        let cache: Cache<i32> = Cache::new(2);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        cache.put("b", 3).unwrap();
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache: Cache<i32> = Cache::new(4);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.size(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_max_size_is_clamped() {
        let cache: Cache<i32> = Cache::new(0);
        assert_eq!(cache.max_size(), 1);
        cache.put("a", 1).unwrap();
        cache.put("b", 2).unwrap();
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_concurrent_puts_never_exceed_max_size() {
        let cache: Arc<Cache<i32>> = Arc::new(Cache::new(8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.put(format!("{}-{}", t, i), i).unwrap();
                        assert!(cache.size() <= 8);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.size() <= 8);
    }
}
