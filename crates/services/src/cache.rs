use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lesson_core::model::LessonItem;

/// Default number of generated items kept for the process lifetime.
pub const DEFAULT_CAPACITY: usize = 200;

/// Bounded store of generated lesson items keyed by concept description.
///
/// Eviction is FIFO by insertion order. Reads never change an entry's
/// position, and overwriting an existing key keeps its original slot.
///
/// The cache is shared between the session and background prefetch tasks, so
/// it locks internally and every method takes `&self`.
#[derive(Debug)]
pub struct ConceptCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, Arc<LessonItem>>,
    order: VecDeque<String>,
}

impl ConceptCache {
    /// Create a cache that holds at most `capacity` items (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<LessonItem>> {
        self.lock().entries.get(key).cloned()
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn put(&self, key: impl Into<String>, item: Arc<LessonItem>) {
        let key = key.into();
        let mut inner = self.lock();
        if inner.entries.insert(key.clone(), item).is_some() {
            return;
        }
        inner.order.push_back(key);

        if inner.entries.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map and queue out of
    // step, so a poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ConceptCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::{LessonItem, LessonItemId};

    fn item(concept: &str) -> Arc<LessonItem> {
        Arc::new(LessonItem::new(
            LessonItemId::new_random(),
            concept,
            "What is this?",
            None,
            None,
        ))
    }

    #[test]
    fn evicts_first_inserted_when_over_capacity() {
        let cache = ConceptCache::new(200);
        for i in 0..201 {
            cache.put(format!("concept {i}"), item(&i.to_string()));
        }

        assert_eq!(cache.len(), 200);
        assert!(!cache.has("concept 0"));
        for i in 1..201 {
            assert!(cache.has(&format!("concept {i}")), "missing concept {i}");
        }
    }

    #[test]
    fn get_missing_key_is_none() {
        let cache = ConceptCache::default();
        assert!(cache.get("A real Horse").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn reads_do_not_refresh_eviction_order() {
        let cache = ConceptCache::new(2);
        cache.put("a", item("a"));
        cache.put("b", item("b"));
        for _ in 0..5 {
            let _ = cache.get("a");
        }
        cache.put("c", item("c"));

        assert!(!cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("c"));
    }

    #[test]
    fn overwrite_keeps_size_and_position() {
        let cache = ConceptCache::new(2);
        cache.put("a", item("first"));
        cache.put("b", item("b"));
        cache.put("a", item("second"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().concept(), "second");

        cache.put("c", item("c"));
        assert!(!cache.has("a"));
        assert!(cache.has("b"));
    }

    #[test]
    fn shares_items_instead_of_copying() {
        let cache = ConceptCache::new(4);
        let original = item("Horse");
        cache.put("A real Horse", Arc::clone(&original));
        let fetched = cache.get("A real Horse").unwrap();
        assert!(Arc::ptr_eq(&original, &fetched));
    }
}
