//! Bounded memoizing cache for fetch results.
//!
//! The reference deployment memoized every external call behind size-bounded
//! caches (200 panel entries, 500 term details, 100 disorder lists). Here the
//! cache is an explicit injected object so tests start from a known empty
//! state. Invalidation is coarse: a scheduled refresh clears everything, there
//! is no targeted eviction beyond LRU capacity pressure.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::hash::Hash;
use std::sync::Mutex;

struct Inner<K, V> {
    map: HashMap<K, V>,
    /// Access order, least-recent first. Touched on get and insert.
    order: VecDeque<K>,
}

/// Concurrent, size-bounded, LRU-evicting cache of cloneable values.
pub struct BoundedCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().expect("cache lock");
        let hit = inner.map.get(key).cloned();
        if hit.is_some() {
            touch(&mut inner.order, key);
        }
        hit
    }

    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock().expect("cache lock");
        if inner.map.insert(key.clone(), value).is_none() {
            inner.order.push_back(key);
        } else {
            touch(&mut inner.order, &key);
        }
        while inner.map.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_front() {
                inner.map.remove(&evicted);
            }
        }
    }

    /// Memoize `fetch` for `key`. The lock is not held across the fetch, so
    /// two concurrent misses for the same key may fetch twice; last write
    /// wins, which is safe for idempotent lookups.
    pub fn get_or_fetch<F>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        let value = fetch();
        self.insert(key, value.clone());
        value
    }

    /// Coarse invalidation: drop everything (scheduled refresh path).
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("cache lock");
        inner.map.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache lock").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn touch<K: Eq>(order: &mut VecDeque<K>, key: &K) {
    if let Some(pos) = order.iter().position(|k| k == key) {
        if let Some(k) = order.remove(pos) {
            order.push_back(k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn get_or_fetch_memoizes() {
        let cache: BoundedCache<u32, String> = BoundedCache::new(10);
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_fetch(7, || {
            calls.fetch_add(1, Ordering::SeqCst);
            "panel-7".to_string()
        });
        let second = cache.get_or_fetch(7, || {
            calls.fetch_add(1, Ordering::SeqCst);
            "should-not-run".to_string()
        });

        assert_eq!(first, "panel-7");
        assert_eq!(second, "panel-7");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        // Touch 1 so 2 becomes the eviction candidate.
        assert_eq!(cache.get(&1), Some(10));
        cache.insert(3, 30);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(10));
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some(30));
    }

    #[test]
    fn clear_drops_all_entries() {
        let cache: BoundedCache<String, u32> = BoundedCache::new(5);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn reinsert_updates_value_without_growth() {
        let cache: BoundedCache<u32, u32> = BoundedCache::new(3);
        cache.insert(1, 10);
        cache.insert(1, 11);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(11));
    }

    #[test]
    fn concurrent_access_is_safe() {
        let cache: Arc<BoundedCache<u32, u32>> = Arc::new(BoundedCache::new(50));
        let mut handles = vec![];
        for t in 0..8u32 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100u32 {
                    cache.insert(i % 40, t * 1000 + i);
                    let _ = cache.get(&(i % 40));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 50);
    }
}
