//! Bounded least-recently-used cache keyed by normalized input

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// Thread-safe LRU cache. Capacity 0 disables caching entirely.
pub struct LruCache<V> {
    capacity: usize,
    inner: Mutex<LruInner<V>>,
}

struct LruInner<V> {
    /// key -> (last-use tick, value)
    entries: HashMap<String, (u64, V)>,
    /// last-use tick -> key, oldest first
    recency: BTreeMap<u64, String>,
    tick: u64,
}

impl<V> LruInner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(LruInner {
                entries: HashMap::with_capacity(capacity.min(4096)),
                recency: BTreeMap::new(),
                tick: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `key`, marking it most recently used
    pub fn get(&self, key: &str) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        let mut inner = self.inner.lock();
        let tick = inner.next_tick();
        let (old_tick, value) = {
            let entry = inner.entries.get_mut(key)?;
            let old = std::mem::replace(&mut entry.0, tick);
            (old, entry.1.clone())
        };
        inner.recency.remove(&old_tick);
        inner.recency.insert(tick, key.to_string());
        Some(value)
    }

    /// Insert or replace `key`, evicting the least recently used entry when full
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }

        let key = key.into();
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if let Some((old_tick, _)) = inner.entries.insert(key.clone(), (tick, value)) {
            inner.recency.remove(&old_tick);
        } else if inner.entries.len() > self.capacity {
            if let Some((_, oldest)) = inner.recency.pop_first() {
                inner.entries.remove(&oldest);
            }
        }
        inner.recency.insert(tick, key);
    }
}
