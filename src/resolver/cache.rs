use crate::error::FretResult;
use fnv::FnvHashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub instrument: String,
    pub melody: String,
    pub offset: i32,
    pub content: String,
}

/// SHA-256 of the value's JSON form, hex encoded.
pub fn content_signature<T: Serialize + ?Sized>(value: &T) -> FretResult<String> {
    let bytes = serde_json::to_vec(value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Bounded memo of resolved melodies. Oldest insertions are evicted first and
/// stored values are never modified.
#[derive(Debug)]
pub struct MelodyCache<V> {
    capacity: usize,
    entries: FnvHashMap<CacheKey, Arc<V>>,
    order: VecDeque<CacheKey>,
}

impl<V> MelodyCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FnvHashMap::default(),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.entries.get(key).cloned()
    }

    /// Stores `value` and hands back the shared copy. Re-inserting an existing
    /// key replaces the value but keeps its place in the eviction queue.
    pub fn insert(&mut self, key: CacheKey, value: V) -> Arc<V> {
        let value = Arc::new(value);
        if self.capacity == 0 {
            return value;
        }
        if self.entries.insert(key.clone(), value.clone()).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
