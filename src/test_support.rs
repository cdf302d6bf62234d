//! In-memory collaborator doubles for repository and router tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    cache::CacheStore,
    elastic::{Hit, SearchBackend},
    error::AppResult,
};

/// Cache double with a fake clock so TTL expiry is testable without
/// sleeping. `advance` moves the clock forward in whole seconds.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Vec<u8>, u64)>>,
    clock: AtomicU64,
    set_calls: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: AtomicU64::new(0),
            set_calls: AtomicUsize::new(0),
        }
    }

    pub fn advance(&self, seconds: u64) {
        self.clock.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    fn now(&self) -> u64 {
        self.clock.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| self.now() < *expires_at)
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> AppResult<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        let expires_at = self.now() + ttl_seconds;
        self.entries.lock().unwrap().insert(key.to_string(), (value.to_vec(), expires_at));
        Ok(())
    }

    async fn flush_all(&self) -> AppResult<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

/// Index double: point lookups read from a seeded document map, searches
/// pop pre-queued hit lists (FIFO) and record the query body they were
/// given so tests can assert the DSL shape.
pub struct StubIndex {
    docs: Mutex<HashMap<(String, String), Value>>,
    queued_hits: Mutex<VecDeque<Vec<Hit>>>,
    searches: Mutex<Vec<(String, Value)>>,
    doc_count: AtomicU64,
    get_calls: AtomicUsize,
}

impl StubIndex {
    pub fn new() -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            queued_hits: Mutex::new(VecDeque::new()),
            searches: Mutex::new(Vec::new()),
            doc_count: AtomicU64::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    pub fn put_doc(&self, index: &str, id: &str, source: Value) {
        self.docs.lock().unwrap().insert((index.to_string(), id.to_string()), source);
    }

    pub fn push_hits(&self, hits: Vec<Hit>) {
        self.queued_hits.lock().unwrap().push_back(hits);
    }

    pub fn set_count(&self, count: u64) {
        self.doc_count.store(count, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn last_search(&self) -> Option<(String, Value)> {
        self.searches.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SearchBackend for StubIndex {
    async fn get_source(&self, index: &str, id: &str) -> AppResult<Option<Value>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let docs = self.docs.lock().unwrap();
        Ok(docs.get(&(index.to_string(), id.to_string())).cloned())
    }

    async fn search(&self, index: &str, body: Value) -> AppResult<Vec<Hit>> {
        self.searches.lock().unwrap().push((index.to_string(), body));
        Ok(self.queued_hits.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn count(&self, index: &str) -> AppResult<u64> {
        let _ = index;
        Ok(self.doc_count.load(Ordering::SeqCst))
    }
}

pub fn hit(id: &str, source: Value) -> Hit {
    Hit { id: id.to_string(), source }
}
