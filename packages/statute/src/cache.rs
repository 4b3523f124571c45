//! Memoizing wrapper around [`parse_with_config`].
//!
//! Entries are keyed by the exact input text and are immutable once stored.
//! They leave the cache only through [`ParseCache::evict`],
//! [`ParseCache::clear`], or oldest-first eviction when a capacity is set.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ParseConfig;
use crate::model::ParsedStatute;
use crate::parser::parse_with_config;

#[derive(Debug, Default)]
struct Entries {
    by_input: HashMap<String, Arc<ParsedStatute>>,
    /// Inputs in insertion order.
    order: VecDeque<String>,
}

/// Thread-safe cache of parse results.
#[derive(Debug, Default)]
pub struct ParseCache {
    config: ParseConfig,
    capacity: Option<usize>,
    entries: Mutex<Entries>,
}

impl ParseCache {
    /// Unbounded cache using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` documents.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Use `config` for every parse done through this cache.
    #[must_use]
    pub fn with_config(mut self, config: ParseConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse `xml`, reusing a stored result for identical input.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use roppo_statute::cache::ParseCache;
    ///
    /// let cache = ParseCache::new();
    /// let a = cache.get_or_parse("<Law><Article Num=\"1\"><Sentence>x</Sentence></Article></Law>");
    /// let b = cache.get_or_parse("<Law><Article Num=\"1\"><Sentence>x</Sentence></Article></Law>");
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn get_or_parse(&self, xml: &str) -> Arc<ParsedStatute> {
        if let Some(hit) = self.lock().by_input.get(xml) {
            tracing::debug!(bytes = xml.len(), "Parse cache hit");
            return Arc::clone(hit);
        }

        // Parse outside the lock; a concurrent miss on the same input keeps
        // whichever result was stored first.
        let parsed = Arc::new(parse_with_config(xml, &self.config));

        let mut entries = self.lock();
        if let Some(existing) = entries.by_input.get(xml) {
            return Arc::clone(existing);
        }
        entries.by_input.insert(xml.to_string(), Arc::clone(&parsed));
        entries.order.push_back(xml.to_string());

        if let Some(capacity) = self.capacity {
            while entries.order.len() > capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.by_input.remove(&oldest);
                    tracing::debug!(capacity, "Evicted oldest parse result");
                }
            }
        }

        parsed
    }

    /// Remove the entry for `xml`. Returns whether one was stored.
    pub fn evict(&self, xml: &str) -> bool {
        let mut entries = self.lock();
        entries.order.retain(|input| input != xml);
        entries.by_input.remove(xml).is_some()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.by_input.clear();
        entries.order.clear();
    }

    /// Number of stored results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().by_input.len()
    }

    /// Check whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        // Entries are only ever inserted whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
