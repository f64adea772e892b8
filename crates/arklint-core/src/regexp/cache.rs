//! Per-session memo of the group and backreference tables of each pattern.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::backrefs::{BackReference, compute_back_references};
use super::groups::{CaptureGroup, compute_capture_groups};

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// The scan results every classification of a pattern starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTables {
    pub groups: Vec<CaptureGroup>,
    pub backreferences: Vec<BackReference>,
}

impl PatternTables {
    pub fn compute(pattern: &str) -> Self {
        Self {
            groups: compute_capture_groups(pattern),
            backreferences: compute_back_references(pattern),
        }
    }
}

/// Which entry leaves the cache when it is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvictionPolicy {
    /// Drop the entry that was inserted first, regardless of use.
    #[default]
    #[serde(rename = "oldest")]
    OldestInserted,
    /// Drop the entry that was read or inserted least recently.
    LeastRecentlyUsed,
}

/// Bounded map from exact pattern text to its [`PatternTables`].
///
/// A capacity of zero turns caching off: every lookup recomputes.
#[derive(Debug)]
pub struct PatternCache {
    capacity: usize,
    policy: EvictionPolicy,
    entries: HashMap<String, Arc<PatternTables>>,
    order: VecDeque<String>,
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, EvictionPolicy::default())
    }
}

impl PatternCache {
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Self {
        Self {
            capacity,
            policy,
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)),
            order: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.contains_key(pattern)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn get_or_compute(&mut self, pattern: &str) -> Arc<PatternTables> {
        if self.capacity == 0 {
            return Arc::new(PatternTables::compute(pattern));
        }

        if let Some(tables) = self.entries.get(pattern).cloned() {
            if self.policy == EvictionPolicy::LeastRecentlyUsed {
                self.touch(pattern);
            }
            return tables;
        }

        while self.entries.len() >= self.capacity {
            let Some(evicted) = self.order.pop_front() else {
                break;
            };
            trace!(pattern = %evicted, "evicting cached pattern tables");
            self.entries.remove(&evicted);
        }

        let tables = Arc::new(PatternTables::compute(pattern));
        self.entries.insert(pattern.to_string(), Arc::clone(&tables));
        self.order.push_back(pattern.to_string());
        tables
    }

    fn touch(&mut self, pattern: &str) {
        let Some(position) = self.order.iter().position(|key| key == pattern) else {
            return;
        };
        if let Some(key) = self.order.remove(position) {
            self.order.push_back(key);
        }
    }
}
