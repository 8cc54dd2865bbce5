// SPDX-FileCopyrightText: 2026 BugMaster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-bounded cache of fetched artifact contents.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Maximum number of cached artifacts.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

struct Entry {
    stored_at: Instant,
    /// `None` records a missing artifact so repeated lookups stay cheap.
    content: Option<String>,
}

/// Artifact cache keyed by full URL.
pub struct ContentCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    max_entries: usize,
}

impl ContentCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Cached lookup. The outer `None` means a miss; the inner one a cached 404.
    pub fn get(&self, url: &str) -> Option<Option<String>> {
        {
            let entry = self.entries.get(url)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.content.clone());
            }
        }
        self.entries
            .remove_if(url, |_, e| e.stored_at.elapsed() >= self.ttl);
        None
    }

    pub fn insert(&self, url: &str, content: Option<String>) {
        if self.ttl.is_zero() {
            return;
        }
        if self.entries.len() >= self.max_entries {
            let ttl = self.ttl;
            self.entries.retain(|_, e| e.stored_at.elapsed() < ttl);
            if self.entries.len() >= self.max_entries {
                return;
            }
        }
        self.entries.insert(
            url.to_string(),
            Entry {
                stored_at: Instant::now(),
                content,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
