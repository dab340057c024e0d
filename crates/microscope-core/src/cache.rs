//! Memoization of shaped dashboard rows, owned by the caller.

use crate::model::DisplayRecord;
use crate::shaper::DashboardQuery;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

pub fn cache_key(query: &DashboardQuery, store_revision: i64) -> String {
    let mut h = Sha256::new();
    h.update(query.label.as_str().as_bytes());
    h.update(b"\n");
    h.update(query.scraped.as_str().as_bytes());
    h.update(b"\n");
    h.update(query.max_rows.to_string().as_bytes());
    h.update(b"\n");
    h.update(query.max_content_len.to_string().as_bytes());
    h.update(b"\n");
    h.update(store_revision.to_string().as_bytes());
    hex::encode(h.finalize())
}

/// Shaped rows keyed by query and store revision. A write to the store bumps
/// its revision, so stale entries are simply never hit again.
#[derive(Debug, Default)]
pub struct ShapeCache {
    entries: HashMap<String, Vec<DisplayRecord>>,
    capacity: Option<usize>,
}

impl ShapeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once `capacity` entries are held, inserting clears the cache first.
    /// A capacity of zero stores nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, query: &DashboardQuery, store_revision: i64) -> Option<&[DisplayRecord]> {
        self.entries
            .get(&cache_key(query, store_revision))
            .map(Vec::as_slice)
    }

    pub fn get_or_compute<E, F>(
        &mut self,
        query: &DashboardQuery,
        store_revision: i64,
        compute: F,
    ) -> Result<Vec<DisplayRecord>, E>
    where
        F: FnOnce() -> Result<Vec<DisplayRecord>, E>,
    {
        let key = cache_key(query, store_revision);
        if let Some(rows) = self.entries.get(&key) {
            tracing::debug!(key = %key, "dashboard cache hit");
            return Ok(rows.clone());
        }
        let rows = compute()?;
        match self.capacity {
            Some(0) => return Ok(rows),
            Some(cap) if self.entries.len() >= cap => self.entries.clear(),
            _ => {}
        }
        self.entries.insert(key, rows.clone());
        Ok(rows)
    }
}
