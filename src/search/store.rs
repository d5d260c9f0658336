// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Insertion-ordered store of fetched result records

use std::collections::{HashMap, VecDeque};

use super::types::{ResultRecord, SearchError};

/// Mapping from synthesized ids to result records
///
/// Grows across searches for the lifetime of the provider. With a cap set,
/// the oldest records are evicted first.
#[derive(Debug, Default)]
pub struct ResultStore {
    records: HashMap<String, ResultRecord>,
    order: VecDeque<String>,
    max_entries: Option<usize>,
    evicted: u64,
}

/// Store statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Records currently held
    pub total: usize,
    /// Records dropped by the cap so far
    pub evicted: u64,
    /// Configured capacity
    pub max: Option<usize>,
}

impl ResultStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding at most `max_entries` records
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::default()
        }
    }

    /// Register a record under its id
    ///
    /// Records are immutable once stored; an existing id is never overwritten.
    pub fn insert(&mut self, record: ResultRecord) -> Result<(), SearchError> {
        if self.records.contains_key(&record.id) {
            return Err(SearchError::InvalidResponse {
                reason: format!("duplicate result id {}", record.id),
            });
        }

        if let Some(max) = self.max_entries {
            while self.records.len() >= max {
                self.evict_oldest();
            }
        }

        self.order.push_back(record.id.clone());
        self.records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Look up a record
    pub fn get(&self, id: &str) -> Option<&ResultRecord> {
        self.records.get(id)
    }

    /// Whether `id` is currently stored
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            total: self.len(),
            evicted: self.evicted,
            max: self.max_entries,
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.order.pop_front() {
            self.records.remove(&oldest);
            self.evicted += 1;
        }
    }
}
