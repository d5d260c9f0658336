// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Result id generation
//!
//! Ids are drawn uniformly from the 62-symbol alphanumeric alphabet using
//! `rand::thread_rng()`, a ChaCha-based CSPRNG seeded from the OS.

use rand::distributions::Alphanumeric;
use rand::Rng;

use super::config::MIN_ID_LENGTH;

/// Produces collision-resistant result ids
#[derive(Debug, Clone)]
pub struct IdGenerator {
    length: usize,
}

impl IdGenerator {
    /// Create a generator producing ids of `length` symbols
    ///
    /// Lengths below the minimum are raised to it.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(MIN_ID_LENGTH),
        }
    }

    /// Length of the ids this generator produces
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a fresh id
    pub fn next_id(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(MIN_ID_LENGTH)
    }
}
