// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sticky rate-limit state
//!
//! Once the remote API reports quota exhaustion the flag stays set for the
//! lifetime of the provider; there is no retry-after timer.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the remote API has signalled quota exhaustion
#[derive(Debug, Default)]
pub struct RateLimitState {
    tripped: AtomicBool,
}

impl RateLimitState {
    /// Create an untripped state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the quota has been exhausted
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }

    /// Mark the quota as exhausted
    ///
    /// Returns true only for the call that performed the transition.
    pub fn trip(&self) -> bool {
        !self.tripped.swap(true, Ordering::AcqRel)
    }
}
