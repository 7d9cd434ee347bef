//! Conflict policies and writer configuration

use serde::{Deserialize, Serialize};

/// Retry budget used by [`ConflictPolicy::Default`] unless configured
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// What a writer does when its version-checked write is rejected
///
/// | Policy | Retries | Use when |
/// |--------|---------|----------|
/// | FailFast | 0 | Overwriting a concurrent change is unacceptable |
/// | RetryOnce | 1 | A single competing write is expected |
/// | RetryWithBudget(n) | n | Contention is higher |
/// | Default | `WriterConfig::retry_budget` | Let configuration decide |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConflictPolicy {
    /// Surface the first conflict to the caller
    FailFast,
    /// Refresh and retry once
    RetryOnce,
    /// Refresh and retry up to `n` times
    RetryWithBudget(u32),
    /// Use the writer's configured budget
    #[default]
    Default,
}

impl ConflictPolicy {
    /// Number of retries allowed after the first attempt
    pub fn retry_budget(&self, config: &WriterConfig) -> u32 {
        match self {
            ConflictPolicy::FailFast => 0,
            ConflictPolicy::RetryOnce => 1,
            ConflictPolicy::RetryWithBudget(n) => *n,
            ConflictPolicy::Default => config.retry_budget,
        }
    }
}

/// Where a writer gets fresh state after a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// Issue a new `get` against the store
    #[default]
    Reread,
    /// Use the snapshot carried by the conflict, skipping the read
    FromConflict,
}

/// Writer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Retries granted by [`ConflictPolicy::Default`]
    pub retry_budget: u32,
    /// Source of fresh state between attempts
    pub refresh: RefreshMode,
}

impl WriterConfig {
    /// Set the default retry budget
    pub fn retry_budget(mut self, budget: u32) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Set the refresh source
    pub fn refresh(mut self, refresh: RefreshMode) -> Self {
        self.refresh = refresh;
        self
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            retry_budget: DEFAULT_RETRY_BUDGET,
            refresh: RefreshMode::Reread,
        }
    }
}
