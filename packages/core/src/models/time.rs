//! Time Provider Abstraction
//!
//! Trait-based clock so services stamp `created_at`/`updated_at` through
//! an injectable source and time-dependent tests stay deterministic.

use chrono::{DateTime, Utc};

/// Trait for providing current time.
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider using the actual system clock.
///
/// Default implementation for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed time provider for deterministic tests.
///
/// Unlike `SystemTimeProvider`, the reported time only moves when
/// `advance` is called.
#[derive(Debug)]
pub struct FixedTimeProvider {
    current: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedTimeProvider {
    /// Create a provider pinned to the given instant.
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            current: std::sync::Mutex::new(time),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut current = self.current.lock().unwrap();
        *current += duration;
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap()
    }
}
