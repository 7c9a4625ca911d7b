//! Time sources — the only place the engine may observe wall-clock time.
//!
//! `advance` stamps `updatedAt` from a `TimeSource`. Production code uses
//! `SystemClock`; tests inject `FixedClock` so the whole result is
//! reproducible byte for byte.

use crate::types::EpochMillis;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

pub trait TimeSource: Send + Sync {
    fn now_millis(&self) -> EpochMillis;

    /// Current time rendered as RFC 3339 UTC with millisecond precision.
    fn now_iso(&self) -> String {
        format_millis(self.now_millis())
    }
}

/// Real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(millis: EpochMillis) -> Self {
        Self { millis: AtomicI64::new(millis) }
    }

    pub fn set(&self, millis: EpochMillis) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance_by(&self, delta: EpochMillis) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl TimeSource for FixedClock {
    fn now_millis(&self) -> EpochMillis {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Render epoch milliseconds as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
/// Out-of-range values clamp to the Unix epoch.
pub fn format_millis(millis: EpochMillis) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
