//! Time source for cache expiry.
//!
//! The fetcher never reads the wall clock directly; it asks a `Clock`. Production
//! code uses `SystemClock`, tests drive a `ManualClock` to step over TTL
//! boundaries without sleeping.

use std::sync::atomic::{AtomicI64, Ordering};

pub trait Clock: Send + Sync {
    /// Current time in unix seconds.
    fn now_unix(&self) -> i64;
}

/// Wall clock (UTC).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(ts_unix: i64) -> Self {
        Self {
            now: AtomicI64::new(ts_unix),
        }
    }

    pub fn set(&self, ts_unix: i64) {
        self.now.store(ts_unix, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
