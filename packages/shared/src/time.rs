//! Time helpers with a clock abstraction for testability.
//!
//! Timestamps are Unix milliseconds; they are rendered in JST for the HTTP API.

use chrono::{DateTime, FixedOffset, Utc};

/// JST is UTC+9.
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_millis: i64,
}

impl FixedClock {
    pub fn new(fixed_millis: i64) -> Self {
        Self { fixed_millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_millis
    }
}

/// Render a Unix millisecond timestamp as an RFC 3339 string in JST.
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn to_jst_rfc3339(timestamp_millis: i64) -> Option<String> {
    let offset = FixedOffset::east_opt(JST_OFFSET_SECS)?;
    let dt = DateTime::<Utc>::from_timestamp_millis(timestamp_millis)?;
    Some(dt.with_timezone(&offset).to_rfc3339())
}
