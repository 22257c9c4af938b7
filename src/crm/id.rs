//! Identifier and timestamp generation for new records.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Return a new record identifier derived from the current time in
/// milliseconds. Identifiers are strictly increasing within the process, so
/// two calls in the same millisecond still yield distinct values.
///
pub fn generate_id() -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Return the current time as an RFC 3339 timestamp with millisecond
/// precision.
///
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Return today's date as `YYYY-MM-DD`.
///
pub fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
