//! Elapsed-time helpers shared by the resolver and the persistence layer.

use chrono::{DateTime, Utc};

/// Whole real minutes from `from` to `to`, floored. Negative spans yield 0.
pub fn elapsed_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from(to.signed_duration_since(from).num_minutes()).unwrap_or(0)
}
