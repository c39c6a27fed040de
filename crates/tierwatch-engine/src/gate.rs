//! Staleness and dwell-window gating.
//!
//! Two independent questions over the same age computation. "Is this a
//! new scale-up event?" protects against stale bookkeeping: a watchdog
//! restarted long after Atlas scaled a shard up must not revert a change
//! that may be serving active load — the first sighting always restarts
//! the dwell clock. "Has the dwell window elapsed?" is the ordinary
//! cool-down and is only consulted once the event is known to be old
//! news.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a bookkeeping timestamp.
///
/// Accepts RFC 3339 (with `Z` or a numeric offset) and, for hand-edited
/// fleet files, a naive ISO timestamp assumed to be UTC. `None` for
/// anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// The two time gates of the decision state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StalenessGate {
    /// Age beyond which a recorded timestamp no longer describes the
    /// current scale-up.
    pub new_event_threshold_hours: f64,
    /// Minimum age before a revert may proceed.
    pub min_dwell_hours: f64,
}

impl StalenessGate {
    /// Hours between `now` and the recorded change. `None` when the
    /// timestamp is absent or unparseable — treated as infinitely old by
    /// both gates.
    pub fn age_hours(&self, now: DateTime<Utc>, last_change: Option<&str>) -> Option<f64> {
        let parsed = parse_timestamp(last_change?)?;
        Some((now - parsed).num_seconds() as f64 / 3600.0)
    }

    /// True iff the current scale-up has not been observed by this tool
    /// before: no usable timestamp, or one old enough that it must
    /// describe an earlier oscillation.
    pub fn is_new_event(&self, now: DateTime<Utc>, last_change: Option<&str>) -> bool {
        match self.age_hours(now, last_change) {
            Some(age) => age >= self.new_event_threshold_hours,
            None => true,
        }
    }

    /// True iff the dwell window has elapsed (equality counts). Only
    /// meaningful after [`is_new_event`] returned false.
    ///
    /// [`is_new_event`]: StalenessGate::is_new_event
    pub fn dwell_satisfied(&self, now: DateTime<Utc>, last_change: Option<&str>) -> bool {
        match self.age_hours(now, last_change) {
            Some(age) => age >= self.min_dwell_hours,
            None => true,
        }
    }
}
