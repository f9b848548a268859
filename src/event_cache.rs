use crate::event::EnrichedEvent;
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_CACHE_TTL_SECS: i64 = 5 * 60;

/// Single-slot snapshot store for the enriched event list.
///
/// A write fully replaces the snapshot and stamps the fetch time; failed
/// fetches never touch it, so callers always see either the previous
/// complete snapshot or the new one, never a mix.
pub struct EventCache {
    events: Vec<EnrichedEvent>,
    fetched_at: Option<DateTime<Utc>>,
    invalidated: bool,
    ttl: Duration,
}

impl EventCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            events: Vec::new(),
            fetched_at: None,
            invalidated: false,
            ttl,
        }
    }

    /// Last stored snapshot; empty if never populated.
    pub fn get(&self) -> Vec<EnrichedEvent> {
        self.events.clone()
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    /// Staleness against an explicit clock reading. Never-populated and
    /// explicitly invalidated entries are always stale.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        if self.invalidated {
            return true;
        }
        match self.fetched_at {
            Some(fetched_at) => now - fetched_at >= self.ttl,
            None => true,
        }
    }

    /// Replace the snapshot after a real network fetch.
    pub fn set(&mut self, events: Vec<EnrichedEvent>) {
        self.set_at(events, Utc::now());
    }

    pub fn set_at(&mut self, events: Vec<EnrichedEvent>, fetched_at: DateTime<Utc>) {
        self.events = events;
        self.fetched_at = Some(fetched_at);
        self.invalidated = false;
    }

    /// Force the next staleness check to report stale regardless of age.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new()
    }
}
