use crate::event_repository::EventRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Interval-driven background refresh. Each tick forces a refresh only if
/// the cache has gone stale, so steady traffic from foreground callers
/// keeps this loop idle. Fetch failures are logged and the loop keeps
/// running; the repository guarantees the old snapshot survives them.
pub async fn run_auto_refresh(repository: Arc<EventRepository>, interval: Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if !repository.is_stale().await {
            debug!("cache still fresh, skipping auto-refresh");
            continue;
        }

        match repository.get_all(true).await {
            Ok(events) => info!(count = events.len(), "auto-refresh completed"),
            Err(err) => warn!("auto-refresh failed: {err}"),
        }
    }
}
