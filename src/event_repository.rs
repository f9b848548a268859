use crate::clients::{EventsApi, FetchError};
use crate::enrichment::enrich_event;
use crate::event::EnrichedEvent;
use crate::event_cache::EventCache;
use crate::locator::GeoLocator;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Serves enriched events through the staleness-aware cache.
///
/// The fresh-cache fast path of `get_all` is the main perceived-latency
/// optimization: it issues no network call at all. A failed fetch leaves
/// the previous snapshot untouched so callers can degrade gracefully.
pub struct EventRepository {
    api: Arc<dyn EventsApi>,
    locator: Arc<GeoLocator>,
    cache: Mutex<EventCache>,
}

impl EventRepository {
    pub fn new(api: Arc<dyn EventsApi>, locator: Arc<GeoLocator>, cache: EventCache) -> Self {
        Self {
            api,
            locator,
            cache: Mutex::new(cache),
        }
    }

    /// The full enriched event list. Serves the cached snapshot while it is
    /// fresh unless `force_refresh` is set; otherwise fetches, enriches
    /// against the resolved viewer location, and replaces the snapshot.
    pub async fn get_all(&self, force_refresh: bool) -> Result<Vec<EnrichedEvent>, FetchError> {
        if !force_refresh {
            let cache = self.cache.lock().await;
            if !cache.is_stale() {
                debug!("serving events from cache");
                return Ok(cache.get());
            }
        }

        let raw_events = self.api.fetch_events().await?;
        let viewer = self.locator.locate().await;

        let enriched: Vec<EnrichedEvent> = raw_events
            .into_iter()
            .map(|raw| enrich_event(raw, viewer))
            .collect();

        info!(count = enriched.len(), "event list refreshed");

        let mut cache = self.cache.lock().await;
        cache.set(enriched.clone());
        Ok(enriched)
    }

    /// One event, always fetched fresh. Does not read or update the list
    /// cache: single-event correctness matters more than list latency.
    pub async fn get_by_id(&self, id: &str) -> Result<EnrichedEvent, FetchError> {
        let raw = self.api.fetch_event(id).await?;
        let viewer = self.locator.locate().await;
        Ok(enrich_event(raw, viewer))
    }

    /// Last snapshot regardless of staleness, for rendering old data while
    /// a refresh fails or is still in flight.
    pub async fn cached(&self) -> Vec<EnrichedEvent> {
        self.cache.lock().await.get()
    }

    /// Exposed so an external scheduler can skip refreshes that would only
    /// re-fetch fresh data.
    pub async fn is_stale(&self) -> bool {
        self.cache.lock().await.is_stale()
    }

    pub async fn invalidate(&self) {
        self.cache.lock().await.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Coordinate, RawEvent};
    use crate::locator::StaticLocationProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct CountingEventsApi {
        list_calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingEventsApi {
        fn new() -> Self {
            Self {
                list_calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }

        fn sample_event(id: &str) -> RawEvent {
            RawEvent {
                id: id.to_string(),
                title: format!("Event {id}"),
                description: String::new(),
                time: vec!["2025-08-30T19:30:00+01:00".to_string()],
                latitude: Some(6.6018),
                longitude: Some(3.3515),
                address: "Ikeja".to_string(),
                banner: None,
                gallery: vec![],
                host: Default::default(),
            }
        }
    }

    #[async_trait]
    impl EventsApi for CountingEventsApi {
        async fn fetch_events(&self) -> Result<Vec<RawEvent>, FetchError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(FetchError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                });
            }
            Ok(vec![Self::sample_event("e1")])
        }

        async fn fetch_event(&self, id: &str) -> Result<RawEvent, FetchError> {
            Ok(Self::sample_event(id))
        }
    }

    fn repository(api: Arc<CountingEventsApi>) -> EventRepository {
        let locator = Arc::new(GeoLocator::new(Arc::new(StaticLocationProvider::new(
            Some(Coordinate::new(6.5244, 3.2017)),
        ))));
        EventRepository::new(api, locator, EventCache::new())
    }

    #[tokio::test]
    async fn fresh_cache_serves_without_network_calls() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api.clone());

        repo.get_all(false).await.unwrap();
        repo.get_all(false).await.unwrap();
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_refresh_always_fetches() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api.clone());

        repo.get_all(false).await.unwrap();
        repo.get_all(true).await.unwrap();
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn events_come_back_enriched() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api);

        let events = repo.get_all(false).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].distance_km.is_some());
        assert_eq!(events[0].formatted_date, "Sat, Aug 30, 2025");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_old_snapshot() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api.clone());

        repo.get_all(false).await.unwrap();
        api.fail.store(true, Ordering::SeqCst);

        assert!(repo.get_all(true).await.is_err());
        assert_eq!(repo.cached().await.len(), 1);
    }

    #[tokio::test]
    async fn get_by_id_does_not_touch_the_list_cache() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api.clone());

        let event = repo.get_by_id("e7").await.unwrap();
        assert_eq!(event.raw.id, "e7");
        assert!(repo.is_stale().await);
        assert!(repo.cached().await.is_empty());
    }

    #[tokio::test]
    async fn invalidate_forces_the_next_fetch() {
        let api = Arc::new(CountingEventsApi::new());
        let repo = repository(api.clone());

        repo.get_all(false).await.unwrap();
        repo.invalidate().await;
        repo.get_all(false).await.unwrap();
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 2);
    }
}
