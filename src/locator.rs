use crate::event::Coordinate;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fallback when no location can be resolved: Alimosho, Lagos.
pub const FALLBACK_COORDINATE: Coordinate = Coordinate {
    latitude: 6.5244,
    longitude: 3.2017,
};

pub const DEFAULT_LOCATION_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
#[error("location unavailable: {0}")]
pub struct LocationUnavailable(pub String);

/// Platform capability that produces the caller's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate, LocationUnavailable>;
}

/// Provider backed by a fixed coordinate (or nothing at all). The binary
/// uses this where a browser would use the geolocation API.
pub struct StaticLocationProvider {
    position: Option<Coordinate>,
}

impl StaticLocationProvider {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn current_position(&self) -> Result<Coordinate, LocationUnavailable> {
        self.position
            .ok_or_else(|| LocationUnavailable("no configured position".to_string()))
    }
}

struct LocatorSlot {
    cached: Option<(Coordinate, Instant)>,
    in_flight: Option<Shared<BoxFuture<'static, Coordinate>>>,
}

/// Resolves the caller's coordinate with a single-slot cache and a shared
/// in-flight future, degrading to [`FALLBACK_COORDINATE`] on any failure.
///
/// `locate` never fails: a stalled or missing provider costs at most the
/// configured timeout before the fallback is returned and cached.
pub struct GeoLocator {
    provider: Arc<dyn LocationProvider>,
    fallback: Coordinate,
    ttl: Duration,
    timeout: Duration,
    slot: Mutex<LocatorSlot>,
}

impl GeoLocator {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            fallback: FALLBACK_COORDINATE,
            ttl: DEFAULT_LOCATION_TTL,
            timeout: DEFAULT_LOCATION_TIMEOUT,
            slot: Mutex::new(LocatorSlot {
                cached: None,
                in_flight: None,
            }),
        }
    }

    pub fn with_fallback(mut self, fallback: Coordinate) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the caller's coordinate. Within the TTL window this is a
    /// cache hit; during resolution, concurrent callers share one provider
    /// request.
    pub async fn locate(&self) -> Coordinate {
        let resolution = {
            let mut slot = self.slot.lock().await;

            if let Some((coordinate, resolved_at)) = slot.cached {
                if resolved_at.elapsed() < self.ttl {
                    return coordinate;
                }
            }

            match &slot.in_flight {
                Some(pending) => pending.clone(),
                None => {
                    let provider = Arc::clone(&self.provider);
                    let fallback = self.fallback;
                    let timeout = self.timeout;
                    let pending = async move {
                        match tokio::time::timeout(timeout, provider.current_position()).await {
                            Ok(Ok(coordinate)) => coordinate,
                            Ok(Err(err)) => {
                                warn!("geolocation failed, using fallback: {err}");
                                fallback
                            }
                            Err(_) => {
                                warn!("geolocation timed out after {timeout:?}, using fallback");
                                fallback
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    slot.in_flight = Some(pending.clone());
                    pending
                }
            }
        };

        let coordinate = resolution.await;

        let mut slot = self.slot.lock().await;
        slot.cached = Some((coordinate, Instant::now()));
        slot.in_flight = None;
        debug!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "location resolved"
        );
        coordinate
    }

    /// Drop the cached coordinate so the next `locate` resolves fresh.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        slot.cached = None;
    }
}
