use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use ticketpass::{
    enrichment::format_distance,
    event_cache::EventCache,
    event_repository::EventRepository,
    locator::{GeoLocator, StaticLocationProvider},
    refresh::run_auto_refresh,
    ApiClient, Settings, TicketsApi,
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let settings = Settings::load()?;
    info!("starting ticketpass event discovery ({})", settings.api_base_url);

    let api = Arc::new(
        ApiClient::new(&settings.api_base_url)
            .with_timeout(Duration::from_secs(settings.http_timeout_secs)),
    );

    let provider = Arc::new(StaticLocationProvider::new(settings.static_position()));
    let locator = Arc::new(
        GeoLocator::new(provider)
            .with_fallback(settings.fallback_coordinate())
            .with_timeout(Duration::from_secs(settings.geolocation_timeout_secs))
            .with_ttl(Duration::from_secs(settings.location_ttl_secs)),
    );

    let repository = Arc::new(EventRepository::new(
        api.clone(),
        locator,
        EventCache::with_ttl(chrono::Duration::seconds(settings.cache_ttl_secs)),
    ));

    // Initial discovery pass; a failure here is not fatal, the auto-refresh
    // loop will keep trying.
    match repository.get_all(false).await {
        Ok(events) => {
            info!(count = events.len(), "events loaded");

            let mut nearest: Vec<_> = events
                .iter()
                .filter_map(|event| event.distance_km.map(|d| (d, event)))
                .collect();
            nearest.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            for (distance, event) in nearest.iter().take(5) {
                info!(
                    "{} | {} {} ({})",
                    event.raw.title,
                    event.formatted_date,
                    event.formatted_time,
                    format_distance(*distance)
                );
            }

            if let Some((_, event)) = nearest.first() {
                match api.fetch_tickets(&event.raw.id).await {
                    Ok(tickets) => {
                        for ticket in tickets {
                            info!(
                                "  {} {} {}{}",
                                ticket.name,
                                ticket.currency,
                                ticket.cost,
                                if ticket.is_sold_out() { " (sold out)" } else { "" }
                            );
                        }
                    }
                    Err(err) => warn!("ticket lookup failed: {err}"),
                }
            }
        }
        Err(err) => warn!("initial event fetch failed: {err}"),
    }

    info!(
        "starting auto-refresh (interval: {}s)",
        settings.refresh_interval_secs
    );
    run_auto_refresh(
        repository,
        Duration::from_secs(settings.refresh_interval_secs),
    )
    .await;

    Ok(())
}
