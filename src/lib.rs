// Core modules
pub mod auth;
pub mod clients;
pub mod config;
pub mod enrichment;
pub mod event;
pub mod event_cache;
pub mod event_repository;
pub mod locator;
pub mod order_builder;
pub mod order_submitter;
pub mod refresh;

// Re-exports
pub use auth::AuthContext;
pub use clients::{ApiClient, EventsApi, FetchError, OrderAck, OrdersApi, TicketsApi};
pub use config::Settings;
pub use enrichment::{distance_km, enrich_event, format_distance, format_event_time, FormattedTime};
pub use event::{Coordinate, EnrichedEvent, Host, RawEvent, Ticket};
pub use event_cache::EventCache;
pub use event_repository::EventRepository;
pub use locator::{GeoLocator, LocationProvider, LocationUnavailable, StaticLocationProvider};
pub use order_builder::{LineItem, OrderBuilder, OrderRequest, Step, ValidationError};
pub use order_submitter::{OrderError, OrderOutcome, OrderSubmitter};
pub use refresh::run_auto_refresh;
