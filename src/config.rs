use crate::event::Coordinate;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Runtime settings with defaults, overridable through `TICKETPASS_*`
/// environment variables (e.g. `TICKETPASS_API_BASE_URL`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub geolocation_timeout_secs: u64,
    pub location_ttl_secs: u64,
    pub cache_ttl_secs: i64,
    pub refresh_interval_secs: u64,
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
    /// Fixed position for the static location provider; both halves unset
    /// means "no position available" and the fallback coordinate applies.
    pub static_latitude: Option<f64>,
    pub static_longitude: Option<f64>,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("api_base_url", "http://localhost:8000")?
            .set_default("http_timeout_secs", 10_i64)?
            .set_default("geolocation_timeout_secs", 5_i64)?
            .set_default("location_ttl_secs", 300_i64)?
            .set_default("cache_ttl_secs", 300_i64)?
            .set_default("refresh_interval_secs", 900_i64)?
            .set_default("fallback_latitude", 6.5244_f64)?
            .set_default("fallback_longitude", 3.2017_f64)?
            .add_source(Environment::with_prefix("TICKETPASS"))
            .build()?
            .try_deserialize()
    }

    pub fn fallback_coordinate(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }

    pub fn static_position(&self) -> Option<Coordinate> {
        match (self.static_latitude, self.static_longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}
