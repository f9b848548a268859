use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Event record exactly as the backend returns it.
///
/// Venue coordinates and media fields are optional on the wire; a missing
/// or malformed field must not fail deserialization of the whole list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 0-2 RFC3339 timestamps: start and optional end. Empty means TBD.
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub host: Host,
}

impl RawEvent {
    /// Venue coordinate, if the backend sent both halves.
    pub fn venue(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}

/// A raw event plus display-ready derived fields.
///
/// Derived fields are recomputed on every enrichment pass and are never
/// sent back to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedEvent {
    #[serde(flatten)]
    pub raw: RawEvent,
    pub distance_km: Option<f64>,
    pub formatted_date: String,
    pub formatted_time: String,
    pub formatted_end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub name: String,
    pub cost: Decimal,
    pub currency: String,
    pub quantity: u32,
}

impl Ticket {
    pub fn is_sold_out(&self) -> bool {
        self.quantity == 0
    }
}
