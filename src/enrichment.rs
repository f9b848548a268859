use crate::event::{Coordinate, EnrichedEvent, RawEvent};
use chrono::{DateTime, FixedOffset};

const EARTH_RADIUS_KM: f64 = 6371.0;
const TBD: &str = "TBD";

/// Great-circle distance between two coordinates in kilometers, rounded to
/// one decimal place. Equal coordinates short-circuit to exactly 0.0 so
/// floating point noise from the trig never shows up as "0.0km away".
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    (distance * 10.0).round() / 10.0
}

/// Format a distance for display: sub-kilometer values render as whole
/// meters, everything else as kilometers with one decimal.
pub fn format_distance(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{}m away", (distance_km * 1000.0).round() as i64)
    } else {
        format!("{:.1}km away", distance_km)
    }
}

/// Display-ready date/time fields derived from an event's timestamp list.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedTime {
    pub date: String,
    pub time: String,
    pub end_time: Option<String>,
}

impl FormattedTime {
    fn tbd() -> Self {
        Self {
            date: TBD.to_string(),
            time: TBD.to_string(),
            end_time: None,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Turn an event's 0-2 RFC3339 timestamps into display strings.
///
/// Empty input or an unparseable start timestamp yields the TBD shape;
/// an unparseable end timestamp degrades only the end field. Total
/// function: remote data never makes this return an error.
pub fn format_event_time(timestamps: &[String]) -> FormattedTime {
    let Some(start_raw) = timestamps.first() else {
        return FormattedTime::tbd();
    };

    let end_time = timestamps
        .get(1)
        .and_then(|raw| parse_timestamp(raw))
        .map(|end| end.format("%I:%M %p").to_string());

    match parse_timestamp(start_raw) {
        Some(start) => FormattedTime {
            date: start.format("%a, %b %-d, %Y").to_string(),
            time: start.format("%I:%M %p").to_string(),
            end_time,
        },
        None => FormattedTime {
            end_time,
            ..FormattedTime::tbd()
        },
    }
}

/// Derive the display fields for one event against the viewer's location.
pub fn enrich_event(raw: RawEvent, viewer: Coordinate) -> EnrichedEvent {
    let distance = raw.venue().map(|venue| distance_km(viewer, venue));
    let formatted = format_event_time(&raw.time);

    EnrichedEvent {
        raw,
        distance_km: distance,
        formatted_date: formatted.date,
        formatted_time: formatted.time,
        formatted_end_time: formatted.end_time,
    }
}
