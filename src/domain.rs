use serde::{Deserialize, Serialize};

/// geographic coordinate of a sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// a report as posted by a sensor node to `POST /api/report`
///
/// any `aqi` or timestamp the node sends is simply not part of this shape,
/// so it never reaches the store.
#[derive(Clone, Deserialize, Debug)]
pub struct SensorReport {
    /// unique sensor identifier (e.g., "waw_pola_013")
    pub sensor_name: String,
    /// shared secret, checked before anything else. a missing key is an
    /// authentication failure, not a malformed report.
    #[serde(default)]
    pub api_key: Option<String>,

    pub carbon_dioxide: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub pm1_0: f64,
    pub pm2_5: f64,
    pub pm10: f64,

    #[serde(default)]
    pub voc_index: f64,
    #[serde(default)]
    pub nox_index: f64,

    /// self-reported position, only used when both halves are present
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,

    /// raw analog soil probe value (0-2000)
    #[serde(default)]
    pub soil_humidity: Option<f64>,
}

impl SensorReport {
    /// the caller-supplied coordinate, if the report carries a full one
    pub fn coordinate(&self) -> Option<Location> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
            _ => None,
        }
    }
}

/// a stored reading. immutable once recorded.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Reading {
    pub sensor_name: String,
    pub carbon_dioxide: f64,
    pub temperature: f64,
    pub humidity: f64,
    /// soil humidity in percent (already converted from the raw probe value)
    pub soil_humidity: Option<f64>,
    pub voc_index: f64,
    pub nox_index: f64,
    pub pm1_0: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    /// derived server-side, never taken from the report
    pub aqi: i32,
    /// ingestion time in unix milliseconds
    pub timestamp_ms: u64,
}

/// one map marker for `GET /api/pollution-data`
#[derive(Clone, Serialize, Debug)]
pub struct SensorSnapshot {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub aqi: i32,
    pub details: Reading,
}

/// acknowledgment returned for an accepted report
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct IngestAck {
    pub status: &'static str,
    pub aqi: i32,
}

impl IngestAck {
    pub fn success(aqi: i32) -> Self {
        Self { status: "success", aqi }
    }
}
