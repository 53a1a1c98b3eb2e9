//! ==============================================================================
//! store.rs - latest reading and bounded history per sensor
//! ==============================================================================
//!
//! purpose:
//!     every accepted report becomes a new immutable Reading: aqi derived,
//!     soil humidity converted, timestamp stamped here. the reading replaces
//!     the sensor's "latest" and is appended to its history ring.
//!
//! relationships:
//!     - used by: service.rs
//!     - uses: aqi.rs (compute_aqi), history.rs (HistoryRing)
//!
//! ==============================================================================

use crate::aqi;
use crate::domain::{Reading, SensorReport};
use crate::history::HistoryRing;

use std::collections::HashMap;
use tokio::sync::RwLock;

/// readings kept per sensor
pub const HISTORY_CAPACITY: usize = 30;

/// raw soil probe value at or above which the soil reads as bone dry
const SOIL_RAW_MAX: f64 = 2000.0;

/// convert a raw analog soil probe value to percent humidity
pub fn soil_humidity_percent(raw: f64) -> f64 {
    if raw > SOIL_RAW_MAX {
        0.0
    } else {
        100.0 - raw / SOIL_RAW_MAX * 100.0
    }
}

/// get current unix timestamp in milliseconds
pub fn timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct SensorSlot {
    latest: Reading,
    history: HistoryRing<Reading, HISTORY_CAPACITY>,
}

#[derive(Default)]
pub struct ReadingStore {
    sensors: RwLock<HashMap<String, SensorSlot>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// derive a reading from `report`, make it the latest and append it to
    /// the sensor's history, evicting the oldest entry when full.
    pub async fn record(&self, report: &SensorReport) -> Reading {
        let reading = Reading {
            sensor_name: report.sensor_name.clone(),
            carbon_dioxide: report.carbon_dioxide,
            temperature: report.temperature,
            humidity: report.humidity,
            soil_humidity: report.soil_humidity.map(soil_humidity_percent),
            voc_index: report.voc_index,
            nox_index: report.nox_index,
            pm1_0: report.pm1_0,
            pm2_5: report.pm2_5,
            pm10: report.pm10,
            aqi: aqi::compute_aqi(report.pm2_5, report.pm10, report.voc_index, report.nox_index),
            timestamp_ms: timestamp_ms(),
        };

        let mut sensors = self.sensors.write().await;
        match sensors.get_mut(&report.sensor_name) {
            Some(slot) => {
                slot.latest = reading.clone();
                slot.history.push(reading.clone());
            }
            None => {
                let mut history = HistoryRing::new();
                history.push(reading.clone());
                sensors.insert(
                    report.sensor_name.clone(),
                    SensorSlot { latest: reading.clone(), history },
                );
            }
        }

        reading
    }

    /// latest reading of every sensor that has reported at least once
    pub async fn latest_all(&self) -> Vec<Reading> {
        self.sensors
            .read()
            .await
            .values()
            .map(|s| s.latest.clone())
            .collect()
    }

    /// up to HISTORY_CAPACITY readings, oldest first. empty for unknown sensors.
    pub async fn history(&self, sensor_id: &str) -> Vec<Reading> {
        self.sensors
            .read()
            .await
            .get(sensor_id)
            .map(|s| s.history.to_vec())
            .unwrap_or_default()
    }
}
