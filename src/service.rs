//! ==============================================================================
//! service.rs - ingestion orchestration
//! ==============================================================================
//!
//! purpose:
//!     one report flows: key check -> registry upsert -> store record -> ack.
//!     nothing is touched before the key check passes. reads go straight to
//!     the registry/store and never write.
//!
//! relationships:
//!     - used by: server.rs (one shared instance behind an Arc)
//!     - uses: registry.rs, store.rs, error.rs
//!
//! ==============================================================================

use crate::config::{HubConfig, ZoneConfig};
use crate::domain::{IngestAck, Reading, SensorReport, SensorSnapshot};
use crate::error::IngestError;
use crate::location::LocationAssigner;
use crate::registry::SensorRegistry;
use crate::store::ReadingStore;

pub struct IngestionService {
    api_key: String,
    show_sensor_data: bool,
    registry: SensorRegistry,
    store: ReadingStore,
}

impl IngestionService {
    pub fn new(api_key: impl Into<String>, assigner: LocationAssigner) -> Self {
        Self {
            api_key: api_key.into(),
            show_sensor_data: false,
            registry: SensorRegistry::new(assigner),
            store: ReadingStore::new(),
        }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        let mut service = Self::new(
            config.auth.api_key.clone(),
            LocationAssigner::new(config.zones.clone()),
        );
        service.show_sensor_data = config.logging.show_sensor_data;
        service
    }

    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// accept one report and return its computed aqi
    pub async fn ingest(&self, report: SensorReport) -> Result<IngestAck, IngestError> {
        match report.api_key.as_deref() {
            Some(key) if !key.is_empty() && key == self.api_key => {}
            Some(_) => {
                tracing::warn!(sensor = %report.sensor_name, "[INGEST] rejected report: bad api key");
                return Err(IngestError::Authentication);
            }
            None => {
                tracing::warn!(sensor = %report.sensor_name, "[INGEST] rejected report: missing api key");
                return Err(IngestError::Authentication);
            }
        }
        if report.sensor_name.trim().is_empty() {
            tracing::warn!("[INGEST] rejected report: empty sensor_name");
            return Err(IngestError::MalformedInput("sensor_name must not be empty".to_string()));
        }

        self.registry
            .ensure_registered(&report.sensor_name, report.coordinate())
            .await;
        let reading = self.store.record(&report).await;

        if self.show_sensor_data {
            tracing::info!(
                sensor = %reading.sensor_name,
                aqi = reading.aqi,
                pm2_5 = reading.pm2_5,
                pm10 = reading.pm10,
                "[INGEST] reading stored"
            );
        } else {
            tracing::debug!(sensor = %reading.sensor_name, aqi = reading.aqi, "[INGEST] reading stored");
        }

        Ok(IngestAck::success(reading.aqi))
    }

    /// one entry per sensor that has at least one reading
    pub async fn snapshot(&self) -> Vec<SensorSnapshot> {
        let locations = self.registry.locations().await;
        let mut out: Vec<SensorSnapshot> = self
            .store
            .latest_all()
            .await
            .into_iter()
            .filter_map(|latest| {
                let loc = locations.get(&latest.sensor_name)?;
                Some(SensorSnapshot {
                    name: latest.sensor_name.clone(),
                    lat: loc.lat,
                    lng: loc.lng,
                    aqi: latest.aqi,
                    details: latest,
                })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub async fn history(&self, sensor_id: &str) -> Vec<Reading> {
        self.store.history(sensor_id).await
    }

    pub async fn zones(&self) -> Vec<ZoneConfig> {
        self.registry.zones().await
    }
}

// ==============================================================================
// tests
// ==============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    const KEY: &str = "SECRET_KEY_123";

    fn service() -> IngestionService {
        let zones = vec![ZoneConfig { name: "z".into(), lat: 52.2, lng: 21.0, radius: 0.005 }];
        IngestionService::new(KEY, LocationAssigner::with_seed(zones, 5))
    }

    fn report(name: &str) -> SensorReport {
        SensorReport {
            sensor_name: name.to_string(),
            api_key: Some(KEY.to_string()),
            carbon_dioxide: 400.0,
            temperature: 20.0,
            humidity: 50.0,
            pm1_0: 3.0,
            pm2_5: 5.0,
            pm10: 8.0,
            voc_index: 0.0,
            nox_index: 0.0,
            lat: None,
            lng: None,
            soil_humidity: None,
        }
    }

    #[tokio::test]
    async fn test_ingest_returns_aqi() {
        let svc = service();
        let ack = svc.ingest(report("s1")).await.unwrap();
        assert_eq!(ack, IngestAck::success(25));

        let snap = svc.snapshot().await;
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].name, "s1");
        assert_eq!(snap[0].aqi, 25);
    }

    #[tokio::test]
    async fn test_bad_key_touches_nothing() {
        let svc = service();
        let mut r = report("intruder");
        r.api_key = Some("nope".to_string());

        let err = svc.ingest(r).await.unwrap_err();
        assert!(matches!(err, IngestError::Authentication));
        assert!(svc.snapshot().await.is_empty());
        assert_eq!(svc.registry().len().await, 0);
        assert!(svc.history("intruder").await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_or_empty_key_is_rejected() {
        let svc = service();
        for key in [None, Some(String::new())] {
            let mut r = report("keyless");
            r.api_key = key;
            let err = svc.ingest(r).await.unwrap_err();
            assert!(matches!(err, IngestError::Authentication));
        }
        assert_eq!(svc.registry().len().await, 0);
        assert!(svc.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_is_malformed() {
        let svc = service();
        let err = svc.ingest(report("  ")).await.unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput(_)));
        assert_eq!(svc.registry().len().await, 0);
    }

    #[tokio::test]
    async fn test_self_reported_coordinate_is_kept() {
        let svc = service();
        let mut r = report("s1");
        r.lat = Some(1.0);
        r.lng = Some(2.0);
        svc.ingest(r).await.unwrap();

        assert_eq!(svc.registry().location("s1").await, Some(Location::new(1.0, 2.0)));
        let snap = svc.snapshot().await;
        assert_eq!((snap[0].lat, snap[0].lng), (1.0, 2.0));
    }

    #[tokio::test]
    async fn test_half_coordinate_is_ignored() {
        let svc = service();
        let mut r = report("s1");
        r.lat = Some(1.0);
        svc.ingest(r).await.unwrap();

        let loc = svc.registry().location("s1").await.unwrap();
        assert_ne!(loc.lat, 1.0);
    }

    #[tokio::test]
    async fn test_registered_without_reading_is_not_in_snapshot() {
        let svc = service();
        svc.registry().ensure_registered("silent", None).await;
        svc.ingest(report("loud")).await.unwrap();

        let names: Vec<String> = svc.snapshot().await.into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["loud".to_string()]);
    }

    #[tokio::test]
    async fn test_caller_cannot_set_aqi() {
        let svc = service();
        let mut r = report("s1");
        r.pm2_5 = 75.1;
        let ack = svc.ingest(r).await.unwrap();
        assert_eq!(ack.aqi, 201);
        assert_eq!(svc.history("s1").await[0].aqi, 201);
    }
}
