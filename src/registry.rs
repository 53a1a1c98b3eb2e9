//! ==============================================================================
//! registry.rs - sensor registry and auto-discovery
//! ==============================================================================
//!
//! purpose:
//!     maps each sensor name to its location. the first report from an
//!     unknown sensor registers it (auto-discovery); later reports only touch
//!     the location when they carry their own coordinate.
//!
//! concurrency:
//!     the map and the location assigner sit behind one async RwLock, so an
//!     upsert for a given sensor is a single critical section. the assigner is
//!     pure in-memory sampling, nothing in the section blocks.
//!
//! relationships:
//!     - used by: service.rs (ingest, snapshot)
//!     - uses: location.rs (LocationAssigner, first sight only)
//!
//! ==============================================================================

use crate::config::ZoneConfig;
use crate::domain::Location;
use crate::location::LocationAssigner;

use std::collections::HashMap;
use tokio::sync::RwLock;

struct RegistryInner {
    locations: HashMap<String, Location>,
    assigner: LocationAssigner,
}

pub struct SensorRegistry {
    inner: RwLock<RegistryInner>,
}

impl SensorRegistry {
    pub fn new(assigner: LocationAssigner) -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                locations: HashMap::new(),
                assigner,
            }),
        }
    }

    /// idempotent upsert.
    ///
    /// - unknown sensor: ask the assigner (which honors `coordinate` if given)
    /// - known sensor with `coordinate`: overwrite, self-reported wins
    /// - known sensor without: return what is stored
    pub async fn ensure_registered(&self, sensor_id: &str, coordinate: Option<Location>) -> Location {
        let mut inner = self.inner.write().await;
        let RegistryInner { locations, assigner } = &mut *inner;

        match locations.get_mut(sensor_id) {
            Some(stored) => {
                if let Some(coord) = coordinate {
                    *stored = coord;
                }
                *stored
            }
            None => {
                let location = assigner.assign(coordinate);
                tracing::info!(
                    sensor = sensor_id,
                    lat = location.lat,
                    lng = location.lng,
                    self_reported = coordinate.is_some(),
                    "[REGISTRY] discovered new sensor"
                );
                locations.insert(sensor_id.to_string(), location);
                location
            }
        }
    }

    #[cfg(test)]
    pub async fn location(&self, sensor_id: &str) -> Option<Location> {
        self.inner.read().await.locations.get(sensor_id).copied()
    }

    /// copy of every registered location
    pub async fn locations(&self) -> HashMap<String, Location> {
        self.inner.read().await.locations.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.locations.len()
    }

    pub async fn zones(&self) -> Vec<ZoneConfig> {
        self.inner.read().await.assigner.zones().to_vec()
    }
}
