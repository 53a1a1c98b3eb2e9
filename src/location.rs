//! ==============================================================================
//! location.rs - location assignment for newly discovered sensors
//! ==============================================================================
//!
//! purpose:
//!     a sensor that reports its own coordinate keeps it verbatim. one that
//!     doesn't is dropped at a random point inside one of the configured
//!     zones so it still shows up somewhere sensible on the map.
//!
//! relationships:
//!     - used by: registry.rs (only on first sight of a sensor)
//!     - reads: config.rs (ZoneConfig)
//!
//! ==============================================================================

use crate::config::ZoneConfig;
use crate::domain::Location;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// longitude stretch applied after disk sampling
const LNG_STRETCH: f64 = 1.6;

/// sample a point inside `zone`: uniform in the unit disk scaled by the
/// radius, then the longitude offset is stretched by 1.6.
pub fn sample_in_zone<R: Rng + ?Sized>(zone: &ZoneConfig, rng: &mut R) -> Location {
    let r = zone.radius * rng.gen::<f64>().sqrt();
    let theta = rng.gen::<f64>() * TAU;

    Location::new(
        zone.lat + r * theta.cos(),
        zone.lng + r * theta.sin() * LNG_STRETCH,
    )
}

/// owns the zone list and the random source used to place sensors
#[derive(Debug)]
pub struct LocationAssigner {
    zones: Vec<ZoneConfig>,
    rng: StdRng,
}

impl LocationAssigner {
    /// assigner seeded from os entropy
    pub fn new(zones: Vec<ZoneConfig>) -> Self {
        Self { zones, rng: StdRng::from_entropy() }
    }

    /// deterministic assigner, for tests and replays
    pub fn with_seed(zones: Vec<ZoneConfig>, seed: u64) -> Self {
        Self { zones, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn zones(&self) -> &[ZoneConfig] {
        &self.zones
    }

    /// use the caller's coordinate if there is one, otherwise pick a zone
    /// uniformly and sample inside it. with no zones the origin is returned.
    pub fn assign(&mut self, explicit: Option<Location>) -> Location {
        if let Some(location) = explicit {
            return location;
        }

        match self.zones.choose(&mut self.rng) {
            Some(zone) => sample_in_zone(zone, &mut self.rng),
            None => {
                tracing::warn!("no discovery zones configured, placing sensor at origin");
                Location::new(0.0, 0.0)
            }
        }
    }
}
