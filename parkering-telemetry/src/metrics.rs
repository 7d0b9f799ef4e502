//! ## parkering-telemetry::metrics
//! **Prometheus counters and gauges for lot activity**

use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::TelemetryError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub allocations: IntCounter,
    pub releases: IntCounter,
    pub rejections: IntCounter,
    pub slots_total: IntGauge,
    pub slots_occupied: IntGauge,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();
        let allocations = IntCounter::new("parkering_allocations_total", "Cars parked")?;
        let releases = IntCounter::new("parkering_releases_total", "Slots freed")?;
        let rejections =
            IntCounter::new("parkering_rejections_total", "Requests rejected with an error")?;
        let slots_total = IntGauge::new("parkering_slots_total", "Slots in the lot")?;
        let slots_occupied = IntGauge::new("parkering_slots_occupied", "Slots currently occupied")?;

        registry.register(Box::new(allocations.clone()))?;
        registry.register(Box::new(releases.clone()))?;
        registry.register(Box::new(rejections.clone()))?;
        registry.register(Box::new(slots_total.clone()))?;
        registry.register(Box::new(slots_occupied.clone()))?;

        Ok(Self {
            registry,
            allocations,
            releases,
            rejections,
            slots_total,
            slots_occupied,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn inc_allocations(&self) {
        self.allocations.inc();
    }

    pub fn inc_releases(&self) {
        self.releases.inc();
    }

    pub fn inc_rejections(&self) {
        self.rejections.inc();
    }

    /// Mirrors the lot's current size and occupancy.
    pub fn set_occupancy(&self, total: u32, occupied: u32) {
        self.slots_total.set(i64::from(total));
        self.slots_occupied.set(i64::from(occupied));
    }
}
