//! The shared lot behind the HTTP handlers.
//!
//! Every call takes the lot mutex once and holds it for the whole operation,
//! including the initialization check, so handlers never observe a lot that
//! is halfway through an update.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, instrument};

use parkering_core::{CapacityStats, ParkingLot, PoolError, SlotNumber};
use parkering_telemetry::{EventLogger, MetricsRecorder};

use crate::dto::SlotStatus;

/// Which slot `/clear` should free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearSelector {
    Slot(i64),
    Registration(String),
}

#[derive(Clone)]
pub struct ParkingService {
    lot: Arc<Mutex<ParkingLot>>,
    metrics: MetricsRecorder,
}

impl ParkingService {
    pub fn new(lot: ParkingLot, metrics: MetricsRecorder) -> Self {
        Self {
            lot: Arc::new(Mutex::new(lot)),
            metrics,
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    #[instrument(skip(self))]
    pub fn create_lot(&self, capacity: i64) -> Result<u32, PoolError> {
        // Out-of-range counts fall through to the lot's own zero check.
        let capacity = u32::try_from(capacity).unwrap_or(0);
        let total = self.locked("create_lot", |lot| lot.initialize(capacity))?;
        info!(total, "parking lot created");
        Ok(total)
    }

    #[instrument(skip(self))]
    pub fn expand_lot(&self, additional: i64) -> Result<u32, PoolError> {
        let additional = u32::try_from(additional).unwrap_or(0);
        let total = self.locked("expand_lot", |lot| lot.expand(additional))?;
        info!(total, "parking lot expanded");
        Ok(total)
    }

    #[instrument(skip(self))]
    pub fn park(&self, registration: &str, color: &str) -> Result<SlotNumber, PoolError> {
        let slot = self.locked("park", |lot| lot.allocate(registration, color))?;
        self.metrics.inc_allocations();
        info!(slot, "car parked");
        Ok(slot)
    }

    #[instrument(skip(self))]
    pub fn clear(&self, selector: ClearSelector) -> Result<SlotNumber, PoolError> {
        let slot = self.locked("clear", |lot| match &selector {
            ClearSelector::Slot(number) => lot.release_slot(u32::try_from(*number).unwrap_or(0)),
            ClearSelector::Registration(registration) => lot.release_registration(registration),
        })?;
        self.metrics.inc_releases();
        info!(slot, "slot cleared");
        Ok(slot)
    }

    pub fn status(&self) -> Result<Vec<SlotStatus>, PoolError> {
        self.locked("status", |lot| {
            initialized(lot)?;
            Ok(lot.occupied().map(SlotStatus::from).collect())
        })
    }

    pub fn registrations_by_color(&self, color: &str) -> Result<Vec<String>, PoolError> {
        self.locked("registrations_by_color", |lot| {
            initialized(lot)?;
            Ok(lot.registrations_by_color(color))
        })
    }

    pub fn slots_by_color(&self, color: &str) -> Result<Vec<SlotNumber>, PoolError> {
        self.locked("slots_by_color", |lot| {
            initialized(lot)?;
            Ok(lot.slots_by_color(color))
        })
    }

    pub fn slot_for_registration(&self, registration: &str) -> Result<SlotNumber, PoolError> {
        self.locked("slot_for_registration", |lot| {
            lot.slot_for_registration(registration)
        })
    }

    pub fn statistics(&self) -> Result<CapacityStats, PoolError> {
        self.locked("statistics", |lot| {
            initialized(lot)?;
            Ok(lot.stats())
        })
    }

    fn locked<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut ParkingLot) -> Result<T, PoolError>,
    ) -> Result<T, PoolError> {
        let mut lot = self.lot.lock();
        let result = f(&mut *lot);
        match &result {
            Ok(_) => {
                let stats = lot.stats();
                self.metrics.set_occupancy(stats.total, stats.occupied);
            }
            Err(err) => {
                self.metrics.inc_rejections();
                EventLogger::log_rejection(operation, err);
            }
        }
        result
    }
}

fn initialized(lot: &ParkingLot) -> Result<(), PoolError> {
    if lot.is_initialized() {
        Ok(())
    } else {
        Err(PoolError::NotInitialized)
    }
}
