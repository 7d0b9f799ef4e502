//! # parkering-core
//!
//! Slot allocation for a single parking lot.
//!
//! The [`ParkingLot`] aggregate owns the slot table together with the
//! registration and color indexes. Every mutation goes through one `&mut self`
//! call, so the three structures always move together.
//!
//! ### Key Submodules:
//! - `lot`: the aggregate and its allocation policy (lowest free slot first)
//! - `slot`: slot and occupant records
//! - `stats`: capacity figures derived from the lot
//! - `error`: pool errors and invariant violations

pub mod error;
pub mod lot;
pub mod slot;
pub mod stats;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::lot::*;
    pub use crate::slot::*;
    pub use crate::stats::*;
}

pub use error::{InvariantViolation, PoolError};
pub use lot::ParkingLot;
pub use slot::{normalize_color, Occupant, Slot, SlotNumber};
pub use stats::CapacityStats;
