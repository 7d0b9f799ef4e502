use thiserror::Error;

use crate::slot::SlotNumber;

/// Errors returned by [`crate::ParkingLot`] operations.
///
/// A failing operation never mutates the lot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Parking lot is already initialized")]
    AlreadyInitialized,

    #[error("Number of slots must be a positive integer within the lot limit")]
    InvalidCapacity,

    #[error("Parking lot is not initialized")]
    NotInitialized,

    #[error("Slot increment must be a positive integer within the lot limit")]
    InvalidIncrement,

    #[error("Parking lot is full")]
    PoolFull,

    #[error("Invalid slot number")]
    InvalidSlot,

    #[error("Slot is already free")]
    AlreadyFree(SlotNumber),

    #[error("Car with given registration number not found")]
    KeyNotFound(String),

    #[error("Car with registration number {0} is already parked")]
    DuplicateKey(String),
}

/// A broken consistency rule between the slot table and its indexes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("slot at position {position} is numbered {found}")]
    Numbering { position: usize, found: SlotNumber },

    #[error("occupied slot {0} is listed as free")]
    OccupiedButFree(SlotNumber),

    #[error("vacant slot {0} is missing from the free set")]
    VacantNotFree(SlotNumber),

    #[error("free set holds unknown slot {0}")]
    UnknownFreeSlot(SlotNumber),

    #[error("registration {registration} indexed to slot {indexed}, parked in slot {actual}")]
    RegistrationMismatch {
        registration: String,
        indexed: SlotNumber,
        actual: SlotNumber,
    },

    #[error("registration {registration} points at slot {slot} which does not hold it")]
    StaleRegistration {
        registration: String,
        slot: SlotNumber,
    },

    #[error("slot {slot} missing from color set {color:?}")]
    MissingFromColor { color: String, slot: SlotNumber },

    #[error("color set {color:?} holds slot {slot} which does not match")]
    StaleColor { color: String, slot: SlotNumber },

    #[error("color set {0:?} is empty")]
    EmptyColor(String),
}
