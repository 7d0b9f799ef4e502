//! Request and response bodies.
//!
//! Field names match the public JSON contract, so they stay snake_case even
//! where the Rust side would name them differently.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use parkering_core::{CapacityStats, Occupant, SlotNumber};

use crate::error::ApiError;
use crate::service::ClearSelector;

/// `XX-00-XX-0000`: two letters, two digits, two letters, four digits.
static REGISTRATION_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2}-[0-9]{2}-[A-Z]{2}-[0-9]{4}$").expect("registration pattern compiles")
});

#[derive(Debug, Deserialize)]
pub struct CreateLotRequest {
    pub no_of_slot: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExpandLotRequest {
    pub increment_slot: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ParkCarRequest {
    #[validate(regex(
        path = *REGISTRATION_FORMAT,
        message = "Invalid registration number format. Expected format: XX-00-XX-0000"
    ))]
    pub car_reg_no: String,

    #[validate(length(min = 1, message = "car_color should not be empty"))]
    pub car_color: String,
}

#[derive(Debug, Deserialize)]
pub struct ClearSlotRequest {
    #[serde(default)]
    pub slot_number: Option<i64>,
    #[serde(default)]
    pub car_registration_no: Option<String>,
}

impl ClearSlotRequest {
    /// Exactly one of the two selectors must be present.
    pub fn into_selector(self) -> Result<ClearSelector, ApiError> {
        match (self.slot_number, self.car_registration_no) {
            (Some(number), None) => Ok(ClearSelector::Slot(number)),
            (None, Some(registration)) => Ok(ClearSelector::Registration(registration)),
            (None, None) => Err(ApiError::InvalidInput(
                "Either slot_number or car_registration_no must be provided".into(),
            )),
            (Some(_), Some(_)) => Err(ApiError::InvalidInput(
                "Provide only one of slot_number or car_registration_no".into(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TotalSlotResponse {
    pub total_slot: u32,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocatedSlotResponse {
    pub allocated_slot_number: SlotNumber,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FreedSlotResponse {
    pub freed_slot_number: SlotNumber,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotNumberResponse {
    pub slot_number: SlotNumber,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotStatus {
    pub slot_no: SlotNumber,
    pub registration_no: String,
    pub color: String,
}

impl From<(SlotNumber, &Occupant)> for SlotStatus {
    fn from((slot_no, car): (SlotNumber, &Occupant)) -> Self {
        Self {
            slot_no,
            registration_no: car.registration().to_owned(),
            color: car.color().to_owned(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatisticsResponse {
    pub total_slots: u32,
    pub occupied_slots: u32,
    pub available_slots: u32,
    pub occupancy_rate: String,
}

impl From<CapacityStats> for StatisticsResponse {
    fn from(stats: CapacityStats) -> Self {
        Self {
            total_slots: stats.total,
            occupied_slots: stats.occupied,
            available_slots: stats.available,
            occupancy_rate: stats.occupancy_rate(),
        }
    }
}
