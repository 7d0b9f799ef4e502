//! ## parkering-core::lot
//! **Single-lot slot allocator with registration and color indexes**
//!
//! A car is always parked in the lowest-numbered free slot. Free slots are kept
//! in an ordered set so that choice costs O(log n) instead of a scan over the
//! whole lot. Slot numbers are stable: expansion appends new slots after the
//! current last one and never touches existing ones.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::{InvariantViolation, PoolError};
use crate::slot::{normalize_color, Occupant, Slot, SlotNumber};
use crate::stats::CapacityStats;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParkingLot {
    /// Slot `n` lives at index `n - 1`.
    slots: Vec<Slot>,
    free: BTreeSet<SlotNumber>,
    by_registration: HashMap<String, SlotNumber>,
    /// Empty sets are removed as soon as their last slot is released.
    by_color: HashMap<String, BTreeSet<SlotNumber>>,
    max_capacity: Option<u32>,
}

impl ParkingLot {
    /// Creates an uninitialized lot with no upper bound on its size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an uninitialized lot that refuses to grow past `max_capacity` slots.
    pub fn with_max_capacity(max_capacity: u32) -> Self {
        Self {
            max_capacity: Some(max_capacity),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn total_slots(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn available_slots(&self) -> u32 {
        self.free.len() as u32
    }

    /// Creates slots `1..=capacity`. Only allowed once per lot.
    pub fn initialize(&mut self, capacity: u32) -> Result<u32, PoolError> {
        if self.is_initialized() {
            return Err(PoolError::AlreadyInitialized);
        }
        if capacity == 0 || !self.within_limit(capacity) {
            return Err(PoolError::InvalidCapacity);
        }

        self.grow(capacity);
        debug!(total = capacity, "lot initialized");
        Ok(self.total_slots())
    }

    /// Appends `additional` free slots after the current last slot.
    pub fn expand(&mut self, additional: u32) -> Result<u32, PoolError> {
        self.ensure_initialized()?;
        if additional == 0 {
            return Err(PoolError::InvalidIncrement);
        }
        let new_total = self
            .total_slots()
            .checked_add(additional)
            .filter(|total| self.within_limit(*total))
            .ok_or(PoolError::InvalidIncrement)?;

        self.grow(additional);
        debug!(additional, total = new_total, "lot expanded");
        Ok(new_total)
    }

    /// Parks a car in the lowest-numbered free slot and returns that slot.
    pub fn allocate(
        &mut self,
        registration: impl Into<String>,
        color: &str,
    ) -> Result<SlotNumber, PoolError> {
        self.ensure_initialized()?;
        let registration = registration.into();
        if self.by_registration.contains_key(&registration) {
            return Err(PoolError::DuplicateKey(registration));
        }
        let number = self.free.first().copied().ok_or(PoolError::PoolFull)?;

        let occupant = Occupant::new(registration, color);
        self.free.remove(&number);
        self.by_registration
            .insert(occupant.registration().to_owned(), number);
        self.by_color
            .entry(occupant.color().to_owned())
            .or_default()
            .insert(number);
        debug!(
            slot = number,
            registration = occupant.registration(),
            color = occupant.color(),
            "car parked"
        );
        self.slots[Self::index_of(number)].park(occupant);

        Ok(number)
    }

    /// Frees an occupied slot.
    pub fn release_slot(&mut self, number: SlotNumber) -> Result<SlotNumber, PoolError> {
        self.ensure_initialized()?;
        if number == 0 || number > self.total_slots() {
            return Err(PoolError::InvalidSlot);
        }
        let occupant = self.slots[Self::index_of(number)]
            .vacate()
            .ok_or(PoolError::AlreadyFree(number))?;

        self.by_registration.remove(occupant.registration());
        if let Some(numbers) = self.by_color.get_mut(occupant.color()) {
            numbers.remove(&number);
            if numbers.is_empty() {
                self.by_color.remove(occupant.color());
            }
        }
        self.free.insert(number);
        debug!(
            slot = number,
            registration = occupant.registration(),
            "slot freed"
        );

        Ok(number)
    }

    /// Frees the slot holding `registration`.
    pub fn release_registration(&mut self, registration: &str) -> Result<SlotNumber, PoolError> {
        let number = self.slot_for_registration(registration)?;
        self.release_slot(number)
    }

    /// Occupied slots in ascending slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (SlotNumber, &Occupant)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.occupant().map(|car| (slot.number(), car)))
    }

    /// Registrations of cars with `color` (any case), sorted lexicographically.
    pub fn registrations_by_color(&self, color: &str) -> Vec<String> {
        let Some(numbers) = self.by_color.get(&normalize_color(color)) else {
            return Vec::new();
        };
        let mut registrations: Vec<String> = numbers
            .iter()
            .filter_map(|number| self.slots[Self::index_of(*number)].occupant())
            .map(|car| car.registration().to_owned())
            .collect();
        registrations.sort();
        registrations
    }

    /// Slots holding cars with `color` (any case), ascending.
    pub fn slots_by_color(&self, color: &str) -> Vec<SlotNumber> {
        self.by_color
            .get(&normalize_color(color))
            .map(|numbers| numbers.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn slot_for_registration(&self, registration: &str) -> Result<SlotNumber, PoolError> {
        self.ensure_initialized()?;
        self.by_registration
            .get(registration)
            .copied()
            .ok_or_else(|| PoolError::KeyNotFound(registration.to_owned()))
    }

    pub fn stats(&self) -> CapacityStats {
        CapacityStats::new(self.total_slots(), self.available_slots())
    }

    /// Checks that the slot table, the free set and both indexes agree.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        for (position, slot) in self.slots.iter().enumerate() {
            let number = slot.number();
            if number == 0 || Self::index_of(number) != position {
                return Err(InvariantViolation::Numbering {
                    position,
                    found: number,
                });
            }

            let Some(car) = slot.occupant() else {
                if !self.free.contains(&number) {
                    return Err(InvariantViolation::VacantNotFree(number));
                }
                continue;
            };
            if self.free.contains(&number) {
                return Err(InvariantViolation::OccupiedButFree(number));
            }
            match self.by_registration.get(car.registration()) {
                Some(indexed) if *indexed == number => {}
                Some(indexed) => {
                    return Err(InvariantViolation::RegistrationMismatch {
                        registration: car.registration().to_owned(),
                        indexed: *indexed,
                        actual: number,
                    })
                }
                None => {
                    return Err(InvariantViolation::StaleRegistration {
                        registration: car.registration().to_owned(),
                        slot: number,
                    })
                }
            }
            let in_color = self
                .by_color
                .get(car.color())
                .is_some_and(|numbers| numbers.contains(&number));
            if !in_color {
                return Err(InvariantViolation::MissingFromColor {
                    color: car.color().to_owned(),
                    slot: number,
                });
            }
        }

        if let Some(unknown) = self
            .free
            .iter()
            .find(|number| **number == 0 || **number > self.total_slots())
        {
            return Err(InvariantViolation::UnknownFreeSlot(*unknown));
        }

        // Every index entry must point back at a matching occupant. Together with
        // the per-slot checks above this makes both indexes exact.
        for (registration, number) in &self.by_registration {
            let holds = self
                .occupant_at(*number)
                .is_some_and(|car| car.registration() == registration);
            if !holds {
                return Err(InvariantViolation::StaleRegistration {
                    registration: registration.clone(),
                    slot: *number,
                });
            }
        }

        for (color, numbers) in &self.by_color {
            if numbers.is_empty() {
                return Err(InvariantViolation::EmptyColor(color.clone()));
            }
            for number in numbers {
                let matches = self
                    .occupant_at(*number)
                    .is_some_and(|car| car.color() == color);
                if !matches {
                    return Err(InvariantViolation::StaleColor {
                        color: color.clone(),
                        slot: *number,
                    });
                }
            }
        }

        Ok(())
    }

    fn occupant_at(&self, number: SlotNumber) -> Option<&Occupant> {
        if number == 0 {
            return None;
        }
        self.slots
            .get(Self::index_of(number))
            .and_then(Slot::occupant)
    }

    fn ensure_initialized(&self) -> Result<(), PoolError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(PoolError::NotInitialized)
        }
    }

    fn within_limit(&self, total: u32) -> bool {
        self.max_capacity.map_or(true, |max| total <= max)
    }

    fn grow(&mut self, additional: u32) {
        let first = self.total_slots() + 1;
        let last = self.total_slots() + additional;
        self.slots.reserve(additional as usize);
        for number in first..=last {
            self.slots.push(Slot::new(number));
            self.free.insert(number);
        }
    }

    #[inline]
    fn index_of(number: SlotNumber) -> usize {
        number as usize - 1
    }
}
