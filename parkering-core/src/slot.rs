//! Slot and occupant records.

/// Stable, 1-based slot identifier.
pub type SlotNumber = u32;

/// Lowercases a color for indexing. Applied once when an occupant is created
/// and to every color used as a lookup key.
pub fn normalize_color(color: &str) -> String {
    color.to_lowercase()
}

/// A parked car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    registration: String,
    color: String,
}

impl Occupant {
    pub fn new(registration: impl Into<String>, color: &str) -> Self {
        Self {
            registration: registration.into(),
            color: normalize_color(color),
        }
    }

    pub fn registration(&self) -> &str {
        &self.registration
    }

    /// Color, already lowercased.
    pub fn color(&self) -> &str {
        &self.color
    }
}

/// One unit of capacity. Slots are created by the lot and live as long as it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    number: SlotNumber,
    occupant: Option<Occupant>,
}

impl Slot {
    pub(crate) fn new(number: SlotNumber) -> Self {
        Self {
            number,
            occupant: None,
        }
    }

    pub fn number(&self) -> SlotNumber {
        self.number
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn occupant(&self) -> Option<&Occupant> {
        self.occupant.as_ref()
    }

    pub(crate) fn park(&mut self, occupant: Occupant) {
        debug_assert!(self.occupant.is_none(), "slot {} double-parked", self.number);
        self.occupant = Some(occupant);
    }

    pub(crate) fn vacate(&mut self) -> Option<Occupant> {
        self.occupant.take()
    }
}
