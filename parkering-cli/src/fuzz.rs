//! Seeded random workload against an in-memory lot.
//!
//! Every step picks an operation, applies it, and then checks that a failed
//! operation left the lot untouched and that `ParkingLot::verify` still holds.
//! The same seed always replays the same sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use parkering_core::{InvariantViolation, ParkingLot, PoolError};

const COLORS: [&str; 5] = ["white", "White", "BLACK", "red", "silver"];

#[derive(Debug, Error)]
pub enum FuzzError {
    #[error("lot rejected the initial capacity: {0}")]
    Setup(#[from] PoolError),

    #[error("seed {seed}, step {step}: {violation}")]
    Violation {
        seed: u64,
        step: usize,
        #[source]
        violation: InvariantViolation,
    },

    #[error("seed {seed}, step {step}: failed {operation} modified the lot")]
    PartialMutation {
        seed: u64,
        step: usize,
        operation: &'static str,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FuzzReport {
    pub seed: u64,
    pub operations: usize,
    pub parked: usize,
    pub released: usize,
    pub expansions: usize,
    pub rejected: usize,
    pub final_total: u32,
    pub final_occupied: u32,
}

fn registration(car: usize) -> String {
    format!("KA-{:02}-FZ-{:04}", car % 100, car % 10_000)
}

pub fn run(seed: u64, operations: usize, capacity: u32) -> Result<FuzzReport, FuzzError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut lot = ParkingLot::new();
    lot.initialize(capacity)?;

    // Twice as many cars as slots so the lot regularly fills up.
    let fleet = (capacity as usize * 2).max(4);
    let mut report = FuzzReport {
        seed,
        operations,
        ..FuzzReport::default()
    };

    for step in 0..operations {
        let before = lot.clone();
        let (operation, outcome) = match rng.random_range(0u8..10) {
            0..=4 => {
                let car = rng.random_range(0..fleet);
                let color = COLORS[rng.random_range(0..COLORS.len())];
                ("park", lot.allocate(registration(car), color))
            }
            5 | 6 => {
                let slot = rng.random_range(0..=lot.total_slots() + 1);
                ("release_slot", lot.release_slot(slot))
            }
            7 | 8 => {
                let car = rng.random_range(0..fleet);
                ("release_registration", lot.release_registration(&registration(car)))
            }
            _ => {
                let additional = rng.random_range(0..=2);
                ("expand", lot.expand(additional))
            }
        };

        match outcome {
            Ok(_) => match operation {
                "park" => report.parked += 1,
                "expand" => report.expansions += 1,
                _ => report.released += 1,
            },
            Err(_) => {
                report.rejected += 1;
                if lot != before {
                    return Err(FuzzError::PartialMutation {
                        seed,
                        step,
                        operation,
                    });
                }
            }
        }

        lot.verify()
            .map_err(|violation| FuzzError::Violation {
                seed,
                step,
                violation,
            })?;
    }

    let stats = lot.stats();
    report.final_total = stats.total;
    report.final_occupied = stats.occupied;
    Ok(report)
}
