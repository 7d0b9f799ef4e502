//! Capacity figures for a lot.

/// Snapshot of how full a lot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityStats {
    pub total: u32,
    pub occupied: u32,
    pub available: u32,
}

impl CapacityStats {
    pub(crate) fn new(total: u32, available: u32) -> Self {
        Self {
            total,
            occupied: total - available,
            available,
        }
    }

    /// Occupied share of the lot as a percentage with two decimals, e.g. `"30.00%"`.
    ///
    /// An empty lot reports `"0.00%"`. Exact ties round up, so 1 of 32 is `"3.13%"`.
    pub fn occupancy_rate(&self) -> String {
        let rate = if self.total == 0 {
            0.0
        } else {
            f64::from(self.occupied) / f64::from(self.total) * 100.0
        };
        format!("{}%", two_decimals(rate))
    }
}

/// Fixed two-decimal rendering of a non-negative value, rounding ties away from zero.
///
/// `{:.2}` rounds the exact binary value correctly but breaks ties to even, so
/// only exact ties need handling here.
fn two_decimals(value: f64) -> String {
    let scaled = value * 100.0;
    if scaled.fract() != 0.5 {
        return format!("{:.2}", value);
    }
    // Exact error of the product; negative means the true value sits below the tie.
    let residual = value.mul_add(100.0, -scaled);
    let hundredths = if residual < 0.0 {
        scaled.floor()
    } else {
        scaled.ceil()
    } as u64;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}
