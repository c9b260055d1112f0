//! Stream scale state (`SCAL`) and Karma system clock (`SYST`).

/// Scale divisors from the most recent `SCAL` record.
/// Data records arrive unscaled; values are divided by these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Scale {
    /// Builds a scale vector from decoded `SCAL` values.
    /// Missing divisors default to 1.
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            x: values.first().copied().unwrap_or(1.0),
            y: values.get(1).copied().unwrap_or(1.0),
            z: values.get(2).copied().unwrap_or(1.0),
        }
    }

    /// Divides a sample's fields element-wise by the divisors,
    /// in field order. Fields past the third pass through unscaled.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values.iter()
            .zip([self.x, self.y, self.z].into_iter().chain(std::iter::repeat(1.0)))
            .map(|(value, divisor)| value / divisor)
            .collect()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self{x: 1.0, y: 1.0, z: 1.0}
    }
}

/// System clock from the most recent `SYST` record (Karma family).
/// Times `GPRI` data records the way `GPSU` times `GPS5`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystClock {
    pub seconds: f64,
    pub milliseconds: f64,
}

impl SystClock {
    /// Cameras emit an all-zero `SYST` sentinel at the start of
    /// a recording; only a clock with both components set is usable.
    pub fn is_set(&self) -> bool {
        self.seconds != 0.0 && self.milliseconds != 0.0
    }
}
