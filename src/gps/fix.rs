//! GPS fix quality (`GPSF`).

use std::fmt;

/// GPS receiver lock state, from `GPSF` records.
/// Gates whether data records are trusted as track points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsFix {
    /// No satellite lock, positions are unreliable.
    #[default]
    NoLock,
    /// 2D lock, no altitude solution.
    Fix2D,
    /// Full 3D lock.
    Fix3D,
}

impl GpsFix {
    /// Maps the raw `GPSF` value. Anything outside the
    /// documented {0, 2, 3} set counts as no lock.
    pub fn from_raw(value: i64) -> Self {
        match value {
            2 => Self::Fix2D,
            3 => Self::Fix3D,
            _ => Self::NoLock,
        }
    }

    pub fn as_raw(&self) -> u8 {
        match self {
            Self::NoLock => 0,
            Self::Fix2D => 2,
            Self::Fix3D => 3,
        }
    }
}

impl fmt::Display for GpsFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoLock => "No Lock",
            Self::Fix2D => "2D Lock",
            Self::Fix3D => "3D Lock",
        };
        write!(f, "{label}")
    }
}
