//! Scaled, time-stamped GPS track point.

use time::OffsetDateTime;

/// One GPS track point, ready for serialization.
///
/// Positions are degrees, elevation meters, speed meters/second.
/// `time` is absolute; the stitcher shifts it when concatenating
/// multiple recordings onto one timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub time: OffsetDateTime,
    pub speed: f64,
}
