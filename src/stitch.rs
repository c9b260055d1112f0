//! Multi-file track stitching.
//!
//! Consecutive recordings (e.g. GoPro chapter files) are concatenated
//! onto one continuous timeline: each file's points are shifted so its
//! start lines up immediately after the previous file's end. The first
//! file anchors the absolute timeline at its own start.

use time::{Duration, OffsetDateTime};

use crate::gps::GpsPoint;

/// Accumulates per-file point sequences onto a single timeline.
/// Files must be appended in recording order.
#[derive(Debug, Default)]
pub struct Stitcher {
    points: Vec<GpsPoint>,
    /// Timeline position the next file's start maps to.
    /// Unset until the first file anchors the timeline.
    append_at: Option<OffsetDateTime>,
    total: Duration,
}

impl Stitcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one file's points, shifting every timestamp by
    /// `(previous cumulative end) - (file start)` so the combined
    /// timeline stays monotonic with no overlap.
    ///
    /// `start`/`end` is the file's own time range: the container
    /// clock for videos, first/last point for raw dumps.
    pub fn append(&mut self, mut points: Vec<GpsPoint>, start: OffsetDateTime, end: OffsetDateTime) {
        let append_at = *self.append_at.get_or_insert(start);
        let shift = start - append_at;
        if !shift.is_zero() {
            for point in points.iter_mut() {
                point.time -= shift;
            }
        }
        self.points.extend(points);

        let span = end - start;
        self.append_at = Some(append_at + span);
        self.total += span;
    }

    /// Combined point sequence, consuming the stitcher.
    pub fn into_points(self) -> Vec<GpsPoint> {
        self.points
    }

    pub fn points(&self) -> &[GpsPoint] {
        &self.points
    }

    /// Sum of all appended per-file spans.
    pub fn total_duration(&self) -> Duration {
        self.total
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
