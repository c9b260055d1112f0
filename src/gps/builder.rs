//! GPS track builder.
//!
//! A single forward pass over the decoded record stream, carrying the
//! stream state (`SCAL` scale, `GPSU` wall clock, `GPSF` fix quality,
//! `SYST` system clock) and converting `GPS5`/`GPRI` data records into
//! scaled, time-stamped track points.
//!
//! The stream guarantees that scale and timestamp records precede the
//! data records of their sampling interval. A data record arriving
//! before any timestamp record violates that precondition and fails
//! the pass rather than defaulting silently.

use time::OffsetDateTime;

use crate::errors::GpmfError;
use crate::gpmf::{FourCC, Gpmf, Record};
use crate::support::parse_gpsu;

use super::fix::GpsFix;
use super::point::GpsPoint;
use super::scale::{Scale, SystClock};

/// Per-pass point counts. Diagnostic only: the counts never decide
/// which points are emitted (only the skip flag does, for bad fixes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Points appended to the track.
    pub ok: usize,
    /// Samples seen while the receiver had no lock.
    pub bad_fix: usize,
    /// No-lock samples discarded because skipping was requested.
    pub bad_fix_skipped: usize,
    /// Samples rejected for all-zero coordinates.
    pub empty: usize,
}

impl RunStats {
    /// Total samples considered (skipped bad-fix samples are
    /// already included in `bad_fix`).
    pub fn total(&self) -> usize {
        self.ok + self.bad_fix + self.empty
    }
}

/// Injected diagnostics sink, keeping the builder itself
/// free of output side effects.
pub trait Diagnostics {
    /// Called when the fix quality changes between records.
    fn record_transition(&mut self, from: GpsFix, to: GpsFix);
    /// Called once at the end of a pass with the final counts.
    fn record_stats(&mut self, stats: &RunStats);
}

/// Routes diagnostics to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl Diagnostics for LogSink {
    fn record_transition(&mut self, _from: GpsFix, to: GpsFix) {
        log::info!("GPSFIX change to {} [{}]", to.as_raw(), to);
    }

    fn record_stats(&mut self, stats: &RunStats) {
        log::info!("-- stats -----------------");
        log::info!("- Ok:              {:5}", stats.ok);
        log::info!("- GPSFIX=0 (bad):  {:5} (skipped: {})", stats.bad_fix, stats.bad_fix_skipped);
        log::info!("- Empty (No data): {:5}", stats.empty);
        log::info!("Total points:      {:5}", stats.total());
        log::info!("--------------------------");
    }
}

/// Builder output: the ordered point sequence for one file
/// plus its run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub points: Vec<GpsPoint>,
    pub stats: RunStats,
}

impl Track {
    /// First and last point timestamps. Used as the file time range
    /// for raw metadata dumps, which have no container clock.
    pub fn time_range(&self) -> Option<(OffsetDateTime, OffsetDateTime)> {
        Some((self.points.first()?.time, self.points.last()?.time))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Which data record a GPS sample came from. `GPS5` samples are
/// timed by the `GPSU` wall clock, `GPRI` (Karma) by the `SYST`
/// system clock.
#[derive(Debug, Clone, Copy)]
enum GpsSource {
    Gps5,
    Gpri,
}

/// Stateful converter from a decoded record stream to a `Track`.
/// One builder handles exactly one file's stream; state does not
/// carry over between files.
pub struct TrackBuilder<'a> {
    skip_bad_fix: bool,
    sink: &'a mut dyn Diagnostics,
    scale: Scale,
    gps_time: Option<OffsetDateTime>,
    fix: GpsFix,
    syst: SystClock,
    syst_seen: bool,
    points: Vec<GpsPoint>,
    stats: RunStats,
}

impl<'a> TrackBuilder<'a> {
    pub fn new(skip_bad_fix: bool, sink: &'a mut dyn Diagnostics) -> Self {
        Self {
            skip_bad_fix,
            sink,
            scale: Scale::default(),
            gps_time: None,
            fix: GpsFix::default(),
            syst: SystClock::default(),
            syst_seen: false,
            points: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Runs the pass over a decoded stream and returns the track.
    pub fn build(mut self, gpmf: &Gpmf) -> Result<Track, GpmfError> {
        for record in gpmf.iter() {
            self.process(record)?;
        }
        self.sink.record_stats(&self.stats);
        Ok(Track{points: self.points, stats: self.stats})
    }

    fn process(&mut self, record: &Record) -> Result<(), GpmfError> {
        match record.fourcc {
            FourCC::Scal => {
                if let Some(values) = record.floats() {
                    self.scale = Scale::from_values(&values);
                }
            }
            FourCC::Gpsu => {
                if let Some(raw) = record.text() {
                    self.gps_time = Some(parse_gpsu(raw)?);
                }
            }
            FourCC::Gpsf => {
                if let Some(&raw) = record.floats().as_deref().and_then(|v| v.first()) {
                    let fix = GpsFix::from_raw(raw as i64);
                    if fix != self.fix {
                        self.sink.record_transition(self.fix, fix);
                    }
                    self.fix = fix;
                }
            }
            FourCC::Syst => {
                if let Some(values) = record.floats() {
                    self.syst_seen = true;
                    let scaled = self.scale.apply(&values);
                    if let (Some(&seconds), Some(&milliseconds)) = (scaled.first(), scaled.get(1)) {
                        let clock = SystClock{seconds, milliseconds};
                        // All-zero SYST at the start of a recording
                        // is a sentinel, not a clock reading.
                        if clock.is_set() {
                            self.syst = clock;
                        }
                    }
                }
            }
            FourCC::Gps5 => self.gps_samples(record, GpsSource::Gps5)?,
            FourCC::Gpri => self.gps_samples(record, GpsSource::Gpri)?,
            // Not part of the GPS track.
            _ => (),
        }

        Ok(())
    }

    /// Converts every element of a `GPS5`/`GPRI` record into a track
    /// point, applying empty-coordinate rejection, fix gating, and
    /// scaling per sample. Field order is lat, lon, alt, 2D speed,
    /// 3D speed.
    fn gps_samples(&mut self, record: &Record, source: GpsSource) -> Result<(), GpmfError> {
        let fields = match record.fields() {
            Some(n) if n >= 5 => n,
            _ => return Ok(()),
        };
        let values = match record.floats() {
            Some(v) => v,
            None => return Ok(()),
        };

        for sample in values.chunks(fields) {
            if sample.len() < fields {
                continue;
            }
            // Raw (unscaled) all-zero coordinates mean the receiver
            // had no data at all for this sample.
            if sample[0] == 0.0 && sample[1] == 0.0 && sample[2] == 0.0 {
                log::warn!("Skipping empty point");
                self.stats.empty += 1;
                continue;
            }
            if self.fix == GpsFix::NoLock {
                self.stats.bad_fix += 1;
                if self.skip_bad_fix {
                    log::warn!("Skipping point due to GPSFIX=0");
                    self.stats.bad_fix_skipped += 1;
                    continue;
                }
            }

            let time = match source {
                GpsSource::Gps5 => self
                    .gps_time
                    .ok_or(GpmfError::MissingTimestamp("GPS5"))?,
                GpsSource::Gpri => {
                    if !self.syst_seen {
                        return Err(GpmfError::MissingTimestamp("GPRI"));
                    }
                    // Only sentinel SYST records so far: withhold the
                    // sample rather than invent a timestamp.
                    if !self.syst.is_set() {
                        continue;
                    }
                    OffsetDateTime::from_unix_timestamp(self.syst.milliseconds as i64)
                        .map_err(|_| GpmfError::TimestampParse(
                            format!("SYST epoch {}", self.syst.milliseconds)
                        ))?
                }
            };

            let scaled = self.scale.apply(sample);
            self.points.push(GpsPoint {
                latitude: scaled[0],
                longitude: scaled[1],
                elevation: scaled[2],
                time,
                speed: scaled[3],
            });
            self.stats.ok += 1;
        }

        Ok(())
    }
}
