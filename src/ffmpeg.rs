//! FFmpeg/ffprobe collaborator.
//!
//! GoPro MP4s interleave the GPMF telemetry as a `gpmd` data stream.
//! This wrapper locates that stream with `ffprobe`, extracts its raw
//! bytes with `ffmpeg` (codec copy to stdout), and derives the video's
//! absolute (start, end) time range from the probe output.
//!
//! The probe-output scraping lives in free functions so it can be
//! tested without spawning processes.

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use regex::Regex;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::errors::GpmfError;
use crate::support::parse_clock_duration;

/// External command wrapper. Both commands must be on `PATH`,
/// or set to absolute paths.
#[derive(Debug, Clone)]
pub struct FFmpeg {
    pub ffmpeg_cmd: String,
    pub ffprobe_cmd: String,
}

impl Default for FFmpeg {
    fn default() -> Self {
        Self {
            ffmpeg_cmd: "ffmpeg".to_owned(),
            ffprobe_cmd: "ffprobe".to_owned(),
        }
    }
}

impl FFmpeg {
    /// Runs ffprobe on `path`. Stream and format information
    /// is written to stderr.
    fn probe(&self, path: &Path) -> Result<String, GpmfError> {
        let output = Command::new(&self.ffprobe_cmd)
            .arg(path)
            .stdout(Stdio::null())
            .output()
            .map_err(|err| GpmfError::CommandFailed{cmd: self.ffprobe_cmd.to_owned(), err})?;

        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }

    /// Locates the `gpmd` telemetry stream and returns its stream id
    /// together with the matched probe line.
    pub fn meta_track(&self, path: &Path) -> Result<(usize, String), GpmfError> {
        let probe = self.probe(path)?;
        gpmd_stream(&probe)
            .ok_or_else(|| GpmfError::NoTelemetryTrack(path.display().to_string()))
    }

    /// Extracts the raw GPMF elementary stream from a video container.
    pub fn extract_meta(&self, path: &Path) -> Result<Vec<u8>, GpmfError> {
        let (track, line) = self.meta_track(path)?;
        log::debug!("Working on file {} track {track} ({line})", path.display());

        let output = Command::new(&self.ffmpeg_cmd)
            .arg("-y")
            .arg("-i").arg(path)
            .args(["-codec", "copy", "-map", &format!("0:{track}"), "-f", "rawvideo", "-"])
            .stderr(Stdio::null())
            .output()
            .map_err(|err| GpmfError::CommandFailed{cmd: self.ffmpeg_cmd.to_owned(), err})?;

        Ok(output.stdout)
    }

    /// Absolute (start, end) time range of a video file, from its
    /// `creation_time` tag and `Duration` line.
    pub fn time_range(&self, path: &Path) -> Result<(OffsetDateTime, OffsetDateTime), GpmfError> {
        let probe = self.probe(path)?;
        parse_time_range(&probe)
            .ok_or_else(|| GpmfError::NoTimeRange(path.display().to_string()))
    }
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("hardcoded regex"))
}

/// Finds the `gpmd` data stream in ffprobe output, e.g.
/// `Stream #0:3(eng): Data: bin_data (gpmd / 0x646D7067), 29 kb/s`.
/// Returns the stream id within input 0 and the matched line.
pub fn gpmd_stream(probe: &str) -> Option<(usize, String)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"(?i)Stream #\d+:(\d+)(?:\([^)]*\))?: Data: \w+ \(gpmd");

    let caps = re.captures(probe)?;
    let track = caps.get(1)?.as_str().parse::<usize>().ok()?;

    Some((track, caps.get(0)?.as_str().to_owned()))
}

/// Derives (start, end) from ffprobe's `creation_time` (RFC 3339)
/// and `Duration` (`HH:MM:SS.ss`) lines.
pub fn parse_time_range(probe: &str) -> Option<(OffsetDateTime, OffsetDateTime)> {
    static RE_CREATED: OnceLock<Regex> = OnceLock::new();
    static RE_DURATION: OnceLock<Regex> = OnceLock::new();
    let re_created = regex(&RE_CREATED, r"(?i)creation_time\s*:\s*(\S+)");
    let re_duration = regex(&RE_DURATION, r"(?i)Duration\s*:\s*([^\s,]+)");

    let start_raw = re_created.captures(probe)?.get(1)?.as_str();
    let duration_raw = re_duration.captures(probe)?.get(1)?.as_str();

    let start = OffsetDateTime::parse(start_raw, &Rfc3339).ok()?;
    let duration = parse_clock_duration(duration_raw).ok()?;

    Some((start, start + duration))
}
