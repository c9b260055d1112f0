//! Various GPMF-related decode and extraction errors.

use std::fmt;

/// Various GPMF related read/parse errors.
#[derive(Debug)]
pub enum GpmfError {
    /// Converted `binrw` error.
    BinReadError(binrw::Error),
    /// IO error.
    IOError(std::io::Error),
    /// Unknown base type when decoding record values.
    /// Recoverable: the record is skipped using its declared size.
    UnknownBaseType(u8),
    /// Record payload extends beyond the end of the buffer.
    /// Fatal for the current stream.
    TruncatedRecord{fourcc: String, offset: usize, needed: usize, remaining: usize},
    /// Declared structure size is not a multiple of the
    /// base type's size. Fatal for the current stream.
    SizeMismatch{fourcc: String, size: u8, base_size: usize},
    /// Failed to parse a GPSU/ffprobe date-time or duration string.
    TimestampParse(String),
    /// GPS data record encountered before any timestamp record
    /// (GPS5 requires a preceding GPSU, GPRI a preceding SYST).
    MissingTimestamp(&'static str),
    /// Source file has no `gpmd` data stream.
    NoTelemetryTrack(String),
    /// ffprobe output lacks `creation_time` or `Duration` for the file.
    NoTimeRange(String),
    /// External command could not be spawned or run.
    CommandFailed{cmd: String, err: std::io::Error},
    /// Converted `time` formatting error.
    TimeFormat(time::error::Format),
    /// No input file produced any GPS points.
    NoPoints,
}

impl std::error::Error for GpmfError {}

impl fmt::Display for GpmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpmfError::BinReadError(err) => write!(f, "{err}"),
            GpmfError::IOError(err) => write!(f, "IO error: {err}"),
            GpmfError::UnknownBaseType(bt) => write!(f, "Unknown base type {}/'{}'", bt, *bt as char),
            GpmfError::TruncatedRecord{fourcc, offset, needed, remaining} => write!(
                f,
                "Truncated record '{fourcc}' @ offset {offset}: payload needs {needed} bytes, {remaining} remain"
            ),
            GpmfError::SizeMismatch{fourcc, size, base_size} => write!(
                f,
                "Record '{fourcc}' declares structure size {size}, not a multiple of base type size {base_size}"
            ),
            GpmfError::TimestampParse(raw) => write!(f, "Failed to parse date-time '{raw}'"),
            GpmfError::MissingTimestamp(tag) => write!(f, "{tag} record encountered before any timestamp record"),
            GpmfError::NoTelemetryTrack(path) => write!(f, "File {path} doesn't have any metadata"),
            GpmfError::NoTimeRange(path) => write!(f, "Can't detect creation time/duration for {path}"),
            GpmfError::CommandFailed{cmd, err} => write!(f, "Failed to run '{cmd}': {err}"),
            GpmfError::TimeFormat(err) => write!(f, "{err}"),
            GpmfError::NoPoints => write!(f, "No GPS info in input files"),
        }
    }
}

/// Converts std::io::Error to GpmfError
impl From<std::io::Error> for GpmfError {
    fn from(err: std::io::Error) -> Self {
        GpmfError::IOError(err)
    }
}

/// Converts binrw::Error to GpmfError
impl From<binrw::Error> for GpmfError {
    fn from(err: binrw::Error) -> Self {
        GpmfError::BinReadError(err)
    }
}

/// Converts time::error::Format to GpmfError
impl From<time::error::Format> for GpmfError {
    fn from(err: time::error::Format) -> Self {
        GpmfError::TimeFormat(err)
    }
}

/// Converts GpmfError to std::io::Error
impl From<GpmfError> for std::io::Error {
    fn from(err: GpmfError) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, err)
    }
}
