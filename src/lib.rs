//! Decode GoPro GPMF telemetry and convert its GPS stream into
//! track points for GPX/KML export.
//!
//! GPMF is a Key-Length-Value format: 8-byte record headers
//! (FourCC, type code, structure size, repeat count) followed by a
//! 32-bit aligned payload, with zero-typed records nesting further
//! records. See <https://github.com/gopro/gpmf-parser>.
//!
//! ```rs
//! use gopro2gpx::{Gpmf, LogSink, TrackBuilder};
//! use std::path::Path;
//!
//! fn main() -> std::io::Result<()> {
//!     // Raw metadata dump, e.g. extracted via `FFmpeg::extract_meta`
//!     let gpmf = Gpmf::from_path(Path::new("GH010039.MP4.meta.bin"))?;
//!
//!     let mut sink = LogSink;
//!     let track = TrackBuilder::new(false, &mut sink).build(&gpmf)?;
//!
//!     for point in &track.points {
//!         println!("{point:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ffmpeg;
pub mod gpmf;
pub mod gps;
pub mod gpx;
pub mod kml;
pub mod stitch;
pub mod tests;

pub(crate) mod support;

pub use errors::GpmfError;
pub use ffmpeg::FFmpeg;
pub use gpmf::{Content, FourCC, Gpmf, Record, Values};
pub use gps::{
    Diagnostics,
    GpsFix,
    GpsPoint,
    LogSink,
    RunStats,
    Track,
    TrackBuilder,
};
pub use stitch::Stitcher;
