//! GPS interpretation of the decoded record stream:
//! stream state, track points, and the single-pass track builder.

pub mod builder;
pub mod fix;
pub mod point;
pub mod scale;

pub use builder::{Diagnostics, LogSink, RunStats, Track, TrackBuilder};
pub use fix::GpsFix;
pub use point::GpsPoint;
pub use scale::{Scale, SystClock};
