//! GPMF stream decoding: KLV records, base type registry, FourCC tags.

pub mod fourcc;
pub mod record;
pub mod values;

use std::path::Path;

use crate::errors::GpmfError;

pub use fourcc::FourCC;
pub use record::{Content, Record, RecordIter, RecordHeader, parse_stream, HEADER_SIZE};
pub use values::{Values, NESTED};

/// A decoded GPMF stream: the ordered top-level record tree
/// for one complete in-memory telemetry buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gpmf {
    records: Vec<Record>,
}

impl Gpmf {
    /// Decodes a complete GPMF elementary stream.
    pub fn from_slice(data: &[u8]) -> Result<Self, GpmfError> {
        Ok(Self{records: parse_stream(data)?})
    }

    /// Decodes a raw GPMF metadata dump file
    /// (e.g. an extracted `gpmd` track written to disk).
    pub fn from_path(path: &Path) -> Result<Self, GpmfError> {
        Self::from_slice(&std::fs::read(path)?)
    }

    /// Top-level records (usually `DEVC` containers).
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Depth-first iteration over all records in stream order,
    /// the order the track builder consumes them in.
    pub fn iter(&self) -> RecordIter {
        RecordIter::new(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
