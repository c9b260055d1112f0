//! GPMF KLV record decoder.
//!
//! Each record starts with a fixed 8-byte header:
//! 4-byte FourCC, 1-byte type code, 1-byte structure size,
//! 2-byte Big Endian repeat count. The payload length is
//! `size * repeat` bytes, padded up to the next 32-bit boundary.
//!
//! Records with the zero type code are containers (`DEVC`, `STRM`)
//! and nest further records inside their payload, forming a tree.

use std::io::Cursor;

use binrw::{BinRead, BinReaderExt};

use crate::errors::GpmfError;

use super::fourcc::FourCC;
use super::values::{Values, NESTED};

/// KLV record header size in bytes.
pub const HEADER_SIZE: usize = 8;

/// Raw 8-byte KLV record header.
#[derive(Debug, Clone, Default, BinRead)]
pub struct RecordHeader {
    /// Record FourCC, e.g. `GPS5`.
    pub fourcc: [u8; 4],
    /// Base type code, `0` for nested records.
    pub type_code: u8,
    /// Structure size: bytes per element.
    /// One element may pack several base values,
    /// e.g. `GPS5` elements are five 32-bit integers, size 20.
    pub size: u8,
    /// Number of elements.
    pub repeat: u16,
}

impl RecordHeader {
    /// Raw payload length in bytes, before padding.
    pub fn payload_size(&self) -> usize {
        self.size as usize * self.repeat as usize
    }

    /// Payload length rounded up to the next multiple of 4 bytes.
    /// The decoder always advances by the padded length.
    pub fn padded_size(&self) -> usize {
        (self.payload_size() + 3) & !3
    }
}

/// Decoded KLV record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fourcc: FourCC,
    pub type_code: u8,
    pub size: u8,
    pub repeat: u16,
    pub content: Content,
}

/// Record payload: primitive values, or child records
/// for the zero/nested type code.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Primitive(Values),
    Container(Vec<Record>),
}

impl Record {
    /// Returns decoded values for primitive records,
    /// `None` for containers.
    pub fn values(&self) -> Option<&Values> {
        match &self.content {
            Content::Primitive(values) => Some(values),
            Content::Container(_) => None,
        }
    }

    /// Returns the flat numeric value sequence,
    /// `None` for containers and character data.
    pub fn floats(&self) -> Option<Vec<f64>> {
        self.values().and_then(|v| v.floats())
    }

    /// Returns character data, `None` for containers
    /// and numeric values.
    pub fn text(&self) -> Option<&str> {
        self.values().and_then(|v| v.text())
    }

    /// Number of base values packed into one element,
    /// i.e. `size / base type size`.
    pub fn fields(&self) -> Option<usize> {
        let base_size = Values::base_size(self.type_code).ok()?;
        Some(self.size as usize / base_size)
    }
}

/// Decodes a complete GPMF stream into an ordered record tree.
///
/// Records with an unsupported type code are dropped from the output,
/// but their declared padded size still advances the read offset.
/// A payload extending past the end of the buffer is a fatal
/// structural error.
pub fn parse_stream(data: &[u8]) -> Result<Vec<Record>, GpmfError> {
    let mut records = Vec::new();
    let mut offset = 0_usize;

    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < HEADER_SIZE {
            return Err(GpmfError::TruncatedRecord{
                fourcc: "????".to_owned(),
                offset,
                needed: HEADER_SIZE,
                remaining,
            })
        }

        let header: RecordHeader = Cursor::new(&data[offset .. offset + HEADER_SIZE]).read_be()?;
        let fourcc = FourCC::from_slice(&header.fourcc);
        let len = header.payload_size();
        offset += HEADER_SIZE;

        if offset + len > data.len() {
            return Err(GpmfError::TruncatedRecord{
                fourcc: fourcc.to_str().to_owned(),
                offset,
                needed: len,
                remaining: data.len() - offset,
            })
        }
        let payload = &data[offset .. offset + len];

        if header.type_code == NESTED {
            let children = parse_stream(payload)?;
            records.push(Record{
                fourcc,
                type_code: header.type_code,
                size: header.size,
                repeat: header.repeat,
                content: Content::Container(children),
            });
        } else {
            match Values::base_size(header.type_code) {
                Ok(base_size) if header.size as usize % base_size != 0 => {
                    return Err(GpmfError::SizeMismatch{
                        fourcc: fourcc.to_str().to_owned(),
                        size: header.size,
                        base_size,
                    })
                }
                Ok(_) => {
                    records.push(Record{
                        fourcc,
                        type_code: header.type_code,
                        size: header.size,
                        repeat: header.repeat,
                        content: Content::Primitive(Values::decode(header.type_code, payload)?),
                    });
                }
                // Unsupported type is local to the record:
                // skip it, keep decoding at the next offset.
                Err(GpmfError::UnknownBaseType(bt)) => {
                    log::warn!(
                        "Skipping record '{}' with unsupported type {}/'{}'",
                        fourcc, bt, bt as char
                    );
                }
                Err(err) => return Err(err),
            }
        }

        // Final record may lack trailing pad bytes,
        // the loop condition exits either way.
        offset += header.padded_size();
    }

    Ok(records)
}

/// Depth-first iterator over a record tree, in stream order.
/// Containers are yielded before their children.
pub struct RecordIter<'a> {
    stack: Vec<std::slice::Iter<'a, Record>>,
}

impl<'a> RecordIter<'a> {
    pub(crate) fn new(records: &'a [Record]) -> Self {
        Self{stack: vec![records.iter()]}
    }
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(record) => {
                    if let Content::Container(children) = &record.content {
                        self.stack.push(children.iter());
                    }
                    return Some(record)
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
