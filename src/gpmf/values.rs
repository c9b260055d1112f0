//! GPMF base type registry.
//!
//! Maps the single-byte type code in a record header to an element size
//! and a decode rule, and holds the decoded payload as a typed, flat
//! sequence of values. All multi-byte values are Big Endian.
//!
//! Only the base types the GoPro camera family emits for GPS-relevant
//! streams are covered. The zero type code marks a nested record
//! (see `record`) and never reaches `Values::decode`.

use std::io::Cursor;

use binrw::BinReaderExt;

use crate::errors::GpmfError;

/// Type code for nested records. Signals the decoder to recurse
/// into the payload rather than decode it as primitive values.
pub const NESTED: u8 = 0;

/// Decoded record payload as a flat, typed value sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    /// `b`: signed byte
    Sbyte(Vec<i8>),
    /// `B`: unsigned byte
    Ubyte(Vec<u8>),
    /// `s`: signed 16-bit integer
    Sint16(Vec<i16>),
    /// `S`: unsigned 16-bit integer
    Uint16(Vec<u16>),
    /// `l`: signed 32-bit integer
    Sint32(Vec<i32>),
    /// `L`: unsigned 32-bit integer
    Uint32(Vec<u32>),
    /// `j`: signed 64-bit integer
    Sint64(Vec<i64>),
    /// `J`: unsigned 64-bit integer
    Uint64(Vec<u64>),
    /// `f`: 32-bit IEEE float
    Float32(Vec<f32>),
    /// `d`: 64-bit IEEE float
    Float64(Vec<f64>),
    /// `q`: Q15.16 fixed point, normalised to `f64`
    Q1516(Vec<f64>),
    /// `Q`: Q31.32 fixed point, normalised to `f64`
    Q3132(Vec<f64>),
    /// `c`: single-byte character data
    Ascii(String),
    /// `U`: UTC date-time string, `YYMMDDHHMMSS.sss`
    Utc(String),
}

impl Values {
    /// Size in bytes of a single value for `type_code`.
    pub fn base_size(type_code: u8) -> Result<usize, GpmfError> {
        match type_code {
            b'b' | b'B' | b'c' | b'U' => Ok(1),
            b's' | b'S' => Ok(2),
            b'l' | b'L' | b'f' | b'q' => Ok(4),
            b'j' | b'J' | b'd' | b'Q' => Ok(8),
            bt => Err(GpmfError::UnknownBaseType(bt)),
        }
    }

    /// Decodes a record payload (padding stripped) into a flat
    /// value sequence. The payload length must be a multiple of
    /// the base type size.
    pub fn decode(type_code: u8, payload: &[u8]) -> Result<Self, GpmfError> {
        let base_size = Self::base_size(type_code)?;
        let n = payload.len() / base_size;
        let mut crs = Cursor::new(payload);

        // One read loop per base type to keep `read_be` calls
        // on concrete types.
        macro_rules! read_vec {
            ($t:ty) => {{
                let mut values: Vec<$t> = Vec::with_capacity(n);
                for _ in 0..n {
                    values.push(crs.read_be::<$t>()?);
                }
                values
            }};
        }

        let values = match type_code {
            b'b' => Self::Sbyte(read_vec!(i8)),
            b'B' => Self::Ubyte(read_vec!(u8)),
            b's' => Self::Sint16(read_vec!(i16)),
            b'S' => Self::Uint16(read_vec!(u16)),
            b'l' => Self::Sint32(read_vec!(i32)),
            b'L' => Self::Uint32(read_vec!(u32)),
            b'j' => Self::Sint64(read_vec!(i64)),
            b'J' => Self::Uint64(read_vec!(u64)),
            b'f' => Self::Float32(read_vec!(f32)),
            b'd' => Self::Float64(read_vec!(f64)),
            b'q' => Self::Q1516(
                read_vec!(i32).into_iter()
                    .map(|v| v as f64 / 65536.0)
                    .collect()
            ),
            b'Q' => Self::Q3132(
                read_vec!(i64).into_iter()
                    .map(|v| v as f64 / 4294967296.0)
                    .collect()
            ),
            b'c' => Self::Ascii(string_from_bytes(payload)),
            b'U' => Self::Utc(string_from_bytes(payload)),
            bt => return Err(GpmfError::UnknownBaseType(bt)),
        };

        Ok(values)
    }

    /// Flattens numeric values to `f64`.
    /// Returns `None` for character data.
    pub fn floats(&self) -> Option<Vec<f64>> {
        match self {
            Self::Sbyte(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Ubyte(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Sint16(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Uint16(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Sint32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Uint32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Sint64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Uint64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Float32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            Self::Float64(v) => Some(v.to_owned()),
            Self::Q1516(v) | Self::Q3132(v) => Some(v.to_owned()),
            Self::Ascii(_) | Self::Utc(_) => None,
        }
    }

    /// Returns character data as `&str`,
    /// `None` for numeric values.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Ascii(s) | Self::Utc(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Reads bytes as single-byte graphemes (ISO 8859-1 range),
/// dropping embedded null padding. The returned `String` is
/// standard UTF-8.
fn string_from_bytes(bytes: &[u8]) -> String {
    bytes.iter()
        .filter_map(|b| if b == &0 {None} else {Some(*b as char)})
        .collect()
}
