//! GPMF record FourCC.
//! See <https://github.com/gopro/gpmf-parser> for the full tag inventory.
//! Only tags relevant to the GPS stream are listed as variants;
//! anything else ends up as `Custom`.

use std::fmt;

/// GPMF record Four CC.
/// See <https://github.com/gopro/gpmf-parser>.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FourCC {
    /// Device container (top level)
    Devc,
    /// Device id
    Dvid,
    /// Device name
    Dvnm,
    /// Stream container (nested in `DEVC`)
    Strm,
    /// Stream name
    Stnm,
    /// Standard units of the stream values
    Siun,
    /// Display units of the stream values
    Unit,
    /// Scale divisors for the stream's data records
    Scal,
    /// GPS UTC date-time
    Gpsu,
    /// GPS fix quality (0 = no lock, 2 = 2D, 3 = 3D)
    Gpsf,
    /// GPS position dilution of precision
    Gpsp,
    /// GPS sample: lat, lon, alt, 2D speed, 3D speed
    Gps5,
    /// System clock (seconds, milliseconds), Karma family
    Syst,
    /// GPS sample, Karma family
    Gpri,
    /// Total sample count
    Tsmp,
    /// Empty payload count
    Empt,

    Custom(String)
}

impl FourCC {
    pub fn from_slice(fourcc: &[u8]) -> Self {
        match fourcc {
            b"DEVC" => Self::Devc,
            b"DVID" => Self::Dvid,
            b"DVNM" => Self::Dvnm,
            b"STRM" => Self::Strm,
            b"STNM" => Self::Stnm,
            b"SIUN" => Self::Siun,
            b"UNIT" => Self::Unit,
            b"SCAL" => Self::Scal,
            b"GPSU" => Self::Gpsu,
            b"GPSF" => Self::Gpsf,
            b"GPSP" => Self::Gpsp,
            b"GPS5" => Self::Gps5,
            b"SYST" => Self::Syst,
            b"GPRI" => Self::Gpri,
            b"TSMP" => Self::Tsmp,
            b"EMPT" => Self::Empt,
            // Map 0-255 to char to prevent fourcc exceeding
            // the ASCII range from failing as UTF-8
            _ => Self::Custom(fourcc.iter().map(|b| *b as char).collect()),
        }
    }

    pub fn from_str(fourcc: &str) -> Self {
        Self::from_slice(fourcc.as_bytes())
    }

    pub fn to_str(&self) -> &str {
        match self {
            Self::Devc => "DEVC",
            Self::Dvid => "DVID",
            Self::Dvnm => "DVNM",
            Self::Strm => "STRM",
            Self::Stnm => "STNM",
            Self::Siun => "SIUN",
            Self::Unit => "UNIT",
            Self::Scal => "SCAL",
            Self::Gpsu => "GPSU",
            Self::Gpsf => "GPSF",
            Self::Gpsp => "GPSP",
            Self::Gps5 => "GPS5",
            Self::Syst => "SYST",
            Self::Gpri => "GPRI",
            Self::Tsmp => "TSMP",
            Self::Empt => "EMPT",
            Self::Custom(s) => s.as_str()
        }
    }
}

impl Default for FourCC {
    fn default() -> Self {
        Self::Custom("None".to_owned())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
