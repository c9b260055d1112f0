//! Date-time string helpers for `GPSU` payloads and ffprobe output.

use time::{Date, Duration, Month, OffsetDateTime};

use crate::errors::GpmfError;

/// Parses a `GPSU` wall clock string, `YYMMDDHHMMSS.sss`
/// (two-digit year, camera epoch 2000). The fractional part
/// is optional and read as milliseconds.
pub(crate) fn parse_gpsu(raw: &str) -> Result<OffsetDateTime, GpmfError> {
    let parse_err = || GpmfError::TimestampParse(raw.to_owned());

    let s = raw.trim();
    if s.len() < 12 || !s.as_bytes()[..12].iter().all(|b| b.is_ascii_digit()) {
        return Err(parse_err());
    }

    let num = |range: std::ops::Range<usize>| -> Result<u8, GpmfError> {
        s[range].parse::<u8>().map_err(|_| parse_err())
    };

    let year = 2000 + num(0 .. 2)? as i32;
    let month = Month::try_from(num(2 .. 4)?).map_err(|_| parse_err())?;
    let day = num(4 .. 6)?;
    let hour = num(6 .. 8)?;
    let minute = num(8 .. 10)?;
    let second = num(10 .. 12)?;
    let millisecond = match s.as_bytes().get(12) {
        Some(b'.') => {
            let frac: String = s[13 ..].chars()
                .take_while(|c| c.is_ascii_digit())
                .chain("00".chars())
                .take(3)
                .collect();
            frac.parse::<u16>().map_err(|_| parse_err())?
        }
        _ => 0,
    };

    Ok(Date::from_calendar_date(year, month, day).map_err(|_| parse_err())?
        .with_hms_milli(hour, minute, second, millisecond).map_err(|_| parse_err())?
        .assume_utc())
}

/// Parses an ffprobe `Duration:` value, `HH:MM:SS.ss`.
pub(crate) fn parse_clock_duration(raw: &str) -> Result<Duration, GpmfError> {
    let parse_err = || GpmfError::TimestampParse(raw.to_owned());

    let mut parts = raw.trim().splitn(3, ':');
    let mut next = || parts.next().ok_or_else(parse_err);
    let hours = next()?.parse::<i64>().map_err(|_| parse_err())?;
    let minutes = next()?.parse::<i64>().map_err(|_| parse_err())?;
    let seconds = next()?.parse::<f64>().map_err(|_| parse_err())?;

    Ok(Duration::seconds(hours * 3600 + minutes * 60) + Duration::seconds_f64(seconds))
}
