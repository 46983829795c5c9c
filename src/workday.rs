// ABOUTME: Workday calculator — parses "HH:MM" clock times and computes the exit time.
// ABOUTME: Exit = entry + 8 hours + lunch duration, wrapped modulo 24h.

use chrono::{NaiveTime, TimeDelta};
use thiserror::Error;

/// Fixed length of a working day, excluding the lunch break.
const WORKDAY_HOURS: i64 = 8;

/// A clock time could not be parsed as zero-padded 24-hour "HH:MM".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid HH:MM clock time: {input:?}")]
pub struct FormatError {
    pub input: String,
}

impl FormatError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Parse a zero-padded 24-hour "HH:MM" string into a time of day.
///
/// Surrounding whitespace is trimmed; beyond that the format is strict:
/// exactly two digits, a colon, two digits, with hour in 0..=23 and
/// minute in 0..=59.
pub fn parse_hhmm(input: &str) -> Result<NaiveTime, FormatError> {
    let trimmed = input.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(FormatError::new(input));
    }
    let digits_ok = bytes[..2]
        .iter()
        .chain(&bytes[3..])
        .all(u8::is_ascii_digit);
    if !digits_ok {
        return Err(FormatError::new(input));
    }
    // Slices are pure ASCII digits at this point, so parsing cannot fail.
    let hour: u32 = trimmed[..2].parse().map_err(|_| FormatError::new(input))?;
    let minute: u32 = trimmed[3..].parse().map_err(|_| FormatError::new(input))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| FormatError::new(input))
}

/// Compute the expected end-of-workday time from three "HH:MM" inputs.
///
/// The lunch duration is signed: a break-end earlier than break-start
/// shortens the day instead of being rejected. The sum wraps modulo 24
/// hours, so a late entry can produce an exit time past midnight.
pub fn exit_time(entry: &str, break_start: &str, break_end: &str) -> Result<String, FormatError> {
    let entry = parse_hhmm(entry)?;
    let break_start = parse_hhmm(break_start)?;
    let break_end = parse_hhmm(break_end)?;

    let lunch = break_end.signed_duration_since(break_start);
    let (exit, _wrapped_days) =
        entry.overflowing_add_signed(TimeDelta::hours(WORKDAY_HOURS) + lunch);

    Ok(exit.format("%H:%M").to_string())
}
