//! Fault record decoding (`NNNNNv` answers)
//!
//! A record answer is an optional `<index>:` prefix followed by a body of at
//! least 22 fixed-width characters:
//!
//! ```text
//! offset  0  2  4  6  8  10 12 14  17 19  22
//!         PP YY MM DD hh mm ss mmm SS mmm
//! ```
//!
//! `PP` is the pin code in hex; every other field is decimal. `SS mmm` is the
//! fault duration in seconds and milliseconds. Anything past offset 22 is
//! kept in the raw data and otherwise ignored.

use std::ops::Range;

use eklim_core::{EventTime, FaultDuration, FaultError, FaultRecord, FaultResult};
use tracing::debug;

use super::{DecodeError, DeviceCommand};
use crate::channel::{send_with_timeout, CommandChannel};
use crate::config::RetrievalConfig;

/// Minimum body length in characters
pub const MIN_BODY_LEN: usize = 22;

const PIN: Range<usize> = 0..2;
const YEAR: Range<usize> = 2..4;
const MONTH: Range<usize> = 4..6;
const DAY: Range<usize> = 6..8;
const HOUR: Range<usize> = 8..10;
const MINUTE: Range<usize> = 10..12;
const SECOND: Range<usize> = 12..14;
const MILLISECOND: Range<usize> = 14..17;
const DURATION_SECONDS: Range<usize> = 17..19;
const DURATION_MILLIS: Range<usize> = 19..22;

/// Device years are stored as an offset from 2000
const YEAR_BASE: u16 = 2000;

/// Decode one record answer
///
/// The answer is trimmed; if it contains a colon, everything before the
/// first colon is the slot prefix and is dropped.
pub fn decode_fault_record(raw: &str) -> Result<FaultRecord, DecodeError> {
    let trimmed = raw.trim();
    let body = match trimmed.split_once(':') {
        Some((_, body)) => body,
        None => trimmed,
    };

    let len = body.chars().count();
    if len < MIN_BODY_LEN {
        return Err(DecodeError::TooShort { len });
    }

    let pin = hex_field(body, "pin code", PIN)?;
    let year = YEAR_BASE + dec_field(body, "year", YEAR)? as u16;
    let month = dec_field(body, "month", MONTH)? as u8;
    let day = dec_field(body, "day", DAY)? as u8;
    let hour = dec_field(body, "hour", HOUR)? as u8;
    let minute = dec_field(body, "minute", MINUTE)? as u8;
    let second = dec_field(body, "second", SECOND)? as u8;
    let millisecond = dec_field(body, "millisecond", MILLISECOND)? as u16;
    let duration_seconds = dec_field(body, "duration seconds", DURATION_SECONDS)?;
    let duration_millis = dec_field(body, "duration milliseconds", DURATION_MILLIS)?;

    let timestamp = EventTime::new(year, month, day, hour, minute, second)?;
    let duration = FaultDuration::from_parts(duration_seconds, duration_millis)?;

    Ok(FaultRecord::new(pin, timestamp, millisecond, duration, body)?)
}

/// Slice a field, tolerating bodies that are not pure ASCII
fn slice<'a>(
    body: &'a str,
    field: &'static str,
    range: Range<usize>,
) -> Result<&'a str, DecodeError> {
    body.get(range.clone()).ok_or_else(|| DecodeError::InvalidField {
        field,
        value: String::from_utf8_lossy(&body.as_bytes()[range]).into_owned(),
    })
}

fn hex_field(body: &str, field: &'static str, range: Range<usize>) -> Result<u8, DecodeError> {
    let text = slice(body, field, range)?;
    let invalid = || DecodeError::InvalidField {
        field,
        value: text.to_string(),
    };
    let bytes = hex::decode(text).map_err(|_| invalid())?;
    bytes.first().copied().ok_or_else(invalid)
}

fn dec_field(body: &str, field: &'static str, range: Range<usize>) -> Result<u32, DecodeError> {
    let text = slice(body, field, range)?;
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::InvalidField {
            field,
            value: text.to_string(),
        });
    }
    text.parse().map_err(|_| DecodeError::InvalidField {
        field,
        value: text.to_string(),
    })
}

/// Request and decode the record in one device slot
///
/// The answer must be longer than `min_record_response_len` characters
/// before it is decoded; the device answers `E` for an empty slot. The
/// returned record is tagged with `index`.
pub async fn fetch_fault_record(
    channel: &dyn CommandChannel,
    index: u32,
    config: &RetrievalConfig,
) -> FaultResult<FaultRecord> {
    let command = DeviceCommand::FaultRecord(index).to_wire();
    let reply = send_with_timeout(channel, &command, config.command_timeout()).await?;

    let len = reply.response_length();
    if len <= config.min_record_response_len {
        debug!(index, response = %reply.response, "Fault record answer too short");
        return Err(FaultError::Channel(format!(
            "record {} answer too short ({} characters): {:?}",
            index, len, reply.response
        )));
    }

    let record = decode_fault_record(&reply.response)?;
    Ok(record.with_record_index(index))
}
