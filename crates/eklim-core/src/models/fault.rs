//! Fault record model (one logged pin transition read from the device)

use serde::{Deserialize, Serialize, Serializer};

use super::{EventTime, FaultDuration, Pin, PinCategory};
use crate::error::RangeError;

/// One decoded fault event.
///
/// Built once by the record decoder and never mutated afterwards; the
/// retrieval loop only attaches the device slot it was read from via
/// [`FaultRecord::with_record_index`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultRecord {
    /// 1-based device slot the record was requested from
    record_index: Option<u32>,
    raw_pin_code: u8,
    pin_category: PinCategory,
    display_pin_number: u8,
    pin_label: String,
    #[serde(rename = "dateTime", serialize_with = "serialize_event_time")]
    timestamp: EventTime,
    millisecond: u16,
    #[serde(skip)]
    duration: FaultDuration,
    duration_seconds: f64,
    #[serde(rename = "duration")]
    duration_display: String,
    /// Record body exactly as received
    raw_data: String,
}

fn serialize_event_time<S: Serializer>(t: &EventTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&t.date_time_string())
}

impl FaultRecord {
    /// Assemble a record from decoded fields
    pub fn new(
        raw_pin_code: u8,
        timestamp: EventTime,
        millisecond: u16,
        duration: FaultDuration,
        raw_data: impl Into<String>,
    ) -> Result<Self, RangeError> {
        RangeError::check("millisecond", millisecond.into(), 0, 999)?;
        let pin = Pin::from_code(raw_pin_code);
        Ok(Self {
            record_index: None,
            raw_pin_code,
            pin_category: pin.category,
            display_pin_number: pin.display_number,
            pin_label: pin.label(),
            timestamp,
            millisecond,
            duration,
            duration_seconds: duration.as_secs_f64(),
            duration_display: duration.display(),
            raw_data: raw_data.into(),
        })
    }

    /// Tag the record with the device slot it was fetched from
    pub fn with_record_index(mut self, index: u32) -> Self {
        self.record_index = Some(index);
        self
    }

    pub fn record_index(&self) -> Option<u32> {
        self.record_index
    }

    pub fn raw_pin_code(&self) -> u8 {
        self.raw_pin_code
    }

    pub fn pin_category(&self) -> PinCategory {
        self.pin_category
    }

    pub fn display_pin_number(&self) -> u8 {
        self.display_pin_number
    }

    pub fn pin_label(&self) -> &str {
        &self.pin_label
    }

    pub fn timestamp(&self) -> &EventTime {
        &self.timestamp
    }

    pub fn millisecond(&self) -> u16 {
        self.millisecond
    }

    pub fn duration(&self) -> FaultDuration {
        self.duration
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn duration_display(&self) -> &str {
        &self.duration_display
    }

    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    /// `DD/MM/YYYY HH:MM:SS.<ms>` with the millisecond unpadded, as the
    /// dashboard table shows it
    pub fn date_time_with_millis(&self) -> String {
        format!("{}.{}", self.timestamp.date_time_string(), self.millisecond)
    }
}

/// Filter for selecting fault records by pin category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinFilter {
    /// Every record
    #[default]
    All,
    /// Only records of the given category
    Category(PinCategory),
}

impl PinFilter {
    /// Check a single record
    pub fn matches(&self, record: &FaultRecord) -> bool {
        match self {
            PinFilter::All => true,
            PinFilter::Category(category) => record.pin_category() == *category,
        }
    }

    /// Select matching records, preserving order
    pub fn apply<'a>(&self, records: &'a [FaultRecord]) -> Vec<&'a FaultRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
