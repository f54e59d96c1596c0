//! Event timestamps and durations as reported by the device

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Device clock reading (no timezone)
///
/// Ranges are checked field by field: month 1-12, day 1-31, hour 0-23,
/// minute and second 0-59. Day is not checked against the month length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventTime {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl EventTime {
    /// Build a timestamp, rejecting out-of-range calendar fields
    pub fn new(
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, RangeError> {
        RangeError::check("month", month.into(), 1, 12)?;
        RangeError::check("day", day.into(), 1, 31)?;
        RangeError::check("hour", hour.into(), 0, 23)?;
        RangeError::check("minute", minute.into(), 0, 59)?;
        RangeError::check("second", second.into(), 0, 59)?;
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// `DD/MM/YYYY`
    pub fn date_string(&self) -> String {
        format!("{:02}/{:02}/{}", self.day, self.month, self.year)
    }

    /// `HH:MM:SS`
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// `DD/MM/YYYY HH:MM:SS`
    pub fn date_time_string(&self) -> String {
        format!("{} {}", self.date_string(), self.time_string())
    }

    /// Convert to a chrono timestamp.
    ///
    /// Returns `None` for combinations the device accepts but the calendar
    /// does not (e.g. 31/02).
    pub fn to_naive_date_time(&self, millisecond: u16) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?
            .and_hms_milli_opt(
                self.hour.into(),
                self.minute.into(),
                self.second.into(),
                millisecond.into(),
            )
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.date_string(), self.time_string())
    }
}

/// Duration a pin stayed in the fault state, as the device's seconds and
/// milliseconds fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaultDuration {
    seconds: u32,
    millis: u16,
}

impl FaultDuration {
    /// Build from the device's seconds and milliseconds fields
    pub fn from_parts(seconds: u32, millis: u32) -> Result<Self, RangeError> {
        let millis = RangeError::check("duration milliseconds", millis, 0, 999)?;
        Ok(Self {
            seconds,
            millis: millis as u16,
        })
    }

    /// `seconds + millis / 1000`, the value both exports print
    pub fn as_secs_f64(&self) -> f64 {
        f64::from(self.seconds) + f64::from(self.millis) / 1000.0
    }

    /// Operator-facing text.
    ///
    /// - under one second: `"250 ms"`
    /// - under one minute: `"2.250 sn"`
    /// - otherwise: `"1dk 5.3sn"`, the remainder `d % 60` to one decimal
    ///   with exact ties rounded up
    pub fn display(&self) -> String {
        let d = self.as_secs_f64();
        if d < 1.0 {
            format!("{} ms", (d * 1000.0).round())
        } else if d < 60.0 {
            format!("{:.3} sn", d)
        } else {
            format!("{}dk {}sn", (d / 60.0).floor(), tenths_half_up(d % 60.0))
        }
    }
}

/// One-decimal text of a non-negative value, rounding exact ties up.
///
/// `{:.1}` rounds ties to even. A value sits exactly halfway between two
/// tenths only when it is an odd multiple of 0.25.
fn tenths_half_up(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
        format!("{:.1}", value + 0.05)
    } else {
        format!("{:.1}", value)
    }
}

impl std::fmt::Display for FaultDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}
