//! Calendar date and start time of an appointment.
//!
//! Both values keep the fixed-width wire formats (`YYYY-MM-DD`, `HH:MM`) so
//! that a [`Slot`] orders the same way its string rendering does.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DomainError;

pub const DATE_FORMAT_HINT: &str = "Invalid date format (YYYY-MM-DD)";
pub const TIME_FORMAT_HINT: &str = "Invalid time format (HH:MM)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppointmentDate(NaiveDate);

impl AppointmentDate {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::validation("appointment_date", DATE_FORMAT_HINT);
        let bytes = raw.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }

        let year = digits(&bytes[0..4]).ok_or_else(invalid)?;
        let month = digits(&bytes[5..7]).ok_or_else(invalid)?;
        let day = digits(&bytes[8..10]).ok_or_else(invalid)?;

        NaiveDate::from_ymd_opt(year as i32, month, day).map(Self).ok_or_else(invalid)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for AppointmentDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl fmt::Display for AppointmentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.0.year(), self.0.month(), self.0.day())
    }
}

impl FromStr for AppointmentDate {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StartTime {
    hour: u8,
    minute: u8,
}

impl StartTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::validation("start_time", TIME_FORMAT_HINT);
        let bytes = raw.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }

        let hour = digits(&bytes[0..2]).ok_or_else(invalid)?;
        let minute = digits(&bytes[3..5]).ok_or_else(invalid)?;

        Self::new(hour as u8, minute as u8).ok_or_else(invalid)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for StartTime {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

/// A `(date, time)` pair in the single-chair schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub date: AppointmentDate,
    pub time: StartTime,
}

impl Slot {
    pub fn new(date: AppointmentDate, time: StartTime) -> Self {
        Self { date, time }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// Validates both halves of a slot, reporting the date first.
pub fn validate_slot(date: &str, time: &str) -> Result<Slot, DomainError> {
    Ok(Slot::new(AppointmentDate::parse(date)?, StartTime::parse(time)?))
}

fn digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, byte| {
        byte.is_ascii_digit().then(|| acc * 10 + u32::from(byte - b'0'))
    })
}

macro_rules! string_serde {
    ($name:ident) => {
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(de::Error::custom)
            }
        }
    };
}

string_serde!(AppointmentDate);
string_serde!(StartTime);
