//! Wall-clock time of day and weekday values.
//!
//! All stored times are already in the provider's local wall-clock time. A
//! [`WallTime`] is a plain minute-of-day integer so slot arithmetic never
//! touches a date-time type and cannot cross a day boundary by accident.
//!
//! Weekdays use a single convention everywhere in this crate:
//! **0 = Sunday, 1 = Monday, ... 6 = Saturday** (see [`DayOfWeek`]).

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Minutes in one day. `24:00` is accepted as an end-of-day marker.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Errors from parsing wall-clock times or weekday indices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("invalid wall-clock time '{0}', expected HH:MM")]
    Format(String),

    #[error("wall-clock time '{0}' is outside 00:00-24:00")]
    OutOfRange(String),

    #[error("weekday index {0} is outside 0 (Sunday) - 6 (Saturday)")]
    Weekday(u8),
}

/// A wall-clock time of day with minute precision, stored as minute-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(u32);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);
    pub const END_OF_DAY: WallTime = WallTime(MINUTES_PER_DAY);

    /// Build from hour and minute. `24:00` is the only valid time past 23:59.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    /// Build from a minute-of-day count in `0..=1440`.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(WallTime(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Add minutes, returning `None` if the result would pass end of day.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(TimeParseError::Format(s.to_string()));
        }
        let hour: u32 = h.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;
        let minute: u32 = m.parse().map_err(|_| TimeParseError::Format(s.to_string()))?;
        WallTime::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Day of the week, indexed 0 = Sunday through 6 = Saturday.
///
/// Serialised as the bare index so it matches the stored representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub const SUNDAY: DayOfWeek = DayOfWeek(0);
    pub const MONDAY: DayOfWeek = DayOfWeek(1);
    pub const TUESDAY: DayOfWeek = DayOfWeek(2);
    pub const WEDNESDAY: DayOfWeek = DayOfWeek(3);
    pub const THURSDAY: DayOfWeek = DayOfWeek(4);
    pub const FRIDAY: DayOfWeek = DayOfWeek(5);
    pub const SATURDAY: DayOfWeek = DayOfWeek(6);

    pub fn from_index(index: u8) -> Option<Self> {
        (index <= 6).then_some(DayOfWeek(index))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn to_weekday(self) -> Weekday {
        match self.0 {
            0 => Weekday::Sun,
            1 => Weekday::Mon,
            2 => Weekday::Tue,
            3 => Weekday::Wed,
            4 => Weekday::Thu,
            5 => Weekday::Fri,
            _ => Weekday::Sat,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_sunday is always in 0..=6.
        DayOfWeek(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = TimeParseError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        DayOfWeek::from_index(index).ok_or(TimeParseError::Weekday(index))
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.0
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_weekday())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_hh_mm() {
        let t: WallTime = "09:05".parse().unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");
        assert_eq!("9:30".parse::<WallTime>().unwrap().to_string(), "09:30");
    }

    #[test]
    fn accepts_end_of_day_only_at_exactly_24_00() {
        assert_eq!("24:00".parse::<WallTime>().unwrap(), WallTime::END_OF_DAY);
        assert!(matches!(
            "24:01".parse::<WallTime>(),
            Err(TimeParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn rejects_malformed_times() {
        for raw in ["", "0900", "9:5", "ab:cd", "10:60", "-1:00", "100:00"] {
            assert!(raw.parse::<WallTime>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn checked_add_stops_at_end_of_day() {
        let t = WallTime::from_hm(23, 30).unwrap();
        assert_eq!(t.checked_add_minutes(30), Some(WallTime::END_OF_DAY));
        assert_eq!(t.checked_add_minutes(31), None);
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        // 2026-03-15 is a Sunday, 2026-03-16 a Monday.
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        assert_eq!(DayOfWeek::of(sunday), DayOfWeek::SUNDAY);
        assert_eq!(DayOfWeek::of(monday).index(), 1);
        assert_eq!(DayOfWeek::SATURDAY.to_weekday(), Weekday::Sat);
        assert!(DayOfWeek::from_index(7).is_none());
    }

    #[test]
    fn weekday_serialises_as_index() {
        let json = serde_json::to_string(&DayOfWeek::TUESDAY).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<DayOfWeek>("9").is_err());
    }
}
