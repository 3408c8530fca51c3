//! Weekly schedule: seven day entries with optional "HH:MM" open/close times.
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid time of day {0:?}, expected HH:MM")]
pub struct InvalidTimeOfDay(pub String);

/// Minute-precision wall-clock time; wire and storage form is "HH:MM".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn as_naive(&self) -> NaiveTime { self.0 }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(t: NaiveTime) -> Self {
        // seconds are not representable in "HH:MM"
        Self(t.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(t))
    }
}

impl FromStr for TimeOfDay {
    type Err = InvalidTimeOfDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(InvalidTimeOfDay(s.to_string()));
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| InvalidTimeOfDay(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// One weekday. Absent times mean "not applicable", never midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DaySchedule {
    pub is_open: bool,
    pub open_time: Option<TimeOfDay>,
    pub close_time: Option<TimeOfDay>,
}

impl DaySchedule {
    pub fn open(open_time: TimeOfDay, close_time: TimeOfDay) -> Self {
        Self { is_open: true, open_time: Some(open_time), close_time: Some(close_time) }
    }

    pub fn closed() -> Self { Self::default() }

    fn validate(&self, day: &str) -> Result<(), String> {
        match (self.is_open, self.open_time, self.close_time) {
            (true, Some(_), Some(_)) | (false, None, None) => Ok(()),
            (true, _, _) => Err(format!("{day}: open day needs both openTime and closeTime")),
            (false, _, _) => Err(format!("{day}: closed day must not carry times")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct WorkingHours {
    pub monday: DaySchedule,
    pub tuesday: DaySchedule,
    pub wednesday: DaySchedule,
    pub thursday: DaySchedule,
    pub friday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday: DaySchedule,
}

impl WorkingHours {
    /// Same schedule on every day.
    pub fn uniform(day: DaySchedule) -> Self {
        Self { monday: day, tuesday: day, wednesday: day, thursday: day, friday: day, saturday: day, sunday: day }
    }

    /// Days in calendar order, keyed by lowercase weekday name.
    pub fn days(&self) -> [(&'static str, &DaySchedule); 7] {
        [
            ("monday", &self.monday),
            ("tuesday", &self.tuesday),
            ("wednesday", &self.wednesday),
            ("thursday", &self.thursday),
            ("friday", &self.friday),
            ("saturday", &self.saturday),
            ("sunday", &self.sunday),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        self.days().iter().try_for_each(|(name, day)| day.validate(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_hh_mm() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t, TimeOfDay::new(9, 30).unwrap());
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["9:30", "24:00", "12:60", "12:00:00", "", "noon"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn serde_uses_string_form() {
        let t = TimeOfDay::new(18, 5).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"18:05\"");
        let back: TimeOfDay = serde_json::from_str("\"18:05\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }

    #[test]
    fn stored_seconds_are_dropped() {
        let t = TimeOfDay::from(NaiveTime::from_hms_opt(7, 15, 42).unwrap());
        assert_eq!(t.to_string(), "07:15");
        assert_eq!(t, TimeOfDay::new(7, 15).unwrap());
    }

    #[test]
    fn schedule_validation() {
        let nine = TimeOfDay::new(9, 0).unwrap();
        let mut wh = WorkingHours::uniform(DaySchedule::open(nine, TimeOfDay::new(18, 0).unwrap()));
        assert!(wh.validate().is_ok());
        wh.sunday = DaySchedule::closed();
        assert!(wh.validate().is_ok());
        wh.saturday = DaySchedule { is_open: true, open_time: Some(nine), close_time: None };
        assert!(wh.validate().unwrap_err().starts_with("saturday"));
        wh.saturday = DaySchedule { is_open: false, open_time: Some(nine), close_time: None };
        assert!(wh.validate().is_err());
    }
}
