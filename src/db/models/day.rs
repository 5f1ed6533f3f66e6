use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Calendar day rendered as unpadded `M-D-YYYY`, e.g. `6-1-2025`.
///
/// Only the canonical form parses, so a `DayKey` always formats back to the exact string it
/// was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

pub type DayKeyResult<T> = core::result::Result<T, DayKeyErr>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DayKeyErr {
    #[error("day identifier is empty")]
    Empty,

    #[error("'{0}' is not in M-D-YYYY form")]
    Malformed(String),

    #[error("'{0}' is not a calendar date")]
    NoSuchDate(String),

    #[error("'{0}' is not canonical (expected '{1}')")]
    NotCanonical(String, String),
}

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_mdy(month: u32, day: u32, year: i32) -> DayKeyResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DayKeyErr::NoSuchDate(format!("{}-{}-{}", month, day, year)))
    }

    pub fn parse(raw: &str) -> DayKeyResult<Self> {
        if raw.is_empty() {
            return Err(DayKeyErr::Empty);
        }

        let parts: Vec<&str> = raw.split('-').collect();
        let [month, day, year] = parts.as_slice() else {
            return Err(DayKeyErr::Malformed(raw.to_string()));
        };

        let malformed = || DayKeyErr::Malformed(raw.to_string());
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        let day = day.parse::<u32>().map_err(|_| malformed())?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;

        let key = NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DayKeyErr::NoSuchDate(raw.to_string()))?;

        let canonical = key.to_string();
        if canonical != raw {
            return Err(DayKeyErr::NotCanonical(raw.to_string(), canonical));
        }

        Ok(key)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// `true` when `self` falls on the calendar day immediately before `other`.
    pub fn is_day_before(&self, other: &DayKey) -> bool {
        other.pred().is_some_and(|prev| prev == *self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.0.month(), self.0.day(), self.0.year())
    }
}

impl FromStr for DayKey {
    type Err = DayKeyErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_is_unpadded() {
        let day = DayKey::from_mdy(6, 1, 2025).unwrap();
        assert_eq!(day.to_string(), "6-1-2025");

        let day = DayKey::from_mdy(12, 31, 1999).unwrap();
        assert_eq!(day.to_string(), "12-31-1999");
    }

    #[test]
    fn test_parse_round_trip() {
        for raw in ["6-1-2025", "12-25-2024", "2-29-2024", "1-1-1970"] {
            assert_eq!(DayKey::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(DayKey::parse(""), Err(DayKeyErr::Empty));
        assert!(matches!(DayKey::parse("6/1/2025"), Err(DayKeyErr::Malformed(_))));
        assert!(matches!(DayKey::parse("6-1"), Err(DayKeyErr::Malformed(_))));
        assert!(matches!(DayKey::parse("jun-1-2025"), Err(DayKeyErr::Malformed(_))));
        assert!(matches!(DayKey::parse("2-30-2025"), Err(DayKeyErr::NoSuchDate(_))));
        assert!(matches!(DayKey::parse("2-29-2025"), Err(DayKeyErr::NoSuchDate(_))));
        assert_eq!(
            DayKey::parse("06-01-2025"),
            Err(DayKeyErr::NotCanonical(
                "06-01-2025".to_string(),
                "6-1-2025".to_string()
            ))
        );
    }

    #[test]
    fn test_day_before_crosses_boundaries() {
        let pairs = [
            ("6-1-2025", "6-2-2025"),
            ("5-31-2025", "6-1-2025"),
            ("12-31-2024", "1-1-2025"),
            ("2-28-2025", "3-1-2025"),
            ("2-29-2024", "3-1-2024"),
        ];

        for (before, after) in pairs {
            let before = DayKey::parse(before).unwrap();
            let after = DayKey::parse(after).unwrap();
            assert!(before.is_day_before(&after), "{before} -> {after}");
            assert!(!after.is_day_before(&before));
            assert_eq!(before.succ(), Some(after));
        }

        let a = DayKey::parse("6-1-2025").unwrap();
        let c = DayKey::parse("6-3-2025").unwrap();
        assert!(!a.is_day_before(&c));
        assert!(!a.is_day_before(&a));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let days = vec![
            DayKey::parse("6-1-2025").unwrap(),
            DayKey::parse("6-2-2025").unwrap(),
        ];

        let json = serde_json::to_string(&days).unwrap();
        assert_eq!(json, r#"["6-1-2025","6-2-2025"]"#);

        let back: Vec<DayKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, days);
        assert!(serde_json::from_str::<DayKey>(r#""2025-06-01""#).is_err());
    }
}
