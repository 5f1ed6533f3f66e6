use std::sync::Mutex;

use chrono::{FixedOffset, Local, Utc};

use crate::db::models::day::DayKey;

/// Source of "today" for day-boundary decisions.
pub trait Clock: Send + Sync {
    fn today(&self) -> DayKey;
}

/// Wall-clock date, in the host's local zone unless a fixed offset is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { offset: None }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// `None` when `minutes` is outside +/- 24h.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(Self::with_offset)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> DayKey {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).date_naive().into(),
            None => Local::now().date_naive().into(),
        }
    }
}

/// Manually advanced clock.
#[derive(Debug)]
pub struct FixedClock {
    day: Mutex<DayKey>,
}

impl FixedClock {
    pub fn new(day: DayKey) -> Self {
        Self {
            day: Mutex::new(day),
        }
    }

    pub fn set(&self, day: DayKey) {
        *self.day.lock().unwrap_or_else(|e| e.into_inner()) = day;
    }

    /// Moves forward `days` calendar days, saturating at the end of the supported range.
    pub fn advance(&self, days: u32) {
        let mut current = self.day.lock().unwrap_or_else(|e| e.into_inner());
        for _ in 0..days {
            match current.succ() {
                Some(next) => *current = next,
                None => break,
            }
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> DayKey {
        *self.day.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fixed_clock_advances_across_months() {
        let clock = FixedClock::new(DayKey::parse("5-30-2025").unwrap());
        clock.advance(3);
        assert_eq!(clock.today().to_string(), "6-2-2025");

        clock.set(DayKey::parse("12-31-2025").unwrap());
        clock.advance(1);
        assert_eq!(clock.today().to_string(), "1-1-2026");
    }

    #[test]
    fn test_offset_bounds() {
        assert!(SystemClock::with_offset_minutes(-300).is_some());
        assert!(SystemClock::with_offset_minutes(24 * 60).is_none());
    }
}
