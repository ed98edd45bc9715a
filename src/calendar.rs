use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Maps working-hour offsets onto wall-clock time.
///
/// Hour zero is `workday_start` on `anchor`. Every calendar day holds
/// `hours_per_day` working hours; there are no weekends or holidays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkClock {
    pub anchor: NaiveDate,
    pub hours_per_day: f64,
    pub workday_start: NaiveTime,
}

impl Default for WorkClock {
    fn default() -> Self {
        Self {
            anchor: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            hours_per_day: 8.0,
            workday_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}

impl WorkClock {
    pub fn new(anchor: NaiveDate, hours_per_day: f64, workday_start: NaiveTime) -> Self {
        Self {
            anchor,
            hours_per_day,
            workday_start,
        }
    }

    fn day_length(&self) -> f64 {
        if self.hours_per_day.is_finite() && self.hours_per_day > 0.0 {
            self.hours_per_day
        } else {
            8.0
        }
    }

    fn at(&self, day: i64, hours_into_day: f64) -> NaiveDateTime {
        let start_of_day = self.anchor.and_time(self.workday_start) + Duration::days(day);
        start_of_day + Duration::milliseconds((hours_into_day * 3_600_000.0).round() as i64)
    }

    /// When work starting at `offset_hours` begins.
    pub fn start_at(&self, offset_hours: f64) -> NaiveDateTime {
        let offset = offset_hours.max(0.0);
        let day = (offset / self.day_length()).floor();
        self.at(day as i64, offset - day * self.day_length())
    }

    /// When work ending at `offset_hours` ends. An end on a day boundary is
    /// the close of the previous working day, not the next morning.
    pub fn finish_at(&self, offset_hours: f64) -> NaiveDateTime {
        let offset = offset_hours.max(0.0);
        let length = self.day_length();
        let day = (offset / length).floor();
        let within = offset - day * length;
        if day >= 1.0 && within.abs() < 1e-9 {
            self.at(day as i64 - 1, length)
        } else {
            self.at(day as i64, within)
        }
    }

    /// Calendar day (1-based) an offset falls on.
    pub fn day_number(&self, offset_hours: f64) -> i64 {
        (offset_hours.max(0.0) / self.day_length()).floor() as i64 + 1
    }
}
